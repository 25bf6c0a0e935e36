//! Architecture profiles of the comparison study.

use std::fmt;

use serde::Serialize;

use archsim_compute::vm::UtilizationModel;

use crate::error::ConfigError;

/// Deployment architecture under comparison.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ArchitectureKind {
    /// Virtual machines (IaaS).
    Vm,
    /// Containers (CaaS).
    Container,
    /// Serverless functions (FaaS).
    Serverless,
}

impl ArchitectureKind {
    /// Display name used in reports.
    pub fn name(&self) -> &'static str {
        match self {
            ArchitectureKind::Vm => "VM",
            ArchitectureKind::Container => "Container",
            ArchitectureKind::Serverless => "Serverless",
        }
    }
}

impl fmt::Display for ArchitectureKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Execution characteristics of one deployment architecture.
///
/// A profile is a plain configuration record; all behavior differences
/// between the architectures are captured by its fields and the values
/// derived from them.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct ArchitectureProfile {
    /// Architecture this profile describes.
    pub kind: ArchitectureKind,
    /// Number of provisioned execution units.
    pub vm_count: u32,
    /// Task-length scaling factor relative to the VM baseline.
    pub cost_factor: f64,
}

impl ArchitectureProfile {
    /// Creates a profile, rejecting parameters the simulation cannot run
    /// with before anything is provisioned.
    pub fn new(kind: ArchitectureKind, vm_count: u32, cost_factor: f64) -> Result<Self, ConfigError> {
        if vm_count == 0 {
            return Err(ConfigError::NoUnits { architecture: kind });
        }
        if cost_factor <= 0.0 {
            return Err(ConfigError::NonPositiveCostFactor {
                architecture: kind,
                cost_factor,
            });
        }
        Ok(Self {
            kind,
            vm_count,
            cost_factor,
        })
    }

    /// Whether this profile models function-grade execution slots.
    pub fn is_serverless(&self) -> bool {
        self.kind == ArchitectureKind::Serverless
    }

    /// Unscaled task length for this architecture.
    pub fn base_length(&self) -> f64 {
        if self.is_serverless() {
            2000.0
        } else {
            10000.0
        }
    }

    /// Instruction length of every generated task.
    pub fn task_length(&self) -> f64 {
        self.base_length() * self.cost_factor
    }

    /// Resource claim of a running task: serverless tasks hold a small
    /// fraction of a lane, VM and container tasks keep a full lane busy.
    pub fn utilization(&self) -> UtilizationModel {
        if self.is_serverless() {
            UtilizationModel::Dynamic { fraction: 0.2 }
        } else {
            UtilizationModel::Full
        }
    }

    /// Flat charge per completed task, modeling request-based billing.
    pub fn invocation_cost(&self) -> f64 {
        if self.is_serverless() {
            0.0002
        } else {
            0.00002
        }
    }
}

/// The fixed ordered profile set of the study: VM, Container, Serverless.
pub fn comparison_set() -> [ArchitectureProfile; 3] {
    [
        ArchitectureProfile {
            kind: ArchitectureKind::Vm,
            vm_count: 4,
            cost_factor: 1.0,
        },
        ArchitectureProfile {
            kind: ArchitectureKind::Container,
            vm_count: 2,
            cost_factor: 0.8,
        },
        ArchitectureProfile {
            kind: ArchitectureKind::Serverless,
            vm_count: 1,
            cost_factor: 0.5,
        },
    ]
}
