//! Error types of the scenario layer.

use thiserror::Error;

use archsim_compute::pool::AllocationError;

use crate::profile::ArchitectureKind;

/// Invalid scenario configuration, rejected before anything runs.
#[derive(Clone, Debug, Error)]
pub enum ConfigError {
    /// A profile must provision at least one execution unit.
    #[error("{architecture} profile must provision at least one execution unit")]
    NoUnits {
        /// Offending architecture.
        architecture: ArchitectureKind,
    },
    /// Task lengths are scaled by the cost factor and must stay positive.
    #[error("{architecture} profile has non-positive cost factor {cost_factor}")]
    NonPositiveCostFactor {
        /// Offending architecture.
        architecture: ArchitectureKind,
        /// Rejected value.
        cost_factor: f64,
    },
}

/// A scenario run that cannot produce a complete result.
#[derive(Clone, Debug, Error)]
pub enum ScenarioError {
    /// The pool could not back another execution unit.
    #[error("failed to provision an execution unit")]
    Provision(#[from] AllocationError),
    /// The engine drained its event queue with tasks still unfinished.
    #[error("run ended with {finished} of {submitted} tasks finished")]
    IncompleteRun {
        /// Tasks that produced a finished record.
        finished: usize,
        /// Tasks submitted at the start of the run.
        submitted: usize,
    },
}

/// A comparison aborted by a failed scenario.
///
/// Results are only meaningful as a complete triple, so the first failing
/// scenario stops the whole comparison; no partial table is produced.
#[derive(Clone, Debug, Error)]
#[error("{architecture} scenario failed")]
pub struct ComparisonError {
    /// Architecture whose scenario failed.
    pub architecture: ArchitectureKind,
    /// Underlying scenario failure.
    #[source]
    pub source: ScenarioError,
}
