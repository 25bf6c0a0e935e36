//! Reduction of finished-task records into comparable scenario metrics.

use serde::Serialize;

use archsim_compute::vm::FinishedTask;

use crate::profile::{ArchitectureKind, ArchitectureProfile};

/// Aggregate performance and cost figures of one scenario run.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScenarioResult {
    /// Architecture the scenario modeled.
    pub architecture: ArchitectureKind,
    /// Number of provisioned execution units.
    pub vm_count: u32,
    /// Number of tasks that completed.
    pub finished_count: usize,
    /// Mean simulated time from submission to completion; 0.0 when nothing
    /// finished.
    pub avg_response_time: f64,
    /// Mean CPU time; 0.0 when nothing finished. Computed as
    /// `length / unit speed`, i.e. as if the task had occupied its lane fully
    /// for the whole execution; time-shared slowdowns do not enter this
    /// metric.
    pub avg_cpu_time: f64,
    /// Unit holding cost for the run duration plus the per-invocation
    /// charges.
    pub total_cost: f64,
}

impl ScenarioResult {
    /// Reduces one run's records into the scenario metrics.
    pub fn from_run(
        profile: &ArchitectureProfile,
        finished: &[FinishedTask],
        elapsed: f64,
        cost_per_time: f64,
    ) -> Self {
        let finished_count = finished.len();
        let (avg_response_time, avg_cpu_time) = if finished_count == 0 {
            (0.0, 0.0)
        } else {
            let total_response: f64 = finished.iter().map(|t| t.total_execution_time()).sum();
            let total_cpu: f64 = finished.iter().map(|t| t.length / t.speed).sum();
            (
                total_response / finished_count as f64,
                total_cpu / finished_count as f64,
            )
        };
        let unit_cost = profile.vm_count as f64 * elapsed * cost_per_time;
        let invocation_cost = finished_count as f64 * profile.invocation_cost();
        Self {
            architecture: profile.kind,
            vm_count: profile.vm_count,
            finished_count,
            avg_response_time,
            avg_cpu_time,
            total_cost: unit_cost + invocation_cost,
        }
    }
}
