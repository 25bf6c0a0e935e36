//! Side-by-side evaluation of the three deployment architectures.

use archsim_compute::vm::FinishedTask;

use crate::driver::{run_scenario, ScenarioOutcome};
use crate::error::ComparisonError;
use crate::metrics::ScenarioResult;
use crate::profile::comparison_set;

/// One scenario's metrics together with its raw finished-task records.
pub struct ScenarioReport {
    /// Reduced metrics.
    pub result: ScenarioResult,
    /// Per-task records, sorted by task id.
    pub finished: Vec<FinishedTask>,
}

/// Runs all three scenarios in their fixed order and returns the detailed
/// per-scenario reports.
///
/// Scenarios execute strictly sequentially, each against its own engine
/// instance. The first failure aborts the whole comparison, since a partial
/// result table would misrepresent it; the error names the failed
/// architecture.
pub fn run_comparison_detailed(seed: u64) -> Result<Vec<ScenarioReport>, ComparisonError> {
    let mut reports = Vec::new();
    for profile in comparison_set() {
        let ScenarioOutcome {
            finished,
            elapsed,
            cost_per_time,
        } = run_scenario(&profile, seed).map_err(|source| ComparisonError {
            architecture: profile.kind,
            source,
        })?;
        let result = ScenarioResult::from_run(&profile, &finished, elapsed, cost_per_time);
        reports.push(ScenarioReport { result, finished });
    }
    Ok(reports)
}

/// Runs all three scenarios and returns their metrics in the fixed order
/// VM, Container, Serverless.
pub fn run_comparison(seed: u64) -> Result<Vec<ScenarioResult>, ComparisonError> {
    Ok(run_comparison_detailed(seed)?
        .into_iter()
        .map(|report| report.result)
        .collect())
}
