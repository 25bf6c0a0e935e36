//! Diurnal workload synthesis.

use archsim_compute::vm::TaskRequest;

use crate::profile::ArchitectureProfile;

/// Length of the simulated day, in hours.
pub const HOURS: u32 = 24;
/// Tasks submitted in an off-peak hour.
pub const BASE_LOAD: u32 = 5;
/// Tasks submitted in a peak hour.
pub const PEAK_LOAD: u32 = 20;
/// A peak hour occurs every `PEAK_PERIOD` hours.
pub const PEAK_PERIOD: u32 = 6;
/// Input and output transfer size of every task, architecture-independent.
pub const TRANSFER_SIZE: u64 = 300;

/// Number of active users (one task each) in the given hour.
pub fn users_at(hour: u32) -> u32 {
    if hour % PEAK_PERIOD == 0 {
        PEAK_LOAD
    } else {
        BASE_LOAD
    }
}

/// Builds the full task set of a 24-hour day for the given architecture.
///
/// Task lengths and utilization claims are fixed by the profile at creation
/// time; ids are sequential. Generation is pure: regenerating produces an
/// equivalent fresh set of descriptors.
pub fn generate(profile: &ArchitectureProfile) -> Vec<TaskRequest> {
    let mut tasks = Vec::new();
    for hour in 0..HOURS {
        for _ in 0..users_at(hour) {
            tasks.push(TaskRequest {
                id: tasks.len() as u64,
                length: profile.task_length(),
                cores: 1,
                utilization: profile.utilization(),
                input_size: TRANSFER_SIZE,
                output_size: TRANSFER_SIZE,
            });
        }
    }
    tasks
}
