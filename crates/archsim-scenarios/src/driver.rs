//! Runs a single architecture scenario through the simulation engine.

use sugars::{rc, refcell};

use archsim_compute::pool::{PoolCapacity, PoolCharacteristics, ResourcePool};
use archsim_compute::vm::{FinishedTask, TaskCompleted, TaskRequest, Vm, VmSpec};
use archsim_core::{cast, log_debug, log_info, Event, EventHandler, Id, Simulation, SimulationContext};

use crate::error::ScenarioError;
use crate::profile::ArchitectureProfile;
use crate::workload;

/// Sizing of every provisioned execution unit.
pub const UNIT_SPEC: VmSpec = VmSpec {
    speed: 1000.0,
    cores: 2,
    memory: 2048,
    bandwidth: 1000,
    storage: 10000,
};

/// Total capacity of the backing resource pool.
pub const POOL_CAPACITY: PoolCapacity = PoolCapacity {
    memory: 16384,
    bandwidth: 100_000,
    storage: 1_000_000,
};

/// Cost rates of the backing resource pool.
pub const POOL_CHARACTERISTICS: PoolCharacteristics = PoolCharacteristics {
    cost_per_time: 0.1,
    cost_per_memory: 0.05,
    cost_per_storage: 0.001,
    cost_per_bandwidth: 0.01,
};

/// Occupancy monitoring cadence of the pool.
pub const SCHED_INTERVAL: f64 = 10.0;

/// Everything the engine reports back from one completed scenario run.
#[derive(Debug)]
pub struct ScenarioOutcome {
    /// Finished-task records, sorted by task id.
    pub finished: Vec<FinishedTask>,
    /// Simulated clock value when the event queue drained.
    pub elapsed: f64,
    /// Holding cost rate of the provisioned units.
    pub cost_per_time: f64,
}

/// Distributes submitted tasks round-robin across the units and observes
/// their completions.
struct Broker {
    units: Vec<Id>,
    next_unit: usize,
    submitted: u64,
    completed: u64,
    ctx: SimulationContext,
}

impl Broker {
    fn new(units: Vec<Id>, ctx: SimulationContext) -> Self {
        Self {
            units,
            next_unit: 0,
            submitted: 0,
            completed: 0,
            ctx,
        }
    }

    fn submit(&mut self, task: TaskRequest) {
        let unit = self.units[self.next_unit];
        self.next_unit = (self.next_unit + 1) % self.units.len();
        self.submitted += 1;
        self.ctx.emit_now(task, unit);
    }
}

impl EventHandler for Broker {
    fn on(&mut self, event: Event) {
        cast!(match event.data {
            TaskCompleted { id } => {
                self.completed += 1;
                log_debug!(self.ctx, "task {} completed ({}/{})", id, self.completed, self.submitted);
            }
        })
    }
}

/// Provisions the profile's units, submits the full day of tasks in one
/// batch and runs the engine until its event queue drains.
///
/// Each call owns a fresh engine instance, so scenario runs never share
/// simulated state. A run either completes every submitted task or fails:
/// partial completions are surfaced as [`ScenarioError::IncompleteRun`]
/// rather than folded into the metrics.
pub fn run_scenario(profile: &ArchitectureProfile, seed: u64) -> Result<ScenarioOutcome, ScenarioError> {
    let mut sim = Simulation::new(seed);
    let scenario = sim.create_context(profile.kind.name());

    let pool = rc!(refcell!(ResourcePool::new(
        POOL_CAPACITY,
        POOL_CHARACTERISTICS,
        SCHED_INTERVAL,
        sim.create_context("pool"),
    )));
    let pool_id = sim.add_handler("pool", pool.clone());

    let mut units = Vec::new();
    let mut unit_ids = Vec::new();
    for i in 0..profile.vm_count {
        pool.borrow_mut().allocate(&UNIT_SPEC)?;
        let name = format!("{}-{}", profile.kind.name().to_lowercase(), i);
        let unit = rc!(refcell!(Vm::new(UNIT_SPEC, pool_id, sim.create_context(&name))));
        unit_ids.push(sim.add_handler(&name, unit.clone()));
        units.push(unit);
    }

    let broker = rc!(refcell!(Broker::new(unit_ids, sim.create_context("broker"))));
    sim.add_handler("broker", broker.clone());

    let tasks = workload::generate(profile);
    let submitted = tasks.len();
    for task in tasks {
        broker.borrow_mut().submit(task);
    }
    log_info!(scenario, "submitted {} tasks across {} units", submitted, profile.vm_count);

    sim.step_until_no_events();

    let mut finished = Vec::new();
    for unit in &units {
        finished.extend(unit.borrow_mut().take_finished());
    }
    finished.sort_by_key(|record| record.task_id);
    if finished.len() != submitted {
        return Err(ScenarioError::IncompleteRun {
            finished: finished.len(),
            submitted,
        });
    }
    log_info!(scenario, "completed {}/{} tasks", finished.len(), submitted);

    let cost_per_time = pool.borrow().cost_per_time();
    Ok(ScenarioOutcome {
        finished,
        elapsed: sim.time(),
        cost_per_time,
    })
}
