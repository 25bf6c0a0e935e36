//! Model of an execution unit with time-shared task scheduling.

use serde::Serialize;

use archsim_core::{cast, log_debug, Event, EventHandler, EventId, Id, SimulationContext};

use crate::pool::{UnitBusy, UnitIdle};

/// Static sizing of an execution unit.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct VmSpec {
    /// Processing capacity of a single lane, in capacity units per second.
    pub speed: f64,
    /// Number of parallel lanes.
    pub cores: u32,
    /// Allocated memory.
    pub memory: u64,
    /// Allocated network bandwidth.
    pub bandwidth: u64,
    /// Allocated storage.
    pub storage: u64,
}

impl VmSpec {
    /// Total processing capacity across all lanes.
    pub fn total_capacity(&self) -> f64 {
        self.speed * self.cores as f64
    }
}

/// Fraction of a lane a running task claims.
#[derive(Clone, Copy, Debug, Serialize)]
pub enum UtilizationModel {
    /// The task keeps a full lane busy while it runs.
    Full,
    /// The task claims a fixed fraction of a lane.
    Dynamic {
        /// Claimed fraction in `(0, 1]`.
        fraction: f64,
    },
}

impl UtilizationModel {
    /// Claimed fraction of a single lane.
    pub fn share(&self) -> f64 {
        match self {
            UtilizationModel::Full => 1.0,
            UtilizationModel::Dynamic { fraction } => *fraction,
        }
    }
}

// EVENTS --------------------------------------------------------------------

/// Request to execute a task on a unit.
#[derive(Clone, Serialize)]
pub struct TaskRequest {
    /// Task identifier, unique within a scenario.
    pub id: u64,
    /// Instruction length in abstract work units.
    pub length: f64,
    /// Number of required lanes.
    pub cores: u32,
    /// Resource claim of the task while it runs.
    pub utilization: UtilizationModel,
    /// Input transfer size.
    pub input_size: u64,
    /// Output transfer size.
    pub output_size: u64,
}

/// Notifies the submitter that a task has finished.
#[derive(Clone, Serialize)]
pub struct TaskCompleted {
    /// Task identifier.
    pub id: u64,
}

// MODEL ---------------------------------------------------------------------

/// Read-only outcome record of a completed task.
#[derive(Clone, Debug, Serialize)]
pub struct FinishedTask {
    /// Task identifier.
    pub task_id: u64,
    /// Realized instruction length.
    pub length: f64,
    /// Processing speed of the lane the task was assigned to.
    pub speed: f64,
    /// Time the task was submitted to the unit.
    pub submit_time: f64,
    /// Time the task finished.
    pub finish_time: f64,
}

impl FinishedTask {
    /// Simulated time from submission to completion.
    pub fn total_execution_time(&self) -> f64 {
        self.finish_time - self.submit_time
    }
}

struct RunningTask {
    id: u64,
    length: f64,
    remaining: f64,
    share: f64,
    rate: f64,
    submit_time: f64,
    requester: Id,
}

/// An execution unit running tasks under time sharing.
///
/// All running tasks progress simultaneously: each task receives
/// `min(speed * share, total_capacity / n)` capacity units per second, where
/// `n` is the current number of running tasks. Whenever the running set
/// changes, the unit advances the remaining work of every task, recomputes
/// the rates and reschedules its next completion event, so completion times
/// are exact and no periodic re-evaluation is needed.
///
/// The unit notifies the resource pool on idle/busy transitions and appends a
/// [FinishedTask] record for every completion.
pub struct Vm {
    spec: VmSpec,
    pool: Id,
    running: Vec<RunningTask>,
    finished: Vec<FinishedTask>,
    last_update: f64,
    next_completion: Option<EventId>,
    ctx: SimulationContext,
}

impl Vm {
    /// Creates a unit with the given sizing, reporting busy and idle
    /// transitions to the `pool` component.
    pub fn new(spec: VmSpec, pool: Id, ctx: SimulationContext) -> Self {
        Self {
            spec,
            pool,
            running: Vec::new(),
            finished: Vec::new(),
            last_update: 0.0,
            next_completion: None,
            ctx,
        }
    }

    /// Returns the unit sizing.
    pub fn spec(&self) -> &VmSpec {
        &self.spec
    }

    /// Number of currently running tasks.
    pub fn running_count(&self) -> usize {
        self.running.len()
    }

    /// Drains the accumulated finished-task records.
    pub fn take_finished(&mut self) -> Vec<FinishedTask> {
        std::mem::take(&mut self.finished)
    }

    fn submit(&mut self, id: u64, length: f64, share: f64, requester: Id) {
        if self.running.is_empty() {
            self.ctx.emit_now(UnitBusy { unit: self.ctx.id() }, self.pool);
        }
        self.advance();
        self.running.push(RunningTask {
            id,
            length,
            remaining: length,
            share,
            rate: 0.0,
            submit_time: self.ctx.time(),
            requester,
        });
        self.reschedule();
    }

    fn complete(&mut self, id: u64) {
        self.advance();
        let pos = self
            .running
            .iter()
            .position(|task| task.id == id)
            .expect("unexpected completion event in Vm");
        let task = self.running.swap_remove(pos);
        self.finished.push(FinishedTask {
            task_id: task.id,
            length: task.length,
            speed: self.spec.speed,
            submit_time: task.submit_time,
            finish_time: self.ctx.time(),
        });
        self.ctx.emit_now(TaskCompleted { id: task.id }, task.requester);
        if self.running.is_empty() {
            self.ctx.emit_now(UnitIdle { unit: self.ctx.id() }, self.pool);
        }
        self.reschedule();
    }

    // Brings the remaining work of every running task up to the current time.
    fn advance(&mut self) {
        let elapsed = self.ctx.time() - self.last_update;
        if elapsed > 0.0 {
            for task in self.running.iter_mut() {
                task.remaining = (task.remaining - elapsed * task.rate).max(0.0);
            }
        }
        self.last_update = self.ctx.time();
    }

    // Recomputes per-task rates and reschedules the next completion event.
    fn reschedule(&mut self) {
        if let Some(event_id) = self.next_completion.take() {
            self.ctx.cancel_event(event_id);
        }
        if self.running.is_empty() {
            return;
        }
        let fair = self.spec.total_capacity() / self.running.len() as f64;
        for task in self.running.iter_mut() {
            task.rate = (self.spec.speed * task.share).min(fair);
        }
        if let Some(next) = self
            .running
            .iter()
            .min_by(|a, b| (a.remaining / a.rate).total_cmp(&(b.remaining / b.rate)))
        {
            let delay = next.remaining / next.rate;
            self.next_completion = Some(self.ctx.emit_self(TaskCompleted { id: next.id }, delay));
        }
    }
}

impl EventHandler for Vm {
    fn on(&mut self, event: Event) {
        let requester = event.src;
        cast!(match event.data {
            TaskRequest {
                id,
                length,
                cores,
                utilization,
                input_size,
                output_size,
            } => {
                log_debug!(
                    self.ctx,
                    "task {} arrived: length={} cores={} io={}/{}",
                    id,
                    length,
                    cores,
                    input_size,
                    output_size
                );
                self.submit(id, length, utilization.share(), requester);
            }
            TaskCompleted { id } => {
                self.complete(id);
            }
        })
    }
}
