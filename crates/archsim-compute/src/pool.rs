//! Resource pool backing the execution units.

use std::collections::HashSet;

use serde::Serialize;
use thiserror::Error;

use archsim_core::{cast, log_debug, Event, EventHandler, EventId, Id, SimulationContext};

use crate::vm::VmSpec;

/// Total pool capacity available for unit allocation.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct PoolCapacity {
    /// Total memory.
    pub memory: u64,
    /// Total network bandwidth.
    pub bandwidth: u64,
    /// Total storage.
    pub storage: u64,
}

/// Cost rates of the pool's resources.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct PoolCharacteristics {
    /// Cost of holding one execution unit for one unit of simulated time.
    pub cost_per_time: f64,
    /// Cost per allocated memory unit.
    pub cost_per_memory: f64,
    /// Cost per allocated storage unit.
    pub cost_per_storage: f64,
    /// Cost per allocated bandwidth unit.
    pub cost_per_bandwidth: f64,
}

/// The pool cannot satisfy a unit allocation.
#[derive(Clone, Debug, Error)]
#[error("not enough {resource}: requested {requested}, available {available}")]
pub struct AllocationError {
    /// Exhausted resource.
    pub resource: &'static str,
    /// Requested amount.
    pub requested: u64,
    /// Amount still available.
    pub available: u64,
}

// EVENTS --------------------------------------------------------------------

/// A unit started running its first task.
#[derive(Clone, Serialize)]
pub struct UnitBusy {
    /// Unit component id.
    pub unit: Id,
}

/// A unit ran out of tasks.
#[derive(Clone, Serialize)]
pub struct UnitIdle {
    /// Unit component id.
    pub unit: Id,
}

#[derive(Clone, Serialize)]
struct SchedulingTick {}

// MODEL ---------------------------------------------------------------------

/// Capacity bookkeeping and occupancy monitoring for a set of execution units.
///
/// While at least one unit is busy, the pool re-evaluates and logs unit
/// occupancy every `sched_interval` simulated seconds. The pending tick is
/// cancelled when the last unit goes idle, so the event queue drains exactly
/// at the last completion.
pub struct ResourcePool {
    characteristics: PoolCharacteristics,
    sched_interval: f64,
    memory_available: u64,
    bandwidth_available: u64,
    storage_available: u64,
    unit_count: u32,
    busy_units: HashSet<Id>,
    next_tick: Option<EventId>,
    ctx: SimulationContext,
}

impl ResourcePool {
    /// Creates a pool with the given capacity, cost rates and monitoring
    /// cadence.
    pub fn new(
        capacity: PoolCapacity,
        characteristics: PoolCharacteristics,
        sched_interval: f64,
        ctx: SimulationContext,
    ) -> Self {
        Self {
            characteristics,
            sched_interval,
            memory_available: capacity.memory,
            bandwidth_available: capacity.bandwidth,
            storage_available: capacity.storage,
            unit_count: 0,
            busy_units: HashSet::new(),
            next_tick: None,
            ctx,
        }
    }

    /// Reserves pool capacity for one unit of the given sizing.
    pub fn allocate(&mut self, spec: &VmSpec) -> Result<(), AllocationError> {
        if self.memory_available < spec.memory {
            return Err(AllocationError {
                resource: "memory",
                requested: spec.memory,
                available: self.memory_available,
            });
        }
        if self.bandwidth_available < spec.bandwidth {
            return Err(AllocationError {
                resource: "bandwidth",
                requested: spec.bandwidth,
                available: self.bandwidth_available,
            });
        }
        if self.storage_available < spec.storage {
            return Err(AllocationError {
                resource: "storage",
                requested: spec.storage,
                available: self.storage_available,
            });
        }
        self.memory_available -= spec.memory;
        self.bandwidth_available -= spec.bandwidth;
        self.storage_available -= spec.storage;
        self.unit_count += 1;
        Ok(())
    }

    /// Number of allocated units.
    pub fn unit_count(&self) -> u32 {
        self.unit_count
    }

    /// Pool cost rates.
    pub fn characteristics(&self) -> &PoolCharacteristics {
        &self.characteristics
    }

    /// Cost of holding one unit for one unit of simulated time.
    pub fn cost_per_time(&self) -> f64 {
        self.characteristics.cost_per_time
    }
}

impl EventHandler for ResourcePool {
    fn on(&mut self, event: Event) {
        cast!(match event.data {
            UnitBusy { unit } => {
                self.busy_units.insert(unit);
                if self.next_tick.is_none() {
                    self.next_tick = Some(self.ctx.emit_self(SchedulingTick {}, self.sched_interval));
                }
            }
            UnitIdle { unit } => {
                self.busy_units.remove(&unit);
                if self.busy_units.is_empty() {
                    if let Some(event_id) = self.next_tick.take() {
                        self.ctx.cancel_event(event_id);
                    }
                }
            }
            SchedulingTick {} => {
                log_debug!(self.ctx, "{} of {} units busy", self.busy_units.len(), self.unit_count);
                self.next_tick = Some(self.ctx.emit_self(SchedulingTick {}, self.sched_interval));
            }
        })
    }
}
