//! Simulation events.

use std::cmp::Ordering;

use downcast_rs::{impl_downcast, Downcast};
use serde::ser::Serialize;

use crate::component::Id;

/// Identifier of an event, unique within a simulation.
pub type EventId = u64;

/// Event payload. Implemented for any serializable type; serializability is
/// what allows the kernel to print the payload when tracing events or when
/// an event ends up unhandled.
pub trait EventData: Downcast + erased_serde::Serialize {}

impl_downcast!(EventData);

erased_serde::serialize_trait_object!(EventData);

impl<T: Serialize + 'static> EventData for T {}

/// An event scheduled for delivery at some simulation time.
pub struct Event {
    /// Unique identifier, also used to break ties between simultaneous events.
    pub id: EventId,
    /// Delivery time.
    pub time: f64,
    /// Source component.
    pub src: Id,
    /// Destination component.
    pub dst: Id,
    /// Payload.
    pub data: Box<dyn EventData>,
}

impl Eq for Event {}

impl PartialEq for Event {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

// Reversed comparison, so that the earliest event sits on top of the
// max-heap; among simultaneous events the one created first wins.
impl Ord for Event {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .time
            .total_cmp(&self.time)
            .then_with(|| other.id.cmp(&self.id))
    }
}

impl PartialOrd for Event {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
