use std::collections::{BinaryHeap, HashSet};

use rand::distributions::uniform::{SampleRange, SampleUniform};
use rand::prelude::*;
use rand_pcg::Pcg64;

use crate::component::Id;
use crate::event::{Event, EventData, EventId};
use crate::log::log_incorrect_event;

/// Epsilon to compare floating point values for equality.
pub const EPSILON: f64 = 1e-12;

pub struct SimulationState {
    now: f64,
    rand: Pcg64,
    queue: BinaryHeap<Event>,
    canceled: HashSet<EventId>,
    next_id: EventId,
}

impl SimulationState {
    pub fn new(seed: u64) -> Self {
        Self {
            now: 0.0,
            rand: Pcg64::seed_from_u64(seed),
            queue: BinaryHeap::new(),
            canceled: HashSet::new(),
            next_id: 0,
        }
    }

    pub fn time(&self) -> f64 {
        self.now
    }

    pub fn rand(&mut self) -> f64 {
        self.rand.gen_range(0.0..1.0)
    }

    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: SampleUniform,
        R: SampleRange<T>,
    {
        self.rand.gen_range(range)
    }

    pub fn add_event<T>(&mut self, data: T, src: Id, dst: Id, delay: f64) -> EventId
    where
        T: EventData,
    {
        let id = self.next_id;
        let event = Event {
            id,
            time: self.now + delay.max(0.),
            src,
            dst,
            data: Box::new(data),
        };
        if delay < -EPSILON {
            log_incorrect_event(event, &format!("negative delay {}", delay));
            panic!("Scheduling events in the past is not allowed");
        }
        self.queue.push(event);
        self.next_id += 1;
        id
    }

    pub fn next_event(&mut self) -> Option<Event> {
        while let Some(event) = self.queue.pop() {
            if self.canceled.remove(&event.id) {
                continue;
            }
            self.now = event.time;
            return Some(event);
        }
        None
    }

    pub fn peek_event(&mut self) -> Option<&Event> {
        loop {
            let id = match self.queue.peek() {
                Some(event) => event.id,
                None => return None,
            };
            if self.canceled.remove(&id) {
                self.queue.pop();
            } else {
                return self.queue.peek();
            }
        }
    }

    pub fn cancel_event(&mut self, id: EventId) {
        self.canceled.insert(id);
    }

    pub fn event_count(&self) -> u64 {
        self.next_id
    }
}
