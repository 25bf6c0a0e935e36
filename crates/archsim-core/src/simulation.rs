//! Simulation configuration and execution.

use std::cell::RefCell;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::rc::Rc;

use log::log_enabled;
use log::Level::Trace;
use rand::distributions::uniform::{SampleRange, SampleUniform};
use serde_json::json;
use serde_type_name::type_name;

use crate::component::Id;
use crate::context::SimulationContext;
use crate::event::Event;
use crate::handler::EventHandler;
use crate::log::log_undelivered_event;
use crate::state::SimulationState;

/// Owns the event queue and the component registry of one simulation and
/// drives the event processing.
///
/// Each call to [`Simulation::new`] produces a fully independent instance
/// with its own clock, queue and seeded random number generator, so several
/// simulations can be executed one after another without sharing any state.
pub struct Simulation {
    state: Rc<RefCell<SimulationState>>,
    ids: HashMap<String, Id>,
    names: Rc<RefCell<Vec<String>>>,
    handlers: Vec<Option<Rc<RefCell<dyn EventHandler>>>>,
}

impl Simulation {
    /// Creates a simulation with the given random seed.
    pub fn new(seed: u64) -> Self {
        Self {
            state: Rc::new(RefCell::new(SimulationState::new(seed))),
            ids: HashMap::new(),
            names: Rc::new(RefCell::new(Vec::new())),
            handlers: Vec::new(),
        }
    }

    fn register(&mut self, name: &str) -> Id {
        match self.ids.entry(name.to_owned()) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                let id = self.names.borrow().len() as Id;
                entry.insert(id);
                self.names.borrow_mut().push(name.to_owned());
                self.handlers.push(None);
                id
            }
        }
    }

    /// Returns the identifier of the component with the given name.
    ///
    /// Panics if no component with this name was registered.
    pub fn lookup_id(&self, name: &str) -> Id {
        *self.ids.get(name).unwrap()
    }

    /// Returns the name of the component with the given identifier.
    ///
    /// Panics if no component with this id was registered.
    pub fn lookup_name(&self, id: Id) -> String {
        self.names.borrow()[id as usize].clone()
    }

    /// Creates a simulation context for the component with the given name,
    /// registering the component if needed.
    ///
    /// Component ids are assigned sequentially starting from 0.
    pub fn create_context<S>(&mut self, name: S) -> SimulationContext
    where
        S: AsRef<str>,
    {
        let id = self.register(name.as_ref());
        SimulationContext::new(id, name.as_ref(), self.state.clone(), self.names.clone())
    }

    /// Attaches the event handler implementation to the component with the
    /// given name and returns the component id.
    ///
    /// If a context was already created under this name, the id assigned
    /// there is reused.
    pub fn add_handler<S>(&mut self, name: S, handler: Rc<RefCell<dyn EventHandler>>) -> Id
    where
        S: AsRef<str>,
    {
        let id = self.register(name.as_ref());
        self.handlers[id as usize] = Some(handler);
        id
    }

    /// Returns the current simulation time.
    pub fn time(&self) -> f64 {
        self.state.borrow().time()
    }

    /// Processes the next pending event: advances the clock to the event time
    /// and invokes [`EventHandler::on()`] of the destination component.
    /// Events addressed to a component without a handler are logged and
    /// dropped.
    ///
    /// Returns `false` when the queue is empty and `true` otherwise.
    pub fn step(&mut self) -> bool {
        let next = self.state.borrow_mut().next_event();
        let Some(event) = next else {
            return false;
        };
        if log_enabled!(Trace) {
            self.trace_event(&event);
        }
        match self.handlers.get(event.dst as usize) {
            Some(Some(handler)) => handler.borrow_mut().on(event),
            _ => log_undelivered_event(event),
        }
        true
    }

    fn trace_event(&self, event: &Event) {
        let src_name = self.lookup_name(event.src);
        let dst_name = self.lookup_name(event.dst);
        log::trace!(
            target: &dst_name,
            "[{:.3} {} {}] {}",
            event.time,
            crate::log::get_colored("EVENT", colored::Color::BrightBlack),
            dst_name,
            json!({"type": type_name(&event.data).unwrap(), "data": event.data, "src": src_name})
        );
    }

    /// Performs up to `step_count` steps through the simulation.
    ///
    /// Returns `true` if there could be more pending events and `false` otherwise.
    pub fn steps(&mut self, step_count: u64) -> bool {
        (0..step_count).all(|_| self.step())
    }

    /// Steps through the simulation until the event queue is drained.
    pub fn step_until_no_events(&mut self) {
        while self.step() {}
    }

    /// Steps through the simulation until the next event lies beyond
    /// `current_time + duration` or the queue is drained.
    ///
    /// Returns `true` if there could be more pending events and `false` otherwise.
    pub fn step_for_duration(&mut self, duration: f64) -> bool {
        let end = self.state.borrow().time() + duration;
        loop {
            let next_time = match self.state.borrow_mut().peek_event() {
                Some(event) => event.time,
                None => return false,
            };
            if next_time > end {
                return true;
            }
            self.step();
        }
    }

    /// Returns a random float in the range _[0, 1)_
    /// using the simulation-wide random number generator.
    pub fn rand(&mut self) -> f64 {
        self.state.borrow_mut().rand()
    }

    /// Returns a random number in the specified range
    /// using the simulation-wide random number generator.
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: SampleUniform,
        R: SampleRange<T>,
    {
        self.state.borrow_mut().gen_range(range)
    }

    /// Returns the total number of created events, including cancelled ones.
    pub fn event_count(&self) -> u64 {
        self.state.borrow().event_count()
    }
}
