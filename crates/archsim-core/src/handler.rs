//! Event handling.

use crate::event::Event;

/// Trait for consuming events in simulation components.
pub trait EventHandler {
    /// Processes an incoming event.
    fn on(&mut self, event: Event);
}

/// Matches the event payload against a set of concrete types, downcasting it
/// from [`EventData`](crate::event::EventData).
///
/// The arms need not cover every payload type: when nothing matches, the
/// event is reported as unhandled at `ERROR` level instead.
///
/// # Examples
///
/// ```rust
/// use std::cell::RefCell;
/// use std::rc::Rc;
/// use serde::Serialize;
/// use archsim_core::{cast, Event, EventHandler, Simulation, SimulationContext};
///
/// #[derive(Clone, Serialize)]
/// pub struct TaskArrived {
///     work: u64,
/// }
///
/// pub struct Server {
///     processed: u64,
///     ctx: SimulationContext,
/// }
///
/// impl EventHandler for Server {
///     fn on(&mut self, event: Event) {
///         cast!(match event.data {
///             TaskArrived { work } => {
///                 self.processed += work;
///             }
///         })
///     }
/// }
///
/// let mut sim = Simulation::new(123);
/// let server_ctx = sim.create_context("server");
/// let server = Rc::new(RefCell::new(Server { processed: 0, ctx: server_ctx }));
/// let server_id = sim.add_handler("server", server.clone());
/// let mut client_ctx = sim.create_context("client");
/// client_ctx.emit(TaskArrived { work: 16 }, server_id, 1.2);
/// sim.step_until_no_events();
/// assert_eq!(server.borrow().processed, 16);
/// ```
#[macro_export]
macro_rules! cast {
    ( match $event:ident.data { $( $type:ident { $($tt:tt)* } => { $($expr:tt)* } )+ } ) => {
        $(
            if $event.data.is::<$type>() {
                if let Ok(__value) = $event.data.downcast::<$type>() {
                    let $type { $($tt)* } = *__value;
                    $($expr)*
                }
            } else
        )*
        {
            $crate::log::log_unhandled_event($event);
        }
    }
}
