use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;

use archsim_core::{cast, Event, EventHandler, Simulation, SimulationContext};

#[derive(Clone, Serialize)]
struct Ping {
    seq: u64,
}

#[derive(Clone, Serialize)]
struct Tick {}

struct Recorder {
    delivered: Vec<(f64, u64)>,
    ctx: SimulationContext,
}

impl Recorder {
    fn new(ctx: SimulationContext) -> Self {
        Self {
            delivered: Vec::new(),
            ctx,
        }
    }
}

impl EventHandler for Recorder {
    fn on(&mut self, event: Event) {
        cast!(match event.data {
            Ping { seq } => {
                self.delivered.push((self.ctx.time(), seq));
            }
        })
    }
}

#[test]
fn events_fire_in_time_order() {
    let mut sim = Simulation::new(123);
    let recorder = Rc::new(RefCell::new(Recorder::new(sim.create_context("recorder"))));
    let recorder_id = sim.add_handler("recorder", recorder.clone());
    let mut client = sim.create_context("client");

    client.emit(Ping { seq: 2 }, recorder_id, 3.5);
    client.emit(Ping { seq: 0 }, recorder_id, 1.0);
    client.emit(Ping { seq: 1 }, recorder_id, 2.0);

    sim.step_until_no_events();

    assert_eq!(sim.time(), 3.5);
    assert_eq!(
        recorder.borrow().delivered,
        vec![(1.0, 0), (2.0, 1), (3.5, 2)]
    );
}

#[test]
fn simultaneous_events_are_delivered_in_creation_order() {
    let mut sim = Simulation::new(123);
    let recorder = Rc::new(RefCell::new(Recorder::new(sim.create_context("recorder"))));
    let recorder_id = sim.add_handler("recorder", recorder.clone());
    let mut client = sim.create_context("client");

    for seq in 0..10 {
        client.emit_now(Ping { seq }, recorder_id);
    }
    sim.step_until_no_events();

    let order: Vec<u64> = recorder.borrow().delivered.iter().map(|&(_, seq)| seq).collect();
    assert_eq!(order, (0..10).collect::<Vec<_>>());
}

#[test]
fn cancelled_events_are_skipped() {
    let mut sim = Simulation::new(123);
    let recorder = Rc::new(RefCell::new(Recorder::new(sim.create_context("recorder"))));
    let recorder_id = sim.add_handler("recorder", recorder.clone());
    let mut client = sim.create_context("client");

    client.emit(Ping { seq: 0 }, recorder_id, 1.0);
    let cancelled = client.emit(Ping { seq: 1 }, recorder_id, 2.0);
    client.emit(Ping { seq: 2 }, recorder_id, 3.0);
    client.cancel_event(cancelled);

    sim.step_until_no_events();

    assert_eq!(sim.time(), 3.0);
    assert_eq!(recorder.borrow().delivered, vec![(1.0, 0), (3.0, 2)]);
}

#[test]
fn step_advances_one_event_at_a_time() {
    let mut sim = Simulation::new(123);
    let recorder = Rc::new(RefCell::new(Recorder::new(sim.create_context("recorder"))));
    let recorder_id = sim.add_handler("recorder", recorder.clone());
    let mut client = sim.create_context("client");

    client.emit(Ping { seq: 0 }, recorder_id, 1.2);
    client.emit(Ping { seq: 1 }, recorder_id, 1.3);
    assert_eq!(sim.event_count(), 2);

    assert!(sim.step());
    assert_eq!(sim.time(), 1.2);
    assert!(sim.step());
    assert_eq!(sim.time(), 1.3);
    assert!(!sim.step());
}

#[test]
fn step_for_duration_respects_the_horizon() {
    let mut sim = Simulation::new(123);
    let recorder = Rc::new(RefCell::new(Recorder::new(sim.create_context("recorder"))));
    let recorder_id = sim.add_handler("recorder", recorder.clone());
    let mut client = sim.create_context("client");

    client.emit(Ping { seq: 0 }, recorder_id, 1.0);
    client.emit(Ping { seq: 1 }, recorder_id, 2.0);
    client.emit(Ping { seq: 2 }, recorder_id, 3.5);

    let more = sim.step_for_duration(2.5);
    assert!(more);
    assert_eq!(sim.time(), 2.0);
    assert_eq!(recorder.borrow().delivered.len(), 2);

    let more = sim.step_for_duration(10.0);
    assert!(!more);
    assert_eq!(sim.time(), 3.5);
}

#[test]
fn context_ids_are_assigned_sequentially() {
    let mut sim = Simulation::new(123);
    let first = sim.create_context("first");
    let second = sim.create_context("second");
    assert_eq!(first.id(), 0);
    assert_eq!(second.id(), 1);
    assert_eq!(sim.lookup_id("second"), 1);
    assert_eq!(sim.lookup_name(0), "first");
    assert_eq!(first.lookup_name(second.id()), "second");
}

#[test]
fn handler_reuses_context_id() {
    let mut sim = Simulation::new(123);
    let ctx = sim.create_context("recorder");
    assert_eq!(ctx.id(), 0);
    let recorder = Rc::new(RefCell::new(Recorder::new(ctx)));
    assert_eq!(sim.add_handler("recorder", recorder), 0);
}

#[test]
fn undelivered_events_are_discarded() {
    let mut sim = Simulation::new(123);
    let sink = sim.create_context("sink");
    let mut client = sim.create_context("client");

    client.emit(Tick {}, sink.id(), 1.0);
    sim.step_until_no_events();

    // no handler for `sink`, the event is dropped but time still advances
    assert_eq!(sim.time(), 1.0);
}

#[test]
fn seeded_rng_is_deterministic() {
    let mut a = Simulation::new(42);
    let mut b = Simulation::new(42);
    let xs: Vec<u32> = (0..5).map(|_| a.gen_range(0..1000)).collect();
    let ys: Vec<u32> = (0..5).map(|_| b.gen_range(0..1000)).collect();
    assert_eq!(xs, ys);
    let r = a.rand();
    assert!((0.0..1.0).contains(&r));
}
