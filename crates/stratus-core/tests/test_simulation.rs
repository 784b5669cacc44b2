use std::cell::RefCell;
use std::rc::Rc;
use std::thread;
use std::time::Duration;

use serde::Serialize;

use stratus_core::entity::EntityState;
use stratus_core::error::SimulationError;
use stratus_core::event::{Event, Tag};
use stratus_core::predicate::EventPredicate;
use stratus_core::simulation::Simulation;
use stratus_core::{tags, Id, SimEntity};

#[derive(Clone, Serialize)]
struct Payload {
    value: u32,
}

struct Sender {
    name: String,
    dst: Id,
    sends: Vec<(f64, Tag)>,
}

impl SimEntity for Sender {
    fn name(&self) -> &str {
        &self.name
    }

    fn start(&mut self, sim: &mut Simulation, id: Id) {
        for (delay, tag) in &self.sends {
            sim.send(id, self.dst, *delay, *tag, Payload { value: *tag as u32 })
                .unwrap();
        }
    }

    fn process_event(&mut self, _sim: &mut Simulation, _id: Id, _event: Event) {}
}

struct Receiver {
    name: String,
    received: Rc<RefCell<Vec<(f64, Tag, u32)>>>,
}

impl SimEntity for Receiver {
    fn name(&self) -> &str {
        &self.name
    }

    fn process_event(&mut self, sim: &mut Simulation, _id: Id, event: Event) {
        let value = event.data::<Payload>().map(|p| p.value).unwrap_or(0);
        self.received.borrow_mut().push((sim.clock(), event.tag, value));
    }
}

fn add_receiver(sim: &mut Simulation, name: &str) -> (Id, Rc<RefCell<Vec<(f64, Tag, u32)>>>) {
    let received = Rc::new(RefCell::new(Vec::new()));
    let receiver = Rc::new(RefCell::new(Receiver {
        name: name.to_owned(),
        received: received.clone(),
    }));
    let id = sim.add_entity(receiver);
    (id, received)
}

fn add_sender(sim: &mut Simulation, name: &str, dst: Id, sends: Vec<(f64, Tag)>) -> Id {
    sim.add_entity(Rc::new(RefCell::new(Sender {
        name: name.to_owned(),
        dst,
        sends,
    })))
}

#[test]
// A simulation without user entities finishes immediately at time 0,
// and a second start is rejected.
fn test_empty_run() {
    let mut sim = Simulation::new();
    assert_eq!(sim.entity_count(), 1); // the CIS
    let last = sim.start().unwrap();
    assert_eq!(last, 0.);
    assert!(!sim.is_running());
    assert!(matches!(sim.start(), Err(SimulationError::IllegalState(_))));
}

#[test]
// A sends to B with delay 5; B receives it with the payload intact, the clock
// stops at 5 and the clock-tick listener observes times 0 and 5.
fn test_single_send() {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut sim = Simulation::new();
    let (b, received) = add_receiver(&mut sim, "b");
    add_sender(&mut sim, "a", b, vec![(5., 42)]);

    let ticks = Rc::new(RefCell::new(Vec::new()));
    let ticks_probe = ticks.clone();
    sim.add_on_clock_tick_listener(move |info| ticks_probe.borrow_mut().push(info.time));

    let last = sim.start().unwrap();
    assert_eq!(last, 5.);
    assert_eq!(*received.borrow(), vec![(5., 42, 42)]);
    assert_eq!(*ticks.borrow(), vec![0., 5.]);
}

#[test]
// Three sends at times {3, 3, 7} are delivered in insertion order and the
// clock-tick listener fires once for t=3, not twice.
fn test_same_time_batch() {
    let mut sim = Simulation::new();
    let (b, received) = add_receiver(&mut sim, "b");
    add_sender(&mut sim, "a", b, vec![(3., 1), (3., 2), (7., 3)]);

    let ticks = Rc::new(RefCell::new(Vec::new()));
    let ticks_probe = ticks.clone();
    sim.add_on_clock_tick_listener(move |info| ticks_probe.borrow_mut().push(info.time));

    sim.start().unwrap();
    let tags_in_order: Vec<Tag> = received.borrow().iter().map(|(_, tag, _)| *tag).collect();
    assert_eq!(tags_in_order, vec![1, 2, 3]);
    assert_eq!(*ticks.borrow(), vec![0., 3., 7.]);
}

#[test]
// Events scheduled at the head of a same-time group are processed first.
fn test_send_first_precedes_same_time_sends() {
    let mut sim = Simulation::new();
    let (b, received) = add_receiver(&mut sim, "b");

    struct FirstSender {
        dst: Id,
    }
    impl SimEntity for FirstSender {
        fn name(&self) -> &str {
            "a"
        }
        fn start(&mut self, sim: &mut Simulation, id: Id) {
            sim.send(id, self.dst, 2., 1, Payload { value: 1 }).unwrap();
            sim.send_first(id, self.dst, 2., 2, Payload { value: 2 }).unwrap();
        }
        fn process_event(&mut self, _sim: &mut Simulation, _id: Id, _event: Event) {}
    }
    sim.add_entity(Rc::new(RefCell::new(FirstSender { dst: b })));

    sim.start().unwrap();
    let tags_in_order: Vec<Tag> = received.borrow().iter().map(|(_, tag, _)| *tag).collect();
    assert_eq!(tags_in_order, vec![2, 1]);
}

#[test]
// The processed-event time sequence is non-decreasing and every distinct
// clock value is reported by the tick listener exactly once.
fn test_event_ordering_properties() {
    let mut sim = Simulation::new();
    let (b, _received) = add_receiver(&mut sim, "b");
    add_sender(&mut sim, "a", b, vec![(4., 1), (1., 2), (4., 3), (2., 4), (1., 5)]);

    let processed_times = Rc::new(RefCell::new(Vec::new()));
    let times_probe = processed_times.clone();
    sim.add_on_event_processed_listener(move |event| times_probe.borrow_mut().push(event.time));

    let ticks = Rc::new(RefCell::new(Vec::new()));
    let ticks_probe = ticks.clone();
    sim.add_on_clock_tick_listener(move |info| ticks_probe.borrow_mut().push(info.time));

    sim.start().unwrap();

    let times = processed_times.borrow();
    assert!(times.windows(2).all(|w| w[0] <= w[1]));

    let ticks = ticks.borrow();
    let mut unique = ticks.clone();
    unique.dedup();
    assert_eq!(*ticks, unique);
    assert_eq!(*ticks, vec![0., 1., 2., 4.]);
}

#[test]
// pause(10) takes effect once the next event lies beyond the pause time:
// the clock is set to 10, the paused listener fires and the run blocks until
// an external resume.
fn test_pause_resume() {
    let mut sim = Simulation::new();
    let (b, _received) = add_receiver(&mut sim, "b");
    add_sender(&mut sim, "a", b, vec![(5., 1), (15., 2)]);

    let pauses = Rc::new(RefCell::new(Vec::new()));
    let pauses_probe = pauses.clone();
    sim.add_on_simulation_paused_listener(move |info| pauses_probe.borrow_mut().push(info.time));

    assert!(sim.pause_at(10.));
    let control = sim.controller();
    let resumer = thread::spawn(move || {
        while !control.is_paused() {
            thread::sleep(Duration::from_millis(10));
        }
        assert!(control.resume());
    });

    let last = sim.start().unwrap();
    resumer.join().unwrap();

    assert_eq!(last, 15.);
    assert_eq!(*pauses.borrow(), vec![10.]);
    assert!(!sim.is_paused());
    // A pause time in the past is rejected.
    assert!(!sim.pause_at(5.));
    // Nothing to resume once the latch is clear.
    assert!(!sim.resume());
}

#[test]
// A cancelled future event is never delivered and the simulation ends at
// time 0 with an empty future queue.
fn test_cancel_future_event() {
    let mut sim = Simulation::new();
    let (b, received) = add_receiver(&mut sim, "b");

    struct CancelingSender {
        dst: Id,
    }
    impl SimEntity for CancelingSender {
        fn name(&self) -> &str {
            "a"
        }
        fn start(&mut self, sim: &mut Simulation, id: Id) {
            sim.send(id, self.dst, 10., 7, Payload { value: 7 }).unwrap();
            let cancelled = sim.cancel(id, &EventPredicate::tag(7));
            assert_eq!(cancelled.unwrap().tag, 7);
        }
        fn process_event(&mut self, _sim: &mut Simulation, _id: Id, _event: Event) {}
    }
    sim.add_entity(Rc::new(RefCell::new(CancelingSender { dst: b })));

    let last = sim.start().unwrap();
    assert_eq!(last, 0.);
    assert!(received.borrow().is_empty());
}

#[test]
// cancel_all removes every matching event scheduled by the source.
fn test_cancel_all() {
    let mut sim = Simulation::new();
    let (b, received) = add_receiver(&mut sim, "b");

    struct BulkCancelingSender {
        dst: Id,
    }
    impl SimEntity for BulkCancelingSender {
        fn name(&self) -> &str {
            "a"
        }
        fn start(&mut self, sim: &mut Simulation, id: Id) {
            sim.send(id, self.dst, 1., 7, Payload { value: 1 }).unwrap();
            sim.send(id, self.dst, 2., 7, Payload { value: 2 }).unwrap();
            sim.send(id, self.dst, 3., 8, Payload { value: 3 }).unwrap();
            assert!(sim.cancel_all(id, &EventPredicate::tag(7)));
            assert!(!sim.cancel_all(id, &EventPredicate::tag(7)));
        }
        fn process_event(&mut self, _sim: &mut Simulation, _id: Id, _event: Event) {}
    }
    sim.add_entity(Rc::new(RefCell::new(BulkCancelingSender { dst: b })));

    sim.start().unwrap();
    let tags_in_order: Vec<Tag> = received.borrow().iter().map(|(_, tag, _)| *tag).collect();
    assert_eq!(tags_in_order, vec![8]);
}

#[test]
// terminate_at stops the run at the first clock value reaching the requested
// time: the batch that crosses it is still processed, then the clock is set
// back to the termination time and the entities drain during shutdown.
fn test_terminate_at() {
    let mut sim = Simulation::new();
    let (b, received) = add_receiver(&mut sim, "b");
    add_sender(&mut sim, "a", b, vec![(5., 1), (50., 2)]);

    assert!(sim.terminate_at(10.));
    let last = sim.start().unwrap();
    assert_eq!(last, 10.);
    let times: Vec<f64> = received.borrow().iter().map(|(time, _, _)| *time).collect();
    assert_eq!(times, vec![5., 10.]);
    assert!(!sim.terminate_at(0.));
}

#[test]
// abort stops the run at the next loop iteration without draining entities:
// the delivered event is never consumed.
fn test_abort() {
    let mut sim = Simulation::new();
    let (b, received) = add_receiver(&mut sim, "b");
    add_sender(&mut sim, "a", b, vec![(5., 1), (50., 2)]);

    sim.abort();
    let last = sim.start().unwrap();
    assert_eq!(last, 5.);
    assert!(received.borrow().is_empty());
}

#[test]
// A held entity becomes runnable again when its hold period elapses.
fn test_hold_entity() {
    let mut sim = Simulation::new();

    struct Holder;
    impl SimEntity for Holder {
        fn name(&self) -> &str {
            "holder"
        }
        fn start(&mut self, sim: &mut Simulation, id: Id) {
            sim.pause_entity(id, 4.).unwrap();
        }
        fn process_event(&mut self, _sim: &mut Simulation, _id: Id, _event: Event) {}
    }
    let holder = sim.add_entity(Rc::new(RefCell::new(Holder)));

    let last = sim.start().unwrap();
    assert_eq!(last, 4.);
    assert_eq!(sim.entity_state(holder), EntityState::Finished);
}

#[test]
// Tag 9999 is delivered to a waiting entity even when its wait predicate
// rejects it, while mismatched events stay in the deferred queue.
fn test_urgent_tag_bypasses_wait_predicate() {
    let mut sim = Simulation::new();

    struct PickyReceiver {
        received: Rc<RefCell<Vec<Tag>>>,
    }
    impl SimEntity for PickyReceiver {
        fn name(&self) -> &str {
            "picky"
        }
        fn start(&mut self, sim: &mut Simulation, id: Id) {
            sim.wait_for(id, EventPredicate::tag(1));
        }
        fn process_event(&mut self, _sim: &mut Simulation, _id: Id, event: Event) {
            self.received.borrow_mut().push(event.tag);
        }
        fn run(&mut self, sim: &mut Simulation, id: Id) {
            // Consume only delivered events; leave deferred ones untouched.
            while let Some(event) = sim.take_event_buffer(id) {
                self.process_event(sim, id, event);
            }
            sim.wait_for(id, EventPredicate::tag(1));
        }
    }

    let received = Rc::new(RefCell::new(Vec::new()));
    let picky = sim.add_entity(Rc::new(RefCell::new(PickyReceiver {
        received: received.clone(),
    })));
    add_sender(&mut sim, "a", picky, vec![(3., 2), (5., tags::URGENT_WAKEUP)]);

    sim.start().unwrap();
    assert_eq!(*received.borrow(), vec![tags::URGENT_WAKEUP]);
    // The tag-2 event was deferred and is still selectable.
    assert_eq!(sim.waiting(picky, &EventPredicate::tag(2)), 1);
    assert_eq!(
        sim.find_first_deferred(picky, &EventPredicate::tag(2)).unwrap().tag,
        2
    );
}

#[test]
// An entity registered while the simulation is running is started through a
// Create event and can receive messages; ids stay sequential.
fn test_dynamic_entity_creation() {
    let mut sim = Simulation::new();
    let received = Rc::new(RefCell::new(Vec::new()));

    struct Spawner {
        received: Rc<RefCell<Vec<(f64, Tag, u32)>>>,
    }
    impl SimEntity for Spawner {
        fn name(&self) -> &str {
            "spawner"
        }
        fn start(&mut self, sim: &mut Simulation, id: Id) {
            sim.send(id, id, 1., 0, Payload { value: 0 }).unwrap();
        }
        fn process_event(&mut self, sim: &mut Simulation, id: Id, _event: Event) {
            let spawned = sim.add_entity(Rc::new(RefCell::new(Receiver {
                name: "spawned".to_owned(),
                received: self.received.clone(),
            })));
            assert_eq!(spawned, 2);
            sim.send(id, spawned, 1., 11, Payload { value: 3 }).unwrap();
        }
    }
    sim.add_entity(Rc::new(RefCell::new(Spawner {
        received: received.clone(),
    })));

    let last = sim.start().unwrap();
    assert_eq!(last, 2.);
    assert_eq!(*received.borrow(), vec![(2., 11, 3)]);
    assert_eq!(sim.lookup_id("spawned"), Some(2));
    assert_eq!(sim.entity_name(2), Some("spawned"));
}

#[test]
// Scheduling errors are reported synchronously with precise kinds.
fn test_scheduling_errors() {
    let mut sim = Simulation::new();
    let cis = sim.cis_id();
    assert!(matches!(
        sim.send(cis, cis, -1., 0, Payload { value: 0 }),
        Err(SimulationError::InvalidArgument(_))
    ));
    assert!(matches!(
        sim.send_first(cis, cis, -0.5, 0, Payload { value: 0 }),
        Err(SimulationError::InvalidArgument(_))
    ));
    assert!(matches!(
        sim.pause_entity(cis, -2.),
        Err(SimulationError::InvalidArgument(_))
    ));
    assert!(matches!(
        Simulation::with_min_time_between_events(0.),
        Err(SimulationError::InvalidArgument(_))
    ));
    let sim = Simulation::with_min_time_between_events(0.5).unwrap();
    assert_eq!(sim.min_time_between_events(), 0.5);
}

#[test]
// A send to an unregistered entity fails when the event is processed.
fn test_send_to_unknown_entity() {
    let mut sim = Simulation::new();
    sim.send(0, 99, 1., 0, Payload { value: 0 }).unwrap();
    assert!(matches!(
        sim.start(),
        Err(SimulationError::InvalidArgument(_))
    ));
}

#[test]
// Listener deregistration works by identity and reports whether a removal
// took place.
fn test_listener_removal() {
    let mut sim = Simulation::new();
    let (b, _received) = add_receiver(&mut sim, "b");
    add_sender(&mut sim, "a", b, vec![(1., 1)]);

    let ticks = Rc::new(RefCell::new(Vec::new()));
    let ticks_probe = ticks.clone();
    let listener = sim.add_on_clock_tick_listener(move |info| ticks_probe.borrow_mut().push(info.time));

    assert!(sim.remove_on_clock_tick_listener(listener));
    assert!(!sim.remove_on_clock_tick_listener(listener));

    sim.start().unwrap();
    assert!(ticks.borrow().is_empty());
}

#[test]
// Entity ids equal their registration index and resolve both ways.
fn test_entity_registry() {
    let mut sim = Simulation::new();
    let (b, _) = add_receiver(&mut sim, "b");
    let a = add_sender(&mut sim, "a", b, vec![]);
    assert_eq!(sim.cis_id(), 0);
    assert_eq!(b, 1);
    assert_eq!(a, 2);
    assert_eq!(sim.lookup_id("a"), Some(2));
    assert_eq!(sim.lookup_id("missing"), None);
    assert_eq!(sim.entity_name(1), Some("b"));
    assert_eq!(sim.entity_count(), 3);
    assert!(sim.entity(1).is_some());
    assert!(sim.entity_by_name("a").is_some());
}
