//! Simulation configuration and execution.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, SystemTime};

use log::Level::Trace;
use log::{debug, log_enabled, trace};

use crate::cis::CloudInformationService;
use crate::component::Id;
use crate::entity::{EntityState, SimEntity};
use crate::error::SimulationError;
use crate::event::{Event, EventData, EventId, EventKind, Tag};
use crate::listener::{EventInfo, ListenerId, ListenerRegistry};
use crate::log::{describe_event, get_colored, log_undelivered_event};
use crate::predicate::EventPredicate;
use crate::queue::{DeferredQueue, FutureQueue};
use crate::tags;

/// Default minimal period between the scheduler ticks that entities derive
/// from next-completion estimates.
pub const DEFAULT_MIN_TIME_BETWEEN_EVENTS: f64 = 0.1;

/// How long the run loop sleeps between checks of the pause latch.
const PAUSE_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Sentinel for "no pause/termination time requested".
const TIME_UNSET: f64 = -1.0;

struct EntityEntry {
    entity: Rc<RefCell<dyn SimEntity>>,
    name: String,
    state: EntityState,
    event_buffer: Option<Event>,
    wait_predicate: Option<EventPredicate>,
}

/// Cloneable handle for coordinating pause and resume from another thread.
///
/// This is the one supported multi-threaded interaction with the engine: the
/// thread driving [`Simulation::start`] blocks in a bounded-wait spin while
/// paused, and another thread clears the latch through this handle.
#[derive(Clone)]
pub struct SimulationControl {
    paused: Arc<AtomicBool>,
}

impl SimulationControl {
    /// Returns whether the simulation is currently paused.
    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }

    /// Clears the pause latch, letting the run loop continue.
    /// Returns whether the simulation was paused.
    pub fn resume(&self) -> bool {
        self.paused.swap(false, Ordering::SeqCst)
    }
}

/// Represents a simulation, provides methods for its configuration and
/// execution.
///
/// The engine owns the clock, the future and deferred event queues, the
/// entity registry and the listener registries. All entities run on the
/// single thread driving [`start`](Simulation::start); an entity "suspends"
/// by transitioning to [`EntityState::Waiting`] or [`EntityState::Holding`]
/// while the loop proceeds with other runnable entities.
pub struct Simulation {
    clock: f64,
    future: FutureQueue,
    deferred: DeferredQueue,
    entities: Vec<EntityEntry>,
    name_to_id: HashMap<String, Id>,
    cis: Rc<RefCell<CloudInformationService>>,
    running: bool,
    already_run_once: bool,
    abort_requested: bool,
    terminate_time: f64,
    pause_time: f64,
    paused: Arc<AtomicBool>,
    min_time_between_events: f64,
    start_date: SystemTime,
    event_count: u64,
    on_event_processed: ListenerRegistry<Event>,
    on_clock_tick: ListenerRegistry<EventInfo>,
    on_simulation_paused: ListenerRegistry<EventInfo>,
    pending_tick: Option<f64>,
    last_tick_notified: Option<f64>,
}

impl Simulation {
    /// Creates a simulation with the default minimal time between events.
    ///
    /// A [`CloudInformationService`] entity is constructed and registered
    /// during initialization, occupying id 0.
    pub fn new() -> Self {
        let cis = Rc::new(RefCell::new(CloudInformationService::new()));
        let mut sim = Self {
            clock: 0.0,
            future: FutureQueue::new(),
            deferred: DeferredQueue::new(),
            entities: Vec::new(),
            name_to_id: HashMap::new(),
            cis: cis.clone(),
            running: false,
            already_run_once: false,
            abort_requested: false,
            terminate_time: TIME_UNSET,
            pause_time: TIME_UNSET,
            paused: Arc::new(AtomicBool::new(false)),
            min_time_between_events: DEFAULT_MIN_TIME_BETWEEN_EVENTS,
            start_date: SystemTime::now(),
            event_count: 0,
            on_event_processed: ListenerRegistry::new(),
            on_clock_tick: ListenerRegistry::new(),
            on_simulation_paused: ListenerRegistry::new(),
            pending_tick: Some(0.0),
            last_tick_notified: None,
        };
        sim.add_entity(cis);
        sim
    }

    /// Creates a simulation with the given minimal time between events.
    ///
    /// Fails with [`SimulationError::InvalidArgument`] if `min_time` is not
    /// positive.
    pub fn with_min_time_between_events(min_time: f64) -> Result<Self, SimulationError> {
        if min_time <= 0.0 {
            return Err(SimulationError::InvalidArgument(format!(
                "the minimal time between events should be positive, but is {}",
                min_time
            )));
        }
        let mut sim = Self::new();
        sim.min_time_between_events = min_time;
        Ok(sim)
    }

    /// Creates a simulation with the given start date.
    pub fn with_start_date(start_date: SystemTime) -> Self {
        let mut sim = Self::new();
        sim.start_date = start_date;
        sim
    }

    // REGISTRY ////////////////////////////////////////////////////////////////

    /// Registers an entity, assigning the next sequential id.
    ///
    /// If the simulation is already running, a `Create` event is additionally
    /// enqueued at the current time; processing it invokes the entity's
    /// `start`.
    ///
    /// Panics if an entity with the same name is already registered.
    pub fn add_entity(&mut self, entity: Rc<RefCell<dyn SimEntity>>) -> Id {
        let name = entity.borrow().name().to_owned();
        assert!(
            !self.name_to_id.contains_key(&name),
            "entity name '{}' is already used",
            name
        );
        let id = self.entities.len() as Id;
        self.name_to_id.insert(name.clone(), id);
        self.entities.push(EntityEntry {
            entity: entity.clone(),
            name,
            state: EntityState::Runnable,
            event_buffer: None,
            wait_predicate: None,
        });
        if self.running {
            let event = self.new_event(self.clock, id, id, 0, EventKind::Create { entity });
            self.future.add_event(event);
        }
        debug!(
            target: "simulation",
            "[{:.3} {} simulation] Added entity: {} ({})",
            self.clock,
            get_colored("DEBUG", colored::Color::Blue),
            self.entities[id as usize].name,
            id
        );
        id
    }

    /// Returns the entity with the given id.
    pub fn entity(&self, id: Id) -> Option<Rc<RefCell<dyn SimEntity>>> {
        self.entities.get(id as usize).map(|e| e.entity.clone())
    }

    /// Returns the entity with the given name.
    pub fn entity_by_name(&self, name: &str) -> Option<Rc<RefCell<dyn SimEntity>>> {
        self.lookup_id(name).and_then(|id| self.entity(id))
    }

    /// Returns the id of the entity with the given name.
    pub fn lookup_id(&self, name: &str) -> Option<Id> {
        self.name_to_id.get(name).copied()
    }

    /// Returns the name of the entity with the given id.
    pub fn entity_name(&self, id: Id) -> Option<&str> {
        self.entities.get(id as usize).map(|e| e.name.as_str())
    }

    /// Returns the number of registered entities.
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Returns the lifecycle state of the entity with the given id.
    ///
    /// Panics if no such entity is registered.
    pub fn entity_state(&self, id: Id) -> EntityState {
        self.entities[id as usize].state
    }

    /// Returns the Cloud Information Service registered during initialization.
    pub fn cis(&self) -> Rc<RefCell<CloudInformationService>> {
        self.cis.clone()
    }

    /// Returns the id of the Cloud Information Service entity.
    pub fn cis_id(&self) -> Id {
        0
    }

    // SCHEDULING //////////////////////////////////////////////////////////////

    /// Schedules a message from `src` to `dst` taking effect after `delay`.
    ///
    /// Fails with [`SimulationError::InvalidArgument`] if `delay` is negative.
    pub fn send<T: EventData>(
        &mut self,
        src: Id,
        dst: Id,
        delay: f64,
        tag: Tag,
        data: T,
    ) -> Result<EventId, SimulationError> {
        if delay < 0.0 {
            return Err(SimulationError::InvalidArgument(
                "send delay can't be negative".to_owned(),
            ));
        }
        let event = self.new_event(
            self.clock + delay,
            src,
            dst,
            tag,
            EventKind::Send { data: Box::new(data) },
        );
        let id = event.id;
        self.future.add_event(event);
        Ok(id)
    }

    /// Schedules a message taking effect at the current time.
    pub fn send_now<T: EventData>(&mut self, src: Id, dst: Id, tag: Tag, data: T) -> EventId {
        let event = self.new_event(self.clock, src, dst, tag, EventKind::Send { data: Box::new(data) });
        let id = event.id;
        self.future.add_event(event);
        id
    }

    /// Schedules a message ahead of all already scheduled events with the
    /// same time.
    ///
    /// Fails with [`SimulationError::InvalidArgument`] if `delay` is negative.
    pub fn send_first<T: EventData>(
        &mut self,
        src: Id,
        dst: Id,
        delay: f64,
        tag: Tag,
        data: T,
    ) -> Result<EventId, SimulationError> {
        if delay < 0.0 {
            return Err(SimulationError::InvalidArgument(
                "send delay can't be negative".to_owned(),
            ));
        }
        let event = self.new_event(
            self.clock + delay,
            src,
            dst,
            tag,
            EventKind::Send { data: Box::new(data) },
        );
        let id = event.id;
        self.future.add_event_first(event);
        Ok(id)
    }

    /// Blocks the entity until an event matching the predicate arrives.
    ///
    /// The `Any` sentinel is not stored: an unconditional wait matches the
    /// first event delivered to the entity.
    pub fn wait_for(&mut self, src: Id, predicate: EventPredicate) {
        let entry = &mut self.entities[src as usize];
        entry.state = EntityState::Waiting;
        if !predicate.is_any() {
            entry.wait_predicate = Some(predicate);
        }
    }

    /// Removes and returns the first deferred event addressed to `dst` that
    /// matches the predicate.
    pub fn select(&mut self, dst: Id, predicate: &EventPredicate) -> Option<Event> {
        let id = self
            .deferred
            .iter()
            .find(|e| e.dst == dst && predicate.matches(e))
            .map(|e| e.id)?;
        self.deferred.remove_by_id(id)
    }

    /// Returns a copy of the first deferred event addressed to `dst` that
    /// matches the predicate, without removing it.
    pub fn find_first_deferred(&self, dst: Id, predicate: &EventPredicate) -> Option<Event> {
        self.deferred
            .iter()
            .find(|e| e.dst == dst && predicate.matches(e))
            .cloned()
    }

    /// Counts the deferred events addressed to `dst` that match the predicate.
    pub fn waiting(&self, dst: Id, predicate: &EventPredicate) -> usize {
        self.deferred
            .iter()
            .filter(|e| e.dst == dst && predicate.matches(e))
            .count()
    }

    /// Removes and returns the first future event scheduled by `src` that
    /// matches the predicate.
    pub fn cancel(&mut self, src: Id, predicate: &EventPredicate) -> Option<Event> {
        let found = self
            .future
            .iter()
            .find(|e| e.src == src && predicate.matches(e))
            .cloned()?;
        self.future.remove(&found);
        Some(found)
    }

    /// Removes all future events scheduled by `src` that match the predicate.
    /// Returns whether any event was removed.
    pub fn cancel_all(&mut self, src: Id, predicate: &EventPredicate) -> bool {
        let matched: Vec<Event> = self
            .future
            .iter()
            .filter(|e| e.src == src && predicate.matches(e))
            .cloned()
            .collect();
        self.future.remove_all(&matched);
        !matched.is_empty()
    }

    /// Puts the entity on hold for the given delay; it becomes runnable again
    /// once the scheduled `HoldDone` event is processed.
    ///
    /// Fails with [`SimulationError::InvalidArgument`] if `delay` is negative.
    pub fn pause_entity(&mut self, src: Id, delay: f64) -> Result<(), SimulationError> {
        if delay < 0.0 {
            return Err(SimulationError::InvalidArgument(
                "hold delay can't be negative".to_owned(),
            ));
        }
        let event = self.new_event(self.clock + delay, src, src, 0, EventKind::HoldDone);
        self.future.add_event(event);
        self.entities[src as usize].state = EntityState::Holding;
        Ok(())
    }

    /// Alias of [`pause_entity`](Self::pause_entity).
    pub fn hold_entity(&mut self, src: Id, delay: f64) -> Result<(), SimulationError> {
        self.pause_entity(src, delay)
    }

    /// Removes and returns the event most recently delivered to the entity.
    pub fn take_event_buffer(&mut self, id: Id) -> Option<Event> {
        self.entities[id as usize].event_buffer.take()
    }

    /// Returns the next event available to the entity: its buffered event if
    /// any, else the first deferred event addressed to it. If neither exists,
    /// the entity is put into an unconditional wait and `None` is returned.
    pub fn fetch_next_event(&mut self, id: Id) -> Option<Event> {
        if let Some(event) = self.take_event_buffer(id) {
            return Some(event);
        }
        if let Some(event) = self.select(id, &EventPredicate::Any) {
            return Some(event);
        }
        self.wait_for(id, EventPredicate::Any);
        None
    }

    fn new_event(&mut self, time: f64, src: Id, dst: Id, tag: Tag, kind: EventKind) -> Event {
        let id = self.event_count;
        self.event_count += 1;
        Event {
            id,
            time,
            serial: 0,
            src,
            dst,
            tag,
            kind,
        }
    }

    // LIFECYCLE ///////////////////////////////////////////////////////////////

    /// Starts the simulation execution and blocks until it ends.
    ///
    /// This should be called after all initial entities have been registered.
    /// Returns the last clock value. Fails with
    /// [`SimulationError::IllegalState`] if the simulation has already run
    /// once; a paused simulation is continued with
    /// [`resume`](Self::resume) instead.
    pub fn start(&mut self) -> Result<f64, SimulationError> {
        if self.already_run_once {
            return Err(SimulationError::IllegalState(
                "the simulation has already run; a paused run is continued with resume()".to_owned(),
            ));
        }
        self.run_start();
        self.already_run_once = true;

        while self.running {
            self.run_clock_tick()?;
            if self.termination_attended() {
                debug!(
                    target: "simulation",
                    "[{:.3} {} simulation] Finished before completion on an explicit request",
                    self.clock,
                    get_colored("DEBUG", colored::Color::Blue)
                );
                break;
            }
            self.check_pause_request();
        }

        if let Some(time) = self.pending_tick.take() {
            self.notify_clock_tick(time);
        }
        let last_time = self.clock;
        self.finish_simulation();
        debug!(
            target: "simulation",
            "[{:.3} {} simulation] Simulation completed",
            self.clock,
            get_colored("DEBUG", colored::Color::Blue)
        );
        Ok(last_time)
    }

    /// Returns whether the simulation is running.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Returns whether the simulation is paused.
    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }

    /// Returns the current simulation time.
    pub fn clock(&self) -> f64 {
        self.clock
    }

    /// Returns the minimal period between events accepted by this simulation.
    pub fn min_time_between_events(&self) -> f64 {
        self.min_time_between_events
    }

    /// Returns the wall-clock date associated with the simulation start.
    pub fn start_date(&self) -> SystemTime {
        self.start_date
    }

    /// Returns the total number of created events.
    ///
    /// Cancelled events are also counted here.
    pub fn event_count(&self) -> u64 {
        self.event_count
    }

    /// Returns a handle for pause/resume coordination from another thread.
    pub fn controller(&self) -> SimulationControl {
        SimulationControl {
            paused: self.paused.clone(),
        }
    }

    /// Requests a pause at the current simulation time.
    pub fn pause(&mut self) -> bool {
        self.pause_at(self.clock)
    }

    /// Requests a pause once the clock reaches the given time.
    /// Returns `false` if `time` is in the past.
    pub fn pause_at(&mut self, time: f64) -> bool {
        if time < self.clock {
            false
        } else {
            self.pause_time = time;
            true
        }
    }

    /// Clears the pause latch. Returns whether the simulation was paused.
    pub fn resume(&mut self) -> bool {
        let was_paused = self.paused.swap(false, Ordering::SeqCst);
        if self.pause_time <= self.clock {
            self.pause_time = TIME_UNSET;
        }
        was_paused
    }

    /// Requests termination at the next loop iteration.
    /// Returns whether the simulation was running.
    pub fn terminate(&mut self) -> bool {
        if self.running {
            self.running = false;
            true
        } else {
            false
        }
    }

    /// Requests termination at the first clock value that is not below the
    /// given time. Returns `false` if `time` is not in the future.
    pub fn terminate_at(&mut self, time: f64) -> bool {
        if time <= self.clock {
            false
        } else {
            self.terminate_time = time;
            true
        }
    }

    /// Requests an abrupt termination: the run loop stops at its next
    /// iteration without draining entities.
    pub fn abort(&mut self) {
        self.abort_requested = true;
    }

    // LISTENERS ///////////////////////////////////////////////////////////////

    /// Registers a listener invoked after every processed event.
    pub fn add_on_event_processed_listener<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&Event) + 'static,
    {
        self.on_event_processed.add(Box::new(listener))
    }

    /// Deregisters an event-processed listener.
    /// Returns whether the listener was registered.
    pub fn remove_on_event_processed_listener(&mut self, id: ListenerId) -> bool {
        self.on_event_processed.remove(id)
    }

    /// Registers a listener invoked once per distinct clock value, after all
    /// events at that value have been processed.
    pub fn add_on_clock_tick_listener<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&EventInfo) + 'static,
    {
        self.on_clock_tick.add(Box::new(listener))
    }

    /// Deregisters a clock-tick listener.
    /// Returns whether the listener was registered.
    pub fn remove_on_clock_tick_listener(&mut self, id: ListenerId) -> bool {
        self.on_clock_tick.remove(id)
    }

    /// Registers a listener invoked when the simulation enters the paused
    /// state.
    pub fn add_on_simulation_paused_listener<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&EventInfo) + 'static,
    {
        self.on_simulation_paused.add(Box::new(listener))
    }

    /// Deregisters a simulation-paused listener.
    /// Returns whether the listener was registered.
    pub fn remove_on_simulation_paused_listener(&mut self, id: ListenerId) -> bool {
        self.on_simulation_paused.remove(id)
    }

    // RUN LOOP ////////////////////////////////////////////////////////////////

    fn run_start(&mut self) {
        self.running = true;
        let initial = self.entities.len();
        for i in 0..initial {
            let entity = self.entities[i].entity.clone();
            entity.borrow_mut().start(self, i as Id);
        }
        debug!(
            target: "simulation",
            "[{:.3} {} simulation] Entities started",
            self.clock,
            get_colored("DEBUG", colored::Color::Blue)
        );
    }

    fn run_clock_tick(&mut self) -> Result<(), SimulationError> {
        self.execute_runnable_entities();

        if self.future.is_empty() {
            self.running = false;
            debug!(
                target: "simulation",
                "[{:.3} {} simulation] No more future events",
                self.clock,
                get_colored("DEBUG", colored::Color::Blue)
            );
            return Ok(());
        }

        let first = self.future.pop_first().expect("future queue is not empty");
        let batch_time = first.time;
        self.process_event(first)?;
        // Events scheduled during processing join the batch if they carry the
        // same time, so the queue head is re-examined after every event
        // instead of iterating a snapshot.
        loop {
            match self.future.first() {
                Some(e) if e.time == batch_time => {
                    let event = self.future.pop_first().expect("future queue is not empty");
                    self.process_event(event)?;
                }
                _ => break,
            }
        }
        self.schedule_clock_tick_notification(batch_time);
        Ok(())
    }

    fn execute_runnable_entities(&mut self) {
        let runnable: Vec<Id> = self
            .entities
            .iter()
            .enumerate()
            .filter(|(_, e)| e.state == EntityState::Runnable)
            .map(|(i, _)| i as Id)
            .collect();
        for id in runnable {
            let entity = self.entities[id as usize].entity.clone();
            entity.borrow_mut().run(self, id);
        }
    }

    fn process_event(&mut self, event: Event) -> Result<(), SimulationError> {
        if event.time < self.clock {
            return Err(SimulationError::IllegalState(format!(
                "past event detected: event time {} is before the clock {}",
                event.time, self.clock
            )));
        }
        self.clock = event.time;

        if log_enabled!(Trace) {
            trace!(
                target: "simulation",
                "[{:.3} {} simulation] {}",
                event.time,
                get_colored("EVENT", colored::Color::BrightBlack),
                describe_event(&event)
            );
        }

        match &event.kind {
            EventKind::Null => {
                return Err(SimulationError::InvalidArgument(
                    "event has a null kind".to_owned(),
                ));
            }
            EventKind::Create { entity } => {
                let entity = entity.clone();
                let id = event.dst;
                debug!(
                    target: "simulation",
                    "[{:.3} {} simulation] Adding: {}",
                    self.clock,
                    get_colored("DEBUG", colored::Color::Blue),
                    entity.borrow().name()
                );
                entity.borrow_mut().start(self, id);
            }
            EventKind::Send { .. } => {
                let dst = event.dst as usize;
                if dst >= self.entities.len() {
                    return Err(SimulationError::InvalidArgument(format!(
                        "attempt to send to unknown entity {}",
                        event.dst
                    )));
                }
                let deliver = {
                    let entry = &self.entities[dst];
                    entry.state == EntityState::Waiting
                        && (event.tag == tags::URGENT_WAKEUP
                            || entry.wait_predicate.as_ref().map_or(true, |p| p.matches(&event)))
                };
                if deliver {
                    let entry = &mut self.entities[dst];
                    entry.event_buffer = Some(event.clone());
                    entry.state = EntityState::Runnable;
                    entry.wait_predicate = None;
                } else {
                    self.deferred.add_event(event.clone());
                }
            }
            EventKind::HoldDone => {
                let src = event.src as usize;
                if src >= self.entities.len() {
                    return Err(SimulationError::InvalidArgument(format!(
                        "unknown holding entity {}",
                        event.src
                    )));
                }
                self.entities[src].state = EntityState::Runnable;
            }
        }

        self.on_event_processed.notify(&event);
        Ok(())
    }

    fn schedule_clock_tick_notification(&mut self, batch_time: f64) {
        if let Some(pending) = self.pending_tick {
            if pending < batch_time {
                self.notify_clock_tick(pending);
            }
        }
        self.pending_tick = Some(batch_time);
    }

    fn notify_clock_tick(&mut self, time: f64) {
        if self.last_tick_notified == Some(time) {
            return;
        }
        self.last_tick_notified = Some(time);
        let info = EventInfo { time };
        self.on_clock_tick.notify(&info);
    }

    fn termination_attended(&mut self) -> bool {
        if self.abort_requested {
            return true;
        }
        if self.terminate_time > 0.0 && self.clock >= self.terminate_time {
            self.running = false;
            self.clock = self.terminate_time;
            return true;
        }
        false
    }

    fn check_pause_request(&mut self) {
        if self.pause_time <= TIME_UNSET || !self.running {
            return;
        }
        let next_event_after_pause = match self.future.first() {
            Some(e) => self.clock <= self.pause_time && e.time >= self.pause_time,
            None => self.clock >= self.pause_time,
        };
        if next_event_after_pause {
            self.do_pause();
            self.wait_for_resume();
        }
    }

    fn do_pause(&mut self) {
        self.paused.store(true, Ordering::SeqCst);
        self.clock = self.pause_time;
        let info = EventInfo { time: self.clock };
        self.on_simulation_paused.notify(&info);
    }

    fn wait_for_resume(&mut self) {
        while self.paused.load(Ordering::SeqCst) {
            thread::sleep(PAUSE_POLL_INTERVAL);
        }
        self.pause_time = TIME_UNSET;
    }

    fn finish_simulation(&mut self) {
        // An aborted run skips the final entity drain.
        if !self.abort_requested {
            let pending: Vec<Id> = self
                .entities
                .iter()
                .enumerate()
                .filter(|(_, e)| e.state != EntityState::Finished)
                .map(|(i, _)| i as Id)
                .collect();
            for id in pending {
                let entity = self.entities[id as usize].entity.clone();
                entity.borrow_mut().run(self, id);
            }
        }
        for event in self.deferred.iter() {
            log_undelivered_event(event);
        }
        for i in 0..self.entities.len() {
            let entity = self.entities[i].entity.clone();
            entity.borrow_mut().shutdown(self, i as Id);
            self.entities[i].state = EntityState::Finished;
        }
        self.running = false;
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new()
    }
}
