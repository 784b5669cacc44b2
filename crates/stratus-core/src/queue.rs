//! Future and deferred event queues.

use std::collections::BTreeSet;

use crate::event::{Event, EventId, FRONT_SERIAL};

/// The queue of events scheduled for future simulation times.
///
/// Events are kept in total order by `(time, serial, id)` ascending. Regular
/// insertions receive the next serial; front insertions receive
/// [`FRONT_SERIAL`], placing them ahead of every same-time event while
/// preserving the order among themselves.
pub struct FutureQueue {
    events: BTreeSet<Event>,
    next_serial: i64,
}

impl FutureQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self {
            events: BTreeSet::new(),
            next_serial: 0,
        }
    }

    /// Inserts the event at its sort position, assigning the next serial.
    pub fn add_event(&mut self, mut event: Event) {
        event.serial = self.next_serial;
        self.next_serial += 1;
        self.events.insert(event);
    }

    /// Inserts the event ahead of all existing events with the same time.
    pub fn add_event_first(&mut self, mut event: Event) {
        event.serial = FRONT_SERIAL;
        self.events.insert(event);
    }

    /// Returns the earliest event without removing it.
    pub fn first(&self) -> Option<&Event> {
        self.events.iter().next()
    }

    /// Removes and returns the earliest event.
    pub fn pop_first(&mut self) -> Option<Event> {
        let first = self.events.iter().next().cloned()?;
        self.events.remove(&first);
        Some(first)
    }

    /// Removes the given event, returning whether it was present.
    pub fn remove(&mut self, event: &Event) -> bool {
        self.events.remove(event)
    }

    /// Removes every event in the given collection.
    pub fn remove_all(&mut self, events: &[Event]) {
        for event in events {
            self.events.remove(event);
        }
    }

    /// Iterates the events in `(time, serial, id)` order.
    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }

    /// Returns the number of queued events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl Default for FutureQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// The queue of events that arrived at an entity which was not waiting for
/// them (or whose wait predicate rejected them).
///
/// Events retain arrival order so that `select` is deterministic.
pub struct DeferredQueue {
    events: Vec<Event>,
}

impl DeferredQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Appends an event.
    pub fn add_event(&mut self, event: Event) {
        self.events.push(event);
    }

    /// Removes and returns the event with the given id, if present.
    pub fn remove_by_id(&mut self, id: EventId) -> Option<Event> {
        let pos = self.events.iter().position(|e| e.id == id)?;
        Some(self.events.remove(pos))
    }

    /// Iterates the events in arrival order.
    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }

    /// Returns the number of queued events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl Default for DeferredQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventKind;

    fn event(id: EventId, time: f64) -> Event {
        Event {
            id,
            time,
            serial: 0,
            src: 0,
            dst: 1,
            tag: 0,
            kind: EventKind::Send { data: Box::new(()) },
        }
    }

    #[test]
    fn future_queue_orders_by_time_then_insertion() {
        let mut queue = FutureQueue::new();
        queue.add_event(event(0, 5.0));
        queue.add_event(event(1, 3.0));
        queue.add_event(event(2, 3.0));
        let order: Vec<EventId> = queue.iter().map(|e| e.id).collect();
        assert_eq!(order, vec![1, 2, 0]);
    }

    #[test]
    fn front_insert_precedes_same_time_events_only() {
        let mut queue = FutureQueue::new();
        queue.add_event(event(0, 3.0));
        queue.add_event(event(1, 5.0));
        queue.add_event_first(event(2, 5.0));
        let order: Vec<EventId> = queue.iter().map(|e| e.id).collect();
        assert_eq!(order, vec![0, 2, 1]);
        assert_eq!(queue.first().unwrap().id, 0);
    }

    #[test]
    fn future_queue_removes_by_identity() {
        let mut queue = FutureQueue::new();
        queue.add_event(event(0, 1.0));
        queue.add_event(event(1, 1.0));
        let target = queue.iter().find(|e| e.id == 0).cloned().unwrap();
        assert!(queue.remove(&target));
        assert!(!queue.remove(&target));
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.pop_first().unwrap().id, 1);
        assert!(queue.is_empty());
    }

    #[test]
    fn deferred_queue_keeps_arrival_order() {
        let mut queue = DeferredQueue::new();
        queue.add_event(event(3, 7.0));
        queue.add_event(event(1, 2.0));
        queue.add_event(event(2, 5.0));
        let order: Vec<EventId> = queue.iter().map(|e| e.id).collect();
        assert_eq!(order, vec![3, 1, 2]);
        assert_eq!(queue.remove_by_id(1).unwrap().id, 1);
        assert!(queue.remove_by_id(1).is_none());
        assert_eq!(queue.len(), 2);
    }
}
