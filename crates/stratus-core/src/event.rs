//! Simulation events.

use std::cell::RefCell;
use std::cmp::Ordering;
use std::rc::Rc;

use downcast_rs::{impl_downcast, Downcast};
use dyn_clone::{clone_trait_object, DynClone};
use serde::ser::Serialize;

use crate::component::Id;
use crate::entity::SimEntity;

/// Event identifier.
///
/// Events are numbered sequentially starting from 0 in creation order.
pub type EventId = u64;

/// Domain-defined message type carried by every event.
pub type Tag = i32;

/// Serial assigned to events inserted at the front of the future queue,
/// making them order before any regularly inserted event with the same time.
pub const FRONT_SERIAL: i64 = -1;

/// Trait that should be implemented by event payload.
pub trait EventData: Downcast + DynClone + erased_serde::Serialize {}

impl_downcast!(EventData);

clone_trait_object!(EventData);

erased_serde::serialize_trait_object!(EventData);

impl<T: Serialize + DynClone + 'static> EventData for T {}

/// The kind of interaction an event represents, with a per-kind payload.
#[derive(Clone)]
pub enum EventKind {
    /// A message from one entity to another.
    Send {
        /// Opaque payload delivered to the destination entity.
        data: Box<dyn EventData>,
    },
    /// Registration of an entity added while the simulation is running;
    /// processing it starts the entity.
    Create {
        /// The entity to start.
        entity: Rc<RefCell<dyn SimEntity>>,
    },
    /// Wakes the source entity at the end of a hold period.
    HoldDone,
    /// An event without effect; processing it is an error.
    Null,
}

impl EventKind {
    /// Returns the kind name, for logging.
    pub fn name(&self) -> &'static str {
        match self {
            EventKind::Send { .. } => "Send",
            EventKind::Create { .. } => "Create",
            EventKind::HoldDone => "HoldDone",
            EventKind::Null => "Null",
        }
    }
}

/// Representation of event.
#[derive(Clone)]
pub struct Event {
    /// Unique event identifier.
    pub id: EventId,
    /// Time of event occurrence.
    pub time: f64,
    /// Insertion index assigned by the future queue, the tie-breaker among
    /// same-time events. [`FRONT_SERIAL`] marks front-inserted events.
    pub serial: i64,
    /// Identifier of event source.
    pub src: Id,
    /// Identifier of event destination.
    pub dst: Id,
    /// Domain-defined message type.
    pub tag: Tag,
    /// The interaction this event represents.
    pub kind: EventKind,
}

impl Event {
    /// Returns the payload downcast to the requested type, if this is a
    /// `Send` event carrying one.
    pub fn data<T: EventData>(&self) -> Option<&T> {
        match &self.kind {
            EventKind::Send { data } => data.downcast_ref::<T>(),
            _ => None,
        }
    }
}

impl Eq for Event {}

impl PartialEq for Event {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Ord for Event {
    fn cmp(&self, other: &Self) -> Ordering {
        self.time
            .total_cmp(&other.time)
            .then_with(|| self.serial.cmp(&other.serial))
            .then_with(|| self.id.cmp(&other.id))
    }
}

impl PartialOrd for Event {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
