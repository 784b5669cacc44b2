//! Predicates used for selective matching of events.

use std::rc::Rc;

use crate::component::Id;
use crate::event::{Event, Tag};

/// Decides whether an event matches a `wait`/`select`/`cancel` request.
#[derive(Clone)]
pub enum EventPredicate {
    /// Matches any event. This is the sentinel for unconditional waits and is
    /// never stored as a wait predicate.
    Any,
    /// Matches no event.
    None,
    /// Matches events satisfying the wrapped function.
    Custom(Rc<dyn Fn(&Event) -> bool>),
}

impl EventPredicate {
    /// Predicate matching events with the given tag.
    pub fn tag(tag: Tag) -> Self {
        Self::custom(move |e: &Event| e.tag == tag)
    }

    /// Predicate matching events with any of the given tags.
    pub fn tags(tags: &[Tag]) -> Self {
        let tags = tags.to_vec();
        Self::custom(move |e: &Event| tags.contains(&e.tag))
    }

    /// Predicate matching events scheduled by the given entity.
    pub fn from_source(src: Id) -> Self {
        Self::custom(move |e: &Event| e.src == src)
    }

    /// Predicate defined by an arbitrary function over events.
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&Event) -> bool + 'static,
    {
        Self::Custom(Rc::new(f))
    }

    /// Evaluates the predicate against an event.
    pub fn matches(&self, event: &Event) -> bool {
        match self {
            EventPredicate::Any => true,
            EventPredicate::None => false,
            EventPredicate::Custom(f) => f(event),
        }
    }

    /// Returns whether this is the `Any` sentinel.
    pub fn is_any(&self) -> bool {
        matches!(self, EventPredicate::Any)
    }
}
