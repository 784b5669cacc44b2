#![warn(missing_docs)]
#![doc = include_str!("../readme.md")]

pub mod cis;
pub mod component;
pub mod entity;
pub mod error;
pub mod event;
pub mod listener;
pub mod log;
pub mod predicate;
pub mod queue;
pub mod simulation;
pub mod tags;

pub use colored;

pub use cis::CloudInformationService;
pub use component::Id;
pub use entity::{EntityState, SimEntity};
pub use error::SimulationError;
pub use event::{Event, EventData, EventId, EventKind, Tag};
pub use listener::{EventInfo, ListenerId};
pub use predicate::EventPredicate;
pub use simulation::{Simulation, SimulationControl};
