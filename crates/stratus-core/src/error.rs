//! Error types reported by the simulation engine.

use thiserror::Error;

/// Errors raised by engine operations.
///
/// Soft failures keep their boolean or optional form instead: for example,
/// [`pause_at`](crate::Simulation::pause_at) with a time in the past returns
/// `false`, and entity lookups by name return `None` on a miss.
#[derive(Error, Debug)]
pub enum SimulationError {
    /// An operation was invoked with an argument outside its domain,
    /// e.g. a negative scheduling delay or an unknown destination entity.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// An operation was invoked in a lifecycle state that does not permit it,
    /// e.g. starting a simulation that has already run.
    #[error("illegal state: {0}")]
    IllegalState(String),
}
