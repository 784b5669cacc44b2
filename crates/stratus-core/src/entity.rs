//! Simulation entities.

use crate::component::Id;
use crate::event::Event;
use crate::simulation::Simulation;

/// Lifecycle state of an entity, managed by the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityState {
    /// The entity is executed on the next scheduler pass.
    Runnable,
    /// The entity is blocked until an event matching its wait predicate arrives.
    Waiting,
    /// The entity is blocked until its hold period elapses.
    Holding,
    /// The entity has shut down.
    Finished,
}

/// A cooperative actor driven by the simulation engine.
///
/// Entities are registered with [`Simulation::add_entity`] and receive their
/// id back in every callback; the engine owns the entity table and all
/// per-entity bookkeeping (state, event buffer, wait predicate), so entities
/// never hold a reference to the engine.
///
/// The default [`run`](SimEntity::run) implements the common cooperative
/// pattern: consume the buffered event, drain matching deferred events, and
/// re-arm an unconditional wait once there is nothing left. Most entities only
/// implement [`process_event`](SimEntity::process_event) and optionally
/// [`start`](SimEntity::start) for scheduling their initial events.
pub trait SimEntity {
    /// Returns the unique entity name.
    fn name(&self) -> &str;

    /// Invoked once when the simulation starts, or at creation time for
    /// entities added while the simulation is running.
    fn start(&mut self, sim: &mut Simulation, id: Id) {
        let _ = (sim, id);
    }

    /// Processes a single event delivered to this entity.
    fn process_event(&mut self, sim: &mut Simulation, id: Id, event: Event);

    /// Executes the entity while it is runnable.
    fn run(&mut self, sim: &mut Simulation, id: Id) {
        while let Some(event) = sim.fetch_next_event(id) {
            self.process_event(sim, id, event);
            if sim.entity_state(id) != EntityState::Runnable {
                break;
            }
        }
    }

    /// Invoked once when the simulation finishes.
    fn shutdown(&mut self, sim: &mut Simulation, id: Id) {
        let _ = (sim, id);
    }
}
