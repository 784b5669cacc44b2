//! Cloud Information Service.

use serde::Serialize;

use crate::component::Id;
use crate::entity::SimEntity;
use crate::event::Event;
use crate::simulation::Simulation;
use crate::{log_debug, log_trace, tags};

/// Reply payload listing the entities registered in the CIS directory.
#[derive(Clone, Serialize)]
pub struct ResourceList {
    /// Identifiers of the registered resource entities, in registration order.
    pub resources: Vec<Id>,
}

/// The directory of resource entities (data centers).
///
/// A CIS instance is constructed and registered by [`Simulation::new`] as a
/// normal entity with id 0; there is no process-wide state. Resource entities
/// announce themselves with [`tags::REGISTER_RESOURCE`] during startup, and
/// other entities obtain the directory with [`tags::RESOURCE_LIST_REQUEST`].
pub struct CloudInformationService {
    resources: Vec<Id>,
}

impl CloudInformationService {
    pub(crate) fn new() -> Self {
        Self { resources: Vec::new() }
    }

    /// Returns the ids of the registered resource entities.
    pub fn resources(&self) -> &[Id] {
        &self.resources
    }
}

impl SimEntity for CloudInformationService {
    fn name(&self) -> &str {
        "cis"
    }

    fn process_event(&mut self, sim: &mut Simulation, id: Id, event: Event) {
        match event.tag {
            tags::REGISTER_RESOURCE => {
                if !self.resources.contains(&event.src) {
                    self.resources.push(event.src);
                }
                log_debug!(sim, self.name(), "registered resource entity {}", event.src);
            }
            tags::RESOURCE_LIST_REQUEST => {
                let reply = ResourceList {
                    resources: self.resources.clone(),
                };
                sim.send_now(id, event.src, tags::RESOURCE_LIST_RESPONSE, reply);
            }
            _ => {
                log_trace!(sim, self.name(), "ignored event with tag {}", event.tag);
            }
        }
    }
}
