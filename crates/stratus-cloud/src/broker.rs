//! Datacenter broker entity.

use std::collections::HashMap;
use std::mem;
use std::rc::Rc;

use stratus_core::cis::ResourceList;
use stratus_core::entity::SimEntity;
use stratus_core::event::Event;
use stratus_core::simulation::Simulation;
use stratus_core::{log_debug, log_trace, log_warn, tags as core_tags, Id};

use crate::cloudlet::{Cloudlet, CloudletStatus};
use crate::config::CloudConfig;
use crate::events::cloudlet::{CloudletReturn, CloudletSubmit};
use crate::events::vm::{VmCreateAck, VmCreateRequest, VmDestroyRequest};
use crate::tags;
use crate::vm::Vm;

/// An entity acting on behalf of a cloud user: it obtains the datacenter
/// directory from the CIS, distributes its VMs across the datacenters
/// round-robin, submits each VM's cloudlets once the VM is running and
/// collects the results.
pub struct DatacenterBroker {
    name: String,
    vms: Vec<Vm>,
    cloudlets: Vec<Cloudlet>,
    datacenters: Vec<Id>,
    vm_locations: HashMap<u32, Id>,
    total_cloudlets: usize,
    finished: Vec<Cloudlet>,
    failed: Vec<Cloudlet>,
    config: Rc<CloudConfig>,
}

impl DatacenterBroker {
    pub fn new(name: &str, config: Rc<CloudConfig>) -> Self {
        Self {
            name: name.to_owned(),
            vms: Vec::new(),
            cloudlets: Vec::new(),
            datacenters: Vec::new(),
            vm_locations: HashMap::new(),
            total_cloudlets: 0,
            finished: Vec::new(),
            failed: Vec::new(),
            config,
        }
    }

    /// Adds a VM to create when the simulation starts.
    pub fn submit_vm(&mut self, vm: Vm) {
        self.vms.push(vm);
    }

    /// Adds a cloudlet to run on its bound VM.
    pub fn submit_cloudlet(&mut self, cloudlet: Cloudlet) {
        self.cloudlets.push(cloudlet);
    }

    /// Cloudlets that completed successfully.
    pub fn finished_cloudlets(&self) -> &[Cloudlet] {
        &self.finished
    }

    /// Cloudlets that failed or were canceled.
    pub fn failed_cloudlets(&self) -> &[Cloudlet] {
        &self.failed
    }

    fn on_resource_list(&mut self, sim: &mut Simulation, id: Id, datacenters: Vec<Id>) {
        self.datacenters = datacenters;
        if self.datacenters.is_empty() {
            log_warn!(sim, &self.name, "no datacenters are registered, failing all cloudlets");
            let cloudlets = mem::take(&mut self.cloudlets);
            self.failed.extend(cloudlets);
            return;
        }
        log_debug!(sim, &self.name, "received {} datacenter(s)", self.datacenters.len());
        for (i, vm) in mem::take(&mut self.vms).into_iter().enumerate() {
            let datacenter = self.datacenters[i % self.datacenters.len()];
            self.vm_locations.insert(vm.id(), datacenter);
            sim.send(
                id,
                datacenter,
                self.config.message_delay,
                tags::VM_CREATE,
                VmCreateRequest { vm },
            )
            .expect("message delay is non-negative");
        }
    }

    fn on_vm_create_ack(&mut self, sim: &mut Simulation, id: Id, ack: VmCreateAck) {
        let (bound, remaining): (Vec<Cloudlet>, Vec<Cloudlet>) = mem::take(&mut self.cloudlets)
            .into_iter()
            .partition(|c| c.vm_id() == ack.vm_id);
        self.cloudlets = remaining;
        if ack.success {
            log_debug!(sim, &self.name, "vm #{} is running", ack.vm_id);
            let datacenter = self.vm_locations[&ack.vm_id];
            for mut cloudlet in bound {
                cloudlet.set_broker(id);
                sim.send(
                    id,
                    datacenter,
                    self.config.message_delay,
                    tags::CLOUDLET_SUBMIT,
                    CloudletSubmit { cloudlet },
                )
                .expect("message delay is non-negative");
            }
        } else {
            log_warn!(sim, &self.name, "creation of vm #{} failed", ack.vm_id);
            self.vm_locations.remove(&ack.vm_id);
            self.failed.extend(bound);
            self.destroy_vms_when_done(sim, id);
        }
    }

    fn on_cloudlet_return(&mut self, sim: &mut Simulation, id: Id, returned: CloudletReturn) {
        log_debug!(
            sim,
            &self.name,
            "cloudlet #{} returned with status {}",
            returned.cloudlet.id(),
            returned.status
        );
        if returned.status == CloudletStatus::Success {
            self.finished.push(returned.cloudlet);
        } else {
            self.failed.push(returned.cloudlet);
        }
        self.destroy_vms_when_done(sim, id);
    }

    /// Tears the VMs down once every submitted cloudlet was accounted for.
    fn destroy_vms_when_done(&mut self, sim: &mut Simulation, id: Id) {
        if self.finished.len() + self.failed.len() < self.total_cloudlets {
            return;
        }
        for (vm_id, datacenter) in self.vm_locations.drain() {
            sim.send(
                id,
                datacenter,
                self.config.message_delay,
                tags::VM_DESTROY,
                VmDestroyRequest { vm_id },
            )
            .expect("message delay is non-negative");
        }
    }
}

impl SimEntity for DatacenterBroker {
    fn name(&self) -> &str {
        &self.name
    }

    fn start(&mut self, sim: &mut Simulation, id: Id) {
        self.total_cloudlets = self.cloudlets.len();
        sim.send_now(id, sim.cis_id(), core_tags::RESOURCE_LIST_REQUEST, ());
    }

    fn process_event(&mut self, sim: &mut Simulation, id: Id, event: Event) {
        match event.tag {
            core_tags::RESOURCE_LIST_RESPONSE => {
                let list = event
                    .data::<ResourceList>()
                    .expect("RESOURCE_LIST_RESPONSE carries a ResourceList")
                    .clone();
                self.on_resource_list(sim, id, list.resources);
            }
            tags::VM_CREATE_ACK => {
                let ack = event
                    .data::<VmCreateAck>()
                    .expect("VM_CREATE_ACK carries a VmCreateAck")
                    .clone();
                self.on_vm_create_ack(sim, id, ack);
            }
            tags::CLOUDLET_RETURN => {
                let returned = event
                    .data::<CloudletReturn>()
                    .expect("CLOUDLET_RETURN carries a CloudletReturn")
                    .clone();
                self.on_cloudlet_return(sim, id, returned);
            }
            _ => {
                log_trace!(sim, &self.name, "ignored event with tag {}", event.tag);
            }
        }
    }
}
