//! Datacenter entity.

use std::collections::HashMap;
use std::rc::Rc;

use stratus_core::entity::SimEntity;
use stratus_core::event::Event;
use stratus_core::predicate::EventPredicate;
use stratus_core::simulation::Simulation;
use stratus_core::{log_debug, log_trace, log_warn, tags as core_tags, Id};

use crate::cloudlet::CloudletStatus;
use crate::cloudlet_scheduler::NO_NEXT_EVENT;
use crate::config::CloudConfig;
use crate::events::cloudlet::{CloudletControl, CloudletReturn, CloudletSubmit};
use crate::events::vm::{VmCreateAck, VmCreateRequest, VmDestroyRequest};
use crate::execution::CloudletExecution;
use crate::host::Host;
use crate::tags;
use crate::vm::Vm;
use crate::vm_allocation::VmAllocationPolicy;

/// An entity owning a set of hosts and a VM allocation policy.
///
/// The datacenter registers itself in the CIS directory on startup, places
/// VMs on request, admits cloudlets into their VM schedulers and drives host
/// processing with self-addressed update events scheduled at the predicted
/// next cloudlet completion (floored by the engine's minimal time between
/// events).
pub struct Datacenter {
    name: String,
    hosts: Vec<Host>,
    vm_to_host: HashMap<u32, usize>,
    policy: Box<dyn VmAllocationPolicy>,
    config: Rc<CloudConfig>,
}

impl Datacenter {
    pub fn new(
        name: &str,
        hosts: Vec<Host>,
        policy: Box<dyn VmAllocationPolicy>,
        config: Rc<CloudConfig>,
    ) -> Self {
        Self {
            name: name.to_owned(),
            hosts,
            vm_to_host: HashMap::new(),
            policy,
            config,
        }
    }

    pub fn hosts(&self) -> &[Host] {
        &self.hosts
    }

    /// Looks up a hosted VM by id.
    pub fn vm(&self, vm_id: u32) -> Option<&Vm> {
        let host = self.vm_to_host.get(&vm_id)?;
        self.hosts[*host].vm(vm_id)
    }

    fn vm_mut(&mut self, vm_id: u32) -> Option<&mut Vm> {
        let host = self.vm_to_host.get(&vm_id)?;
        self.hosts[*host].vm_mut(vm_id)
    }

    /// Ticks every host, returns finished cloudlets to their brokers and
    /// reschedules the next update at the earliest predicted completion.
    fn update_hosts_processing(&mut self, sim: &mut Simulation, id: Id) {
        let time = sim.clock();
        let mut next_event_time = NO_NEXT_EVENT;
        let mut finished: Vec<CloudletExecution> = Vec::new();
        for host in self.hosts.iter_mut() {
            next_event_time = next_event_time.min(host.update_vms_processing(time));
            finished.append(&mut host.take_finished_cloudlets());
        }

        for execution in finished {
            let status = execution.status();
            let cloudlet = execution.into_cloudlet();
            log_debug!(sim, &self.name, "cloudlet #{} finished", cloudlet.id());
            sim.send(
                id,
                cloudlet.broker(),
                self.config.message_delay,
                tags::CLOUDLET_RETURN,
                CloudletReturn { cloudlet, status },
            )
            .expect("message delay is non-negative");
        }

        sim.cancel_all(id, &EventPredicate::tag(tags::UPDATE_PROCESSING));
        if next_event_time != NO_NEXT_EVENT {
            let delay = (next_event_time - time).max(sim.min_time_between_events());
            sim.send(id, id, delay, tags::UPDATE_PROCESSING, ())
                .expect("update delay is non-negative");
        } else if self.config.scheduling_interval > 0. {
            sim.send(id, id, self.config.scheduling_interval, tags::UPDATE_PROCESSING, ())
                .expect("scheduling interval is non-negative");
        }
    }

    fn on_vm_create(&mut self, sim: &mut Simulation, id: Id, requester: Id, vm: Vm) {
        let vm_id = vm.id();
        let mut ack = VmCreateAck {
            vm_id,
            host_id: None,
            success: false,
        };
        if let Some(host_index) = self.policy.select_host_for_vm(&vm, &self.hosts) {
            if self.hosts[host_index].vm_create(vm) {
                self.vm_to_host.insert(vm_id, host_index);
                ack.host_id = Some(self.hosts[host_index].id());
                ack.success = true;
                log_debug!(
                    sim,
                    &self.name,
                    "vm #{} allocated on host #{}",
                    vm_id,
                    self.hosts[host_index].id()
                );
            }
        }
        if !ack.success {
            log_warn!(sim, &self.name, "not enough space for vm #{}", vm_id);
        }
        let delay = if ack.success {
            self.config.message_delay + self.config.vm_start_delay
        } else {
            self.config.message_delay
        };
        sim.send(id, requester, delay, tags::VM_CREATE_ACK, ack)
            .expect("ack delay is non-negative");
    }

    fn on_vm_destroy(&mut self, sim: &mut Simulation, vm_id: u32) {
        if let Some(host_index) = self.vm_to_host.remove(&vm_id) {
            self.hosts[host_index].vm_destroy(vm_id);
            self.policy.deallocate_host_for_vm(vm_id);
            log_debug!(sim, &self.name, "vm #{} deleted", vm_id);
        } else {
            log_trace!(sim, &self.name, "unknown vm #{}, nothing to delete", vm_id);
        }
    }

    fn on_cloudlet_submit(&mut self, sim: &mut Simulation, id: Id, cloudlet: crate::cloudlet::Cloudlet) {
        let vm_id = cloudlet.vm_id();
        let vm_pes = match self.vm(vm_id) {
            Some(vm) => vm.pes(),
            None => {
                log_warn!(sim, &self.name, "cloudlet #{} targets unknown vm #{}", cloudlet.id(), vm_id);
                Self::return_failed(sim, id, &self.config, cloudlet);
                return;
            }
        };
        if cloudlet.pes() > vm_pes {
            log_warn!(
                sim,
                &self.name,
                "cloudlet #{} requires {} PEs but vm #{} has {}",
                cloudlet.id(),
                cloudlet.pes(),
                vm_id,
                vm_pes
            );
            Self::return_failed(sim, id, &self.config, cloudlet);
            return;
        }
        let file_transfer_time = if self.config.storage_bandwidth_mbps > 0. {
            cloudlet.file_size_mb() as f64 / self.config.storage_bandwidth_mbps
        } else {
            0.
        };
        log_debug!(
            sim,
            &self.name,
            "cloudlet #{} submitted to vm #{}",
            cloudlet.id(),
            vm_id
        );
        let time = sim.clock();
        if let Some(vm) = self.vm_mut(vm_id) {
            vm.submit_cloudlet(cloudlet, file_transfer_time, time);
        }
        self.update_hosts_processing(sim, id);
    }

    fn return_failed(sim: &mut Simulation, id: Id, config: &CloudConfig, cloudlet: crate::cloudlet::Cloudlet) {
        let broker = cloudlet.broker();
        sim.send(
            id,
            broker,
            config.message_delay,
            tags::CLOUDLET_RETURN,
            CloudletReturn {
                cloudlet,
                status: CloudletStatus::Failed,
            },
        )
        .expect("message delay is non-negative");
    }
}

impl SimEntity for Datacenter {
    fn name(&self) -> &str {
        &self.name
    }

    fn start(&mut self, sim: &mut Simulation, id: Id) {
        sim.send_now(id, sim.cis_id(), core_tags::REGISTER_RESOURCE, ());
        if self.config.scheduling_interval > 0. {
            sim.send(id, id, self.config.scheduling_interval, tags::UPDATE_PROCESSING, ())
                .expect("scheduling interval is non-negative");
        }
    }

    fn process_event(&mut self, sim: &mut Simulation, id: Id, event: Event) {
        match event.tag {
            tags::VM_CREATE => {
                let request = event
                    .data::<VmCreateRequest>()
                    .expect("VM_CREATE carries a VmCreateRequest")
                    .clone();
                self.on_vm_create(sim, id, event.src, request.vm);
            }
            tags::VM_DESTROY => {
                let request = event
                    .data::<VmDestroyRequest>()
                    .expect("VM_DESTROY carries a VmDestroyRequest")
                    .clone();
                self.on_vm_destroy(sim, request.vm_id);
            }
            tags::CLOUDLET_SUBMIT => {
                let submit = event
                    .data::<CloudletSubmit>()
                    .expect("CLOUDLET_SUBMIT carries a CloudletSubmit")
                    .clone();
                self.on_cloudlet_submit(sim, id, submit.cloudlet);
            }
            tags::CLOUDLET_PAUSE => {
                let control = event
                    .data::<CloudletControl>()
                    .expect("CLOUDLET_PAUSE carries a CloudletControl")
                    .clone();
                self.update_hosts_processing(sim, id);
                if let Some(vm) = self.vm_mut(control.vm_id) {
                    vm.scheduler_mut().pause_cloudlet(control.cloudlet_id);
                }
                self.update_hosts_processing(sim, id);
            }
            tags::CLOUDLET_RESUME => {
                let control = event
                    .data::<CloudletControl>()
                    .expect("CLOUDLET_RESUME carries a CloudletControl")
                    .clone();
                if let Some(vm) = self.vm_mut(control.vm_id) {
                    vm.scheduler_mut().resume_cloudlet(control.cloudlet_id);
                }
                self.update_hosts_processing(sim, id);
            }
            tags::CLOUDLET_CANCEL => {
                let control = event
                    .data::<CloudletControl>()
                    .expect("CLOUDLET_CANCEL carries a CloudletControl")
                    .clone();
                self.update_hosts_processing(sim, id);
                let canceled = self
                    .vm_mut(control.vm_id)
                    .and_then(|vm| vm.scheduler_mut().cancel_cloudlet(control.cloudlet_id));
                if let Some(cloudlet) = canceled {
                    let broker = cloudlet.broker();
                    sim.send(
                        id,
                        broker,
                        self.config.message_delay,
                        tags::CLOUDLET_RETURN,
                        CloudletReturn {
                            cloudlet,
                            status: CloudletStatus::Canceled,
                        },
                    )
                    .expect("message delay is non-negative");
                }
                self.update_hosts_processing(sim, id);
            }
            tags::UPDATE_PROCESSING => {
                self.update_hosts_processing(sim, id);
            }
            _ => {
                log_trace!(sim, &self.name, "ignored event with tag {}", event.tag);
            }
        }
    }
}
