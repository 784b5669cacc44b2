//! Physical hosts.

use serde::Serialize;

use crate::cloudlet_scheduler::NO_NEXT_EVENT;
use crate::execution::CloudletExecution;
use crate::resource::Resource;
use crate::vm::Vm;

/// Describes a result of checking whether a host can take a VM.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum AllocationVerdict {
    Success,
    NotEnoughPes,
    NotEnoughRam,
    NotEnoughBw,
}

/// A physical server hosting VMs.
///
/// PEs are granted to VMs space-shared: a hosted VM owns its full PE set, and
/// every processor update passes the VM the per-PE capacity of the host.
pub struct Host {
    id: u32,
    pes: Resource,
    mips_per_pe: f64,
    ram: Resource,
    bw: Resource,
    vms: Vec<Vm>,
}

impl Host {
    pub fn new(id: u32, pes: u32, mips_per_pe: f64, ram_mb: u64, bw_mbps: u64) -> Self {
        Self {
            id,
            pes: Resource::new(pes as u64),
            mips_per_pe,
            ram: Resource::new(ram_mb),
            bw: Resource::new(bw_mbps),
            vms: Vec::new(),
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn pes(&self) -> &Resource {
        &self.pes
    }

    pub fn mips_per_pe(&self) -> f64 {
        self.mips_per_pe
    }

    pub fn ram(&self) -> &Resource {
        &self.ram
    }

    pub fn bw(&self) -> &Resource {
        &self.bw
    }

    pub fn vms(&self) -> &[Vm] {
        &self.vms
    }

    pub fn vm(&self, vm_id: u32) -> Option<&Vm> {
        self.vms.iter().find(|vm| vm.id() == vm_id)
    }

    pub fn vm_mut(&mut self, vm_id: u32) -> Option<&mut Vm> {
        self.vms.iter_mut().find(|vm| vm.id() == vm_id)
    }

    /// Checks whether the host has the capacity to take the VM.
    pub fn can_host(&self, vm: &Vm) -> AllocationVerdict {
        if self.pes.available() < vm.pes() as u64 {
            return AllocationVerdict::NotEnoughPes;
        }
        if self.ram.available() < vm.ram().capacity() {
            return AllocationVerdict::NotEnoughRam;
        }
        if self.bw.available() < vm.bw().capacity() {
            return AllocationVerdict::NotEnoughBw;
        }
        AllocationVerdict::Success
    }

    /// Places the VM on the host, reserving its PEs, RAM and bandwidth.
    /// Returns whether the placement succeeded.
    pub fn vm_create(&mut self, vm: Vm) -> bool {
        if self.can_host(&vm) != AllocationVerdict::Success {
            return false;
        }
        self.pes.allocate(vm.pes() as u64);
        self.ram.allocate(vm.ram().capacity());
        self.bw.allocate(vm.bw().capacity());
        self.vms.push(vm);
        true
    }

    /// Removes the VM from the host, releasing its resources.
    pub fn vm_destroy(&mut self, vm_id: u32) -> Option<Vm> {
        let pos = self.vms.iter().position(|vm| vm.id() == vm_id)?;
        let vm = self.vms.remove(pos);
        self.pes.deallocate(vm.pes() as u64);
        self.ram.deallocate(vm.ram().capacity());
        self.bw.deallocate(vm.bw().capacity());
        Some(vm)
    }

    /// Drains the completions accumulated by the hosted VMs.
    pub fn take_finished_cloudlets(&mut self) -> Vec<CloudletExecution> {
        let mut finished = Vec::new();
        for vm in self.vms.iter_mut() {
            finished.append(&mut vm.take_finished_cloudlets());
        }
        finished
    }

    /// Ticks every hosted VM's scheduler, each under its full PE share.
    ///
    /// Returns the earliest estimated cloudlet completion across the VMs, or
    /// [`NO_NEXT_EVENT`] if no VM has running work.
    pub fn update_vms_processing(&mut self, time: f64) -> f64 {
        let mips_per_pe = self.mips_per_pe;
        let mut next_event_time = NO_NEXT_EVENT;
        for vm in self.vms.iter_mut() {
            let share = vec![mips_per_pe; vm.pes() as usize];
            let vm_next = vm.update_processing(time, share);
            next_event_time = next_event_time.min(vm_next);
        }
        next_event_time
    }
}
