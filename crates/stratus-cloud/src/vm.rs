//! Virtual machines.

use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;

use crate::cloudlet::Cloudlet;
use crate::cloudlet_scheduler::CloudletScheduler;
use crate::execution::CloudletExecution;
use crate::resource::Resource;

/// A virtual machine: a scheduling boundary owning one cloudlet scheduler
/// plus RAM and bandwidth capacity accounting.
#[derive(Clone)]
pub struct Vm {
    id: u32,
    mips_per_pe: f64,
    pes: u32,
    ram: Resource,
    bw: Resource,
    scheduler: Box<dyn CloudletScheduler>,
}

impl Serialize for Vm {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("Vm", 3)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("mips_per_pe", &self.mips_per_pe)?;
        state.serialize_field("pes", &self.pes)?;
        state.end()
    }
}

impl Vm {
    pub fn new(
        id: u32,
        mips_per_pe: f64,
        pes: u32,
        ram_mb: u64,
        bw_mbps: u64,
        mut scheduler: Box<dyn CloudletScheduler>,
    ) -> Self {
        scheduler.base_mut().init_vm(pes, mips_per_pe);
        Self {
            id,
            mips_per_pe,
            pes,
            ram: Resource::new(ram_mb),
            bw: Resource::new(bw_mbps),
            scheduler,
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn pes(&self) -> u32 {
        self.pes
    }

    pub fn mips_per_pe(&self) -> f64 {
        self.mips_per_pe
    }

    pub fn total_mips(&self) -> f64 {
        self.mips_per_pe * self.pes as f64
    }

    pub fn ram(&self) -> &Resource {
        &self.ram
    }

    pub fn bw(&self) -> &Resource {
        &self.bw
    }

    pub fn scheduler(&self) -> &dyn CloudletScheduler {
        &*self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut dyn CloudletScheduler {
        &mut *self.scheduler
    }

    /// Submits a cloudlet to the VM scheduler; see
    /// [`CloudletScheduler::submit`].
    pub fn submit_cloudlet(&mut self, cloudlet: Cloudlet, file_transfer_time: f64, time: f64) -> f64 {
        self.scheduler.submit(cloudlet, file_transfer_time, time)
    }

    /// Ticks the VM scheduler under the given MIPS share and refreshes the
    /// RAM/bandwidth accounting from the utilization it reports.
    ///
    /// Returns the estimated time of the next cloudlet completion.
    pub fn update_processing(&mut self, time: f64, mips_share: Vec<f64>) -> f64 {
        let next_event_time = self.scheduler.update_processing(time, mips_share);
        let ram_percent = self.scheduler.current_requested_ram_percent_utilization();
        let bw_percent = self.scheduler.current_requested_bw_percent_utilization();
        let ram = (ram_percent * self.ram.capacity() as f64) as u64;
        let bw = (bw_percent * self.bw.capacity() as f64) as u64;
        self.ram.set_allocated(ram);
        self.bw.set_allocated(bw);
        next_event_time
    }

    /// Drains the completions accumulated by the scheduler.
    pub fn take_finished_cloudlets(&mut self) -> Vec<CloudletExecution> {
        self.scheduler.take_finished()
    }
}
