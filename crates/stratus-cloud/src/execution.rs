//! Per-VM execution records of cloudlets.

use crate::cloudlet::{Cloudlet, CloudletStatus};

/// Instructions per MI.
pub(crate) const MILLION: f64 = 1_000_000.;

const TIME_UNSET: f64 = -1.0;

/// The execution record a scheduler keeps for a single cloudlet: progress in
/// executed instructions, residual file transfer delay, cached allocation and
/// the last observed resource utilization.
#[derive(Clone)]
pub struct CloudletExecution {
    cloudlet: Cloudlet,
    status: CloudletStatus,
    file_transfer_time: f64,
    arrival_time: f64,
    finish_time: f64,
    length_instructions: u64,
    instructions_finished: u64,
    last_processing_time: f64,
    allocated_mips: f64,
    ram_utilization: f64,
    bw_utilization: f64,
}

impl CloudletExecution {
    pub fn new(cloudlet: Cloudlet, file_transfer_time: f64, arrival_time: f64) -> Self {
        let length_instructions = (cloudlet.length_mi() as f64 * MILLION) as u64;
        Self {
            cloudlet,
            status: CloudletStatus::Created,
            file_transfer_time,
            arrival_time,
            finish_time: TIME_UNSET,
            length_instructions,
            instructions_finished: 0,
            last_processing_time: arrival_time,
            allocated_mips: 0.,
            ram_utilization: 0.,
            bw_utilization: 0.,
        }
    }

    pub fn cloudlet(&self) -> &Cloudlet {
        &self.cloudlet
    }

    /// Consumes the record, returning the underlying cloudlet.
    pub fn into_cloudlet(self) -> Cloudlet {
        self.cloudlet
    }

    pub fn status(&self) -> CloudletStatus {
        self.status
    }

    pub fn set_status(&mut self, status: CloudletStatus) {
        self.status = status;
    }

    /// Residual delay before instruction execution may begin.
    pub fn file_transfer_time(&self) -> f64 {
        self.file_transfer_time
    }

    /// Consumes part of the residual file transfer delay.
    pub(crate) fn consume_file_transfer(&mut self, dt: f64) {
        self.file_transfer_time = (self.file_transfer_time - dt).max(0.);
    }

    pub fn arrival_time(&self) -> f64 {
        self.arrival_time
    }

    /// Time the cloudlet reached `Success`, or a negative value if it has not.
    pub fn finish_time(&self) -> f64 {
        self.finish_time
    }

    pub(crate) fn set_finish_time(&mut self, time: f64) {
        self.finish_time = time;
    }

    /// Number of PEs the cloudlet occupies while executing.
    pub fn used_pes(&self) -> u32 {
        self.cloudlet.pes()
    }

    /// Total instruction length to execute.
    pub fn length_instructions(&self) -> u64 {
        self.length_instructions
    }

    /// Instructions executed so far; never exceeds the length.
    pub fn instructions_finished(&self) -> u64 {
        self.instructions_finished
    }

    pub fn remaining_instructions(&self) -> u64 {
        self.length_instructions - self.instructions_finished
    }

    /// Adds executed instructions, capping at the total length.
    pub(crate) fn add_instructions(&mut self, instructions: u64) {
        self.instructions_finished =
            (self.instructions_finished + instructions).min(self.length_instructions);
    }

    pub fn has_finished(&self) -> bool {
        self.instructions_finished >= self.length_instructions
    }

    /// Truncates the length to the executed instructions, completing the
    /// cloudlet as-is.
    pub(crate) fn force_finish(&mut self) {
        self.length_instructions = self.instructions_finished;
        let length_mi = (self.length_instructions as f64 / MILLION) as u64;
        self.cloudlet.set_length_mi(length_mi);
    }

    /// Last time `update_processing` was applied to this record.
    pub fn last_processing_time(&self) -> f64 {
        self.last_processing_time
    }

    pub(crate) fn set_last_processing_time(&mut self, time: f64) {
        self.last_processing_time = time;
    }

    /// MIPS allocated at the last processor update.
    pub fn allocated_mips(&self) -> f64 {
        self.allocated_mips
    }

    pub(crate) fn set_allocated_mips(&mut self, mips: f64) {
        self.allocated_mips = mips;
    }

    /// RAM fraction requested at the last update.
    pub fn ram_utilization(&self) -> f64 {
        self.ram_utilization
    }

    /// Bandwidth fraction requested at the last update.
    pub fn bw_utilization(&self) -> f64 {
        self.bw_utilization
    }

    pub(crate) fn set_resource_utilization(&mut self, ram: f64, bw: f64) {
        self.ram_utilization = ram;
        self.bw_utilization = bw;
    }
}
