//! Cloudlets: units of compute work.

use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;
use strum_macros::Display;

use stratus_core::Id;

use crate::utilization::{FullUtilization, UtilizationModel};

/// Lifecycle status of a cloudlet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Display)]
pub enum CloudletStatus {
    Created,
    Ready,
    Queued,
    InExec,
    Paused,
    Resumed,
    Success,
    Failed,
    Canceled,
}

/// A unit of compute work characterized by an instruction length, a PE
/// requirement and per-resource utilization models.
///
/// Cloudlets are immutable descriptors; execution bookkeeping lives in
/// [`CloudletExecution`](crate::execution::CloudletExecution). They travel as
/// event payloads between brokers and datacenters.
#[derive(Clone)]
pub struct Cloudlet {
    id: u32,
    length_mi: u64,
    pes: u32,
    ram_mb: u64,
    bw_mbps: u64,
    file_size_mb: u64,
    broker: Id,
    vm_id: u32,
    cpu_model: Box<dyn UtilizationModel>,
    ram_model: Box<dyn UtilizationModel>,
    bw_model: Box<dyn UtilizationModel>,
}

impl Serialize for Cloudlet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("Cloudlet", 3)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("length_mi", &self.length_mi)?;
        state.serialize_field("pes", &self.pes)?;
        state.end()
    }
}

impl Cloudlet {
    /// Creates a cloudlet with full CPU/RAM/BW utilization models.
    pub fn new(id: u32, length_mi: u64, pes: u32) -> Self {
        Self {
            id,
            length_mi,
            pes,
            ram_mb: 0,
            bw_mbps: 0,
            file_size_mb: 0,
            broker: 0,
            vm_id: 0,
            cpu_model: Box::new(FullUtilization::new()),
            ram_model: Box::new(FullUtilization::new()),
            bw_model: Box::new(FullUtilization::new()),
        }
    }

    pub fn with_ram(mut self, ram_mb: u64) -> Self {
        self.ram_mb = ram_mb;
        self
    }

    pub fn with_bw(mut self, bw_mbps: u64) -> Self {
        self.bw_mbps = bw_mbps;
        self
    }

    pub fn with_file_size(mut self, file_size_mb: u64) -> Self {
        self.file_size_mb = file_size_mb;
        self
    }

    pub fn with_cpu_model(mut self, model: Box<dyn UtilizationModel>) -> Self {
        self.cpu_model = model;
        self
    }

    pub fn with_ram_model(mut self, model: Box<dyn UtilizationModel>) -> Self {
        self.ram_model = model;
        self
    }

    pub fn with_bw_model(mut self, model: Box<dyn UtilizationModel>) -> Self {
        self.bw_model = model;
        self
    }

    /// Binds the cloudlet to the VM it should execute on.
    pub fn with_vm(mut self, vm_id: u32) -> Self {
        self.vm_id = vm_id;
        self
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn length_mi(&self) -> u64 {
        self.length_mi
    }

    pub fn pes(&self) -> u32 {
        self.pes
    }

    pub fn ram_mb(&self) -> u64 {
        self.ram_mb
    }

    pub fn bw_mbps(&self) -> u64 {
        self.bw_mbps
    }

    pub fn file_size_mb(&self) -> u64 {
        self.file_size_mb
    }

    /// Id of the broker entity notified about this cloudlet's completion.
    pub fn broker(&self) -> Id {
        self.broker
    }

    pub fn vm_id(&self) -> u32 {
        self.vm_id
    }

    pub fn cpu_model(&self) -> &dyn UtilizationModel {
        &*self.cpu_model
    }

    pub fn ram_model(&self) -> &dyn UtilizationModel {
        &*self.ram_model
    }

    pub fn bw_model(&self) -> &dyn UtilizationModel {
        &*self.bw_model
    }

    pub fn set_broker(&mut self, broker: Id) {
        self.broker = broker;
    }

    pub(crate) fn set_length_mi(&mut self, length_mi: u64) {
        self.length_mi = length_mi;
    }
}
