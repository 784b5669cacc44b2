//! Standard event payloads.

// VM LIFECYCLE EVENTS /////////////////////////////////////////////////////////

pub mod vm {
    use serde::Serialize;

    use crate::vm::Vm;

    #[derive(Clone, Serialize)]
    pub struct VmCreateRequest {
        pub vm: Vm,
    }

    #[derive(Clone, Serialize)]
    pub struct VmCreateAck {
        pub vm_id: u32,
        pub host_id: Option<u32>,
        pub success: bool,
    }

    #[derive(Clone, Serialize)]
    pub struct VmDestroyRequest {
        pub vm_id: u32,
    }
}

// CLOUDLET EVENTS /////////////////////////////////////////////////////////////

pub mod cloudlet {
    use serde::Serialize;

    use crate::cloudlet::{Cloudlet, CloudletStatus};

    #[derive(Clone, Serialize)]
    pub struct CloudletSubmit {
        pub cloudlet: Cloudlet,
    }

    #[derive(Clone, Serialize)]
    pub struct CloudletReturn {
        pub cloudlet: Cloudlet,
        pub status: CloudletStatus,
    }

    /// Targets a cloudlet already submitted to a datacenter, for
    /// pause/resume/cancel requests.
    #[derive(Clone, Serialize)]
    pub struct CloudletControl {
        pub cloudlet_id: u32,
        pub vm_id: u32,
    }
}
