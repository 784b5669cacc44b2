//! First Fit policy.

use crate::host::{AllocationVerdict, Host};
use crate::vm::Vm;
use crate::vm_allocation::VmAllocationPolicy;

/// Uses the first suitable host.
#[derive(Default)]
pub struct FirstFit;

impl FirstFit {
    pub fn new() -> Self {
        Default::default()
    }
}

impl VmAllocationPolicy for FirstFit {
    fn select_host_for_vm(&mut self, vm: &Vm, hosts: &[Host]) -> Option<usize> {
        hosts
            .iter()
            .position(|host| host.can_host(vm) == AllocationVerdict::Success)
    }
}
