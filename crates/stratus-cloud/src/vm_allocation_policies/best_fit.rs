//! Best Fit policy.

use crate::host::{AllocationVerdict, Host};
use crate::vm::Vm;
use crate::vm_allocation::VmAllocationPolicy;

/// Uses the most loaded (by free PEs) suitable host.
#[derive(Default)]
pub struct BestFit;

impl BestFit {
    pub fn new() -> Self {
        Default::default()
    }
}

impl VmAllocationPolicy for BestFit {
    fn select_host_for_vm(&mut self, vm: &Vm, hosts: &[Host]) -> Option<usize> {
        let mut result: Option<usize> = None;
        let mut min_free_pes = u64::MAX;

        for (i, host) in hosts.iter().enumerate() {
            if host.can_host(vm) == AllocationVerdict::Success && host.pes().available() < min_free_pes
            {
                min_free_pes = host.pes().available();
                result = Some(i);
            }
        }
        result
    }
}
