//! VM-to-host allocation policies.

use std::collections::HashMap;

use crate::host::Host;
use crate::vm::Vm;

/// Strategy hook deciding which host takes a VM.
///
/// Datacenters invoke the policy during VM admission and may consult
/// [`optimize_allocation`](VmAllocationPolicy::optimize_allocation) for
/// periodic consolidation.
pub trait VmAllocationPolicy {
    /// Chooses a host for the VM, returning its index in `hosts`, or `None`
    /// when no host fits.
    fn select_host_for_vm(&mut self, vm: &Vm, hosts: &[Host]) -> Option<usize>;

    /// Notifies the policy that the VM was destroyed and its host released.
    fn deallocate_host_for_vm(&mut self, vm_id: u32) {
        let _ = vm_id;
    }

    /// Proposes VM-to-host reassignments for consolidation, as a map from VM
    /// id to target host index. The default proposes none.
    fn optimize_allocation(&mut self, hosts: &[Host]) -> HashMap<u32, usize> {
        let _ = hosts;
        HashMap::new()
    }
}
