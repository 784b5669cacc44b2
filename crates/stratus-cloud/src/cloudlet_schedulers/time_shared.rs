//! Time-shared discipline.

use crate::cloudlet_scheduler::{CloudletScheduler, CloudletSchedulerBase};
use crate::execution::CloudletExecution;

/// Shares the VM MIPS capacity proportionally among the executing cloudlets.
///
/// Each cloudlet receives the total share scaled by its PE requirement over
/// the PEs in use, capped by what its PEs could consume on the fastest PE of
/// the share.
#[derive(Clone, Default)]
pub struct TimeSharedScheduler {
    base: CloudletSchedulerBase,
}

impl TimeSharedScheduler {
    pub fn new() -> Self {
        Default::default()
    }
}

impl CloudletScheduler for TimeSharedScheduler {
    fn base(&self) -> &CloudletSchedulerBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut CloudletSchedulerBase {
        &mut self.base
    }

    fn allocated_mips_for_cloudlet(&self, execution: &CloudletExecution, _time: f64) -> f64 {
        let share = self.base.current_mips_share();
        let used_pes = self.base.used_pes();
        if share.is_empty() || used_pes == 0 {
            return 0.;
        }
        let pes = execution.used_pes() as f64;
        let allocated = share.total_mips() * pes / used_pes as f64;
        allocated.min(pes * share.max_pe_mips())
    }
}
