//! Per-VM cloudlet scheduling.
//!
//! A cloudlet scheduler time-shares the PEs of a single VM among a dynamic
//! population of cloudlets. The algorithm shared by all disciplines lives in
//! the default methods of [`CloudletScheduler`]; a discipline only supplies
//! the MIPS allocation formula (and may override the waiting-list admission
//! order).

use dyn_clone::{clone_trait_object, DynClone};

use crate::cloudlet::{Cloudlet, CloudletStatus};
use crate::execution::{CloudletExecution, MILLION};
use crate::processor::Processor;

/// Double-precision drift guard: elapsed times below this value are treated
/// as zero.
pub const EPSILON: f64 = 1e-12;

/// Sentinel returned by [`CloudletScheduler::update_processing`] when the
/// scheduler has no running work and therefore no next completion time.
pub const NO_NEXT_EVENT: f64 = f64::MAX;

/// Receives network task processing hooks during scheduler updates, for
/// network-aware cloudlets.
pub trait PacketScheduler: DynClone {
    /// Invoked for every executing cloudlet on each processor update with the
    /// instruction progress (in MI) made during the elapsed interval.
    fn process_cloudlet_tasks(&mut self, cloudlet: &Cloudlet, executed_mi: u64);
}

clone_trait_object!(PacketScheduler);

/// State shared by every scheduling discipline: the four cloudlet lists, the
/// current MIPS share and the PE accounting of the owning VM.
#[derive(Clone, Default)]
pub struct CloudletSchedulerBase {
    exec: Vec<CloudletExecution>,
    waiting: Vec<CloudletExecution>,
    paused: Vec<CloudletExecution>,
    finished: Vec<CloudletExecution>,
    previous_time: f64,
    current_mips_share: Processor,
    used_pes: u32,
    vm_pes: u32,
    vm_mips_capacity: f64,
    packet_scheduler: Option<Box<dyn PacketScheduler>>,
}

impl CloudletSchedulerBase {
    /// Binds the scheduler to the PE configuration of its VM.
    pub(crate) fn init_vm(&mut self, pes: u32, mips_per_pe: f64) {
        self.vm_pes = pes;
        self.vm_mips_capacity = pes as f64 * mips_per_pe;
    }

    /// PEs of the VM not occupied by executing cloudlets.
    pub fn free_pes(&self) -> u32 {
        self.vm_pes.saturating_sub(self.used_pes)
    }

    /// PEs occupied by executing cloudlets.
    pub fn used_pes(&self) -> u32 {
        self.used_pes
    }

    /// Total PE count of the VM.
    pub fn vm_pes(&self) -> u32 {
        self.vm_pes
    }

    /// The MIPS share stored by the last processor update.
    pub fn current_mips_share(&self) -> &Processor {
        &self.current_mips_share
    }

    /// Time of the last processor update.
    pub fn previous_time(&self) -> f64 {
        self.previous_time
    }
}

/// The per-VM policy engine admitting cloudlets, tracking their instruction
/// progress under the discipline's MIPS allocation and reporting resource
/// utilization.
pub trait CloudletScheduler: DynClone {
    /// The shared scheduler state.
    fn base(&self) -> &CloudletSchedulerBase;

    /// The shared scheduler state, mutably.
    fn base_mut(&mut self) -> &mut CloudletSchedulerBase;

    /// Policy hook: MIPS the discipline allocates to the cloudlet at the
    /// given time under the current share.
    fn allocated_mips_for_cloudlet(&self, execution: &CloudletExecution, time: f64) -> f64;

    /// Admits a cloudlet: into execution if enough PEs are free, into the
    /// waiting list otherwise.
    ///
    /// Returns the predicted completion time, or 0 if the cloudlet was queued
    /// or no MIPS share is known yet.
    fn submit(&mut self, cloudlet: Cloudlet, file_transfer_time: f64, time: f64) -> f64 {
        let mut execution = CloudletExecution::new(cloudlet, file_transfer_time, time);
        if execution.used_pes() > self.base().free_pes() {
            execution.set_status(CloudletStatus::Queued);
            self.base_mut().waiting.push(execution);
            return 0.;
        }
        execution.set_status(CloudletStatus::InExec);
        let base = self.base_mut();
        base.used_pes += execution.used_pes();
        base.exec.push(execution);

        let allocated = {
            let execution = self.base().exec.last().unwrap();
            self.allocated_mips_for_cloudlet(execution, time)
        };
        let execution = self.base_mut().exec.last_mut().unwrap();
        execution.set_allocated_mips(allocated);
        if allocated <= 0. {
            return 0.;
        }
        file_transfer_time + execution.remaining_instructions() as f64 / (allocated * MILLION)
    }

    /// Applies one processor update at `current_time` under the given MIPS
    /// share: advances instruction progress of every executing cloudlet,
    /// completes the finished ones, admits waiting cloudlets onto freed PEs
    /// and re-evaluates allocations.
    ///
    /// Returns the estimated time of the next cloudlet completion, or
    /// [`NO_NEXT_EVENT`] if nothing is executing afterwards.
    fn update_processing(&mut self, current_time: f64, mips_share: Vec<f64>) -> f64 {
        self.base_mut().current_mips_share = Processor::new(mips_share);

        let allocations: Vec<f64> = self
            .base()
            .exec
            .iter()
            .map(|e| self.allocated_mips_for_cloudlet(e, current_time))
            .collect();

        let previous_time = self.base().previous_time;
        {
            let base = self.base_mut();
            for (execution, allocated) in base.exec.iter_mut().zip(allocations) {
                execution.set_allocated_mips(allocated);
                let mut dt = current_time - previous_time.max(execution.arrival_time());
                if dt.abs() < EPSILON {
                    dt = 0.;
                }
                let dt = dt.max(0.);
                let executed = if execution.file_transfer_time() > 0. {
                    // The residual transfer is consumed first; instruction
                    // progress resumes on the next update.
                    execution.consume_file_transfer(dt);
                    0
                } else {
                    (allocated * MILLION * dt).floor() as u64
                };
                execution.add_instructions(executed);
                execution.set_last_processing_time(current_time);
                let ram = execution.cloudlet().ram_model().utilization(current_time);
                let bw = execution.cloudlet().bw_model().utilization(current_time);
                execution.set_resource_utilization(ram, bw);
                if let Some(packet_scheduler) = base.packet_scheduler.as_mut() {
                    packet_scheduler
                        .process_cloudlet_tasks(execution.cloudlet(), executed / MILLION as u64);
                }
            }
        }

        {
            let base = self.base_mut();
            let mut i = 0;
            while i < base.exec.len() {
                if base.exec[i].has_finished() {
                    let mut done = base.exec.remove(i);
                    base.used_pes -= done.used_pes();
                    done.set_status(CloudletStatus::Success);
                    done.set_finish_time(current_time);
                    base.finished.push(done);
                } else {
                    i += 1;
                }
            }
        }

        self.move_waiting_to_exec();
        self.base_mut().previous_time = current_time;

        // Allocations change with the executing population, so they are
        // re-evaluated before estimating the next completion.
        let allocations: Vec<f64> = self
            .base()
            .exec
            .iter()
            .map(|e| self.allocated_mips_for_cloudlet(e, current_time))
            .collect();
        let base = self.base_mut();
        let mut next_event_time = NO_NEXT_EVENT;
        for (execution, allocated) in base.exec.iter_mut().zip(allocations) {
            execution.set_allocated_mips(allocated);
            if allocated <= 0. {
                continue;
            }
            let estimate =
                current_time + execution.remaining_instructions() as f64 / (allocated * MILLION);
            next_event_time = next_event_time.min(estimate);
        }
        next_event_time
    }

    /// Admits waiting cloudlets onto free PEs in FIFO order. Disciplines may
    /// override the selection order.
    fn move_waiting_to_exec(&mut self) {
        let base = self.base_mut();
        let mut free = base.vm_pes.saturating_sub(base.used_pes);
        let mut i = 0;
        while free > 0 && i < base.waiting.len() {
            if base.waiting[i].used_pes() <= free {
                let mut execution = base.waiting.remove(i);
                execution.set_status(CloudletStatus::InExec);
                free -= execution.used_pes();
                base.used_pes += execution.used_pes();
                base.exec.push(execution);
                // The admission frees up the scan: restart from the head so
                // selection stays FIFO among the remaining cloudlets.
                i = 0;
            } else {
                i += 1;
            }
        }
    }

    /// Removes the cloudlet from whichever list holds it, marking it
    /// canceled. Returns the cloudlet, or `None` if it is unknown.
    fn cancel_cloudlet(&mut self, cloudlet_id: u32) -> Option<Cloudlet> {
        let base = self.base_mut();
        if let Some(pos) = base.exec.iter().position(|e| e.cloudlet().id() == cloudlet_id) {
            let mut execution = base.exec.remove(pos);
            base.used_pes -= execution.used_pes();
            execution.set_status(CloudletStatus::Canceled);
            return Some(execution.into_cloudlet());
        }
        for list in [&mut base.waiting, &mut base.paused, &mut base.finished] {
            if let Some(pos) = list.iter().position(|e| e.cloudlet().id() == cloudlet_id) {
                let mut execution = list.remove(pos);
                execution.set_status(CloudletStatus::Canceled);
                return Some(execution.into_cloudlet());
            }
        }
        None
    }

    /// Moves the cloudlet from the execution or waiting list into the paused
    /// list, freezing its progress. Returns whether the cloudlet was found.
    fn pause_cloudlet(&mut self, cloudlet_id: u32) -> bool {
        let base = self.base_mut();
        if let Some(pos) = base.exec.iter().position(|e| e.cloudlet().id() == cloudlet_id) {
            let mut execution = base.exec.remove(pos);
            base.used_pes -= execution.used_pes();
            execution.set_status(CloudletStatus::Paused);
            base.paused.push(execution);
            return true;
        }
        if let Some(pos) = base.waiting.iter().position(|e| e.cloudlet().id() == cloudlet_id) {
            let mut execution = base.waiting.remove(pos);
            execution.set_status(CloudletStatus::Paused);
            base.paused.push(execution);
            return true;
        }
        false
    }

    /// Moves a paused cloudlet back into execution if PEs are available, into
    /// the waiting list otherwise.
    ///
    /// Returns the predicted completion time when it resumes execution, or 0.
    fn resume_cloudlet(&mut self, cloudlet_id: u32) -> f64 {
        let base = self.base_mut();
        let Some(pos) = base.paused.iter().position(|e| e.cloudlet().id() == cloudlet_id) else {
            return 0.;
        };
        let mut execution = base.paused.remove(pos);
        if execution.used_pes() > base.free_pes() {
            execution.set_status(CloudletStatus::Queued);
            base.waiting.push(execution);
            return 0.;
        }
        execution.set_status(CloudletStatus::InExec);
        base.used_pes += execution.used_pes();
        base.exec.push(execution);

        let time = self.base().previous_time;
        let allocated = {
            let execution = self.base().exec.last().unwrap();
            self.allocated_mips_for_cloudlet(execution, time)
        };
        let execution = self.base_mut().exec.last_mut().unwrap();
        execution.set_allocated_mips(allocated);
        if allocated <= 0. {
            return 0.;
        }
        time + execution.remaining_instructions() as f64 / (allocated * MILLION)
    }

    /// Force-completes the cloudlet as-is: its length is truncated to the
    /// executed instructions and it moves to the finished list.
    /// Returns whether the cloudlet was found.
    fn finish_cloudlet(&mut self, cloudlet_id: u32) -> bool {
        let base = self.base_mut();
        let execution = if let Some(pos) =
            base.exec.iter().position(|e| e.cloudlet().id() == cloudlet_id)
        {
            let execution = base.exec.remove(pos);
            base.used_pes -= execution.used_pes();
            Some(execution)
        } else if let Some(pos) = base.waiting.iter().position(|e| e.cloudlet().id() == cloudlet_id)
        {
            Some(base.waiting.remove(pos))
        } else {
            base.paused
                .iter()
                .position(|e| e.cloudlet().id() == cloudlet_id)
                .map(|pos| base.paused.remove(pos))
        };
        let Some(mut execution) = execution else {
            return false;
        };
        execution.force_finish();
        execution.set_status(CloudletStatus::Success);
        execution.set_finish_time(base.previous_time);
        base.finished.push(execution);
        true
    }

    /// Removes and returns the first executing cloudlet, for live migration.
    fn cloudlet_to_migrate(&mut self) -> Option<Cloudlet> {
        let base = self.base_mut();
        if base.exec.is_empty() {
            return None;
        }
        let execution = base.exec.remove(0);
        base.used_pes -= execution.used_pes();
        Some(execution.into_cloudlet())
    }

    /// MIPS the cloudlet requests at the given time: its CPU utilization
    /// model applied to the allocated MIPS.
    fn requested_mips_for_cloudlet(&self, execution: &CloudletExecution, time: f64) -> f64 {
        execution.cloudlet().cpu_model().utilization(time)
            * self.allocated_mips_for_cloudlet(execution, time)
    }

    /// Requested MIPS of all executing cloudlets relative to the total VM
    /// MIPS capacity, capped at 1.
    fn requested_cpu_percent_utilization(&self, time: f64) -> f64 {
        let base = self.base();
        if base.vm_mips_capacity <= 0. {
            return 0.;
        }
        let requested: f64 = base
            .exec
            .iter()
            .map(|e| self.requested_mips_for_cloudlet(e, time))
            .sum();
        (requested / base.vm_mips_capacity).min(1.)
    }

    /// RAM fraction requested by the executing cloudlets at the last update,
    /// capped at 1.
    fn current_requested_ram_percent_utilization(&self) -> f64 {
        self.base()
            .exec
            .iter()
            .map(|e| e.ram_utilization())
            .sum::<f64>()
            .min(1.)
    }

    /// Bandwidth fraction requested by the executing cloudlets at the last
    /// update, capped at 1.
    fn current_requested_bw_percent_utilization(&self) -> f64 {
        self.base()
            .exec
            .iter()
            .map(|e| e.bw_utilization())
            .sum::<f64>()
            .min(1.)
    }

    /// The executing cloudlets.
    fn exec_list(&self) -> &[CloudletExecution] {
        &self.base().exec
    }

    /// The cloudlets waiting for free PEs.
    fn waiting_list(&self) -> &[CloudletExecution] {
        &self.base().waiting
    }

    /// The paused cloudlets.
    fn paused_list(&self) -> &[CloudletExecution] {
        &self.base().paused
    }

    /// The finished cloudlets not yet collected.
    fn finished_list(&self) -> &[CloudletExecution] {
        &self.base().finished
    }

    /// Drains the finished list, handing the completions to the caller.
    fn take_finished(&mut self) -> Vec<CloudletExecution> {
        std::mem::take(&mut self.base_mut().finished)
    }

    /// The optional network packet scheduler.
    fn packet_scheduler(&self) -> Option<&dyn PacketScheduler> {
        self.base().packet_scheduler.as_deref()
    }

    /// Installs a network packet scheduler.
    fn set_packet_scheduler(&mut self, packet_scheduler: Box<dyn PacketScheduler>) {
        self.base_mut().packet_scheduler = Some(packet_scheduler);
    }
}

clone_trait_object!(CloudletScheduler);
