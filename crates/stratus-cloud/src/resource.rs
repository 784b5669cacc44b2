//! Capacity accounting for countable resources.

use serde::Serialize;

/// A capacity accountant for a countable resource (PEs, RAM, bandwidth).
///
/// Tracks how much of a fixed capacity is allocated; it does not model the
/// resource itself.
#[derive(Clone, Debug, Serialize)]
pub struct Resource {
    capacity: u64,
    allocated: u64,
}

impl Resource {
    pub fn new(capacity: u64) -> Self {
        Self {
            capacity,
            allocated: 0,
        }
    }

    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    pub fn allocated(&self) -> u64 {
        self.allocated
    }

    pub fn available(&self) -> u64 {
        self.capacity - self.allocated
    }

    /// Reserves the given amount. Returns whether enough capacity was
    /// available.
    pub fn allocate(&mut self, amount: u64) -> bool {
        if amount > self.available() {
            return false;
        }
        self.allocated += amount;
        true
    }

    /// Releases the given amount, saturating at zero.
    pub fn deallocate(&mut self, amount: u64) {
        self.allocated = self.allocated.saturating_sub(amount);
    }

    /// Overwrites the allocated amount, clamped to the capacity.
    pub fn set_allocated(&mut self, amount: u64) {
        self.allocated = amount.min(self.capacity);
    }

    /// Allocated fraction of the capacity, in [0, 1].
    pub fn percent_utilization(&self) -> f64 {
        if self.capacity == 0 {
            return 0.;
        }
        self.allocated as f64 / self.capacity as f64
    }
}
