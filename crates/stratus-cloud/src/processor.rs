//! Processor snapshot of a MIPS share.

/// An immutable snapshot of the per-PE MIPS capacities available to a VM at
/// the current instant, built from the share passed to
/// `update_processing`.
#[derive(Clone, Debug, Default)]
pub struct Processor {
    pe_mips: Vec<f64>,
}

impl Processor {
    pub fn new(pe_mips: Vec<f64>) -> Self {
        Self { pe_mips }
    }

    /// Number of PEs in the share.
    pub fn pes(&self) -> u32 {
        self.pe_mips.len() as u32
    }

    /// Per-PE capacities.
    pub fn pe_mips(&self) -> &[f64] {
        &self.pe_mips
    }

    /// Sum of the per-PE capacities.
    pub fn total_mips(&self) -> f64 {
        self.pe_mips.iter().sum()
    }

    /// Capacity of the fastest PE in the share.
    pub fn max_pe_mips(&self) -> f64 {
        self.pe_mips.iter().cloned().fold(0., f64::max)
    }

    pub fn is_empty(&self) -> bool {
        self.pe_mips.is_empty()
    }
}
