//! Resource utilization models.

use std::cell::RefCell;
use std::collections::HashMap;

use dyn_clone::{clone_trait_object, DynClone};
use rand::prelude::*;
use rand_pcg::Pcg64;

/// A utilization model is a function defining the fraction of a resource a
/// cloudlet requests at a given simulation time, in the range [0, 1].
pub trait UtilizationModel: DynClone {
    fn utilization(&self, time: f64) -> f64;
}

clone_trait_object!(UtilizationModel);

/// Requests the whole resource at any time.
#[derive(Clone, Default)]
pub struct FullUtilization;

impl FullUtilization {
    pub fn new() -> Self {
        Default::default()
    }
}

impl UtilizationModel for FullUtilization {
    fn utilization(&self, _time: f64) -> f64 {
        1.
    }
}

/// Requests a fixed fraction of the resource at any time.
#[derive(Clone)]
pub struct ConstantUtilization {
    value: f64,
}

impl ConstantUtilization {
    /// Creates the model with the given fraction, clamped into [0, 1].
    pub fn new(value: f64) -> Self {
        Self {
            value: value.clamp(0., 1.),
        }
    }
}

impl UtilizationModel for ConstantUtilization {
    fn utilization(&self, _time: f64) -> f64 {
        self.value
    }
}

/// Requests a random fraction of the resource, stable per time value.
///
/// Repeated queries at the same time return the same value, so the schedulers
/// observe a consistent utilization within a tick.
#[derive(Clone)]
pub struct StochasticUtilization {
    rand: RefCell<Pcg64>,
    history: RefCell<HashMap<u64, f64>>,
}

impl StochasticUtilization {
    /// Creates the model with the specified random seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rand: RefCell::new(Pcg64::seed_from_u64(seed)),
            history: RefCell::new(HashMap::new()),
        }
    }
}

impl UtilizationModel for StochasticUtilization {
    fn utilization(&self, time: f64) -> f64 {
        *self
            .history
            .borrow_mut()
            .entry(time.to_bits())
            .or_insert_with(|| self.rand.borrow_mut().gen_range(0.0..1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stochastic_utilization_is_stable_per_time() {
        let model = StochasticUtilization::new(123);
        let u1 = model.utilization(1.5);
        let u2 = model.utilization(1.5);
        assert_eq!(u1, u2);
        assert!((0.0..1.0).contains(&u1));
        let u3 = model.utilization(2.5);
        assert!((0.0..1.0).contains(&u3));
    }
}
