use nalgebra::DVector;
use serde::{Deserialize, Serialize};

/// Updates one factor row in place. `slot` identifies the row so stateful
/// optimizers can keep per-row history.
pub trait Optimizer {
    fn update(&mut self, slot: usize, params: &mut DVector<f32>, gradients: &DVector<f32>);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizerKind {
    Sgd,
    AdaGrad,
}

impl OptimizerKind {
    pub fn build(&self, learning_rate: f64, slots: usize) -> Box<dyn Optimizer> {
        match self {
            OptimizerKind::Sgd => Box::new(SGD::new(learning_rate)),
            OptimizerKind::AdaGrad => Box::new(AdaGrad::new(learning_rate, slots)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SGD {
    learning_rate: f64,
}

impl SGD {
    pub fn new(learning_rate: f64) -> Self {
        Self { learning_rate }
    }
}

impl Optimizer for SGD {
    fn update(&mut self, _slot: usize, params: &mut DVector<f32>, gradients: &DVector<f32>) {
        *params -= gradients * self.learning_rate as f32;
    }
}

/// Row-wise AdaGrad: each row keeps a single accumulator of the mean squared
/// gradient, starting at 1.0, and steps by `learning_rate / sqrt(accumulator)`.
#[derive(Debug, Clone)]
pub struct AdaGrad {
    learning_rate: f64,
    accumulators: Vec<f32>,
}

impl AdaGrad {
    pub const INITIAL_ACCUMULATOR: f32 = 1.0;

    pub fn new(learning_rate: f64, slots: usize) -> Self {
        Self {
            learning_rate,
            accumulators: vec![Self::INITIAL_ACCUMULATOR; slots],
        }
    }

    #[cfg(test)]
    fn accumulator(&self, slot: usize) -> Option<f32> {
        self.accumulators.get(slot).copied()
    }
}

impl Optimizer for AdaGrad {
    fn update(&mut self, slot: usize, params: &mut DVector<f32>, gradients: &DVector<f32>) {
        if slot >= self.accumulators.len() {
            self.accumulators.resize(slot + 1, Self::INITIAL_ACCUMULATOR);
        }

        let step = self.learning_rate as f32 / self.accumulators[slot].sqrt();
        *params -= gradients * step;

        let mean_squared = gradients.dot(gradients) / gradients.len().max(1) as f32;
        self.accumulators[slot] += mean_squared;
    }
}
