use crate::model::params::ModelParams;

use nalgebra::{DMatrix, DVector};
use rand::Rng;

/// A dense layer with one output unit and no activation.
#[derive(Debug, Clone)]
pub struct Dense {
    pub weights: DVector<f64>,
    pub bias: f64,
}

impl Dense {
    pub fn zeros(num_features: usize) -> Self {
        Self { weights: DVector::zeros(num_features), bias: 0. }
    }

    /// Glorot-uniform weights, zero bias.
    pub fn glorot<R: Rng>(num_features: usize, rng: &mut R) -> Self {
        let limit = (6. / (num_features as f64 + 1.)).sqrt();
        let weights = DVector::from_fn(num_features, |_, _| rng.random_range(-limit..limit));
        Self { weights, bias: 0. }
    }

    pub fn num_features(&self) -> usize {
        self.weights.len()
    }

    pub fn forward(&self, x: &DMatrix<f64>) -> DVector<f64> {
        (x * &self.weights).add_scalar(self.bias)
    }

    /// Gradients of the batch MSE given the residuals `prediction - target`.
    pub fn mse_gradients(x: &DMatrix<f64>, residuals: &DVector<f64>) -> (DVector<f64>, f64) {
        let scale = 2. / residuals.len() as f64;
        let grad_w = x.tr_mul(residuals) * scale;
        let grad_b = residuals.sum() * scale;
        (grad_w, grad_b)
    }

    pub fn params(&self) -> ModelParams {
        ModelParams::new(self.weights.iter().copied().collect(), self.bias)
    }
}
