use crate::model::dense::Dense;

use nalgebra::DVector;

pub const RHO: f64 = 0.9;
pub const EPSILON: f64 = 1e-7;

/// RMS-propagation: each parameter's step is scaled by a running average
/// of its squared gradients.
#[derive(Debug, Clone)]
pub struct RmsProp {
    pub learning_rate: f64,
    pub rho: f64,
    pub epsilon: f64,
    velocity_w: DVector<f64>,
    velocity_b: f64,
}

impl RmsProp {
    pub fn new(learning_rate: f64, num_features: usize) -> Self {
        Self {
            learning_rate,
            rho: RHO,
            epsilon: EPSILON,
            velocity_w: DVector::zeros(num_features),
            velocity_b: 0.,
        }
    }

    pub fn step(&mut self, dense: &mut Dense, grad_w: &DVector<f64>, grad_b: f64) {
        let (rho, lr, eps) = (self.rho, self.learning_rate, self.epsilon);

        self.velocity_w.zip_apply(grad_w, |v, g| *v = rho * *v + (1. - rho) * g * g);
        self.velocity_b = rho * self.velocity_b + (1. - rho) * grad_b * grad_b;

        for ((w, g), v) in dense.weights.iter_mut().zip(grad_w.iter()).zip(self.velocity_w.iter())
        {
            *w -= lr * g / (v + eps).sqrt();
        }
        dense.bias -= lr * grad_b / (self.velocity_b + eps).sqrt();
    }
}
