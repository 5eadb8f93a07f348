use crate::model::dense::Dense;
use crate::model::fiterror::{FitError, FitResult};
use crate::model::optimizer::RmsProp;
use crate::model::params::{ModelOutput, ModelParams, TrainingHistory};

use nalgebra::{DMatrix, DVector};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{debug, info};

/// The training capability the experiment depends on: build an untrained
/// model, then fit it in place.
pub trait ModelBackend {
    type Handle;

    fn build(&mut self, learning_rate: f64, num_features: usize) -> Self::Handle;

    fn fit(
        &mut self,
        handle: &mut Self::Handle,
        features: &DMatrix<f64>,
        label: &DVector<f64>,
        epochs: usize,
        batch_size: usize,
    ) -> FitResult<ModelOutput>;
}

/// One linear unit trained with RMSprop on mean squared error.
#[derive(Debug, Clone)]
pub struct LinearModel {
    pub dense: Dense,
    pub optimizer: RmsProp,
}

impl LinearModel {
    pub fn num_features(&self) -> usize {
        self.dense.num_features()
    }

    pub fn params(&self) -> ModelParams {
        self.dense.params()
    }

    pub fn predict(&self, features: &DMatrix<f64>) -> DVector<f64> {
        self.dense.forward(features)
    }
}

pub struct DenseBackend {
    rng: StdRng,
}

impl Default for DenseBackend {
    fn default() -> Self {
        Self::new(None)
    }
}

impl DenseBackend {
    /// `seed` fixes weight initialisation and per-epoch shuffling.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self { rng }
    }
}

fn check_shapes(
    model: &LinearModel,
    features: &DMatrix<f64>,
    label: &DVector<f64>,
    batch_size: usize,
) -> FitResult<()> {
    if features.nrows() != label.len() {
        return Err(FitError::ShapeMismatch { rows: features.nrows(), labels: label.len() });
    }
    if features.ncols() != model.num_features() {
        return Err(FitError::FeatureCount {
            expected: model.num_features(),
            got: features.ncols(),
        });
    }
    if label.is_empty() {
        return Err(FitError::Empty);
    }
    if batch_size == 0 {
        return Err(FitError::InvalidBatchSize);
    }
    if features.iter().chain(label.iter()).any(|v| !v.is_finite()) {
        return Err(FitError::NonFinite);
    }
    Ok(())
}

impl ModelBackend for DenseBackend {
    type Handle = LinearModel;

    fn build(&mut self, learning_rate: f64, num_features: usize) -> LinearModel {
        LinearModel {
            dense: Dense::glorot(num_features, &mut self.rng),
            optimizer: RmsProp::new(learning_rate, num_features),
        }
    }

    fn fit(
        &mut self,
        model: &mut LinearModel,
        features: &DMatrix<f64>,
        label: &DVector<f64>,
        epochs: usize,
        batch_size: usize,
    ) -> FitResult<ModelOutput> {
        check_shapes(model, features, label, batch_size)?;

        let n = label.len();
        let mut order: Vec<usize> = (0..n).collect();
        let mut history = TrainingHistory::default();
        let start = std::time::Instant::now();

        for epoch in 0..epochs {
            order.shuffle(&mut self.rng);
            let mut sq_err = 0.;

            for batch in order.chunks(batch_size) {
                let x = features.select_rows(batch);
                let y = label.select_rows(batch);
                let residuals = model.dense.forward(&x) - y;
                sq_err += residuals.norm_squared();

                let (grad_w, grad_b) = Dense::mse_gradients(&x, &residuals);
                model.optimizer.step(&mut model.dense, &grad_w, grad_b);
            }

            let rmse = (sq_err / n as f64).sqrt();
            debug!("Epoch {}/{}: rmse = {:.4}", epoch + 1, epochs, rmse);
            history.push(epoch, rmse);
        }

        info!(
            "Trained {} epochs over {} rows in {:.2}s",
            epochs,
            n,
            start.elapsed().as_secs_f32()
        );
        Ok(ModelOutput { params: model.params(), history })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_data() -> (DMatrix<f64>, DVector<f64>) {
        let x: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|x| 2. * x + 1.).collect();
        (DMatrix::from_column_slice(10, 1, &x), DVector::from_vec(y))
    }

    #[test]
    fn test_converges_on_exact_line() {
        let (x, y) = line_data();
        let mut backend = DenseBackend::new(Some(42));
        let mut model = backend.build(0.01, 1);
        let out = backend.fit(&mut model, &x, &y, 2000, 5).unwrap();

        assert!((out.params.weights[0] - 2.).abs() < 0.1, "weight {}", out.params.weights[0]);
        assert!((out.params.bias - 1.).abs() < 0.1, "bias {}", out.params.bias);
        assert!(out.history.last_rmse().unwrap() < out.history.rmse[0]);
    }

    #[test]
    fn test_history_matches_epochs() {
        let (x, y) = line_data();
        let mut backend = DenseBackend::new(Some(1));
        let mut model = backend.build(0.001, 1);
        let out = backend.fit(&mut model, &x, &y, 20, 50).unwrap();
        assert_eq!(out.history.len(), 20);
        assert_eq!(out.history.epochs, (0..20).collect::<Vec<_>>());
        assert_eq!(out.params, model.params());
    }

    #[test]
    fn test_zero_epochs_leaves_model_untouched() {
        let (x, y) = line_data();
        let mut backend = DenseBackend::new(Some(3));
        let mut model = backend.build(0.001, 1);
        let before = model.params();
        let out = backend.fit(&mut model, &x, &y, 0, 4).unwrap();
        assert!(out.history.is_empty());
        assert_eq!(out.params, before);
    }

    #[test]
    fn test_two_features() {
        let x = DMatrix::from_row_slice(4, 2, &[0., 1., 1., 0., 2., 2., 3., 1.]);
        let y = DVector::from_fn(4, |i, _| x[(i, 0)] - x[(i, 1)] + 0.5);
        let mut backend = DenseBackend::new(Some(5));
        let mut model = backend.build(0.01, 2);
        let out = backend.fit(&mut model, &x, &y, 3, 2).unwrap();
        assert_eq!(out.params.weights.len(), 2);
        assert_eq!(model.predict(&x).len(), 4);
    }

    #[test]
    fn test_shape_errors() {
        let (x, y) = line_data();
        let mut backend = DenseBackend::new(Some(0));

        let mut model = backend.build(0.01, 1);
        let short = y.rows(0, 5).into_owned();
        assert_eq!(
            backend.fit(&mut model, &x, &short, 1, 2).unwrap_err(),
            FitError::ShapeMismatch { rows: 10, labels: 5 }
        );

        let mut wide = backend.build(0.01, 2);
        assert_eq!(
            backend.fit(&mut wide, &x, &y, 1, 2).unwrap_err(),
            FitError::FeatureCount { expected: 2, got: 1 }
        );

        assert_eq!(backend.fit(&mut model, &x, &y, 1, 0).unwrap_err(), FitError::InvalidBatchSize);

        let empty_x = DMatrix::<f64>::zeros(0, 1);
        let empty_y = DVector::<f64>::zeros(0);
        assert_eq!(backend.fit(&mut model, &empty_x, &empty_y, 1, 2).unwrap_err(), FitError::Empty);
    }

    #[test]
    fn test_non_finite_rejected() {
        let (mut x, y) = line_data();
        x[(3, 0)] = f64::NAN;
        let mut backend = DenseBackend::new(Some(0));
        let mut model = backend.build(0.01, 1);
        assert_eq!(backend.fit(&mut model, &x, &y, 1, 2).unwrap_err(), FitError::NonFinite);
    }
}
