use crate::data_formats::tripdata::{TripData, FARE, TRIP_MILES};
use crate::model::{FitError, ModelBackend, ModelOutput};
use crate::model_info::model_info;
use crate::plot::{build_figure, PlotError, Plotter, DEFAULT_SAMPLE_SIZE};

use itertools::Itertools;
use nalgebra::{DMatrix, DVector};
use rand::Rng;
use tracing::info;

#[derive(Debug, Clone, PartialEq)]
pub struct ExperimentConfig {
    pub feature_names: Vec<String>,
    pub label_name: String,
    pub learning_rate: f64,
    pub epochs: usize,
    pub batch_size: usize,
    pub sample_size: usize,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            feature_names: vec![TRIP_MILES.to_owned()],
            label_name: FARE.to_owned(),
            learning_rate: 0.001,
            epochs: 20,
            batch_size: 50,
            sample_size: DEFAULT_SAMPLE_SIZE,
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ExperimentError {
    #[error("unknown numeric column: {0}")]
    UnknownColumn(String),
    #[error("fit failed: {0}")]
    Fit(#[from] FitError),
    #[error("plot failed: {0}")]
    Plot(#[from] PlotError),
}

/// Feature matrix (rows x features) and label vector taken from the table.
pub fn training_arrays(
    data: &TripData,
    feature_names: &[String],
    label_name: &str,
) -> Result<(DMatrix<f64>, DVector<f64>), ExperimentError> {
    let column = |name: &str| {
        data.numeric_column(name).ok_or_else(|| ExperimentError::UnknownColumn(name.to_owned()))
    };
    let columns =
        feature_names.iter().map(|f| column(f.as_str())).collect::<Result<Vec<_>, _>>()?;
    let label = column(label_name)?;

    let x = DMatrix::from_fn(data.len(), columns.len(), |i, j| columns[j][i]);
    Ok((x, DVector::from_column_slice(label)))
}

pub fn start_banner(feature_names: &[String], label_name: &str) -> String {
    let features = feature_names.iter().map(|f| format!("'{}'", f)).join(", ");
    format!(
        "Info: starting the training experiment with features=[{}] and label={}",
        features, label_name
    )
}

/// Builds, trains, reports and plots one model configuration.
pub fn run_experiment<B, P, R>(
    data: &TripData,
    cfg: &ExperimentConfig,
    backend: &mut B,
    plotter: &mut P,
    rng: &mut R,
) -> Result<(B::Handle, ModelOutput), ExperimentError>
where
    B: ModelBackend,
    P: Plotter,
    R: Rng,
{
    println!("{}\n", start_banner(&cfg.feature_names, &cfg.label_name));

    let (features, label) = training_arrays(data, &cfg.feature_names, &cfg.label_name)?;
    let mut model = backend.build(cfg.learning_rate, cfg.feature_names.len());
    let output = backend.fit(&mut model, &features, &label, cfg.epochs, cfg.batch_size)?;
    info!(
        "Final rmse after {} epochs: {:?}",
        output.history.len(),
        output.history.last_rmse()
    );

    println!("Experiment Successful");
    println!("{}", model_info(&cfg.feature_names, &cfg.label_name, &output.params));

    let figure = build_figure(
        data,
        &cfg.feature_names,
        &cfg.label_name,
        &output,
        cfg.sample_size,
        rng,
    )?;
    plotter.render_experiment(&figure)?;

    Ok((model, output))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_formats::TripRecord;
    use crate::model::{DenseBackend, FitResult, ModelParams, TrainingHistory};
    use crate::plot::{ExperimentFigure, PairPlot, PlotKind, PlotResult};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn table() -> TripData {
        (0..10)
            .map(|i| TripRecord {
                trip_miles: i as f64,
                trip_seconds: 90. * i as f64,
                fare: 2. * i as f64 + 1.,
                company: "Chicago Independents".to_owned(),
                payment_type: "Cash".to_owned(),
                tip_rate: 0.,
            })
            .collect()
    }

    /// Returns fixed parameters and counts calls.
    #[derive(Default)]
    struct FixedBackend {
        built: Vec<(f64, usize)>,
    }

    impl ModelBackend for FixedBackend {
        type Handle = usize;

        fn build(&mut self, learning_rate: f64, num_features: usize) -> usize {
            self.built.push((learning_rate, num_features));
            num_features
        }

        fn fit(
            &mut self,
            handle: &mut usize,
            features: &DMatrix<f64>,
            label: &DVector<f64>,
            epochs: usize,
            _batch_size: usize,
        ) -> FitResult<ModelOutput> {
            assert_eq!(features.ncols(), *handle);
            assert_eq!(features.nrows(), label.len());
            let mut history = TrainingHistory::default();
            for e in 0..epochs {
                history.push(e, 1. / (e + 1) as f64);
            }
            Ok(ModelOutput { params: ModelParams::new(vec![2.; *handle], 1.), history })
        }
    }

    #[derive(Default)]
    struct Recorder {
        kinds: Vec<PlotKind>,
        sample_sizes: Vec<usize>,
    }

    impl Plotter for Recorder {
        fn render_pairplot(&mut self, _pairplot: &PairPlot) -> PlotResult<()> {
            Ok(())
        }
        fn render_experiment(&mut self, figure: &ExperimentFigure) -> PlotResult<()> {
            self.kinds.push(figure.model.kind());
            self.sample_sizes.push(figure.sample.len());
            Ok(())
        }
    }

    #[test]
    fn test_default_config() {
        let cfg = ExperimentConfig::default();
        assert_eq!(cfg.feature_names, vec!["TRIP_MILES"]);
        assert_eq!(cfg.label_name, "FARE");
        assert_eq!((cfg.learning_rate, cfg.epochs, cfg.batch_size), (0.001, 20, 50));
        assert_eq!(cfg.sample_size, 200);
    }

    #[test]
    fn test_start_banner() {
        assert_eq!(
            start_banner(&[TRIP_MILES.to_owned()], FARE),
            "Info: starting the training experiment with features=['TRIP_MILES'] and label=FARE"
        );
        let two = vec![TRIP_MILES.to_owned(), "TRIP_SECONDS".to_owned()];
        assert!(start_banner(&two, FARE).contains("features=['TRIP_MILES', 'TRIP_SECONDS']"));
    }

    #[test]
    fn test_training_arrays() {
        let names = vec![TRIP_MILES.to_owned(), "TRIP_SECONDS".to_owned()];
        let (x, y) = training_arrays(&table(), &names, FARE).unwrap();
        assert_eq!(x.shape(), (10, 2));
        assert_eq!(x[(3, 0)], 3.);
        assert_eq!(x[(3, 1)], 270.);
        assert_eq!(y[3], 7.);
        assert!(matches!(
            training_arrays(&table(), &names, "COMPANY"),
            Err(ExperimentError::UnknownColumn(_))
        ));
    }

    #[test]
    fn test_driver_single_feature() {
        let cfg = ExperimentConfig { sample_size: 5, ..Default::default() };
        let mut backend = FixedBackend::default();
        let mut plotter = Recorder::default();
        let mut rng = StdRng::seed_from_u64(11);
        let (handle, out) =
            run_experiment(&table(), &cfg, &mut backend, &mut plotter, &mut rng).unwrap();

        assert_eq!(handle, 1);
        assert_eq!(backend.built, vec![(0.001, 1)]);
        assert_eq!(out.history.len(), cfg.epochs);
        assert_eq!(plotter.kinds, vec![PlotKind::Scatter2d]);
        assert_eq!(plotter.sample_sizes, vec![5]);
    }

    #[test]
    fn test_driver_two_features_plots_plane() {
        let cfg = ExperimentConfig {
            feature_names: vec![TRIP_MILES.to_owned(), "TRIP_SECONDS".to_owned()],
            sample_size: 10,
            ..Default::default()
        };
        let mut backend = FixedBackend::default();
        let mut plotter = Recorder::default();
        let mut rng = StdRng::seed_from_u64(11);
        run_experiment(&table(), &cfg, &mut backend, &mut plotter, &mut rng).unwrap();
        assert_eq!(plotter.kinds, vec![PlotKind::Scatter3d]);
        assert_eq!(plotter.sample_sizes, vec![10]);
    }

    #[test]
    fn test_driver_with_dense_backend() {
        let cfg = ExperimentConfig {
            learning_rate: 0.01,
            epochs: 2000,
            batch_size: 5,
            sample_size: 10,
            ..Default::default()
        };
        let mut backend = DenseBackend::new(Some(42));
        let mut plotter = Recorder::default();
        let mut rng = StdRng::seed_from_u64(2);
        let (model, out) =
            run_experiment(&table(), &cfg, &mut backend, &mut plotter, &mut rng).unwrap();
        assert_eq!(model.params(), out.params);
        assert!((out.params.weights[0] - 2.).abs() < 0.1);
        assert!((out.params.bias - 1.).abs() < 0.1);
    }

    #[test]
    fn test_driver_unknown_label() {
        let cfg = ExperimentConfig { label_name: "TIPS".to_owned(), ..Default::default() };
        // label is checked before training or sampling
        let mut rng = StdRng::seed_from_u64(0);
        let res = run_experiment(
            &table(),
            &cfg,
            &mut FixedBackend::default(),
            &mut Recorder::default(),
            &mut rng,
        );
        assert!(matches!(res, Err(ExperimentError::UnknownColumn(name)) if name == "TIPS"));
    }
}
