use crate::data_formats::TripData;
use crate::model::params::{ModelOutput, ModelParams};
use crate::plot::{PlotError, PlotResult};
use crate::stats::{finite_max, finite_min};

use rand::Rng;
use std::ops::Range;

pub const DEFAULT_SAMPLE_SIZE: usize = 200;
pub const PAIRPLOT_BINS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlotKind {
    Scatter2d,
    Scatter3d,
}

impl PlotKind {
    pub fn for_features(count: usize) -> PlotResult<Self> {
        match count {
            1 => Ok(PlotKind::Scatter2d),
            2 => Ok(PlotKind::Scatter3d),
            n => Err(PlotError::UnsupportedFeatureCount(n)),
        }
    }
}

/// Random rows of the table, restricted to the model's columns.
#[derive(Debug, Clone)]
pub struct FitSample {
    pub feature_names: Vec<String>,
    pub label_name: String,
    pub features: Vec<Vec<f64>>,
    pub label: Vec<f64>,
    pub predicted: Vec<f64>,
}

impl FitSample {
    pub fn from_rows(
        data: &TripData,
        feature_names: &[String],
        label_name: &str,
        rows: &[usize],
    ) -> PlotResult<Self> {
        let column = |name: &str| -> PlotResult<Vec<f64>> {
            let col = data
                .numeric_column(name)
                .ok_or_else(|| PlotError::UnknownColumn(name.to_owned()))?;
            Ok(rows.iter().map(|&i| col[i]).collect())
        };
        let features =
            feature_names.iter().map(|f| column(f.as_str())).collect::<PlotResult<Vec<_>>>()?;
        Ok(Self {
            feature_names: feature_names.to_vec(),
            label_name: label_name.to_owned(),
            features,
            label: column(label_name)?,
            predicted: Vec::new(),
        })
    }

    pub fn len(&self) -> usize {
        self.label.len()
    }

    pub fn is_empty(&self) -> bool {
        self.label.is_empty()
    }

    pub fn predicted_name(&self) -> String {
        format!("{}_PREDICTED", self.label_name)
    }

    pub fn row(&self, idx: usize) -> Vec<f64> {
        self.features.iter().map(|col| col[idx]).collect()
    }

    /// Fills the derived prediction column from the trained parameters.
    pub fn add_predictions(&mut self, params: &ModelParams) {
        self.predicted = (0..self.len()).map(|i| params.predict(&self.row(i))).collect();
    }
}

#[derive(Debug, Clone)]
pub struct LossCurve {
    pub epochs: Vec<usize>,
    pub rmse: Vec<f64>,
}

impl LossCurve {
    /// Y axis spans from 80% of the lowest error up to the highest.
    pub fn y_range(&self) -> Range<f64> {
        let lo = finite_min(&self.rmse) * 0.8;
        let hi = finite_max(&self.rmse);
        if !lo.is_finite() || !hi.is_finite() {
            return 0.0..1.0;
        }
        if hi > lo {
            lo..hi
        } else {
            lo..lo + 1.
        }
    }

    pub fn points(&self) -> Vec<(f64, f64)> {
        self.epochs.iter().zip(&self.rmse).map(|(&e, &r)| (e as f64, r)).collect()
    }
}

#[derive(Debug, Clone)]
pub enum ModelPlot {
    Line {
        feature: String,
        label: String,
        points: Vec<(f64, f64)>,
        fitted: Vec<(f64, f64)>,
    },
    /// Points and corners are (first feature, second feature, label).
    Plane {
        features: [String; 2],
        label: String,
        points: Vec<(f64, f64, f64)>,
        corners: [(f64, f64, f64); 3],
    },
}

impl ModelPlot {
    pub fn kind(&self) -> PlotKind {
        match self {
            ModelPlot::Line { .. } => PlotKind::Scatter2d,
            ModelPlot::Plane { .. } => PlotKind::Scatter3d,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExperimentFigure {
    pub loss: LossCurve,
    pub model: ModelPlot,
    pub sample: FitSample,
    pub params: ModelParams,
}

fn three_points(values: &[f64]) -> [f64; 3] {
    let (lo, hi) = (finite_min(values), finite_max(values));
    [lo, (lo + hi) / 2., hi]
}

/// Three points on the fitted plane. The label and second feature take their
/// sampled min, mid and max; the first feature is solved from the model.
pub fn plane_corners(
    sample: &FitSample,
    params: &ModelParams,
) -> PlotResult<[(f64, f64, f64); 3]> {
    if params.weights.len() != 2 || sample.features.len() != 2 {
        return Err(PlotError::UnsupportedFeatureCount(params.weights.len()));
    }
    let (w0, w1) = (params.weights[0], params.weights[1]);
    if w0 == 0. {
        return Err(PlotError::DegeneratePlane);
    }
    let z = three_points(&sample.predicted);
    let y = three_points(&sample.features[1]);

    let mut corners = [(0., 0., 0.); 3];
    for i in 0..3 {
        let x = (z[i] - w1 * y[i] - params.bias) / w0;
        corners[i] = (x, y[i], z[i]);
    }
    if corners.iter().any(|(x, y, z)| !(x.is_finite() && y.is_finite() && z.is_finite())) {
        return Err(PlotError::DegeneratePlane);
    }
    Ok(corners)
}

fn model_plot(sample: &FitSample, params: &ModelParams) -> PlotResult<ModelPlot> {
    match PlotKind::for_features(sample.features.len())? {
        PlotKind::Scatter2d => {
            let x = &sample.features[0];
            let points = x.iter().copied().zip(sample.label.iter().copied()).collect();
            let mut fitted: Vec<(f64, f64)> =
                x.iter().copied().zip(sample.predicted.iter().copied()).collect();
            fitted.sort_by(|a, b| a.0.total_cmp(&b.0));
            Ok(ModelPlot::Line {
                feature: sample.feature_names[0].clone(),
                label: sample.label_name.clone(),
                points,
                fitted,
            })
        },
        PlotKind::Scatter3d => {
            let points = (0..sample.len())
                .map(|i| (sample.features[0][i], sample.features[1][i], sample.label[i]))
                .collect();
            Ok(ModelPlot::Plane {
                features: [sample.feature_names[0].clone(), sample.feature_names[1].clone()],
                label: sample.label_name.clone(),
                points,
                corners: plane_corners(sample, params)?,
            })
        },
    }
}

/// Samples rows, derives predictions and lays out both panels.
pub fn build_figure<R: Rng>(
    data: &TripData,
    feature_names: &[String],
    label_name: &str,
    output: &ModelOutput,
    sample_size: usize,
    rng: &mut R,
) -> PlotResult<ExperimentFigure> {
    PlotKind::for_features(feature_names.len())?;
    if data.is_empty() || sample_size == 0 {
        return Err(PlotError::EmptySample);
    }
    if sample_size > data.len() {
        return Err(PlotError::SampleTooLarge { requested: sample_size, rows: data.len() });
    }
    let rows = rand::seq::index::sample(rng, data.len(), sample_size).into_vec();

    let mut sample = FitSample::from_rows(data, feature_names, label_name, &rows)?;
    sample.add_predictions(&output.params);

    Ok(ExperimentFigure {
        loss: LossCurve {
            epochs: output.history.epochs.clone(),
            rmse: output.history.rmse.clone(),
        },
        model: model_plot(&sample, &output.params)?,
        sample,
        params: output.params.clone(),
    })
}

/// Columns shown in the exploratory scatter grid.
#[derive(Debug, Clone)]
pub struct PairPlot {
    pub columns: Vec<(String, Vec<f64>)>,
}

impl PairPlot {
    pub fn from_data(data: &TripData, names: &[&str]) -> PlotResult<Self> {
        let columns = names
            .iter()
            .map(|&name| {
                data.numeric_column(name)
                    .map(|col| (name.to_owned(), col.to_vec()))
                    .ok_or_else(|| PlotError::UnknownColumn(name.to_owned()))
            })
            .collect::<PlotResult<Vec<_>>>()?;
        Ok(Self { columns })
    }
}

/// Equal-width bins over the finite values: (start, end, count).
pub fn histogram(values: &[f64], bins: usize) -> Vec<(f64, f64, usize)> {
    let (lo, hi) = (finite_min(values), finite_max(values));
    if bins == 0 || !lo.is_finite() || !hi.is_finite() {
        return Vec::new();
    }
    let width = if hi > lo { (hi - lo) / bins as f64 } else { 1. };
    let mut counts = vec![0usize; bins];
    for v in values.iter().filter(|v| v.is_finite()) {
        let idx = (((v - lo) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }
    counts
        .into_iter()
        .enumerate()
        .map(|(i, c)| (lo + i as f64 * width, lo + (i + 1) as f64 * width, c))
        .collect()
}

/// Axis range around the finite values with a 5% margin.
pub fn padded_range(values: &[f64]) -> Range<f64> {
    let (lo, hi) = (finite_min(values), finite_max(values));
    if !lo.is_finite() || !hi.is_finite() {
        return 0.0..1.0;
    }
    let span = hi - lo;
    if span == 0. {
        return (lo - 0.5)..(hi + 0.5);
    }
    (lo - span * 0.05)..(hi + span * 0.05)
}
