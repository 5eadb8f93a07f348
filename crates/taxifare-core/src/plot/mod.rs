pub mod figure;
pub mod svg;

pub use figure::{
    build_figure, histogram, padded_range, plane_corners, ExperimentFigure, FitSample, LossCurve,
    ModelPlot, PairPlot, PlotKind, DEFAULT_SAMPLE_SIZE,
};
pub use svg::SvgPlotter;

#[derive(thiserror::Error, Debug)]
pub enum PlotError {
    #[error("cannot plot a model with {0} features, expected 1 or 2")]
    UnsupportedFeatureCount(usize),
    #[error("no rows to sample")]
    EmptySample,
    #[error("cannot sample {requested} rows from a table of {rows}")]
    SampleTooLarge { requested: usize, rows: usize },
    #[error("unknown numeric column: {0}")]
    UnknownColumn(String),
    #[error("fitted plane is undefined for a zero first weight")]
    DegeneratePlane,
    #[error("drawing failed: {0}")]
    Backend(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type PlotResult<T> = Result<T, PlotError>;

/// Rendering capability used by the reporter and the experiment driver.
pub trait Plotter {
    fn render_pairplot(&mut self, pairplot: &PairPlot) -> PlotResult<()>;
    fn render_experiment(&mut self, figure: &ExperimentFigure) -> PlotResult<()>;
}
