#[derive(thiserror::Error, Debug, PartialEq)]
pub enum FitError {
    #[error("features and label have different lengths: {rows} rows vs {labels} labels")]
    ShapeMismatch { rows: usize, labels: usize },
    #[error("model expects {expected} features, got {got}")]
    FeatureCount { expected: usize, got: usize },
    #[error("no rows to fit")]
    Empty,
    #[error("batch size must be at least 1")]
    InvalidBatchSize,
    #[error("non-finite value in training data")]
    NonFinite,
}

pub type FitResult<T> = Result<T, FitError>;
