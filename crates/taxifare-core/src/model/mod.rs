pub mod backend;
pub mod dense;
pub mod fiterror;
pub mod optimizer;
pub mod params;

pub use backend::{DenseBackend, LinearModel, ModelBackend};
pub use dense::Dense;
pub use fiterror::{FitError, FitResult};
pub use optimizer::RmsProp;
pub use params::{ModelOutput, ModelParams, TrainingHistory};
