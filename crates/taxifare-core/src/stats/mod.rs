pub mod correlation;
pub mod stats;

pub use correlation::CorrelationMatrix;
pub use stats::{finite_max, finite_min, mse, pearson_correlation, rmse};
