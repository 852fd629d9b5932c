//! Numeric utilities shared by the pipeline stages.

pub mod metrics;
pub mod ols;
pub mod stats;

pub use metrics::{calculate_metrics, AccuracyMetrics};
pub use ols::{ridge_fit, OLSResult};
pub use stats::{mean, quantile, quartiles};
