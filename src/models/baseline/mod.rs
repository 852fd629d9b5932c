//! Baseline forecasting models.
//!
//! Simple methods used when the seasonal model cannot be trusted.

mod fallback;

pub use fallback::FallbackEstimator;
