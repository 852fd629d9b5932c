//! Forecasting models.

mod traits;

pub mod additive;
pub mod baseline;

pub use additive::{AdditiveSeasonalModel, FittedAdditiveModel, SeasonalityConfig};
pub use baseline::FallbackEstimator;
pub use traits::{FittedModel, Prediction, SeasonalModel};
