//! # sales-forecast
//!
//! Seven-day sales forecasting for a single item's daily history.
//!
//! The pipeline gates on data sufficiency, suppresses IQR outliers, anchors
//! stale histories at the current date, fits an additive trend/seasonality
//! model and runs a holdout backtest whose accuracy is reported on the
//! diagnostic channel only. Short histories fall back to a recent average.
//!
//! The seasonal model sits behind the [`models::SeasonalModel`] trait, so the
//! control logic can be exercised with any estimator.

pub mod backtest;
pub mod config;
pub mod core;
pub mod detection;
pub mod engine;
pub mod error;
pub mod models;
pub mod output;
pub mod pipeline;
pub mod transform;
pub mod utils;
pub mod validation;

pub use config::PipelineConfig;
pub use error::{ForecastError, Result};
pub use pipeline::{forecast_sales, ForecastPipeline};

pub mod prelude {
    pub use crate::backtest::{BacktestResult, Backtester};
    pub use crate::config::PipelineConfig;
    pub use crate::core::{
        ForecastOutcome, ForecastPath, ForecastPoint, ObservationPoint, SalesHistory,
    };
    pub use crate::error::{ForecastError, Result};
    pub use crate::models::{AdditiveSeasonalModel, FittedModel, SeasonalModel};
    pub use crate::output::ResultFormatter;
    pub use crate::pipeline::{forecast_sales, ForecastPipeline};
}
