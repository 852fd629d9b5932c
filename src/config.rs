//! Pipeline configuration.

use crate::error::{ForecastError, Result};

/// Tunable constants of the forecasting pipeline.
///
/// The defaults reproduce the production behaviour: a 7-day horizon, a
/// 30-point sufficiency threshold, a 1.5·IQR outlier fence and a 7-day
/// backtest holdout attempted above 14 cleaned points.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Number of future days to forecast.
    pub horizon: usize,
    /// Histories shorter than this use the fallback estimator.
    pub min_history: usize,
    /// IQR multiplier for the outlier fence.
    pub iqr_multiplier: f64,
    /// Number of trailing observations averaged by the fallback estimator.
    pub fallback_window: usize,
    /// The backtest runs only when the cleaned history is longer than this.
    pub backtest_min_history: usize,
    /// Number of trailing observations held out by the backtest.
    pub backtest_holdout: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            horizon: 7,
            min_history: 30,
            iqr_multiplier: 1.5,
            fallback_window: 7,
            backtest_min_history: 14,
            backtest_holdout: 7,
        }
    }
}

impl PipelineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_horizon(mut self, horizon: usize) -> Self {
        self.horizon = horizon;
        self
    }

    pub fn with_min_history(mut self, min_history: usize) -> Self {
        self.min_history = min_history;
        self
    }

    pub fn with_iqr_multiplier(mut self, multiplier: f64) -> Self {
        self.iqr_multiplier = multiplier;
        self
    }

    pub fn with_fallback_window(mut self, window: usize) -> Self {
        self.fallback_window = window;
        self
    }

    /// Set the backtest trigger length and the number of held-out points.
    pub fn with_backtest(mut self, min_history: usize, holdout: usize) -> Self {
        self.backtest_min_history = min_history;
        self.backtest_holdout = holdout;
        self
    }

    /// Check that the configuration can drive a forecast.
    pub fn validate(&self) -> Result<()> {
        if self.horizon == 0 {
            return Err(ForecastError::InvalidParameter(
                "horizon must be at least 1 day".to_string(),
            ));
        }
        if self.min_history == 0 {
            return Err(ForecastError::InvalidParameter(
                "min_history must be at least 1".to_string(),
            ));
        }
        if !self.iqr_multiplier.is_finite() || self.iqr_multiplier < 0.0 {
            return Err(ForecastError::InvalidParameter(format!(
                "iqr_multiplier must be a non-negative number, got {}",
                self.iqr_multiplier
            )));
        }
        if self.fallback_window == 0 {
            return Err(ForecastError::InvalidParameter(
                "fallback_window must be at least 1".to_string(),
            ));
        }
        if self.backtest_holdout == 0 {
            return Err(ForecastError::InvalidParameter(
                "backtest_holdout must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
