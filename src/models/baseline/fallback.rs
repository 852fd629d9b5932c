//! Recent-average forecast for histories too short for the seasonal model.

use crate::core::{future_days, ForecastPoint, SalesHistory};
use crate::error::Result;
use crate::utils::mean;
use chrono::NaiveDate;
use tracing::info;

/// Forecasts a flat line at the mean of the last `window` observations.
///
/// With fewer than `window` observations the mean of all of them is used.
#[derive(Debug, Clone)]
pub struct FallbackEstimator {
    window: usize,
    horizon: usize,
}

impl Default for FallbackEstimator {
    fn default() -> Self {
        Self::new(7, 7)
    }
}

impl FallbackEstimator {
    pub fn new(window: usize, horizon: usize) -> Self {
        Self { window, horizon }
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// The constant forecast value, `None` for an empty history.
    pub fn estimate(&self, history: &SalesHistory) -> Option<f64> {
        let recent = history.tail_values(self.window);
        if recent.is_empty() {
            return None;
        }
        Some(mean(&recent))
    }

    /// One point per day from tomorrow, all carrying the recent average.
    pub fn forecast(&self, history: &SalesHistory, today: NaiveDate) -> Result<Vec<ForecastPoint>> {
        let Some(average) = self.estimate(history) else {
            return Ok(Vec::new());
        };
        let dates = future_days(today, self.horizon)?;

        info!(
            sample_size = history.len(),
            average,
            "not enough data for a seasonal forecast (n={}), falling back to recent average",
            history.len()
        );

        Ok(dates
            .into_iter()
            .map(|date| ForecastPoint::new(date, average))
            .collect())
    }
}
