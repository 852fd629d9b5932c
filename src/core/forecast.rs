//! Forecast rows and the outcome of one pipeline invocation.

use crate::backtest::BacktestResult;
use crate::error::{ForecastError, Result};
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// One forecast day of the primary output.
///
/// Serializes as `{"date": "YYYY-MM-DD", "forecast": <number>}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub forecast: f64,
}

impl ForecastPoint {
    pub fn new(date: NaiveDate, forecast: f64) -> Self {
        Self { date, forecast }
    }
}

/// Which branch of the pipeline produced the forecast.
#[derive(Debug, Clone, PartialEq)]
pub enum ForecastPath {
    /// Input was empty or lacked the date/value fields.
    Empty,
    /// History was too short; a recent average was used.
    Fallback { sample_size: usize },
    /// The seasonal model produced the forecast.
    Model {
        /// Backtest diagnostic, when one was attempted and scored.
        backtest: Option<BacktestResult>,
    },
}

/// Forecast rows plus the path that produced them.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastOutcome {
    pub points: Vec<ForecastPoint>,
    pub path: ForecastPath,
}

impl ForecastOutcome {
    pub fn empty() -> Self {
        Self {
            points: Vec::new(),
            path: ForecastPath::Empty,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn horizon(&self) -> usize {
        self.points.len()
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.forecast).collect()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self.path, ForecastPath::Fallback { .. })
    }
}

/// The `horizon` calendar days following `today`.
///
/// Fails when the window runs past the last representable date.
pub fn future_days(today: NaiveDate, horizon: usize) -> Result<Vec<NaiveDate>> {
    (1..=horizon as u64)
        .map(|i| {
            today.checked_add_days(Days::new(i)).ok_or_else(|| {
                ForecastError::InvalidParameter(format!(
                    "{} is too late to forecast {} days ahead",
                    today, horizon
                ))
            })
        })
        .collect()
}
