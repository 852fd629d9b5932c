//! Holdout backtest of the seasonal model.
//!
//! The last `holdout` rows of the cleaned history are held out, a fresh model
//! is fitted on the rest and its predictions are scored on the held-out dates
//! they cover. Test dates missing from the prediction index are skipped.
//! The result is a diagnostic only; it never changes the forecast.

use crate::core::SalesHistory;
use crate::error::Result;
use crate::models::{FittedModel, SeasonalModel};
use crate::utils::metrics::calculate_metrics;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::{info, warn};

/// Accuracy diagnostic of one backtest.
#[derive(Debug, Clone, PartialEq)]
pub struct BacktestResult {
    /// Mean absolute error, absent when no test date was predicted.
    pub mean_absolute_error: Option<f64>,
    /// Root mean squared error over the same pairs.
    pub rmse: Option<f64>,
    /// Mean absolute percentage error, absent when an actual value is zero.
    pub mape: Option<f64>,
    /// Number of aligned (actual, predicted) pairs.
    pub scored: usize,
    pub train_size: usize,
    pub test_size: usize,
}

/// Configuration and driver for the holdout backtest.
#[derive(Debug, Clone)]
pub struct Backtester {
    min_history: usize,
    holdout: usize,
}

impl Default for Backtester {
    fn default() -> Self {
        Self::new(14, 7)
    }
}

impl Backtester {
    /// Run only on histories longer than `min_history`, holding out the last
    /// `holdout` rows.
    pub fn new(min_history: usize, holdout: usize) -> Self {
        Self {
            min_history,
            holdout,
        }
    }

    pub fn holdout(&self) -> usize {
        self.holdout
    }

    /// Whether a history is long enough to be backtested.
    pub fn should_run(&self, history: &SalesHistory) -> bool {
        history.len() > self.min_history
    }

    /// Fit on all but the last `holdout` rows and score the rest.
    pub fn run<M: SeasonalModel>(
        &self,
        model: &M,
        history: &SalesHistory,
    ) -> Result<BacktestResult> {
        let (train, test) = history.split_tail(self.holdout);

        let fitted = model.fit(&train)?;
        let predicted: BTreeMap<NaiveDate, f64> =
            fitted.predict(self.holdout)?.into_iter().collect();

        let (actual, estimates): (Vec<f64>, Vec<f64>) = test
            .points()
            .iter()
            .filter_map(|p| predicted.get(&p.date).map(|&yhat| (p.value, yhat)))
            .unzip();

        let metrics = calculate_metrics(&actual, &estimates);

        Ok(BacktestResult {
            mean_absolute_error: metrics.as_ref().map(|m| m.mae),
            rmse: metrics.as_ref().map(|m| m.rmse),
            mape: metrics.as_ref().and_then(|m| m.mape),
            scored: actual.len(),
            train_size: train.len(),
            test_size: test.len(),
        })
    }

    /// Run the backtest when the history is long enough and report it on the
    /// diagnostic channel.
    ///
    /// Failures are logged and swallowed. Returns `None` when the backtest
    /// was skipped or failed.
    pub fn evaluate<M: SeasonalModel>(
        &self,
        model: &M,
        history: &SalesHistory,
    ) -> Option<BacktestResult> {
        if !self.should_run(history) {
            return None;
        }

        match self.run(model, history) {
            Ok(result) => {
                if let Some(mae) = result.mean_absolute_error {
                    info!(
                        mae,
                        rmse = result.rmse,
                        mape = result.mape,
                        scored = result.scored,
                        "backtest MAE over last {} days: {:.2}",
                        self.holdout,
                        mae
                    );
                }
                Some(result)
            }
            Err(err) => {
                warn!(error = %err, "backtest skipped");
                None
            }
        }
    }
}
