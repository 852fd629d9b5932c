//! End-to-end forecasting pipeline.
//!
//! ```text
//! input → SeriesValidator ─┬─ empty ───────────────────────────────→ []
//!                          ├─ insufficient → FallbackEstimator ────→ rows
//!                          └─ sufficient → OutlierFilter → HistoryNormalizer
//!                                        → ForecastEngine ─────────→ rows
//!                                        ↘ Backtester (diagnostic only)
//! ```

use crate::backtest::Backtester;
use crate::config::PipelineConfig;
use crate::core::{ForecastOutcome, ForecastPath, SalesHistory};
use crate::detection::OutlierFilter;
use crate::engine::ForecastEngine;
use crate::error::Result;
use crate::models::{AdditiveSeasonalModel, FallbackEstimator, SeasonalModel};
use crate::transform::HistoryNormalizer;
use crate::validation::{Assessment, SeriesValidator};
use chrono::NaiveDate;
use serde_json::Value;
use tracing::{debug, info_span};

/// One configured forecasting pipeline.
///
/// Each call owns its history; the main forecast and the backtest fit
/// separate model instances produced from `model`.
#[derive(Debug, Clone)]
pub struct ForecastPipeline<M = AdditiveSeasonalModel> {
    config: PipelineConfig,
    model: M,
}

impl Default for ForecastPipeline<AdditiveSeasonalModel> {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}

impl ForecastPipeline<AdditiveSeasonalModel> {
    /// Pipeline backed by the default additive seasonal model.
    pub fn new(config: PipelineConfig) -> Self {
        Self::with_model(config, AdditiveSeasonalModel::default())
    }
}

impl<M: SeasonalModel> ForecastPipeline<M> {
    pub fn with_model(config: PipelineConfig, model: M) -> Self {
        Self { config, model }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Forecast from a JSON document.
    pub fn run_str(&self, input: &str, today: NaiveDate) -> Result<ForecastOutcome> {
        self.config.validate()?;
        let assessment = SeriesValidator::new(self.config.min_history).validate_str(input)?;
        self.run_assessment(assessment, today)
    }

    /// Forecast from an already-parsed JSON payload.
    pub fn run(&self, payload: &Value, today: NaiveDate) -> Result<ForecastOutcome> {
        self.config.validate()?;
        let assessment = SeriesValidator::new(self.config.min_history).validate(payload)?;
        self.run_assessment(assessment, today)
    }

    /// Forecast from a validated history, routing on its length.
    pub fn run_history(&self, history: SalesHistory, today: NaiveDate) -> Result<ForecastOutcome> {
        self.config.validate()?;
        let assessment = if history.is_empty() {
            Assessment::Empty
        } else if history.len() < self.config.min_history {
            Assessment::Insufficient(history)
        } else {
            Assessment::Sufficient(history)
        };
        self.run_assessment(assessment, today)
    }

    fn run_assessment(&self, assessment: Assessment, today: NaiveDate) -> Result<ForecastOutcome> {
        let span = info_span!("forecast", %today, model = self.model.name());
        let _guard = span.enter();

        match assessment {
            Assessment::Empty => Ok(ForecastOutcome::empty()),
            Assessment::Insufficient(history) => self.fallback(&history, today),
            Assessment::Sufficient(history) => self.model_forecast(history, today),
        }
    }

    fn fallback(&self, history: &SalesHistory, today: NaiveDate) -> Result<ForecastOutcome> {
        let estimator = FallbackEstimator::new(self.config.fallback_window, self.config.horizon);
        Ok(ForecastOutcome {
            points: estimator.forecast(history, today)?,
            path: ForecastPath::Fallback {
                sample_size: history.len(),
            },
        })
    }

    fn model_forecast(
        &self,
        mut history: SalesHistory,
        today: NaiveDate,
    ) -> Result<ForecastOutcome> {
        let report = OutlierFilter::new(self.config.iqr_multiplier).apply(&mut history);
        let anchored = HistoryNormalizer::new().anchor(&mut history, today);
        debug!(
            removed = report.removed,
            anchored,
            observations = history.len(),
            "cleaned history"
        );

        let engine = ForecastEngine::new(&self.model, self.config.horizon);
        let points = engine.forecast(&history, today)?;

        let backtest = Backtester::new(
            self.config.backtest_min_history,
            self.config.backtest_holdout,
        )
        .evaluate(&self.model, &history);

        Ok(ForecastOutcome {
            points,
            path: ForecastPath::Model { backtest },
        })
    }
}

/// Forecast with the default configuration and model.
///
/// # Example
/// ```
/// use sales_forecast::forecast_sales;
/// use chrono::NaiveDate;
///
/// let today = NaiveDate::from_ymd_opt(2024, 1, 20).unwrap();
/// let outcome = forecast_sales(r#"[{"ds": "2024-01-19", "y": 4}]"#, today).unwrap();
/// assert_eq!(outcome.points.len(), 7);
/// assert!(outcome.points.iter().all(|p| p.forecast == 4.0));
/// ```
pub fn forecast_sales(input: &str, today: NaiveDate) -> Result<ForecastOutcome> {
    ForecastPipeline::default().run_str(input, today)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn empty_history_routes_to_empty() {
        let outcome = ForecastPipeline::default()
            .run_history(SalesHistory::new(), date(2024, 1, 1))
            .unwrap();
        assert!(outcome.is_empty());
        assert_eq!(outcome.path, ForecastPath::Empty);
    }

    #[test]
    fn short_history_routes_to_fallback() {
        let history = SalesHistory::daily(date(2024, 1, 1), &[3.0; 12]);
        let outcome = ForecastPipeline::default()
            .run_history(history, date(2024, 1, 12))
            .unwrap();
        assert_eq!(outcome.path, ForecastPath::Fallback { sample_size: 12 });
        assert_eq!(outcome.values(), vec![3.0; 7]);
    }

    #[test]
    fn long_history_routes_to_model_with_backtest() {
        let today = date(2024, 4, 30);
        let values: Vec<f64> = (0..60).map(|i| 20.0 + (i % 7) as f64).collect();
        let history = SalesHistory::daily(today - Duration::days(65), &values);

        let outcome = ForecastPipeline::default().run_history(history, today).unwrap();

        assert_eq!(outcome.horizon(), 7);
        assert_eq!(outcome.points[0].date, date(2024, 5, 1));
        match outcome.path {
            ForecastPath::Model { backtest } => {
                let backtest = backtest.expect("backtest should run on 61 points");
                assert_eq!(backtest.test_size, 7);
            }
            other => panic!("expected model path, got {:?}", other),
        }
    }

    #[test]
    fn invalid_config_is_rejected() {
        let pipeline = ForecastPipeline::new(PipelineConfig::new().with_horizon(0));
        assert!(pipeline.run_str("[]", date(2024, 1, 1)).is_err());
    }
}
