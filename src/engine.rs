//! Seasonal model fit and future-window extraction.

use crate::core::{ForecastPoint, SalesHistory};
use crate::error::{ForecastError, Result};
use crate::models::{FittedModel, SeasonalModel};
use chrono::NaiveDate;
use tracing::debug;

/// Fits a seasonal model on a cleaned, anchored history and keeps the first
/// `horizon` predictions dated after `today`.
#[derive(Debug, Clone)]
pub struct ForecastEngine<M> {
    model: M,
    horizon: usize,
}

impl<M: SeasonalModel> ForecastEngine<M> {
    pub fn new(model: M, horizon: usize) -> Self {
        Self { model, horizon }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn horizon(&self) -> usize {
        self.horizon
    }

    /// Fit on `history` and forecast the days after `today`.
    ///
    /// Any fit or predict failure is returned as [`ForecastError::ModelFit`];
    /// nothing is retried.
    pub fn forecast(&self, history: &SalesHistory, today: NaiveDate) -> Result<Vec<ForecastPoint>> {
        let fitted = self.model.fit(history).map_err(as_model_fit)?;
        let predictions = fitted.predict(self.horizon).map_err(as_model_fit)?;

        let mut future: Vec<ForecastPoint> = predictions
            .into_iter()
            .filter(|(date, _)| *date > today)
            .map(|(date, estimate)| ForecastPoint::new(date, estimate))
            .collect();
        future.sort_by_key(|p| p.date);
        future.truncate(self.horizon);

        if let Some(bad) = future.iter().find(|p| !p.forecast.is_finite()) {
            return Err(ForecastError::model_fit(format!(
                "{} produced a non-finite forecast for {}",
                self.model.name(),
                bad.date
            )));
        }

        let dates: Vec<String> = future.iter().map(|p| p.date.to_string()).collect();
        debug!(model = self.model.name(), ?dates, "forecast dates");

        Ok(future)
    }
}

fn as_model_fit(err: ForecastError) -> ForecastError {
    match err {
        ForecastError::ModelFit(_) => err,
        other => ForecastError::ModelFit(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AdditiveSeasonalModel, Prediction};
    use chrono::Duration;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Predicts the day-of-history index, useful to check window selection.
    struct IndexModel;

    struct FittedIndex {
        last: NaiveDate,
        len: usize,
    }

    impl SeasonalModel for IndexModel {
        type Fitted = FittedIndex;

        fn fit(&self, history: &SalesHistory) -> Result<FittedIndex> {
            let last = history
                .latest_date()
                .ok_or_else(|| ForecastError::InvalidParameter("empty".to_string()))?;
            Ok(FittedIndex {
                last,
                len: history.len(),
            })
        }

        fn name(&self) -> &str {
            "Index"
        }
    }

    impl FittedModel for FittedIndex {
        fn predict(&self, horizon_days: usize) -> Result<Vec<Prediction>> {
            let first = self.last - Duration::days(self.len as i64 - 1);
            Ok((0..(self.len + horizon_days) as i64)
                .map(|i| (first + Duration::days(i), i as f64))
                .collect())
        }
    }

    #[test]
    fn keeps_first_horizon_days_after_today() {
        let today = date(2024, 3, 10);
        let history = SalesHistory::daily(date(2024, 2, 10), &[1.0; 30]);
        assert_eq!(history.latest_date(), Some(today));

        let points = ForecastEngine::new(IndexModel, 7)
            .forecast(&history, today)
            .unwrap();

        assert_eq!(points.len(), 7);
        assert_eq!(points[0].date, date(2024, 3, 11));
        assert_eq!(points[6].date, date(2024, 3, 17));
        assert_eq!(points[0].forecast, 30.0);
    }

    #[test]
    fn fit_errors_become_model_fit_errors() {
        let err = ForecastEngine::new(IndexModel, 7)
            .forecast(&SalesHistory::new(), date(2024, 1, 1))
            .unwrap_err();
        assert!(err.is_model_fit());
    }

    #[test]
    fn additive_model_forecast_starts_tomorrow() {
        let today = date(2024, 6, 30);
        let values: Vec<f64> = (0..60).map(|i| 30.0 + (i % 7) as f64).collect();
        let history = SalesHistory::daily(today - Duration::days(59), &values);

        let points = ForecastEngine::new(AdditiveSeasonalModel::default(), 7)
            .forecast(&history, today)
            .unwrap();

        assert_eq!(points.len(), 7);
        for (i, p) in points.iter().enumerate() {
            assert_eq!(p.date, today + Duration::days(i as i64 + 1));
            assert!(p.forecast.is_finite());
        }
    }

    #[test]
    fn degenerate_history_propagates() {
        let today = date(2024, 6, 30);
        let history = SalesHistory::daily(today, &[5.0]);
        let err = ForecastEngine::new(AdditiveSeasonalModel::default(), 7)
            .forecast(&history, today)
            .unwrap_err();
        assert!(err.is_model_fit());
    }
}
