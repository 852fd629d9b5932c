//! Additive trend + Fourier seasonality model.
//!
//! The model decomposes a daily series as
//!
//! ```text
//! y(t) = intercept + slope·t + Σ δ_j·max(0, t - s_j) + Σ seasonal Fourier terms
//! ```
//!
//! where `t` is time scaled to `[0, 1]` over the training span and `s_j` are
//! trend changepoints spread over the first part of the history. Seasonal
//! terms are `sin/cos(2πk·d / P)` with `d` the number of days since the Unix
//! epoch, so the seasonal phase does not depend on where the history starts.
//!
//! Coefficients are fitted by penalised least squares: changepoint deltas are
//! shrunk by `1 / changepoint_prior_scale²` and seasonal terms by
//! `1 / prior_scale²`. Values are scaled by their maximum absolute value
//! before fitting so the penalties do not depend on sales volume.
//!
//! # Example
//! ```
//! use sales_forecast::core::SalesHistory;
//! use sales_forecast::models::{AdditiveSeasonalModel, FittedModel, SeasonalModel};
//! use chrono::NaiveDate;
//!
//! let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let values: Vec<f64> = (0..60)
//!     .map(|i| 20.0 + 5.0 * (2.0 * std::f64::consts::PI * i as f64 / 7.0).sin())
//!     .collect();
//! let history = SalesHistory::daily(start, &values);
//!
//! let fitted = AdditiveSeasonalModel::default().fit(&history).unwrap();
//! let predictions = fitted.predict(7).unwrap();
//! assert_eq!(predictions.len(), 67);
//! ```

use crate::core::{ObservationPoint, SalesHistory};
use crate::error::{ForecastError, Result};
use crate::models::{FittedModel, Prediction, SeasonalModel};
use crate::utils::{ridge_fit, OLSResult};
use chrono::{Days, NaiveDate};
use std::f64::consts::PI;
use tracing::{debug, trace};

/// Columns whose spread over the training dates is below this are dropped.
const CONSTANT_COLUMN_TOLERANCE: f64 = 1e-8;

/// One Fourier seasonal component.
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonalityConfig {
    pub name: String,
    /// Period length in days.
    pub period_days: f64,
    /// Number of sin/cos pairs.
    pub fourier_order: usize,
    /// Larger values allow stronger seasonal effects.
    pub prior_scale: f64,
}

impl SeasonalityConfig {
    pub fn new(name: &str, period_days: f64, fourier_order: usize) -> Self {
        Self {
            name: name.to_string(),
            period_days,
            fourier_order,
            prior_scale: 10.0,
        }
    }

    pub fn with_prior_scale(mut self, scale: f64) -> Self {
        self.prior_scale = scale;
        self
    }

    pub fn yearly() -> Self {
        Self::new("yearly", 365.25, 10)
    }

    pub fn weekly() -> Self {
        Self::new("weekly", 7.0, 3)
    }

    pub fn daily() -> Self {
        Self::new("daily", 1.0, 4)
    }
}

/// Additive seasonal model with daily, weekly and yearly seasonality.
#[derive(Debug, Clone)]
pub struct AdditiveSeasonalModel {
    seasonalities: Vec<SeasonalityConfig>,
    n_changepoints: usize,
    changepoint_range: f64,
    changepoint_prior_scale: f64,
}

impl Default for AdditiveSeasonalModel {
    fn default() -> Self {
        Self {
            seasonalities: vec![
                SeasonalityConfig::daily(),
                SeasonalityConfig::weekly(),
                SeasonalityConfig::yearly(),
            ],
            n_changepoints: 25,
            changepoint_range: 0.8,
            changepoint_prior_scale: 0.05,
        }
    }
}

impl AdditiveSeasonalModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// A model with a trend only and no seasonal components.
    pub fn trend_only() -> Self {
        Self {
            seasonalities: Vec::new(),
            ..Self::default()
        }
    }

    /// Add or replace a seasonal component (matched by name).
    pub fn with_seasonality(mut self, config: SeasonalityConfig) -> Self {
        self.seasonalities.retain(|s| s.name != config.name);
        self.seasonalities.push(config);
        self
    }

    /// Remove a seasonal component by name.
    pub fn without_seasonality(mut self, name: &str) -> Self {
        self.seasonalities.retain(|s| s.name != name);
        self
    }

    pub fn with_changepoints(mut self, n: usize) -> Self {
        self.n_changepoints = n;
        self
    }

    pub fn with_changepoint_range(mut self, range: f64) -> Self {
        self.changepoint_range = range;
        self
    }

    pub fn with_changepoint_prior_scale(mut self, scale: f64) -> Self {
        self.changepoint_prior_scale = scale;
        self
    }

    pub fn seasonalities(&self) -> &[SeasonalityConfig] {
        &self.seasonalities
    }

    fn check_parameters(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.changepoint_range) {
            return Err(ForecastError::InvalidParameter(format!(
                "changepoint_range must be in [0, 1], got {}",
                self.changepoint_range
            )));
        }
        if self.changepoint_prior_scale <= 0.0 {
            return Err(ForecastError::InvalidParameter(
                "changepoint_prior_scale must be positive".to_string(),
            ));
        }
        for s in &self.seasonalities {
            if s.period_days <= 0.0 || s.prior_scale <= 0.0 {
                return Err(ForecastError::InvalidParameter(format!(
                    "seasonality '{}' needs a positive period and prior scale",
                    s.name
                )));
            }
        }
        Ok(())
    }

    /// Changepoint locations in scaled time, spread over the first
    /// `changepoint_range` share of the rows.
    fn select_changepoints(&self, t: &[f64]) -> Vec<f64> {
        let hist_size = (t.len() as f64 * self.changepoint_range).floor() as usize;
        let n = self.n_changepoints.min(hist_size.saturating_sub(1));
        if n == 0 {
            return Vec::new();
        }

        let step = (hist_size - 1) as f64 / n as f64;
        let mut changepoints: Vec<f64> = (1..=n)
            .map(|i| t[(i as f64 * step).round() as usize])
            .collect();
        changepoints.dedup();
        changepoints
    }
}

/// A single column of the design matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Feature {
    Intercept,
    Slope,
    Hinge(f64),
    Sin { period: f64, k: usize },
    Cos { period: f64, k: usize },
}

impl Feature {
    fn is_seasonal(&self) -> bool {
        matches!(self, Feature::Sin { .. } | Feature::Cos { .. })
    }
}

/// Time coordinates of one date.
#[derive(Debug, Clone, Copy)]
struct TimePoint {
    /// Scaled trend time.
    t: f64,
    /// Days since the Unix epoch.
    epoch_days: f64,
}

impl TimePoint {
    fn feature(&self, feature: Feature) -> f64 {
        match feature {
            Feature::Intercept => 1.0,
            Feature::Slope => self.t,
            Feature::Hinge(s) => (self.t - s).max(0.0),
            Feature::Sin { period, k } => (2.0 * PI * k as f64 * self.epoch_days / period).sin(),
            Feature::Cos { period, k } => (2.0 * PI * k as f64 * self.epoch_days / period).cos(),
        }
    }
}

fn epoch_days(date: NaiveDate) -> f64 {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default();
    (date - epoch).num_days() as f64
}

impl SeasonalModel for AdditiveSeasonalModel {
    type Fitted = FittedAdditiveModel;

    fn fit(&self, history: &SalesHistory) -> Result<FittedAdditiveModel> {
        self.check_parameters()
            .map_err(|e| ForecastError::model_fit(e.to_string()))?;

        let rows: Vec<ObservationPoint> = history.sorted_by_date();
        if rows.len() < 2 {
            return Err(ForecastError::model_fit(format!(
                "need at least 2 observations, got {}",
                rows.len()
            )));
        }
        if let Some(bad) = rows.iter().find(|p| !p.value.is_finite()) {
            return Err(ForecastError::model_fit(format!(
                "non-finite value on {}",
                bad.date
            )));
        }

        let start = rows[0].date;
        let end = rows[rows.len() - 1].date;
        let span_days = (end - start).num_days() as f64;
        if span_days <= 0.0 {
            return Err(ForecastError::model_fit(
                "history needs at least 2 distinct dates",
            ));
        }

        let y_scale = rows
            .iter()
            .map(|p| p.value.abs())
            .fold(0.0_f64, f64::max);
        let y_scale = if y_scale > 0.0 { y_scale } else { 1.0 };

        let scaler = TimeScaler { start, span_days };
        let time: Vec<TimePoint> = rows.iter().map(|p| scaler.at(p.date)).collect();
        let t: Vec<f64> = time.iter().map(|tp| tp.t).collect();

        // Candidate columns with their ridge penalties
        let mut candidates: Vec<(Feature, f64)> =
            vec![(Feature::Intercept, 0.0), (Feature::Slope, 0.0)];
        let hinge_penalty = 1.0 / self.changepoint_prior_scale.powi(2);
        for s in self.select_changepoints(&t) {
            candidates.push((Feature::Hinge(s), hinge_penalty));
        }
        for season in &self.seasonalities {
            let penalty = 1.0 / season.prior_scale.powi(2);
            for k in 1..=season.fourier_order {
                let period = season.period_days;
                candidates.push((Feature::Sin { period, k }, penalty));
                candidates.push((Feature::Cos { period, k }, penalty));
            }
        }

        // Drop columns that carry no information on the training dates
        let (features, penalties): (Vec<Feature>, Vec<f64>) = candidates
            .into_iter()
            .filter(|(feature, _)| {
                if *feature == Feature::Intercept {
                    return true;
                }
                let (lo, hi) = time.iter().map(|tp| tp.feature(*feature)).fold(
                    (f64::INFINITY, f64::NEG_INFINITY),
                    |(lo, hi), x| (lo.min(x), hi.max(x)),
                );
                let informative = hi - lo > CONSTANT_COLUMN_TOLERANCE;
                if !informative {
                    trace!(?feature, "dropping constant feature");
                }
                informative
            })
            .unzip();

        let design: Vec<Vec<f64>> = time
            .iter()
            .map(|tp| features.iter().map(|&f| tp.feature(f)).collect())
            .collect();
        let y: Vec<f64> = rows.iter().map(|p| p.value / y_scale).collect();

        let coefficients = ridge_fit(&design, &y, &penalties)?;

        let mut history_dates: Vec<NaiveDate> = rows.iter().map(|p| p.date).collect();
        history_dates.dedup();

        debug!(
            model = self.name(),
            observations = rows.len(),
            features = features.len(),
            seasonal_features = features.iter().filter(|f| f.is_seasonal()).count(),
            "fitted additive seasonal model"
        );

        Ok(FittedAdditiveModel {
            scaler,
            y_scale,
            features,
            coefficients,
            history_dates,
        })
    }

    fn name(&self) -> &str {
        "AdditiveSeasonal"
    }
}

#[derive(Debug, Clone, Copy)]
struct TimeScaler {
    start: NaiveDate,
    span_days: f64,
}

impl TimeScaler {
    fn at(&self, date: NaiveDate) -> TimePoint {
        TimePoint {
            t: (date - self.start).num_days() as f64 / self.span_days,
            epoch_days: epoch_days(date),
        }
    }
}

/// An [`AdditiveSeasonalModel`] fitted to one history.
#[derive(Debug, Clone)]
pub struct FittedAdditiveModel {
    scaler: TimeScaler,
    y_scale: f64,
    features: Vec<Feature>,
    coefficients: OLSResult,
    history_dates: Vec<NaiveDate>,
}

impl FittedAdditiveModel {
    /// Central estimate for an arbitrary date.
    pub fn estimate(&self, date: NaiveDate) -> f64 {
        let tp = self.scaler.at(date);
        let row: Vec<f64> = self.features.iter().map(|&f| tp.feature(f)).collect();
        self.coefficients.predict_row(&row) * self.y_scale
    }

    /// Number of design-matrix columns kept after dropping constant ones.
    pub fn num_features(&self) -> usize {
        self.features.len()
    }

    /// Distinct training dates, ascending.
    pub fn history_dates(&self) -> &[NaiveDate] {
        &self.history_dates
    }
}

impl FittedModel for FittedAdditiveModel {
    fn predict(&self, horizon_days: usize) -> Result<Vec<Prediction>> {
        let last = *self
            .history_dates
            .last()
            .ok_or_else(|| ForecastError::model_fit("fitted model has no history"))?;
        let future = (1..=horizon_days as u64)
            .map(|i| {
                last.checked_add_days(Days::new(i)).ok_or_else(|| {
                    ForecastError::model_fit(format!(
                        "cannot extend {} by {} days past the calendar end",
                        last, horizon_days
                    ))
                })
            })
            .collect::<Result<Vec<NaiveDate>>>()?;

        self.history_dates
            .iter()
            .copied()
            .chain(future)
            .map(|date| {
                let estimate = self.estimate(date);
                if estimate.is_finite() {
                    Ok((date, estimate))
                } else {
                    Err(ForecastError::model_fit(format!(
                        "non-finite prediction on {}",
                        date
                    )))
                }
            })
            .collect()
    }
}
