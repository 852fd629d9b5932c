//! Property-based tests for the forecasting pipeline.
//!
//! These tests verify invariants that should hold for all valid inputs,
//! using randomly generated sales histories.

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use sales_forecast::core::{future_days, ForecastPath, SalesHistory};
use sales_forecast::detection::{IqrBounds, OutlierFilter};
use sales_forecast::models::FallbackEstimator;
use sales_forecast::transform::HistoryNormalizer;
use sales_forecast::{ForecastPipeline, PipelineConfig};

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

/// Strategy for generating daily sales values.
fn sales_strategy(min_len: usize, max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(0.0..500.0_f64, min_len..max_len)
}

/// Strategy for generating weekly-patterned sales with occasional spikes.
fn weekly_sales_strategy(min_len: usize, max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    (min_len..max_len).prop_flat_map(|len| {
        (
            10.0..100.0_f64,
            1.0..30.0_f64,
            prop::collection::vec(0.0..1.0_f64, len),
        )
            .prop_map(|(base, amplitude, noise)| {
                noise
                    .iter()
                    .enumerate()
                    .map(|(i, u)| {
                        let phase = 2.0 * std::f64::consts::PI * i as f64 / 7.0;
                        let weekly = amplitude * phase.sin();
                        let spike = if *u > 0.97 { 10.0 * base } else { 0.0 };
                        base + weekly + 5.0 * u + spike
                    })
                    .collect()
            })
    })
}

// =============================================================================
// Property: IQR filtering
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn filter_never_adds_or_reorders(values in sales_strategy(1, 120)) {
        let mut history = SalesHistory::daily(start(), &values);
        let original = history.clone();
        let report = OutlierFilter::default().apply(&mut history);

        prop_assert_eq!(report.removed + history.len(), original.len());
        let mut cursor = original.points().iter();
        for kept in history.points() {
            prop_assert!(cursor.any(|p| p == kept));
        }
    }

    #[test]
    fn filter_is_idempotent_on_clean_series(values in weekly_sales_strategy(10, 120)) {
        let mut history = SalesHistory::daily(start(), &values);
        OutlierFilter::default().apply(&mut history);

        let bounds = IqrBounds::from_values(&history.values(), 1.5).unwrap();
        prop_assume!(history.values().iter().all(|v| bounds.contains(*v)));

        let cleaned = history.clone();
        let report = OutlierFilter::default().apply(&mut history);
        prop_assert_eq!(report.removed, 0);
        prop_assert_eq!(history, cleaned);
    }

    #[test]
    fn survivors_lie_within_fences(values in weekly_sales_strategy(5, 120)) {
        let mut history = SalesHistory::daily(start(), &values);
        let report = OutlierFilter::default().apply(&mut history);
        let bounds = report.bounds.unwrap();

        for v in history.values() {
            prop_assert!(v >= bounds.lower && v <= bounds.upper);
        }
    }
}

// =============================================================================
// Property: fallback forecasts
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn fallback_is_mean_of_recent_values(
        values in sales_strategy(1, 30),
        offset in 0i64..60
    ) {
        let today = start() + Duration::days(offset);
        let history = SalesHistory::daily(start(), &values);
        let forecast = FallbackEstimator::default().forecast(&history, today).unwrap();

        let recent = &values[values.len().saturating_sub(7)..];
        let expected = recent.iter().sum::<f64>() / recent.len() as f64;

        prop_assert_eq!(forecast.len(), 7);
        for (point, date) in forecast.iter().zip(future_days(today, 7).unwrap()) {
            prop_assert_eq!(point.date, date);
            prop_assert!((point.forecast - expected).abs() <= 1e-9 * expected.abs().max(1.0));
        }
    }

    #[test]
    fn short_histories_always_take_fallback_path(values in sales_strategy(1, 30)) {
        let today = start() + Duration::days(45);
        let outcome = ForecastPipeline::default()
            .run_history(SalesHistory::daily(start(), &values), today)
            .unwrap();

        prop_assert_eq!(&outcome.path, &ForecastPath::Fallback { sample_size: values.len() });
        prop_assert_eq!(outcome.dates(), future_days(today, 7).unwrap());
    }
}

// =============================================================================
// Property: anchoring
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn anchoring_appends_at_most_one_point(
        values in sales_strategy(1, 60),
        gap in 0i64..30
    ) {
        let mut history = SalesHistory::daily(start(), &values);
        let latest = history.latest_date().unwrap();
        let today = latest + Duration::days(gap);
        let before = history.clone();

        let anchored = HistoryNormalizer::new().anchor(&mut history, today);

        if gap == 0 {
            prop_assert!(!anchored);
            prop_assert_eq!(history, before);
        } else {
            prop_assert!(anchored);
            prop_assert_eq!(history.len(), before.len() + 1);
            let appended = history.last().unwrap();
            prop_assert_eq!(appended.date, today);
            prop_assert_eq!(appended.value, *values.last().unwrap());
            prop_assert_eq!(&history.points()[..before.len()], before.points());
        }
    }
}

// =============================================================================
// Property: seasonal forecasts
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    #[test]
    fn seasonal_forecast_covers_next_seven_days(
        values in weekly_sales_strategy(30, 90),
        gap in 0i64..20
    ) {
        let history = SalesHistory::daily(start(), &values);
        let today = history.latest_date().unwrap() + Duration::days(gap);

        let outcome = ForecastPipeline::default().run_history(history, today).unwrap();

        prop_assert_eq!(outcome.dates(), future_days(today, 7).unwrap());
        prop_assert!(outcome.values().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn backtest_does_not_affect_forecast(
        values in weekly_sales_strategy(30, 60),
        gap in 0i64..10
    ) {
        let history = SalesHistory::daily(start(), &values);
        let today = history.latest_date().unwrap() + Duration::days(gap);

        let with_backtest = ForecastPipeline::default()
            .run_history(history.clone(), today)
            .unwrap();
        let no_backtest = PipelineConfig::default().with_backtest(usize::MAX, 7);
        let without_backtest = ForecastPipeline::new(no_backtest)
            .run_history(history, today)
            .unwrap();

        prop_assert_eq!(with_backtest.points, without_backtest.points);
    }
}
