//! Accuracy metrics for forecast evaluation.

/// Accuracy metrics over aligned actual/predicted pairs.
#[derive(Debug, Clone, PartialEq)]
pub struct AccuracyMetrics {
    /// Mean Absolute Error
    pub mae: f64,
    /// Root Mean Squared Error
    pub rmse: f64,
    /// Mean Absolute Percentage Error (None if zeros in actual)
    pub mape: Option<f64>,
    /// Number of scored pairs
    pub n: usize,
}

/// Calculate accuracy metrics between actual and predicted values.
///
/// Returns `None` when there is nothing to score or the slices differ in
/// length.
pub fn calculate_metrics(actual: &[f64], predicted: &[f64]) -> Option<AccuracyMetrics> {
    if actual.is_empty() || actual.len() != predicted.len() {
        return None;
    }

    let n = actual.len() as f64;

    let mae = mae(actual, predicted);

    let mse: f64 = actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| (a - p).powi(2))
        .sum::<f64>()
        / n;

    // MAPE (only if no zeros in actual)
    let mape = if actual.contains(&0.0) {
        None
    } else {
        let sum: f64 = actual
            .iter()
            .zip(predicted.iter())
            .map(|(a, p)| ((a - p) / a).abs())
            .sum();
        Some(100.0 * sum / n)
    };

    Some(AccuracyMetrics {
        mae,
        rmse: mse.sqrt(),
        mape,
        n: actual.len(),
    })
}

/// Calculate MAE between two slices.
pub fn mae(actual: &[f64], predicted: &[f64]) -> f64 {
    if actual.len() != predicted.len() || actual.is_empty() {
        return f64::NAN;
    }
    actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| (a - p).abs())
        .sum::<f64>()
        / actual.len() as f64
}
