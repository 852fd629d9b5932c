//! Statistical utility functions.

/// Calculate the mean of a slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Quantile with linear interpolation between closest ranks.
///
/// For `n` sorted values the quantile at `p` sits at rank `h = (n - 1) * p`
/// and interpolates between `sorted[floor(h)]` and `sorted[floor(h) + 1]`.
/// Non-finite values are ignored.
///
/// # Example
/// ```
/// use sales_forecast::utils::quantile;
///
/// let q1 = quantile(&[1.0, 2.0, 3.0, 4.0], 0.25);
/// assert!((q1 - 1.75).abs() < 1e-12);
/// ```
pub fn quantile(values: &[f64], p: f64) -> f64 {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|x| x.is_finite()).collect();
    if sorted.is_empty() || !(0.0..=1.0).contains(&p) {
        return f64::NAN;
    }
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let h = (sorted.len() - 1) as f64 * p;
    let lo = h.floor() as usize;
    let hi = (lo + 1).min(sorted.len() - 1);
    sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo])
}

/// First and third quartiles.
pub fn quartiles(values: &[f64]) -> (f64, f64) {
    (quantile(values, 0.25), quantile(values, 0.75))
}
