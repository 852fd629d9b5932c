//! Regularised least squares used by the additive seasonal model.
//!
//! Solves `(X'X + diag(penalties)) β = X'y` with a Cholesky decomposition.
//! A zero penalty leaves a column unregularised (plain OLS for that column).

use crate::error::{ForecastError, Result};

/// Coefficients of a fitted linear model.
#[derive(Debug, Clone, PartialEq)]
pub struct OLSResult {
    /// One coefficient per design-matrix column.
    pub coefficients: Vec<f64>,
}

impl OLSResult {
    /// Predicted value for one design-matrix row.
    pub fn predict_row(&self, row: &[f64]) -> f64 {
        self.coefficients
            .iter()
            .zip(row.iter())
            .map(|(b, x)| b * x)
            .sum()
    }
}

/// Fit `y ≈ X β` with a per-column ridge penalty.
///
/// # Arguments
/// * `design` - Row-major design matrix (n rows, k columns)
/// * `y` - Target values (length n)
/// * `penalties` - Non-negative ridge penalty per column (length k)
pub fn ridge_fit(design: &[Vec<f64>], y: &[f64], penalties: &[f64]) -> Result<OLSResult> {
    let n = y.len();
    if n == 0 {
        return Err(ForecastError::model_fit("no observations to fit"));
    }
    if design.len() != n {
        return Err(ForecastError::model_fit(format!(
            "design matrix has {} rows for {} observations",
            design.len(),
            n
        )));
    }

    let k = penalties.len();
    if k == 0 {
        return Err(ForecastError::model_fit("design matrix has no columns"));
    }
    if let Some(row) = design.iter().find(|row| row.len() != k) {
        return Err(ForecastError::model_fit(format!(
            "design row has {} columns, expected {}",
            row.len(),
            k
        )));
    }

    // X'X and X'y
    let mut xtx = vec![vec![0.0; k]; k];
    let mut xty = vec![0.0; k];

    for (row, &y_obs) in design.iter().zip(y.iter()) {
        for i in 0..k {
            let xi = row[i];
            if xi == 0.0 {
                continue;
            }
            xty[i] += xi * y_obs;
            for j in 0..=i {
                xtx[i][j] += xi * row[j];
            }
        }
    }
    for i in 0..k {
        for j in 0..i {
            xtx[j][i] = xtx[i][j];
        }
    }

    // Ridge penalties plus a small jitter for numerical stability
    for i in 0..k {
        xtx[i][i] += penalties[i] + 1e-8;
    }

    let beta = solve_symmetric(&xtx, &xty).ok_or_else(|| {
        ForecastError::model_fit("least squares system is not positive definite")
    })?;

    if beta.iter().any(|b| !b.is_finite()) {
        return Err(ForecastError::model_fit(
            "least squares produced non-finite coefficients",
        ));
    }

    Ok(OLSResult { coefficients: beta })
}

/// Solve symmetric positive definite system using Cholesky decomposition.
///
/// Solves A @ x = b where A is symmetric positive definite.
fn solve_symmetric(a: &[Vec<f64>], b: &[f64]) -> Option<Vec<f64>> {
    let n = b.len();
    if n == 0 || a.len() != n {
        return None;
    }

    // Cholesky decomposition A = L @ L'
    let mut l = vec![vec![0.0; n]; n];

    for i in 0..n {
        for j in 0..=i {
            let mut sum = a[i][j];
            for k in 0..j {
                sum -= l[i][k] * l[j][k];
            }

            if i == j {
                if sum <= 0.0 || !sum.is_finite() {
                    return None; // pivot vanished, matrix is singular
                }
                l[i][j] = sum.sqrt();
            } else {
                l[i][j] = sum / l[j][j];
            }
        }
    }

    // Forward substitution: L @ y = b
    let mut y = vec![0.0; n];
    for i in 0..n {
        let mut sum = b[i];
        for j in 0..i {
            sum -= l[i][j] * y[j];
        }
        y[i] = sum / l[i][i];
    }

    // Backward substitution: L' @ x = y
    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let mut sum = y[i];
        for j in (i + 1)..n {
            sum -= l[j][i] * x[j];
        }
        x[i] = sum / l[i][i];
    }

    Some(x)
}
