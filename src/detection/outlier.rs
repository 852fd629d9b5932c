//! IQR-based outlier suppression for sales histories.
//!
//! Observations outside `[Q1 - k·IQR, Q3 + k·IQR]` are dropped in a single
//! pass. Bounds are computed once and never re-tightened.

use crate::core::SalesHistory;
use crate::utils::quartiles;
use tracing::debug;

/// Acceptance range computed from the interquartile range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IqrBounds {
    pub q1: f64,
    pub q3: f64,
    pub lower: f64,
    pub upper: f64,
}

impl IqrBounds {
    /// Compute the fence for a set of values.
    ///
    /// Returns `None` for an empty input.
    pub fn from_values(values: &[f64], multiplier: f64) -> Option<Self> {
        let (q1, q3) = quartiles(values);
        if !q1.is_finite() || !q3.is_finite() {
            return None;
        }
        let iqr = q3 - q1;
        Some(Self {
            q1,
            q3,
            lower: q1 - multiplier * iqr,
            upper: q3 + multiplier * iqr,
        })
    }

    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }

    /// Whether a value lies inside the inclusive acceptance range.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }
}

/// Summary of one filtering pass.
#[derive(Debug, Clone, PartialEq)]
pub struct OutlierReport {
    /// Fence used, absent for an empty history.
    pub bounds: Option<IqrBounds>,
    /// Number of observations dropped.
    pub removed: usize,
}

/// Drops observations outside the IQR fence.
#[derive(Debug, Clone)]
pub struct OutlierFilter {
    multiplier: f64,
}

impl Default for OutlierFilter {
    fn default() -> Self {
        Self { multiplier: 1.5 } // Standard IQR multiplier
    }
}

impl OutlierFilter {
    pub fn new(multiplier: f64) -> Self {
        Self { multiplier }
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    /// Remove outliers from `history` in place, preserving row order.
    pub fn apply(&self, history: &mut SalesHistory) -> OutlierReport {
        let Some(bounds) = IqrBounds::from_values(&history.values(), self.multiplier) else {
            return OutlierReport {
                bounds: None,
                removed: 0,
            };
        };

        let before = history.len();
        history.retain(|p| bounds.contains(p.value));
        let removed = before - history.len();

        debug!(
            lower = bounds.lower,
            upper = bounds.upper,
            removed,
            retained = history.len(),
            "applied IQR outlier filter"
        );

        OutlierReport {
            bounds: Some(bounds),
            removed,
        }
    }
}
