//! Daily sales history owned by a single pipeline invocation.

use chrono::NaiveDate;

/// A single observed sales value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObservationPoint {
    pub date: NaiveDate,
    pub value: f64,
}

impl ObservationPoint {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// Ordered sequence of observations.
///
/// Rows keep the order in which they were supplied; the series is expected to
/// be sorted by date but nothing here enforces it. The outlier filter and the
/// history normalizer mutate the history in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SalesHistory {
    points: Vec<ObservationPoint>,
}

impl SalesHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_points(points: Vec<ObservationPoint>) -> Self {
        Self { points }
    }

    /// Build a history of consecutive days starting at `start`.
    pub fn daily(start: NaiveDate, values: &[f64]) -> Self {
        let points = start
            .iter_days()
            .zip(values.iter())
            .map(|(date, &value)| ObservationPoint::new(date, value))
            .collect();
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[ObservationPoint] {
        &self.points
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }

    /// The last row in supply order.
    pub fn last(&self) -> Option<&ObservationPoint> {
        self.points.last()
    }

    /// The maximum date in the history.
    pub fn latest_date(&self) -> Option<NaiveDate> {
        self.points.iter().map(|p| p.date).max()
    }

    /// The minimum date in the history.
    pub fn earliest_date(&self) -> Option<NaiveDate> {
        self.points.iter().map(|p| p.date).min()
    }

    /// Values of the last `n` rows (all rows if fewer exist).
    pub fn tail_values(&self, n: usize) -> Vec<f64> {
        let start = self.points.len().saturating_sub(n);
        self.points[start..].iter().map(|p| p.value).collect()
    }

    pub fn push(&mut self, point: ObservationPoint) {
        self.points.push(point);
    }

    /// Keep only the rows for which `keep` returns true, preserving order.
    pub fn retain<F>(&mut self, keep: F)
    where
        F: FnMut(&ObservationPoint) -> bool,
    {
        self.points.retain(keep);
    }

    /// Split into all-but-last-`tail` rows and the last `tail` rows.
    pub fn split_tail(&self, tail: usize) -> (SalesHistory, SalesHistory) {
        let at = self.points.len().saturating_sub(tail);
        let (head, rest) = self.points.split_at(at);
        (
            SalesHistory::from_points(head.to_vec()),
            SalesHistory::from_points(rest.to_vec()),
        )
    }

    /// Rows sorted ascending by date (stable for equal dates).
    pub fn sorted_by_date(&self) -> Vec<ObservationPoint> {
        let mut sorted = self.points.clone();
        sorted.sort_by_key(|p| p.date);
        sorted
    }
}

impl FromIterator<ObservationPoint> for SalesHistory {
    fn from_iter<I: IntoIterator<Item = ObservationPoint>>(iter: I) -> Self {
        Self::from_points(iter.into_iter().collect())
    }
}
