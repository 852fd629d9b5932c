//! Anchoring a stale history at the current date.

use crate::core::{ObservationPoint, SalesHistory};
use chrono::NaiveDate;
use tracing::debug;

/// Appends a synthetic "today" observation to stale histories.
///
/// The seasonal model generates its prediction window relative to the latest
/// training date, so a history that ends before `today` is extended with one
/// point dated `today` carrying the last row's value (0 for an empty history).
#[derive(Debug, Clone, Copy, Default)]
pub struct HistoryNormalizer;

impl HistoryNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Anchor `history` at `today`. Returns whether a point was appended.
    pub fn anchor(&self, history: &mut SalesHistory, today: NaiveDate) -> bool {
        let stale = match history.latest_date() {
            Some(latest) => latest < today,
            None => true,
        };
        if !stale {
            return false;
        }

        let value = history.last().map(|p| p.value).unwrap_or(0.0);
        history.push(ObservationPoint::new(today, value));
        debug!(%today, value, "anchored history at today");
        true
    }
}
