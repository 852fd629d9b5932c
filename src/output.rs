//! Primary-channel serialization of forecast rows.
//!
//! Only the forecast rows are ever written here. Diagnostics travel through
//! `tracing` on a separate channel.

use crate::core::ForecastPoint;
use crate::error::{ForecastError, Result};
use std::io::Write;

/// Shapes forecast rows into the output contract.
pub struct ResultFormatter;

impl ResultFormatter {
    /// Compact JSON array of `{"date", "forecast"}` records.
    pub fn to_json(points: &[ForecastPoint]) -> Result<String> {
        if let Some(bad) = points.iter().find(|p| !p.forecast.is_finite()) {
            return Err(ForecastError::model_fit(format!(
                "refusing to serialize non-finite forecast for {}",
                bad.date
            )));
        }
        serde_json::to_string(points).map_err(|e| ForecastError::Io(e.into()))
    }

    /// Write the payload plus a trailing newline in one write, then flush.
    pub fn write<W: Write>(mut writer: W, points: &[ForecastPoint]) -> Result<()> {
        let mut payload = Self::to_json(points)?;
        payload.push('\n');
        writer.write_all(payload.as_bytes())?;
        writer.flush()?;
        Ok(())
    }
}
