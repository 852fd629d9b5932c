//! Shape checks and sufficiency gating for the incoming sales payload.

use crate::core::{ObservationPoint, SalesHistory};
use crate::error::{ForecastError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::{Map, Value};
use tracing::debug;

/// Name of the date field in input records.
pub const DATE_FIELD: &str = "ds";
/// Name of the value field in input records.
pub const VALUE_FIELD: &str = "y";

/// Outcome of validating the input payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Assessment {
    /// Nothing to forecast: no records, or the date/value fields are absent.
    Empty,
    /// Too little history for the seasonal model.
    Insufficient(SalesHistory),
    /// Enough history for the seasonal model.
    Sufficient(SalesHistory),
}

impl Assessment {
    pub fn history(&self) -> Option<&SalesHistory> {
        match self {
            Assessment::Empty => None,
            Assessment::Insufficient(h) | Assessment::Sufficient(h) => Some(h),
        }
    }
}

/// Validates raw records and decides which forecasting path applies.
#[derive(Debug, Clone)]
pub struct SeriesValidator {
    min_history: usize,
}

impl Default for SeriesValidator {
    fn default() -> Self {
        Self::new(30)
    }
}

impl SeriesValidator {
    /// Create a validator; histories shorter than `min_history` are insufficient.
    pub fn new(min_history: usize) -> Self {
        Self { min_history }
    }

    pub fn min_history(&self) -> usize {
        self.min_history
    }

    /// Parse and assess a JSON document.
    pub fn validate_str(&self, input: &str) -> Result<Assessment> {
        let payload: Value = serde_json::from_str(input)?;
        self.validate(&payload)
    }

    /// Assess an already-parsed JSON payload.
    ///
    /// The payload must be an array of objects. Field presence is judged over
    /// the whole collection: if no record carries `ds`, or no record carries
    /// `y`, the result is [`Assessment::Empty`]. Once both fields exist, every
    /// record must carry a parseable date and a finite value.
    pub fn validate(&self, payload: &Value) -> Result<Assessment> {
        let records = payload.as_array().ok_or_else(|| {
            ForecastError::data_format(format!(
                "expected a JSON array of records, got {}",
                json_kind(payload)
            ))
        })?;

        if records.is_empty() {
            debug!("input has no records");
            return Ok(Assessment::Empty);
        }

        let objects = records
            .iter()
            .enumerate()
            .map(|(i, record)| {
                record.as_object().ok_or_else(|| {
                    ForecastError::data_format(format!(
                        "record {}: expected an object, got {}",
                        i,
                        json_kind(record)
                    ))
                })
            })
            .collect::<Result<Vec<&Map<String, Value>>>>()?;

        let has_dates = objects.iter().any(|o| o.contains_key(DATE_FIELD));
        let has_values = objects.iter().any(|o| o.contains_key(VALUE_FIELD));
        if !has_dates || !has_values {
            debug!(
                has_dates,
                has_values, "input lacks the date or value field; nothing to forecast"
            );
            return Ok(Assessment::Empty);
        }

        let history = objects
            .iter()
            .enumerate()
            .map(|(i, record)| parse_record(i, record))
            .collect::<Result<SalesHistory>>()?;

        debug!(
            observations = history.len(),
            min_history = self.min_history,
            "parsed sales history"
        );

        if history.len() < self.min_history {
            Ok(Assessment::Insufficient(history))
        } else {
            Ok(Assessment::Sufficient(history))
        }
    }
}

fn parse_record(index: usize, record: &Map<String, Value>) -> Result<ObservationPoint> {
    let raw_date = record.get(DATE_FIELD).ok_or_else(|| {
        ForecastError::data_format(format!("record {}: missing '{}'", index, DATE_FIELD))
    })?;
    let date = raw_date
        .as_str()
        .and_then(parse_date)
        .ok_or_else(|| {
            ForecastError::data_format(format!("record {}: invalid date {}", index, raw_date))
        })?;

    let raw_value = record.get(VALUE_FIELD).ok_or_else(|| {
        ForecastError::data_format(format!("record {}: missing '{}'", index, VALUE_FIELD))
    })?;
    let value = parse_value(raw_value).ok_or_else(|| {
        ForecastError::data_format(format!("record {}: invalid value {}", index, raw_value))
    })?;

    Ok(ObservationPoint::new(date, value))
}

/// Parse a date or timestamp string into its calendar date.
///
/// Accepts `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM:SS[.f]`, `YYYY-MM-DD HH:MM:SS[.f]`
/// and RFC 3339 timestamps. The time of day is discarded.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date);
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt.date());
        }
    }
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.date_naive())
}

fn parse_value(raw: &Value) -> Option<f64> {
    let value = match raw {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    value.is_finite().then_some(value)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
