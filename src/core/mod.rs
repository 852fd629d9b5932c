//! Core data structures for sales forecasting.

mod forecast;
mod history;

pub use forecast::{future_days, ForecastOutcome, ForecastPath, ForecastPoint};
pub use history::{ObservationPoint, SalesHistory};
