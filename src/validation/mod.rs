//! Input validation and sufficiency gating.

mod series;

pub use series::{parse_date, Assessment, SeriesValidator, DATE_FIELD, VALUE_FIELD};
