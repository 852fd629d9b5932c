//! Outlier detection for sales histories.

mod outlier;

pub use outlier::{IqrBounds, OutlierFilter, OutlierReport};
