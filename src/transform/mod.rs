//! In-place transformations of a sales history.

mod anchor;

pub use anchor::HistoryNormalizer;
