//! Data quality reporting.
//!
//! This module summarises missing values, duplicates and column types of a
//! table, and renders that summary as the plain-text report printed by the
//! pipeline.

mod report;

pub use report::{ColumnQuality, QualityReport};
