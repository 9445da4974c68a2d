//! Imputation module for handling missing values.
//!
//! Provides median imputation for numeric columns, mode imputation for
//! categorical columns, and dropping of incomplete rows.

mod statistical;

pub use statistical::StatisticalImputer;
