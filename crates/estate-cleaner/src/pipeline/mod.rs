//! Pipeline module.
//!
//! This module provides the cleaner that chains the cleaning steps, outlier
//! detection, and the progress reporting it emits along the way.

mod cleaner;
pub mod outliers;
pub mod progress;

pub use cleaner::{TabularCleaner, TabularCleanerBuilder};
pub use outliers::{ColumnOutliers, OutlierDetector, OutlierReport};
pub use progress::{
    ClosureProgressReporter, CleaningStage, ProgressReporter, ProgressUpdate, TracingReporter,
};
