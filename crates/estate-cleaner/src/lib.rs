//! Real-Estate Data Cleaning Library
//!
//! Loads a housing-sales CSV (the King County `kc_house_data.csv` layout by
//! default), reports on its quality, fills or drops missing values, removes
//! duplicate rows, flags outliers and writes the cleaned table back out.
//! Built on Polars.
//!
//! # Overview
//!
//! - **Quality Report**: row/column counts, missing values per column,
//!   duplicate rows, numeric columns
//! - **Missing Values**: median for numeric columns, mode for categorical
//!   ones, or dropping incomplete rows
//! - **Deduplication**: exact duplicate rows removed, first occurrence kept
//! - **Outlier Detection**: IQR fences or z-scores, report only
//! - **Progress Reporting**: every step emits an update to a pluggable
//!   reporter (`tracing` by default)
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use estate_cleaner::{CleanerConfig, MissingValueStrategy, OutlierMethod, TabularCleaner};
//!
//! // Option 1: the whole pipeline in one call
//! let config = CleanerConfig::builder()
//!     .input_path("data/raw/kc_house_data.csv")
//!     .output_path("data/processed/cleaned_housing_data.csv")
//!     .build()?;
//!
//! let summary = TabularCleaner::new().run_pipeline(&config)?;
//! println!("Shape: {:?}", summary.final_shape);
//!
//! // Option 2: step by step
//! let mut cleaner = TabularCleaner::new();
//! cleaner.load("data/raw/kc_house_data.csv")?;
//! cleaner.print_quality_report()?;
//! cleaner.handle_missing_values(&MissingValueStrategy::Drop)?;
//! cleaner.remove_duplicates()?;
//!
//! let outliers = cleaner.detect_outliers(OutlierMethod::Zscore, None)?;
//! for column in &outliers.columns {
//!     println!("{}: {} outliers", column.column, column.count);
//! }
//!
//! cleaner.save("data/processed/cleaned.csv")?;
//! ```
//!
//! # Progress Reporting
//!
//! Step messages go to `tracing` unless another reporter is supplied:
//!
//! ```rust,ignore
//! use estate_cleaner::TabularCleaner;
//!
//! let mut cleaner = TabularCleaner::builder()
//!     .on_progress(|update| {
//!         println!("[{:?}] {}", update.stage, update.message);
//!     })
//!     .build();
//! ```

pub mod config;
pub mod error;
pub mod imputers;
pub mod io;
pub mod pipeline;
pub mod quality;
pub mod table;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use config::{
    CleanerConfig, CleanerConfigBuilder, ConfigValidationError, MissingValueStrategy,
    OutlierMethod,
};
pub use error::{CleanerError, Result as CleanerResult, ResultExt};
pub use imputers::StatisticalImputer;
pub use pipeline::{
    CleaningStage, ClosureProgressReporter, ColumnOutliers, OutlierDetector, OutlierReport,
    ProgressReporter, ProgressUpdate, TabularCleaner, TabularCleanerBuilder, TracingReporter,
};
pub use quality::{ColumnQuality, QualityReport};
pub use table::{CleanedTable, RawTable};
pub use types::{CleaningSummary, RunReport};
