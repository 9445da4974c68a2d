use crate::config::MissingValueStrategy;
use crate::pipeline::outliers::OutlierReport;
use crate::quality::QualityReport;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Outcome of a full [`run_pipeline`](crate::TabularCleaner::run_pipeline) call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleaningSummary {
    pub input: PathBuf,
    pub output: PathBuf,
    pub missing_strategy: MissingValueStrategy,
    /// (rows, columns) as loaded
    pub initial_shape: (usize, usize),
    /// (rows, columns) as saved
    pub final_shape: (usize, usize),
    /// Rows removed by the missing-value step (non-zero only for `drop`)
    pub rows_dropped: usize,
    pub duplicates_removed: usize,
    /// Missing cells left in the saved table
    pub final_missing: usize,
    pub outliers: OutlierReport,
    /// Human-readable log of what each step changed
    pub processing_steps: Vec<String>,
}

impl CleaningSummary {
    pub fn rows_removed(&self) -> usize {
        self.initial_shape.0.saturating_sub(self.final_shape.0)
    }
}

/// JSON document written next to a run when a report path is configured.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub generated_at: DateTime<Utc>,
    pub initial_quality: QualityReport,
    pub final_quality: QualityReport,
    #[serde(flatten)]
    pub summary: CleaningSummary,
}

impl RunReport {
    pub fn new(
        initial_quality: QualityReport,
        final_quality: QualityReport,
        summary: CleaningSummary,
    ) -> Self {
        Self {
            generated_at: Utc::now(),
            initial_quality,
            final_quality,
            summary,
        }
    }
}
