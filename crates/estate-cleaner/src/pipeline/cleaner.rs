//! The cleaner itself.
//!
//! [`TabularCleaner`] owns the raw table, the working copy and the cached
//! quality report, and exposes each cleaning step as a method plus
//! [`TabularCleaner::run_pipeline`] to chain them.

use crate::config::{CleanerConfig, MissingValueStrategy, OutlierMethod};
use crate::error::{CleanerError, Result, ResultExt};
use crate::imputers::StatisticalImputer;
use crate::io;
use crate::pipeline::outliers::{OutlierDetector, OutlierReport};
use crate::pipeline::progress::{
    CleaningStage, ClosureProgressReporter, ProgressReporter, ProgressUpdate, TracingReporter,
};
use crate::quality::QualityReport;
use crate::table::{CleanedTable, RawTable};
use crate::types::{CleaningSummary, RunReport};
use crate::utils::first_occurrence_mask;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Loads, inspects, cleans and saves one tabular dataset.
///
/// Steps must run in order: [`load`](Self::load), then
/// [`handle_missing_values`](Self::handle_missing_values), after which
/// deduplication, outlier detection and saving work on the cleaned copy.
/// Calling a step too early returns a state error.
///
/// # Example
///
/// ```rust,ignore
/// use estate_cleaner::{CleanerConfig, TabularCleaner};
///
/// let mut cleaner = TabularCleaner::new();
/// let summary = cleaner.run_pipeline(&CleanerConfig::default())?;
/// println!("Shape: {:?}", summary.final_shape);
/// ```
pub struct TabularCleaner {
    config: CleanerConfig,
    reporter: Arc<dyn ProgressReporter>,
    raw: Option<RawTable>,
    cleaned: Option<CleanedTable>,
    report: Option<QualityReport>,
    processing_steps: Vec<String>,
}

static_assertions::assert_impl_all!(TabularCleaner: Send);

impl Default for TabularCleaner {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl TabularCleaner {
    /// Cleaner with the default configuration, logging through `tracing`.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> TabularCleanerBuilder {
        TabularCleanerBuilder::default()
    }

    pub fn config(&self) -> &CleanerConfig {
        &self.config
    }

    /// The table as loaded, if any.
    pub fn raw(&self) -> Option<&RawTable> {
        self.raw.as_ref()
    }

    /// The working copy, once missing-value handling has run.
    pub fn cleaned(&self) -> Option<&CleanedTable> {
        self.cleaned.as_ref()
    }

    /// What each step changed the working copy, oldest first.
    pub fn processing_steps(&self) -> &[String] {
        &self.processing_steps
    }

    fn emit(&self, update: ProgressUpdate) {
        self.reporter.report(update);
    }

    /// Report `err` as a failure and hand it back for returning.
    fn failure(&self, err: CleanerError) -> CleanerError {
        self.emit(ProgressUpdate::failed(err.to_string()));
        err
    }

    fn require_raw(&self) -> Result<&RawTable> {
        self.raw
            .as_ref()
            .ok_or_else(|| self.failure(CleanerError::NoDataLoaded))
    }

    fn require_cleaned(&self) -> Result<&CleanedTable> {
        self.cleaned
            .as_ref()
            .ok_or_else(|| self.failure(CleanerError::NoCleanedData))
    }

    /// Read a CSV file into a new raw table.
    ///
    /// On success any previous working copy and quality report are
    /// discarded. On failure the cleaner is left as it was.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<&RawTable> {
        let path = path.as_ref();
        self.emit(ProgressUpdate::started(
            CleaningStage::Loading,
            format!("Loading data from {}", path.display()),
        ));

        let frame = io::load_csv(path)
            .context("Error loading data")
            .map_err(|e| self.failure(e))?;

        let (rows, cols) = frame.shape();
        self.emit(ProgressUpdate::finished(
            CleaningStage::Loading,
            format!("Loaded data: {} rows, {} columns", rows, cols),
        ));

        self.cleaned = None;
        self.report = None;
        self.processing_steps.clear();
        Ok(&*self.raw.insert(RawTable::new(frame, path)))
    }

    /// Build and cache a quality report for the raw table.
    pub fn generate_quality_report(&mut self) -> Result<&QualityReport> {
        let raw = self.require_raw()?;
        let report = QualityReport::generate(raw.frame())
            .map_err(|e| self.failure(CleanerError::from(e)))?;

        self.emit(ProgressUpdate::finished(
            CleaningStage::QualityReport,
            format!(
                "Quality report: {} missing cells, {} duplicate rows",
                report.total_missing(),
                report.duplicate_rows
            ),
        ));
        Ok(&*self.report.insert(report))
    }

    /// Quality report for the working copy, as it stands now. Not cached.
    pub fn cleaned_quality_report(&self) -> Result<QualityReport> {
        let table = self.require_cleaned()?;
        QualityReport::generate(table.frame()).map_err(|e| self.failure(CleanerError::from(e)))
    }

    /// Print the cached quality report, generating it first if needed.
    pub fn print_quality_report(&mut self) -> Result<()> {
        if self.report.is_none() {
            self.generate_quality_report()?;
        }
        if let Some(report) = &self.report {
            println!("{}", report);
        }
        Ok(())
    }

    /// Start a fresh working copy of the raw table and apply `strategy`.
    ///
    /// Unknown strategies leave the copy exactly as loaded.
    pub fn handle_missing_values(
        &mut self,
        strategy: &MissingValueStrategy,
    ) -> Result<&CleanedTable> {
        let mut table = CleanedTable::from_raw(self.require_raw()?);
        let rows_before = table.height();

        self.emit(ProgressUpdate::started(
            CleaningStage::MissingValues,
            format!("Starting missing value handling with strategy: {}", strategy),
        ));

        let mut steps = Vec::new();
        match strategy {
            MissingValueStrategy::Default => {
                StatisticalImputer::apply_default(&mut table, &mut steps)
                    .map_err(|e| self.failure(e))?;
            }
            MissingValueStrategy::Drop => {
                StatisticalImputer::drop_incomplete_rows(&mut table, &mut steps)
                    .map_err(|e| self.failure(e))?;
            }
            MissingValueStrategy::Passthrough => {
                warn!("Unknown missing value strategy; leaving missing values in place");
            }
        }

        self.emit(ProgressUpdate::finished(
            CleaningStage::MissingValues,
            format!("Rows: {} -> {}", rows_before, table.height()),
        ));

        self.processing_steps = steps;
        Ok(&*self.cleaned.insert(table))
    }

    /// Drop rows that repeat an earlier row in every column.
    ///
    /// Returns the number of rows removed. Running it twice removes nothing
    /// the second time.
    pub fn remove_duplicates(&mut self) -> Result<usize> {
        let keep = first_occurrence_mask(self.require_cleaned()?.frame())
            .map_err(|e| self.failure(CleanerError::from(e)))?;

        self.emit(ProgressUpdate::started(
            CleaningStage::Deduplication,
            "Removing duplicate rows",
        ));

        let Some(table) = self.cleaned.as_mut() else {
            return Err(self.failure(CleanerError::NoCleanedData));
        };
        let removed = match table.retain_rows(&keep) {
            Ok(removed) => removed,
            Err(e) => return Err(self.failure(CleanerError::from(e))),
        };
        let remaining = table.height();

        self.emit(ProgressUpdate::finished(
            CleaningStage::Deduplication,
            format!(
                "Removed {} duplicate rows. Rows remaining: {}",
                removed, remaining
            ),
        ));
        if removed > 0 {
            self.processing_steps
                .push(format!("Removed {} duplicate rows", removed));
        }
        Ok(removed)
    }

    /// Flag outliers in `columns`, or every numeric column when `None`.
    ///
    /// Fence multiplier and z-score threshold come from the configuration.
    /// The working copy is not modified.
    pub fn detect_outliers(
        &self,
        method: OutlierMethod,
        columns: Option<&[String]>,
    ) -> Result<OutlierReport> {
        let table = self.require_cleaned()?;
        self.emit(ProgressUpdate::started(
            CleaningStage::OutlierDetection,
            format!("Detecting outliers using {} method", method),
        ));

        let report = OutlierDetector::from_config(&self.config)
            .with_method(method)
            .detect(table, columns)
            .map_err(|e| self.failure(e))?;

        self.emit(ProgressUpdate::finished(
            CleaningStage::OutlierDetection,
            format!(
                "Outlier detection flagged {} values across {} columns",
                report.total_flags(),
                report.columns.len()
            ),
        ));
        Ok(report)
    }

    /// Write the working copy as CSV. Row ids are not written.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<PathBuf> {
        let path = path.as_ref();
        let table = self.require_cleaned()?;
        self.emit(ProgressUpdate::started(
            CleaningStage::Saving,
            format!("Saving cleaned data to {}", path.display()),
        ));

        let written = io::write_csv(table.frame(), path)
            .context("Error saving data")
            .map_err(|e| self.failure(e))?;

        self.emit(ProgressUpdate::finished(
            CleaningStage::Saving,
            format!("Saved cleaned data to: {}", written.display()),
        ));
        Ok(written)
    }

    /// Run every step in order with the settings in `config`.
    ///
    /// `config` replaces the cleaner's configuration for this and later
    /// calls. Stops at the first failing step; when loading fails no output
    /// file is written.
    pub fn run_pipeline(&mut self, config: &CleanerConfig) -> Result<CleaningSummary> {
        config
            .validate()
            .map_err(|e| self.failure(CleanerError::InvalidConfig(e.to_string())))?;
        self.config = config.clone();
        info!("Starting data cleaning pipeline...");

        let initial_shape = self.load(&config.input_path)?.shape();

        println!("INITIAL DATA QUALITY:");
        self.print_quality_report()?;

        let rows_dropped = {
            let table = self.handle_missing_values(&config.missing_strategy)?;
            initial_shape.0 - table.height()
        };
        let duplicates_removed = self.remove_duplicates()?;

        let outliers = self.detect_outliers(config.outlier_method, None)?;
        if config.remove_outliers {
            info!("Outlier removal not implemented - requires business logic");
        }

        let final_missing = self.require_cleaned()?.null_count();
        self.emit(ProgressUpdate::finished(
            CleaningStage::Validation,
            format!("Final missing values: {}", final_missing),
        ));

        let output = self.save(&config.output_path)?;
        let final_shape = self.require_cleaned()?.shape();

        let summary = CleaningSummary {
            input: config.input_path.clone(),
            output,
            missing_strategy: config.missing_strategy.clone(),
            initial_shape,
            final_shape,
            rows_dropped,
            duplicates_removed,
            final_missing,
            outliers,
            processing_steps: self.processing_steps.clone(),
        };

        // The cleaned file is already on disk; a missing report does not fail the run
        if let Some(report_path) = &config.report_path
            && let Err(e) = self.write_run_report(&summary, report_path)
        {
            warn!("Run report not written to {}: {}", report_path.display(), e);
        }

        self.emit(ProgressUpdate::complete("Data cleaning pipeline completed successfully!"));
        Ok(summary)
    }

    fn write_run_report(&self, summary: &CleaningSummary, path: &Path) -> Result<()> {
        let initial = match &self.report {
            Some(report) => report.clone(),
            None => QualityReport::generate(self.require_raw()?.frame())?,
        };
        let report = RunReport::new(initial, self.cleaned_quality_report()?, summary.clone());

        let written = io::write_json(&report, path).context("Error writing run report")?;
        debug!("Run report written to {}", written.display());
        Ok(())
    }
}

/// Builder for [`TabularCleaner`].
#[derive(Default)]
pub struct TabularCleanerBuilder {
    config: Option<CleanerConfig>,
    reporter: Option<Arc<dyn ProgressReporter>>,
}

impl TabularCleanerBuilder {
    pub fn config(mut self, config: CleanerConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Send step messages to `reporter` instead of `tracing`.
    pub fn reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    /// Send step messages to a closure.
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(ProgressUpdate) + Send + Sync + 'static,
    {
        self.reporter = Some(Arc::new(ClosureProgressReporter::new(callback)));
        self
    }

    pub fn build(self) -> TabularCleaner {
        TabularCleaner {
            config: self.config.unwrap_or_default(),
            reporter: self
                .reporter
                .unwrap_or_else(|| Arc::new(TracingReporter)),
            raw: None,
            cleaned: None,
            report: None,
            processing_steps: Vec::new(),
        }
    }
}
