//! Progress reporting for the cleaning pipeline.
//!
//! The cleaner does not talk to a global logger for its step-by-step
//! messages. Instead it is handed a [`ProgressReporter`] and emits one
//! [`ProgressUpdate`] per step; [`TracingReporter`] forwards those to
//! `tracing`, and [`ClosureProgressReporter`] lets callers capture them.
//!
//! # Example
//!
//! ```rust,ignore
//! use estate_cleaner::TabularCleaner;
//!
//! let mut cleaner = TabularCleaner::builder()
//!     .on_progress(|update| {
//!         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
//!     })
//!     .build();
//! ```

use serde::{Deserialize, Serialize};
use tracing::{error, info};

/// Stages of the cleaning pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CleaningStage {
    /// Reading the input file
    Loading,
    /// Building the initial quality report
    QualityReport,
    /// Filling or dropping missing values
    MissingValues,
    /// Removing duplicate rows
    Deduplication,
    /// Flagging outliers
    OutlierDetection,
    /// Counting what is left to fix
    Validation,
    /// Writing the cleaned file
    Saving,
    /// Pipeline completed successfully
    Complete,
    /// Pipeline failed with an error
    Failed,
}

impl CleaningStage {
    /// Returns a human-readable name for the stage.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Loading => "Loading Data",
            Self::QualityReport => "Reporting Quality",
            Self::MissingValues => "Handling Missing Values",
            Self::Deduplication => "Removing Duplicates",
            Self::OutlierDetection => "Detecting Outliers",
            Self::Validation => "Validating",
            Self::Saving => "Saving Data",
            Self::Complete => "Complete",
            Self::Failed => "Failed",
        }
    }

    /// Share of the overall run taken by this stage.
    pub fn weight(&self) -> f32 {
        match self {
            Self::Loading => 0.20,
            Self::QualityReport => 0.10,
            Self::MissingValues => 0.25,
            Self::Deduplication => 0.10,
            Self::OutlierDetection => 0.10,
            Self::Validation => 0.05,
            Self::Saving => 0.20,
            Self::Complete | Self::Failed => 0.0,
        }
    }

    /// Cumulative progress at the start of this stage.
    pub fn base_progress(&self) -> f32 {
        match self {
            Self::Loading => 0.0,
            Self::QualityReport => 0.20,
            Self::MissingValues => 0.30,
            Self::Deduplication => 0.55,
            Self::OutlierDetection => 0.65,
            Self::Validation => 0.75,
            Self::Saving => 0.80,
            Self::Complete => 1.0,
            Self::Failed => 0.0,
        }
    }
}

/// One progress event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressUpdate {
    pub stage: CleaningStage,
    /// Overall progress (0.0 - 1.0)
    pub progress: f32,
    /// Progress within the current stage (0.0 - 1.0)
    pub stage_progress: f32,
    pub message: String,
}

impl ProgressUpdate {
    pub fn new(stage: CleaningStage, stage_progress: f32, message: impl Into<String>) -> Self {
        let stage_progress = stage_progress.clamp(0.0, 1.0);
        let progress = stage.base_progress() + (stage.weight() * stage_progress);
        Self {
            stage,
            progress: progress.clamp(0.0, 1.0),
            stage_progress,
            message: message.into(),
        }
    }

    /// Update marking the start of a stage.
    pub fn started(stage: CleaningStage, message: impl Into<String>) -> Self {
        Self::new(stage, 0.0, message)
    }

    /// Update marking the end of a stage.
    pub fn finished(stage: CleaningStage, message: impl Into<String>) -> Self {
        Self::new(stage, 1.0, message)
    }

    pub fn complete(message: impl Into<String>) -> Self {
        Self {
            stage: CleaningStage::Complete,
            progress: 1.0,
            stage_progress: 1.0,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            stage: CleaningStage::Failed,
            progress: 0.0,
            stage_progress: 0.0,
            message: message.into(),
        }
    }
}

static_assertions::assert_impl_all!(ProgressUpdate: Send, Sync);

/// Receives progress updates from the cleaner.
///
/// Implementations must be `Send + Sync` so a cleaner can be moved to a
/// worker thread together with its reporter.
pub trait ProgressReporter: Send + Sync {
    /// Called once at the start and once at the end of every step.
    fn report(&self, update: ProgressUpdate);
}

/// Reporter that forwards updates to `tracing`.
///
/// Failures are logged at ERROR, everything else at INFO.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl ProgressReporter for TracingReporter {
    fn report(&self, update: ProgressUpdate) {
        match update.stage {
            CleaningStage::Failed => error!("{}", update.message),
            stage => info!(stage = stage.display_name(), "{}", update.message),
        }
    }
}

/// Wrapper that implements [`ProgressReporter`] using a closure.
pub struct ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    callback: F,
}

impl<F> ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> ProgressReporter for ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    fn report(&self, update: ProgressUpdate) {
        (self.callback)(update);
    }
}
