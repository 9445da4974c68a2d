//! Custom error types for the cleaning pipeline.
//!
//! Errors fall into two families: I/O errors (missing, malformed or
//! unwritable files) and state errors (a step invoked before its
//! prerequisite). Every public operation of the cleaner logs the error
//! before returning it, so callers can treat `Err` as a plain sentinel.
//!
//! Errors are serializable as `{ code, message }` so they can be embedded
//! in the JSON run report.

use serde::Serialize;
use serde::ser::SerializeStruct;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for the cleaning pipeline.
#[derive(Error, Debug)]
pub enum CleanerError {
    /// An operation needed the raw table but nothing has been loaded.
    #[error("No data loaded. Please load data first.")]
    NoDataLoaded,

    /// An operation needed the cleaned table but missing-value handling has not run.
    #[error("No cleaned data available. Run handle_missing_values first.")]
    NoCleanedData,

    /// Input file does not exist.
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Column was not found in the table.
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// Outlier detection was asked to run on a non-numeric column.
    #[error("Column '{column}' is not numeric (dtype {dtype})")]
    NonNumericColumn { column: String, dtype: String },

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<CleanerError>,
    },
}

impl CleanerError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        CleanerError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Stable error code, used in the JSON report.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NoDataLoaded => "NO_DATA_LOADED",
            Self::NoCleanedData => "NO_CLEANED_DATA",
            Self::FileNotFound(_) => "FILE_NOT_FOUND",
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::NonNumericColumn { .. } => "NON_NUMERIC_COLUMN",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if this error means a step ran before its prerequisite.
    pub fn is_state_error(&self) -> bool {
        match self {
            Self::NoDataLoaded | Self::NoCleanedData => true,
            Self::WithContext { source, .. } => source.is_state_error(),
            _ => false,
        }
    }

    /// Check if this error came from reading, parsing or writing a file.
    pub fn is_io_error(&self) -> bool {
        match self {
            Self::FileNotFound(_) | Self::Io(_) | Self::Polars(_) | Self::Json(_) => true,
            Self::WithContext { source, .. } => source.is_io_error(),
            _ => false,
        }
    }
}

impl Serialize for CleanerError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("CleanerError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for cleaning operations.
pub type Result<T> = std::result::Result<T, CleanerError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| CleanerError::Polars(e).with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| CleanerError::Io(e).with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        assert_eq!(CleanerError::NoDataLoaded.error_code(), "NO_DATA_LOADED");
        assert_eq!(
            CleanerError::ColumnNotFound("price".to_string()).error_code(),
            "COLUMN_NOT_FOUND"
        );
    }

    #[test]
    fn test_state_and_io_kinds() {
        assert!(CleanerError::NoDataLoaded.is_state_error());
        assert!(CleanerError::NoCleanedData.is_state_error());
        assert!(!CleanerError::NoCleanedData.is_io_error());

        let missing = CleanerError::FileNotFound(PathBuf::from("nope.csv"));
        assert!(missing.is_io_error());
        assert!(!missing.is_state_error());
    }

    #[test]
    fn test_error_serialization() {
        let error = CleanerError::ColumnNotFound("sqft_living".to_string());
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("COLUMN_NOT_FOUND"));
        assert!(json.contains("sqft_living"));
    }

    #[test]
    fn test_with_context_preserves_kind() {
        let error = CleanerError::NoCleanedData.with_context("During outlier detection");
        assert!(error.to_string().contains("During outlier detection"));
        assert_eq!(error.error_code(), "NO_CLEANED_DATA");
        assert!(error.is_state_error());
    }
}
