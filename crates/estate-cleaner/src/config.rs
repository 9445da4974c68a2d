//! Configuration types for the cleaning pipeline.
//!
//! This module provides configuration options using the builder pattern.
//! The defaults reproduce a plain run of the tool: King County input,
//! median/mode imputation, IQR outlier reporting, no outlier removal.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Default location of the raw dataset.
pub const DEFAULT_INPUT_PATH: &str = "data/raw/kc_house_data.csv";

/// Default location of the cleaned dataset.
pub const DEFAULT_OUTPUT_PATH: &str = "data/processed/cleaned_housing_data.csv";

/// Placeholder written into categorical columns that have no values at all.
pub const UNKNOWN_PLACEHOLDER: &str = "Unknown";

/// Strategy for handling missing values.
///
/// Parsing never fails: any name other than `default` or `drop` maps to
/// [`MissingValueStrategy::Passthrough`], which leaves the table untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MissingValueStrategy {
    /// Median for numeric columns, mode (or "Unknown") for categorical ones
    #[default]
    Default,
    /// Drop every row with at least one missing cell
    Drop,
    /// Unrecognised strategy name; missing values are left as-is
    #[serde(other)]
    Passthrough,
}

impl MissingValueStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Drop => "drop",
            Self::Passthrough => "passthrough",
        }
    }
}

impl FromStr for MissingValueStrategy {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "default" => Self::Default,
            "drop" => Self::Drop,
            _ => Self::Passthrough,
        })
    }
}

impl fmt::Display for MissingValueStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Method used to flag outliers in numeric columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OutlierMethod {
    /// Outside [Q1 - k*IQR, Q3 + k*IQR]
    #[default]
    Iqr,
    /// More than t sample standard deviations from the mean
    #[serde(alias = "z-score", alias = "z_score")]
    Zscore,
}

impl OutlierMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Iqr => "iqr",
            Self::Zscore => "zscore",
        }
    }
}

impl FromStr for OutlierMethod {
    type Err = ConfigValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "iqr" => Ok(Self::Iqr),
            "zscore" | "z-score" | "z_score" => Ok(Self::Zscore),
            other => Err(ConfigValidationError::UnknownOutlierMethod(other.to_string())),
        }
    }
}

impl fmt::Display for OutlierMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration for a cleaning run.
///
/// Use [`CleanerConfig::builder()`] to create a configuration with the
/// fluent API, or [`CleanerConfig::from_json_file`] to read one from disk.
///
/// # Example
///
/// ```rust,ignore
/// use estate_cleaner::config::{CleanerConfig, OutlierMethod};
///
/// let config = CleanerConfig::builder()
///     .input_path("data/raw/listings.csv")
///     .outlier_method(OutlierMethod::Zscore)
///     .build()?;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanerConfig {
    /// CSV file to clean.
    /// Default: "data/raw/kc_house_data.csv"
    pub input_path: PathBuf,

    /// Where the cleaned CSV is written. Parent directories are created.
    /// Default: "data/processed/cleaned_housing_data.csv"
    pub output_path: PathBuf,

    /// How missing values are handled.
    /// Default: Default (median / mode)
    pub missing_strategy: MissingValueStrategy,

    /// Whether outlier removal was requested. Removal is not implemented;
    /// outliers are always reported and kept.
    /// Default: false
    pub remove_outliers: bool,

    /// Outlier detection method.
    /// Default: Iqr
    pub outlier_method: OutlierMethod,

    /// IQR fence multiplier.
    /// Default: 1.5
    pub iqr_multiplier: f64,

    /// Absolute z-score above which a value is an outlier.
    /// Default: 3.0
    pub zscore_threshold: f64,

    /// Optional path for the JSON run report.
    /// Default: None
    pub report_path: Option<PathBuf>,
}

impl Default for CleanerConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(DEFAULT_INPUT_PATH),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            missing_strategy: MissingValueStrategy::default(),
            remove_outliers: false,
            outlier_method: OutlierMethod::default(),
            iqr_multiplier: 1.5,
            zscore_threshold: 3.0,
            report_path: None,
        }
    }
}

impl CleanerConfig {
    /// Create a new configuration builder.
    pub fn builder() -> CleanerConfigBuilder {
        CleanerConfigBuilder::default()
    }

    /// Read a configuration from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: CleanerConfig = serde_json::from_str(&content)?;
        config
            .validate()
            .map_err(|e| crate::error::CleanerError::InvalidConfig(e.to_string()))?;
        Ok(config)
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if !(self.iqr_multiplier.is_finite() && self.iqr_multiplier > 0.0) {
            return Err(ConfigValidationError::InvalidMultiplier {
                field: "iqr_multiplier".to_string(),
                value: self.iqr_multiplier,
            });
        }

        if !(self.zscore_threshold.is_finite() && self.zscore_threshold > 0.0) {
            return Err(ConfigValidationError::InvalidMultiplier {
                field: "zscore_threshold".to_string(),
                value: self.zscore_threshold,
            });
        }

        if self.input_path.as_os_str().is_empty() {
            return Err(ConfigValidationError::EmptyPath("input_path".to_string()));
        }

        if self.output_path.as_os_str().is_empty() {
            return Err(ConfigValidationError::EmptyPath("output_path".to_string()));
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid value for '{field}': {value} (must be a positive number)")]
    InvalidMultiplier { field: String, value: f64 },

    #[error("Path '{0}' must not be empty")]
    EmptyPath(String),

    #[error("Unknown outlier method '{0}' (expected 'iqr' or 'zscore')")]
    UnknownOutlierMethod(String),
}

/// Builder for [`CleanerConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct CleanerConfigBuilder {
    input_path: Option<PathBuf>,
    output_path: Option<PathBuf>,
    missing_strategy: Option<MissingValueStrategy>,
    remove_outliers: Option<bool>,
    outlier_method: Option<OutlierMethod>,
    iqr_multiplier: Option<f64>,
    zscore_threshold: Option<f64>,
    report_path: Option<PathBuf>,
}

impl CleanerConfigBuilder {
    /// Set the CSV file to clean.
    pub fn input_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.input_path = Some(path.into());
        self
    }

    /// Set where the cleaned CSV is written.
    pub fn output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(path.into());
        self
    }

    /// Set the missing-value strategy.
    pub fn missing_strategy(mut self, strategy: MissingValueStrategy) -> Self {
        self.missing_strategy = Some(strategy);
        self
    }

    /// Request outlier removal. Outliers are still only reported.
    pub fn remove_outliers(mut self, remove: bool) -> Self {
        self.remove_outliers = Some(remove);
        self
    }

    /// Set the outlier detection method.
    pub fn outlier_method(mut self, method: OutlierMethod) -> Self {
        self.outlier_method = Some(method);
        self
    }

    /// Set the IQR fence multiplier.
    ///
    /// # Arguments
    /// * `k` - Positive multiplier (e.g., 1.5 for the usual Tukey fences)
    pub fn iqr_multiplier(mut self, k: f64) -> Self {
        self.iqr_multiplier = Some(k);
        self
    }

    /// Set the absolute z-score threshold.
    pub fn zscore_threshold(mut self, threshold: f64) -> Self {
        self.zscore_threshold = Some(threshold);
        self
    }

    /// Write a JSON run report to this path.
    pub fn report_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.report_path = Some(path.into());
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `CleanerConfig` or an error if validation fails.
    pub fn build(self) -> Result<CleanerConfig, ConfigValidationError> {
        let defaults = CleanerConfig::default();
        let config = CleanerConfig {
            input_path: self.input_path.unwrap_or(defaults.input_path),
            output_path: self.output_path.unwrap_or(defaults.output_path),
            missing_strategy: self.missing_strategy.unwrap_or_default(),
            remove_outliers: self.remove_outliers.unwrap_or(false),
            outlier_method: self.outlier_method.unwrap_or_default(),
            iqr_multiplier: self.iqr_multiplier.unwrap_or(defaults.iqr_multiplier),
            zscore_threshold: self.zscore_threshold.unwrap_or(defaults.zscore_threshold),
            report_path: self.report_path,
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CleanerConfig::default();
        assert_eq!(config.input_path, PathBuf::from(DEFAULT_INPUT_PATH));
        assert_eq!(config.output_path, PathBuf::from(DEFAULT_OUTPUT_PATH));
        assert_eq!(config.missing_strategy, MissingValueStrategy::Default);
        assert_eq!(config.outlier_method, OutlierMethod::Iqr);
        assert!(!config.remove_outliers);
        assert_eq!(config.iqr_multiplier, 1.5);
        assert_eq!(config.zscore_threshold, 3.0);
    }

    #[test]
    fn test_builder_defaults_match_default() {
        let config = CleanerConfig::builder().build().unwrap();
        assert_eq!(config, CleanerConfig::default());
    }

    #[test]
    fn test_builder_custom_values() {
        let config = CleanerConfig::builder()
            .input_path("in.csv")
            .output_path("out/clean.csv")
            .missing_strategy(MissingValueStrategy::Drop)
            .outlier_method(OutlierMethod::Zscore)
            .zscore_threshold(2.5)
            .remove_outliers(true)
            .build()
            .unwrap();

        assert_eq!(config.input_path, PathBuf::from("in.csv"));
        assert_eq!(config.missing_strategy, MissingValueStrategy::Drop);
        assert_eq!(config.outlier_method, OutlierMethod::Zscore);
        assert_eq!(config.zscore_threshold, 2.5);
        assert!(config.remove_outliers);
    }

    #[test]
    fn test_validation_rejects_non_positive_multiplier() {
        let result = CleanerConfig::builder().iqr_multiplier(0.0).build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidMultiplier { .. }
        ));

        let result = CleanerConfig::builder().zscore_threshold(f64::NAN).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_strategy_parsing_never_fails() {
        assert_eq!(
            "default".parse::<MissingValueStrategy>().unwrap(),
            MissingValueStrategy::Default
        );
        assert_eq!(
            " DROP ".parse::<MissingValueStrategy>().unwrap(),
            MissingValueStrategy::Drop
        );
        assert_eq!(
            "interpolate".parse::<MissingValueStrategy>().unwrap(),
            MissingValueStrategy::Passthrough
        );
    }

    #[test]
    fn test_outlier_method_parsing() {
        assert_eq!("iqr".parse::<OutlierMethod>().unwrap(), OutlierMethod::Iqr);
        assert_eq!(
            "z-score".parse::<OutlierMethod>().unwrap(),
            OutlierMethod::Zscore
        );
        assert!(matches!(
            "mad".parse::<OutlierMethod>(),
            Err(ConfigValidationError::UnknownOutlierMethod(_))
        ));
    }

    #[test]
    fn test_config_from_partial_json() {
        let json = r#"{
            "input_path": "raw.csv",
            "missing_strategy": "median_everything",
            "outlier_method": "zscore"
        }"#;

        let config: CleanerConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.input_path, PathBuf::from("raw.csv"));
        assert_eq!(config.output_path, PathBuf::from(DEFAULT_OUTPUT_PATH));
        assert_eq!(config.missing_strategy, MissingValueStrategy::Passthrough);
        assert_eq!(config.outlier_method, OutlierMethod::Zscore);
    }

    #[test]
    fn test_config_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cleaner.json");
        std::fs::write(&path, r#"{ "missing_strategy": "drop", "iqr_multiplier": 3.0 }"#).unwrap();

        let config = CleanerConfig::from_json_file(&path).unwrap();
        assert_eq!(config.missing_strategy, MissingValueStrategy::Drop);
        assert_eq!(config.iqr_multiplier, 3.0);

        std::fs::write(&path, r#"{ "iqr_multiplier": -1.0 }"#).unwrap();
        assert!(CleanerConfig::from_json_file(&path).is_err());
    }
}
