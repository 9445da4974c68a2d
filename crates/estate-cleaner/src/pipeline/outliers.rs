//! Outlier detection module.
//!
//! Flags values in numeric columns using either Tukey's IQR fences or
//! z-scores. Detection is read-only: rows are reported, never removed.

use crate::config::{CleanerConfig, OutlierMethod};
use crate::error::{CleanerError, Result};
use crate::table::CleanedTable;
use crate::utils::{
    is_numeric_dtype, mean, non_null_f64_values, percentage, quantile_sorted, sample_std,
};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Outliers found in one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnOutliers {
    pub column: String,
    pub count: usize,
    /// count / current row count * 100
    pub percentage: f64,
    /// Raw row ids of the flagged rows, ascending
    pub row_ids: Vec<usize>,
    /// Values below this are outliers; `None` when nothing can be flagged
    pub lower_bound: Option<f64>,
    /// Values above this are outliers; `None` when nothing can be flagged
    pub upper_bound: Option<f64>,
}

/// Result of one detection pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlierReport {
    pub method: OutlierMethod,
    /// Row count of the table at detection time
    pub rows: usize,
    /// One record per requested column, in request order
    pub columns: Vec<ColumnOutliers>,
}

impl OutlierReport {
    pub fn column(&self, name: &str) -> Option<&ColumnOutliers> {
        self.columns.iter().find(|c| c.column == name)
    }

    /// Sum of per-column counts. A row flagged in two columns counts twice.
    pub fn total_flags(&self) -> usize {
        self.columns.iter().map(|c| c.count).sum()
    }
}

/// Detects outliers in the numeric columns of a [`CleanedTable`].
#[derive(Debug, Clone, Copy)]
pub struct OutlierDetector {
    method: OutlierMethod,
    iqr_multiplier: f64,
    zscore_threshold: f64,
}

impl OutlierDetector {
    /// Detector with the usual constants: 1.5 x IQR fences, |z| > 3.
    pub fn new(method: OutlierMethod) -> Self {
        let defaults = CleanerConfig::default();
        Self {
            method,
            iqr_multiplier: defaults.iqr_multiplier,
            zscore_threshold: defaults.zscore_threshold,
        }
    }

    pub fn from_config(config: &CleanerConfig) -> Self {
        Self {
            method: config.outlier_method,
            iqr_multiplier: config.iqr_multiplier,
            zscore_threshold: config.zscore_threshold,
        }
    }

    pub fn with_iqr_multiplier(mut self, k: f64) -> Self {
        self.iqr_multiplier = k;
        self
    }

    pub fn with_zscore_threshold(mut self, threshold: f64) -> Self {
        self.zscore_threshold = threshold;
        self
    }

    /// Same thresholds, different method.
    pub fn with_method(mut self, method: OutlierMethod) -> Self {
        self.method = method;
        self
    }

    /// Detect outliers in `columns`, or in every numeric column when `None`.
    pub fn detect(&self, table: &CleanedTable, columns: Option<&[String]>) -> Result<OutlierReport> {
        let requested = match columns {
            Some(cols) => cols.to_vec(),
            None => table.numeric_columns(),
        };

        let mut results = Vec::with_capacity(requested.len());
        for name in &requested {
            let column = table
                .frame()
                .column(name)
                .map_err(|_| CleanerError::ColumnNotFound(name.clone()))?;
            if !is_numeric_dtype(column.dtype()) {
                return Err(CleanerError::NonNumericColumn {
                    column: name.clone(),
                    dtype: column.dtype().to_string(),
                });
            }

            let found = self.detect_column(
                column.as_materialized_series(),
                table.row_ids(),
                table.height(),
            )?;
            info!(
                "{}: {} outliers ({:.2}%)",
                found.column, found.count, found.percentage
            );
            results.push(found);
        }

        Ok(OutlierReport {
            method: self.method,
            rows: table.height(),
            columns: results,
        })
    }

    fn detect_column(
        &self,
        series: &Series,
        row_ids: &[usize],
        total_rows: usize,
    ) -> PolarsResult<ColumnOutliers> {
        let values = non_null_f64_values(series)?;
        let name = series.name().to_string();

        let flagged_by: Option<(f64, f64, Box<dyn Fn(f64) -> bool>)> = match self.method {
            OutlierMethod::Iqr => self.iqr_bounds(&values).map(|(lower, upper)| {
                let test: Box<dyn Fn(f64) -> bool> = Box::new(move |v| v < lower || v > upper);
                (lower, upper, test)
            }),
            OutlierMethod::Zscore => match self.zscore_params(&values) {
                Some((mu, std)) => {
                    let t = self.zscore_threshold;
                    let test: Box<dyn Fn(f64) -> bool> =
                        Box::new(move |v| ((v - mu) / std).abs() > t);
                    Some((mu - t * std, mu + t * std, test))
                }
                None => {
                    warn!(
                        "{}: standard deviation is zero or undefined; no z-score outliers reported",
                        name
                    );
                    None
                }
            },
        };

        let Some((lower, upper, is_outlier)) = flagged_by else {
            return Ok(ColumnOutliers {
                column: name,
                count: 0,
                percentage: 0.0,
                row_ids: Vec::new(),
                lower_bound: None,
                upper_bound: None,
            });
        };

        let float_series = series.cast(&DataType::Float64)?;
        let flagged: Vec<usize> = float_series
            .f64()?
            .into_iter()
            .zip(row_ids)
            .filter(|(v, _)| v.is_some_and(|val| is_outlier(val)))
            .map(|(_, id)| *id)
            .collect();

        Ok(ColumnOutliers {
            column: name,
            count: flagged.len(),
            percentage: percentage(flagged.len(), total_rows),
            row_ids: flagged,
            lower_bound: Some(lower),
            upper_bound: Some(upper),
        })
    }

    /// Tukey fences over the non-missing values.
    fn iqr_bounds(&self, values: &[f64]) -> Option<(f64, f64)> {
        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let q1 = quantile_sorted(&sorted, 0.25)?;
        let q3 = quantile_sorted(&sorted, 0.75)?;
        let iqr = q3 - q1;
        Some((q1 - self.iqr_multiplier * iqr, q3 + self.iqr_multiplier * iqr))
    }

    /// Mean and sample standard deviation, when the deviation is usable.
    fn zscore_params(&self, values: &[f64]) -> Option<(f64, f64)> {
        let mu = mean(values)?;
        let std = sample_std(values)?;
        (std.is_finite() && std > 0.0).then_some((mu, std))
    }
}
