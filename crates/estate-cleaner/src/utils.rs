//! Shared utilities for the cleaning pipeline.
//!
//! This module contains common helper functions used across multiple modules
//! to reduce code duplication and ensure consistency.

use polars::prelude::*;
use std::collections::{HashMap, HashSet};

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Category of a data type for cleaning purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DtypeCategory {
    /// Integer or floating point numbers
    Numeric,
    /// Date or datetime types
    Datetime,
    /// Boolean type
    Boolean,
    /// String/text type
    String,
    /// Other/unknown types
    Other,
}

impl DtypeCategory {
    /// Whether missing cells in this category are filled with the column mode.
    pub fn is_categorical(&self) -> bool {
        matches!(self, Self::String | Self::Boolean)
    }
}

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Check if a DataType is a datetime type.
#[inline]
pub fn is_datetime_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Datetime(_, _) | DataType::Date | DataType::Time
    )
}

/// Get the category of a DataType.
pub fn get_dtype_category(dtype: &DataType) -> DtypeCategory {
    if is_numeric_dtype(dtype) {
        DtypeCategory::Numeric
    } else if is_datetime_dtype(dtype) {
        DtypeCategory::Datetime
    } else if matches!(dtype, DataType::Boolean) {
        DtypeCategory::Boolean
    } else if matches!(dtype, DataType::String | DataType::Categorical(_, _)) {
        DtypeCategory::String
    } else {
        DtypeCategory::Other
    }
}

/// Get the dtype category as a short label.
pub fn dtype_category_str(dtype: &DataType) -> &'static str {
    match get_dtype_category(dtype) {
        DtypeCategory::Numeric => "numeric",
        DtypeCategory::Datetime => "datetime",
        DtypeCategory::Boolean => "boolean",
        DtypeCategory::String => "categorical",
        DtypeCategory::Other => "other",
    }
}

/// Names of all numeric columns, in table order.
pub fn numeric_column_names(df: &DataFrame) -> Vec<String> {
    df.get_columns()
        .iter()
        .filter(|col| is_numeric_dtype(col.dtype()))
        .map(|col| col.name().to_string())
        .collect()
}

// =============================================================================
// Missing Value Utilities
// =============================================================================

/// Total number of missing cells across all columns.
pub fn total_null_count(df: &DataFrame) -> usize {
    df.get_columns().iter().map(|col| col.null_count()).sum()
}

/// `true` for every row that has no missing cell in any column.
pub fn complete_rows_mask(df: &DataFrame) -> Vec<bool> {
    let mut keep = vec![true; df.height()];
    for col in df.get_columns() {
        if col.null_count() == 0 {
            continue;
        }
        let nulls: &BooleanChunked = &col.as_materialized_series().is_null();
        for (idx, is_null) in nulls.into_iter().enumerate() {
            if is_null.unwrap_or(false) {
                keep[idx] = false;
            }
        }
    }
    keep
}

/// Percentage rounded to two decimals; 0.0 when the denominator is zero.
pub fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

/// Round to two decimal places.
#[inline]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// =============================================================================
// Duplicate Utilities
// =============================================================================

/// `true` for every row that is the first occurrence of its values.
///
/// Rows are compared across all columns; two missing cells compare equal.
pub fn first_occurrence_mask(df: &DataFrame) -> PolarsResult<Vec<bool>> {
    let height = df.height();
    let mut keys: Vec<Vec<Option<String>>> = vec![Vec::with_capacity(df.width()); height];

    for col in df.get_columns() {
        let as_text = col.as_materialized_series().cast(&DataType::String)?;
        for (idx, value) in as_text.str()?.into_iter().enumerate() {
            keys[idx].push(value.map(str::to_string));
        }
    }

    let mut seen = HashSet::with_capacity(height);
    Ok(keys.into_iter().map(|key| seen.insert(key)).collect())
}

/// Number of rows that repeat an earlier row.
pub fn duplicate_row_count(df: &DataFrame) -> PolarsResult<usize> {
    Ok(first_occurrence_mask(df)?
        .into_iter()
        .filter(|first| !first)
        .count())
}

// =============================================================================
// Series Statistics Utilities
// =============================================================================

/// Calculate the mode (most frequent value) of a Series, compared as text.
///
/// Ties resolve to the lexicographically smallest value so the result does
/// not depend on hash order.
pub fn string_mode(series: &Series) -> Option<String> {
    let str_series = series.cast(&DataType::String).ok()?;
    let str_chunked = str_series.str().ok()?;

    let mut value_counts: HashMap<&str, usize> = HashMap::new();
    for val in str_chunked.into_iter().flatten() {
        *value_counts.entry(val).or_insert(0) += 1;
    }

    value_counts
        .into_iter()
        .max_by(|(a_val, a_count), (b_val, b_count)| {
            a_count.cmp(b_count).then_with(|| b_val.cmp(a_val))
        })
        .map(|(val, _)| val.to_string())
}

/// Non-missing values of a numeric Series as `f64`, in row order.
pub fn non_null_f64_values(series: &Series) -> PolarsResult<Vec<f64>> {
    let float_series = series.cast(&DataType::Float64)?;
    Ok(float_series.f64()?.into_iter().flatten().collect())
}

/// Quantile of already-sorted values using linear interpolation between
/// the closest ranks.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let idx = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = idx.floor() as usize;
    let hi = idx.ceil() as usize;
    if lo == hi {
        Some(sorted[lo])
    } else {
        let frac = idx - lo as f64;
        Some(sorted[lo] * (1.0 - frac) + sorted[hi] * frac)
    }
}

/// Arithmetic mean; `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Sample standard deviation (n - 1 denominator); `None` below two values.
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let mean = mean(values)?;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>()
        / (values.len() as f64 - 1.0);
    Some(variance.sqrt())
}

// =============================================================================
// Series Transformation Utilities
// =============================================================================

/// Fill null values in a numeric Series with a specific value.
///
/// The result is always `Float64`.
pub fn fill_numeric_nulls(series: &Series, fill_value: f64) -> PolarsResult<Series> {
    let float_series = series.cast(&DataType::Float64)?;
    let filled: Vec<Option<f64>> = float_series
        .f64()?
        .into_iter()
        .map(|v| Some(v.unwrap_or(fill_value)))
        .collect();

    Ok(Series::new(series.name().clone(), filled))
}

/// Fill null values in a Series with a text value.
///
/// The result is always `String`; non-string inputs are cast first.
pub fn fill_string_nulls(series: &Series, fill_value: &str) -> PolarsResult<Series> {
    let str_series = series.cast(&DataType::String)?;
    let filled: Vec<Option<String>> = str_series
        .str()?
        .into_iter()
        .map(|v| Some(v.unwrap_or(fill_value).to_string()))
        .collect();

    Ok(Series::new(series.name().clone(), filled))
}

/// Fill null values in a Boolean Series, keeping it `Boolean`.
pub fn fill_bool_nulls(series: &Series, fill_value: bool) -> PolarsResult<Series> {
    let filled: Vec<Option<bool>> = series
        .bool()?
        .into_iter()
        .map(|v| Some(v.unwrap_or(fill_value)))
        .collect();

    Ok(Series::new(series.name().clone(), filled))
}

// =============================================================================
// Tests
// =============================================================================
