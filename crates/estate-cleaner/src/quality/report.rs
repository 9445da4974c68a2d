use crate::utils::{
    dtype_category_str, duplicate_row_count, is_numeric_dtype, percentage, round2,
};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

const RULE_WIDTH: usize = 60;

/// Missing-value and type summary of one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnQuality {
    pub name: String,
    /// Polars dtype, e.g. "f64" or "str"
    pub dtype: String,
    /// "numeric", "categorical", "boolean", "datetime" or "other"
    pub kind: String,
    pub missing_count: usize,
    /// missing_count / total_rows * 100, rounded to two decimals
    pub missing_percentage: f64,
}

/// Snapshot of a table's data quality.
///
/// Describes the table it was generated from at that moment; regenerate it
/// after the table changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    pub total_rows: usize,
    pub total_columns: usize,
    /// One entry per column, in table order
    pub columns: Vec<ColumnQuality>,
    /// Rows repeating an earlier row across all columns
    pub duplicate_rows: usize,
    pub numeric_columns: Vec<String>,
}

impl QualityReport {
    /// Build a report for `df`.
    pub fn generate(df: &DataFrame) -> PolarsResult<Self> {
        let total_rows = df.height();

        let columns = df
            .get_columns()
            .iter()
            .map(|col| {
                let missing_count = col.null_count();
                ColumnQuality {
                    name: col.name().to_string(),
                    dtype: col.dtype().to_string(),
                    kind: dtype_category_str(col.dtype()).to_string(),
                    missing_count,
                    missing_percentage: round2(percentage(missing_count, total_rows)),
                }
            })
            .collect();

        let numeric_columns = df
            .get_columns()
            .iter()
            .filter(|col| is_numeric_dtype(col.dtype()))
            .map(|col| col.name().to_string())
            .collect();

        Ok(Self {
            total_rows,
            total_columns: df.width(),
            columns,
            duplicate_rows: duplicate_row_count(df)?,
            numeric_columns,
        })
    }

    /// Columns with at least one missing cell, as (name, count, percentage).
    pub fn missing_values(&self) -> impl Iterator<Item = (&str, usize, f64)> {
        self.columns
            .iter()
            .filter(|c| c.missing_count > 0)
            .map(|c| (c.name.as_str(), c.missing_count, c.missing_percentage))
    }

    /// Sum of missing cells over every column.
    pub fn total_missing(&self) -> usize {
        self.columns.iter().map(|c| c.missing_count).sum()
    }

    pub fn column(&self, name: &str) -> Option<&ColumnQuality> {
        self.columns.iter().find(|c| c.name == name)
    }
}

impl fmt::Display for QualityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(RULE_WIDTH);
        writeln!(f, "{rule}")?;
        writeln!(f, "DATA QUALITY REPORT")?;
        writeln!(f, "{rule}")?;
        writeln!(
            f,
            "Dataset Shape: {} rows x {} columns",
            self.total_rows, self.total_columns
        )?;
        writeln!(f, "Duplicate Rows: {}", self.duplicate_rows)?;

        let mut missing = self.missing_values().peekable();
        if missing.peek().is_some() {
            writeln!(f, "\nMISSING VALUES:")?;
            for (name, count, pct) in missing {
                // `{:?}` keeps the ".0" on whole percentages
                writeln!(f, "  {name}: {count} ({pct:?}%)")?;
            }
        } else {
            writeln!(f, "\nNo missing values found!")?;
        }

        writeln!(f, "\nNUMERIC COLUMNS: {}", self.numeric_columns.len())?;
        for name in &self.numeric_columns {
            writeln!(f, "  - {name}")?;
        }
        Ok(())
    }
}
