//! Statistical imputation methods.
//!
//! Numeric columns are filled with their median, categorical columns with
//! their mode, and the drop strategy removes incomplete rows outright.

use crate::config::UNKNOWN_PLACEHOLDER;
use crate::error::{CleanerError, Result};
use crate::table::CleanedTable;
use crate::utils::{
    complete_rows_mask, fill_bool_nulls, fill_numeric_nulls, fill_string_nulls,
    get_dtype_category, string_mode, DtypeCategory,
};
use polars::prelude::DataType;
use tracing::{debug, info};

/// Statistical imputation methods for filling missing values.
pub struct StatisticalImputer;

impl StatisticalImputer {
    /// Fill every column that has missing cells: numeric ones with the
    /// median, categorical ones with the mode.
    ///
    /// Numeric columns are handled before categorical ones. Columns of any
    /// other type are left alone.
    pub fn apply_default(
        table: &mut CleanedTable,
        processing_steps: &mut Vec<String>,
    ) -> Result<()> {
        let (numeric, categorical): (Vec<_>, Vec<_>) = table
            .frame()
            .get_columns()
            .iter()
            .filter(|col| col.null_count() > 0)
            .filter_map(|col| {
                let category = get_dtype_category(col.dtype());
                (category == DtypeCategory::Numeric || category.is_categorical())
                    .then(|| (col.name().to_string(), category))
            })
            .partition(|(_, category)| *category == DtypeCategory::Numeric);

        for (name, _) in &numeric {
            Self::apply_numeric_median(table, name, processing_steps)?;
        }
        for (name, _) in &categorical {
            Self::apply_mode_imputation(table, name, processing_steps)?;
        }

        Ok(())
    }

    /// Apply median imputation to a numeric column.
    ///
    /// Returns the median used, or `None` when the column has no values to
    /// take a median of (the column is then left untouched).
    pub fn apply_numeric_median(
        table: &mut CleanedTable,
        col_name: &str,
        processing_steps: &mut Vec<String>,
    ) -> Result<Option<f64>> {
        let series = table
            .frame()
            .column(col_name)
            .map_err(|_| CleanerError::ColumnNotFound(col_name.to_string()))?
            .as_materialized_series()
            .clone();

        let Some(median_val) = series.median() else {
            debug!("Column '{}' has no values; median imputation skipped", col_name);
            return Ok(None);
        };

        let filled = fill_numeric_nulls(&series, median_val)?;
        table.replace_column(col_name, filled)?;

        info!("Filled {} missing values with median: {}", col_name, median_val);
        processing_steps.push(format!("Filled '{}' with median: {:.2}", col_name, median_val));
        Ok(Some(median_val))
    }

    /// Apply mode imputation to a categorical column.
    ///
    /// A column with no values at all is filled with `"Unknown"`. Boolean
    /// columns stay boolean when they have a mode. Returns the value used.
    pub fn apply_mode_imputation(
        table: &mut CleanedTable,
        col_name: &str,
        processing_steps: &mut Vec<String>,
    ) -> Result<String> {
        let series = table
            .frame()
            .column(col_name)
            .map_err(|_| CleanerError::ColumnNotFound(col_name.to_string()))?
            .as_materialized_series()
            .clone();

        let mode_val = string_mode(&series).unwrap_or_else(|| UNKNOWN_PLACEHOLDER.to_string());
        let filled = match (series.dtype(), mode_val.parse::<bool>()) {
            (DataType::Boolean, Ok(flag)) => fill_bool_nulls(&series, flag)?,
            _ => fill_string_nulls(&series, &mode_val)?,
        };
        table.replace_column(col_name, filled)?;

        info!("Filled {} missing values with mode: {}", col_name, mode_val);
        processing_steps.push(format!("Filled '{}' with mode: '{}'", col_name, mode_val));
        Ok(mode_val)
    }

    /// Drop every row that has a missing cell in any column.
    ///
    /// Returns the number of rows removed.
    pub fn drop_incomplete_rows(
        table: &mut CleanedTable,
        processing_steps: &mut Vec<String>,
    ) -> Result<usize> {
        let keep = complete_rows_mask(table.frame());
        let removed = table.retain_rows(&keep)?;

        info!(
            "Dropped rows with missing values. Rows remaining: {}",
            table.height()
        );
        processing_steps.push(format!("Dropped {} rows with missing values", removed));
        Ok(removed)
    }
}
