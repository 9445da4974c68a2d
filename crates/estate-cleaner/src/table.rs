//! Table types owned by the cleaner.
//!
//! [`RawTable`] is the frame exactly as loaded. [`CleanedTable`] is the
//! working copy every cleaning step mutates; it remembers the raw row id of
//! each surviving row so reports can point back at the source file.

use crate::utils::{numeric_column_names, total_null_count};
use polars::prelude::*;
use std::path::{Path, PathBuf};

/// The table as loaded from disk. Never mutated after loading.
#[derive(Debug, Clone)]
pub struct RawTable {
    frame: DataFrame,
    source: PathBuf,
}

impl RawTable {
    pub fn new(frame: DataFrame, source: impl Into<PathBuf>) -> Self {
        Self {
            frame,
            source: source.into(),
        }
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    /// File the table was read from.
    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn shape(&self) -> (usize, usize) {
        self.frame.shape()
    }
}

/// Working copy of a [`RawTable`].
///
/// Cells are overwritten by imputation and rows removed by dropping or
/// deduplication. `row_ids[i]` is the raw row position of row `i`.
#[derive(Debug, Clone)]
pub struct CleanedTable {
    frame: DataFrame,
    row_ids: Vec<usize>,
}

impl CleanedTable {
    /// Start a working copy holding every raw row.
    pub fn from_raw(raw: &RawTable) -> Self {
        let frame = raw.frame().clone();
        let row_ids = (0..frame.height()).collect();
        Self { frame, row_ids }
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn into_frame(self) -> DataFrame {
        self.frame
    }

    /// Raw row ids of the rows still present, in table order.
    pub fn row_ids(&self) -> &[usize] {
        &self.row_ids
    }

    pub fn height(&self) -> usize {
        self.frame.height()
    }

    pub fn width(&self) -> usize {
        self.frame.width()
    }

    pub fn shape(&self) -> (usize, usize) {
        self.frame.shape()
    }

    pub fn numeric_columns(&self) -> Vec<String> {
        numeric_column_names(&self.frame)
    }

    /// Total number of missing cells left in the table.
    pub fn null_count(&self) -> usize {
        total_null_count(&self.frame)
    }

    /// Swap a column for a same-length replacement.
    pub fn replace_column(&mut self, name: &str, series: Series) -> PolarsResult<()> {
        self.frame.replace(name, series)?;
        Ok(())
    }

    /// Keep the rows whose mask entry is `true`; returns how many were removed.
    pub fn retain_rows(&mut self, keep: &[bool]) -> PolarsResult<usize> {
        let before = self.frame.height();
        if keep.len() != before {
            return Err(PolarsError::ShapeMismatch(
                format!(
                    "row mask has {} entries but the table has {} rows",
                    keep.len(),
                    before
                )
                .into(),
            ));
        }

        if keep.iter().all(|k| *k) {
            return Ok(0);
        }

        let mask = BooleanChunked::from_slice("mask".into(), keep);
        self.frame = self.frame.filter(&mask)?;
        self.row_ids = self
            .row_ids
            .iter()
            .zip(keep)
            .filter(|(_, k)| **k)
            .map(|(id, _)| *id)
            .collect();

        Ok(before - self.frame.height())
    }
}
