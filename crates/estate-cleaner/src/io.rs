//! CSV reading and writing.
//!
//! Loading tries progressively more forgiving strategies before giving up;
//! saving creates the destination directory first and never writes an
//! index column.

use crate::error::{CleanerError, Result, ResultExt};
use polars::io::csv::read::{CsvParseOptions, CsvReadOptions, NullValues};
use polars::prelude::*;
use std::fs::{self, File};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Rows sampled for schema inference on the first attempt.
pub const INFER_SCHEMA_ROWS: usize = 100;

/// Cell contents treated as missing in addition to empty fields.
pub const MISSING_MARKERS: [&str; 14] = [
    "NA", "N/A", "n/a", "#N/A", "#NA", "NaN", "nan", "-NaN", "-nan", "NULL", "null", "None",
    "<NA>", "#N/A N/A",
];

fn parse_options() -> CsvParseOptions {
    let markers: Vec<PlSmallStr> = MISSING_MARKERS.iter().map(|m| (*m).into()).collect();
    CsvParseOptions::default()
        .with_quote_char(Some(b'"'))
        .with_null_values(Some(NullValues::AllColumns(markers)))
}

fn read_options(infer_schema_length: Option<usize>) -> CsvReadOptions {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(infer_schema_length)
        .with_parse_options(parse_options())
}

/// Load a CSV file with a header row.
///
/// Strategies, in order:
/// 1. schema inferred from the first [`INFER_SCHEMA_ROWS`] rows
/// 2. schema inferred from the whole file
/// 3. the whole file again after collapsing doubled quotes and blank lines
///
/// Columns with no values at all are typed `Float64`.
pub fn load_csv(path: &Path) -> Result<DataFrame> {
    if !path.is_file() {
        return Err(CleanerError::FileNotFound(path.to_path_buf()));
    }

    match read_options(Some(INFER_SCHEMA_ROWS))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()
    {
        Ok(df) => return type_empty_columns(df),
        Err(e) => debug!("Sampled-schema loading failed: {}", e),
    }

    match read_options(None)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()
    {
        Ok(df) => return type_empty_columns(df),
        Err(e) => debug!("Full-schema loading failed: {}", e),
    }

    let content = fs::read_to_string(path).context(format!("Reading {}", path.display()))?;
    let df = read_options(None)
        .into_reader_with_file_handle(Cursor::new(clean_csv_content(&content)))
        .finish()
        .context(format!("Parsing {}", path.display()))?;
    type_empty_columns(df)
}

/// Cast columns that are entirely empty to `Float64`.
///
/// The reader infers them as text, which would send them to mode imputation.
fn type_empty_columns(mut df: DataFrame) -> Result<DataFrame> {
    if df.height() == 0 {
        return Ok(df);
    }

    let empty: Vec<PlSmallStr> = df
        .get_columns()
        .iter()
        .filter(|c| c.null_count() == c.len())
        .filter(|c| matches!(c.dtype(), DataType::String | DataType::Null))
        .map(|c| c.name().clone())
        .collect();

    for name in empty {
        debug!("Column '{}' has no values, typing it as Float64", name);
        let typed = df
            .column(name.as_str())?
            .as_materialized_series()
            .cast(&DataType::Float64)?;
        df.replace(name.as_str(), typed)?;
    }

    Ok(df)
}

/// Collapse doubled quotes and drop blank lines.
fn clean_csv_content(content: &str) -> String {
    content
        .replace("\"\"\"", "\"")
        .replace("\"\"", "\"")
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Write `df` as comma-separated values with a header row.
///
/// Missing parent directories are created. Returns the path written.
pub fn write_csv(df: &DataFrame, path: &Path) -> Result<PathBuf> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).context(format!("Creating {}", parent.display()))?;
    }

    let mut file = File::create(path).context(format!("Creating {}", path.display()))?;
    let mut out = df.clone();
    CsvWriter::new(&mut file)
        .include_header(true)
        .with_separator(b',')
        .with_quote_char(b'"')
        .finish(&mut out)?;

    Ok(path.to_path_buf())
}

/// Write any serializable value as pretty JSON, creating parent directories.
pub fn write_json<T: serde::Serialize>(value: &T, path: &Path) -> Result<PathBuf> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_string_pretty(value)?)?;
    Ok(path.to_path_buf())
}
