//! Integration tests for the cleaning pipeline.
//!
//! These tests drive the public API against the CSV fixtures in
//! `tests/fixtures`.

use estate_cleaner::{
    CleanerConfig, CleanerError, CleaningStage, MissingValueStrategy, OutlierMethod,
    ProgressUpdate, TabularCleaner,
};
use polars::prelude::*;
use pretty_assertions::assert_eq;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

// ============================================================================
// Helper Functions
// ============================================================================

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn fixture(filename: &str) -> PathBuf {
    fixtures_path().join(filename)
}

/// Cleaner over the house sample with missing values already handled.
fn cleaned_sample(strategy: MissingValueStrategy) -> TabularCleaner {
    let mut cleaner = TabularCleaner::new();
    cleaner.load(fixture("kc_house_sample.csv")).unwrap();
    cleaner.handle_missing_values(&strategy).unwrap();
    cleaner
}

fn f64_column(cleaner: &TabularCleaner, name: &str) -> Vec<Option<f64>> {
    cleaner
        .cleaned()
        .unwrap()
        .frame()
        .column(name)
        .unwrap()
        .as_materialized_series()
        .cast(&DataType::Float64)
        .unwrap()
        .f64()
        .unwrap()
        .into_iter()
        .collect()
}

fn str_column(cleaner: &TabularCleaner, name: &str) -> Vec<Option<String>> {
    cleaner
        .cleaned()
        .unwrap()
        .frame()
        .column(name)
        .unwrap()
        .as_materialized_series()
        .str()
        .unwrap()
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect()
}

// ============================================================================
// Quality Report Tests
// ============================================================================

#[test]
fn test_quality_report_on_house_sample() {
    let mut cleaner = TabularCleaner::new();
    cleaner.load(fixture("kc_house_sample.csv")).unwrap();

    let report = cleaner.generate_quality_report().unwrap();

    assert_eq!(report.total_rows, 11);
    assert_eq!(report.total_columns, 9);
    assert_eq!(report.duplicate_rows, 1);
    assert_eq!(report.total_missing(), 4);
    assert_eq!(
        report.numeric_columns,
        vec!["id", "price", "bedrooms", "bathrooms", "sqft_living", "zipcode"]
    );

    for name in ["price", "bedrooms", "waterfront", "condition"] {
        let column = report.column(name).unwrap();
        assert_eq!(column.missing_count, 1, "{name}");
        assert_eq!(column.missing_percentage, 9.09, "{name}");
    }
    assert_eq!(report.column("zipcode").unwrap().missing_percentage, 0.0);
}

#[test]
fn test_quality_report_text_without_missing_values() {
    let mut cleaner = TabularCleaner::new();
    cleaner.load(fixture("no_missing.csv")).unwrap();

    let text = cleaner.generate_quality_report().unwrap().to_string();

    assert!(text.contains("Dataset Shape: 3 rows x 4 columns"));
    assert!(text.contains("No missing values found!"));
    assert!(text.contains("NUMERIC COLUMNS: 4"));
}

// ============================================================================
// Missing Value Tests
// ============================================================================

#[test]
fn test_drop_strategy_leaves_no_missing_cells() {
    let cleaner = cleaned_sample(MissingValueStrategy::Drop);
    let table = cleaner.cleaned().unwrap();

    assert_eq!(table.null_count(), 0);
    assert_eq!(table.height(), 7);
    assert_eq!(table.row_ids(), &[0, 1, 3, 5, 8, 9, 10]);
}

#[test]
fn test_default_strategy_fills_median_and_mode() {
    let cleaner = cleaned_sample(MissingValueStrategy::Default);

    assert_eq!(cleaner.cleaned().unwrap().null_count(), 0);
    assert_eq!(f64_column(&cleaner, "price")[4], Some(307425.0));
    assert_eq!(f64_column(&cleaner, "bedrooms")[7], Some(3.0));
    assert_eq!(str_column(&cleaner, "waterfront")[2], Some("N".to_string()));
    assert_eq!(str_column(&cleaner, "condition")[6], Some("Average".to_string()));

    // Raw table keeps its gaps
    assert_eq!(cleaner.raw().unwrap().frame().column("price").unwrap().null_count(), 1);
}

// ============================================================================
// Duplicate Tests
// ============================================================================

#[test]
fn test_remove_duplicates_is_idempotent() {
    let mut cleaner = cleaned_sample(MissingValueStrategy::Default);

    assert_eq!(cleaner.remove_duplicates().unwrap(), 1);
    let after_first = cleaner.cleaned().unwrap().row_ids().to_vec();

    assert_eq!(cleaner.remove_duplicates().unwrap(), 0);
    assert_eq!(cleaner.cleaned().unwrap().row_ids(), after_first.as_slice());
    assert_eq!(after_first, (0..10).collect::<Vec<_>>());
}

#[test]
fn test_remove_duplicates_requires_cleaned_table() {
    let mut cleaner = TabularCleaner::new();
    cleaner.load(fixture("kc_house_sample.csv")).unwrap();

    let err = cleaner.remove_duplicates().unwrap_err();
    assert!(matches!(err, CleanerError::NoCleanedData));
    assert!(err.is_state_error());
}

// ============================================================================
// Outlier Tests
// ============================================================================

#[test]
fn test_iqr_flags_single_extreme_value() {
    let mut cleaner = TabularCleaner::new();
    cleaner.load(fixture("outlier_values.csv")).unwrap();
    cleaner
        .handle_missing_values(&MissingValueStrategy::Default)
        .unwrap();

    let report = cleaner.detect_outliers(OutlierMethod::Iqr, None).unwrap();
    let column = report.column("v").unwrap();

    assert_eq!(column.count, 1);
    assert_eq!(column.row_ids, vec![5]);
    assert_eq!(column.lower_bound, Some(-1.5));
    assert_eq!(column.upper_bound, Some(8.5));
    assert!((column.percentage - 100.0 / 6.0).abs() < 1e-9);
}

#[test]
fn test_iqr_on_house_prices() {
    let mut cleaner = cleaned_sample(MissingValueStrategy::Default);
    cleaner.remove_duplicates().unwrap();

    let columns = vec!["price".to_string()];
    let report = cleaner
        .detect_outliers(OutlierMethod::Iqr, Some(columns.as_slice()))
        .unwrap();

    assert_eq!(report.rows, 10);
    assert_eq!(report.columns.len(), 1);
    assert_eq!(report.columns[0].row_ids, vec![5]);
    assert_eq!(report.columns[0].percentage, 10.0);
}

#[test]
fn test_zscore_cannot_flag_in_ten_rows() {
    // With n rows, |z| never exceeds (n - 1) / sqrt(n), which is below 3 for n = 10
    let mut cleaner = cleaned_sample(MissingValueStrategy::Default);
    cleaner.remove_duplicates().unwrap();

    let report = cleaner.detect_outliers(OutlierMethod::Zscore, None).unwrap();

    assert_eq!(report.method, OutlierMethod::Zscore);
    assert_eq!(report.total_flags(), 0);
}

#[test]
fn test_detect_outliers_does_not_modify_table() {
    let cleaner = cleaned_sample(MissingValueStrategy::Default);
    let before = cleaner.cleaned().unwrap().shape();

    cleaner.detect_outliers(OutlierMethod::Iqr, None).unwrap();

    assert_eq!(cleaner.cleaned().unwrap().shape(), before);
}

#[test]
fn test_detect_outliers_rejects_text_column() {
    let cleaner = cleaned_sample(MissingValueStrategy::Default);
    let columns = vec!["condition".to_string()];

    let err = cleaner
        .detect_outliers(OutlierMethod::Iqr, Some(columns.as_slice()))
        .unwrap_err();

    assert!(matches!(err, CleanerError::NonNumericColumn { .. }));
}

// ============================================================================
// Full Pipeline Tests
// ============================================================================

#[test]
fn test_pipeline_missing_input_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("processed").join("out.csv");
    let config = CleanerConfig::builder()
        .input_path(dir.path().join("does_not_exist.csv"))
        .output_path(&output)
        .build()
        .unwrap();

    let result = TabularCleaner::new().run_pipeline(&config);

    let err = result.unwrap_err();
    assert!(err.is_io_error());
    assert!(!output.exists());
    assert!(!output.parent().unwrap().exists());
}

#[test]
fn test_pipeline_save_and_reload_keeps_shape() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("nested").join("dir").join("clean.csv");
    let config = CleanerConfig::builder()
        .input_path(fixture("kc_house_sample.csv"))
        .output_path(&output)
        .build()
        .unwrap();

    let summary = TabularCleaner::new().run_pipeline(&config).unwrap();
    assert_eq!(summary.initial_shape, (11, 9));
    assert_eq!(summary.final_shape, (10, 9));
    assert_eq!(summary.final_missing, 0);
    assert_eq!(summary.rows_removed(), 1);

    let reloaded = estate_cleaner::io::load_csv(&output).unwrap();
    assert_eq!(reloaded.shape(), summary.final_shape);
    assert_eq!(
        reloaded.get_column_names_str(),
        vec![
            "id",
            "date",
            "price",
            "bedrooms",
            "bathrooms",
            "sqft_living",
            "waterfront",
            "condition",
            "zipcode"
        ]
    );
}

#[test]
fn test_pipeline_drop_strategy_with_outlier_removal_requested() {
    let dir = TempDir::new().unwrap();
    let config = CleanerConfig::builder()
        .input_path(fixture("kc_house_sample.csv"))
        .output_path(dir.path().join("clean.csv"))
        .missing_strategy(MissingValueStrategy::Drop)
        .remove_outliers(true)
        .build()
        .unwrap();

    let summary = TabularCleaner::new().run_pipeline(&config).unwrap();

    assert_eq!(summary.rows_dropped, 4);
    assert_eq!(summary.duplicates_removed, 1);
    // Outliers are reported, never removed
    assert_eq!(summary.final_shape, (6, 9));
    assert!(summary.outliers.total_flags() > 0);
}

#[test]
fn test_pipeline_progress_stages_in_order() {
    let dir = TempDir::new().unwrap();
    let config = CleanerConfig::builder()
        .input_path(fixture("kc_house_sample.csv"))
        .output_path(dir.path().join("clean.csv"))
        .build()
        .unwrap();

    let updates: Arc<Mutex<Vec<ProgressUpdate>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&updates);
    let mut cleaner = TabularCleaner::builder()
        .on_progress(move |update| sink.lock().unwrap().push(update))
        .build();

    cleaner.run_pipeline(&config).unwrap();

    let updates = updates.lock().unwrap();
    let mut stages: Vec<CleaningStage> = updates.iter().map(|u| u.stage).collect();
    stages.dedup();
    assert_eq!(
        stages,
        vec![
            CleaningStage::Loading,
            CleaningStage::QualityReport,
            CleaningStage::MissingValues,
            CleaningStage::Deduplication,
            CleaningStage::OutlierDetection,
            CleaningStage::Validation,
            CleaningStage::Saving,
            CleaningStage::Complete,
        ]
    );

    let progress: Vec<f32> = updates.iter().map(|u| u.progress).collect();
    assert!(progress.windows(2).all(|w| w[0] <= w[1] + 1e-6));
    assert!(updates.iter().any(|u| u.message == "Rows: 11 -> 11"));
}

#[test]
fn test_pipeline_with_config_file_and_report() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("cleaner.json");
    let report_path = dir.path().join("reports").join("run.json");
    std::fs::write(
        &config_path,
        serde_json::json!({
            "input_path": fixture("kc_house_sample.csv"),
            "output_path": dir.path().join("clean.csv"),
            "outlier_method": "zscore",
            "report_path": report_path,
        })
        .to_string(),
    )
    .unwrap();

    let config = CleanerConfig::from_json_file(&config_path).unwrap();
    assert_eq!(config.outlier_method, OutlierMethod::Zscore);

    TabularCleaner::new().run_pipeline(&config).unwrap();

    let report: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(report["initial_quality"]["duplicate_rows"], 1);
    assert_eq!(report["final_quality"]["duplicate_rows"], 0);
    assert_eq!(report["outliers"]["method"], "zscore");
    assert_eq!(report["final_shape"], serde_json::json!([10, 9]));
}
