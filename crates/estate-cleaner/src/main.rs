//! CLI entry point for the real-estate cleaning pipeline.

use anyhow::Result;
use clap::{Parser, ValueEnum};
use estate_cleaner::{
    CleanerConfig, CleaningStage, CleaningSummary, MissingValueStrategy, OutlierMethod,
    TabularCleaner,
};
use std::path::PathBuf;
use tracing::{error, info};

/// CLI-compatible outlier method enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliOutlierMethod {
    /// Flag values outside the Tukey fences
    Iqr,
    /// Flag values more than the threshold standard deviations from the mean
    #[value(alias = "z-score")]
    Zscore,
}

impl From<CliOutlierMethod> for OutlierMethod {
    fn from(cli: CliOutlierMethod) -> Self {
        match cli {
            CliOutlierMethod::Iqr => OutlierMethod::Iqr,
            CliOutlierMethod::Zscore => OutlierMethod::Zscore,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Real-estate dataset cleaning pipeline",
    long_about = "Loads a housing-sales CSV, reports its data quality, handles missing values, \
                  removes duplicate rows, flags outliers and saves the cleaned table.\n\n\
                  EXAMPLES:\n  \
                  # Clean data/raw/kc_house_data.csv into data/processed/\n  \
                  estate-cleaner\n\n  \
                  # Drop incomplete rows and use z-scores\n  \
                  estate-cleaner -i sales.csv --missing-strategy drop --outlier-method zscore\n\n  \
                  # Settings from a file, plus a JSON run report\n  \
                  estate-cleaner --config cleaner.json --emit-report reports/run.json"
)]
struct Args {
    /// Path to the CSV file to clean [default: data/raw/kc_house_data.csv]
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Where to write the cleaned CSV [default: data/processed/cleaned_housing_data.csv]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Missing value strategy: "default" (median/mode) or "drop"
    ///
    /// Any other name leaves missing values untouched
    #[arg(long)]
    missing_strategy: Option<String>,

    /// Outlier detection method [default: iqr]
    #[arg(long, value_enum)]
    outlier_method: Option<CliOutlierMethod>,

    /// Request outlier removal (outliers are reported, never removed)
    #[arg(long)]
    remove_outliers: bool,

    /// IQR fence multiplier [default: 1.5]
    #[arg(long)]
    iqr_multiplier: Option<f64>,

    /// Z-score threshold [default: 3.0]
    #[arg(long)]
    zscore_threshold: Option<f64>,

    /// Load settings from a JSON file; command-line flags override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write a JSON run report to this path
    #[arg(short = 'r', long)]
    emit_report: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show errors and final result)
    #[arg(short, long)]
    quiet: bool,
}

/// Initialize the tracing subscriber for logging.
fn init_logging(level: &str, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Merge the config file (if any) with command-line overrides.
fn build_config(args: &Args) -> Result<CleanerConfig> {
    let base = match &args.config {
        Some(path) => {
            info!("Reading configuration from: {}", path.display());
            CleanerConfig::from_json_file(path)?
        }
        None => CleanerConfig::default(),
    };

    let mut builder = CleanerConfig::builder()
        .input_path(args.input.clone().unwrap_or(base.input_path))
        .output_path(args.output.clone().unwrap_or(base.output_path))
        .missing_strategy(match &args.missing_strategy {
            Some(name) => name.parse::<MissingValueStrategy>()?,
            None => base.missing_strategy,
        })
        .outlier_method(args.outlier_method.map_or(base.outlier_method, Into::into))
        .remove_outliers(args.remove_outliers || base.remove_outliers)
        .iqr_multiplier(args.iqr_multiplier.unwrap_or(base.iqr_multiplier))
        .zscore_threshold(args.zscore_threshold.unwrap_or(base.zscore_threshold));

    if let Some(path) = args.emit_report.clone().or(base.report_path) {
        builder = builder.report_path(path);
    }

    Ok(builder.build()?)
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet);

    let config = build_config(&args)?;

    let mut builder = TabularCleaner::builder().config(config.clone());
    if !args.quiet {
        builder = builder.on_progress(|update| match update.stage {
            CleaningStage::Failed => error!("{}", update.message),
            stage => info!(
                "[{:.0}%] {}: {}",
                update.progress * 100.0,
                stage.display_name(),
                update.message
            ),
        });
    }
    let mut cleaner = builder.build();

    match cleaner.run_pipeline(&config) {
        Ok(summary) => {
            print_summary(&summary);
            if let Some(path) = &config.report_path
                && path.is_file()
            {
                info!("Report written to: {}", path.display());
            }
            println!("Data cleaning completed successfully!");
        }
        Err(e) => {
            error!("Pipeline failed: {}", e);
            println!("Data cleaning failed!");
        }
    }

    Ok(())
}

/// Print the final summary block.
fn print_summary(summary: &CleaningSummary) {
    let (rows, cols) = summary.final_shape;

    println!("\nFINAL CLEANED DATA:");
    println!("Shape: ({}, {})", rows, cols);
    println!("Missing values: {}", summary.final_missing);
    println!("Saved to: {}", summary.output.display());
}
