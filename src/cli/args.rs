//! Command-line argument definitions using clap

use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

use crate::pipeline::{MissingStrategy, HIGH_MISSING_PCT, TOP_CATEGORIES};
use crate::report::PREVIEW_ROWS;

/// tabprof - Profile a tabular dataset: types, quality, statistics, correlations
#[derive(Parser, Debug)]
#[command(name = "tabprof")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Input file path (CSV, Excel or Parquet)
    #[arg(short, long, global = true)]
    pub input: Option<PathBuf>,

    /// Number of rows to use for schema inference (CSV only).
    /// Use 0 for full table scan (slow for large files).
    #[arg(long, default_value = "10000", global = true)]
    pub infer_schema_length: usize,

    /// Missing percentage above which a column is flagged as high-missing
    #[arg(long, default_value_t = HIGH_MISSING_PCT, value_parser = validate_percentage, global = true)]
    pub high_missing_pct: f64,

    /// |r| above which a pair of numeric columns is reported as strongly correlated
    #[arg(long, default_value = "0.7", value_parser = validate_correlation_threshold, global = true)]
    pub correlation_threshold: f64,

    /// Maximum number of categories shown in a numeric-by-category comparison
    #[arg(long, default_value_t = TOP_CATEGORIES, global = true)]
    pub top_categories: usize,

    /// Number of rows in the data preview
    #[arg(long, default_value_t = PREVIEW_ROWS, global = true)]
    pub preview_rows: usize,

    /// Export the profile report (.json for a single document, .zip for a sheet bundle)
    #[arg(long, global = true)]
    pub report: Option<PathBuf>,

    /// Skip interactive confirmation prompts
    #[arg(long, default_value = "false", global = true)]
    pub no_confirm: bool,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Print the full profile: overview, summary, quality, statistics, correlations
    Profile,

    /// Show the distribution of one column (IQR outliers or value counts)
    Distribution {
        /// Column to analyze
        column: String,

        /// Keep only the first row per value of this column before analyzing
        #[arg(long)]
        unique_key: Option<String>,
    },

    /// Compare a numeric column across the categories of another column
    Compare {
        /// Numeric column
        numeric: String,

        /// Categorical column
        categorical: String,

        /// Keep only the first row per value of this column before analyzing
        #[arg(long)]
        unique_key: Option<String>,
    },

    /// Apply cleaning actions and save the resulting table
    Clean(CleanArgs),
}

/// Cleaning actions, applied in the order: duplicates, missing values, column drops
#[derive(ClapArgs, Debug, Clone)]
pub struct CleanArgs {
    /// Remove exact duplicate rows
    #[arg(long)]
    pub drop_duplicates: bool,

    /// Column whose missing values are handled with --strategy
    #[arg(long, requires = "strategy")]
    pub fill: Option<String>,

    /// Missing-value strategy for --fill
    #[arg(long, value_enum, requires = "fill")]
    pub strategy: Option<MissingStrategy>,

    /// Columns to drop (repeatable or comma-separated)
    #[arg(long = "drop-column", value_delimiter = ',')]
    pub drop_columns: Vec<String>,

    /// Output file path (CSV or Parquet, determined by extension).
    /// Defaults to the input directory with a '_cleaned' suffix.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl CleanArgs {
    /// True when no cleaning action was requested
    pub fn is_empty(&self) -> bool {
        !self.drop_duplicates && self.fill.is_none() && self.drop_columns.is_empty()
    }
}

impl Cli {
    /// Subcommand to run; `profile` when none is given
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Profile)
    }
}

/// Validator for correlation_threshold parameter
fn validate_correlation_threshold(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;

    if !(0.0..=1.0).contains(&value) {
        Err(format!(
            "correlation_threshold must be between 0.0 and 1.0, got {}",
            value
        ))
    } else {
        Ok(value)
    }
}

/// Validator for high_missing_pct parameter
fn validate_percentage(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;

    if !(0.0..=100.0).contains(&value) {
        Err(format!(
            "high_missing_pct must be between 0.0 and 100.0, got {}",
            value
        ))
    } else {
        Ok(value)
    }
}
