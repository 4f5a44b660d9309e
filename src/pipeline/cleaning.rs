//! User-initiated cleaning actions.
//!
//! Each action takes the current table and returns a new one plus a short
//! description of what changed. The input table is never modified.

use polars::prelude::*;
use serde::Serialize;

use crate::error::{ProfileError, Result};
use crate::pipeline::distribution::mode_value;
use crate::pipeline::stats::NumericSummary;
use crate::pipeline::types::{
    classify_feature_type, float_chunked, render_value, require_column, FeatureType,
};

/// Placeholder written by the "Fill with 'Unknown'" strategy
pub const UNKNOWN_PLACEHOLDER: &str = "Unknown";

/// A derived table and a description of the change
#[derive(Debug, Clone)]
pub struct CleaningOutcome {
    pub df: DataFrame,
    pub message: String,
}

/// How to treat missing values in one column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, clap::ValueEnum)]
pub enum MissingStrategy {
    /// Fill with 0 (numeric)
    FillZero,
    /// Fill with the column mean (numeric)
    FillMean,
    /// Fill with the column median (numeric)
    FillMedian,
    /// Fill with the most frequent value (categorical)
    FillMode,
    /// Fill with the text "Unknown" (categorical)
    FillUnknown,
    /// Drop rows where the column is null
    DropRows,
    /// Drop the whole column
    DropColumn,
}

impl MissingStrategy {
    /// Strategies offered for a column of the given type, in menu order
    pub fn options_for(feature_type: FeatureType) -> &'static [MissingStrategy] {
        match feature_type {
            FeatureType::Numerical => &[
                MissingStrategy::FillZero,
                MissingStrategy::FillMean,
                MissingStrategy::FillMedian,
                MissingStrategy::DropRows,
                MissingStrategy::DropColumn,
            ],
            FeatureType::Categorical => &[
                MissingStrategy::FillMode,
                MissingStrategy::FillUnknown,
                MissingStrategy::DropRows,
                MissingStrategy::DropColumn,
            ],
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MissingStrategy::FillZero => "Fill with 0",
            MissingStrategy::FillMean => "Fill with Mean",
            MissingStrategy::FillMedian => "Fill with Median",
            MissingStrategy::FillMode => "Fill with Mode",
            MissingStrategy::FillUnknown => "Fill with 'Unknown'",
            MissingStrategy::DropRows => "Drop Rows",
            MissingStrategy::DropColumn => "Drop Column",
        }
    }
}

impl std::fmt::Display for MissingStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Remove rows that exactly repeat an earlier row
pub fn drop_duplicate_rows(df: &DataFrame) -> Result<CleaningOutcome> {
    let cleaned = df.unique_stable(None, UniqueKeepStrategy::First, None)?;
    let removed = df.height() - cleaned.height();

    Ok(CleaningOutcome {
        df: cleaned,
        message: format!("Removed {} duplicate rows", removed),
    })
}

/// Drop a column by name
pub fn drop_column(df: &DataFrame, column_name: &str) -> Result<CleaningOutcome> {
    require_column(df, column_name)?;
    let cleaned = df.drop(column_name)?;

    Ok(CleaningOutcome {
        df: cleaned,
        message: format!("Dropped column '{}'", column_name),
    })
}

/// Apply a missing-value strategy to one column.
///
/// Returns `InvalidSelection` when the strategy is not offered for the
/// column's type, or when the fill value cannot be computed (e.g. the mean of
/// a column with no values).
pub fn handle_missing_values(
    df: &DataFrame,
    column_name: &str,
    strategy: MissingStrategy,
) -> Result<CleaningOutcome> {
    let column = require_column(df, column_name)?;
    let feature_type = classify_feature_type(column);

    if !MissingStrategy::options_for(feature_type).contains(&strategy) {
        return Err(ProfileError::InvalidSelection(format!(
            "'{}' cannot be applied to {} column '{}'",
            strategy,
            feature_type.to_string().to_lowercase(),
            column_name
        )));
    }

    match strategy {
        MissingStrategy::DropRows => {
            let mask = column.as_materialized_series().is_not_null();
            Ok(CleaningOutcome {
                df: df.filter(&mask)?,
                message: format!("Removed rows with missing values in '{}'", column_name),
            })
        }
        MissingStrategy::DropColumn => drop_column(df, column_name),
        MissingStrategy::FillZero => {
            // Zero fits every numeric dtype, so keep the original one
            let filled = col(column_name)
                .fill_null(lit(0))
                .cast(column.dtype().clone());
            Ok(CleaningOutcome {
                df: replace_column(df, column_name, filled)?,
                message: format!("Filled missing values in '{}' with 0", column_name),
            })
        }
        MissingStrategy::FillMean | MissingStrategy::FillMedian => {
            let summary = NumericSummary::from_values(&float_chunked(column)?);
            let (fill, label) = if strategy == MissingStrategy::FillMean {
                (summary.mean, "Mean")
            } else {
                (summary.median, "Median")
            };
            let fill = fill.ok_or_else(|| {
                ProfileError::InvalidSelection(format!(
                    "Column '{}' has no values to compute a {} from",
                    column_name,
                    label.to_lowercase()
                ))
            })?;

            let filled = col(column_name)
                .cast(DataType::Float64)
                .fill_null(lit(fill));
            Ok(CleaningOutcome {
                df: replace_column(df, column_name, filled)?,
                message: format!(
                    "Filled missing values in '{}' with {} ({:.2})",
                    column_name, label, fill
                ),
            })
        }
        MissingStrategy::FillMode => {
            let mode = mode_value(column)?.ok_or_else(|| {
                ProfileError::InvalidSelection(format!(
                    "Column '{}' has no values to compute a mode from",
                    column_name
                ))
            })?;
            let shown = render_value(mode.as_any_value()).unwrap_or_default();

            Ok(CleaningOutcome {
                df: replace_column(df, column_name, col(column_name).fill_null(lit(mode)))?,
                message: format!(
                    "Filled missing values in '{}' with Mode ('{}')",
                    column_name, shown
                ),
            })
        }
        MissingStrategy::FillUnknown => {
            let filled = col(column_name)
                .cast(DataType::String)
                .fill_null(lit(UNKNOWN_PLACEHOLDER));
            Ok(CleaningOutcome {
                df: replace_column(df, column_name, filled)?,
                message: format!(
                    "Filled missing values in '{}' with '{}'",
                    column_name, UNKNOWN_PLACEHOLDER
                ),
            })
        }
    }
}

/// Copy of the table with `column_name` recomputed in place
fn replace_column(df: &DataFrame, column_name: &str, expr: Expr) -> Result<DataFrame> {
    Ok(df
        .clone()
        .lazy()
        .with_column(expr.alias(column_name))
        .collect()?)
}
