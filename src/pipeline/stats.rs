//! Descriptive statistics for numeric columns
//!
//! Aggregates come from the polars chunked-array kernels and keep full
//! precision; rounding to two decimals happens only when a display table is
//! built.

use polars::prelude::*;
use serde::Serialize;

use crate::error::{ProfileError, Result};
use crate::pipeline::types::{float_chunked, numeric_column_names};

/// Quantile with linear interpolation between closest ranks, `None` when
/// the column holds no values
pub fn quantile(values: &Float64Chunked, q: f64) -> Result<Option<f64>> {
    Ok(values.quantile(q.clamp(0.0, 1.0), QuantileMethod::Linear)?)
}

/// Round to two decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Full-precision summary of a set of numeric values
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NumericSummary {
    pub count: usize,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl NumericSummary {
    /// Summary over the non-null values. `std` is the sample deviation
    /// (ddof = 1) and is `None` below two values.
    pub fn from_values(values: &Float64Chunked) -> Self {
        Self {
            count: values.len() - values.null_count(),
            mean: values.mean(),
            median: values.median(),
            std: values.std(1),
            min: values.min(),
            max: values.max(),
        }
    }

    /// Summary of an empty set of values
    pub fn empty() -> Self {
        Self {
            count: 0,
            mean: None,
            median: None,
            std: None,
            min: None,
            max: None,
        }
    }

    /// Copy with every statistic rounded to two decimals
    pub fn rounded(&self) -> Self {
        Self {
            count: self.count,
            mean: self.mean.map(round2),
            median: self.median.map(round2),
            std: self.std.map(round2),
            min: self.min.map(round2),
            max: self.max.map(round2),
        }
    }
}

/// One row of the descriptive statistics table
#[derive(Debug, Clone, Serialize)]
pub struct ColumnStats {
    pub column: String,
    #[serde(flatten)]
    pub summary: NumericSummary,
}

/// Compute count/mean/median/std/min/max for every numeric column.
///
/// Values are rounded to two decimals. Returns `InsufficientData` when the
/// table has no numeric columns at all, which is distinct from a numeric
/// column that holds no data (count 0, every statistic `None`).
pub fn describe_numeric_columns(df: &DataFrame) -> Result<Vec<ColumnStats>> {
    let numeric_cols = numeric_column_names(df);

    if numeric_cols.is_empty() {
        return Err(ProfileError::InsufficientData(
            "No numerical columns found in the dataset".to_string(),
        ));
    }

    let mut stats = Vec::with_capacity(numeric_cols.len());
    for name in numeric_cols {
        let values = float_chunked(df.column(&name)?)?;
        stats.push(ColumnStats {
            column: name,
            summary: NumericSummary::from_values(&values).rounded(),
        });
    }

    tracing::debug!(columns = stats.len(), "descriptive statistics computed");

    Ok(stats)
}
