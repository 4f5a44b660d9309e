//! Per-column feature summary

use polars::prelude::*;
use serde::Serialize;

use crate::error::Result;
use crate::pipeline::stats::round2;
use crate::pipeline::types::{classify_feature_type, distinct_count, FeatureType};

/// Metadata for one column of the table
#[derive(Debug, Clone, Serialize)]
pub struct ColumnSummary {
    pub name: String,
    /// Raw storage type label (polars dtype)
    pub data_type: String,
    pub feature_type: FeatureType,
    pub unique_values: usize,
    pub null_values: usize,
    /// `100 * nulls / rows`, rounded to two decimals
    pub null_pct: f64,
}

/// Build the feature summary table, one entry per column in table order.
///
/// The caller guarantees a non-empty table; a zero-row table reports 0%.
pub fn create_feature_summary(df: &DataFrame) -> Result<Vec<ColumnSummary>> {
    let rows = df.height();

    df.get_columns()
        .iter()
        .map(|column| {
            let null_values = column.null_count();
            Ok(ColumnSummary {
                name: column.name().to_string(),
                data_type: column.dtype().to_string(),
                feature_type: classify_feature_type(column),
                unique_values: distinct_count(column)?,
                null_values,
                null_pct: round2(null_percentage(null_values, rows)),
            })
        })
        .collect()
}

/// `100 * nulls / rows`, or 0 for an empty table
pub fn null_percentage(null_count: usize, rows: usize) -> f64 {
    if rows == 0 {
        0.0
    } else {
        null_count as f64 / rows as f64 * 100.0
    }
}

/// Aggregate counts shown above the feature summary table
#[derive(Debug, Clone, Serialize)]
pub struct FeatureCounts {
    pub numerical: usize,
    pub categorical: usize,
    pub columns_with_nulls: usize,
    /// Mean unique-value count across columns, truncated
    pub avg_unique_values: usize,
}

impl FeatureCounts {
    pub fn from_summary(summary: &[ColumnSummary]) -> Self {
        let numerical = summary
            .iter()
            .filter(|s| s.feature_type == FeatureType::Numerical)
            .count();
        let avg_unique_values = if summary.is_empty() {
            0
        } else {
            summary.iter().map(|s| s.unique_values).sum::<usize>() / summary.len()
        };

        Self {
            numerical,
            categorical: summary.len() - numerical,
            columns_with_nulls: summary.iter().filter(|s| s.null_values > 0).count(),
            avg_unique_values,
        }
    }
}

/// Null counts for columns that have any, sorted descending (chart data)
pub fn missing_value_counts(summary: &[ColumnSummary]) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = summary
        .iter()
        .filter(|s| s.null_values > 0)
        .map(|s| (s.name.clone(), s.null_values))
        .collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}
