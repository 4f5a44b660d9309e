//! Data quality checks

use polars::prelude::*;
use serde::Serialize;

use crate::error::Result;
use crate::pipeline::summary::null_percentage;
use crate::pipeline::types::{
    classify_feature_type, distinct_count, float_chunked, is_text_column, FeatureType,
};

/// Default threshold (percent) above which missingness is flagged as high
pub const HIGH_MISSING_PCT: f64 = 30.0;

/// A column with at least one null
#[derive(Debug, Clone, Serialize)]
pub struct MissingColumn {
    pub column: String,
    pub count: usize,
    pub pct: f64,
}

/// A column whose missing percentage exceeds the high-missing threshold
#[derive(Debug, Clone, Serialize)]
pub struct HighMissingColumn {
    pub column: String,
    pub pct: f64,
}

/// Aggregate result of all quality checks. Fields are independent.
#[derive(Debug, Clone, Default, Serialize)]
pub struct QualityReport {
    pub columns_with_missing: Vec<MissingColumn>,
    pub columns_high_missing: Vec<HighMissingColumn>,
    pub columns_all_zeros: Vec<String>,
    pub constant_features: Vec<String>,
    pub type_mismatch: Vec<String>,
    pub duplicate_rows: usize,
}

impl QualityReport {
    /// True when no check found anything
    pub fn is_clean(&self) -> bool {
        self.columns_with_missing.is_empty()
            && self.columns_all_zeros.is_empty()
            && self.constant_features.is_empty()
            && self.type_mismatch.is_empty()
            && self.duplicate_rows == 0
    }
}

/// Run every quality check over the table.
///
/// # Arguments
/// * `df` - The working table
/// * `high_missing_pct` - Percent threshold for the high-missing flag (strictly greater)
pub fn perform_quality_checks(df: &DataFrame, high_missing_pct: f64) -> Result<QualityReport> {
    let rows = df.height();
    let mut report = QualityReport::default();

    for column in df.get_columns() {
        let name = column.name().to_string();
        let null_count = column.null_count();
        let pct = null_percentage(null_count, rows);

        if null_count > 0 {
            report.columns_with_missing.push(MissingColumn {
                column: name.clone(),
                count: null_count,
                pct,
            });
        }

        if pct > high_missing_pct {
            report.columns_high_missing.push(HighMissingColumn {
                column: name.clone(),
                pct,
            });
        }

        if classify_feature_type(column) == FeatureType::Numerical && is_all_zeros(column)? {
            report.columns_all_zeros.push(name.clone());
        }

        if distinct_count(column)? == 1 {
            report.constant_features.push(name.clone());
        }

        if is_text_column(column) && is_numeric_text(column)? {
            report.type_mismatch.push(name);
        }
    }

    report.duplicate_rows = count_duplicate_rows(df)?;

    tracing::debug!(
        missing = report.columns_with_missing.len(),
        constant = report.constant_features.len(),
        mismatched = report.type_mismatch.len(),
        duplicates = report.duplicate_rows,
        "quality checks complete"
    );

    Ok(report)
}

/// Non-null values exist and every one of them is zero
fn is_all_zeros(column: &Column) -> Result<bool> {
    let values = float_chunked(column)?;
    Ok(values.min() == Some(0.0) && values.max() == Some(0.0))
}

/// Non-null values exist and every one of them parses as a number
fn is_numeric_text(column: &Column) -> Result<bool> {
    let mut non_null = column.str()?.into_iter().flatten().peekable();
    if non_null.peek().is_none() {
        return Ok(false);
    }
    Ok(non_null.all(parses_as_number))
}

/// Whether a text value is numeric-parseable
pub fn parses_as_number(value: &str) -> bool {
    value.trim().parse::<f64>().is_ok()
}

/// Number of rows that exactly repeat an earlier row
pub fn count_duplicate_rows(df: &DataFrame) -> Result<usize> {
    if df.width() == 0 {
        return Ok(0);
    }
    let distinct = df.unique_stable(None, UniqueKeepStrategy::First, None)?;
    Ok(df.height() - distinct.height())
}

/// One line of the quality-issues sheet
#[derive(Debug, Clone, Serialize)]
pub struct QualityIssue {
    pub issue_type: String,
    pub column: String,
    pub details: String,
}

/// Flatten a quality report into issue rows for export
pub fn quality_issues(report: &QualityReport) -> Vec<QualityIssue> {
    let mut issues = Vec::new();

    for missing in &report.columns_with_missing {
        issues.push(QualityIssue {
            issue_type: "Missing Values".to_string(),
            column: missing.column.clone(),
            details: format!("{} missing ({:.2}%)", missing.count, missing.pct),
        });
    }
    for column in &report.constant_features {
        issues.push(QualityIssue {
            issue_type: "Constant Feature".to_string(),
            column: column.clone(),
            details: "Only 1 unique value".to_string(),
        });
    }
    for column in &report.columns_all_zeros {
        issues.push(QualityIssue {
            issue_type: "All Zeros".to_string(),
            column: column.clone(),
            details: "All values are zero".to_string(),
        });
    }
    for column in &report.type_mismatch {
        issues.push(QualityIssue {
            issue_type: "Type Mismatch".to_string(),
            column: column.clone(),
            details: "Numeric stored as categorical".to_string(),
        });
    }

    issues
}
