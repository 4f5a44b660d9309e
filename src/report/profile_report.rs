//! Profile report assembly and export
//!
//! The report is a snapshot of every analysis taken at one point in time. It
//! is not kept in sync with later cleaning actions; assemble a new one after
//! the table changes.
//!
//! Two export forms exist: a single pretty-printed JSON document, and a zip
//! bundle holding one CSV "sheet" per section plus the JSON.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use polars::prelude::*;
use serde::Serialize;

use crate::pipeline::stats::round2;
use crate::pipeline::{
    compute_correlation_analysis, create_feature_summary, describe_numeric_columns,
    estimated_memory_mb, perform_quality_checks, quality_issues, rendered_values, ColumnStats,
    ColumnSummary, CorrelatedPair, CorrelationMatrix, FeatureCounts, QualityIssue, QualityReport,
    Session,
};

/// Default number of rows in the data preview
pub const PREVIEW_ROWS: usize = 100;

/// Report metadata
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    pub timestamp: String,
    pub tabprof_version: String,
    pub source_file: String,
    /// Session version the snapshot was taken from
    pub table_version: u64,
}

/// Dataset-level overview (first sheet)
#[derive(Debug, Clone, Serialize)]
pub struct FileOverview {
    pub file_type: String,
    pub total_rows: usize,
    pub total_columns: usize,
    pub memory_usage_mb: f64,
    pub duplicate_rows: usize,
    pub columns_with_missing: usize,
}

/// Leading rows of the table rendered as text
#[derive(Debug, Clone, Serialize)]
pub struct DataPreview {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

/// An analysis that could not run, with the reason
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Section<T> {
    Available(T),
    NotApplicable(String),
}

impl<T> Section<T> {
    fn from_result(result: crate::error::Result<T>) -> crate::error::Result<Self> {
        match result {
            Ok(value) => Ok(Section::Available(value)),
            Err(e) if e.is_user_facing() => Ok(Section::NotApplicable(e.to_string())),
            Err(e) => Err(e),
        }
    }

    pub fn available(&self) -> Option<&T> {
        match self {
            Section::Available(value) => Some(value),
            Section::NotApplicable(_) => None,
        }
    }
}

/// Correlation part of the report
#[derive(Debug, Clone, Serialize)]
pub struct CorrelationSection {
    pub matrix: CorrelationMatrix,
    pub strong_pairs: Vec<CorrelatedPair>,
    pub insights: Vec<String>,
}

/// Complete profile report
#[derive(Debug, Clone, Serialize)]
pub struct ProfileReport {
    pub metadata: ReportMetadata,
    pub overview: FileOverview,
    pub feature_counts: FeatureCounts,
    pub feature_summary: Vec<ColumnSummary>,
    pub quality: QualityReport,
    pub quality_issues: Vec<QualityIssue>,
    pub descriptive_stats: Section<Vec<ColumnStats>>,
    pub correlation: Section<CorrelationSection>,
    pub preview: DataPreview,
}

/// Settings the report is assembled with
#[derive(Debug, Clone)]
pub struct ReportSettings {
    pub high_missing_pct: f64,
    pub correlation_threshold: f64,
    pub preview_rows: usize,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            high_missing_pct: crate::pipeline::HIGH_MISSING_PCT,
            correlation_threshold: crate::pipeline::STRONG_CORRELATION_THRESHOLD,
            preview_rows: PREVIEW_ROWS,
        }
    }
}

/// Run every analysis over the session's current table and bundle the results
pub fn build_profile_report(
    session: &Session,
    settings: &ReportSettings,
) -> crate::error::Result<ProfileReport> {
    let df = session.table();

    let feature_summary = create_feature_summary(df)?;
    let quality = perform_quality_checks(df, settings.high_missing_pct)?;
    let descriptive_stats = Section::from_result(describe_numeric_columns(df))?;
    let correlation = Section::from_result(
        compute_correlation_analysis(df, settings.correlation_threshold).map(|analysis| {
            CorrelationSection {
                matrix: analysis.matrix,
                strong_pairs: analysis.strong_pairs,
                insights: analysis.insights,
            }
        }),
    )?;

    assemble_report(
        session,
        feature_summary,
        quality,
        descriptive_stats,
        correlation,
        settings.preview_rows,
    )
}

/// Bundle already-computed results into a report without recomputing them
pub fn assemble_report(
    session: &Session,
    feature_summary: Vec<ColumnSummary>,
    quality: QualityReport,
    descriptive_stats: Section<Vec<ColumnStats>>,
    correlation: Section<CorrelationSection>,
    preview_rows: usize,
) -> crate::error::Result<ProfileReport> {
    let df = session.table();
    let (rows, cols) = df.shape();

    let overview = FileOverview {
        file_type: session.format().label().to_string(),
        total_rows: rows,
        total_columns: cols,
        memory_usage_mb: round2(estimated_memory_mb(df)),
        duplicate_rows: quality.duplicate_rows,
        columns_with_missing: quality.columns_with_missing.len(),
    };

    Ok(ProfileReport {
        metadata: ReportMetadata {
            timestamp: Utc::now().to_rfc3339(),
            tabprof_version: env!("CARGO_PKG_VERSION").to_string(),
            source_file: session.source().to_string(),
            table_version: session.version(),
        },
        overview,
        feature_counts: FeatureCounts::from_summary(&feature_summary),
        feature_summary,
        quality_issues: quality_issues(&quality),
        quality,
        descriptive_stats,
        correlation,
        preview: data_preview(df, preview_rows)?,
    })
}

/// First `limit` rows of the table as text
pub fn data_preview(df: &DataFrame, limit: usize) -> crate::error::Result<DataPreview> {
    let head = df.head(Some(limit));
    let columns: Vec<Vec<Option<String>>> = head
        .get_columns()
        .iter()
        .map(rendered_values)
        .collect::<crate::error::Result<_>>()?;

    let rows = (0..head.height())
        .map(|row| columns.iter().map(|col| col[row].clone()).collect())
        .collect();

    Ok(DataPreview {
        columns: head
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect(),
        rows,
    })
}

/// Export the report to a JSON file
pub fn export_report_json(report: &ProfileReport, output_path: &Path) -> Result<()> {
    let json =
        serde_json::to_string_pretty(report).context("Failed to serialize profile report to JSON")?;

    std::fs::write(output_path, json)
        .with_context(|| format!("Failed to write profile report to {}", output_path.display()))?;

    tracing::info!(path = %output_path.display(), "profile report exported");

    Ok(())
}

/// A named CSV sheet of the bundle
#[derive(Debug, Clone)]
pub struct Sheet {
    pub name: String,
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Sheet {
    fn new(name: &str, header: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            header: header.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Render as CSV text
    pub fn to_csv(&self) -> String {
        let mut out = String::new();
        out.push_str(&csv_line(&self.header));
        for row in &self.rows {
            out.push_str(&csv_line(row));
        }
        out
    }
}

fn csv_line(fields: &[String]) -> String {
    let escaped: Vec<String> = fields.iter().map(|f| escape_csv_field(f)).collect();
    format!("{}\n", escaped.join(","))
}

/// Escape a field for CSV (handle commas and quotes)
fn escape_csv_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn fmt_opt(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Lay the report out as sheets, skipping sections that do not apply.
///
/// Order: Overview, Feature Summary, Quality Issues, Descriptive Stats,
/// Correlation Matrix, Data Preview.
pub fn report_sheets(report: &ProfileReport) -> Vec<Sheet> {
    let mut sheets = Vec::new();

    let mut overview = Sheet::new("Overview", &["Metric", "Value"]);
    let o = &report.overview;
    for (metric, value) in [
        ("File Type", o.file_type.clone()),
        ("Total Rows", o.total_rows.to_string()),
        ("Total Columns", o.total_columns.to_string()),
        ("Memory Usage (MB)", format!("{:.2}", o.memory_usage_mb)),
        ("Duplicate Rows", o.duplicate_rows.to_string()),
        ("Columns with Missing Values", o.columns_with_missing.to_string()),
    ] {
        overview.rows.push(vec![metric.to_string(), value]);
    }
    sheets.push(overview);

    let mut summary = Sheet::new(
        "Feature Summary",
        &[
            "Column Name",
            "Data Type",
            "Feature Type",
            "Unique Values",
            "Null Values",
            "Null %",
        ],
    );
    for s in &report.feature_summary {
        summary.rows.push(vec![
            s.name.clone(),
            s.data_type.clone(),
            s.feature_type.to_string(),
            s.unique_values.to_string(),
            s.null_values.to_string(),
            s.null_pct.to_string(),
        ]);
    }
    sheets.push(summary);

    if !report.quality_issues.is_empty() {
        let mut issues = Sheet::new("Quality Issues", &["Issue Type", "Column", "Details"]);
        for issue in &report.quality_issues {
            issues.rows.push(vec![
                issue.issue_type.clone(),
                issue.column.clone(),
                issue.details.clone(),
            ]);
        }
        sheets.push(issues);
    }

    if let Some(stats) = report.descriptive_stats.available() {
        let mut sheet = Sheet::new(
            "Descriptive Stats",
            &["", "count", "mean", "median", "std", "min", "max"],
        );
        for s in stats {
            sheet.rows.push(vec![
                s.column.clone(),
                s.summary.count.to_string(),
                fmt_opt(s.summary.mean),
                fmt_opt(s.summary.median),
                fmt_opt(s.summary.std),
                fmt_opt(s.summary.min),
                fmt_opt(s.summary.max),
            ]);
        }
        sheets.push(sheet);
    }

    if let Some(corr) = report.correlation.available() {
        let mut header = vec![String::new()];
        header.extend(corr.matrix.columns.iter().cloned());
        let mut sheet = Sheet {
            name: "Correlation Matrix".to_string(),
            header,
            rows: Vec::new(),
        };
        for (name, row) in corr.matrix.columns.iter().zip(corr.matrix.values.iter()) {
            let mut line = vec![name.clone()];
            line.extend(row.iter().map(|v| fmt_opt(*v)));
            sheet.rows.push(line);
        }
        sheets.push(sheet);
    }

    let mut preview = Sheet {
        name: "Data Preview".to_string(),
        header: report.preview.columns.clone(),
        rows: Vec::new(),
    };
    for row in &report.preview.rows {
        preview
            .rows
            .push(row.iter().map(|v| v.clone().unwrap_or_default()).collect());
    }
    sheets.push(preview);

    sheets
}

/// File name of a sheet inside the bundle
fn sheet_file_name(index: usize, name: &str) -> String {
    format!(
        "{:02}_{}.csv",
        index + 1,
        name.to_lowercase().replace(' ', "_")
    )
}

/// Package the report into a zip archive
///
/// Creates a zip file containing one CSV per sheet (see [`report_sheets`])
/// and the full `report.json`.
pub fn export_report_bundle(report: &ProfileReport, zip_path: &Path) -> Result<()> {
    use ::zip::write::SimpleFileOptions;
    use ::zip::ZipWriter;

    let zip_file = std::fs::File::create(zip_path)
        .with_context(|| format!("Failed to create zip file: {}", zip_path.display()))?;

    let mut zip = ZipWriter::new(zip_file);
    let options = SimpleFileOptions::default()
        .compression_method(::zip::CompressionMethod::Deflated)
        .unix_permissions(0o644);

    for (index, sheet) in report_sheets(report).iter().enumerate() {
        let filename = sheet_file_name(index, &sheet.name);
        zip.start_file(filename.as_str(), options)
            .with_context(|| format!("Failed to add {} to zip", filename))?;
        zip.write_all(sheet.to_csv().as_bytes())?;
    }

    let json =
        serde_json::to_string_pretty(report).context("Failed to serialize profile report to JSON")?;
    zip.start_file("report.json", options)
        .context("Failed to add report.json to zip")?;
    zip.write_all(json.as_bytes())?;

    zip.finish().context("Failed to finalize zip file")?;

    tracing::info!(path = %zip_path.display(), "profile report bundle exported");

    Ok(())
}

/// Export by extension: `.zip` writes the bundle, anything else JSON
pub fn export_report(report: &ProfileReport, output_path: &Path) -> Result<()> {
    let is_zip = output_path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("zip"))
        .unwrap_or(false);

    if is_zip {
        export_report_bundle(report, output_path)
    } else {
        export_report_json(report, output_path)
    }
}
