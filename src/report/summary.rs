//! Terminal rendering of profiling results

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, CellAlignment, Color, Table};
use console::style;

use crate::pipeline::{
    missing_value_counts, AnalysisView, CategoricalDistribution, ColumnDistribution, ColumnStats,
    ColumnSummary, CorrelationMatrix, CrossTab, FeatureCounts, NumericDistribution,
    QualityIssue, QualityReport,
};
use crate::report::profile_report::{DataPreview, FileOverview, ProfileReport, Section};

/// Width of the longest bar in text charts
const BAR_WIDTH: usize = 30;

fn print_heading(icon: &str, title: &str) {
    println!();
    println!("    {} {}", style(icon).cyan(), style(title).white().bold());
    println!("    {}", style("─".repeat(50)).dim());
    println!();
}

/// Indent the table
fn print_table(table: &Table) {
    for line in table.to_string().lines() {
        println!("    {}", line);
    }
}

fn new_table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(
        header
            .iter()
            .map(|h| Cell::new(h).add_attribute(Attribute::Bold))
            .collect::<Vec<_>>(),
    );
    table
}

fn number_cell(value: Option<f64>) -> Cell {
    match value {
        Some(v) => Cell::new(format!("{:.2}", v)).set_alignment(CellAlignment::Right),
        None => Cell::new("-").fg(Color::DarkGrey),
    }
}

fn bar(count: usize, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    let len = ((count as f64 / max as f64) * BAR_WIDTH as f64).round() as usize;
    "█".repeat(len.max(usize::from(count > 0)))
}

/// Print every section of a profile report
pub fn display_report(report: &ProfileReport) {
    display_overview(&report.overview, &report.feature_counts);
    display_feature_summary(&report.feature_summary);
    display_missing_chart(&report.feature_summary);
    display_quality(&report.quality, &report.quality_issues);

    match &report.descriptive_stats {
        Section::Available(stats) => display_descriptive_stats(stats),
        Section::NotApplicable(reason) => display_not_applicable("DESCRIPTIVE STATISTICS", reason),
    }

    match &report.correlation {
        Section::Available(corr) => {
            display_correlation_matrix(&corr.matrix);
            display_insights(&corr.insights);
        }
        Section::NotApplicable(reason) => display_not_applicable("CORRELATION ANALYSIS", reason),
    }

    display_preview(&report.preview, 10);
}

fn display_not_applicable(title: &str, reason: &str) {
    print_heading("•", title);
    println!("      {}", style(reason).yellow());
}

pub fn display_overview(overview: &FileOverview, counts: &FeatureCounts) {
    print_heading("📋", "FILE OVERVIEW");

    let mut table = new_table(&["Metric", "Value"]);
    table.add_row(vec![Cell::new("File Type"), Cell::new(&overview.file_type)]);
    table.add_row(vec![Cell::new("Total Rows"), Cell::new(overview.total_rows)]);
    table.add_row(vec![
        Cell::new("Total Columns"),
        Cell::new(overview.total_columns),
    ]);
    table.add_row(vec![
        Cell::new("Memory Usage"),
        Cell::new(format!("{:.2} MB", overview.memory_usage_mb)),
    ]);
    table.add_row(vec![
        Cell::new("Duplicate Rows"),
        Cell::new(overview.duplicate_rows).fg(if overview.duplicate_rows > 0 {
            Color::Red
        } else {
            Color::Green
        }),
    ]);
    table.add_row(vec![
        Cell::new("Numerical / Categorical"),
        Cell::new(format!("{} / {}", counts.numerical, counts.categorical)),
    ]);
    table.add_row(vec![
        Cell::new("Columns with Nulls"),
        Cell::new(counts.columns_with_nulls),
    ]);
    table.add_row(vec![
        Cell::new("Avg Unique Values"),
        Cell::new(counts.avg_unique_values),
    ]);

    print_table(&table);
}

pub fn display_feature_summary(summary: &[ColumnSummary]) {
    print_heading("🧾", "FEATURE SUMMARY");

    let mut table = new_table(&[
        "Column Name",
        "Data Type",
        "Feature Type",
        "Unique Values",
        "Null Values",
        "Null %",
    ]);

    for s in summary {
        let null_color = if s.null_values > 0 {
            Color::Yellow
        } else {
            Color::White
        };
        table.add_row(vec![
            Cell::new(&s.name),
            Cell::new(&s.data_type),
            Cell::new(s.feature_type),
            Cell::new(s.unique_values),
            Cell::new(s.null_values).fg(null_color),
            Cell::new(format!("{:.2}", s.null_pct)).fg(null_color),
        ]);
    }

    print_table(&table);
}

/// Text bar chart of missing values per column
pub fn display_missing_chart(summary: &[ColumnSummary]) {
    let counts = missing_value_counts(summary);
    if counts.is_empty() {
        return;
    }

    print_heading("📉", "MISSING VALUES BY COLUMN");

    let max = counts.first().map(|(_, c)| *c).unwrap_or(0);
    let name_width = counts.iter().map(|(n, _)| n.len()).max().unwrap_or(0);
    for (name, count) in &counts {
        println!(
            "      {:<width$} {} {}",
            name,
            style(bar(*count, max)).yellow(),
            count,
            width = name_width
        );
    }
}

pub fn display_quality(report: &QualityReport, issues: &[QualityIssue]) {
    print_heading("🔍", "DATA QUALITY");

    if report.is_clean() {
        println!("      {}", style("No data quality issues found").green());
        return;
    }

    if report.duplicate_rows > 0 {
        println!(
            "      {}",
            style(format!("Found {} duplicate rows", report.duplicate_rows)).red()
        );
    }

    for high in &report.columns_high_missing {
        println!(
            "      {}",
            style(format!(
                "High missing values: '{}' ({:.2}% missing)",
                high.column, high.pct
            ))
            .red()
        );
    }

    if issues.is_empty() {
        return;
    }

    let mut table = new_table(&["Issue Type", "Column", "Details"]);
    for issue in issues {
        table.add_row(vec![
            Cell::new(&issue.issue_type).fg(Color::Yellow),
            Cell::new(&issue.column),
            Cell::new(&issue.details),
        ]);
    }
    println!();
    print_table(&table);
}

pub fn display_descriptive_stats(stats: &[ColumnStats]) {
    print_heading("📐", "DESCRIPTIVE STATISTICS");

    let mut table = new_table(&["Column", "count", "mean", "median", "std", "min", "max"]);
    for s in stats {
        table.add_row(vec![
            Cell::new(&s.column),
            Cell::new(s.summary.count),
            number_cell(s.summary.mean),
            number_cell(s.summary.median),
            number_cell(s.summary.std),
            number_cell(s.summary.min),
            number_cell(s.summary.max),
        ]);
    }

    print_table(&table);
}

fn correlation_color(value: f64) -> Color {
    if value >= 0.7 {
        Color::Red
    } else if value <= -0.7 {
        Color::Blue
    } else if value.abs() >= 0.4 {
        Color::Yellow
    } else {
        Color::White
    }
}

pub fn display_correlation_matrix(matrix: &CorrelationMatrix) {
    print_heading("🔗", "CORRELATION MATRIX");

    let mut header: Vec<&str> = vec![""];
    header.extend(matrix.columns.iter().map(String::as_str));
    let mut table = new_table(&header);

    for (name, row) in matrix.columns.iter().zip(&matrix.values) {
        let mut cells = vec![Cell::new(name).add_attribute(Attribute::Bold)];
        cells.extend(row.iter().map(|v| match v {
            Some(r) => Cell::new(format!("{:.2}", r))
                .fg(correlation_color(*r))
                .set_alignment(CellAlignment::Right),
            None => Cell::new("-").fg(Color::DarkGrey),
        }));
        table.add_row(cells);
    }

    print_table(&table);
}

pub fn display_insights(insights: &[String]) {
    println!();
    println!("      {}", style("Key Insights").white().bold());
    for insight in insights {
        println!("        {} {}", style("•").dim(), insight);
    }
}

pub fn display_preview(preview: &DataPreview, max_rows: usize) {
    print_heading("👀", "DATA PREVIEW");

    let header: Vec<&str> = preview.columns.iter().map(String::as_str).collect();
    let mut table = new_table(&header);
    for row in preview.rows.iter().take(max_rows) {
        table.add_row(
            row.iter()
                .map(|v| match v {
                    Some(text) => Cell::new(text),
                    None => Cell::new("null").fg(Color::DarkGrey),
                })
                .collect::<Vec<_>>(),
        );
    }

    print_table(&table);
    if preview.rows.len() > max_rows {
        println!(
            "      {}",
            style(format!(
                "... showing {} of {} preview rows",
                max_rows,
                preview.rows.len()
            ))
            .dim()
        );
    }
}

/// Print the deduplication note for an analysis view
pub fn display_view_note(view: &AnalysisView) {
    if let Some(key) = &view.unique_key {
        println!(
            "      {}",
            style(format!(
                "Using unique '{}' values: {} repeated rows excluded from analysis",
                key, view.excluded_rows
            ))
            .dim()
        );
    }
}

pub fn display_distribution(column: &str, distribution: &ColumnDistribution) {
    print_heading("📊", &format!("DISTRIBUTION OF {}", column.to_uppercase()));

    match distribution {
        ColumnDistribution::Numerical(d) => display_numeric_distribution(d),
        ColumnDistribution::Categorical(d) => display_categorical_distribution(d),
    }
}

fn display_numeric_distribution(d: &NumericDistribution) {
    let mut table = new_table(&["Statistic", "Value"]);
    for (label, value) in [
        ("Mean", d.mean),
        ("Median", d.median),
        ("Std", d.std),
        ("Q1", d.q1),
        ("Q3", d.q3),
        ("IQR", d.iqr),
        ("Lower Bound", d.lower_bound),
        ("Upper Bound", d.upper_bound),
    ] {
        table.add_row(vec![Cell::new(label), number_cell(value)]);
    }
    table.add_row(vec![
        Cell::new("Outliers"),
        Cell::new(d.outlier_count).fg(if d.outlier_count > 0 {
            Color::Red
        } else {
            Color::Green
        }),
    ]);
    print_table(&table);
}

fn display_categorical_distribution(d: &CategoricalDistribution) {
    println!("      Unique Values: {}", style(d.unique_values).yellow().bold());
    match &d.most_frequent {
        Some(value) => println!(
            "      Most Frequent: {} ({})",
            style(value).yellow().bold(),
            d.most_frequent_count
        ),
        None => println!("      Most Frequent: {}", style("-").dim()),
    }

    if d.top_values.is_empty() {
        return;
    }

    println!();
    let max = d.top_values.first().map(|(_, c)| *c).unwrap_or(0);
    let name_width = d.top_values.iter().map(|(n, _)| n.len()).max().unwrap_or(0);
    for (value, count) in &d.top_values {
        println!(
            "      {:<width$} {} {}",
            value,
            style(bar(*count, max)).cyan(),
            count,
            width = name_width
        );
    }
}

pub fn display_crosstab(crosstab: &CrossTab) {
    print_heading(
        "🧮",
        &format!(
            "{} BY {}",
            crosstab.numeric_column.to_uppercase(),
            crosstab.categorical_column.to_uppercase()
        ),
    );

    if crosstab.restricted {
        println!(
            "      {}",
            style(format!(
                "Showing top {} of {} categories",
                crosstab.groups.len(),
                crosstab.total_categories
            ))
            .dim()
        );
        println!();
    }

    let mut table = new_table(&[
        crosstab.categorical_column.as_str(),
        "count",
        "mean",
        "median",
        "std",
        "min",
        "max",
    ]);
    for group in &crosstab.groups {
        table.add_row(vec![
            Cell::new(&group.category),
            Cell::new(group.summary.count),
            number_cell(group.summary.mean),
            number_cell(group.summary.median),
            number_cell(group.summary.std),
            number_cell(group.summary.min),
            number_cell(group.summary.max),
        ]);
    }

    print_table(&table);
}
