//! Single-column distribution, IQR outliers and numeric-by-category comparison

use polars::prelude::*;
use serde::Serialize;

use crate::error::{ProfileError, Result};
use crate::pipeline::stats::{self, NumericSummary};
use crate::pipeline::types::{
    classify_feature_type, float_chunked, rendered_values, require_column, FeatureType,
};

/// IQR multiplier for the outlier fences
pub const IQR_MULTIPLIER: f64 = 1.5;

/// Maximum number of categories kept in a cross-tabulation
pub const TOP_CATEGORIES: usize = 10;

/// Number of value counts kept for the categorical bar chart
pub const TOP_VALUE_COUNTS: usize = 20;

/// Group-size column added by [`frequency_groups`]
const FREQUENCY_COLUMN: &str = "__frequency";

/// Working view of the table used for distribution analysis
#[derive(Debug, Clone)]
pub struct AnalysisView {
    pub df: DataFrame,
    /// Column used as uniqueness key, if any
    pub unique_key: Option<String>,
    /// Rows dropped because their key repeated an earlier row
    pub excluded_rows: usize,
}

/// Build the analysis view, keeping only the first row per `unique_key` value.
///
/// The source table is never modified.
pub fn analysis_view(df: &DataFrame, unique_key: Option<&str>) -> Result<AnalysisView> {
    let Some(key) = unique_key else {
        return Ok(AnalysisView {
            df: df.clone(),
            unique_key: None,
            excluded_rows: 0,
        });
    };

    require_column(df, key)?;
    let view = df.unique_stable(Some(&[key.to_string()]), UniqueKeepStrategy::First, None)?;
    let excluded_rows = df.height() - view.height();

    tracing::debug!(key, excluded_rows, "built deduplicated analysis view");

    Ok(AnalysisView {
        df: view,
        unique_key: Some(key.to_string()),
        excluded_rows,
    })
}

/// IQR outlier analysis of a numeric column
#[derive(Debug, Clone, Serialize)]
pub struct NumericDistribution {
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub std: Option<f64>,
    pub q1: Option<f64>,
    pub q3: Option<f64>,
    pub iqr: Option<f64>,
    pub lower_bound: Option<f64>,
    pub upper_bound: Option<f64>,
    pub outlier_count: usize,
}

/// Frequency profile of a categorical column
#[derive(Debug, Clone, Serialize)]
pub struct CategoricalDistribution {
    pub unique_values: usize,
    pub most_frequent: Option<String>,
    pub most_frequent_count: usize,
    /// Leading value counts (at most `TOP_VALUE_COUNTS`)
    pub top_values: Vec<(String, usize)>,
}

/// Distribution of one column, by classified type
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ColumnDistribution {
    Numerical(NumericDistribution),
    Categorical(CategoricalDistribution),
}

/// Analyse the distribution of a single column
pub fn analyze_column(df: &DataFrame, column_name: &str) -> Result<ColumnDistribution> {
    let column = require_column(df, column_name)?;

    match classify_feature_type(column) {
        FeatureType::Numerical => {
            let values = float_chunked(column)?;
            Ok(ColumnDistribution::Numerical(numeric_distribution(&values)?))
        }
        FeatureType::Categorical => {
            let counts = value_counts(column)?;
            let (most_frequent, most_frequent_count) = counts
                .first()
                .map(|(v, c)| (Some(v.clone()), *c))
                .unwrap_or((None, 0));

            Ok(ColumnDistribution::Categorical(CategoricalDistribution {
                unique_values: counts.len(),
                most_frequent,
                most_frequent_count,
                top_values: counts.into_iter().take(TOP_VALUE_COUNTS).collect(),
            }))
        }
    }
}

/// Mean, median, std and IQR-fence outlier count over the non-null values
pub fn numeric_distribution(values: &Float64Chunked) -> Result<NumericDistribution> {
    let q1 = stats::quantile(values, 0.25)?;
    let q3 = stats::quantile(values, 0.75)?;

    let (iqr, lower_bound, upper_bound, outlier_count) = match (q1, q3) {
        (Some(q1), Some(q3)) => {
            let iqr = q3 - q1;
            let lower = q1 - IQR_MULTIPLIER * iqr;
            let upper = q3 + IQR_MULTIPLIER * iqr;
            let outliers = (&values.lt(lower) | &values.gt(upper)).num_trues();
            (Some(iqr), Some(lower), Some(upper), outliers)
        }
        _ => (None, None, None, 0),
    };

    let summary = NumericSummary::from_values(values);
    Ok(NumericDistribution {
        mean: summary.mean,
        median: summary.median,
        std: summary.std,
        q1,
        q3,
        iqr,
        lower_bound,
        upper_bound,
        outlier_count,
    })
}

/// Group the table by the non-null values of `key`, most frequent first.
///
/// Adds a `FREQUENCY_COLUMN` with the group size ahead of `aggs`. Groups of
/// equal size keep the order in which their key first appears.
fn frequency_groups(df: &DataFrame, key: &str, aggs: Vec<Expr>) -> Result<DataFrame> {
    let mut exprs = vec![len().alias(FREQUENCY_COLUMN)];
    exprs.extend(aggs);

    let grouped = df
        .clone()
        .lazy()
        .filter(col(key).is_not_null())
        .group_by_stable([col(key)])
        .agg(exprs)
        .sort(
            [FREQUENCY_COLUMN],
            SortMultipleOptions::default()
                .with_order_descending(true)
                .with_maintain_order(true),
        )
        .collect()?;

    Ok(grouped)
}

/// Group sizes from a [`frequency_groups`] result
fn frequencies(grouped: &DataFrame) -> Result<Vec<usize>> {
    let counts = grouped
        .column(FREQUENCY_COLUMN)?
        .cast(&DataType::UInt64)?;
    Ok(counts
        .u64()?
        .into_iter()
        .map(|c| c.unwrap_or(0) as usize)
        .collect())
}

/// Count non-null values, most frequent first.
///
/// Ties keep the order in which values were first encountered.
pub fn value_counts(column: &Column) -> Result<Vec<(String, usize)>> {
    let name = column.name().to_string();
    let grouped = frequency_groups(&column.clone().into_frame(), &name, Vec::new())?;

    let labels = rendered_values(grouped.column(&name)?)?;
    Ok(labels
        .into_iter()
        .zip(frequencies(&grouped)?)
        .filter_map(|(label, count)| label.map(|l| (l, count)))
        .collect())
}

/// Most frequent non-null value with its original dtype
pub fn mode_value(column: &Column) -> Result<Option<Scalar>> {
    let name = column.name().to_string();
    let grouped = frequency_groups(&column.clone().into_frame(), &name, Vec::new())?;
    if grouped.height() == 0 {
        return Ok(None);
    }

    let value = grouped.column(&name)?.get(0)?.into_static();
    Ok(Some(Scalar::new(column.dtype().clone(), value)))
}

/// Statistics of the numeric column within one category
#[derive(Debug, Clone, Serialize)]
pub struct CategoryStats {
    pub category: String,
    #[serde(flatten)]
    pub summary: NumericSummary,
}

/// Numeric column grouped by a categorical column
#[derive(Debug, Clone, Serialize)]
pub struct CrossTab {
    pub numeric_column: String,
    pub categorical_column: String,
    /// Distinct non-null categories before any restriction
    pub total_categories: usize,
    /// True when only the top categories by frequency were kept
    pub restricted: bool,
    /// One entry per category, sorted by descending mean
    pub groups: Vec<CategoryStats>,
}

/// Compare a numeric column across the categories of a categorical column.
///
/// More than `top_n` categories restricts the groups to the `top_n` most
/// frequent. Statistics are rounded to two decimals.
pub fn compare_numeric_by_category(
    df: &DataFrame,
    numeric_column: &str,
    categorical_column: &str,
    top_n: usize,
) -> Result<CrossTab> {
    let num_col = require_column(df, numeric_column)?;
    let cat_col = require_column(df, categorical_column)?;

    if classify_feature_type(num_col) != FeatureType::Numerical {
        return Err(ProfileError::InvalidSelection(format!(
            "'{}' is not a numerical column",
            numeric_column
        )));
    }
    if classify_feature_type(cat_col) != FeatureType::Categorical {
        return Err(ProfileError::InvalidSelection(format!(
            "'{}' is not a categorical column",
            categorical_column
        )));
    }

    let grouped = frequency_groups(
        df,
        categorical_column,
        vec![col(numeric_column).cast(DataType::Float64)],
    )?;

    let total_categories = grouped.height();
    let restricted = total_categories > top_n;
    let kept = if restricted {
        grouped.head(Some(top_n))
    } else {
        grouped
    };

    let labels = rendered_values(kept.column(categorical_column)?)?;
    let values = kept.column(numeric_column)?.list()?;

    let mut groups: Vec<(String, NumericSummary)> = labels
        .into_iter()
        .zip(values.into_iter())
        .map(|(label, group)| -> Result<(String, NumericSummary)> {
            let summary = match group {
                Some(series) => NumericSummary::from_values(series.f64()?),
                None => NumericSummary::empty(),
            };
            Ok((label.unwrap_or_default(), summary))
        })
        .collect::<Result<_>>()?;

    // Descending mean at full precision; undefined means last
    groups.sort_by(|(_, a), (_, b)| match (a.mean, b.mean) {
        (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(std::cmp::Ordering::Equal),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });

    let groups: Vec<CategoryStats> = groups
        .into_iter()
        .map(|(category, summary)| CategoryStats {
            category,
            summary: summary.rounded(),
        })
        .collect();

    if restricted {
        tracing::info!(
            total_categories,
            top_n,
            column = categorical_column,
            "cross-tab restricted to the most frequent categories"
        );
    }

    Ok(CrossTab {
        numeric_column: numeric_column.to_string(),
        categorical_column: categorical_column.to_string(),
        total_categories,
        restricted,
        groups,
    })
}
