//! Feature type classification and column value extraction

use polars::prelude::*;
use serde::Serialize;

use crate::error::{ProfileError, Result};

/// Classified type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FeatureType {
    Numerical,
    Categorical,
}

impl std::fmt::Display for FeatureType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeatureType::Numerical => write!(f, "Numerical"),
            FeatureType::Categorical => write!(f, "Categorical"),
        }
    }
}

/// Classify a column from its declared storage type.
///
/// This looks at the dtype only: a text column holding digit strings is still
/// `Categorical` (see the type-mismatch check in the quality module).
pub fn classify_feature_type(column: &Column) -> FeatureType {
    if column.dtype().is_primitive_numeric() {
        FeatureType::Numerical
    } else {
        FeatureType::Categorical
    }
}

/// Whether the column is stored as text
pub fn is_text_column(column: &Column) -> bool {
    matches!(column.dtype(), DataType::String)
}

/// Names of all numeric-classified columns, in table order
pub fn numeric_column_names(df: &DataFrame) -> Vec<String> {
    df.get_columns()
        .iter()
        .filter(|col| classify_feature_type(col) == FeatureType::Numerical)
        .map(|col| col.name().to_string())
        .collect()
}

/// Look up a column by name, mapping a miss to `InvalidSelection`
pub fn require_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column> {
    df.column(name)
        .map_err(|_| ProfileError::column_not_found(name))
}

/// All values of a column as `f64`, nulls preserved as `None`
pub fn float_values(column: &Column) -> Result<Vec<Option<f64>>> {
    Ok(float_chunked(column)?.into_iter().collect())
}

/// The column cast to `Float64`
pub fn float_chunked(column: &Column) -> Result<Float64Chunked> {
    let cast = column.cast(&DataType::Float64)?;
    Ok(cast.f64()?.clone())
}

/// Number of distinct non-null values in a column
pub fn distinct_count(column: &Column) -> Result<usize> {
    // n_unique counts null as one more value
    let with_null = column.as_materialized_series().n_unique()?;
    Ok(with_null - usize::from(column.null_count() > 0))
}

/// Render one cell for display; `None` for null
pub fn render_value(value: AnyValue) -> Option<String> {
    match value {
        AnyValue::Null => None,
        other => Some(match other.get_str() {
            Some(s) => s.to_string(),
            None => other.to_string(),
        }),
    }
}

/// Every cell of a column rendered for display, nulls kept as `None`
pub fn rendered_values(column: &Column) -> Result<Vec<Option<String>>> {
    (0..column.len())
        .map(|idx| Ok(render_value(column.get(idx)?)))
        .collect()
}
