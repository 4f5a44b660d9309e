//! Pairwise Pearson correlation between numeric columns

use polars::prelude::*;
use rayon::prelude::*;
use serde::Serialize;

use crate::error::{ProfileError, Result};
use crate::pipeline::types::{float_values, numeric_column_names};

/// Default |r| above which a pair is reported as strongly correlated
pub const STRONG_CORRELATION_THRESHOLD: f64 = 0.7;

/// Represents a strongly correlated pair of features
#[derive(Debug, Clone, Serialize)]
pub struct CorrelatedPair {
    pub feature1: String,
    pub feature2: String,
    pub correlation: f64,
}

/// Symmetric correlation matrix over the numeric columns.
///
/// `values[i][j]` is `None` when the coefficient is undefined for that pair
/// (fewer than two complete observations, or zero variance). The diagonal is
/// always `Some(1.0)`.
#[derive(Debug, Clone, Serialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    /// Coefficient for a pair of column names
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        self.values[i][j]
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Result of the correlation analysis
#[derive(Debug, Clone, Serialize)]
pub struct CorrelationAnalysis {
    pub matrix: CorrelationMatrix,
    /// Pairs with |r| strictly above the threshold, upper triangle only
    pub strong_pairs: Vec<CorrelatedPair>,
    /// One line per strong pair, or exactly one "no strong correlations" line
    pub insights: Vec<String>,
}

impl CorrelationAnalysis {
    /// False when `insights` holds only the "none found" sentinel
    pub fn has_strong_correlations(&self) -> bool {
        !self.strong_pairs.is_empty()
    }
}

/// Compute the full correlation matrix and extract strong pairs.
///
/// Each pair uses only rows where both columns are non-null. Requires at
/// least two numeric columns, otherwise returns `InsufficientData`.
///
/// # Arguments
/// * `df` - Reference to the working table
/// * `threshold` - |r| must be strictly greater than this to count as strong
pub fn compute_correlation_analysis(df: &DataFrame, threshold: f64) -> Result<CorrelationAnalysis> {
    let numeric_cols = numeric_column_names(df);
    let num_cols = numeric_cols.len();

    if num_cols < 2 {
        return Err(ProfileError::InsufficientData(
            "Not enough numerical columns for correlation analysis (minimum 2 required)."
                .to_string(),
        ));
    }

    let float_columns: Vec<Vec<Option<f64>>> = numeric_cols
        .iter()
        .map(|name| float_values(df.column(name)?))
        .collect::<Result<_>>()?;

    // Generate all pairs (indices for upper triangle)
    let pairs: Vec<(usize, usize)> = (0..num_cols)
        .flat_map(|i| ((i + 1)..num_cols).map(move |j| (i, j)))
        .collect();

    let coefficients: Vec<((usize, usize), Option<f64>)> = pairs
        .par_iter()
        .map(|&(i, j)| {
            (
                (i, j),
                pairwise_pearson(&float_columns[i], &float_columns[j]),
            )
        })
        .collect();

    let mut values = vec![vec![None; num_cols]; num_cols];
    for (i, row) in values.iter_mut().enumerate() {
        row[i] = Some(1.0);
    }
    for &((i, j), r) in &coefficients {
        values[i][j] = r;
        values[j][i] = r;
    }

    let matrix = CorrelationMatrix {
        columns: numeric_cols,
        values,
    };

    let strong_pairs = extract_strong_pairs(&matrix, threshold);
    let insights = correlation_insights(&strong_pairs, threshold);

    tracing::debug!(
        pairs = coefficients.len(),
        strong = strong_pairs.len(),
        "correlation analysis complete"
    );

    Ok(CorrelationAnalysis {
        matrix,
        strong_pairs,
        insights,
    })
}

/// Pearson correlation over rows where both values are present.
///
/// Returns `None` with fewer than two complete rows or when either side has
/// zero variance.
pub fn pairwise_pearson(x: &[Option<f64>], y: &[Option<f64>]) -> Option<f64> {
    let complete: Vec<(f64, f64)> = x
        .iter()
        .zip(y.iter())
        .filter_map(|(a, b)| match (a, b) {
            (Some(a), Some(b)) => Some((*a, *b)),
            _ => None,
        })
        .collect();

    let n = complete.len();
    if n < 2 {
        return None;
    }

    let mean_x = complete.iter().map(|(a, _)| a).sum::<f64>() / n as f64;
    let mean_y = complete.iter().map(|(_, b)| b).sum::<f64>() / n as f64;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (a, b) in &complete {
        let dx = a - mean_x;
        let dy = b - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }

    let r = cov / (var_x.sqrt() * var_y.sqrt());
    Some(r.clamp(-1.0, 1.0))
}

/// Upper-triangle pairs (i < j) with |r| strictly above the threshold,
/// in matrix order
pub fn extract_strong_pairs(matrix: &CorrelationMatrix, threshold: f64) -> Vec<CorrelatedPair> {
    let n = matrix.len();
    let mut pairs = Vec::new();

    for i in 0..n {
        for j in (i + 1)..n {
            if let Some(corr) = matrix.values[i][j] {
                if corr.abs() > threshold {
                    pairs.push(CorrelatedPair {
                        feature1: matrix.columns[i].clone(),
                        feature2: matrix.columns[j].clone(),
                        correlation: corr,
                    });
                }
            }
        }
    }

    pairs
}

/// Human-readable insight lines for the strong pairs
pub fn correlation_insights(pairs: &[CorrelatedPair], threshold: f64) -> Vec<String> {
    if pairs.is_empty() {
        return vec![no_strong_correlations_message(threshold)];
    }

    pairs
        .iter()
        .map(|pair| {
            let direction = if pair.correlation > 0.0 {
                "positive"
            } else {
                "negative"
            };
            format!(
                "Strong {} correlation ({:.2}) between {} and {}",
                direction, pair.correlation, pair.feature1, pair.feature2
            )
        })
        .collect()
}

/// The sentinel insight emitted when no pair exceeds the threshold
pub fn no_strong_correlations_message(threshold: f64) -> String {
    format!(
        "No strong correlations (|r| > {}) found between numerical features.",
        threshold
    )
}
