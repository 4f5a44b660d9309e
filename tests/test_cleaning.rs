//! Tests for cleaning actions

mod common;

use common::*;
use polars::prelude::*;
use tabprof::error::ProfileError;
use tabprof::pipeline::{
    drop_column, drop_duplicate_rows, handle_missing_values, MissingStrategy,
    UNKNOWN_PLACEHOLDER,
};

#[test]
fn test_fill_mean() {
    let df = df!("x" => [Some(1.0f64), None, Some(3.0)]).unwrap();

    let outcome = handle_missing_values(&df, "x", MissingStrategy::FillMean).unwrap();
    assert_eq!(floats(&outcome.df, "x"), vec![Some(1.0), Some(2.0), Some(3.0)]);
    assert_eq!(outcome.message, "Filled missing values in 'x' with Mean (2.00)");

    // Input is left untouched
    assert_eq!(df.column("x").unwrap().null_count(), 1);
}

#[test]
fn test_fill_median_and_zero() {
    let df = df!("x" => [Some(1.0f64), None, Some(3.0), Some(10.0)]).unwrap();

    let median = handle_missing_values(&df, "x", MissingStrategy::FillMedian).unwrap();
    assert_eq!(floats(&median.df, "x")[1], Some(3.0));

    let zero = handle_missing_values(&df, "x", MissingStrategy::FillZero).unwrap();
    assert_eq!(floats(&zero.df, "x")[1], Some(0.0));
}

#[test]
fn test_fill_zero_keeps_integer_dtype() {
    let df = df!("n" => [Some(1i64), None, Some(3)]).unwrap();

    let outcome = handle_missing_values(&df, "n", MissingStrategy::FillZero).unwrap();
    assert_eq!(outcome.df.column("n").unwrap().dtype(), &DataType::Int64);
    assert_eq!(outcome.df.column("n").unwrap().null_count(), 0);
}

#[test]
fn test_fill_mode_and_unknown() {
    let df = create_mixed_dataframe();

    let mode = handle_missing_values(&df, "city", MissingStrategy::FillMode).unwrap();
    assert_eq!(strings(&mode.df, "city")[3].as_deref(), Some("Paris"));
    assert_eq!(
        mode.message,
        "Filled missing values in 'city' with Mode ('Paris')"
    );

    let unknown = handle_missing_values(&df, "city", MissingStrategy::FillUnknown).unwrap();
    assert_eq!(
        strings(&unknown.df, "city")[3].as_deref(),
        Some(UNKNOWN_PLACEHOLDER)
    );
}

#[test]
fn test_drop_rows_with_missing() {
    let df = create_mixed_dataframe();

    let outcome = handle_missing_values(&df, "price", MissingStrategy::DropRows).unwrap();
    assert_shape(&outcome.df, 5, 6);
    assert_eq!(outcome.df.column("price").unwrap().null_count(), 0);
}

#[test]
fn test_drop_column_strategy() {
    let df = create_mixed_dataframe();

    let outcome = handle_missing_values(&df, "city", MissingStrategy::DropColumn).unwrap();
    assert_missing_columns(&outcome.df, &["city"]);
    assert_eq!(outcome.message, "Dropped column 'city'");
}

#[test]
fn test_strategy_must_match_column_type() {
    let df = create_mixed_dataframe();

    let err = handle_missing_values(&df, "city", MissingStrategy::FillMean).unwrap_err();
    assert!(matches!(err, ProfileError::InvalidSelection(_)));

    let err = handle_missing_values(&df, "price", MissingStrategy::FillUnknown).unwrap_err();
    assert!(matches!(err, ProfileError::InvalidSelection(_)));
}

#[test]
fn test_mean_of_empty_column_is_rejected() {
    let df = df!("x" => [None::<f64>, None]).unwrap();

    let err = handle_missing_values(&df, "x", MissingStrategy::FillMean).unwrap_err();
    assert!(matches!(err, ProfileError::InvalidSelection(_)));
}

#[test]
fn test_drop_duplicate_rows() {
    let df = df! {
        "a" => [1i32, 1, 2],
        "b" => ["x", "x", "y"],
    }
    .unwrap();

    let outcome = drop_duplicate_rows(&df).unwrap();
    assert_shape(&outcome.df, 2, 2);
    assert_eq!(outcome.message, "Removed 1 duplicate rows");
}

#[test]
fn test_drop_duplicates_keeps_first_occurrence() {
    let df = create_mixed_dataframe();

    let outcome = drop_duplicate_rows(&df).unwrap();
    assert_eq!(outcome.df.height(), 5);
    assert_eq!(floats(&outcome.df, "id"), vec![Some(1.0), Some(2.0), Some(3.0), Some(4.0), Some(5.0)]);
}

#[test]
fn test_drop_unknown_column() {
    let df = create_mixed_dataframe();

    let err = drop_column(&df, "missing").unwrap_err();
    assert!(matches!(err, ProfileError::InvalidSelection(_)));
}

#[test]
fn test_fill_mode_keeps_boolean_dtype() {
    let df = df!("flag" => [Some(true), None, Some(true), Some(false)]).unwrap();

    let outcome = handle_missing_values(&df, "flag", MissingStrategy::FillMode).unwrap();
    let flag = outcome.df.column("flag").unwrap();
    assert_eq!(flag.dtype(), &DataType::Boolean);
    assert_eq!(flag.null_count(), 0);
    assert_eq!(
        outcome.message,
        "Filled missing values in 'flag' with Mode ('true')"
    );
}
