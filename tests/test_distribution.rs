//! Tests for distribution analysis and numeric-by-category comparison

mod common;

use common::*;
use polars::prelude::*;
use tabprof::error::ProfileError;
use tabprof::pipeline::{
    analysis_view, analyze_column, compare_numeric_by_category, ColumnDistribution,
    TOP_CATEGORIES,
};

#[test]
fn test_iqr_outliers() {
    let df = df!("v" => [1.0f64, 2.0, 3.0, 4.0, 5.0, 100.0]).unwrap();

    let ColumnDistribution::Numerical(d) = analyze_column(&df, "v").unwrap() else {
        panic!("expected numerical distribution");
    };
    assert_eq!(d.q1, Some(2.25));
    assert_eq!(d.q3, Some(4.75));
    assert_eq!(d.iqr, Some(2.5));
    assert_eq!(d.lower_bound, Some(-1.5));
    assert_eq!(d.upper_bound, Some(8.5));
    assert_eq!(d.outlier_count, 1);
    assert_eq!(d.median, Some(3.5));
}

#[test]
fn test_values_on_the_fence_are_not_outliers() {
    // q1 = 2, q3 = 4, fences at -1 and 7
    let df = df!("v" => [-1.0f64, 2.0, 3.0, 4.0, 7.0]).unwrap();

    let ColumnDistribution::Numerical(d) = analyze_column(&df, "v").unwrap() else {
        panic!("expected numerical distribution");
    };
    assert_eq!(d.lower_bound, Some(-1.0));
    assert_eq!(d.upper_bound, Some(7.0));
    assert_eq!(d.outlier_count, 0);
}

#[test]
fn test_categorical_distribution() {
    let df = create_mixed_dataframe();

    let ColumnDistribution::Categorical(d) = analyze_column(&df, "city").unwrap() else {
        panic!("expected categorical distribution");
    };
    assert_eq!(d.unique_values, 3);
    assert_eq!(d.most_frequent.as_deref(), Some("Paris"));
    assert_eq!(d.most_frequent_count, 3);
    assert_eq!(
        d.top_values,
        vec![
            ("Paris".to_string(), 3),
            ("Rome".to_string(), 1),
            ("Oslo".to_string(), 1)
        ]
    );
}

#[test]
fn test_unknown_column_is_invalid_selection() {
    let df = create_mixed_dataframe();

    let err = analyze_column(&df, "nope").unwrap_err();
    assert!(matches!(err, ProfileError::InvalidSelection(_)));
    assert!(err.to_string().contains("'nope'"));
}

#[test]
fn test_empty_numeric_column() {
    let df = df!("v" => [None::<f64>, None]).unwrap();

    let ColumnDistribution::Numerical(d) = analyze_column(&df, "v").unwrap() else {
        panic!("expected numerical distribution");
    };
    assert_eq!(d.mean, None);
    assert_eq!(d.q1, None);
    assert_eq!(d.outlier_count, 0);
}

#[test]
fn test_analysis_view_keeps_first_row_per_key() {
    let df = create_mixed_dataframe();

    let view = analysis_view(&df, Some("id")).unwrap();
    assert_eq!(view.excluded_rows, 1);
    assert_eq!(view.df.height(), 5);
    assert_eq!(view.unique_key.as_deref(), Some("id"));

    // Source table is untouched
    assert_eq!(df.height(), 6);
}

#[test]
fn test_analysis_view_without_key() {
    let df = create_mixed_dataframe();

    let view = analysis_view(&df, None).unwrap();
    assert_eq!(view.excluded_rows, 0);
    assert_eq!(view.df.height(), 6);
}

#[test]
fn test_deduplicated_view_changes_counts() {
    let df = create_mixed_dataframe();
    let view = analysis_view(&df, Some("id")).unwrap();

    let ColumnDistribution::Categorical(d) = analyze_column(&view.df, "city").unwrap() else {
        panic!("expected categorical distribution");
    };
    assert_eq!(d.most_frequent_count, 2);
}

#[test]
fn test_compare_numeric_by_category() {
    let df = df! {
        "amount" => [10.0f64, 20.0, 30.0, 100.0, 200.0, 5.0],
        "group" => ["a", "a", "a", "b", "b", "c"],
    }
    .unwrap();

    let crosstab = compare_numeric_by_category(&df, "amount", "group", TOP_CATEGORIES).unwrap();
    assert!(!crosstab.restricted);
    assert_eq!(crosstab.total_categories, 3);

    let order: Vec<&str> = crosstab.groups.iter().map(|g| g.category.as_str()).collect();
    assert_eq!(order, vec!["b", "a", "c"]);

    let a = &crosstab.groups[1].summary;
    assert_eq!(a.count, 3);
    assert_eq!(a.mean, Some(20.0));
    assert_eq!(a.std, Some(10.0));
    assert_eq!(crosstab.groups[2].summary.std, None);
}

#[test]
fn test_compare_restricts_to_top_categories() {
    // 12 categories; "k0".."k9" appear twice, "k10" and "k11" once
    let mut categories = Vec::new();
    let mut amounts = Vec::new();
    for i in 0..12 {
        let repeats = if i < 10 { 2 } else { 1 };
        for _ in 0..repeats {
            categories.push(format!("k{}", i));
            amounts.push(i as f64);
        }
    }
    let df = DataFrame::new(vec![
        Column::new("amount".into(), amounts),
        Column::new("cat".into(), categories),
    ])
    .unwrap();

    let crosstab = compare_numeric_by_category(&df, "amount", "cat", 10).unwrap();
    assert!(crosstab.restricted);
    assert_eq!(crosstab.total_categories, 12);
    assert_eq!(crosstab.groups.len(), 10);
    assert!(crosstab
        .groups
        .iter()
        .all(|g| g.category != "k10" && g.category != "k11"));
}

#[test]
fn test_compare_rejects_wrong_column_types() {
    let df = create_mixed_dataframe();

    let err = compare_numeric_by_category(&df, "city", "price", 10).unwrap_err();
    assert!(matches!(err, ProfileError::InvalidSelection(_)));
    assert!(err.to_string().contains("not a numerical column"));

    let err = compare_numeric_by_category(&df, "price", "id", 10).unwrap_err();
    assert!(err.to_string().contains("not a categorical column"));
}

#[test]
fn test_compare_orders_on_unrounded_means() {
    // Both means round to 1.0; "high" is larger before rounding
    let df = df! {
        "amount" => [1.001f64, 1.001, 1.004],
        "group" => ["low", "low", "high"],
    }
    .unwrap();

    let crosstab = compare_numeric_by_category(&df, "amount", "group", TOP_CATEGORIES).unwrap();
    let order: Vec<&str> = crosstab.groups.iter().map(|g| g.category.as_str()).collect();
    assert_eq!(order, vec!["high", "low"]);
    assert!(crosstab.groups.iter().all(|g| g.summary.mean == Some(1.0)));
}

#[test]
fn test_compare_ignores_null_categories_and_values() {
    let df = df! {
        "amount" => [Some(2.0f64), None, Some(4.0), Some(9.0)],
        "group" => [Some("a"), Some("a"), Some("a"), None],
    }
    .unwrap();

    let crosstab = compare_numeric_by_category(&df, "amount", "group", TOP_CATEGORIES).unwrap();
    assert_eq!(crosstab.total_categories, 1);
    let a = &crosstab.groups[0].summary;
    assert_eq!(a.count, 2);
    assert_eq!(a.mean, Some(3.0));
}
