//! End-to-end tests for the tabprof binary

mod common;

use assert_cmd::Command;
use common::*;
use predicates::prelude::*;

fn tabprof() -> Command {
    Command::cargo_bin("tabprof").unwrap()
}

#[test]
fn test_profile_prints_sections() {
    let mut df = create_correlation_test_dataframe();
    let (_dir, path) = create_temp_csv(&mut df);

    tabprof()
        .arg("-i")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("FEATURE SUMMARY"))
        .stdout(predicate::str::contains("CORRELATION MATRIX"))
        .stdout(predicate::str::contains(
            "Strong positive correlation (1.00) between a and b",
        ));
}

#[test]
fn test_profile_exports_report() {
    let mut df = create_mixed_dataframe();
    let (dir, path) = create_temp_csv(&mut df);
    let report = dir.path().join("profile.json");

    tabprof()
        .args(["profile", "-i"])
        .arg(&path)
        .arg("--report")
        .arg(&report)
        .assert()
        .success();

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(json["overview"]["total_rows"], 6);
}

#[test]
fn test_missing_input_fails() {
    tabprof()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file is required"));
}

#[test]
fn test_unsupported_format_fails() {
    let (_dir, path) = create_temp_file("data.txt", "a\n1\n");

    tabprof()
        .arg("-i")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported file format"));
}

#[test]
fn test_invalid_threshold_rejected() {
    tabprof()
        .args(["-i", "data.csv", "--correlation-threshold", "2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("between 0.0 and 1.0"));
}

#[test]
fn test_distribution_of_unknown_column_warns_and_continues() {
    let mut df = create_mixed_dataframe();
    let (_dir, path) = create_temp_csv(&mut df);

    tabprof()
        .args(["distribution", "nope", "-i"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Column 'nope' not found"));
}

#[test]
fn test_compare_subcommand() {
    let mut df = create_correlation_test_dataframe();
    let (_dir, path) = create_temp_csv(&mut df);

    tabprof()
        .args(["compare", "a", "label", "-i"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("A BY LABEL"));
}

#[test]
fn test_clean_writes_output() {
    let mut df = create_mixed_dataframe();
    let (dir, path) = create_temp_csv(&mut df);
    let output = dir.path().join("out.csv");

    tabprof()
        .args(["clean", "--drop-duplicates", "--drop-column", "flag", "--no-confirm", "-i"])
        .arg(&path)
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed 1 duplicate rows"));

    let cleaned = tabprof::pipeline::load_dataset(&output, 100).unwrap();
    assert_shape(&cleaned.df, 5, 5);
}
