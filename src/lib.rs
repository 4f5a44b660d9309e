//! tabprof: Tabular Data Profiling Library
//!
//! Loads a CSV, Excel or Parquet table into a versioned [`pipeline::Session`]
//! and runs exploratory analyses over it: type classification, feature
//! summary, quality checks, descriptive statistics, correlations,
//! distributions and numeric-by-category comparisons. Results can be
//! assembled into a [`report::ProfileReport`] and exported as JSON or a zip
//! bundle of CSV sheets.

pub mod cli;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod report;
pub mod utils;

pub use error::{ProfileError, Result};
