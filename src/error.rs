//! Error types for profiling operations.
//!
//! Every variant except the wrapped polars / I/O errors is a user-facing,
//! recoverable condition: the requested analysis is skipped and the message
//! is shown, but the session carries on.

use polars::prelude::PolarsError;
use thiserror::Error;

/// Errors raised by ingestion, analysis and cleaning operations.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// File extension is not one of the recognised tabular formats.
    #[error("Unsupported file format: '{extension}'. Please upload CSV, Excel or Parquet files.")]
    UnsupportedFormat { extension: String },

    /// File parsed successfully but holds zero data rows.
    #[error("The uploaded file is empty: {path}")]
    EmptyDataset { path: String },

    /// File content could not be parsed.
    #[error("Error loading file {path}: {message}")]
    Ingestion { path: String, message: String },

    /// Not enough suitable columns for the requested analysis.
    #[error("{0}")]
    InsufficientData(String),

    /// A requested column or strategy does not apply.
    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    #[error(transparent)]
    Polars(#[from] PolarsError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ProfileError {
    /// True for the recoverable conditions that should be surfaced to the user
    /// as a message rather than treated as an internal failure.
    pub fn is_user_facing(&self) -> bool {
        !matches!(self, ProfileError::Polars(_) | ProfileError::Io(_))
    }

    pub(crate) fn column_not_found(name: &str) -> Self {
        ProfileError::InvalidSelection(format!("Column '{}' not found in dataset", name))
    }
}

pub type Result<T> = std::result::Result<T, ProfileError>;
