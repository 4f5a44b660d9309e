//! Versioned session handle owning the working table

use std::path::Path;

use polars::prelude::*;

use crate::error::{ProfileError, Result};
use crate::pipeline::cleaning::{self, CleaningOutcome, MissingStrategy};
use crate::pipeline::loader::{load_dataset, Dataset, FileFormat};

/// Holds the current table for one profiling session.
///
/// Loading creates version 0. Every cleaning action derives a new table from
/// the current one and replaces it wholesale, bumping the version; analysis
/// functions only ever see a complete snapshot via [`Session::table`].
#[derive(Debug, Clone)]
pub struct Session {
    dataset: Dataset,
    version: u64,
    history: Vec<String>,
}

impl Session {
    /// Load a file into a fresh session
    pub fn load(path: &Path, infer_schema_length: usize) -> Result<Self> {
        Ok(Self::from_dataset(load_dataset(path, infer_schema_length)?))
    }

    pub fn from_dataset(dataset: Dataset) -> Self {
        Self {
            dataset,
            version: 0,
            history: Vec::new(),
        }
    }

    /// Start a session from an in-memory table; zero rows are rejected
    pub fn from_dataframe(df: DataFrame, format: FileFormat, source: &str) -> Result<Self> {
        if df.height() == 0 {
            return Err(ProfileError::EmptyDataset {
                path: source.to_string(),
            });
        }
        Ok(Self::from_dataset(Dataset {
            df,
            format,
            source: source.to_string(),
        }))
    }

    /// Current snapshot of the working table
    pub fn table(&self) -> &DataFrame {
        &self.dataset.df
    }

    pub fn format(&self) -> FileFormat {
        self.dataset.format
    }

    pub fn source(&self) -> &str {
        &self.dataset.source
    }

    /// Number of cleaning actions applied since loading
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Messages of the applied cleaning actions, oldest first
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Replace the working table with a derived one and return its message
    pub fn apply(&mut self, outcome: CleaningOutcome) -> &str {
        self.dataset.df = outcome.df;
        self.version += 1;

        tracing::info!(version = self.version, change = %outcome.message, "session table replaced");

        self.history.push(outcome.message);
        self.history.last().map(String::as_str).unwrap_or_default()
    }

    pub fn drop_duplicates(&mut self) -> Result<String> {
        let outcome = cleaning::drop_duplicate_rows(self.table())?;
        Ok(self.apply(outcome).to_string())
    }

    pub fn handle_missing(&mut self, column: &str, strategy: MissingStrategy) -> Result<String> {
        let outcome = cleaning::handle_missing_values(self.table(), column, strategy)?;
        Ok(self.apply(outcome).to_string())
    }

    pub fn drop_column(&mut self, column: &str) -> Result<String> {
        let outcome = cleaning::drop_column(self.table(), column)?;
        Ok(self.apply(outcome).to_string())
    }
}
