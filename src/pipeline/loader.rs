//! Dataset loader for CSV, Excel and Parquet files

use std::collections::HashSet;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use polars::prelude::*;
use serde::Serialize;

use crate::error::{ProfileError, Result};
use crate::utils::create_spinner;

/// Cell text read as missing, in every column and every format
pub const NA_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Recognised input formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FileFormat {
    Csv,
    Excel,
    Parquet,
}

impl FileFormat {
    /// Detect the format from the file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match extension.as_str() {
            "csv" => Ok(FileFormat::Csv),
            "xlsx" | "xls" => Ok(FileFormat::Excel),
            "parquet" => Ok(FileFormat::Parquet),
            _ => Err(ProfileError::UnsupportedFormat { extension }),
        }
    }

    /// Display label ("CSV", "Excel", "Parquet")
    pub fn label(&self) -> &'static str {
        match self {
            FileFormat::Csv => "CSV",
            FileFormat::Excel => "Excel",
            FileFormat::Parquet => "Parquet",
        }
    }
}

impl std::fmt::Display for FileFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A parsed table together with where it came from
#[derive(Debug, Clone)]
pub struct Dataset {
    pub df: DataFrame,
    pub format: FileFormat,
    /// File name of the source, without directories
    pub source: String,
}

/// Load a dataset, rejecting unknown formats and zero-row results.
///
/// # Arguments
/// * `path` - Input file (csv, xlsx/xls, parquet)
/// * `infer_schema_length` - Rows used for CSV schema inference; 0 scans the whole file
pub fn load_dataset(path: &Path, infer_schema_length: usize) -> Result<Dataset> {
    let format = FileFormat::from_path(path)?;
    let source = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("")
        .to_string();

    let df = match format {
        FileFormat::Csv => read_csv(path, infer_schema_length)?,
        FileFormat::Parquet => LazyFrame::scan_parquet(path, Default::default())
            .and_then(|lf| lf.collect())
            .map_err(|e| ingestion_error(path, e))?,
        FileFormat::Excel => read_excel(path)?,
    };
    let df = nan_as_null(df).map_err(|e| ingestion_error(path, e))?;

    if df.height() == 0 {
        return Err(ProfileError::EmptyDataset {
            path: path.display().to_string(),
        });
    }

    tracing::info!(
        rows = df.height(),
        columns = df.width(),
        format = format.label(),
        "dataset loaded"
    );

    Ok(Dataset { df, format, source })
}

/// Load with a spinner, returning the dataset plus (rows, cols, memory MB)
pub fn load_dataset_with_progress(
    path: &Path,
    infer_schema_length: usize,
) -> Result<(Dataset, usize, usize, f64)> {
    let spinner = create_spinner(&format!("Loading {}...", path.display()));
    let result = load_dataset(path, infer_schema_length);
    spinner.finish_and_clear();

    let dataset = result?;
    let (rows, cols) = dataset.df.shape();
    let memory_mb = estimated_memory_mb(&dataset.df);
    Ok((dataset, rows, cols, memory_mb))
}

/// Estimated in-memory size of the table in MB
pub fn estimated_memory_mb(df: &DataFrame) -> f64 {
    df.estimated_size() as f64 / (1024.0 * 1024.0)
}

fn read_csv(path: &Path, infer_schema_length: usize) -> Result<DataFrame> {
    // Convert schema length: 0 means full scan
    let schema_length = if infer_schema_length == 0 {
        None
    } else {
        Some(infer_schema_length)
    };

    let null_values = NA_TOKENS.iter().copied().map(PlSmallStr::from_static).collect();

    let result = LazyCsvReader::new(path)
        .with_infer_schema_length(schema_length)
        .with_null_values(Some(NullValues::AllColumns(null_values)))
        .finish()
        .and_then(|lf| lf.collect());

    match result {
        Ok(df) => Ok(df),
        // A file with no content at all is empty, not malformed
        Err(PolarsError::NoData(_)) => Err(ProfileError::EmptyDataset {
            path: path.display().to_string(),
        }),
        Err(e) => Err(ingestion_error(path, e)),
    }
}

/// Float NaN becomes null so it counts as missing and stays out of statistics
fn nan_as_null(df: DataFrame) -> PolarsResult<DataFrame> {
    let exprs: Vec<Expr> = df
        .get_columns()
        .iter()
        .filter(|c| c.dtype().is_float())
        .map(|c| col(c.name().clone()).fill_nan(lit(NULL)))
        .collect();

    if exprs.is_empty() {
        return Ok(df);
    }
    df.lazy().with_columns(exprs).collect()
}

/// Read the first worksheet; the first row holds the headers
fn read_excel(path: &Path) -> Result<DataFrame> {
    let mut workbook = open_workbook_auto(path).map_err(|e| ingestion_error(path, e))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| ProfileError::EmptyDataset {
            path: path.display().to_string(),
        })?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| ingestion_error(path, e))?;

    let rows: Vec<Vec<Data>> = range.rows().map(|row| row.to_vec()).collect();
    let Some((header, body)) = rows.split_first() else {
        return Err(ProfileError::EmptyDataset {
            path: path.display().to_string(),
        });
    };

    let headers = unique_headers(header);
    let columns: Vec<Column> = headers
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let cells: Vec<&Data> = body
                .iter()
                .map(|row| row.get(idx).unwrap_or(&Data::Empty))
                .collect();
            excel_column(name, &cells)
        })
        .collect();

    DataFrame::new(columns).map_err(|e| ingestion_error(path, e))
}

/// Header names with blanks filled in and repeats suffixed
fn unique_headers(header: &[Data]) -> Vec<String> {
    let mut seen = HashSet::new();
    header
        .iter()
        .enumerate()
        .map(|(idx, cell)| {
            let base = match cell {
                Data::Empty => format!("column_{}", idx + 1),
                other => other.to_string().trim().to_string(),
            };
            let mut name = base.clone();
            let mut suffix = 1;
            while !seen.insert(name.clone()) {
                name = format!("{}.{}", base, suffix);
                suffix += 1;
            }
            name
        })
        .collect()
}

/// Empty, error and NA-token cells hold no value
fn is_missing_cell(cell: &Data) -> bool {
    match cell {
        Data::Empty | Data::Error(_) => true,
        Data::String(s) => NA_TOKENS.contains(&s.as_str()),
        _ => false,
    }
}

/// Build a typed column from spreadsheet cells
fn excel_column(name: &str, cells: &[&Data]) -> Column {
    let present: Vec<&&Data> = cells.iter().filter(|c| !is_missing_cell(c)).collect();

    let all_int = present.iter().all(|c| matches!(c, Data::Int(_)));
    let all_number = present
        .iter()
        .all(|c| matches!(c, Data::Int(_) | Data::Float(_)));
    let all_bool = present.iter().all(|c| matches!(c, Data::Bool(_)));

    if present.is_empty() {
        let values: Vec<Option<String>> = vec![None; cells.len()];
        return Column::new(name.into(), values);
    }

    if all_int {
        let values: Vec<Option<i64>> = cells
            .iter()
            .map(|c| match c {
                Data::Int(i) => Some(*i),
                _ => None,
            })
            .collect();
        Column::new(name.into(), values)
    } else if all_number {
        let values: Vec<Option<f64>> = cells
            .iter()
            .map(|c| match c {
                Data::Int(i) => Some(*i as f64),
                Data::Float(f) => Some(*f),
                _ => None,
            })
            .collect();
        Column::new(name.into(), values)
    } else if all_bool {
        let values: Vec<Option<bool>> = cells
            .iter()
            .map(|c| match c {
                Data::Bool(b) => Some(*b),
                _ => None,
            })
            .collect();
        Column::new(name.into(), values)
    } else {
        let values: Vec<Option<String>> = cells
            .iter()
            .map(|c| (!is_missing_cell(c)).then(|| c.to_string()))
            .collect();
        Column::new(name.into(), values)
    }
}

fn ingestion_error(path: &Path, err: impl std::fmt::Display) -> ProfileError {
    ProfileError::Ingestion {
        path: path.display().to_string(),
        message: err.to_string(),
    }
}

/// Column names of a file (reads the whole file for non-CSV formats)
pub fn get_column_names(path: &Path) -> Result<Vec<String>> {
    let dataset = load_dataset(path, 100)?;
    Ok(dataset
        .df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect())
}
