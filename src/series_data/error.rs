use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SeriesDataError {
    #[error("Unsupported spreadsheet format for '{0}' (expected .csv or .xlsx)")]
    UnsupportedFormat(PathBuf),

    #[error("Parsing error reading CSV data from '{path}'")]
    CsvRead {
        path: PathBuf,
        #[source]
        source: PolarsError,
    },

    #[error("Failed to read workbook '{path}': {message}")]
    WorkbookRead { path: PathBuf, message: String },

    #[error("Spreadsheet '{path}' has {found} columns, expected at least 2 (date, value)")]
    SchemaMismatch { path: PathBuf, found: usize },

    #[error("Failed assembling DataFrame from '{path}'")]
    FrameBuild {
        path: PathBuf,
        #[source]
        source: PolarsError,
    },
}
