use crate::index::error::IndexError;
use crate::series_data::error::SeriesDataError;
use polars::error::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpeiError {
    #[error(transparent)]
    SeriesData(#[from] SeriesDataError),

    #[error(transparent)]
    Index(#[from] IndexError),

    #[error("Failed processing DataFrame: {0}")]
    DataFrame(#[from] PolarsError),

    #[error("Accumulation window must be at least 1, got {0}")]
    InvalidAccumulation(usize),

    #[error("Null date at row {0} of the water balance series")]
    MissingDate(usize),

    #[error("Index fitter returned {got} values for {expected} input rows")]
    FitterLengthMismatch { expected: usize, got: usize },
}
