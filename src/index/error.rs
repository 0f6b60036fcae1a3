use thiserror::Error;

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("Not enough finite observations to standardize the series ({0} found, need at least 2)")]
    NotEnoughData(usize),

    #[error("Water balance series has zero variance; the index is undefined")]
    ZeroVariance,

    #[error("Index series has {dates} dates but {values} values")]
    LengthMismatch { dates: usize, values: usize },
}
