use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error("missing column `{0}`")]
    MissingColumn(&'static str),
    #[error("row {row}: invalid timestamp `{value}`")]
    InvalidTimestamp { row: usize, value: String },
    #[error("row {row}: invalid glucose value `{value}`")]
    InvalidGlucose { row: usize, value: String },
    #[error("export contains no readings after the warm-up rows")]
    Empty,
}
