use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum MetricError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInput),
    #[error("insufficient data: {0}")]
    InsufficientData(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum InvalidInput {
    #[error("glucose {value} at sample {index} is not a positive number")]
    NonPositiveGlucose { index: usize, value: f64 },
    #[error("glucose {value} at sample {index} is below 1 mg/dL, outside the risk transform")]
    OutsideRiskDomain { index: usize, value: f64 },
    #[error("sample {index} has a day that is not the date of its timestamp")]
    DayMismatch { index: usize },
    #[error("sample {index} is earlier than the sample before it")]
    OutOfOrder { index: usize },
}
