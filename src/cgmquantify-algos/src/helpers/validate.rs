use cgmquantify_types::Series;

use crate::{InvalidInput, MetricError};

/// Entry check shared by every metric: the series must be non-empty,
/// chronological, carry positive finite glucose values and have each `day`
/// equal to its timestamp's date.
pub(crate) fn validate(series: &Series) -> Result<(), MetricError> {
    if series.is_empty() {
        return Err(MetricError::InsufficientData("series has no samples"));
    }

    let samples = series.samples();
    for (index, sample) in samples.iter().enumerate() {
        let value = sample.glucose;
        if !value.is_finite() || value <= 0.0 {
            return Err(InvalidInput::NonPositiveGlucose { index, value }.into());
        }
        if sample.day != sample.timestamp.date() {
            return Err(InvalidInput::DayMismatch { index }.into());
        }
        if index > 0 && sample.timestamp < samples[index - 1].timestamp {
            return Err(InvalidInput::OutOfOrder { index }.into());
        }
    }

    Ok(())
}
