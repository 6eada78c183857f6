use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A single CGM reading.
///
/// `day` is the calendar date of `timestamp` and is stored explicitly so that
/// per-day aggregations never have to re-derive it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub timestamp: NaiveDateTime,
    /// Glucose in mg/dL.
    pub glucose: f64,
    pub day: NaiveDate,
}

impl Sample {
    pub fn new(timestamp: NaiveDateTime, glucose: f64) -> Self {
        Self {
            timestamp,
            glucose,
            day: timestamp.date(),
        }
    }
}

impl From<(NaiveDateTime, f64)> for Sample {
    fn from((timestamp, glucose): (NaiveDateTime, f64)) -> Self {
        Self::new(timestamp, glucose)
    }
}
