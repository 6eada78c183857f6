use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::Sample;

/// Time-ordered CGM readings. Read-only once built.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Series {
    samples: Vec<Sample>,
}

/// Glucose values of one calendar day, in chronological order.
#[derive(Debug, Clone, PartialEq)]
pub struct DayReadings {
    pub day: NaiveDate,
    pub glucose: Vec<f64>,
}

impl Series {
    pub fn new(samples: Vec<Sample>) -> Self {
        Self { samples }
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn glucose(&self) -> impl ExactSizeIterator<Item = f64> + '_ {
        self.samples.iter().map(|s| s.glucose)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Groups consecutive readings of the same calendar day.
    ///
    /// For a chronological series that is one group per day in ascending
    /// order. A day that reappears after another starts a new group.
    pub fn days(&self) -> Vec<DayReadings> {
        let mut days: Vec<DayReadings> = Vec::new();
        for sample in &self.samples {
            match days.last_mut().filter(|d| d.day == sample.day) {
                Some(day) => day.glucose.push(sample.glucose),
                None => days.push(DayReadings {
                    day: sample.day,
                    glucose: vec![sample.glucose],
                }),
            }
        }
        days
    }
}

impl FromIterator<Sample> for Series {
    fn from_iter<T: IntoIterator<Item = Sample>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl From<Vec<Sample>> for Series {
    fn from(samples: Vec<Sample>) -> Self {
        Self::new(samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    fn base() -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 1)
            .unwrap()
            .and_hms_opt(22, 0, 0)
            .unwrap()
    }

    #[test]
    fn days_split_at_midnight() {
        let series: Series = (0..6)
            .map(|i| Sample::new(base() + TimeDelta::hours(i), 100.0 + i as f64))
            .collect();

        let days = series.days();
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].day, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        assert_eq!(days[0].glucose, vec![100.0, 101.0]);
        assert_eq!(days[1].glucose, vec![102.0, 103.0, 104.0, 105.0]);
    }

    #[test]
    fn days_are_consecutive_runs() {
        let series: Series = [0, 24, 1]
            .into_iter()
            .map(|h| Sample::new(base() + TimeDelta::hours(h), 100.0 + h as f64))
            .collect();

        let days = series.days();
        assert_eq!(days.len(), 3);
        assert_eq!(days[0].day, days[2].day);
        assert_eq!(days[1].glucose, vec![124.0]);
    }

    #[test]
    fn empty_series_has_no_days() {
        let series = Series::default();
        assert!(series.is_empty());
        assert!(series.days().is_empty());
    }
}
