use std::collections::BTreeMap;

use cgmquantify_types::Series;
use chrono::{NaiveTime, Timelike as _};

use crate::{
    MetricError,
    helpers::{
        stats::{mean, std_dev},
        validate::validate,
    },
};

const LAST_MINUTE: u16 = 24 * 60 - 1;

/// Minutes since midnight, with seconds rounded to the nearest minute.
///
/// Exactly 30 seconds rounds down. Readings in the last half minute of the day
/// stay on minute 1439 instead of rolling over to a non-existent 1440.
pub fn minute_of_day(time: &NaiveTime) -> u16 {
    let minute = time.hour() * 60 + time.minute() + u32::from(time.second() > 30);
    u16::try_from(minute).unwrap_or(LAST_MINUTE).min(LAST_MINUTE)
}

/// Glucose readings grouped by minute of day, across calendar days.
/// Each bucket keeps series order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MinuteBuckets(BTreeMap<u16, Vec<f64>>);

impl MinuteBuckets {
    pub fn align(series: &Series) -> Self {
        let mut buckets: BTreeMap<u16, Vec<f64>> = BTreeMap::new();
        for sample in series.samples() {
            buckets
                .entry(minute_of_day(&sample.timestamp.time()))
                .or_default()
                .push(sample.glucose);
        }
        Self(buckets)
    }

    pub fn get(&self, minute: u16) -> Option<&[f64]> {
        self.0.get(&minute).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (u16, &[f64])> {
        self.0.iter().map(|(minute, values)| (*minute, values.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// MODD and CONGA24 from matched minute-of-day readings.
///
/// Within a bucket the n-th and (n+1)-th readings are paired. They are usually
/// a day apart but that is not checked. Each bucket contributes the mean of its
/// absolute differences. Buckets with a single reading contribute nothing, and
/// a bucket mean of exactly zero is treated as missing too, so truly identical
/// matched readings are indistinguishable from no match at all.
pub struct DailyDifferenceCalculator;

impl DailyDifferenceCalculator {
    /// Mean Of Daily Differences.
    pub fn modd(series: &Series) -> Result<f64, MetricError> {
        Ok(mean(&Self::bucket_means(series)?))
    }

    /// Continuous Overall Net Glycemic Action at a 24 hour lag, the population
    /// standard deviation of the per-bucket mean differences.
    pub fn conga24(series: &Series) -> Result<f64, MetricError> {
        Ok(std_dev(&Self::bucket_means(series)?))
    }

    pub fn bucket_means(series: &Series) -> Result<Vec<f64>, MetricError> {
        validate(series)?;

        let means = MinuteBuckets::align(series)
            .iter()
            .filter(|(_, values)| values.len() >= 2)
            .map(|(_, values)| {
                let diffs = values
                    .windows(2)
                    .map(|w| (w[1] - w[0]).abs())
                    .collect::<Vec<_>>();
                mean(&diffs)
            })
            .filter(|m| *m != 0.0)
            .collect::<Vec<_>>();

        if means.is_empty() {
            return Err(MetricError::InsufficientData(
                "no minute of day is shared by readings on different days",
            ));
        }

        Ok(means)
    }
}
