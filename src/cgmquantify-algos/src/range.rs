use cgmquantify_types::Series;

use crate::{
    MetricError,
    helpers::{
        stats::{mean, std_dev},
        validate::validate,
    },
};

/// Range metrics relative to a band of `mean ± sd * SD` around the series'
/// own mean glucose.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeCalculator {
    pub sd: f64,
    pub sample_rate_minutes: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeBounds {
    pub lower: f64,
    pub upper: f64,
}

impl RangeBounds {
    /// Both bounds are inclusive.
    pub fn contains(&self, glucose: f64) -> bool {
        glucose >= self.lower && glucose <= self.upper
    }
}

impl Default for RangeCalculator {
    fn default() -> Self {
        Self::new(1.0, 5)
    }
}

impl RangeCalculator {
    pub fn new(sd: f64, sample_rate_minutes: u32) -> Self {
        Self {
            sd,
            sample_rate_minutes,
        }
    }

    pub fn bounds(&self, series: &Series) -> Result<RangeBounds, MetricError> {
        validate(series)?;
        let values = series.glucose().collect::<Vec<_>>();
        let centre = mean(&values);
        let spread = self.sd * std_dev(&values);

        Ok(RangeBounds {
            lower: centre - spread,
            upper: centre + spread,
        })
    }

    /// Minutes spent inside the band.
    pub fn time_in_range(&self, series: &Series) -> Result<u32, MetricError> {
        let (inside, _) = self.partition(series)?;
        Ok(self.minutes(inside.len()))
    }

    /// Minutes spent outside the band; the complement of [`Self::time_in_range`].
    pub fn time_outside_range(&self, series: &Series) -> Result<u32, MetricError> {
        let (_, outside) = self.partition(series)?;
        Ok(self.minutes(outside.len()))
    }

    pub fn percent_in_range(&self, series: &Series) -> Result<f64, MetricError> {
        let (inside, outside) = self.partition(series)?;
        Ok(percent(inside.len(), inside.len() + outside.len()))
    }

    pub fn percent_outside_range(&self, series: &Series) -> Result<f64, MetricError> {
        let (inside, outside) = self.partition(series)?;
        Ok(percent(outside.len(), inside.len() + outside.len()))
    }

    /// Mean glucose of the readings outside the band (MGE).
    pub fn mean_outside_range(&self, series: &Series) -> Result<f64, MetricError> {
        let (_, outside) = self.partition(series)?;
        if outside.is_empty() {
            return Err(MetricError::InsufficientData("no readings outside the range"));
        }
        Ok(mean(&outside))
    }

    /// Mean glucose of the readings inside the band (MGN).
    pub fn mean_inside_range(&self, series: &Series) -> Result<f64, MetricError> {
        let (inside, _) = self.partition(series)?;
        if inside.is_empty() {
            return Err(MetricError::InsufficientData("no readings inside the range"));
        }
        Ok(mean(&inside))
    }

    fn partition(&self, series: &Series) -> Result<(Vec<f64>, Vec<f64>), MetricError> {
        let bounds = self.bounds(series)?;
        Ok(series.glucose().partition(|&g| bounds.contains(g)))
    }

    fn minutes(&self, readings: usize) -> u32 {
        u32::try_from(readings)
            .unwrap_or(u32::MAX)
            .saturating_mul(self.sample_rate_minutes)
    }
}

fn percent(part: usize, total: usize) -> f64 {
    part as f64 / total as f64 * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmquantify_types::Sample;
    use chrono::{NaiveDate, TimeDelta};

    fn series(values: &[f64]) -> Series {
        let base = NaiveDate::from_ymd_opt(2025, 1, 1)
            .unwrap()
            .and_hms_opt(6, 0, 0)
            .unwrap();
        values
            .iter()
            .enumerate()
            .map(|(i, &g)| Sample::new(base + TimeDelta::minutes(5 * i as i64), g))
            .collect()
    }

    // mean 100, population sd ~36.5 -> band ~[63.5, 136.5]
    fn fixture() -> Series {
        series(&[40.0, 80.0, 100.0, 100.0, 120.0, 160.0])
    }

    #[test]
    fn bounds_follow_mean_and_sd() {
        let s = fixture();
        let sd = std_dev(&s.glucose().collect::<Vec<_>>());
        let bounds = RangeCalculator::default().bounds(&s).unwrap();
        assert!((bounds.lower - (100.0 - sd)).abs() < 1e-9);
        assert!((bounds.upper - (100.0 + sd)).abs() < 1e-9);
    }

    #[test]
    fn time_in_and_outside_range_are_complements() {
        let s = fixture();
        let calc = RangeCalculator::default();
        let tir = calc.time_in_range(&s).unwrap();
        let tor = calc.time_outside_range(&s).unwrap();
        assert_eq!(tir, 20);
        assert_eq!(tor, 10);
        assert_eq!(tir + tor, 5 * s.len() as u32);

        let pir = calc.percent_in_range(&s).unwrap();
        let por = calc.percent_outside_range(&s).unwrap();
        assert!((pir + por - 100.0).abs() < 1e-9);
        assert!((por - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn sample_rate_scales_minutes() {
        let s = fixture();
        let calc = RangeCalculator::new(1.0, 15);
        assert_eq!(calc.time_in_range(&s).unwrap(), 60);
    }

    #[test]
    fn wider_band_keeps_everything_inside() {
        let s = fixture();
        let calc = RangeCalculator::new(3.0, 5);
        assert_eq!(calc.time_outside_range(&s).unwrap(), 0);
        assert!(matches!(
            calc.mean_outside_range(&s),
            Err(MetricError::InsufficientData(_))
        ));
        assert!((calc.mean_inside_range(&s).unwrap() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn mean_outside_and_inside() {
        let s = fixture();
        let calc = RangeCalculator::default();
        assert!((calc.mean_outside_range(&s).unwrap() - 100.0).abs() < 1e-9);
        assert!((calc.mean_inside_range(&s).unwrap() - 100.0).abs() < 1e-9);
    }
}
