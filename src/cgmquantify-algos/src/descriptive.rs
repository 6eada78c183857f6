use std::fmt::Display;

use cgmquantify_types::Series;
use serde::Serialize;

use crate::{
    MetricError,
    helpers::{
        stats::{mean, median, percentile, std_dev},
        validate::validate,
    },
};

pub struct VariabilityCalculator;

/// Distribution of a per-day statistic across days.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DailySpread {
    pub mean: f64,
    pub median: f64,
    pub sd: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GlucoseSummary {
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    pub q1: f64,
    pub q3: f64,
}

impl VariabilityCalculator {
    pub fn interday_sd(series: &Series) -> Result<f64, MetricError> {
        validate(series)?;
        Ok(std_dev(&glucose(series)))
    }

    /// Coefficient of variation over the whole series, in percent.
    pub fn interday_cv(series: &Series) -> Result<f64, MetricError> {
        validate(series)?;
        Ok(cv(&glucose(series)))
    }

    pub fn intraday_sd(series: &Series) -> Result<DailySpread, MetricError> {
        validate(series)?;
        Ok(Self::per_day(series, std_dev))
    }

    pub fn intraday_cv(series: &Series) -> Result<DailySpread, MetricError> {
        validate(series)?;
        Ok(Self::per_day(series, cv))
    }

    /// J-index: `0.001 * (mean + sd)^2`.
    pub fn j_index(series: &Series) -> Result<f64, MetricError> {
        validate(series)?;
        let values = glucose(series);
        Ok(0.001 * (mean(&values) + std_dev(&values)).powi(2))
    }

    fn per_day(series: &Series, stat: fn(&[f64]) -> f64) -> DailySpread {
        let daily = series
            .days()
            .iter()
            .map(|d| stat(&d.glucose))
            .collect::<Vec<_>>();

        DailySpread {
            mean: mean(&daily),
            median: median(&daily),
            sd: std_dev(&daily),
        }
    }
}

/// HbA1c estimates derived from mean glucose.
pub struct A1cEstimator;

impl A1cEstimator {
    /// Glucose Management Indicator, in percent.
    pub fn gmi(series: &Series) -> Result<f64, MetricError> {
        validate(series)?;
        Ok(3.31 + 0.02392 * mean(&glucose(series)))
    }

    /// ADA estimated A1c, in percent.
    pub fn estimated_a1c(series: &Series) -> Result<f64, MetricError> {
        validate(series)?;
        Ok((46.7 + mean(&glucose(series))) / 28.7)
    }
}

impl GlucoseSummary {
    pub fn calculate(series: &Series) -> Result<Self, MetricError> {
        validate(series)?;
        let values = glucose(series);

        Ok(Self {
            mean: mean(&values),
            median: median(&values),
            min: values.iter().copied().fold(f64::INFINITY, f64::min),
            max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            q1: percentile(&values, 25.0),
            q3: percentile(&values, 75.0),
        })
    }
}

fn glucose(series: &Series) -> Vec<f64> {
    series.glucose().collect()
}

fn cv(values: &[f64]) -> f64 {
    std_dev(values) / mean(values) * 100.0
}

impl Display for DailySpread {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "mean: {:.3}, median: {:.3}, sd: {:.3}",
            self.mean, self.median, self.sd
        )
    }
}

impl Display for GlucoseSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Mean: {:.1}\nMedian: {:.1}\nMin: {:.1}\nMax: {:.1}\nQ1: {:.1}\nQ3: {:.1}",
            self.mean, self.median, self.min, self.max, self.q1, self.q3
        )
    }
}
