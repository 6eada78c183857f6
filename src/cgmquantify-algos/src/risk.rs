use cgmquantify_types::Series;
use chrono::NaiveDate;
use serde::Serialize;

use crate::{
    InvalidInput, MetricError,
    helpers::{stats::mean, validate::validate},
};

/// Kovatchev's symmetrised blood-glucose risk space:
/// 1. f(g) = ln(g)^1.084 - 5.381, zero at ~112.5 mg/dL
/// 2. r(g) = 22.77 x f(g)^2, scaled to 0-100
/// 3. Readings with f <= 0 count toward low risk, f > 0 toward high risk
///
/// LBGI and HBGI average the two branches over all readings, ADRR averages the
/// sum of each day's worst low and worst high risk.
pub struct RiskCalculator;

/// Per-reading risk split. At most one side is non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RiskScore {
    pub low: f64,
    pub high: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RiskIndices {
    pub lbgi: f64,
    pub hbgi: f64,
}

impl RiskScore {
    const EXPONENT: f64 = 1.084;
    const OFFSET: f64 = 5.381;
    const SCALE: f64 = 22.77;

    /// Symmetrised glucose, defined for glucose >= 1 mg/dL.
    pub fn symmetrise(glucose: f64) -> f64 {
        glucose.ln().powf(Self::EXPONENT) - Self::OFFSET
    }

    pub fn from_glucose(glucose: f64) -> Self {
        let f = Self::symmetrise(glucose);
        let risk = Self::SCALE * f * f;
        if f <= 0.0 {
            Self {
                low: risk,
                high: 0.0,
            }
        } else {
            Self {
                low: 0.0,
                high: risk,
            }
        }
    }
}

impl RiskCalculator {
    /// Risk score for every reading, in series order.
    pub fn scores(series: &Series) -> Result<Vec<RiskScore>, MetricError> {
        validate(series)?;
        Self::scores_of(series.glucose())
    }

    pub fn indices(series: &Series) -> Result<RiskIndices, MetricError> {
        let scores = Self::scores(series)?;
        let low = scores.iter().map(|s| s.low).collect::<Vec<_>>();
        let high = scores.iter().map(|s| s.high).collect::<Vec<_>>();

        Ok(RiskIndices {
            lbgi: mean(&low),
            hbgi: mean(&high),
        })
    }

    pub fn lbgi(series: &Series) -> Result<f64, MetricError> {
        Ok(Self::indices(series)?.lbgi)
    }

    pub fn hbgi(series: &Series) -> Result<f64, MetricError> {
        Ok(Self::indices(series)?.hbgi)
    }

    /// Average Daily Risk Range.
    pub fn adrr(series: &Series) -> Result<f64, MetricError> {
        let scores = Self::scores(series)?;

        // worst low and worst high risk per day; validated series are
        // chronological so a day only ever continues the last one
        let mut days: Vec<(NaiveDate, RiskScore)> = Vec::new();
        for (sample, score) in series.samples().iter().zip(&scores) {
            match days.last_mut().filter(|(day, _)| *day == sample.day) {
                Some((_, worst)) => {
                    worst.low = worst.low.max(score.low);
                    worst.high = worst.high.max(score.high);
                }
                None => days.push((sample.day, *score)),
            }
        }

        if days.is_empty() {
            return Err(MetricError::InsufficientData("series spans no days"));
        }

        let ranges = days
            .iter()
            .map(|(_, worst)| worst.low + worst.high)
            .collect::<Vec<_>>();
        Ok(mean(&ranges))
    }

    fn scores_of(glucose: impl Iterator<Item = f64>) -> Result<Vec<RiskScore>, MetricError> {
        glucose
            .enumerate()
            .map(|(index, value)| {
                // ln(g) < 0 has no real fractional power
                if value < 1.0 {
                    return Err(InvalidInput::OutsideRiskDomain { index, value }.into());
                }
                Ok(RiskScore::from_glucose(value))
            })
            .collect()
    }
}
