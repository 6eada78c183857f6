use std::{collections::BTreeMap, fmt::Display};

use cgmquantify_types::Series;
use serde::Serialize;

use crate::{
    A1cEstimator, DailyDifferenceCalculator, DailySpread, GlucoseSummary, MetricError,
    MetricParams, RangeCalculator, RiskCalculator, VariabilityCalculator,
};

/// Every metric for one series. A metric that fails leaves its field empty
/// and records the reason in `failures`; the others are still computed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GlycemicReport {
    pub summary: Option<GlucoseSummary>,
    pub interday_sd: Option<f64>,
    pub interday_cv: Option<f64>,
    pub intraday_sd: Option<DailySpread>,
    pub intraday_cv: Option<DailySpread>,
    pub time_in_range: Option<u32>,
    pub time_outside_range: Option<u32>,
    pub percent_in_range: Option<f64>,
    pub percent_outside_range: Option<f64>,
    pub mge: Option<f64>,
    pub mgn: Option<f64>,
    pub mage: Option<f64>,
    pub j_index: Option<f64>,
    pub lbgi: Option<f64>,
    pub hbgi: Option<f64>,
    pub adrr: Option<f64>,
    pub modd: Option<f64>,
    pub conga24: Option<f64>,
    pub gmi: Option<f64>,
    pub estimated_a1c: Option<f64>,
    pub failures: BTreeMap<&'static str, String>,
}

impl GlycemicReport {
    pub fn compute(series: &Series, params: &MetricParams) -> Self {
        let mut report = Self::default();
        let range = RangeCalculator::new(params.sd, params.sample_rate_minutes);
        let risk = RiskCalculator::indices(series);

        report.summary = report.record("summary", GlucoseSummary::calculate(series));
        report.interday_sd =
            report.record("interday_sd", VariabilityCalculator::interday_sd(series));
        report.interday_cv =
            report.record("interday_cv", VariabilityCalculator::interday_cv(series));
        report.intraday_sd =
            report.record("intraday_sd", VariabilityCalculator::intraday_sd(series));
        report.intraday_cv =
            report.record("intraday_cv", VariabilityCalculator::intraday_cv(series));
        report.time_in_range = report.record("time_in_range", range.time_in_range(series));
        report.time_outside_range =
            report.record("time_outside_range", range.time_outside_range(series));
        report.percent_in_range = report.record("percent_in_range", range.percent_in_range(series));
        report.percent_outside_range =
            report.record("percent_outside_range", range.percent_outside_range(series));
        report.mge = report.record("mge", range.mean_outside_range(series));
        report.mgn = report.record("mgn", range.mean_inside_range(series));
        report.mage = report.record("mage", params.mage.calculate(series));
        report.j_index = report.record("j_index", VariabilityCalculator::j_index(series));
        report.lbgi = report.record("lbgi", risk.map(|r| r.lbgi));
        report.hbgi = report.record("hbgi", risk.map(|r| r.hbgi));
        report.adrr = report.record("adrr", RiskCalculator::adrr(series));
        report.modd = report.record("modd", DailyDifferenceCalculator::modd(series));
        report.conga24 = report.record("conga24", DailyDifferenceCalculator::conga24(series));
        report.gmi = report.record("gmi", A1cEstimator::gmi(series));
        report.estimated_a1c = report.record("estimated_a1c", A1cEstimator::estimated_a1c(series));

        report
    }

    fn record<T>(&mut self, metric: &'static str, result: Result<T, MetricError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(error) => {
                warn!("{metric} unavailable: {error}");
                self.failures.insert(metric, error.to_string());
                None
            }
        }
    }
}

impl Display for GlycemicReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn line<T: Display>(
            f: &mut std::fmt::Formatter<'_>,
            label: &str,
            value: &Option<T>,
        ) -> std::fmt::Result {
            match value {
                Some(value) => writeln!(f, "{label}: {value}"),
                None => writeln!(f, "{label}: n/a"),
            }
        }

        if let Some(summary) = &self.summary {
            writeln!(f, "{summary}")?;
        }
        line(f, "Interday SD", &self.interday_sd.map(Rounded))?;
        line(f, "Interday CV", &self.interday_cv.map(Rounded))?;
        line(f, "Intraday SD", &self.intraday_sd)?;
        line(f, "Intraday CV", &self.intraday_cv)?;
        line(f, "TIR (min)", &self.time_in_range)?;
        line(f, "TOR (min)", &self.time_outside_range)?;
        line(f, "PIR (%)", &self.percent_in_range.map(Rounded))?;
        line(f, "POR (%)", &self.percent_outside_range.map(Rounded))?;
        line(f, "MGE", &self.mge.map(Rounded))?;
        line(f, "MGN", &self.mgn.map(Rounded))?;
        line(f, "MAGE", &self.mage)?;
        line(f, "J-index", &self.j_index.map(Rounded))?;
        line(f, "LBGI", &self.lbgi.map(Rounded))?;
        line(f, "HBGI", &self.hbgi.map(Rounded))?;
        line(f, "ADRR", &self.adrr.map(Rounded))?;
        line(f, "MODD", &self.modd.map(Rounded))?;
        line(f, "CONGA24", &self.conga24.map(Rounded))?;
        line(f, "GMI (%)", &self.gmi.map(Rounded))?;
        line(f, "eA1c (%)", &self.estimated_a1c.map(Rounded))?;

        for (metric, reason) in &self.failures {
            writeln!(f, "\t{metric}: {reason}")?;
        }
        Ok(())
    }
}

struct Rounded(f64);

impl Display for Rounded {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.3}", self.0)
    }
}
