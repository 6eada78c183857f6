use cgmquantify_algos::{
    A1cEstimator, DailyDifferenceCalculator, DailySpread, GlucoseSummary, MetricError,
    MetricParams, RangeCalculator, RiskCalculator, VariabilityCalculator,
};
use cgmquantify_types::Series;
use serde::Serialize;
use strum::{Display, EnumIter, EnumString};

/// Metrics selectable by name from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display, EnumIter)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum Metric {
    InterdaySd,
    InterdayCv,
    IntradaySd,
    IntradayCv,
    #[strum(serialize = "tir")]
    TimeInRange,
    #[strum(serialize = "tor")]
    TimeOutsideRange,
    #[strum(serialize = "pir")]
    PercentInRange,
    #[strum(serialize = "por")]
    PercentOutsideRange,
    Mge,
    Mgn,
    Mage,
    JIndex,
    Lbgi,
    Hbgi,
    Adrr,
    Modd,
    Conga24,
    Gmi,
    #[strum(serialize = "ea1c")]
    EstimatedA1c,
    Summary,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetricOutput {
    Value(f64),
    Minutes(u32),
    Spread(DailySpread),
    Summary(GlucoseSummary),
}

impl Metric {
    pub fn evaluate(
        self,
        series: &Series,
        params: &MetricParams,
    ) -> Result<MetricOutput, MetricError> {
        let range = RangeCalculator::new(params.sd, params.sample_rate_minutes);

        let output = match self {
            Metric::InterdaySd => MetricOutput::Value(VariabilityCalculator::interday_sd(series)?),
            Metric::InterdayCv => MetricOutput::Value(VariabilityCalculator::interday_cv(series)?),
            Metric::IntradaySd => MetricOutput::Spread(VariabilityCalculator::intraday_sd(series)?),
            Metric::IntradayCv => MetricOutput::Spread(VariabilityCalculator::intraday_cv(series)?),
            Metric::TimeInRange => MetricOutput::Minutes(range.time_in_range(series)?),
            Metric::TimeOutsideRange => MetricOutput::Minutes(range.time_outside_range(series)?),
            Metric::PercentInRange => MetricOutput::Value(range.percent_in_range(series)?),
            Metric::PercentOutsideRange => {
                MetricOutput::Value(range.percent_outside_range(series)?)
            }
            Metric::Mge => MetricOutput::Value(range.mean_outside_range(series)?),
            Metric::Mgn => MetricOutput::Value(range.mean_inside_range(series)?),
            Metric::Mage => MetricOutput::Value(params.mage.calculate(series)?),
            Metric::JIndex => MetricOutput::Value(VariabilityCalculator::j_index(series)?),
            Metric::Lbgi => MetricOutput::Value(RiskCalculator::lbgi(series)?),
            Metric::Hbgi => MetricOutput::Value(RiskCalculator::hbgi(series)?),
            Metric::Adrr => MetricOutput::Value(RiskCalculator::adrr(series)?),
            Metric::Modd => MetricOutput::Value(DailyDifferenceCalculator::modd(series)?),
            Metric::Conga24 => MetricOutput::Value(DailyDifferenceCalculator::conga24(series)?),
            Metric::Gmi => MetricOutput::Value(A1cEstimator::gmi(series)?),
            Metric::EstimatedA1c => MetricOutput::Value(A1cEstimator::estimated_a1c(series)?),
            Metric::Summary => MetricOutput::Summary(GlucoseSummary::calculate(series)?),
        };

        Ok(output)
    }
}

impl std::fmt::Display for MetricOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetricOutput::Value(value) => write!(f, "{value}"),
            MetricOutput::Minutes(minutes) => write!(f, "{minutes} min"),
            MetricOutput::Spread(spread) => write!(f, "{spread}"),
            MetricOutput::Summary(summary) => write!(f, "{summary}"),
        }
    }
}
