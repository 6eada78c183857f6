#[macro_use]
extern crate log;

mod error;
pub use error::{InvalidInput, MetricError};

mod params;
pub use params::MetricParams;

pub(crate) mod descriptive;
pub use descriptive::{A1cEstimator, DailySpread, GlucoseSummary, VariabilityCalculator};

pub(crate) mod range;
pub use range::{RangeBounds, RangeCalculator};

pub(crate) mod risk;
pub use risk::{RiskCalculator, RiskIndices, RiskScore};

pub(crate) mod turning_points;
pub use turning_points::{ExcursionStamping, TurningPoint, TurningPointKind};

pub(crate) mod mage;
pub use mage::{MageCalculator, PeakSelection, Rounding};

pub(crate) mod daily_differences;
pub use daily_differences::{DailyDifferenceCalculator, MinuteBuckets, minute_of_day};

pub(crate) mod report;
pub use report::GlycemicReport;

pub mod helpers;
