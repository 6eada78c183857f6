use crate::MageCalculator;

/// Tunables shared by the metric API.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricParams {
    /// Standard-deviation multiplier for the range bounds.
    pub sd: f64,
    pub sample_rate_minutes: u32,
    pub mage: MageCalculator,
}

impl Default for MetricParams {
    fn default() -> Self {
        Self {
            sd: 1.0,
            sample_rate_minutes: 5,
            mage: MageCalculator::default(),
        }
    }
}
