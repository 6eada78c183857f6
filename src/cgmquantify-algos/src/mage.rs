use std::collections::HashSet;

use cgmquantify_types::Series;

use crate::{
    ExcursionStamping, MetricError, TurningPoint, TurningPointKind,
    helpers::{
        stats::{round_half_even, round_to},
        validate::validate,
    },
};

/// Mean Amplitude of Glycemic Excursions.
///
/// Turning points are compared three at a time at offsets
/// `(i - window, i, i + window)`. Whenever two compared points are of the same
/// kind only the more extreme one is kept, which drops the intermediate
/// wiggles of a noisy trace. If that leaves fewer than
/// [`Self::MIN_RETAINED_POINTS`] points, every detected turning point is used
/// and each counts as its own excursion; otherwise excursions are counted as
/// half the detected points, one peak and one valley each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MageCalculator {
    pub window: usize,
    pub stamping: ExcursionStamping,
    pub peak_selection: PeakSelection,
    pub rounding: Rounding,
}

/// Which of two compared peaks survives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PeakSelection {
    /// The higher peak, earlier one on ties.
    #[default]
    Higher,
    /// Always the later peak, regardless of height.
    Later,
}

/// How the result is rounded to three decimals when it sits exactly halfway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rounding {
    #[default]
    HalfAwayFromZero,
    /// Banker's rounding, e.g. 120.0625 -> 120.062.
    HalfEven,
}

impl Default for MageCalculator {
    fn default() -> Self {
        Self::new(1)
    }
}

impl MageCalculator {
    pub const MIN_RETAINED_POINTS: usize = 10;
    const DECIMALS: i32 = 3;

    pub fn new(window: usize) -> Self {
        Self {
            window,
            stamping: ExcursionStamping::DetectedIndex,
            peak_selection: PeakSelection::Higher,
            rounding: Rounding::HalfAwayFromZero,
        }
    }

    /// Reproduces MAGE as reported by earlier cgmquantify releases, including
    /// its counter-based stamping, later-peak selection and half-even rounding.
    pub fn compatible(window: usize) -> Self {
        Self {
            window,
            stamping: ExcursionStamping::SequentialCounter,
            peak_selection: PeakSelection::Later,
            rounding: Rounding::HalfEven,
        }
    }

    pub fn calculate(&self, series: &Series) -> Result<f64, MetricError> {
        validate(series)?;
        if series.len() < 3 {
            return Err(MetricError::InsufficientData(
                "MAGE needs at least 3 samples",
            ));
        }

        let detected = TurningPoint::detect(series, self.stamping);
        if detected.is_empty() {
            return Err(MetricError::InsufficientData("glucose trace has no turning points"));
        }

        let selected = self.select(&detected);
        let (mut retained, excursions) = if selected.len() < Self::MIN_RETAINED_POINTS {
            debug!(
                "MAGE kept {} of {} turning points, using all of them",
                selected.len(),
                detected.len()
            );
            (detected.clone(), detected.len() as f64)
        } else {
            (selected, detected.len() as f64 / 2.0)
        };

        let mut seen = HashSet::new();
        retained.retain(|p| seen.insert(p.index));

        let total = retained.iter().map(|p| p.glucose).sum::<f64>();
        let mage = total / excursions;
        Ok(match self.rounding {
            Rounding::HalfAwayFromZero => round_to(mage, Self::DECIMALS),
            Rounding::HalfEven => round_half_even(mage, Self::DECIMALS),
        })
    }

    /// Sliding same-kind comparison. A point can be selected more than once.
    fn select(&self, points: &[TurningPoint]) -> Vec<TurningPoint> {
        let mut selected = Vec::new();

        for i in self.window..points.len().saturating_sub(self.window) {
            let positions = [i - self.window, i, i + self.window];
            for pair in positions.windows(2) {
                let (a, b) = (&points[pair[0]], &points[pair[1]]);
                if a.kind != b.kind {
                    continue;
                }

                let keep = match a.kind {
                    TurningPointKind::Peak => match self.peak_selection {
                        PeakSelection::Higher if a.glucose >= b.glucose => a,
                        _ => b,
                    },
                    TurningPointKind::Valley if a.glucose <= b.glucose => a,
                    TurningPointKind::Valley => b,
                };
                selected.push(*keep);
            }
        }

        selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmquantify_types::Sample;
    use chrono::{NaiveDate, TimeDelta};

    fn series(values: &[f64]) -> Series {
        let base = NaiveDate::from_ymd_opt(2025, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        values
            .iter()
            .enumerate()
            .map(|(i, &g)| Sample::new(base + TimeDelta::minutes(5 * i as i64), g))
            .collect()
    }

    fn sawtooth(len: usize) -> Series {
        let values = (0..len)
            .map(|i| if i % 2 == 0 { 80.0 } else { 160.0 })
            .collect::<Vec<_>>();
        series(&values)
    }

    #[test]
    fn constant_series_is_insufficient() {
        let result = MageCalculator::default().calculate(&series(&[110.0; 20]));
        assert!(matches!(result, Err(MetricError::InsufficientData(_))));
    }

    #[test]
    fn two_samples_are_insufficient() {
        let result = MageCalculator::default().calculate(&series(&[110.0, 140.0]));
        assert!(matches!(result, Err(MetricError::InsufficientData(_))));
    }

    #[test]
    fn sawtooth_falls_back_to_all_points() {
        // strictly alternating kinds never compare, so all 8 interior points
        // are used and each counts: (4 x 160 + 4 x 80) / 8
        assert_eq!(MageCalculator::default().calculate(&sawtooth(10)), Ok(120.0));
        assert_eq!(
            MageCalculator::compatible(1).calculate(&sawtooth(10)),
            Ok(120.0)
        );
    }

    #[test]
    fn filtered_points_use_half_count() {
        // window 2 compares same kinds only: 12 selections, points 0..=7
        // survive deduplication -> (4 x 160 + 4 x 80) / (10 / 2)
        let calc = MageCalculator::new(2);
        assert_eq!(calc.calculate(&sawtooth(12)), Ok(192.0));
    }

    #[test]
    fn higher_peak_wins() {
        use TurningPointKind::*;

        let time = NaiveDate::from_ymd_opt(2025, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let point = |index, glucose, kind| TurningPoint {
            index,
            time,
            glucose,
            kind,
        };
        let points = [
            point(1, 180.0, Peak),
            point(2, 150.0, Peak),
            point(3, 70.0, Valley),
            point(4, 60.0, Valley),
        ];

        let chosen = |calc: MageCalculator| {
            calc.select(&points)
                .iter()
                .map(|p| p.index)
                .collect::<Vec<_>>()
        };

        // i = 1: (0, 1) peaks, i = 2: (2, 3) valleys
        assert_eq!(chosen(MageCalculator::new(1)), vec![1, 4]);
        assert_eq!(chosen(MageCalculator::compatible(1)), vec![2, 4]);
    }

    #[test]
    fn compatible_mode_uses_counter_stamping() {
        let s = series(&[100.0, 150.0, 90.0, 200.0, 60.0, 120.0]);
        assert_eq!(MageCalculator::default().calculate(&s), Ok(125.0));
        assert_eq!(MageCalculator::compatible(1).calculate(&s), Ok(135.0));
    }

    #[test]
    fn compatible_mode_rounds_ties_to_even() {
        // 16 alternating turning points, counter stamping takes samples
        // 0..=15: (81 + 8 x 160 + 7 x 80) / 16 = 120.0625
        let values = (0..18)
            .map(|i| match i {
                0 => 81.0,
                i if i % 2 == 0 => 80.0,
                _ => 160.0,
            })
            .collect::<Vec<_>>();
        let s = series(&values);

        assert_eq!(MageCalculator::compatible(1).calculate(&s), Ok(120.062));

        let mut half_up = MageCalculator::compatible(1);
        half_up.rounding = Rounding::HalfAwayFromZero;
        assert_eq!(half_up.calculate(&s), Ok(120.063));
    }

    #[test]
    fn result_is_rounded_to_three_places() {
        // three turning points: 150, 90, 151 -> 391 / 3
        let s = series(&[100.0, 150.0, 90.0, 151.0, 100.0]);
        assert_eq!(MageCalculator::default().calculate(&s), Ok(130.333));
    }

    #[test]
    fn invalid_glucose_is_rejected_first() {
        let result = MageCalculator::default().calculate(&series(&[100.0, 0.0, 120.0]));
        assert!(matches!(result, Err(MetricError::InvalidInput(_))));
    }
}
