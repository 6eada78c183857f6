use cgmquantify_types::Series;
use chrono::NaiveDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurningPointKind {
    Peak,
    Valley,
}

/// A local extremum of the glucose trace.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TurningPoint {
    /// Position of the extremum in the series.
    pub index: usize,
    pub time: NaiveDateTime,
    pub glucose: f64,
    pub kind: TurningPointKind,
}

/// Which sample a detected turning point takes its time and glucose from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExcursionStamping {
    /// The sample at the detected extremum.
    #[default]
    DetectedIndex,
    /// The k-th sample of the series for the k-th detected point, peaks
    /// numbered before valleys. Matches MAGE values reported by earlier
    /// cgmquantify releases.
    SequentialCounter,
}

impl TurningPoint {
    /// Finds every interior sample where the slope sign changes.
    ///
    /// Entering or leaving a flat run counts as a change, staying on one does
    /// not. The first and last samples are never turning points. Output is
    /// ordered by `index`.
    pub fn detect(series: &Series, stamping: ExcursionStamping) -> Vec<TurningPoint> {
        let samples = series.samples();
        if samples.len() < 3 {
            return Vec::new();
        }

        let slopes = samples
            .windows(2)
            .map(|w| slope_sign(w[1].glucose - w[0].glucose))
            .collect::<Vec<_>>();

        let mut peaks = Vec::new();
        let mut valleys = Vec::new();
        for (i, pair) in slopes.windows(2).enumerate() {
            let index = i + 1;
            match pair[1] - pair[0] {
                change if change < 0 => peaks.push(index),
                change if change > 0 => valleys.push(index),
                _ => {}
            }
        }

        let mut points = peaks
            .into_iter()
            .map(|index| (index, TurningPointKind::Peak))
            .chain(
                valleys
                    .into_iter()
                    .map(|index| (index, TurningPointKind::Valley)),
            )
            .enumerate()
            .map(|(k, (index, kind))| {
                let source = match stamping {
                    ExcursionStamping::DetectedIndex => index,
                    ExcursionStamping::SequentialCounter => k,
                };
                TurningPoint {
                    index,
                    time: samples[source].timestamp,
                    glucose: samples[source].glucose,
                    kind,
                }
            })
            .collect::<Vec<_>>();

        points.sort_by_key(|p| p.index);
        points
    }

    pub fn is_peak(&self) -> bool {
        matches!(self.kind, TurningPointKind::Peak)
    }
}

fn slope_sign(delta: f64) -> i8 {
    if delta > 0.0 {
        1
    } else if delta < 0.0 {
        -1
    } else {
        0
    }
}
