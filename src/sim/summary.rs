use serde::{Deserialize, Serialize};

use super::record::SimulationRecord;

/// Fraction of the final reference used for the rise time.
const RISE_FRACTION: f64 = 0.9;

/// Response figures computed from a recorded run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseSummary {
    pub controller: String,
    pub steps: usize,
    pub duration_s: f64,
    pub peak_angle: f64,
    pub peak_time_s: f64,
    /// Peak excursion past the final reference, in percent of it.
    /// `None` when the final reference is zero.
    pub overshoot_pct: Option<f64>,
    /// First time the angle reached 90 % of the final reference.
    pub rise_time_s: Option<f64>,
    /// Integral of |reference − angle| dt.
    pub iae: f64,
    pub max_abs_command: f64,
    pub final_error: f64,
}

impl ResponseSummary {
    /// Compute the summary. Returns `None` for an empty record.
    pub fn from_record(record: &SimulationRecord) -> Option<Self> {
        let steps = record.steps();
        let first = steps.first()?;
        let last = steps.last()?;

        let peak = steps.iter().fold(first, |best, s| {
            if s.angle.abs() > best.angle.abs() {
                s
            } else {
                best
            }
        });

        let target = last.reference;
        let overshoot_pct = if target != 0.0 {
            let beyond = steps
                .iter()
                .map(|s| (s.angle - target) * target.signum())
                .fold(0.0_f64, f64::max);
            Some(100.0 * beyond / target.abs())
        } else {
            None
        };

        let rise_time_s = if target != 0.0 {
            steps
                .iter()
                .find(|s| s.angle * target.signum() >= RISE_FRACTION * target.abs())
                .map(|s| s.time)
        } else {
            None
        };

        // Rectangle rule, each sample covers the interval ending at its time.
        let mut iae = 0.0;
        let mut prev_time = first.time - step_width(record);
        for s in steps {
            iae += s.error().abs() * (s.time - prev_time);
            prev_time = s.time;
        }

        let max_abs_command = steps.iter().map(|s| s.command.abs()).fold(0.0_f64, f64::max);

        Some(Self {
            controller: record.controller().to_string(),
            steps: steps.len(),
            duration_s: last.time,
            peak_angle: peak.angle,
            peak_time_s: peak.time,
            overshoot_pct,
            rise_time_s,
            iae,
            max_abs_command,
            final_error: last.error(),
        })
    }
}

/// Width of the first interval: the gap to the second sample, or the first
/// sample's own time when there is only one.
fn step_width(record: &SimulationRecord) -> f64 {
    match record.steps() {
        [a, b, ..] => b.time - a.time,
        [a] => a.time,
        [] => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamics::PendulumState;
    use crate::sim::record::StepRecord;

    fn record_of(samples: &[(f64, f64, f64)]) -> SimulationRecord {
        let mut r = SimulationRecord::with_capacity("test", samples.len());
        for &(time, reference, angle) in samples {
            let state = PendulumState { time, angle, ..PendulumState::default() };
            r.push(StepRecord::new(&state, reference, angle * 0.1));
        }
        r
    }

    #[test]
    fn empty_record_has_no_summary() {
        assert!(ResponseSummary::from_record(&SimulationRecord::default()).is_none());
    }

    #[test]
    fn step_response_figures() {
        let r = record_of(&[
            (0.1, 1.0, 0.0),
            (0.2, 1.0, 0.5),
            (0.3, 1.0, 0.95),
            (0.4, 1.0, 1.2),
            (0.5, 1.0, 1.0),
        ]);
        let s = ResponseSummary::from_record(&r).unwrap();

        assert_eq!(s.steps, 5);
        assert_eq!(s.peak_angle, 1.2);
        assert_eq!(s.peak_time_s, 0.4);
        assert!((s.overshoot_pct.unwrap() - 20.0).abs() < 1e-9);
        assert_eq!(s.rise_time_s, Some(0.3));
        // 0.1 * (1 + 0.5 + 0.05 + 0.2 + 0)
        assert!((s.iae - 0.175).abs() < 1e-9, "iae {}", s.iae);
        assert!((s.max_abs_command - 0.12).abs() < 1e-12);
        assert_eq!(s.final_error, 0.0);
    }

    #[test]
    fn never_rising_has_no_rise_time() {
        let r = record_of(&[(0.1, 1.0, 0.0), (0.2, 1.0, 0.1)]);
        let s = ResponseSummary::from_record(&r).unwrap();
        assert_eq!(s.rise_time_s, None);
        assert_eq!(s.overshoot_pct, Some(0.0));
    }

    #[test]
    fn zero_reference_has_no_overshoot() {
        let r = record_of(&[(0.1, 0.0, 0.0)]);
        let s = ResponseSummary::from_record(&r).unwrap();
        assert_eq!(s.overshoot_pct, None);
        assert_eq!(s.rise_time_s, None);
    }
}
