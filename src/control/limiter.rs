use serde::{Deserialize, Serialize};

use crate::error::{require_finite, require_non_negative, SimError, SimResult};

// ---------------------------------------------------------------------------
// Saturation and slew-rate limiting
// ---------------------------------------------------------------------------

/// Clamp `value` to `[min, max]`.
pub fn saturate(value: f64, min: f64, max: f64) -> f64 {
    if value > max {
        max
    } else if value < min {
        min
    } else {
        value
    }
}

/// Limit the change from `last` to at most `±delta_max`.
///
/// `new` is returned untouched when it is already within reach. The sign of
/// `delta_max` is ignored.
pub fn rate_limit(new: f64, last: f64, delta_max: f64) -> f64 {
    let delta_max = delta_max.abs();
    let change = new - last;
    if change.abs() <= delta_max {
        new
    } else if change > 0.0 {
        last + delta_max
    } else {
        last - delta_max
    }
}

/// Actuator bounds shared by every controller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActuatorLimits {
    pub u_min: f64,       // V
    pub u_max: f64,       // V
    pub u_delta_max: f64, // V per control step
}

impl Default for ActuatorLimits {
    fn default() -> Self {
        Self { u_min: -10.0, u_max: 10.0, u_delta_max: 0.01 }
    }
}

impl ActuatorLimits {
    pub fn new(u_min: f64, u_max: f64, u_delta_max: f64) -> SimResult<Self> {
        let limits = Self { u_min, u_max, u_delta_max };
        limits.validate()?;
        Ok(limits)
    }

    pub fn validate(&self) -> SimResult<()> {
        require_finite("u_min", self.u_min)?;
        require_finite("u_max", self.u_max)?;
        require_non_negative("u_delta_max", self.u_delta_max)?;
        if self.u_min > self.u_max {
            return Err(SimError::invalid(
                "u_min",
                format!("u_min ({}) exceeds u_max ({})", self.u_min, self.u_max),
            ));
        }
        Ok(())
    }

    /// Clamp first, then slew-limit the clamped value against `last`.
    pub fn apply(&self, raw: f64, last: f64) -> f64 {
        let clamped = saturate(raw, self.u_min, self.u_max);
        rate_limit(clamped, last, self.u_delta_max)
    }

    /// Output a controller starts from: zero, pulled into range.
    pub fn initial_output(&self) -> f64 {
        saturate(0.0, self.u_min, self.u_max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saturate_clamps_both_sides() {
        assert_eq!(saturate(12.0, -10.0, 10.0), 10.0);
        assert_eq!(saturate(-12.0, -10.0, 10.0), -10.0);
        assert_eq!(saturate(3.5, -10.0, 10.0), 3.5);
    }

    #[test]
    fn rate_limit_caps_change() {
        assert_eq!(rate_limit(1.0, 0.0, 0.25), 0.25);
        assert_eq!(rate_limit(-1.0, 0.0, 0.25), -0.25);
        assert_eq!(rate_limit(0.1, 0.0, 0.25), 0.1);
    }

    #[test]
    fn rate_limit_ignores_sign_of_delta() {
        assert_eq!(rate_limit(1.0, 0.0, -0.25), 0.25);
    }

    #[test]
    fn apply_slews_from_clamped_value() {
        let lim = ActuatorLimits::new(-1.0, 1.0, 0.5).unwrap();
        // raw 100 clamps to 1.0, then the slew limit from 0.8 lets it through.
        assert_eq!(lim.apply(100.0, 0.8), 1.0);
        // From -1.0 the clamped 1.0 is out of reach.
        assert_eq!(lim.apply(100.0, -1.0), -0.5);
    }

    #[test]
    fn rejects_inverted_bounds() {
        assert!(ActuatorLimits::new(1.0, -1.0, 0.1).is_err());
        assert!(ActuatorLimits::new(-1.0, 1.0, -0.1).is_err());
        assert!(ActuatorLimits::new(f64::NAN, 1.0, 0.1).is_err());
    }

    #[test]
    fn initial_output_inside_range() {
        let lim = ActuatorLimits::new(2.0, 5.0, 0.1).unwrap();
        assert_eq!(lim.initial_output(), 2.0);
        assert_eq!(ActuatorLimits::default().initial_output(), 0.0);
    }
}
