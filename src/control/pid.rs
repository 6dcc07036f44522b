use serde::{Deserialize, Serialize};
use tracing::trace;

use super::controller::Controller;
use super::history::{ControllerState, ZeroDtPolicy};
use super::limiter::ActuatorLimits;
use crate::error::{require_finite, require_positive, SimResult};

// ---------------------------------------------------------------------------
// PID controller (ideal form, kp·(e + ∫e/ti + td·de))
// ---------------------------------------------------------------------------

/// PID gains in ideal form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PidGains {
    pub kp: f64,
    pub ti: f64, // s, integral time
    pub td: f64, // s, derivative time
}

impl Default for PidGains {
    fn default() -> Self {
        // ti this large effectively disables the integral term.
        Self { kp: 1.0, ti: 1.0e11, td: 0.0 }
    }
}

impl PidGains {
    pub fn validate(&self) -> SimResult<()> {
        require_finite("kp", self.kp)?;
        require_positive("ti", self.ti)?;
        require_finite("td", self.td)?;
        Ok(())
    }
}

/// Classic PID with clamp-then-slew output limiting.
///
/// The integral accumulates without anti-windup.
#[derive(Debug, Clone)]
pub struct Pid {
    gains: PidGains,
    limits: ActuatorLimits,
    state: ControllerState,
}

impl Pid {
    pub fn new(gains: PidGains, limits: ActuatorLimits) -> SimResult<Self> {
        Self::with_policy(gains, limits, ZeroDtPolicy::default())
    }

    pub fn with_policy(gains: PidGains, limits: ActuatorLimits, policy: ZeroDtPolicy) -> SimResult<Self> {
        gains.validate()?;
        limits.validate()?;
        Ok(Self { gains, limits, state: ControllerState::new(&limits, policy) })
    }

    /// Retune without clearing history.
    pub fn set_gains(&mut self, kp: f64, ti: f64, td: f64) -> SimResult<()> {
        let gains = PidGains { kp, ti, td };
        gains.validate()?;
        self.gains = gains;
        Ok(())
    }

    pub fn gains(&self) -> &PidGains {
        &self.gains
    }

    pub fn integral(&self) -> f64 {
        self.state.integral()
    }

    pub fn derivative(&self) -> f64 {
        self.state.derivative()
    }

    pub fn last_output(&self) -> f64 {
        self.state.last_output()
    }
}

impl Controller for Pid {
    fn control(&mut self, reference: f64, measured: f64, time: f64) -> SimResult<f64> {
        let sample = self.state.observe(reference - measured, time)?;
        let g = &self.gains;
        let raw = g.kp * (sample.error + self.state.integral() / g.ti + g.td * sample.derivative);
        trace!(time, error = sample.error, derivative = sample.derivative, raw, "pid");
        self.state.accept(raw, &self.limits, time)
    }

    fn reset(&mut self) {
        self.state.reset(&self.limits);
    }

    fn name(&self) -> &str {
        "PID"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimError;

    fn wide_limits() -> ActuatorLimits {
        ActuatorLimits::new(-1.0e6, 1.0e6, 1.0e6).unwrap()
    }

    #[test]
    fn pid_proportional() {
        let mut pid = Pid::new(PidGains { kp: 2.0, ti: 1.0e11, td: 0.0 }, wide_limits()).unwrap();
        let out = pid.control(0.5, 0.0, 0.01).unwrap();
        assert!((out - 1.0).abs() < 1e-9, "Pure P should output Kp * error, got {out}");
    }

    #[test]
    fn pid_integral_accumulates() {
        let mut pid = Pid::new(PidGains { kp: 1.0, ti: 1.0, td: 0.0 }, wide_limits()).unwrap();
        pid.control(1.0, 0.0, 0.1).unwrap();
        let out = pid.control(1.0, 0.0, 0.2).unwrap();
        // e + integral/ti = 1 + 0.2
        assert!((out - 1.2).abs() < 1e-9, "Integral should accumulate, got {out}");
        assert!((pid.integral() - 0.2).abs() < 1e-12);
    }

    #[test]
    fn pid_derivative_term() {
        let mut pid = Pid::new(PidGains { kp: 1.0, ti: 1.0e11, td: 0.1 }, wide_limits()).unwrap();
        pid.control(1.0, 0.0, 0.1).unwrap();
        let out = pid.control(1.0, 0.5, 0.2).unwrap();
        // e = 0.5, de = -5, td*de = -0.5
        assert!(out.abs() < 1e-6, "got {out}");
    }

    #[test]
    fn output_is_slew_limited() {
        let mut pid = Pid::new(PidGains { kp: 100.0, ..PidGains::default() }, ActuatorLimits::default()).unwrap();
        let mut last = 0.0;
        for i in 1..=100 {
            let u = pid.control(1.0, 0.0, i as f64 * 0.01).unwrap();
            assert!((u - last).abs() <= 0.01 + 1e-12);
            assert!(u.abs() <= 10.0);
            last = u;
        }
        assert!((last - 1.0).abs() < 1e-9, "100 steps of 0.01 should reach 1.0, got {last}");
    }

    #[test]
    fn same_timestamp_twice_stays_finite() {
        let mut pid = Pid::new(PidGains { kp: 1.0, ti: 2.0, td: 1.0 }, ActuatorLimits::default()).unwrap();
        let a = pid.control(1.0, 0.0, 0.5).unwrap();
        let b = pid.control(1.0, 0.2, 0.5).unwrap();
        assert!(a.is_finite() && b.is_finite());
    }

    #[test]
    fn rejects_bad_gains() {
        let bad = PidGains { kp: 1.0, ti: 0.0, td: 0.0 };
        assert!(matches!(
            Pid::new(bad, ActuatorLimits::default()),
            Err(SimError::InvalidParameter { name: "ti", .. })
        ));
        let mut pid = Pid::new(PidGains::default(), ActuatorLimits::default()).unwrap();
        assert!(pid.set_gains(f64::NAN, 1.0, 0.0).is_err());
        assert_eq!(pid.gains().kp, 1.0, "failed retune keeps old gains");
    }

    #[test]
    fn reset_clears_history() {
        let mut pid = Pid::new(PidGains { kp: 1.0, ti: 1.0, td: 0.0 }, ActuatorLimits::default()).unwrap();
        pid.control(1.0, 0.0, 0.1).unwrap();
        pid.reset();
        assert_eq!(pid.integral(), 0.0);
        assert_eq!(pid.last_output(), 0.0);
    }
}
