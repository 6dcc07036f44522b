use serde::{Deserialize, Serialize};
use tracing::warn;

use super::limiter::ActuatorLimits;
use crate::error::{SimError, SimResult};

/// What a controller does when called twice with the same timestamp.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZeroDtPolicy {
    /// Keep the previous derivative and carry on.
    #[default]
    ReusePrevious,
    /// Fail the call with [`SimError::ZeroTimeDelta`].
    Reject,
}

/// One observed error sample with its backward-difference derivative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ErrorSample {
    pub error: f64,
    pub derivative: f64,
    pub dt: f64,
}

// ---------------------------------------------------------------------------
// Controller history shared by PID and fuzzy variants
// ---------------------------------------------------------------------------

/// Rolling error history, rectangular integral and last accepted output.
///
/// The clock starts at t = 0, so the first call integrates over `[0, t]`.
/// The first error sample is duplicated, which makes the first derivative zero.
#[derive(Debug, Clone)]
pub struct ControllerState {
    prev_error: Option<f64>,
    prev_time: f64,
    derivative: f64,
    integral: f64,
    last_output: f64,
    policy: ZeroDtPolicy,
}

impl ControllerState {
    pub fn new(limits: &ActuatorLimits, policy: ZeroDtPolicy) -> Self {
        Self {
            prev_error: None,
            prev_time: 0.0,
            derivative: 0.0,
            integral: 0.0,
            last_output: limits.initial_output(),
            policy,
        }
    }

    /// Record a new error at `time`, updating the integral and derivative.
    pub fn observe(&mut self, error: f64, time: f64) -> SimResult<ErrorSample> {
        if !error.is_finite() {
            return Err(SimError::NonFiniteState { quantity: "error", value: error, time });
        }
        if !time.is_finite() {
            return Err(SimError::NonFiniteState { quantity: "time", value: time, time });
        }

        let dt = time - self.prev_time;
        if dt < 0.0 {
            return Err(SimError::NonMonotonicTime { previous: self.prev_time, current: time });
        }

        // Rectangular integral; dt == 0 contributes nothing.
        self.integral += dt * error;

        let prev_error = self.prev_error.unwrap_or(error);
        if dt > 0.0 {
            self.derivative = (error - prev_error) / dt;
        } else if self.prev_error.is_some() {
            match self.policy {
                ZeroDtPolicy::ReusePrevious => {
                    warn!(time, derivative = self.derivative, "zero time delta, reusing previous derivative");
                }
                ZeroDtPolicy::Reject => return Err(SimError::ZeroTimeDelta { time }),
            }
        } else {
            // First call at t = 0: no history yet, derivative is zero.
            self.derivative = 0.0;
        }

        self.prev_error = Some(error);
        self.prev_time = time;

        Ok(ErrorSample { error, derivative: self.derivative, dt })
    }

    /// Limit `raw` against the last accepted output and remember the result.
    pub fn accept(&mut self, raw: f64, limits: &ActuatorLimits, time: f64) -> SimResult<f64> {
        if !raw.is_finite() {
            return Err(SimError::NonFiniteState { quantity: "command", value: raw, time });
        }
        self.last_output = limits.apply(raw, self.last_output);
        Ok(self.last_output)
    }

    pub fn integral(&self) -> f64 {
        self.integral
    }

    pub fn derivative(&self) -> f64 {
        self.derivative
    }

    pub fn last_output(&self) -> f64 {
        self.last_output
    }

    pub fn last_time(&self) -> f64 {
        self.prev_time
    }

    pub fn reset(&mut self, limits: &ActuatorLimits) {
        *self = Self::new(limits, self.policy);
    }
}
