use tracing::trace;

use super::controller::Controller;
use super::fuzzy::presets::{self, D_ERROR, ERROR};
use super::fuzzy::{feed, InferenceEngine, InputPolicy, MamdaniEngine};
use super::history::{ControllerState, ZeroDtPolicy};
use super::limiter::ActuatorLimits;
use crate::error::{require_finite, SimResult};

/// Integral gain of the classic integral path when none is configured.
pub const DEFAULT_INTEGRAL_GAIN: f64 = 0.5;

// ---------------------------------------------------------------------------
// Fuzzy PD with a classic integral path
// ---------------------------------------------------------------------------

/// Fuzzy PD controller plus a rectangular integral term.
///
/// The engine receives `error` and `d_error` (backward difference). Its
/// output is summed with `integral_gain · ∫e dt`, then clamped and
/// slew-limited. Any engine with those two inputs can stand in for the
/// default [`presets::pd_engine`].
#[derive(Debug, Clone)]
pub struct FuzzyPd<E = MamdaniEngine> {
    engine: E,
    integral_gain: f64,
    limits: ActuatorLimits,
    input_policy: InputPolicy,
    state: ControllerState,
}

impl FuzzyPd<MamdaniEngine> {
    pub fn new(integral_gain: f64, limits: ActuatorLimits) -> SimResult<Self> {
        Self::with_engine(presets::pd_engine()?, integral_gain, limits)
    }
}

impl<E: InferenceEngine> FuzzyPd<E> {
    pub fn with_engine(engine: E, integral_gain: f64, limits: ActuatorLimits) -> SimResult<Self> {
        require_finite("integral_gain", integral_gain)?;
        limits.validate()?;
        Ok(Self {
            engine,
            integral_gain,
            limits,
            input_policy: InputPolicy::default(),
            state: ControllerState::new(&limits, ZeroDtPolicy::default()),
        })
    }

    pub fn input_policy(mut self, policy: InputPolicy) -> Self {
        self.input_policy = policy;
        self
    }

    pub fn zero_dt_policy(mut self, policy: ZeroDtPolicy) -> Self {
        self.state = ControllerState::new(&self.limits, policy);
        self
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

impl<E: InferenceEngine> Controller for FuzzyPd<E> {
    fn control(&mut self, reference: f64, measured: f64, time: f64) -> SimResult<f64> {
        let sample = self.state.observe(reference - measured, time)?;

        feed(&mut self.engine, ERROR, sample.error, self.input_policy)?;
        feed(&mut self.engine, D_ERROR, sample.derivative, self.input_policy)?;
        let fuzzy = self.engine.infer()?;

        let raw = fuzzy + self.integral_gain * self.state.integral();
        trace!(time, error = sample.error, derivative = sample.derivative, fuzzy, raw, "fuzzy pd");
        self.state.accept(raw, &self.limits, time)
    }

    fn reset(&mut self) {
        self.state.reset(&self.limits);
    }

    fn name(&self) -> &str {
        "FuzzyPD+I"
    }
}
