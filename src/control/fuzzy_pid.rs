use tracing::trace;

use super::controller::Controller;
use super::fuzzy::presets::{self, D_ERROR, ERROR, I_ERROR};
use super::fuzzy::{feed, InferenceEngine, InputPolicy, MamdaniEngine};
use super::history::{ControllerState, ZeroDtPolicy};
use super::limiter::ActuatorLimits;
use crate::error::SimResult;

// ---------------------------------------------------------------------------
// Three-input fuzzy PID
// ---------------------------------------------------------------------------

/// Fuzzy PID controller over `error`, `d_error` and `i_error`.
///
/// Only `error` is live: `d_error` and `i_error` are always fed as zero. The
/// derivative and integral are still tracked and exposed through
/// [`FuzzyPid::tracked_derivative`] and [`FuzzyPid::tracked_integral`].
///
/// TODO: decide with the rig owners whether the tracked derivative and
/// integral should be fed to the engine; doing so changes tuning.
#[derive(Debug, Clone)]
pub struct FuzzyPid<E = MamdaniEngine> {
    engine: E,
    limits: ActuatorLimits,
    input_policy: InputPolicy,
    state: ControllerState,
}

impl FuzzyPid<MamdaniEngine> {
    pub fn new(limits: ActuatorLimits) -> SimResult<Self> {
        Self::with_engine(presets::pid_engine()?, limits)
    }
}

impl<E: InferenceEngine> FuzzyPid<E> {
    pub fn with_engine(engine: E, limits: ActuatorLimits) -> SimResult<Self> {
        limits.validate()?;
        Ok(Self {
            engine,
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

    pub fn tracked_derivative(&self) -> f64 {
        self.state.derivative()
    }

    pub fn tracked_integral(&self) -> f64 {
        self.state.integral()
    }

    pub fn last_output(&self) -> f64 {
        self.state.last_output()
    }
}

impl<E: InferenceEngine> Controller for FuzzyPid<E> {
    fn control(&mut self, reference: f64, measured: f64, time: f64) -> SimResult<f64> {
        let sample = self.state.observe(reference - measured, time)?;

        feed(&mut self.engine, ERROR, sample.error, self.input_policy)?;
        feed(&mut self.engine, D_ERROR, 0.0, self.input_policy)?;
        feed(&mut self.engine, I_ERROR, 0.0, self.input_policy)?;
        let raw = self.engine.infer()?;

        trace!(time, error = sample.error, raw, "fuzzy pid");
        self.state.accept(raw, &self.limits, time)
    }

    fn reset(&mut self) {
        self.state.reset(&self.limits);
    }

    fn name(&self) -> &str {
        "FuzzyPID"
    }
}
