use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::control::fuzzy::InputPolicy;
use crate::control::fuzzy_pd::DEFAULT_INTEGRAL_GAIN;
use crate::control::{ActuatorLimits, Controller, FuzzyPd, FuzzyPid, Pid, PidGains, ZeroDtPolicy};
use crate::dynamics::{Pendulum, PendulumParams};
use crate::error::{require_finite, SimResult};
use crate::sim::{simulate, Scenario, SimulationRecord};

// ---------------------------------------------------------------------------
// Run configuration
// ---------------------------------------------------------------------------

/// Everything one run needs. Every section is optional in JSON and falls
/// back to its defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub pendulum: PendulumParams,
    pub limits: ActuatorLimits,
    pub controller: ControllerConfig,
    pub scenario: Scenario,
}

/// Which controller to build, tagged by `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ControllerConfig {
    Pid {
        #[serde(default = "bench_gains")]
        gains: PidGains,
        #[serde(default)]
        zero_dt: ZeroDtPolicy,
    },
    FuzzyPd {
        #[serde(default = "default_integral_gain")]
        integral_gain: f64,
        #[serde(default)]
        input_policy: InputPolicy,
        #[serde(default)]
        zero_dt: ZeroDtPolicy,
    },
    FuzzyPid {
        #[serde(default)]
        input_policy: InputPolicy,
        #[serde(default)]
        zero_dt: ZeroDtPolicy,
    },
}

/// Gains the bench rig starts from.
fn bench_gains() -> PidGains {
    PidGains { kp: 0.5, ti: 20.0, td: 0.0 }
}

fn default_integral_gain() -> f64 {
    DEFAULT_INTEGRAL_GAIN
}

impl Default for ControllerConfig {
    fn default() -> Self {
        ControllerConfig::Pid { gains: bench_gains(), zero_dt: ZeroDtPolicy::default() }
    }
}

impl ControllerConfig {
    pub fn validate(&self) -> SimResult<()> {
        match self {
            ControllerConfig::Pid { gains, .. } => gains.validate(),
            ControllerConfig::FuzzyPd { integral_gain, .. } => require_finite("integral_gain", *integral_gain),
            ControllerConfig::FuzzyPid { .. } => Ok(()),
        }
    }

    /// Build a fresh controller with no history.
    pub fn build(&self, limits: ActuatorLimits) -> SimResult<Box<dyn Controller + Send>> {
        let controller: Box<dyn Controller + Send> = match *self {
            ControllerConfig::Pid { gains, zero_dt } => Box::new(Pid::with_policy(gains, limits, zero_dt)?),
            ControllerConfig::FuzzyPd { integral_gain, input_policy, zero_dt } => Box::new(
                FuzzyPd::new(integral_gain, limits)?
                    .input_policy(input_policy)
                    .zero_dt_policy(zero_dt),
            ),
            ControllerConfig::FuzzyPid { input_policy, zero_dt } => Box::new(
                FuzzyPid::new(limits)?
                    .input_policy(input_policy)
                    .zero_dt_policy(zero_dt),
            ),
        };
        Ok(controller)
    }
}

impl SimulationConfig {
    /// Load from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> SimResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn from_json_str(json: &str) -> SimResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config)
    }

    /// Check every parameter before anything is built.
    pub fn validate(&self) -> SimResult<()> {
        self.pendulum.validate()?;
        self.limits.validate()?;
        self.controller.validate()?;
        self.scenario.validate()?;
        self.scenario.step_count(self.pendulum.dt)?;
        Ok(())
    }

    pub fn build_pendulum(&self) -> SimResult<Pendulum> {
        Pendulum::new(self.pendulum)
    }

    pub fn build_controller(&self) -> SimResult<Box<dyn Controller + Send>> {
        self.controller.build(self.limits)
    }

    /// Validate, build fresh state and run to completion.
    pub fn run(&self) -> SimResult<SimulationRecord> {
        self.validate()?;
        debug!(config = ?self, "running configuration");
        let mut pendulum = self.build_pendulum()?;
        let mut controller = self.build_controller()?;
        simulate(&mut pendulum, controller.as_mut(), &self.scenario)
    }
}
