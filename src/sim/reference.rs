use std::f64::consts::{FRAC_PI_2, TAU};

use serde::{Deserialize, Serialize};

use crate::error::{require_finite, require_non_negative, SimError, SimResult};

/// Longest run accepted, in steps (about 5.8 days at 100 Hz).
pub const MAX_STEPS: usize = 50_000_000;

// ---------------------------------------------------------------------------
// Reference (setpoint) signals
// ---------------------------------------------------------------------------

/// Shape of the reference angle over time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceMode {
    /// Constant `amplitude`.
    #[default]
    Step,
    /// `amplitude · sin(2π f t)`.
    Sine,
    /// Square wave: `+amplitude` while `sin(2π f t) ≥ 0`, else `−amplitude`.
    Pulse,
}

impl ReferenceMode {
    pub fn value(self, amplitude: f64, frequency_hz: f64, t: f64) -> f64 {
        match self {
            ReferenceMode::Step => amplitude,
            ReferenceMode::Sine => amplitude * (TAU * frequency_hz * t).sin(),
            ReferenceMode::Pulse => {
                if (TAU * frequency_hz * t).sin() >= 0.0 {
                    amplitude
                } else {
                    -amplitude
                }
            }
        }
    }
}

/// What to simulate: reference shape, its parameters, and run length.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub mode: ReferenceMode,
    pub amplitude: f64,    // rad
    pub frequency_hz: f64, // Hz, ignored for Step
    pub duration: f64,     // s
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            mode: ReferenceMode::Step,
            amplitude: FRAC_PI_2,
            frequency_hz: 1.0,
            duration: 5.0,
        }
    }
}

impl Scenario {
    pub fn step(amplitude: f64, duration: f64) -> Self {
        Self { mode: ReferenceMode::Step, amplitude, frequency_hz: 0.0, duration }
    }

    pub fn validate(&self) -> SimResult<()> {
        require_finite("amplitude", self.amplitude)?;
        require_non_negative("frequency_hz", self.frequency_hz)?;
        require_non_negative("duration", self.duration)?;
        Ok(())
    }

    pub fn reference(&self, t: f64) -> f64 {
        self.mode.value(self.amplitude, self.frequency_hz, t)
    }

    /// Number of fixed steps, `floor(duration / dt)`.
    pub fn steps(&self, dt: f64) -> usize {
        (self.duration / dt).floor() as usize
    }

    /// [`Scenario::steps`], rejecting runs longer than [`MAX_STEPS`].
    pub fn step_count(&self, dt: f64) -> SimResult<usize> {
        let steps = (self.duration / dt).floor();
        if !(steps <= MAX_STEPS as f64) {
            return Err(SimError::invalid(
                "duration",
                format!("{} s at dt={dt} s is {steps} steps, more than {MAX_STEPS}", self.duration),
            ));
        }
        Ok(steps as usize)
    }
}
