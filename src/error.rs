use thiserror::Error;

use crate::control::fuzzy::EngineError;

/// Every way a simulation run can fail.
///
/// Parameter errors are raised at construction, before any step runs.
/// Everything else aborts the run in which it occurs and leaves earlier
/// runs untouched.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("Controller called twice at t={time} (zero time delta)")]
    ZeroTimeDelta { time: f64 },

    #[error("Controller time went backwards: {previous} -> {current}")]
    NonMonotonicTime { previous: f64, current: f64 },

    #[error("Non-finite {quantity} ({value}) at t={time}")]
    NonFiniteState {
        quantity: &'static str,
        value: f64,
        time: f64,
    },

    #[error("Fuzzy inference failed: {0}")]
    EngineFailure(#[from] EngineError),

    #[error("Run cancelled after {completed_steps} steps")]
    Cancelled { completed_steps: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type SimResult<T> = Result<T, SimError>;

impl SimError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        SimError::InvalidParameter { name, reason: reason.into() }
    }
}

// ---------------------------------------------------------------------------
// Parameter checks shared by every constructor
// ---------------------------------------------------------------------------

pub(crate) fn require_finite(name: &'static str, value: f64) -> SimResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SimError::invalid(name, format!("must be finite, got {value}")))
    }
}

pub(crate) fn require_positive(name: &'static str, value: f64) -> SimResult<()> {
    require_finite(name, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(SimError::invalid(name, format!("must be > 0, got {value}")))
    }
}

pub(crate) fn require_non_negative(name: &'static str, value: f64) -> SimResult<()> {
    require_finite(name, value)?;
    if value >= 0.0 {
        Ok(())
    } else {
        Err(SimError::invalid(name, format!("must be >= 0, got {value}")))
    }
}
