use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Failures of a fuzzy inference engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("Unknown linguistic variable `{0}`")]
    UnknownVariable(String),

    #[error("Input `{name}` = {value} outside universe [{min}, {max}]")]
    OutOfUniverse {
        name: String,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Input `{0}` was not set before inference")]
    MissingInput(String),

    #[error("No rule fired for the current inputs")]
    NoRuleFired,

    #[error("Invalid fuzzy system definition: {0}")]
    InvalidDefinition(String),
}

/// Opaque fuzzy inference capability.
///
/// Controllers only set named crisp inputs and ask for one crisp output. How
/// the engine fuzzifies, evaluates rules and defuzzifies is its own business,
/// but evaluation must be deterministic for fixed inputs and rule base.
pub trait InferenceEngine {
    fn set_input(&mut self, name: &str, value: f64) -> Result<(), EngineError>;

    fn infer(&mut self) -> Result<f64, EngineError>;

    /// Universe of discourse of an input variable, used to clamp inputs
    /// before they reach the engine.
    fn input_universe(&self, name: &str) -> Option<(f64, f64)>;
}

/// How a controller treats inputs outside an engine's universe of discourse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputPolicy {
    /// Pass the value through and let the engine fail.
    #[default]
    Reject,
    /// Clamp to the universe bounds first.
    Clamp,
}

/// Set `name` on `engine`, applying `policy` first.
pub fn feed<E: InferenceEngine + ?Sized>(
    engine: &mut E,
    name: &str,
    value: f64,
    policy: InputPolicy,
) -> Result<(), EngineError> {
    let value = match (policy, engine.input_universe(name)) {
        (InputPolicy::Clamp, Some((min, max))) if value < min || value > max => {
            warn!(input = name, value, min, max, "fuzzy input clamped to universe");
            value.clamp(min, max)
        }
        _ => value,
    };
    engine.set_input(name, value)
}
