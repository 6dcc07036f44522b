use crate::error::SimResult;

/// Trait for feedback controllers.
///
/// Implement this to plug a custom controller into the simulation loop.
/// Implementations own all of their state; a fresh instance is built per run.
pub trait Controller {
    /// Compute the actuator command for `reference` given the `measured`
    /// angle at simulation time `time`.
    fn control(&mut self, reference: f64, measured: f64, time: f64) -> SimResult<f64>;

    /// Reset internal state (error history, integral, last output).
    fn reset(&mut self) {}

    /// Human-readable name for logging/display.
    fn name(&self) -> &str {
        "unnamed"
    }
}
