use tracing::debug;

use super::state::{angular_acceleration, PendulumParams, PendulumState};
use crate::error::{require_finite, SimError, SimResult};
use crate::physics::normalize_angle;

// ---------------------------------------------------------------------------
// Fixed-step aeropendulum model
// ---------------------------------------------------------------------------

/// The aeropendulum plant.
///
/// Each step runs in a fixed order:
///   1. acceleration, explicitly from the ODE at the current angle and rate
///   2. velocity, one Euler update with that acceleration
///   3. angle, trapezoidal rule over the previous and new velocity, then wrapped
///   4. time += dt
#[derive(Debug, Clone)]
pub struct Pendulum {
    params: PendulumParams,
    state: PendulumState,
    prev_velocity: f64,
}

impl Pendulum {
    /// Pendulum hanging at rest at the bottom (angle 0, velocity 0).
    pub fn new(params: PendulumParams) -> SimResult<Self> {
        Self::with_initial(params, 0.0, 0.0)
    }

    pub fn with_initial(params: PendulumParams, angle: f64, velocity: f64) -> SimResult<Self> {
        params.validate()?;
        require_finite("initial_velocity", velocity)?;
        let angle = normalize_angle(angle)
            .ok_or_else(|| SimError::invalid("initial_angle", format!("must be finite, got {angle}")))?;

        debug!(?params, angle, velocity, "pendulum created");

        Ok(Self {
            params,
            state: PendulumState { time: 0.0, angle, velocity, acceleration: 0.0 },
            // Duplicated so the trapezoid is defined on the first step.
            prev_velocity: velocity,
        })
    }

    pub fn params(&self) -> &PendulumParams {
        &self.params
    }

    pub fn state(&self) -> &PendulumState {
        &self.state
    }

    pub fn angle(&self) -> f64 {
        self.state.angle
    }

    pub fn time(&self) -> f64 {
        self.state.time
    }

    /// Advance one step with command `u` held constant over the step.
    ///
    /// `u` must be finite. A non-finite result is reported as
    /// [`SimError::NonFiniteState`] and the state is left unchanged.
    pub fn step(&mut self, u: f64) -> SimResult<PendulumState> {
        let dt = self.params.dt;
        let s = self.state;
        let time = s.time + dt;

        let acceleration = angular_acceleration(&self.params, s.angle, s.velocity, u);
        if !acceleration.is_finite() {
            return Err(SimError::NonFiniteState { quantity: "acceleration", value: acceleration, time });
        }

        let velocity = s.velocity + dt * acceleration;
        if !velocity.is_finite() {
            return Err(SimError::NonFiniteState { quantity: "velocity", value: velocity, time });
        }

        let raw_angle = s.angle + dt * (velocity + s.velocity) / 2.0;
        let angle = normalize_angle(raw_angle).ok_or(SimError::NonFiniteState {
            quantity: "angle",
            value: raw_angle,
            time,
        })?;

        self.prev_velocity = s.velocity;
        self.state = PendulumState { time, angle, velocity, acceleration };
        Ok(self.state)
    }

    /// Velocity sample preceding the current one.
    pub fn previous_velocity(&self) -> f64 {
        self.prev_velocity
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn rest_at_bottom_stays_at_rest() {
        let mut p = Pendulum::new(PendulumParams::default()).unwrap();
        for _ in 0..1_000 {
            let s = p.step(0.0).unwrap();
            assert_eq!(s.angle, 0.0);
            assert_eq!(s.velocity, 0.0);
            assert_eq!(s.acceleration, 0.0);
        }
        assert!((p.time() - 10.0).abs() < 1e-9, "time should advance by dt per step");
    }

    #[test]
    fn first_step_matches_hand_computation() {
        let params = PendulumParams::default();
        let mut p = Pendulum::new(params).unwrap();
        let s = p.step(1.0).unwrap();

        // eps = (k*u*r) / (m r^2) = 5 / 0.5 = 10
        assert!((s.acceleration - 10.0).abs() < 1e-12);
        // omega = 0 + 0.01 * 10
        assert!((s.velocity - 0.1).abs() < 1e-12);
        // alpha = 0 + 0.01 * (0.1 + 0.0) / 2
        assert!((s.angle - 0.0005).abs() < 1e-12);
        assert!((s.time - 0.01).abs() < 1e-15);
        assert_eq!(p.previous_velocity(), 0.0);
    }

    #[test]
    fn trapezoid_uses_previous_velocity() {
        let mut p = Pendulum::with_initial(PendulumParams::default(), 0.0, 1.0).unwrap();
        let s = p.step(0.0).unwrap();
        // With initial velocity duplicated, the first increment is dt*(v_new + v0)/2.
        let expected = 0.01 * (s.velocity + 1.0) / 2.0;
        assert!((s.angle - expected).abs() < 1e-12);
    }

    #[test]
    fn angle_stays_wrapped_while_spinning() {
        let mut p = Pendulum::with_initial(PendulumParams::default(), 0.0, 0.0).unwrap();
        for _ in 0..5_000 {
            let s = p.step(10.0).unwrap();
            assert!((-PI..PI).contains(&s.angle), "angle {} escaped [-pi, pi)", s.angle);
        }
    }

    #[test]
    fn initial_angle_is_normalized() {
        let p = Pendulum::with_initial(PendulumParams::default(), 3.0 * PI / 2.0, 0.0).unwrap();
        assert!((p.angle() + PI / 2.0).abs() < 1e-12);
    }

    #[test]
    fn non_finite_command_aborts() {
        let mut p = Pendulum::new(PendulumParams::default()).unwrap();
        let err = p.step(f64::NAN).unwrap_err();
        assert!(matches!(err, SimError::NonFiniteState { quantity: "acceleration", .. }));
        assert_eq!(p.time(), 0.0, "state must not advance on failure");
    }

    #[test]
    fn rejects_invalid_params() {
        let params = PendulumParams { radius: -1.0, ..PendulumParams::default() };
        assert!(matches!(Pendulum::new(params), Err(SimError::InvalidParameter { name: "radius", .. })));
    }
}
