use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::error::{require_non_negative, require_positive, SimResult};
use crate::physics::thrust_torque;

// ---------------------------------------------------------------------------
// Physical constants
// ---------------------------------------------------------------------------

pub const GRAVITY: f64 = 9.81; // m/s^2, as used by the bench rig

// ---------------------------------------------------------------------------
// Pendulum parameters (fixed for one run)
// ---------------------------------------------------------------------------

/// Physical and discretization parameters of the aeropendulum.
///
/// Model: `m·r²·q̈ = r·Ft(u) − m·g·r·sin(q) − c·q̇` with `Ft(u) = k·u`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PendulumParams {
    pub mass: f64,        // kg, point mass at the end of a weightless arm
    pub radius: f64,      // m, pivot to center of mass
    pub gravity: f64,     // m/s^2
    pub damping: f64,     // kg·m^2/s, torque coefficient c
    pub thrust_gain: f64, // N/V, k in Ft(u) = k·u
    pub dt: f64,          // s, fixed simulation step
}

impl Default for PendulumParams {
    fn default() -> Self {
        Self {
            mass: 0.5,
            radius: 1.0,
            gravity: GRAVITY,
            damping: 0.1,
            thrust_gain: 5.0,
            dt: 0.01, // 100 Hz
        }
    }
}

impl PendulumParams {
    pub fn validate(&self) -> SimResult<()> {
        require_positive("mass", self.mass)?;
        require_positive("radius", self.radius)?;
        require_positive("gravity", self.gravity)?;
        require_non_negative("damping", self.damping)?;
        require_positive("thrust_gain", self.thrust_gain)?;
        require_positive("dt", self.dt)?;
        Ok(())
    }

    /// Moment of inertia about the pivot, `m·r²`.
    pub fn inertia(&self) -> f64 {
        self.mass * self.radius * self.radius
    }

    /// Command that holds the pendulum still at `angle` (gravity torque
    /// balanced by thrust torque).
    pub fn holding_command(&self, angle: f64) -> f64 {
        self.mass * self.gravity * angle.sin() / self.thrust_gain
    }
}

// ---------------------------------------------------------------------------
// Pendulum state snapshot
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PendulumState {
    pub time: f64,         // s
    pub angle: f64,        // rad, [-π, π)
    pub velocity: f64,     // rad/s
    pub acceleration: f64, // rad/s^2
}

impl PendulumState {
    /// `[q, q̇]` as a state vector.
    pub fn vector(&self) -> Vector2<f64> {
        Vector2::new(self.angle, self.velocity)
    }

    pub fn is_finite(&self) -> bool {
        self.time.is_finite()
            && self.angle.is_finite()
            && self.velocity.is_finite()
            && self.acceleration.is_finite()
    }
}

// ---------------------------------------------------------------------------
// Equations of motion
// ---------------------------------------------------------------------------

/// Angular acceleration from the rearranged ODE at angle `q`, rate `w`.
pub fn angular_acceleration(params: &PendulumParams, q: f64, w: f64, u: f64) -> f64 {
    let torque = thrust_torque(params.thrust_gain, params.radius, u)
        - params.mass * params.gravity * params.radius * q.sin()
        - params.damping * w;
    torque / params.inertia()
}

/// State derivative `[q̇, q̈]` for state `x = [q, q̇]` under constant command `u`.
pub fn derivatives(params: &PendulumParams, x: &Vector2<f64>, u: f64) -> Vector2<f64> {
    Vector2::new(x[1], angular_acceleration(params, x[0], x[1], u))
}
