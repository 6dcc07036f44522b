use nalgebra::Vector2;

use crate::dynamics::{derivatives, PendulumParams};

// ---------------------------------------------------------------------------
// RK4 reference integrator with constant command over the step
// ---------------------------------------------------------------------------

/// Single RK4 step of `x = [q, q̇]` with constant command `u` over the step.
///
/// The closed loop runs on [`crate::dynamics::Pendulum::step`]; this is the
/// higher-order reference used to check it. The angle is not wrapped.
pub fn rk4_step(params: &PendulumParams, x: &Vector2<f64>, u: f64, dt: f64) -> Vector2<f64> {
    let k1 = derivatives(params, x, u);
    let k2 = derivatives(params, &(x + k1 * (dt * 0.5)), u);
    let k3 = derivatives(params, &(x + k2 * (dt * 0.5)), u);
    let k4 = derivatives(params, &(x + k3 * dt), u);

    x + (k1 + 2.0 * k2 + 2.0 * k3 + k4) * (dt / 6.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamics::Pendulum;

    #[test]
    fn rk4_keeps_rest_at_rest() {
        let p = PendulumParams::default();
        let x = rk4_step(&p, &Vector2::zeros(), 0.0, p.dt);
        assert_eq!(x, Vector2::zeros());
    }

    #[test]
    fn rk4_energy_nearly_conserved_without_damping() {
        let p = PendulumParams { damping: 0.0, ..PendulumParams::default() };
        let energy = |x: &Vector2<f64>| {
            0.5 * p.inertia() * x[1] * x[1] + p.mass * p.gravity * p.radius * (1.0 - x[0].cos())
        };

        let mut x = Vector2::new(0.5, 0.0);
        let e0 = energy(&x);
        for _ in 0..1000 {
            x = rk4_step(&p, &x, 0.0, p.dt);
        }
        let drift = (energy(&x) - e0).abs() / e0;
        assert!(drift < 1e-6, "relative energy drift {drift}");
    }

    #[test]
    fn pendulum_step_follows_rk4_reference() {
        let p = PendulumParams { dt: 0.001, ..PendulumParams::default() };
        let mut pendulum = Pendulum::with_initial(p, 0.3, 0.0).unwrap();
        let mut x = Vector2::new(0.3, 0.0);

        // One second of free swing
        for _ in 0..1000 {
            pendulum.step(0.0).unwrap();
            x = rk4_step(&p, &x, 0.0, p.dt);
        }

        let state = pendulum.state();
        assert!((state.angle - x[0]).abs() < 5e-3, "angle {} vs {}", state.angle, x[0]);
        assert!((state.velocity - x[1]).abs() < 5e-2, "velocity {} vs {}", state.velocity, x[1]);
    }
}
