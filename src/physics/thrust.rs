/// Thrust force produced by the fan for a command `u` (volts).
///
/// Linear placeholder `Ft(u) = k·u`; a measured fan curve would replace it.
pub fn linear_thrust(gain: f64, u: f64) -> f64 {
    gain * u
}

/// Torque about the pivot from thrust applied at radius `r`.
pub fn thrust_torque(gain: f64, radius: f64, u: f64) -> f64 {
    radius * linear_thrust(gain, u)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thrust_is_linear() {
        assert_eq!(linear_thrust(5.0, 2.0), 10.0);
        assert_eq!(linear_thrust(5.0, -1.0), -5.0);
    }

    #[test]
    fn torque_scales_with_radius() {
        assert_eq!(thrust_torque(5.0, 0.5, 2.0), 5.0);
    }
}
