use std::f64::consts::{PI, TAU};

/// Above this magnitude the angle is reduced with a single remainder before
/// the ±2π fix-up loop runs.
const BULK_REDUCTION_THRESHOLD: f64 = 4.0 * PI;
const MAX_WRAP_ITERATIONS: usize = 4;

/// Wrap an angle into `[-π, π)`.
///
/// In-range input is returned bit-for-bit unchanged, so the function is
/// idempotent. Returns `None` for NaN/Inf.
pub fn normalize_angle(angle: f64) -> Option<f64> {
    if !angle.is_finite() {
        return None;
    }

    let mut a = angle;
    if a.abs() > BULK_REDUCTION_THRESHOLD {
        a = (a + PI).rem_euclid(TAU) - PI;
    }

    for _ in 0..MAX_WRAP_ITERATIONS {
        if a >= PI {
            a -= TAU;
        } else if a < -PI {
            a += TAU;
        } else {
            return Some(a);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_range_is_untouched() {
        for &x in &[0.0, 1.0, -1.0, -PI, 3.0] {
            assert_eq!(normalize_angle(x), Some(x));
        }
    }

    #[test]
    fn pi_wraps_to_minus_pi() {
        // The upper bound is exclusive.
        assert_eq!(normalize_angle(PI), Some(-PI));
    }

    #[test]
    fn wraps_one_turn() {
        let a = normalize_angle(PI + 0.5).unwrap();
        assert!((a - (-PI + 0.5)).abs() < 1e-12, "got {a}");
        let b = normalize_angle(-PI - 0.5).unwrap();
        assert!((b - (PI - 0.5)).abs() < 1e-12, "got {b}");
    }

    #[test]
    fn huge_angle_terminates() {
        let a = normalize_angle(1.0e12).unwrap();
        assert!((-PI..PI).contains(&a));
    }

    #[test]
    fn non_finite_rejected() {
        assert_eq!(normalize_angle(f64::NAN), None);
        assert_eq!(normalize_angle(f64::INFINITY), None);
        assert_eq!(normalize_angle(f64::NEG_INFINITY), None);
    }
}
