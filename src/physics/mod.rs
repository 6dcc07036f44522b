pub mod angle;
pub mod thrust;

pub use angle::normalize_angle;
pub use thrust::{linear_thrust, thrust_torque};
