pub mod pendulum;
pub mod state;

pub use pendulum::Pendulum;
pub use state::{angular_acceleration, derivatives, PendulumParams, PendulumState, GRAVITY};
