pub mod config;
pub mod control;
pub mod dynamics;
pub mod error;
pub mod io;
pub mod physics;
pub mod sim;

pub use config::{ControllerConfig, SimulationConfig};
pub use control::{Controller, FuzzyPd, FuzzyPid, Pid};
pub use dynamics::{Pendulum, PendulumParams, PendulumState};
pub use error::{SimError, SimResult};
pub use sim::{simulate, simulate_cancellable, Scenario, SimulationRecord};
