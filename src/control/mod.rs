pub mod controller;
pub mod fuzzy;
pub mod fuzzy_pd;
pub mod fuzzy_pid;
pub mod history;
pub mod limiter;
pub mod pid;

pub use controller::Controller;
pub use fuzzy_pd::FuzzyPd;
pub use fuzzy_pid::FuzzyPid;
pub use history::{ControllerState, ErrorSample, ZeroDtPolicy};
pub use limiter::{rate_limit, saturate, ActuatorLimits};
pub use pid::{Pid, PidGains};
