pub mod integrator;
pub mod record;
pub mod reference;
pub mod runner;
pub mod summary;

pub use integrator::rk4_step;
pub use record::{SimulationRecord, StepRecord};
pub use reference::{ReferenceMode, Scenario};
pub use runner::{simulate, simulate_cancellable};
pub use summary::ResponseSummary;
