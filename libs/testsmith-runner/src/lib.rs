pub mod executor;
pub mod report;
pub mod simulation;

pub use executor::{Executor, RunRequest};
pub use report::build_report;
pub use simulation::{Simulation, SimulationOutcome, SimulationStats};
