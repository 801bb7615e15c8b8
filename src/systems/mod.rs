//! Application systems
//!
//! Frame-level systems kept out of main.rs so they can be tested.

mod simulation;

pub use simulation::{Clock, ManualClock, SimulationResult, SimulationSystem, SystemClock};
