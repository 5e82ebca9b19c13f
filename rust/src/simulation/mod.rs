//! Simulation driver for the allocator.
//!
//! Generates random single-unit requests on behalf of every unfinished process,
//! round after round, until all of them have completed.

mod core;
mod events;
mod rng;

pub use self::core::{Simulation, SimulationError};
pub use events::{SimulationEvent, SimulationReport};
pub use rng::XorShift64;
