//! World simulation engine.
//!
//! This crate implements the bounded 2D field where foxes and rabbits live,
//! breed and die, and the driver that advances them one step at a time.

pub mod field;
pub mod organism;
pub mod simulation;
pub mod species;

pub use field::Field;
pub use organism::{Lifecycle, Organism};
pub use simulation::{Habitat, Population, SimulationReport, Simulator};
pub use species::{Fox, Rabbit};
