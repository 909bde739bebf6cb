//! Grid-based thermal simulation.
//!
//! The board is discretized into a uniform grid. Powered components act
//! as heat sources spread over their footprint, heat diffuses through a
//! 4-neighbour Laplacian, heatsinks pull their cells back toward ambient
//! and the outer border is held at ambient (Dirichlet boundary).
//!
//! The result after a fixed number of iterations is the simulator's
//! output; it is reproducible for identical inputs.

mod config;
mod field;
mod simulator;

pub use config::{HeatsinkArea, ThermalConfig};
pub use field::ThermalField;
pub use simulator::ThermalSimulator;
