//! Simulated Annealing (SA).
//!
//! A single-solution trajectory metaheuristic inspired by the physical
//! annealing process. Accepts worsening moves with a probability that
//! decreases over time (temperature), allowing the search to escape
//! local optima.
//!
//! [`SaRunner`] drives any [`SaProblem`]; [`PlacementProblem`] and the
//! [`SaPlacer`] wrapper apply it to component placement with shift, swap
//! and rotate moves, adaptive restarts on stagnation and optional
//! multi-start search.
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"
//! - Cerny (1985), "Thermodynamical Approach to the Travelling Salesman Problem"
//! - Lundy & Mees (1986), "Convergence of an Annealing Algorithm"

mod config;
mod placement;
mod runner;
mod types;

pub use config::{CoolingSchedule, NeighborWeights, PlacerConfig, SaConfig, MIN_TEMPERATURE};
pub use placement::{random_layout, PlacementOutcome, PlacementProblem, SaPlacer};
pub use runner::{SaResult, SaRunner};
pub use types::SaProblem;
