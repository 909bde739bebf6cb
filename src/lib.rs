//! PCB component placement.
//!
//! Places rectangular components on a rectangular board so that weighted
//! connection wire length, and optionally peak board temperature, are
//! minimized without overlap:
//!
//! - **Layout model** ([`layout`]): board, components, connections and
//!   the index-based [`Layout`](layout::Layout) of a validated
//!   [`Problem`](layout::Problem).
//! - **Cost** ([`cost`]): wire length plus a peak-temperature penalty.
//! - **Thermal simulation** ([`thermal`]): fixed-iteration grid
//!   relaxation with heat sources, heatsinks and an ambient border.
//! - **Simulated Annealing** ([`sa`]): generic annealing runner with
//!   pluggable cooling schedules, adaptive restarts and multi-start, plus
//!   the placement problem built on it.
//! - **Decision process** ([`env`]): one-component-per-step episodes for
//!   an external policy, with a random baseline policy.
//!
//! Every stochastic routine takes or owns an explicit seeded generator
//! ([`random`]), so runs are reproducible.
//!
//! # Example
//!
//! ```
//! use pcb_placer::cost::CostWeights;
//! use pcb_placer::layout::{Board, Component, Connection, Problem};
//! use pcb_placer::sa::{PlacerConfig, SaConfig, SaPlacer};
//!
//! let problem = Problem::new(
//!     Board::new(50.0, 40.0),
//!     vec![
//!         Component::new("U1", 10.0, 10.0).with_power(2.0),
//!         Component::new("C1", 2.0, 2.0),
//!         Component::new("R1", 3.0, 1.0),
//!     ],
//!     vec![
//!         Connection::new("U1", "C1", 3.0),
//!         Connection::new("U1", "R1", 1.0),
//!     ],
//! )?;
//!
//! let config = PlacerConfig::default()
//!     .with_sa(SaConfig::default().with_max_iterations(500).with_seed(42))
//!     .with_weights(CostWeights::new(1.0, 0.1));
//! let outcome = SaPlacer::new(&problem, config)?.optimize()?;
//! assert_eq!(problem.check_layout(outcome.layout()), Ok(()));
//! # Ok::<(), pcb_placer::PlaceError>(())
//! ```

pub mod cost;
pub mod env;
pub mod error;
pub mod layout;
pub mod random;
pub mod sa;
pub mod thermal;

pub use error::{PlaceError, PlaceResult};
