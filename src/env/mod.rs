//! Sequential placement as an episodic decision process.
//!
//! [`PlacementEnv`] places one component per step at a position chosen
//! by a [`Policy`]. The observation is the flattened occupancy grid
//! followed by features of the next component and the placed ratio; the
//! reward favours short wiring and penalizes invalid actions. Training a
//! policy is left to the caller.

mod config;
mod grid;
mod placement_env;
mod policy;

pub use config::EnvConfig;
pub use grid::{CellRange, OccupancyGrid};
pub use placement_env::{
    Action, Observation, PlacementEnv, StepInfo, StepOutcome, COMPONENT_FEATURES,
};
pub use policy::{run_episode, EpisodeResult, Policy, RandomPolicy};
