//! Rewards and discretization of the placement decision process.

use crate::error::{PlaceError, PlaceResult};

/// Configuration of a [`PlacementEnv`](super::PlacementEnv).
///
/// # Examples
///
/// ```
/// use pcb_placer::env::EnvConfig;
///
/// let config = EnvConfig::default()
///     .with_cells_per_mm(2.0)
///     .with_max_fallback_attempts(20)
///     .with_seed(3);
/// assert!(config.validate().is_ok());
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct EnvConfig {
    /// Occupancy grid resolution in cells per millimetre.
    pub cells_per_mm: f64,

    /// Random positions tried after an invalid action before the episode
    /// is force-terminated.
    pub max_fallback_attempts: usize,

    /// Reward of a step whose action was invalid but whose component was
    /// placed by the fallback.
    pub invalid_action_penalty: f64,

    /// Reward of a step that force-terminates the episode.
    pub forced_termination_penalty: f64,

    /// Divisor applied to the wire length in the step reward.
    pub reward_scale: f64,

    /// Added to the reward of every valid placement.
    pub placement_bonus: f64,

    /// Added when the last component is placed by a valid action.
    pub completion_bonus: f64,

    /// Seed for the fallback position generator.
    pub seed: Option<u64>,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            cells_per_mm: 1.0,
            max_fallback_attempts: 50,
            invalid_action_penalty: -100.0,
            forced_termination_penalty: -1000.0,
            reward_scale: 100.0,
            placement_bonus: 10.0,
            completion_bonus: 50.0,
            seed: None,
        }
    }
}

impl EnvConfig {
    pub fn with_cells_per_mm(mut self, cells: f64) -> Self {
        self.cells_per_mm = cells;
        self
    }

    pub fn with_max_fallback_attempts(mut self, n: usize) -> Self {
        self.max_fallback_attempts = n;
        self
    }

    pub fn with_invalid_action_penalty(mut self, reward: f64) -> Self {
        self.invalid_action_penalty = reward;
        self
    }

    pub fn with_forced_termination_penalty(mut self, reward: f64) -> Self {
        self.forced_termination_penalty = reward;
        self
    }

    pub fn with_reward_scale(mut self, scale: f64) -> Self {
        self.reward_scale = scale;
        self
    }

    pub fn with_placement_bonus(mut self, bonus: f64) -> Self {
        self.placement_bonus = bonus;
        self
    }

    pub fn with_completion_bonus(mut self, bonus: f64) -> Self {
        self.completion_bonus = bonus;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> PlaceResult<()> {
        if !(self.cells_per_mm.is_finite() && self.cells_per_mm > 0.0) {
            return Err(PlaceError::InvalidConfig(format!(
                "cells_per_mm must be positive, got {}",
                self.cells_per_mm
            )));
        }
        if !(self.reward_scale.is_finite() && self.reward_scale > 0.0) {
            return Err(PlaceError::InvalidConfig(format!(
                "reward_scale must be positive, got {}",
                self.reward_scale
            )));
        }
        let rewards = [
            ("invalid_action_penalty", self.invalid_action_penalty),
            ("forced_termination_penalty", self.forced_termination_penalty),
            ("placement_bonus", self.placement_bonus),
            ("completion_bonus", self.completion_bonus),
        ];
        for (name, value) in rewards {
            if !value.is_finite() {
                return Err(PlaceError::InvalidConfig(format!("{name} must be finite")));
            }
        }
        Ok(())
    }
}
