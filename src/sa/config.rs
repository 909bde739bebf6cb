//! SA configuration and cooling schedules.

use crate::cost::CostWeights;
use crate::error::{PlaceError, PlaceResult};
use crate::thermal::ThermalConfig;

/// Lower bound for any temperature used in the Metropolis exponent.
pub const MIN_TEMPERATURE: f64 = 1e-9;

/// Cooling schedule for temperature reduction.
///
/// A schedule is a pure function of the initial temperature, the
/// iteration index `k` and the total iteration budget `n`. Index 0
/// always yields the initial temperature.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CoolingSchedule {
    /// `T_k = T_0 * alpha^k`. Typical `alpha`: 0.95–0.99.
    Exponential {
        /// Cooling factor in (0, 1). Higher = slower cooling.
        alpha: f64,
    },

    /// `T_k = T_0 * (1 - k / n)`, reaching zero at the end of the budget.
    Linear,

    /// `T_k = T_0 / (1 + alpha * ln(1 + k))`.
    ///
    /// Cools quickly at first and very slowly afterwards.
    Logarithmic {
        /// Cooling parameter, must be positive.
        alpha: f64,
    },
}

impl Default for CoolingSchedule {
    fn default() -> Self {
        CoolingSchedule::Exponential { alpha: 0.95 }
    }
}

impl CoolingSchedule {
    /// Temperature at iteration `k` of `total` for a run starting at
    /// `initial`.
    pub fn temperature(&self, initial: f64, k: usize, total: usize) -> f64 {
        match *self {
            CoolingSchedule::Exponential { alpha } => initial * alpha.powf(k as f64),
            CoolingSchedule::Linear => {
                if total == 0 {
                    0.0
                } else {
                    let progress = (k as f64 / total as f64).min(1.0);
                    initial * (1.0 - progress)
                }
            }
            CoolingSchedule::Logarithmic { alpha } => {
                initial / (1.0 + alpha * (1.0 + k as f64).ln())
            }
        }
    }

    pub fn validate(&self) -> PlaceResult<()> {
        match *self {
            CoolingSchedule::Exponential { alpha } => {
                if !(alpha > 0.0 && alpha < 1.0) {
                    return Err(PlaceError::InvalidConfig(format!(
                        "exponential alpha must be in (0, 1), got {alpha}"
                    )));
                }
            }
            CoolingSchedule::Logarithmic { alpha } => {
                if !(alpha.is_finite() && alpha > 0.0) {
                    return Err(PlaceError::InvalidConfig(format!(
                        "logarithmic alpha must be positive, got {alpha}"
                    )));
                }
            }
            CoolingSchedule::Linear => {}
        }
        Ok(())
    }
}

/// Configuration for the Simulated Annealing loop.
///
/// # Examples
///
/// ```
/// use pcb_placer::sa::{CoolingSchedule, SaConfig};
///
/// let config = SaConfig::default()
///     .with_initial_temperature(50.0)
///     .with_final_temperature(0.01)
///     .with_cooling(CoolingSchedule::Logarithmic { alpha: 0.9 })
///     .with_max_iterations(2000)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct SaConfig {
    /// Initial temperature. Values `<= 0` are clamped to
    /// [`MIN_TEMPERATURE`].
    pub initial_temperature: f64,

    /// The run stops once the temperature drops below this value.
    pub final_temperature: f64,

    /// Cooling schedule, applied once per iteration.
    pub cooling: CoolingSchedule,

    /// Iteration budget.
    pub max_iterations: usize,

    /// Iterations without a new best before an adaptive restart.
    /// 0 disables restarts.
    pub stagnation_limit: usize,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,
}

impl Default for SaConfig {
    fn default() -> Self {
        Self {
            initial_temperature: 100.0,
            final_temperature: 0.1,
            cooling: CoolingSchedule::default(),
            max_iterations: 1000,
            stagnation_limit: 100,
            seed: None,
        }
    }
}

impl SaConfig {
    pub fn with_initial_temperature(mut self, t: f64) -> Self {
        self.initial_temperature = t;
        self
    }

    pub fn with_final_temperature(mut self, t: f64) -> Self {
        self.final_temperature = t;
        self
    }

    pub fn with_cooling(mut self, cooling: CoolingSchedule) -> Self {
        self.cooling = cooling;
        self
    }

    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn with_stagnation_limit(mut self, n: usize) -> Self {
        self.stagnation_limit = n;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// The initial temperature actually used by the runner.
    pub fn effective_initial_temperature(&self) -> f64 {
        self.initial_temperature.max(MIN_TEMPERATURE)
    }

    /// Validates the configuration.
    ///
    /// A non-positive initial temperature is not an error; it is clamped
    /// by [`effective_initial_temperature`](Self::effective_initial_temperature).
    pub fn validate(&self) -> PlaceResult<()> {
        if self.initial_temperature.is_nan() || self.initial_temperature.is_infinite() {
            return Err(PlaceError::InvalidConfig(
                "initial_temperature must be finite".into(),
            ));
        }
        if !(self.final_temperature.is_finite() && self.final_temperature >= 0.0) {
            return Err(PlaceError::InvalidConfig(format!(
                "final_temperature must be >= 0, got {}",
                self.final_temperature
            )));
        }
        if self.max_iterations == 0 {
            return Err(PlaceError::InvalidConfig(
                "max_iterations must be positive".into(),
            ));
        }
        self.cooling.validate()
    }
}

/// Relative selection weights of the neighbourhood operators.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NeighborWeights {
    pub shift: f64,
    pub swap: f64,
    pub rotate: f64,
}

impl Default for NeighborWeights {
    fn default() -> Self {
        Self {
            shift: 0.7,
            swap: 0.2,
            rotate: 0.1,
        }
    }
}

impl NeighborWeights {
    pub fn new(shift: f64, swap: f64, rotate: f64) -> Self {
        Self {
            shift,
            swap,
            rotate,
        }
    }

    pub fn total(&self) -> f64 {
        self.shift + self.swap + self.rotate
    }

    pub fn validate(&self) -> PlaceResult<()> {
        let all = [self.shift, self.swap, self.rotate];
        if all.iter().any(|w| !(w.is_finite() && *w >= 0.0)) || self.total() <= 0.0 {
            return Err(PlaceError::InvalidConfig(format!(
                "neighbor weights must be >= 0 with a positive sum, got {self:?}"
            )));
        }
        Ok(())
    }
}

/// Full configuration of the annealing placer.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct PlacerConfig {
    pub sa: SaConfig,
    pub weights: CostWeights,
    pub thermal: ThermalConfig,
    pub neighbors: NeighborWeights,
    /// Random positions tried per component when building a layout.
    pub max_placement_attempts: usize,
}

impl Default for PlacerConfig {
    fn default() -> Self {
        Self {
            sa: SaConfig::default(),
            weights: CostWeights::default(),
            thermal: ThermalConfig::default(),
            neighbors: NeighborWeights::default(),
            max_placement_attempts: 100,
        }
    }
}

impl PlacerConfig {
    pub fn with_sa(mut self, sa: SaConfig) -> Self {
        self.sa = sa;
        self
    }

    pub fn with_weights(mut self, weights: CostWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_thermal(mut self, thermal: ThermalConfig) -> Self {
        self.thermal = thermal;
        self
    }

    pub fn with_neighbors(mut self, neighbors: NeighborWeights) -> Self {
        self.neighbors = neighbors;
        self
    }

    pub fn with_max_placement_attempts(mut self, n: usize) -> Self {
        self.max_placement_attempts = n;
        self
    }

    pub fn validate(&self) -> PlaceResult<()> {
        self.sa.validate()?;
        self.weights.validate()?;
        self.thermal.validate()?;
        self.neighbors.validate()
    }
}
