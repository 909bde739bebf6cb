//! Core trait for Simulated Annealing.

use crate::error::PlaceResult;
use rand::Rng;

/// Defines a Simulated Annealing problem.
///
/// The user implements initial solution generation, cost evaluation and
/// neighbour generation. The runner handles temperature management,
/// the acceptance criterion, adaptive restarts and cooling.
///
/// # Minimization
///
/// SA minimizes the cost function. For maximization, negate the cost.
///
/// # Examples
///
/// ```ignore
/// struct Quadratic;
///
/// impl SaProblem for Quadratic {
///     type Solution = f64;
///
///     fn initial_solution<R: Rng>(&self, rng: &mut R) -> PlaceResult<f64> {
///         Ok(rng.random_range(-10.0..10.0))
///     }
///
///     fn cost(&self, x: &f64) -> f64 {
///         x * x
///     }
///
///     fn neighbor<R: Rng>(&self, x: &f64, temperature: f64, rng: &mut R) -> f64 {
///         let step = temperature.min(1.0);
///         x + rng.random_range(-step..=step)
///     }
/// }
/// ```
pub trait SaProblem: Send + Sync {
    /// The solution representation type.
    type Solution: Clone + Send;

    /// Creates a random initial solution. Also used for adaptive
    /// restarts.
    fn initial_solution<R: Rng>(&self, rng: &mut R) -> PlaceResult<Self::Solution>;

    /// Computes the cost of a solution. Lower is better.
    fn cost(&self, solution: &Self::Solution) -> f64;

    /// Generates a candidate close to `solution`. The perturbation size
    /// may depend on the current temperature.
    fn neighbor<R: Rng>(
        &self,
        solution: &Self::Solution,
        temperature: f64,
        rng: &mut R,
    ) -> Self::Solution;

    /// Whether a candidate may be committed. Infeasible candidates are
    /// rejected without being costed.
    fn is_feasible(&self, _solution: &Self::Solution) -> bool {
        true
    }
}
