//! SA execution loop.

use super::config::{SaConfig, MIN_TEMPERATURE};
use super::types::SaProblem;
use crate::error::{PlaceError, PlaceResult};
use crate::random::{create_rng, rng_from_seed};
use log::{debug, info, trace, warn};
use rand::Rng;

/// Result of a Simulated Annealing run.
#[derive(Debug, Clone)]
pub struct SaResult<S: Clone> {
    /// The best solution found.
    pub best: S,

    /// Cost of the best solution.
    pub best_cost: f64,

    /// Cost of the initial solution.
    pub initial_cost: f64,

    /// Number of iterations executed.
    pub iterations: usize,

    /// Temperature when the run stopped.
    pub final_temperature: f64,

    /// Number of accepted moves (including improvements).
    pub accepted_moves: usize,

    /// Number of rejected moves, infeasible candidates included.
    pub rejected_moves: usize,

    /// Number of moves that produced a new best.
    pub improving_moves: usize,

    /// Number of adaptive restarts performed.
    pub restarts: usize,

    /// Cost of the current state: the initial cost, then one entry per
    /// iteration.
    pub cost_history: Vec<f64>,

    /// Best cost so far, aligned with `cost_history`.
    pub best_cost_history: Vec<f64>,

    /// Temperature, aligned with `cost_history`.
    pub temperature_history: Vec<f64>,
}

impl<S: Clone> SaResult<S> {
    /// Fraction of iterations whose candidate was accepted.
    pub fn acceptance_rate(&self) -> f64 {
        let total = self.accepted_moves + self.rejected_moves;
        if total == 0 {
            0.0
        } else {
            self.accepted_moves as f64 / total as f64
        }
    }
}

/// Executes the Simulated Annealing algorithm.
pub struct SaRunner;

impl SaRunner {
    /// Runs SA with a generator seeded from `config.seed`.
    pub fn run<P: SaProblem>(problem: &P, config: &SaConfig) -> PlaceResult<SaResult<P::Solution>> {
        let mut rng = rng_from_seed(config.seed);
        Self::run_with_rng(problem, config, &mut rng)
    }

    /// Runs SA drawing every random decision from `rng`.
    ///
    /// # Errors
    ///
    /// Fails if the configuration is invalid or the problem cannot
    /// produce an initial solution.
    pub fn run_with_rng<P: SaProblem, R: Rng>(
        problem: &P,
        config: &SaConfig,
        rng: &mut R,
    ) -> PlaceResult<SaResult<P::Solution>> {
        config.validate()?;

        let initial_temperature = config.effective_initial_temperature();
        if initial_temperature != config.initial_temperature {
            warn!(
                "initial temperature {} clamped to {}",
                config.initial_temperature, initial_temperature
            );
        }

        let mut current = problem.initial_solution(rng)?;
        let mut current_cost = problem.cost(&current);
        let mut best = current.clone();
        let mut best_cost = current_cost;
        let initial_cost = current_cost;

        let mut temperature = initial_temperature;
        let mut accepted_moves = 0usize;
        let mut rejected_moves = 0usize;
        let mut improving_moves = 0usize;
        let mut restarts = 0usize;
        let mut stagnation = 0usize;
        // Iteration at which the cooling schedule was last (re)started.
        let mut schedule_origin = 0usize;

        let capacity = config.max_iterations + 1;
        let mut cost_history = Vec::with_capacity(capacity);
        let mut best_cost_history = Vec::with_capacity(capacity);
        let mut temperature_history = Vec::with_capacity(capacity);
        cost_history.push(current_cost);
        best_cost_history.push(best_cost);
        temperature_history.push(temperature);

        debug!(
            "sa start: cost {current_cost:.4}, T0 {initial_temperature}, {:?}, budget {}",
            config.cooling, config.max_iterations
        );

        let mut iterations = 0usize;
        for iteration in 0..config.max_iterations {
            iterations = iteration + 1;

            let candidate = problem.neighbor(&current, temperature, rng);

            // Metropolis acceptance criterion
            let accepted = if problem.is_feasible(&candidate) {
                let candidate_cost = problem.cost(&candidate);
                let delta = candidate_cost - current_cost;
                let accept = delta < 0.0 || {
                    let probability = (-delta / temperature.max(MIN_TEMPERATURE)).exp();
                    rng.random::<f64>() < probability
                };
                if accept {
                    current = candidate;
                    current_cost = candidate_cost;
                }
                accept
            } else {
                false
            };

            if accepted {
                accepted_moves += 1;
                if current_cost < best_cost {
                    best = current.clone();
                    best_cost = current_cost;
                    improving_moves += 1;
                    stagnation = 0;
                    trace!("iteration {iteration}: new best {best_cost:.4}");
                } else {
                    stagnation += 1;
                }
            } else {
                rejected_moves += 1;
                stagnation += 1;
            }

            if config.stagnation_limit > 0 && stagnation > config.stagnation_limit {
                match problem.initial_solution(rng) {
                    Ok(fresh) => {
                        current_cost = problem.cost(&fresh);
                        current = fresh;
                        restarts += 1;
                        debug!("iteration {iteration}: adaptive restart, cost {current_cost:.4}");
                    }
                    Err(err) => {
                        warn!("iteration {iteration}: adaptive restart skipped: {err}");
                    }
                }
                temperature = initial_temperature;
                schedule_origin = iteration + 1;
                stagnation = 0;
            }

            temperature = config.cooling.temperature(
                initial_temperature,
                iteration + 1 - schedule_origin,
                config.max_iterations,
            );

            cost_history.push(current_cost);
            best_cost_history.push(best_cost);
            temperature_history.push(temperature);

            if temperature < config.final_temperature {
                debug!(
                    "iteration {iteration}: temperature {temperature} below final {}",
                    config.final_temperature
                );
                break;
            }
        }

        info!(
            "sa done: {iterations} iterations, best {best_cost:.4} (initial {initial_cost:.4}), \
             {accepted_moves} accepted, {rejected_moves} rejected, {restarts} restarts"
        );

        Ok(SaResult {
            best,
            best_cost,
            initial_cost,
            iterations,
            final_temperature: temperature,
            accepted_moves,
            rejected_moves,
            improving_moves,
            restarts,
            cost_history,
            best_cost_history,
            temperature_history,
        })
    }

    /// Runs `starts` independent searches and returns the best result.
    ///
    /// Start `i` uses seed `base + i`, where `base` is `config.seed` or a
    /// fresh random seed. Each start owns its generator, so with the
    /// `parallel` feature the starts run on the rayon pool with results
    /// identical to a sequential run.
    pub fn run_multi_start<P: SaProblem>(
        problem: &P,
        config: &SaConfig,
        starts: usize,
    ) -> PlaceResult<SaResult<P::Solution>> {
        if starts == 0 {
            return Err(PlaceError::InvalidConfig(
                "multi-start needs at least one start".into(),
            ));
        }
        config.validate()?;
        let base = config.seed.unwrap_or_else(rand::random);

        let run_one = |i: usize| {
            let mut rng = create_rng(base.wrapping_add(i as u64));
            Self::run_with_rng(problem, config, &mut rng)
        };

        #[cfg(feature = "parallel")]
        let runs: Vec<PlaceResult<SaResult<P::Solution>>> = {
            use rayon::prelude::*;
            (0..starts).into_par_iter().map(run_one).collect()
        };
        #[cfg(not(feature = "parallel"))]
        let runs: Vec<PlaceResult<SaResult<P::Solution>>> = (0..starts).map(run_one).collect();

        let mut best: Option<SaResult<P::Solution>> = None;
        for run in runs {
            let run = run?;
            let better = match &best {
                Some(b) => run.best_cost < b.best_cost,
                None => true,
            };
            if better {
                best = Some(run);
            }
        }
        best.ok_or_else(|| PlaceError::InvalidConfig("multi-start produced no result".into()))
    }
}
