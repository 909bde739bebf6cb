//! Component placement as an annealing problem.

use std::collections::BTreeMap;

use super::config::{NeighborWeights, PlacerConfig};
use super::runner::{SaResult, SaRunner};
use super::types::SaProblem;
use crate::cost::{CostBreakdown, CostEvaluator};
use crate::error::{PlaceError, PlaceResult};
use crate::layout::{Layout, Placement, Point, Problem, Rect};
use crate::random::{distinct_pair, gaussian, uniform_upto};
use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;

/// Upper bound of the shift step's standard deviation, in mm.
const MAX_SHIFT_SIGMA: f64 = 20.0;

/// Builds a layout with every component placed and no overlap.
///
/// Components are placed in index order, each at the first of up to
/// `attempts` uniform random positions that avoids the components
/// already placed. When a component runs out of attempts the layout is
/// rebuilt greedily bottom-left instead.
///
/// # Errors
///
/// [`PlaceError::PlacementInfeasible`] if neither strategy finds a
/// position for some component.
pub fn random_layout<R: Rng>(
    problem: &Problem,
    attempts: usize,
    rng: &mut R,
) -> PlaceResult<Layout> {
    let mut layout = problem.empty_layout();
    for idx in 0..problem.len() {
        if !place_uniform(problem, &mut layout, idx, attempts, rng) {
            debug!(
                "`{}` not placed after {attempts} random attempts, trying bottom-left fill",
                problem.component(idx).id
            );
            return bottom_left_layout(problem, rng).map_err(|failed| {
                PlaceError::PlacementInfeasible {
                    id: problem.component(failed).id.clone(),
                    attempts,
                }
            });
        }
    }
    Ok(layout)
}

fn place_uniform<R: Rng>(
    problem: &Problem,
    layout: &mut Layout,
    idx: usize,
    attempts: usize,
    rng: &mut R,
) -> bool {
    let board = problem.board();
    let component = problem.component(idx);
    for _ in 0..attempts {
        let x = uniform_upto(rng, board.width - component.width);
        let y = uniform_upto(rng, board.height - component.height);
        let rect = Rect::new(x, y, component.width, component.height);
        if problem.fits(layout, idx, &rect) {
            layout.place(idx, Placement::at(x, y));
            return true;
        }
    }
    false
}

/// Greedy bottom-left fill in random component order.
///
/// Candidate origins are the board corner plus the corners adjoining
/// every placed footprint; the lowest, then leftmost, candidate that fits
/// wins. Both orientations are tried. Returns the index of the first
/// component that could not be placed.
fn bottom_left_layout<R: Rng>(problem: &Problem, rng: &mut R) -> Result<Layout, usize> {
    let mut order: Vec<usize> = (0..problem.len()).collect();
    order.shuffle(rng);

    let mut layout = problem.empty_layout();
    let mut placed: Vec<Rect> = Vec::with_capacity(order.len());
    for idx in order {
        let mut candidates = vec![Point::new(0.0, 0.0)];
        for r in &placed {
            candidates.push(Point::new(r.right(), r.y));
            candidates.push(Point::new(r.x, r.bottom()));
            candidates.push(Point::new(r.right(), 0.0));
            candidates.push(Point::new(0.0, r.bottom()));
        }
        candidates.sort_by(|a, b| a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x)));

        let spot = candidates.iter().find_map(|origin| {
            [false, true].into_iter().find_map(|rotated| {
                let placement = Placement {
                    origin: *origin,
                    rotated,
                };
                let rect = problem.footprint(idx, &placement);
                problem.fits(&layout, idx, &rect).then_some((placement, rect))
            })
        });
        let (placement, rect) = spot.ok_or(idx)?;
        layout.place(idx, placement);
        placed.push(rect);
    }
    Ok(layout)
}

/// Neighbourhood operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Move {
    Shift,
    Swap,
    Rotate,
}

/// Placement of one [`Problem`] as an [`SaProblem`].
///
/// Solutions are complete layouts. Candidates may overlap; they are
/// rejected through [`SaProblem::is_feasible`] before being costed.
#[derive(Debug, Clone)]
pub struct PlacementProblem<'a> {
    evaluator: CostEvaluator<'a>,
    neighbors: NeighborWeights,
    max_placement_attempts: usize,
}

impl<'a> PlacementProblem<'a> {
    pub fn new(
        evaluator: CostEvaluator<'a>,
        neighbors: NeighborWeights,
        max_placement_attempts: usize,
    ) -> Self {
        Self {
            evaluator,
            neighbors,
            max_placement_attempts,
        }
    }

    pub fn evaluator(&self) -> &CostEvaluator<'a> {
        &self.evaluator
    }

    fn problem(&self) -> &'a Problem {
        self.evaluator.problem()
    }

    fn pick_move<R: Rng>(&self, rng: &mut R) -> Move {
        let w = &self.neighbors;
        let r = rng.random::<f64>() * w.total();
        if r < w.shift {
            Move::Shift
        } else if r < w.shift + w.swap {
            Move::Swap
        } else {
            Move::Rotate
        }
    }

    /// Gaussian shift of one component, clamped to the board.
    fn shift<R: Rng>(&self, layout: &mut Layout, temperature: f64, rng: &mut R) {
        let problem = self.problem();
        let idx = rng.random_range(0..problem.len());
        let Some(placement) = layout.get(idx) else {
            return;
        };
        let (w, h) = problem.component(idx).dimensions(placement.rotated);
        let board = problem.board();
        let sigma = (5.0 + temperature / 5.0).min(MAX_SHIFT_SIGMA);

        let max_x = (board.width - w).max(0.0);
        let max_y = (board.height - h).max(0.0);
        let x = (placement.origin.x + gaussian(rng, sigma)).clamp(0.0, max_x);
        let y = (placement.origin.y + gaussian(rng, sigma)).clamp(0.0, max_y);
        layout.place(
            idx,
            Placement {
                origin: Point::new(x, y),
                rotated: placement.rotated,
            },
        );
    }

    /// Exchanges the origins of two components if both still fit the
    /// board. Orientations stay with their components.
    fn swap<R: Rng>(&self, layout: &mut Layout, rng: &mut R) {
        let problem = self.problem();
        if problem.len() < 2 {
            return;
        }
        let (i, j) = distinct_pair(rng, problem.len());
        let (Some(pi), Some(pj)) = (layout.get(i), layout.get(j)) else {
            return;
        };
        let new_i = Placement {
            origin: pj.origin,
            rotated: pi.rotated,
        };
        let new_j = Placement {
            origin: pi.origin,
            rotated: pj.rotated,
        };
        let board = problem.board();
        let fits_i = board.contains(&problem.footprint(i, &new_i));
        let fits_j = board.contains(&problem.footprint(j, &new_j));
        if fits_i && fits_j {
            layout.place(i, new_i);
            layout.place(j, new_j);
        }
    }

    /// Turns one component by 90° if it still fits the board.
    fn rotate<R: Rng>(&self, layout: &mut Layout, rng: &mut R) {
        let problem = self.problem();
        let idx = rng.random_range(0..problem.len());
        let Some(placement) = layout.get(idx) else {
            return;
        };
        let turned = Placement {
            origin: placement.origin,
            rotated: !placement.rotated,
        };
        if problem.board().contains(&problem.footprint(idx, &turned)) {
            layout.place(idx, turned);
        }
    }
}

impl SaProblem for PlacementProblem<'_> {
    type Solution = Layout;

    fn initial_solution<R: Rng>(&self, rng: &mut R) -> PlaceResult<Layout> {
        random_layout(self.problem(), self.max_placement_attempts, rng)
    }

    fn cost(&self, layout: &Layout) -> f64 {
        self.evaluator.total(layout)
    }

    fn neighbor<R: Rng>(&self, layout: &Layout, temperature: f64, rng: &mut R) -> Layout {
        let mut candidate = layout.clone();
        if self.problem().is_empty() {
            return candidate;
        }
        match self.pick_move(rng) {
            Move::Shift => self.shift(&mut candidate, temperature, rng),
            Move::Swap => self.swap(&mut candidate, rng),
            Move::Rotate => self.rotate(&mut candidate, rng),
        }
        candidate
    }

    fn is_feasible(&self, layout: &Layout) -> bool {
        self.problem().check_layout(layout).is_ok()
    }
}

/// Result of [`SaPlacer`].
#[derive(Debug, Clone)]
pub struct PlacementOutcome {
    /// Component id → top-left corner of the best layout.
    pub positions: BTreeMap<String, Point>,
    /// Cost terms of the best layout.
    pub breakdown: CostBreakdown,
    /// Full annealing statistics; `run.best` is the best layout.
    pub run: SaResult<Layout>,
}

impl PlacementOutcome {
    pub fn layout(&self) -> &Layout {
        &self.run.best
    }
}

/// Simulated annealing placer for one problem.
///
/// # Examples
///
/// ```
/// use pcb_placer::layout::{Board, Component, Connection, Problem};
/// use pcb_placer::sa::{PlacerConfig, SaConfig, SaPlacer};
///
/// let problem = Problem::new(
///     Board::new(30.0, 30.0),
///     vec![Component::new("U1", 4.0, 4.0), Component::new("R1", 2.0, 1.0)],
///     vec![Connection::new("U1", "R1", 1.0)],
/// )
/// .unwrap();
/// let config = PlacerConfig::default().with_sa(SaConfig::default().with_seed(7));
/// let outcome = SaPlacer::new(&problem, config).unwrap().optimize().unwrap();
/// assert_eq!(outcome.positions.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct SaPlacer<'a> {
    problem: &'a Problem,
    config: PlacerConfig,
}

impl<'a> SaPlacer<'a> {
    /// Creates a placer after validating `config`.
    pub fn new(problem: &'a Problem, config: PlacerConfig) -> PlaceResult<Self> {
        config.validate()?;
        Ok(Self { problem, config })
    }

    pub fn config(&self) -> &PlacerConfig {
        &self.config
    }

    fn placement_problem(&self) -> PlacementProblem<'a> {
        let config = &self.config;
        let evaluator = CostEvaluator::new(self.problem, config.thermal.clone(), config.weights);
        PlacementProblem::new(evaluator, config.neighbors, config.max_placement_attempts)
    }

    /// Runs one annealing search seeded from `config.sa.seed`.
    pub fn optimize(&self) -> PlaceResult<PlacementOutcome> {
        let problem = self.placement_problem();
        let run = SaRunner::run(&problem, &self.config.sa)?;
        Ok(Self::outcome(&problem, run))
    }

    /// Runs one annealing search with a caller-supplied generator.
    pub fn optimize_with_rng<R: Rng>(&self, rng: &mut R) -> PlaceResult<PlacementOutcome> {
        let problem = self.placement_problem();
        let run = SaRunner::run_with_rng(&problem, &self.config.sa, rng)?;
        Ok(Self::outcome(&problem, run))
    }

    /// Runs `starts` independent searches and keeps the best.
    pub fn optimize_multi_start(&self, starts: usize) -> PlaceResult<PlacementOutcome> {
        let problem = self.placement_problem();
        let run = SaRunner::run_multi_start(&problem, &self.config.sa, starts)?;
        Ok(Self::outcome(&problem, run))
    }

    fn outcome(problem: &PlacementProblem<'_>, run: SaResult<Layout>) -> PlacementOutcome {
        PlacementOutcome {
            positions: run.best.to_map(problem.problem()),
            breakdown: problem.evaluator().evaluate(&run.best),
            run,
        }
    }
}
