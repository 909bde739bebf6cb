//! The episodic placement environment.

use super::config::EnvConfig;
use super::grid::{CellRange, OccupancyGrid};
use crate::cost::wire_length;
use crate::error::PlaceResult;
use crate::layout::{Component, Layout, Placement, Problem};
use crate::random::{create_rng, rng_from_seed, uniform_upto};
use log::{debug, trace};
use rand::rngs::StdRng;

/// Number of next-component features in an [`Observation`].
pub const COMPONENT_FEATURES: usize = 4;

/// Target position of the next component as fractions of its free travel
/// along each axis. Values are clipped to `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Action {
    pub x_ratio: f64,
    pub y_ratio: f64,
}

impl Action {
    pub fn new(x_ratio: f64, y_ratio: f64) -> Self {
        Self { x_ratio, y_ratio }
    }
}

/// What a policy sees before each step.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    /// Occupancy grid, row-major, 1 = covered.
    pub grid: Vec<f32>,
    /// Normalized width, normalized height, progress and placed ratio of
    /// the next component; all zeros once no component remains.
    pub component: [f32; COMPONENT_FEATURES],
    /// Placed components over total.
    pub placed_ratio: f32,
}

impl Observation {
    /// Flat vector: grid, component features, placed ratio.
    pub fn to_vec(&self) -> Vec<f32> {
        let mut v = Vec::with_capacity(self.grid.len() + COMPONENT_FEATURES + 1);
        v.extend_from_slice(&self.grid);
        v.extend_from_slice(&self.component);
        v.push(self.placed_ratio);
        v
    }
}

/// Diagnostics of one step.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StepInfo {
    /// The action's own position was used.
    pub valid_placement: bool,
    /// The action was invalid and a random fallback position was used.
    pub fallback_placement: bool,
    /// No fallback position was found; the episode ended.
    pub forced_termination: bool,
    /// Wire length of the layout after the step.
    pub wire_length: f64,
    pub components_placed: usize,
}

/// Result of [`PlacementEnv::step`].
#[derive(Debug, Clone, PartialEq)]
pub struct StepOutcome {
    pub observation: Observation,
    pub reward: f64,
    pub terminated: bool,
    pub info: StepInfo,
}

/// Places the components of a [`Problem`] one per step, in index order.
///
/// Each step takes an [`Action`] for the next component. A position
/// inside the board whose cells are free places the component. Otherwise
/// up to `max_fallback_attempts` uniform random positions are tried: the
/// first free one places the component with the invalid-action penalty,
/// and if none is free the episode ends with the forced-termination
/// penalty. The episode also ends once every component is placed.
///
/// An environment owns its grid, layout and random generator; run
/// parallel rollouts on separate instances.
#[derive(Debug, Clone)]
pub struct PlacementEnv<'a> {
    problem: &'a Problem,
    config: EnvConfig,
    rng: StdRng,
    grid: OccupancyGrid,
    layout: Layout,
    next: usize,
    terminated: bool,
}

impl<'a> PlacementEnv<'a> {
    /// Creates an environment, already reset.
    pub fn new(problem: &'a Problem, config: EnvConfig) -> PlaceResult<Self> {
        config.validate()?;
        let board = problem.board();
        let grid = OccupancyGrid::new(board.width, board.height, config.cells_per_mm);
        debug!(
            "placement env: {} components, {}x{} grid",
            problem.len(),
            grid.cols(),
            grid.rows()
        );
        Ok(Self {
            problem,
            rng: rng_from_seed(config.seed),
            config,
            grid,
            layout: problem.empty_layout(),
            next: 0,
            terminated: problem.is_empty(),
        })
    }

    /// Clears the board and starts a new episode.
    ///
    /// The random generator continues its sequence; use
    /// [`reset_with_seed`](Self::reset_with_seed) to make the episode
    /// reproducible on its own.
    pub fn reset(&mut self) -> Observation {
        self.grid.clear();
        self.layout = self.problem.empty_layout();
        self.next = 0;
        self.terminated = self.problem.is_empty();
        self.observation()
    }

    /// Reseeds the fallback generator, then resets.
    pub fn reset_with_seed(&mut self, seed: u64) -> Observation {
        self.rng = create_rng(seed);
        self.reset()
    }

    pub fn problem(&self) -> &'a Problem {
        self.problem
    }

    pub fn config(&self) -> &EnvConfig {
        &self.config
    }

    pub fn grid(&self) -> &OccupancyGrid {
        &self.grid
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// The component the next step places, if any.
    pub fn current_component(&self) -> Option<&'a Component> {
        let problem: &'a Problem = self.problem;
        (self.next < problem.len()).then(|| problem.component(self.next))
    }

    /// Length of every observation vector of this environment.
    pub fn observation_len(&self) -> usize {
        self.grid.as_slice().len() + COMPONENT_FEATURES + 1
    }

    pub fn wire_length(&self) -> f64 {
        wire_length(self.problem, &self.layout)
    }

    fn placed_ratio(&self) -> f32 {
        let total = self.problem.len();
        if total == 0 {
            1.0
        } else {
            (self.layout.placed_count() as f64 / total as f64) as f32
        }
    }

    pub fn observation(&self) -> Observation {
        let placed_ratio = self.placed_ratio();
        let component = match self.current_component() {
            Some(c) => {
                let board = self.problem.board();
                [
                    (c.width / board.width) as f32,
                    (c.height / board.height) as f32,
                    (self.next as f64 / self.problem.len() as f64) as f32,
                    placed_ratio,
                ]
            }
            None => [0.0; COMPONENT_FEATURES],
        };
        Observation {
            grid: self.grid.as_slice().to_vec(),
            component,
            placed_ratio,
        }
    }

    /// Free cells for component `idx` with its origin at `(x, y)`.
    fn free_range(&self, idx: usize, x: f64, y: f64) -> Option<CellRange> {
        let rect = self.problem.footprint(idx, &Placement::at(x, y));
        if !self.problem.board().contains(&rect) {
            return None;
        }
        self.grid.range(&rect).filter(|r| self.grid.is_free(r))
    }

    fn commit(&mut self, idx: usize, x: f64, y: f64, range: &CellRange) {
        self.grid.mark(range);
        self.layout.place(idx, Placement::at(x, y));
        self.next += 1;
    }

    /// Finds a free random position for component `idx`.
    fn fallback_position(
        &mut self,
        idx: usize,
        max_x: f64,
        max_y: f64,
    ) -> Option<(f64, f64, CellRange)> {
        for _ in 0..self.config.max_fallback_attempts {
            let x = uniform_upto(&mut self.rng, max_x);
            let y = uniform_upto(&mut self.rng, max_y);
            if let Some(range) = self.free_range(idx, x, y) {
                return Some((x, y, range));
            }
        }
        None
    }

    /// Advances the episode by one placement decision.
    ///
    /// Once the episode has ended this returns reward 0 and changes
    /// nothing.
    pub fn step(&mut self, action: Action) -> StepOutcome {
        let component = match self.current_component() {
            Some(c) if !self.terminated => c,
            _ => {
                return StepOutcome {
                    observation: self.observation(),
                    reward: 0.0,
                    terminated: true,
                    info: StepInfo {
                        wire_length: self.wire_length(),
                        components_placed: self.layout.placed_count(),
                        ..StepInfo::default()
                    },
                };
            }
        };

        let idx = self.next;
        let board = self.problem.board();
        let max_x = (board.width - component.width).max(0.0);
        let max_y = (board.height - component.height).max(0.0);
        let x = action.x_ratio.clamp(0.0, 1.0) * max_x;
        let y = action.y_ratio.clamp(0.0, 1.0) * max_y;

        let mut info = StepInfo::default();
        let reward = if let Some(range) = self.free_range(idx, x, y) {
            self.commit(idx, x, y, &range);
            info.valid_placement = true;
            let mut reward =
                -self.wire_length() / self.config.reward_scale + self.config.placement_bonus;
            if self.next == self.problem.len() {
                reward += self.config.completion_bonus;
            }
            trace!("`{}` placed at ({x:.2}, {y:.2})", component.id);
            reward
        } else {
            match self.fallback_position(idx, max_x, max_y) {
                Some((fx, fy, range)) => {
                    self.commit(idx, fx, fy, &range);
                    info.fallback_placement = true;
                    trace!(
                        "invalid action for `{}`, fallback at ({fx:.2}, {fy:.2})",
                        component.id
                    );
                    self.config.invalid_action_penalty
                }
                None => {
                    self.terminated = true;
                    info.forced_termination = true;
                    debug!(
                        "no free position for `{}` after {} attempts, episode terminated",
                        component.id, self.config.max_fallback_attempts
                    );
                    self.config.forced_termination_penalty
                }
            }
        };

        if self.next == self.problem.len() {
            self.terminated = true;
        }
        info.wire_length = self.wire_length();
        info.components_placed = self.layout.placed_count();

        StepOutcome {
            observation: self.observation(),
            reward,
            terminated: self.terminated,
            info,
        }
    }
}
