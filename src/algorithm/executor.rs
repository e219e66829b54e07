use crate::{
    algorithm::cache::{CacheStats, SupportCache},
    algorithm::propagation::{first_incompatible_pair, propagate},
    algorithm::recovery::{BacktrackOutcome, ChoicePoint, ChoiceStack},
    algorithm::selection::{candidate_weights, select_min_entropy_cell},
    io::configuration::{
        DEFAULT_MAX_ATTEMPTS, DEFAULT_MAX_BACKTRACKS, DEFAULT_MAX_COORDINATE, DEFAULT_MAX_STEPS,
        DEFAULT_MIN_COORDINATE, DEFAULT_SEED, DEFAULT_STEPS_PER_CELL,
    },
    io::error::{AlgorithmError, Result, invalid_parameter},
    spatial::grid::{Bounds, GridModel},
    spatial::registry::TileRegistry,
    spatial::tileset::TilesetKind,
};
use rand::{Rng, SeedableRng, rngs::StdRng};

/// Externally observable state of a solver run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    /// Undecided cells remain and no contradiction is pending
    InProgress,
    /// Every cell is committed
    Solved,
    /// Some cell ran out of possibilities and could not be recovered
    Contradiction,
}

impl StepStatus {
    /// Whether further steps can change the grid
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::InProgress)
    }
}

/// What the solver does when propagation empties a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecoveryPolicy {
    /// Report a terminal contradiction; callers may restart with a new seed
    #[default]
    Halt,
    /// Unwind recorded choice points, trying untried tiles
    Backtrack {
        /// Choice points that may be popped before giving up
        max_backtracks: usize,
    },
}

impl RecoveryPolicy {
    /// Resolve a policy by name, ignoring ASCII case
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` for names other than `halt` and `backtrack`
    pub fn from_name(name: &str, max_backtracks: usize) -> Result<Self> {
        if name.eq_ignore_ascii_case("halt") {
            Ok(Self::Halt)
        } else if name.eq_ignore_ascii_case("backtrack") {
            Ok(Self::Backtrack { max_backtracks })
        } else {
            Err(invalid_parameter(
                "recovery",
                &name,
                &"expected 'halt' or 'backtrack'",
            ))
        }
    }
}

/// Recognised configuration options for a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolverConfig {
    /// Inclusive grid bounds
    pub bounds: Bounds,
    /// Topology and catalogue to draw tiles from
    pub tileset: TilesetKind,
    /// Seed for reproducible cell and tile choices
    pub seed: u64,
    /// Contradiction handling
    pub recovery: RecoveryPolicy,
}

impl SolverConfig {
    /// Configuration from explicit bounds, keeping every other default
    ///
    /// # Errors
    ///
    /// Returns an error if the bounds are degenerate or oversized
    pub fn with_bounds(x_min: i32, y_min: i32, x_max: i32, y_max: i32) -> Result<Self> {
        Ok(Self {
            bounds: Bounds::new(x_min, y_min, x_max, y_max)?,
            tileset: TilesetKind::default(),
            seed: DEFAULT_SEED,
            recovery: RecoveryPolicy::Halt,
        })
    }

    /// Build the registry for the configured tileset
    ///
    /// # Errors
    ///
    /// Propagates any catalogue validation failure
    pub fn registry(&self) -> Result<TileRegistry> {
        let tileset = self.tileset.build();
        TileRegistry::build(tileset.as_ref())
    }

    /// Create an empty grid over the configured bounds
    ///
    /// # Errors
    ///
    /// Returns an error if the registry holds no tiles
    pub fn grid<'r>(&self, registry: &'r TileRegistry) -> Result<GridModel<'r>> {
        GridModel::new(self.bounds, registry)
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            bounds: Bounds {
                min: [DEFAULT_MIN_COORDINATE; 2],
                max: [DEFAULT_MAX_COORDINATE; 2],
            },
            tileset: TilesetKind::default(),
            seed: DEFAULT_SEED,
            recovery: RecoveryPolicy::Halt,
        }
    }
}

/// Budget for a restart-driven run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunLimits {
    /// Steps allowed per attempt
    pub max_steps: usize,
    /// Seeded attempts before giving up
    pub max_attempts: usize,
}

impl RunLimits {
    /// Limits whose step budget grows with the number of cells
    ///
    /// Every committing step decides at least one cell, so a few steps per
    /// cell leave room for backtracking. The budget never drops below
    /// `DEFAULT_MAX_STEPS`.
    pub const fn for_bounds(bounds: Bounds) -> Self {
        let scaled = bounds.cell_count().saturating_mul(DEFAULT_STEPS_PER_CELL);
        let max_steps = if scaled > DEFAULT_MAX_STEPS {
            scaled
        } else {
            DEFAULT_MAX_STEPS
        };
        Self {
            max_steps,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl Default for RunLimits {
    fn default() -> Self {
        Self {
            max_steps: DEFAULT_MAX_STEPS,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

/// Default backtracking policy used by the command line
pub const DEFAULT_BACKTRACK: RecoveryPolicy = RecoveryPolicy::Backtrack {
    max_backtracks: DEFAULT_MAX_BACKTRACKS,
};

/// Seeded random selector for reproducible stochastic choices
pub struct RandomSelector {
    rng: StdRng,
}

impl RandomSelector {
    /// Create a deterministic random selector
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Generic weighted random selection
    ///
    /// Returns index into weights array using cumulative distribution
    pub fn weighted_choice(&mut self, weights: &[f64]) -> usize {
        let total: f64 = weights.iter().sum();
        if total <= 0.0 {
            return 0;
        }

        let mut rand_val = self.rng.random::<f64>() * total;
        for (i, &weight) in weights.iter().enumerate() {
            rand_val -= weight;
            if rand_val <= 0.0 {
                return i;
            }
        }
        weights.len().saturating_sub(1)
    }
}

/// Commitment made during a step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// World position of the committed cell
    pub position: [i32; 2],
    /// Registry index of the chosen tile
    pub tile: usize,
    /// Tiles that were possible before the commitment
    pub candidates: usize,
    /// Entropy of the cell when it was selected
    pub entropy: f64,
}

/// Everything a caller can observe about one step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    /// Solver state after the step
    pub status: StepStatus,
    /// Commitment made, if any
    pub placement: Option<Placement>,
    /// Possibility sets narrowed during the step
    pub revised: usize,
    /// Whether the step unwound a choice point
    pub backtracked: bool,
}

impl StepOutcome {
    const fn idle(status: StepStatus) -> Self {
        Self {
            status,
            placement: None,
            revised: 0,
            backtracked: false,
        }
    }
}

/// Wave function collapse solver over one grid
///
/// Each call to `step` selects the lowest-entropy cell, commits it to a
/// weighted random tile and propagates the consequences to a fixed point.
/// The grid stays inspectable between steps.
pub struct Solver<'r> {
    grid: GridModel<'r>,
    weights: Vec<f64>,
    random_selector: RandomSelector,
    cache: SupportCache,
    choices: ChoiceStack,
    recovery: RecoveryPolicy,
    status: StepStatus,
    steps: usize,
    seed: u64,
    pins_propagated: bool,
}

impl<'r> Solver<'r> {
    /// Create a solver over a grid, which may already hold pinned cells
    pub fn new(grid: GridModel<'r>, seed: u64, recovery: RecoveryPolicy) -> Self {
        let weights = grid.registry().weights();
        let choices = match recovery {
            RecoveryPolicy::Backtrack { max_backtracks } => {
                ChoiceStack::with_depth(max_backtracks)
            }
            RecoveryPolicy::Halt => ChoiceStack::new(),
        };
        Self {
            grid,
            weights,
            random_selector: RandomSelector::new(seed),
            cache: SupportCache::new(),
            choices,
            recovery,
            status: StepStatus::InProgress,
            steps: 0,
            seed,
            pins_propagated: false,
        }
    }

    /// Create a solver over an empty grid described by a configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the grid cannot be created
    pub fn from_config(registry: &'r TileRegistry, config: &SolverConfig) -> Result<Self> {
        let grid = config.grid(registry)?;
        Ok(Self::new(grid, config.seed, config.recovery))
    }

    /// Access the current grid
    pub const fn grid(&self) -> &GridModel<'r> {
        &self.grid
    }

    /// Give up the solver, keeping its grid
    pub fn into_grid(self) -> GridModel<'r> {
        self.grid
    }

    /// Current status
    pub const fn status(&self) -> StepStatus {
        self.status
    }

    /// Steps taken so far
    pub const fn steps(&self) -> usize {
        self.steps
    }

    /// Seed the solver was created with
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Choice points unwound so far
    pub const fn backtracks(&self) -> usize {
        self.choices.backtracks()
    }

    /// Choice points currently held for backtracking
    pub fn open_choices(&self) -> usize {
        self.choices.len()
    }

    /// Support cache effectiveness
    pub const fn cache_stats(&self) -> CacheStats {
        self.cache.stats
    }

    /// Run one step: termination check, selection, commitment, propagation
    ///
    /// Terminal states are sticky; stepping a solved or contradicted solver
    /// changes nothing and repeats its status.
    pub fn step(&mut self) -> StepOutcome {
        if self.status.is_terminal() {
            return StepOutcome::idle(self.status);
        }
        self.steps += 1;

        let mut revised = 0;
        if !self.pins_propagated {
            self.pins_propagated = true;
            if first_incompatible_pair(&self.grid).is_some() {
                return self.finish(StepStatus::Contradiction, None, revised);
            }
            let pinned: Vec<[i32; 2]> = self
                .grid
                .positions()
                .filter(|&pos| self.grid.tile_at(pos).is_some())
                .collect();
            let report = propagate(&mut self.grid, &mut self.cache, pinned);
            revised += report.revised;
            if report.is_contradiction() {
                return self.finish(StepStatus::Contradiction, None, revised);
            }
        }

        if self.grid.is_solved() {
            return self.finish(StepStatus::Solved, None, revised);
        }
        if self.grid.first_contradiction().is_some() {
            return self.recover(None, revised);
        }

        let Some(choice) = select_min_entropy_cell(&self.grid, &self.weights) else {
            return self.finish(StepStatus::Contradiction, None, revised);
        };
        let Some(candidates) = self.grid.possibilities_at(choice.position).cloned() else {
            return self.finish(StepStatus::Contradiction, None, revised);
        };

        let (tiles, tile_weights) = candidate_weights(&candidates, &self.weights);
        let Some(tile) = tiles
            .get(self.random_selector.weighted_choice(&tile_weights))
            .copied()
        else {
            return self.recover(None, revised);
        };

        if choice.candidates > 1 && matches!(self.recovery, RecoveryPolicy::Backtrack { .. }) {
            self.choices.push(ChoicePoint::new(
                self.grid.snapshot(),
                choice.position,
                &candidates,
                tile,
            ));
        }

        self.grid.commit(choice.position, tile);
        let placement = Placement {
            position: choice.position,
            tile,
            candidates: choice.candidates,
            entropy: choice.entropy,
        };

        let report = propagate(&mut self.grid, &mut self.cache, [choice.position]);
        revised += report.revised;
        if report.is_contradiction() {
            return self.recover(Some(placement), revised);
        }

        let status = if self.grid.is_solved() {
            StepStatus::Solved
        } else {
            StepStatus::InProgress
        };
        self.finish(status, Some(placement), revised)
    }

    /// Step until the run ends or the step budget is spent
    pub fn run(&mut self, max_steps: usize) -> StepStatus {
        for _ in 0..max_steps {
            if self.step().status.is_terminal() {
                break;
            }
        }
        self.status
    }

    fn recover(&mut self, placement: Option<Placement>, revised: usize) -> StepOutcome {
        let RecoveryPolicy::Backtrack { max_backtracks } = self.recovery else {
            return self.finish(StepStatus::Contradiction, placement, revised);
        };

        match self
            .choices
            .backtrack(&mut self.grid, &mut self.cache, max_backtracks)
        {
            BacktrackOutcome::Resumed {
                revised: repropagated,
                ..
            } => StepOutcome {
                status: StepStatus::InProgress,
                placement,
                revised: revised + repropagated,
                backtracked: true,
            },
            BacktrackOutcome::Exhausted | BacktrackOutcome::BudgetSpent => {
                self.finish(StepStatus::Contradiction, placement, revised)
            }
        }
    }

    const fn finish(
        &mut self,
        status: StepStatus,
        placement: Option<Placement>,
        revised: usize,
    ) -> StepOutcome {
        self.status = status;
        StepOutcome {
            status,
            placement,
            revised,
            backtracked: false,
        }
    }
}

/// Result of a restart-driven run
pub struct RunSummary<'r> {
    /// Status of the last attempt
    pub status: StepStatus,
    /// Attempts started
    pub attempts: usize,
    /// Steps taken across all attempts
    pub steps: usize,
    /// Choice points unwound across all attempts
    pub backtracks: usize,
    /// Seed of the last attempt
    pub seed: u64,
    /// Grid left by the last attempt
    pub grid: GridModel<'r>,
}

/// Solve copies of a template grid with successive seeds until one succeeds
///
/// Attempt `n` (zero-based) uses `config.seed + n`. The observer sees every
/// step of every attempt, which is enough to drive progress displays.
///
/// # Errors
///
/// Returns `InvalidParameter` if `limits.max_attempts` is zero
pub fn solve_with_restarts<'r, F>(
    template: &GridModel<'r>,
    config: &SolverConfig,
    limits: RunLimits,
    mut observer: F,
) -> Result<RunSummary<'r>>
where
    F: FnMut(usize, &StepOutcome, &GridModel<'r>),
{
    if limits.max_attempts == 0 {
        return Err(invalid_parameter(
            "max_attempts",
            &limits.max_attempts,
            &"at least one attempt is required",
        ));
    }

    let mut steps = 0;
    let mut backtracks = 0;
    let mut attempts = 0;
    let mut last: Option<Solver<'r>> = None;

    for attempt in 0..limits.max_attempts {
        attempts += 1;
        let seed = config.seed.wrapping_add(attempt as u64);
        let mut solver = Solver::new(template.clone(), seed, config.recovery);

        for _ in 0..limits.max_steps {
            let outcome = solver.step();
            observer(attempt, &outcome, solver.grid());
            if outcome.status.is_terminal() {
                break;
            }
        }

        steps += solver.steps();
        backtracks += solver.backtracks();
        let solved = solver.status() == StepStatus::Solved;
        last = Some(solver);
        if solved {
            break;
        }
    }

    let solver = last.ok_or_else(|| AlgorithmError::InvalidParameter {
        parameter: "max_attempts",
        value: limits.max_attempts.to_string(),
        reason: "no attempt was started".to_string(),
    })?;

    Ok(RunSummary {
        status: solver.status(),
        attempts,
        steps,
        backtracks,
        seed: solver.seed(),
        grid: solver.into_grid(),
    })
}
