//! Command-line interface for generating a tile grid with restarts and progress

use crate::algorithm::executor::{
    RecoveryPolicy, RunLimits, SolverConfig, StepStatus, solve_with_restarts,
};
use crate::io::configuration::{
    DEFAULT_MAX_ATTEMPTS, DEFAULT_MAX_BACKTRACKS, DEFAULT_MAX_COORDINATE, DEFAULT_MIN_COORDINATE,
    DEFAULT_RECOVERY, DEFAULT_SEED, DEFAULT_TILESET,
};
use crate::io::error::{AlgorithmError, Result};
use crate::io::export::{export_grid_as_text, grid_to_text};
use crate::io::progress::ProgressManager;
use crate::spatial::grid::Bounds;
use crate::spatial::tileset::TilesetKind;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "edgetile")]
#[command(
    author,
    version,
    about = "Generate edge-constrained tile grids with wave function collapse"
)]
/// Command-line arguments for the grid generation tool
pub struct Cli {
    /// Inclusive lower x bound
    #[arg(long, default_value_t = DEFAULT_MIN_COORDINATE, allow_hyphen_values = true)]
    pub x_min: i32,

    /// Inclusive lower y bound
    #[arg(long, default_value_t = DEFAULT_MIN_COORDINATE, allow_hyphen_values = true)]
    pub y_min: i32,

    /// Inclusive upper x bound
    #[arg(long, default_value_t = DEFAULT_MAX_COORDINATE, allow_hyphen_values = true)]
    pub x_max: i32,

    /// Inclusive upper y bound
    #[arg(long, default_value_t = DEFAULT_MAX_COORDINATE, allow_hyphen_values = true)]
    pub y_max: i32,

    /// Random seed for reproducible generation
    #[arg(short, long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Grid topology and tile catalogue
    #[arg(short, long, default_value = DEFAULT_TILESET)]
    pub tileset: String,

    /// Maximum steps per attempt [default: scaled to the grid size]
    #[arg(long)]
    pub max_steps: Option<usize>,

    /// Seeded attempts before giving up
    #[arg(short, long, default_value_t = DEFAULT_MAX_ATTEMPTS)]
    pub attempts: usize,

    /// Contradiction handling: halt or backtrack
    #[arg(short, long, default_value = DEFAULT_RECOVERY)]
    pub recovery: String,

    /// Choice points that may be unwound per attempt when backtracking
    #[arg(long, default_value_t = DEFAULT_MAX_BACKTRACKS)]
    pub max_backtracks: usize,

    /// Write the grid to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Overwrite the output file even if it exists
    #[arg(short, long)]
    pub no_skip: bool,
}

impl Cli {
    /// Check if an existing output file should be left alone
    pub const fn skip_existing(&self) -> bool {
        !self.no_skip
    }

    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Build the solver configuration described by the arguments
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The bounds are degenerate or oversized
    /// - The tileset or recovery policy name is not recognised
    pub fn solver_config(&self) -> Result<SolverConfig> {
        Ok(SolverConfig {
            bounds: Bounds::new(self.x_min, self.y_min, self.x_max, self.y_max)?,
            tileset: TilesetKind::from_name(&self.tileset)?,
            seed: self.seed,
            recovery: RecoveryPolicy::from_name(&self.recovery, self.max_backtracks)?,
        })
    }

    /// Step and attempt budgets for a grid with the given bounds
    ///
    /// Without `--max-steps` the step budget is derived from the cell count.
    pub fn run_limits(&self, bounds: Bounds) -> RunLimits {
        let derived = RunLimits::for_bounds(bounds);
        RunLimits {
            max_steps: self.max_steps.unwrap_or(derived.max_steps),
            max_attempts: self.attempts,
        }
    }
}

/// What a finished command-line run produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
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
    /// The final grid as text
    pub text: String,
}

impl RunReport {
    /// Turn an unsolved run into an error
    ///
    /// # Errors
    ///
    /// Returns `Unsolved` unless the last attempt solved the grid
    pub const fn ensure_solved(&self) -> Result<()> {
        match self.status {
            StepStatus::Solved => Ok(()),
            StepStatus::Contradiction | StepStatus::InProgress => {
                Err(AlgorithmError::Unsolved {
                    attempts: self.attempts,
                    seed: self.seed,
                    contradiction: matches!(self.status, StepStatus::Contradiction),
                })
            }
        }
    }
}

/// Orchestrates a single generation run with progress tracking
pub struct GridRunner {
    cli: Cli,
    progress_manager: Option<ProgressManager>,
}

impl GridRunner {
    /// Create a new runner with the given CLI arguments
    pub fn new(cli: Cli) -> Self {
        let progress_manager = cli.should_show_progress().then(ProgressManager::new);

        Self {
            cli,
            progress_manager,
        }
    }

    /// Generate a grid and write it to the output file or stdout
    ///
    /// Returns `None` when the output file already exists and skipping is
    /// enabled. An unsolved final attempt is still reported and written, so
    /// callers inspect `RunReport::status` for success.
    ///
    /// # Errors
    ///
    /// Returns an error if the arguments are invalid or the output cannot be
    /// written
    // Allow print for user feedback and for the grid itself when no output file is given
    #[allow(clippy::print_stderr, clippy::print_stdout)]
    pub fn run(&mut self) -> Result<Option<RunReport>> {
        if let Some(ref output) = self.cli.output {
            if self.cli.skip_existing() && output.exists() {
                if !self.cli.quiet {
                    eprintln!("Skipping: {} (output exists)", output.display());
                }
                return Ok(None);
            }
        }

        let config = self.cli.solver_config()?;
        let limits = self.cli.run_limits(config.bounds);
        let registry = config.registry()?;
        let template = config.grid(&registry)?;
        let total_cells = config.bounds.cell_count();
        let quiet = self.cli.quiet;

        let mut progress = self.progress_manager.as_mut();
        if let Some(pm) = progress.as_mut() {
            pm.initialize(limits.max_attempts);
        }

        let summary = solve_with_restarts(&template, &config, limits, |attempt, outcome, grid| {
            if let Some(pm) = progress.as_mut() {
                if attempt >= pm.attempts_started() {
                    pm.start_attempt(attempt, config.seed.wrapping_add(attempt as u64), total_cells);
                }
                pm.update_attempt(attempt, grid.committed_count());
                if outcome.status.is_terminal() {
                    pm.complete_attempt(attempt, outcome.status);
                }
            }
            if outcome.status == StepStatus::Contradiction && !quiet {
                eprintln!(
                    "Attempt {} (seed {}) ended in a contradiction",
                    attempt + 1,
                    config.seed.wrapping_add(attempt as u64)
                );
            }
        })?;

        if let Some(ref pm) = self.progress_manager {
            pm.finish();
        }

        if summary.status != StepStatus::Solved && !quiet {
            eprintln!(
                "No solution after {} attempt(s); emitting the last grid",
                summary.attempts
            );
        }

        let text = grid_to_text(&summary.grid);
        match self.cli.output {
            Some(ref output) => export_grid_as_text(&summary.grid, output)?,
            None => print!("{text}"),
        }

        Ok(Some(RunReport {
            status: summary.status,
            attempts: summary.attempts,
            steps: summary.steps,
            backtracks: summary.backtracks,
            seed: summary.seed,
            text,
        }))
    }
}
