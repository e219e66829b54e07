//! Multi-attempt progress tracking with automatic batching for long restart runs

use crate::algorithm::executor::StepStatus;
use crate::io::configuration::MAX_INDIVIDUAL_PROGRESS_BARS;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::LazyLock;

/// Display state of one attempt
#[derive(Debug, Clone, Default)]
struct AttemptState {
    label: String,
    committed: usize,
    total: usize,
}

/// Coordinates progress display for a restart-driven run
///
/// Shows one bar per recent attempt (committed cells out of all cells) and,
/// when more attempts are allowed than bars fit, a batch bar counting
/// finished attempts.
pub struct ProgressManager {
    multi_progress: MultiProgress,
    batch_bar: Option<ProgressBar>,
    attempt_bars: Vec<ProgressBar>,
    attempt_states: Vec<AttemptState>,
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}

static PROGRESS_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("{prefix} [{bar:30.cyan/blue}] {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

static BATCH_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("[{elapsed_precise}] Attempts: [{bar:40.cyan/blue}] {pos}/{len}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
});

impl ProgressManager {
    /// Create a new progress manager
    pub fn new() -> Self {
        Self {
            multi_progress: MultiProgress::new(),
            batch_bar: None,
            attempt_bars: Vec::new(),
            attempt_states: Vec::new(),
        }
    }

    /// Create a manager that draws nothing, for tests and piped output
    pub fn hidden() -> Self {
        Self {
            multi_progress: MultiProgress::with_draw_target(indicatif::ProgressDrawTarget::hidden()),
            ..Self::new()
        }
    }

    /// Initialize progress bars based on the attempt budget
    pub fn initialize(&mut self, max_attempts: usize) {
        // Switch to batch mode for long restart runs to avoid terminal spam
        if max_attempts > MAX_INDIVIDUAL_PROGRESS_BARS {
            let batch_bar = ProgressBar::new(max_attempts as u64);
            batch_bar.set_style(BATCH_STYLE.clone());
            self.batch_bar = Some(self.multi_progress.add(batch_bar));
        }

        let bars_to_create = max_attempts.min(MAX_INDIVIDUAL_PROGRESS_BARS);
        for _ in 0..bars_to_create {
            let pb = ProgressBar::new(0);
            pb.set_style(PROGRESS_STYLE.clone());
            self.attempt_bars.push(self.multi_progress.add(pb));
        }
    }

    /// Configure the display for a new attempt
    pub fn start_attempt(&mut self, index: usize, seed: u64, total_cells: usize) {
        if index >= self.attempt_states.len() {
            self.attempt_states
                .resize(index + 1, AttemptState::default());
        }
        if let Some(state) = self.attempt_states.get_mut(index) {
            *state = AttemptState {
                label: format!("seed {seed}"),
                committed: 0,
                total: total_cells,
            };
        }
        self.update_bars();
    }

    /// Report the number of committed cells in an attempt
    pub fn update_attempt(&mut self, index: usize, committed: usize) {
        if let Some(state) = self.attempt_states.get_mut(index) {
            state.committed = committed;
        }
        self.update_bars();
    }

    /// Mark an attempt as finished with its final status
    pub fn complete_attempt(&mut self, index: usize, status: StepStatus) {
        if let Some(ref batch_bar) = self.batch_bar {
            batch_bar.inc(1);
        }

        if let Some(state) = self.attempt_states.get_mut(index) {
            let mark = match status {
                StepStatus::Solved => "✓",
                StepStatus::Contradiction => "✗",
                StepStatus::InProgress => "…",
            };
            state.label = format!("{mark} {}", state.label);
        }
        self.update_bars();
    }

    /// Number of attempts shown so far
    pub fn attempts_started(&self) -> usize {
        self.attempt_states.len()
    }

    /// Clean up all progress displays
    pub fn finish(&self) {
        if let Some(ref batch_bar) = self.batch_bar {
            batch_bar.finish_with_message("All attempts processed");
        }
        let _ = self.multi_progress.clear();
    }

    /// Update all progress bars to show the last N attempts
    fn update_bars(&self) {
        let start_idx = self
            .attempt_states
            .len()
            .saturating_sub(MAX_INDIVIDUAL_PROGRESS_BARS);
        let visible = self.attempt_states.get(start_idx..).unwrap_or(&[]);

        for (bar_idx, state) in visible.iter().enumerate() {
            if let Some(bar) = self.attempt_bars.get(bar_idx) {
                bar.set_length(state.total as u64);
                bar.set_position(state.committed as u64);
                let width = state.total.to_string().len();
                bar.set_message(format!("{:>width$}/{}", state.committed, state.total));
                bar.set_prefix(state.label.clone());
            }
        }

        // Clear any unused bars
        for bar_idx in visible.len()..self.attempt_bars.len() {
            if let Some(bar) = self.attempt_bars.get(bar_idx) {
                bar.set_length(0);
                bar.set_position(0);
                bar.set_message(String::new());
                bar.set_prefix(String::new());
            }
        }
    }
}
