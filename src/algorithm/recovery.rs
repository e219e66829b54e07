use crate::{
    algorithm::{bitset::TileBitset, cache::SupportCache, propagation::propagate},
    spatial::grid::{Cell, GridModel},
};
use ndarray::Array2;
use std::collections::VecDeque;

/// Grid state saved just before a random commitment
///
/// Holds every cell as it was before the commitment together with the
/// candidates at the chosen cell that have not been tried yet.
#[derive(Debug, Clone)]
pub struct ChoicePoint {
    snapshot: Array2<Cell>,
    position: [i32; 2],
    untried: TileBitset,
}

impl ChoicePoint {
    /// Record a choice of `chosen` among `candidates` at a position
    pub fn new(
        snapshot: Array2<Cell>,
        position: [i32; 2],
        candidates: &TileBitset,
        chosen: usize,
    ) -> Self {
        let mut untried = candidates.clone();
        untried.remove(chosen);
        Self {
            snapshot,
            position,
            untried,
        }
    }

    /// Position of the committed cell
    pub const fn position(&self) -> [i32; 2] {
        self.position
    }

    /// Candidates left to try at the position
    pub const fn untried(&self) -> &TileBitset {
        &self.untried
    }
}

/// Result of unwinding the choice stack after a contradiction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BacktrackOutcome {
    /// A choice point was reopened with its remaining candidates
    Resumed {
        /// Cell that was reopened
        position: [i32; 2],
        /// Candidates left at that cell
        remaining: usize,
        /// Possibility sets narrowed while re-propagating
        revised: usize,
    },
    /// Every recorded choice has been exhausted
    Exhausted,
    /// The backtrack budget ran out
    BudgetSpent,
}

/// Chronological backtracking over recorded choice points
///
/// The stack holds at most as many points as backtracks remain in its
/// budget. Older points could never be reached, so they are dropped as new
/// ones arrive.
#[derive(Debug)]
pub struct ChoiceStack {
    points: VecDeque<ChoicePoint>,
    backtracks: usize,
    max_depth: usize,
}

impl Default for ChoiceStack {
    fn default() -> Self {
        Self::with_depth(usize::MAX)
    }
}

impl ChoiceStack {
    /// Create an empty stack with no depth limit
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty stack for a run allowed `max_depth` backtracks
    pub const fn with_depth(max_depth: usize) -> Self {
        Self {
            points: VecDeque::new(),
            backtracks: 0,
            max_depth,
        }
    }

    /// Record a choice point, dropping the oldest beyond the remaining budget
    pub fn push(&mut self, point: ChoicePoint) {
        let limit = self.max_depth.saturating_sub(self.backtracks);
        if limit == 0 {
            self.points.clear();
            return;
        }
        while self.points.len() >= limit {
            self.points.pop_front();
        }
        self.points.push_back(point);
    }

    /// Number of open choice points
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether no choice point is open
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Total choice points popped so far
    pub const fn backtracks(&self) -> usize {
        self.backtracks
    }

    /// Undo choices until an untried alternative survives propagation
    ///
    /// Pops the newest choice point, restores its snapshot and reopens its
    /// cell with the untried candidates only. If nothing is left there, or
    /// the reduced set immediately contradicts, the previous choice point is
    /// unwound as well.
    pub fn backtrack(
        &mut self,
        grid: &mut GridModel<'_>,
        cache: &mut SupportCache,
        max_backtracks: usize,
    ) -> BacktrackOutcome {
        loop {
            if self.backtracks >= max_backtracks {
                return BacktrackOutcome::BudgetSpent;
            }
            let Some(point) = self.points.pop_back() else {
                return BacktrackOutcome::Exhausted;
            };
            self.backtracks += 1;

            let ChoicePoint {
                snapshot,
                position,
                untried,
            } = point;
            grid.restore(snapshot);

            if untried.is_empty() {
                continue;
            }

            let remaining = untried.count();
            grid.set_cell(position, Cell::Undecided(untried));
            let report = propagate(grid, cache, [position]);
            if report.is_contradiction() {
                continue;
            }

            return BacktrackOutcome::Resumed {
                position,
                remaining,
                revised: report.revised,
            };
        }
    }
}
