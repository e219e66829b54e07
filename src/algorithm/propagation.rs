use crate::{
    algorithm::{bitset::TileBitset, cache::SupportCache},
    spatial::grid::{Cell, GridModel},
};
use std::collections::{HashSet, VecDeque};

/// Summary of one propagation pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PropagationReport {
    /// Number of times a neighbour's possibility set shrank
    pub revised: usize,
    /// Number of worklist entries processed
    pub visited: usize,
    /// First cell whose possibility set became empty
    pub contradiction: Option<[i32; 2]>,
}

impl PropagationReport {
    /// Whether the pass ended in a contradiction
    pub const fn is_contradiction(&self) -> bool {
        self.contradiction.is_some()
    }
}

/// Filter neighbouring possibility sets outward from the seed cells
///
/// Each processed cell restricts every undecided in-bounds neighbour to the
/// tiles its facing side can support. A neighbour that shrinks is queued in
/// turn, so the pass only ends at a fixed point where every undecided cell
/// is consistent with all of its neighbours, or as soon as some cell runs
/// out of possibilities.
pub fn propagate<I>(grid: &mut GridModel<'_>, cache: &mut SupportCache, seeds: I) -> PropagationReport
where
    I: IntoIterator<Item = [i32; 2]>,
{
    let registry = grid.registry();
    let direction_count = registry.directions().len();
    let mut report = PropagationReport::default();

    let mut queue: VecDeque<[i32; 2]> = VecDeque::new();
    let mut queued: HashSet<[i32; 2]> = HashSet::new();
    for seed in seeds {
        if queued.insert(seed) {
            queue.push_back(seed);
        }
    }

    while let Some(position) = queue.pop_front() {
        queued.remove(&position);
        report.visited += 1;

        let source = match grid.cell(position) {
            Some(Cell::Committed(tile)) => TileBitset::single(registry.len(), *tile),
            Some(Cell::Undecided(set)) => set.clone(),
            None => continue,
        };

        for direction in 0..direction_count {
            let Some(next) = grid.neighbour(position, direction) else {
                continue;
            };
            if grid.cell(next).is_none_or(Cell::is_committed) {
                continue;
            }

            let allowed = cache.support(registry, &source, direction);
            if grid.restrict(next, &allowed) != Some(true) {
                continue;
            }
            report.revised += 1;

            if grid.cell(next).is_some_and(Cell::is_contradiction) {
                report.contradiction = Some(next);
                return report;
            }
            if queued.insert(next) {
                queue.push_back(next);
            }
        }
    }

    report
}

/// Find an adjacent pair of committed cells whose facing sides disagree
///
/// Pairs are reported as (cell, neighbour) with the neighbour lying in a
/// registry direction from the cell. Used to reject conflicting pins and
/// to verify finished grids.
pub fn first_incompatible_pair(grid: &GridModel<'_>) -> Option<([i32; 2], [i32; 2])> {
    let registry = grid.registry();
    let direction_count = registry.directions().len();

    for position in grid.positions() {
        let Some(tile) = grid.tile_at(position) else {
            continue;
        };
        for direction in 0..direction_count {
            let Some(next) = grid.neighbour(position, direction) else {
                continue;
            };
            let Some(neighbour_tile) = grid.tile_at(next) else {
                continue;
            };
            let compatible = registry
                .supports(tile, direction)
                .is_some_and(|allowed| allowed.contains(neighbour_tile));
            if !compatible {
                return Some((position, next));
            }
        }
    }

    None
}
