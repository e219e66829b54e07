use crate::{
    algorithm::bitset::TileBitset, math::probability::weighted_entropy, spatial::grid::GridModel,
};

/// Undecided cell picked for the next commitment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellChoice {
    /// World position of the cell
    pub position: [i32; 2],
    /// Shannon entropy of its weighted possibilities
    pub entropy: f64,
    /// Number of tiles still possible there
    pub candidates: usize,
}

/// Shannon entropy of a possibility set under the tile weights
pub fn cell_entropy(set: &TileBitset, weights: &[f64]) -> f64 {
    weighted_entropy(
        set.iter()
            .map(|tile| weights.get(tile).copied().unwrap_or(0.0)),
    )
}

/// Candidate tiles of a set paired with their weights, in index order
pub fn candidate_weights(set: &TileBitset, weights: &[f64]) -> (Vec<usize>, Vec<f64>) {
    set.iter()
        .map(|tile| (tile, weights.get(tile).copied().unwrap_or(0.0)))
        .unzip()
}

/// Choose the undecided cell with the lowest entropy
///
/// Cells are scanned row by row and only a strictly lower entropy replaces
/// the current best, so ties always go to the earliest position. A cell with
/// a single possibility is returned as soon as it is met. Cells with empty
/// sets are skipped; callers detect contradictions before selecting.
pub fn select_min_entropy_cell(grid: &GridModel<'_>, weights: &[f64]) -> Option<CellChoice> {
    let mut best: Option<CellChoice> = None;

    for position in grid.positions() {
        let Some(set) = grid.possibilities_at(position) else {
            continue;
        };

        let candidates = set.count();
        if candidates == 0 {
            continue;
        }
        if candidates == 1 {
            return Some(CellChoice {
                position,
                entropy: 0.0,
                candidates,
            });
        }

        let entropy = cell_entropy(set, weights);
        if best.is_none_or(|current| entropy < current.entropy) {
            best = Some(CellChoice {
                position,
                entropy,
                candidates,
            });
        }
    }

    best
}
