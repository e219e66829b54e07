//! Bounded grid of superposed or committed cells
//!
//! Cells are stored row-major in an `ndarray` matrix; world coordinates
//! `(x, y)` map to `[y - y_min, x - x_min]`. Bounds never change after
//! construction.

use ndarray::Array2;

use crate::algorithm::bitset::TileBitset;
use crate::io::configuration::MAX_GRID_DIMENSION;
use crate::io::error::{AlgorithmError, Result, invalid_parameter};
use crate::spatial::registry::TileRegistry;

/// Inclusive axis-aligned bounds in world coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    /// Minimum `[x, y]` (inclusive)
    pub min: [i32; 2],
    /// Maximum `[x, y]` (inclusive)
    pub max: [i32; 2],
}

impl Bounds {
    /// Create bounds, rejecting inverted or oversized ranges
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A minimum exceeds its maximum (`DegenerateBounds`)
    /// - Either side is longer than `MAX_GRID_DIMENSION` (`InvalidParameter`)
    pub fn new(x_min: i32, y_min: i32, x_max: i32, y_max: i32) -> Result<Self> {
        for (axis, min, max) in [("x", x_min, x_max), ("y", y_min, y_max)] {
            if min > max {
                return Err(AlgorithmError::DegenerateBounds { axis, min, max });
            }
            let span = i64::from(max) - i64::from(min) + 1;
            if span > MAX_GRID_DIMENSION as i64 {
                return Err(invalid_parameter(
                    "bounds",
                    &format!("{min}..={max}"),
                    &format!("{axis} span {span} exceeds {MAX_GRID_DIMENSION}"),
                ));
            }
        }

        Ok(Self {
            min: [x_min, y_min],
            max: [x_max, y_max],
        })
    }

    /// Check if a position is within the bounds
    pub const fn contains(&self, pos: [i32; 2]) -> bool {
        pos[0] >= self.min[0]
            && pos[0] <= self.max[0]
            && pos[1] >= self.min[1]
            && pos[1] <= self.max[1]
    }

    /// Number of columns
    pub const fn width(&self) -> usize {
        (self.max[0] - self.min[0] + 1) as usize
    }

    /// Number of rows
    pub const fn height(&self) -> usize {
        (self.max[1] - self.min[1] + 1) as usize
    }

    /// Total number of cells
    pub const fn cell_count(&self) -> usize {
        self.width() * self.height()
    }

    /// Every position, row by row
    pub fn positions(&self) -> impl Iterator<Item = [i32; 2]> + use<> {
        let [x_min, y_min] = self.min;
        let [x_max, y_max] = self.max;
        (y_min..=y_max).flat_map(move |y| (x_min..=x_max).map(move |x| [x, y]))
    }
}

/// State of one grid cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    /// Still-possible tiles; empty means contradiction
    Undecided(TileBitset),
    /// Index of the tile the cell is committed to
    Committed(usize),
}

impl Cell {
    /// Whether the cell holds a committed tile
    pub const fn is_committed(&self) -> bool {
        matches!(self, Self::Committed(_))
    }

    /// Possibility set of an undecided cell
    pub const fn possibilities(&self) -> Option<&TileBitset> {
        match self {
            Self::Undecided(set) => Some(set),
            Self::Committed(_) => None,
        }
    }

    /// Committed tile index
    pub const fn committed_tile(&self) -> Option<usize> {
        match self {
            Self::Committed(tile) => Some(*tile),
            Self::Undecided(_) => None,
        }
    }

    /// Whether the cell is undecided with nothing left to choose from
    pub fn is_contradiction(&self) -> bool {
        self.possibilities().is_some_and(TileBitset::is_empty)
    }
}

/// Grid of cells bound to the registry that initialised it
#[derive(Clone)]
pub struct GridModel<'r> {
    registry: &'r TileRegistry,
    bounds: Bounds,
    cells: Array2<Cell>,
}

impl<'r> GridModel<'r> {
    /// Create a grid whose every cell may still take any registry tile
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if the registry holds no tiles
    pub fn new(bounds: Bounds, registry: &'r TileRegistry) -> Result<Self> {
        if registry.is_empty() {
            return Err(invalid_parameter(
                "registry",
                &registry.len(),
                &"registry holds no tiles",
            ));
        }

        let cells = Array2::from_elem(
            (bounds.height(), bounds.width()),
            Cell::Undecided(registry.full_set()),
        );

        Ok(Self {
            registry,
            bounds,
            cells,
        })
    }

    /// Registry the grid draws tiles from
    pub const fn registry(&self) -> &'r TileRegistry {
        self.registry
    }

    /// Grid bounds
    pub const fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Check if a position lies in the grid
    pub const fn in_bounds(&self, pos: [i32; 2]) -> bool {
        self.bounds.contains(pos)
    }

    fn index(&self, pos: [i32; 2]) -> Option<[usize; 2]> {
        self.in_bounds(pos).then(|| {
            [
                (pos[1] - self.bounds.min[1]) as usize,
                (pos[0] - self.bounds.min[0]) as usize,
            ]
        })
    }

    /// Cell at a position
    pub fn cell(&self, pos: [i32; 2]) -> Option<&Cell> {
        self.index(pos).and_then(|index| self.cells.get(index))
    }

    /// Replace the cell at a position, returning whether it was in bounds
    pub fn set_cell(&mut self, pos: [i32; 2], cell: Cell) -> bool {
        match self.index(pos).and_then(|index| self.cells.get_mut(index)) {
            Some(slot) => {
                *slot = cell;
                true
            }
            None => false,
        }
    }

    /// Commit a cell to a tile index
    pub fn commit(&mut self, pos: [i32; 2], tile: usize) -> bool {
        self.set_cell(pos, Cell::Committed(tile))
    }

    /// Commit a cell to a named tile before solving
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The position is outside the bounds (`OutOfBounds`)
    /// - The registry has no tile of that name (`UnknownTile`)
    pub fn pin(&mut self, pos: [i32; 2], tile_name: &str) -> Result<()> {
        let tile = self
            .registry
            .index_of(tile_name)
            .ok_or_else(|| AlgorithmError::UnknownTile {
                name: tile_name.to_string(),
            })?;
        if self.commit(pos, tile) {
            Ok(())
        } else {
            Err(AlgorithmError::OutOfBounds { position: pos })
        }
    }

    /// Narrow an undecided cell to its intersection with `allowed`
    ///
    /// Returns `Some(true)` if the set shrank, `Some(false)` if it was
    /// unchanged or committed, and `None` for positions outside the grid.
    pub fn restrict(&mut self, pos: [i32; 2], allowed: &TileBitset) -> Option<bool> {
        let index = self.index(pos)?;
        match self.cells.get_mut(index)? {
            Cell::Undecided(set) => {
                let before = set.count();
                set.intersect_with(allowed);
                Some(set.count() < before)
            }
            Cell::Committed(_) => Some(false),
        }
    }

    /// Possibility set of an undecided cell
    pub fn possibilities_at(&self, pos: [i32; 2]) -> Option<&TileBitset> {
        self.cell(pos).and_then(Cell::possibilities)
    }

    /// Committed tile index at a position
    pub fn tile_at(&self, pos: [i32; 2]) -> Option<usize> {
        self.cell(pos).and_then(Cell::committed_tile)
    }

    /// Committed tile name at a position
    pub fn tile_name_at(&self, pos: [i32; 2]) -> Option<&'r str> {
        let registry = self.registry;
        self.tile_at(pos)
            .and_then(|tile| registry.tile(tile))
            .map(crate::spatial::tiles::Tile::name)
    }

    /// Position one step away in a registry direction, if still in bounds
    pub fn neighbour(&self, pos: [i32; 2], direction: usize) -> Option<[i32; 2]> {
        let [dx, dy] = self.registry.offset(direction)?;
        let next = [pos[0].checked_add(dx)?, pos[1].checked_add(dy)?];
        self.in_bounds(next).then_some(next)
    }

    /// Every position, row by row
    pub fn positions(&self) -> impl Iterator<Item = [i32; 2]> + use<> {
        self.bounds.positions()
    }

    /// Number of committed cells
    pub fn committed_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_committed()).count()
    }

    /// Number of undecided cells
    pub fn undecided_count(&self) -> usize {
        self.cells.len() - self.committed_count()
    }

    /// Whether every cell is committed
    pub fn is_solved(&self) -> bool {
        self.cells.iter().all(Cell::is_committed)
    }

    /// First undecided cell with an empty possibility set, row by row
    pub fn first_contradiction(&self) -> Option<[i32; 2]> {
        self.positions()
            .find(|&pos| self.cell(pos).is_some_and(Cell::is_contradiction))
    }

    /// Copy of every cell, for later restoration
    pub fn snapshot(&self) -> Array2<Cell> {
        self.cells.clone()
    }

    /// Restore cells captured by `snapshot`
    ///
    /// Snapshots of a different shape are ignored and reported as `false`.
    pub fn restore(&mut self, cells: Array2<Cell>) -> bool {
        if cells.dim() == self.cells.dim() {
            self.cells = cells;
            true
        } else {
            false
        }
    }

    /// Committed tile names row by row, `None` for undecided cells
    pub fn rows(&self) -> Vec<Vec<Option<&'r str>>> {
        let [x_min, y_min] = self.bounds.min;
        let [x_max, y_max] = self.bounds.max;
        (y_min..=y_max)
            .map(|y| (x_min..=x_max).map(|x| self.tile_name_at([x, y])).collect())
            .collect()
    }
}
