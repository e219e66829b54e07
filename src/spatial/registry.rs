//! Validated, rotation-expanded tile catalogue with lookup indexes
//!
//! Construction runs a fixed pipeline: structural validation, name
//! uniqueness, edge-complement closure, rotation expansion and finally index
//! building. Any failure aborts the build; no partial registry is returned.

use crate::algorithm::bitset::TileBitset;
use crate::io::error::{AlgorithmError, Result};
use crate::spatial::tiles::{EdgeLabel, Tile, validate_tile};
use crate::spatial::tileset::Tileset;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Key of the edge index: a direction and the label carried on that side
pub type EdgeKey = (String, EdgeLabel);

/// Immutable tile registry built from a topology
pub struct TileRegistry {
    tileset_name: &'static str,
    directions: Vec<&'static str>,
    offsets: Vec<[i32; 2]>,
    tiles: Vec<Tile>,
    by_name: HashMap<String, usize>,
    by_edge: BTreeMap<EdgeKey, TileBitset>,
    /// Tiles allowed as neighbour, indexed by `[tile][direction]`
    supports: Vec<Vec<TileBitset>>,
    /// Direction index facing each direction index
    opposites: Vec<usize>,
}

impl TileRegistry {
    /// Build a registry from the topology's own catalogue
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A tile fails structural validation (`InvalidTile`)
    /// - Two tiles share a name (`DuplicateName`)
    /// - A side label has no complementary carrier (`MissingComplement`)
    /// - A rotation cannot be applied (`InvalidRotation`)
    pub fn build(tileset: &dyn Tileset) -> Result<Self> {
        Self::from_tiles(tileset.all(), tileset)
    }

    /// Build a registry from an explicit raw catalogue
    ///
    /// # Errors
    ///
    /// Same failure modes as [`TileRegistry::build`]
    pub fn from_tiles(raw_tiles: Vec<Tile>, tileset: &dyn Tileset) -> Result<Self> {
        for tile in &raw_tiles {
            validate_tile(tile, tileset)?;
        }

        ensure_unique_names(&raw_tiles)?;
        ensure_complement_closure(&raw_tiles, tileset)?;

        let tiles = expand_rotations(raw_tiles, tileset)?;

        // Rotated edges must also find partners
        ensure_unique_names(&tiles)?;
        ensure_complement_closure(&tiles, tileset)?;

        let directions: Vec<&'static str> = tileset.directions().to_vec();
        let offsets = directions
            .iter()
            .map(|direction| tileset.offset(direction))
            .collect::<Result<Vec<_>>>()?;
        let opposites = directions
            .iter()
            .map(|direction| {
                let opposite = tileset.complement(direction)?;
                directions
                    .iter()
                    .position(|candidate| *candidate == opposite)
                    .ok_or_else(|| AlgorithmError::UnknownDirection {
                        direction: opposite.to_string(),
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        let by_name = tiles
            .iter()
            .enumerate()
            .map(|(index, tile)| (tile.name().to_string(), index))
            .collect();
        let by_edge = build_edge_index(&tiles);
        let supports = build_supports(&tiles, &directions, &opposites, &by_edge);

        Ok(Self {
            tileset_name: tileset.name(),
            directions,
            offsets,
            tiles,
            by_name,
            by_edge,
            supports,
            opposites,
        })
    }

    /// Name of the topology this registry was built from
    pub const fn tileset_name(&self) -> &'static str {
        self.tileset_name
    }

    /// Expanded tile list, one entry per concrete orientation
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Number of expanded tiles
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Whether the registry holds no tiles
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Tile at an index of the expanded list
    pub fn tile(&self, index: usize) -> Option<&Tile> {
        self.tiles.get(index)
    }

    /// Index of a tile by name
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    /// Tile by name
    pub fn get(&self, name: &str) -> Option<&Tile> {
        self.index_of(name).and_then(|index| self.tiles.get(index))
    }

    /// Name to index mapping
    pub const fn by_name(&self) -> &HashMap<String, usize> {
        &self.by_name
    }

    /// (direction, label) to carrier tiles mapping
    pub const fn by_edge(&self) -> &BTreeMap<EdgeKey, TileBitset> {
        &self.by_edge
    }

    /// Tiles whose side in `direction` carries `label`
    pub fn carriers(&self, direction: &str, label: &EdgeLabel) -> Option<&TileBitset> {
        self.by_edge.get(&(direction.to_string(), label.clone()))
    }

    /// Topology directions in index order
    pub fn directions(&self) -> &[&'static str] {
        &self.directions
    }

    /// Grid step `[dx, dy]` for a direction index
    pub fn offset(&self, direction: usize) -> Option<[i32; 2]> {
        self.offsets.get(direction).copied()
    }

    /// Index of the direction facing a direction index
    pub fn opposite(&self, direction: usize) -> Option<usize> {
        self.opposites.get(direction).copied()
    }

    /// Tiles that may sit next to `tile` in a direction
    pub fn supports(&self, tile: usize, direction: usize) -> Option<&TileBitset> {
        self.supports.get(tile).and_then(|per_direction| per_direction.get(direction))
    }

    /// Selection weights indexed like the tile list
    pub fn weights(&self) -> Vec<f64> {
        self.tiles.iter().map(Tile::weight).collect()
    }

    /// Every tile index as a possibility set
    pub fn full_set(&self) -> TileBitset {
        TileBitset::all(self.tiles.len())
    }
}

fn ensure_unique_names(tiles: &[Tile]) -> Result<()> {
    let mut seen = HashSet::new();
    for tile in tiles {
        if !seen.insert(tile.name()) {
            return Err(AlgorithmError::DuplicateName {
                name: tile.name().to_string(),
            });
        }
    }
    Ok(())
}

fn ensure_complement_closure(tiles: &[Tile], tileset: &dyn Tileset) -> Result<()> {
    let offered: HashSet<(&str, &EdgeLabel)> = tiles
        .iter()
        .flat_map(|tile| {
            tile.sides()
                .iter()
                .map(|(direction, label)| (direction.as_str(), label))
        })
        .collect();

    for tile in tiles {
        for (direction, label) in tile.sides() {
            let opposite = tileset.complement(direction)?;
            if !offered.contains(&(opposite, label)) {
                return Err(AlgorithmError::MissingComplement {
                    tile: tile.name().to_string(),
                    direction: direction.clone(),
                    label: label.to_string(),
                });
            }
        }
    }
    Ok(())
}

fn expand_rotations(raw_tiles: Vec<Tile>, tileset: &dyn Tileset) -> Result<Vec<Tile>> {
    let mut expanded = Vec::with_capacity(raw_tiles.len());
    for tile in raw_tiles {
        let angles = tile.rotations().map(<[_]>::to_vec).unwrap_or_default();
        if angles.is_empty() {
            expanded.push(tile);
            continue;
        }
        for angle in angles {
            let variant = tileset.rotate(&tile, angle)?;
            expanded.push(variant.renamed(Tile::variant_name(tile.name(), angle)));
        }
    }
    Ok(expanded)
}

fn build_edge_index(tiles: &[Tile]) -> BTreeMap<EdgeKey, TileBitset> {
    let mut by_edge: BTreeMap<EdgeKey, TileBitset> = BTreeMap::new();
    for (index, tile) in tiles.iter().enumerate() {
        for (direction, label) in tile.sides() {
            by_edge
                .entry((direction.clone(), label.clone()))
                .or_insert_with(|| TileBitset::new(tiles.len()))
                .insert(index);
        }
    }
    by_edge
}

fn build_supports(
    tiles: &[Tile],
    directions: &[&'static str],
    opposites: &[usize],
    by_edge: &BTreeMap<EdgeKey, TileBitset>,
) -> Vec<Vec<TileBitset>> {
    tiles
        .iter()
        .map(|tile| {
            directions
                .iter()
                .enumerate()
                .map(|(direction_index, direction)| {
                    let facing = opposites
                        .get(direction_index)
                        .and_then(|&opposite| directions.get(opposite));
                    match (tile.side(direction), facing) {
                        (Some(label), Some(facing)) => by_edge
                            .get(&((*facing).to_string(), label.clone()))
                            .cloned()
                            .unwrap_or_else(|| TileBitset::new(tiles.len())),
                        _ => TileBitset::new(tiles.len()),
                    }
                })
                .collect()
        })
        .collect()
}
