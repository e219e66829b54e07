//! Grid topologies and their tile catalogues
//!
//! A topology knows its directions, which direction faces which, how a tile
//! rotates, and which canonical tiles it offers. Registry construction and
//! the solver only talk to topologies through the `Tileset` trait.

use crate::io::error::{AlgorithmError, Result};
use crate::spatial::tiles::{Angle, EdgeLabel, Tile};
use std::collections::BTreeMap;

/// Direction towards decreasing y
pub const NORTH: &str = "north";
/// Direction towards increasing x
pub const EAST: &str = "east";
/// Direction towards increasing y
pub const SOUTH: &str = "south";
/// Direction towards decreasing x
pub const WEST: &str = "west";

/// Cartesian directions in clockwise order starting at north
pub const CARTESIAN_DIRECTIONS: [&str; 4] = [NORTH, EAST, SOUTH, WEST];

/// Angles a Cartesian tile may take
pub const CARTESIAN_ANGLES: [Angle; 4] = [0, 90, 180, 270];

/// Capability set implemented once per grid topology
pub trait Tileset {
    /// Short identifier of the topology
    fn name(&self) -> &'static str;

    /// Canonical tile catalogue, before rotation expansion
    fn all(&self) -> Vec<Tile>;

    /// Every direction of the topology, in a fixed order
    fn directions(&self) -> &[&'static str];

    /// Direction facing the given one from a neighbouring cell
    ///
    /// # Errors
    ///
    /// Returns `UnknownDirection` if the direction is not part of the topology
    fn complement(&self, direction: &str) -> Result<&'static str>;

    /// Grid step `[dx, dy]` taken when moving in a direction
    ///
    /// # Errors
    ///
    /// Returns `UnknownDirection` if the direction is not part of the topology
    fn offset(&self, direction: &str) -> Result<[i32; 2]>;

    /// Whether an angle is meaningful for this topology
    fn is_valid_angle(&self, angle: Angle) -> bool;

    /// Re-express a tile at another orientation
    ///
    /// # Errors
    ///
    /// Returns `InvalidRotation` if the tile does not list the target angle
    fn rotate(&self, tile: &Tile, angle: Angle) -> Result<Tile>;
}

/// Four-connected square grid
#[derive(Clone, Debug)]
pub struct Cartesian {
    catalogue: Vec<Tile>,
}

impl Default for Cartesian {
    fn default() -> Self {
        Self::pipes()
    }
}

impl Cartesian {
    /// Topology offering the given catalogue
    pub const fn new(catalogue: Vec<Tile>) -> Self {
        Self { catalogue }
    }

    /// Built-in pipe network catalogue
    ///
    /// Edges carry `"0"` (open ground) or `"1"` (pipe); every label appears
    /// on every side somewhere in the set.
    pub fn pipes() -> Self {
        let ground = EdgeLabel::from("0");
        let pipe = EdgeLabel::from("1");

        let blank = Tile::new("blank")
            .with_sides(CARTESIAN_DIRECTIONS, &ground)
            .with_weight(4.0)
            .with_property("kind", "ground");

        let straight = Tile::new("straight")
            .with_sides([NORTH, SOUTH], &pipe)
            .with_sides([EAST, WEST], &ground)
            .with_weight(2.0)
            .with_rotations(0, [0, 90])
            .with_property("kind", "pipe");

        let corner = Tile::new("corner")
            .with_sides([NORTH, EAST], &pipe)
            .with_sides([SOUTH, WEST], &ground)
            .with_rotations(0, CARTESIAN_ANGLES)
            .with_property("kind", "pipe");

        let tee = Tile::new("tee")
            .with_sides([NORTH, EAST, SOUTH], &pipe)
            .with_side(WEST, ground)
            .with_weight(0.5)
            .with_rotations(0, CARTESIAN_ANGLES)
            .with_property("kind", "junction");

        let cross = Tile::new("cross")
            .with_sides(CARTESIAN_DIRECTIONS, &pipe)
            .with_weight(0.5)
            .with_property("kind", "junction");

        Self::new(vec![blank, straight, corner, tee, cross])
    }

    fn direction_index(direction: &str) -> Result<usize> {
        CARTESIAN_DIRECTIONS
            .iter()
            .position(|known| *known == direction)
            .ok_or_else(|| AlgorithmError::UnknownDirection {
                direction: direction.to_string(),
            })
    }
}

impl Tileset for Cartesian {
    fn name(&self) -> &'static str {
        "cartesian"
    }

    fn all(&self) -> Vec<Tile> {
        self.catalogue.clone()
    }

    fn directions(&self) -> &[&'static str] {
        &CARTESIAN_DIRECTIONS
    }

    fn complement(&self, direction: &str) -> Result<&'static str> {
        match direction {
            NORTH => Ok(SOUTH),
            SOUTH => Ok(NORTH),
            EAST => Ok(WEST),
            WEST => Ok(EAST),
            _ => Err(AlgorithmError::UnknownDirection {
                direction: direction.to_string(),
            }),
        }
    }

    fn offset(&self, direction: &str) -> Result<[i32; 2]> {
        match Self::direction_index(direction)? {
            0 => Ok([0, -1]),
            1 => Ok([1, 0]),
            2 => Ok([0, 1]),
            _ => Ok([-1, 0]),
        }
    }

    fn is_valid_angle(&self, angle: Angle) -> bool {
        CARTESIAN_ANGLES.contains(&angle)
    }

    fn rotate(&self, tile: &Tile, angle: Angle) -> Result<Tile> {
        let current = tile.angle().unwrap_or(0);
        if current == angle {
            return Ok(tile.clone());
        }

        let listed = tile.rotations().is_some_and(|allowed| allowed.contains(&angle));
        if !listed || !self.is_valid_angle(angle) || !self.is_valid_angle(current) {
            return Err(AlgorithmError::InvalidRotation {
                tile: tile.name().to_string(),
                angle,
            });
        }

        // Each quarter turn moves every label one direction clockwise
        let quarter_turns = usize::from((angle + 360 - current) % 360 / 90);
        let count = CARTESIAN_DIRECTIONS.len();
        let mut sides = BTreeMap::new();
        for (i, direction) in CARTESIAN_DIRECTIONS.iter().enumerate() {
            let Some(source) = CARTESIAN_DIRECTIONS.get((i + count - quarter_turns) % count)
            else {
                continue;
            };
            if let Some(label) = tile.side(source) {
                sides.insert((*direction).to_string(), label.clone());
            }
        }

        Ok(tile.reoriented(sides, angle))
    }
}

/// Selectable topology implementations
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TilesetKind {
    /// Four-connected square grid with the built-in pipe catalogue
    #[default]
    Cartesian,
}

impl TilesetKind {
    /// Resolve a topology by name, ignoring ASCII case
    ///
    /// # Errors
    ///
    /// Returns `UnknownTileset` if no topology has that name
    pub fn from_name(name: &str) -> Result<Self> {
        if name.eq_ignore_ascii_case("cartesian") {
            Ok(Self::Cartesian)
        } else {
            Err(AlgorithmError::UnknownTileset {
                name: name.to_string(),
            })
        }
    }

    /// Name accepted by `from_name`
    pub const fn name(self) -> &'static str {
        match self {
            Self::Cartesian => "cartesian",
        }
    }

    /// Instantiate the topology with its built-in catalogue
    pub fn build(self) -> Box<dyn Tileset> {
        match self {
            Self::Cartesian => Box::new(Cartesian::pipes()),
        }
    }
}
