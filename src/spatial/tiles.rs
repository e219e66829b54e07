//! Tile values and structural validation
//!
//! A tile is an immutable description of one placeable variant: its name,
//! orientation, selection weight and the edge label carried on each side.
//! Rotation and renaming always produce new values.

use crate::io::configuration::DEFAULT_TILE_WEIGHT;
use crate::io::error::{Result, invalid_tile};
use crate::spatial::tileset::Tileset;
use std::collections::BTreeMap;
use std::fmt;

/// Orientation of a tile in degrees
pub type Angle = u16;

/// Opaque compatibility key carried on one side of a tile
///
/// Two facing sides are compatible when they carry equal labels.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeLabel(Vec<String>);

impl EdgeLabel {
    /// Build a label from its ordered parts
    pub fn new<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(parts.into_iter().map(Into::into).collect())
    }

    /// Ordered parts of the label
    pub fn parts(&self) -> &[String] {
        &self.0
    }

    /// Whether the label has no parts
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for EdgeLabel {
    fn from(part: &str) -> Self {
        Self(vec![part.to_string()])
    }
}

impl fmt::Display for EdgeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, part) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "\"{part}\"")?;
        }
        write!(f, ")")
    }
}

/// One tile variant
#[derive(Clone, Debug, PartialEq)]
pub struct Tile {
    name: String,
    angle: Option<Angle>,
    weight: f64,
    sides: BTreeMap<String, EdgeLabel>,
    properties: BTreeMap<String, String>,
    rotations: Option<Vec<Angle>>,
}

impl Tile {
    /// Create a non-rotatable tile with default weight and no sides
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            angle: None,
            weight: DEFAULT_TILE_WEIGHT,
            sides: BTreeMap::new(),
            properties: BTreeMap::new(),
            rotations: None,
        }
    }

    /// Set the label carried on one side
    #[must_use]
    pub fn with_side(mut self, direction: impl Into<String>, label: impl Into<EdgeLabel>) -> Self {
        self.sides.insert(direction.into(), label.into());
        self
    }

    /// Set the same label on every listed side
    #[must_use]
    pub fn with_sides<'a>(
        mut self,
        directions: impl IntoIterator<Item = &'a str>,
        label: &EdgeLabel,
    ) -> Self {
        for direction in directions {
            self.sides.insert(direction.to_string(), label.clone());
        }
        self
    }

    /// Set the selection weight
    #[must_use]
    pub const fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Make the tile rotatable, declaring its current angle and allowed angles
    #[must_use]
    pub fn with_rotations(mut self, angle: Angle, rotations: impl IntoIterator<Item = Angle>) -> Self {
        self.angle = Some(angle);
        self.rotations = Some(rotations.into_iter().collect());
        self
    }

    /// Attach an opaque metadata entry
    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Copy of this tile under another name
    #[must_use]
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }

    /// Copy of this tile with replaced sides and orientation
    #[must_use]
    pub fn reoriented(&self, sides: BTreeMap<String, EdgeLabel>, angle: Angle) -> Self {
        Self {
            sides,
            angle: Some(angle),
            ..self.clone()
        }
    }

    /// Unique tile name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current orientation, absent for non-rotatable tiles
    pub const fn angle(&self) -> Option<Angle> {
        self.angle
    }

    /// Selection weight
    pub const fn weight(&self) -> f64 {
        self.weight
    }

    /// Label carried on each side, keyed by direction
    pub const fn sides(&self) -> &BTreeMap<String, EdgeLabel> {
        &self.sides
    }

    /// Label carried on one side
    pub fn side(&self, direction: &str) -> Option<&EdgeLabel> {
        self.sides.get(direction)
    }

    /// Opaque metadata, ignored by the solver
    pub const fn properties(&self) -> &BTreeMap<String, String> {
        &self.properties
    }

    /// Angles this tile may be instantiated at
    pub fn rotations(&self) -> Option<&[Angle]> {
        self.rotations.as_deref()
    }

    /// Name given to the variant of a base tile at an angle
    pub fn variant_name(base: &str, angle: Angle) -> String {
        format!("{base}_{angle}")
    }
}

/// Check a tile against the structural rules of a topology
///
/// # Errors
///
/// Returns `InvalidTile` describing the first failed check:
/// - empty name or empty sides
/// - a side keyed by a direction the topology does not know
/// - a topology direction with no side
/// - an empty edge label
/// - a weight that is not a positive finite number
/// - inconsistent rotation data
pub fn validate_tile(tile: &Tile, tileset: &dyn Tileset) -> Result<()> {
    if tile.name.is_empty() {
        return Err(invalid_tile(&tile.name, &"name is empty"));
    }

    if tile.sides.is_empty() {
        return Err(invalid_tile(&tile.name, &"tile has no sides"));
    }

    for (direction, label) in &tile.sides {
        if !tileset.directions().iter().any(|known| *known == direction) {
            return Err(invalid_tile(
                &tile.name,
                &format!("side '{direction}' is not a direction of this topology"),
            ));
        }
        if label.is_empty() || label.parts().iter().any(String::is_empty) {
            return Err(invalid_tile(
                &tile.name,
                &format!("side '{direction}' carries an empty edge label"),
            ));
        }
    }

    if let Some(missing) = tileset
        .directions()
        .iter()
        .find(|direction| !tile.sides.contains_key(**direction))
    {
        return Err(invalid_tile(
            &tile.name,
            &format!("side '{missing}' is not defined"),
        ));
    }

    if !tile.weight.is_finite() || tile.weight <= 0.0 {
        return Err(invalid_tile(
            &tile.name,
            &format!("weight {} is not a positive number", tile.weight),
        ));
    }

    match (&tile.rotations, tile.angle) {
        (None, None) => {}
        (None, Some(angle)) => {
            return Err(invalid_tile(
                &tile.name,
                &format!("angle {angle} given for a tile without rotations"),
            ));
        }
        (Some(_), None) => {
            return Err(invalid_tile(&tile.name, &"rotatable tile has no angle"));
        }
        (Some(rotations), Some(angle)) => {
            if !tileset.is_valid_angle(angle) {
                return Err(invalid_tile(
                    &tile.name,
                    &format!("angle {angle} is not valid for this topology"),
                ));
            }
            if let Some(bad) = rotations.iter().find(|a| !tileset.is_valid_angle(**a)) {
                return Err(invalid_tile(
                    &tile.name,
                    &format!("rotation {bad} is not valid for this topology"),
                ));
            }
        }
    }

    Ok(())
}

/// Pure validity predicate over a tile
pub fn is_valid_tile(tile: &Tile, tileset: &dyn Tileset) -> bool {
    validate_tile(tile, tileset).is_ok()
}
