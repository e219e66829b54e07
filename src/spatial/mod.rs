//! Spatial data structures and the tile model
//!
//! This module contains spatial-related functionality including:
//! - Tile values and structural validation
//! - Grid topologies and their catalogues
//! - The validated tile registry
//! - Grid state management

/// Bounded grid of superposed or committed cells
pub mod grid;
/// Validated, rotation-expanded tile catalogue
pub mod registry;
/// Tile values and validity checks
pub mod tiles;
/// Topology capability trait and the Cartesian grid
pub mod tileset;

pub use grid::GridModel;
pub use registry::TileRegistry;
