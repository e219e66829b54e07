//! Error types and context management for registry, grid and solver operations

use std::fmt;
use std::path::PathBuf;

/// Main error type for all tile generation operations
#[derive(Debug)]
pub enum AlgorithmError {
    /// Tile failed the structural validity check
    InvalidTile {
        /// Name of the offending tile (may be empty)
        name: String,
        /// Description of the failed check
        reason: String,
    },

    /// Two tiles in the catalogue share a name
    DuplicateName {
        /// The repeated name
        name: String,
    },

    /// A tile edge has no tile carrying the same label on the opposite side
    ///
    /// Every placed edge must have at least one legal neighbour, otherwise
    /// the catalogue can never be completed around that tile.
    MissingComplement {
        /// Tile whose side lacks a complement
        tile: String,
        /// Direction of the unmatched side
        direction: String,
        /// Edge label that nothing can face
        label: String,
    },

    /// Requested rotation is not allowed for the tile
    InvalidRotation {
        /// Tile being rotated
        tile: String,
        /// Requested angle in degrees
        angle: u16,
    },

    /// Direction label is not part of the topology
    UnknownDirection {
        /// The unrecognised direction
        direction: String,
    },

    /// Grid bounds enclose no cells
    DegenerateBounds {
        /// Axis with inverted bounds
        axis: &'static str,
        /// Lower bound supplied
        min: i32,
        /// Upper bound supplied
        max: i32,
    },

    /// Tileset name does not match any known topology
    UnknownTileset {
        /// Name that was requested
        name: String,
    },

    /// Tile name is not present in the registry
    UnknownTile {
        /// Name that was requested
        name: String,
    },

    /// Position lies outside the grid bounds
    OutOfBounds {
        /// Offending world position (x, y)
        position: [i32; 2],
    },

    /// Every attempt ended without a complete grid
    Unsolved {
        /// Attempts that were run
        attempts: usize,
        /// Seed of the last attempt
        seed: u64,
        /// Whether the last attempt contradicted rather than ran out of steps
        contradiction: bool,
    },

    /// Parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

impl fmt::Display for AlgorithmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTile { name, reason } => {
                write!(f, "Invalid tile '{name}': {reason}")
            }
            Self::DuplicateName { name } => {
                write!(f, "Tile name '{name}' is used more than once")
            }
            Self::MissingComplement {
                tile,
                direction,
                label,
            } => {
                write!(
                    f,
                    "Tile '{tile}' has side {label} facing {direction} but no tile carries it on the opposite side"
                )
            }
            Self::InvalidRotation { tile, angle } => {
                write!(f, "Tile '{tile}' cannot be rotated to {angle} degrees")
            }
            Self::UnknownDirection { direction } => {
                write!(f, "Unrecognised direction '{direction}'")
            }
            Self::DegenerateBounds { axis, min, max } => {
                write!(
                    f,
                    "Degenerate bounds on {axis} axis: minimum {min} exceeds maximum {max}"
                )
            }
            Self::UnknownTileset { name } => {
                write!(f, "Unknown tileset '{name}'")
            }
            Self::UnknownTile { name } => {
                write!(f, "No tile named '{name}' in the registry")
            }
            Self::OutOfBounds { position } => {
                write!(
                    f,
                    "Position ({}, {}) lies outside the grid",
                    position[0], position[1]
                )
            }
            Self::Unsolved {
                attempts,
                seed,
                contradiction,
            } => {
                let ending = if *contradiction {
                    "a contradiction"
                } else {
                    "its step budget"
                };
                write!(
                    f,
                    "No solution after {attempts} attempt(s); the last (seed {seed}) ended with {ending}"
                )
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for AlgorithmError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::FileSystem { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for algorithm results
pub type Result<T> = std::result::Result<T, AlgorithmError>;

/// Additional context to enrich error messages
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Path involved in the failing operation
    pub path: Option<PathBuf>,
    /// Operation being performed
    pub operation: Option<&'static str>,
}

/// Enriches errors with the file state of a failing operation
pub trait WithContext<T> {
    /// Add context to a Result
    ///
    /// # Errors
    ///
    /// Propagates the original error with additional context applied
    fn with_context(self, context: ErrorContext) -> Result<T>;
}

impl<T, E> WithContext<T> for std::result::Result<T, E>
where
    E: Into<AlgorithmError>,
{
    fn with_context(self, context: ErrorContext) -> Result<T> {
        self.map_err(|e| {
            let mut error = e.into();
            if let AlgorithmError::FileSystem {
                path, operation, ..
            } = &mut error
            {
                if let Some(p) = context.path {
                    *path = p;
                }
                if let Some(op) = context.operation {
                    *operation = op;
                }
            }
            error
        })
    }
}

impl From<std::io::Error> for AlgorithmError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> AlgorithmError {
    AlgorithmError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create an invalid tile error
pub fn invalid_tile(name: &str, reason: &impl ToString) -> AlgorithmError {
    AlgorithmError::InvalidTile {
        name: name.to_string(),
        reason: reason.to_string(),
    }
}
