//! Solver constants and runtime configuration defaults

/// Fixed seed for reproducible generation
pub const DEFAULT_SEED: u64 = 42;

/// Default inclusive lower bound on both axes
pub const DEFAULT_MIN_COORDINATE: i32 = 0;

/// Default inclusive upper bound on both axes
pub const DEFAULT_MAX_COORDINATE: i32 = 9;

/// Name of the tileset used when none is requested
pub const DEFAULT_TILESET: &str = "cartesian";

/// Minimum step budget for a single attempt
pub const DEFAULT_MAX_STEPS: usize = 10_000;

/// Steps allowed per cell when the budget is derived from the grid size
pub const DEFAULT_STEPS_PER_CELL: usize = 4;

/// Default number of seeded attempts before giving up
pub const DEFAULT_MAX_ATTEMPTS: usize = 10;

/// Recovery policy used by the command line when none is requested
pub const DEFAULT_RECOVERY: &str = "backtrack";

/// Default number of backtracks allowed per attempt
pub const DEFAULT_MAX_BACKTRACKS: usize = 1_000;

// Safety limit to prevent excessive memory allocation
/// Maximum allowed grid dimension
pub const MAX_GRID_DIMENSION: usize = 10_000;

/// Default weight for tiles that do not specify one
pub const DEFAULT_TILE_WEIGHT: f64 = 1.0;

// Progress bar display settings
/// Threshold for switching to batch progress mode
pub const MAX_INDIVIDUAL_PROGRESS_BARS: usize = 5;

// Output settings
/// Placeholder written for cells that are still undecided
pub const UNDECIDED_MARKER: &str = "?";
/// Separator between tile names on an exported row
pub const EXPORT_SEPARATOR: &str = " ";

// Memory guard for memoised neighbour supports
/// Maximum number of cached support sets before the cache is reset
pub const SUPPORT_CACHE_CAPACITY: usize = 4_096;
