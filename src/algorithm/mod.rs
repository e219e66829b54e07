/// Bitset over registry tile indices for possibility sets
pub mod bitset;
/// Memoised neighbour support sets
pub mod cache;
/// Solver state machine, configuration and restart driver
pub mod executor;
/// Worklist constraint propagation to a fixed point
pub mod propagation;
/// Choice points and chronological backtracking
pub mod recovery;
/// Entropy-ordered cell selection
pub mod selection;
