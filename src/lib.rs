//! Edge-constrained tile grid generation using wave function collapse
//!
//! Tiles carry a label on each side; two tiles may touch only where their
//! facing labels agree. The solver keeps every undecided cell as a set of
//! still-possible tiles, repeatedly commits the least uncertain cell and
//! propagates the consequences until the grid is complete or contradictory.

#![forbid(unsafe_code)]

/// Core solver: selection, propagation, recovery and execution
pub mod algorithm;
/// Input/output operations, configuration and error handling
pub mod io;
/// Entropy utilities
pub mod math;
/// Tiles, topologies, registry and grid model
pub mod spatial;

pub use algorithm::executor::{Solver, SolverConfig, StepOutcome, StepStatus};
pub use io::error::{AlgorithmError, Result};
