//! Mathematical utilities for the solver

/// Entropy over selection weights
pub mod probability;
