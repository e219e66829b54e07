//! Input/output, configuration and error handling

/// Command-line interface and run orchestration
pub mod cli;
/// Constants and runtime defaults
pub mod configuration;
/// Error types and context helpers
pub mod error;
/// Plain-text grid export
pub mod export;
/// Progress display for solver runs
pub mod progress;
