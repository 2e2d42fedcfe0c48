//! Input/output, configuration and error handling

/// Command-line interface and batch file processing
pub mod cli;
/// Algorithm constants and runtime defaults
pub mod configuration;
/// Error types and helpers
pub mod error;
/// Plain-text chain and lattice formats
pub mod lattice;
/// Progress bars for batch runs
pub mod progress;
