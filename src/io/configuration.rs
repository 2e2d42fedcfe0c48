//! Algorithm constants and runtime configuration defaults

/// Label stored in grid cells that hold no vertex
pub const EMPTY_CELL: usize = 0;

/// Sides of a square lattice cell, and so the largest legal vertex degree
pub const MAX_LATTICE_DEGREE: usize = 4;

/// Smallest discovery count at which a vertex is considered for deduction
pub const MIN_DEDUCTION_DEGREE: usize = 2;

// Safety limit on the (2N-1)^2 grid and the N^2 distance table
/// Maximum number of vertices accepted by a single reconstruction
pub const MAX_CHAIN_LENGTH: usize = 1_024;

// Default values for configurable parameters
/// Alternatives the search may try before giving up
pub const DEFAULT_MAX_BRANCHES: usize = 100_000;

/// Control-loop passes allowed across the whole search
pub const DEFAULT_MAX_PASSES: usize = 1_000_000;

// Walk generation
/// Restarts allowed when a random walk traps itself
pub const RANDOM_WALK_ATTEMPTS: usize = 10_000;
/// Longest walk the CLI enumerates exhaustively
pub const MAX_ENUMERATED_LENGTH: usize = 12;

// Progress bar display settings
/// Maximum number of individual file progress bars shown simultaneously
pub const MAX_INDIVIDUAL_PROGRESS_BARS: usize = 5;
/// Width of progress bars in characters
pub const PROGRESS_BAR_WIDTH: u16 = 30;

// Output settings
/// Suffix added to output filenames
pub const OUTPUT_SUFFIX: &str = "_result";
/// Extension of input and output files
pub const TEXT_EXTENSION: &str = "txt";
