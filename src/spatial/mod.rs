//! Spatial data structures for lattice reconstruction
//!
//! This module contains spatial-related functionality including:
//! - The fixed-size grid with its vertex position index
//! - The fringe of empty cells still awaiting neighbours
//! - Cropping and verification of finished embeddings
//! - Self-avoiding walk generation

/// Bounding box cropping and embedding verification
pub mod crop;
/// Incrementally maintained fringe of candidate cells
pub mod fringe;
/// Grid state and vertex position index
pub mod grid;
/// Self-avoiding walk enumeration and sampling
pub mod walk;

pub use fringe::Fringe;
pub use grid::LatticeGrid;

/// Grid cell as `[row, col]`
pub type Coordinate = [usize; 2];
