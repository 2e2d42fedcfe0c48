//! Reconstruction of square-lattice embeddings of folded chains
//!
//! Given only which units of a chain touch, the engine places every unit on a
//! square grid so that orthogonal contacts on the grid are exactly the declared
//! ones. Placement is driven by deduction from already placed neighbours, with
//! pairwise fringe moves and bounded branching where nothing is forced.

#![forbid(unsafe_code)]

/// Placement engine: discovery tracking, deduction, pairwise search and control loop
pub mod algorithm;
/// Adjacency model of the chain and vertex bookkeeping
pub mod graph;
/// Input/output operations and error handling
pub mod io;
/// Grid state, fringe, cropping and walk generation
pub mod spatial;

pub use algorithm::executor::{
    Reconstruction, ReconstructionConfig, Reconstructor, reconstruct, reconstruct_with,
};
pub use graph::AdjacencyModel;
pub use io::error::{ReconstructionError, Result};
