//! Adjacency model of a folded chain and vertex bookkeeping

/// Validated adjacency lists and derived graph distances
pub mod adjacency;
/// Fixed-capacity vertex bitset
pub mod vertex_set;

pub use adjacency::AdjacencyModel;
pub use vertex_set::VertexSet;

/// Chain unit identifier, `1..=N`
pub type Vertex = usize;
