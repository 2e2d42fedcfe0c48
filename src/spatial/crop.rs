//! Bounding box cropping and verification of finished embeddings

use ndarray::Array2;

use crate::graph::{AdjacencyModel, Vertex, VertexSet};
use crate::io::configuration::EMPTY_CELL;
use crate::io::error::{Malformation, ReconstructionError, Result};
use crate::spatial::Coordinate;

/// Axis-aligned bounding box of occupied cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    /// Minimum cell (inclusive)
    pub min: Coordinate,
    /// Maximum cell (inclusive)
    pub max: Coordinate,
}

impl BoundingBox {
    /// Box size as `(rows, cols)`
    pub const fn dimensions(&self) -> (usize, usize) {
        (self.max[0] - self.min[0] + 1, self.max[1] - self.min[1] + 1)
    }
}

/// Smallest box containing every occupied cell, `None` for an empty grid
pub fn bounding_box(cells: &Array2<Vertex>) -> Option<BoundingBox> {
    cells
        .indexed_iter()
        .filter(|&(_, &vertex)| vertex != EMPTY_CELL)
        .fold(None, |bounds, ((row, col), _)| {
            Some(bounds.map_or(
                BoundingBox {
                    min: [row, col],
                    max: [row, col],
                },
                |b: BoundingBox| BoundingBox {
                    min: [b.min[0].min(row), b.min[1].min(col)],
                    max: [b.max[0].max(row), b.max[1].max(col)],
                },
            ))
        })
}

/// Minimal sub-grid containing all placed vertices
///
/// An empty grid crops to a `0 x 0` array. Cropping is idempotent.
pub fn crop(cells: &Array2<Vertex>) -> Array2<Vertex> {
    bounding_box(cells).map_or_else(
        || Array2::from_elem((0, 0), EMPTY_CELL),
        |b| {
            Array2::from_shape_fn(b.dimensions(), |(row, col)| {
                cells
                    .get([b.min[0] + row, b.min[1] + col])
                    .copied()
                    .unwrap_or(EMPTY_CELL)
            })
        },
    )
}

/// Orthogonal contacts between occupied cells, each once as `(low, high)`, sorted
pub fn embedding_edges(cells: &Array2<Vertex>) -> Vec<(Vertex, Vertex)> {
    let mut edges = Vec::new();
    for ((row, col), &vertex) in cells.indexed_iter() {
        if vertex == EMPTY_CELL {
            continue;
        }
        for next in [[row + 1, col], [row, col + 1]] {
            if let Some(&other) = cells.get(next).filter(|&&other| other != EMPTY_CELL) {
                edges.push((vertex.min(other), vertex.max(other)));
            }
        }
    }
    edges.sort_unstable();
    edges
}

/// Check that a grid embeds exactly the model: every vertex once, and
/// orthogonal contacts equal to the declared edges
///
/// # Errors
///
/// Returns `MalformedInput` if a label is repeated, unknown or absent, and
/// `EmbeddingMismatch` listing missing and spurious contacts otherwise.
pub fn verify_embedding(model: &AdjacencyModel, cells: &Array2<Vertex>) -> Result<()> {
    let mut seen = VertexSet::with_capacity(model.len());
    for &vertex in cells.iter().filter(|&&vertex| vertex != EMPTY_CELL) {
        if vertex > model.len() {
            return Err(Malformation::UnknownLabel(vertex).into());
        }
        if !seen.insert(vertex) {
            return Err(Malformation::RepeatedLabel(vertex).into());
        }
    }
    if let Some(absent) = model.vertices().find(|&vertex| !seen.contains(vertex)) {
        return Err(Malformation::MissingVertex(absent).into());
    }

    let declared = model.edges();
    let embedded = embedding_edges(cells);
    let missing: Vec<_> = declared
        .iter()
        .filter(|edge| embedded.binary_search(edge).is_err())
        .copied()
        .collect();
    let spurious: Vec<_> = embedded
        .iter()
        .filter(|edge| declared.binary_search(edge).is_err())
        .copied()
        .collect();

    if missing.is_empty() && spurious.is_empty() {
        Ok(())
    } else {
        Err(ReconstructionError::EmbeddingMismatch { missing, spurious })
    }
}
