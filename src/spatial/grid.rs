//! Grid state and vertex position index
//!
//! The grid is allocated once per reconstruction at `(2N-1) x (2N-1)`, the
//! widest span an N-vertex chain can reach from a centred first vertex in any
//! direction. Cells hold vertex labels with 0 for empty. The position index is
//! the inverse mapping and the two are only ever updated together.

use ndarray::Array2;

use crate::graph::Vertex;
use crate::io::configuration::EMPTY_CELL;
use crate::io::error::{Result, invalid_parameter};
use crate::spatial::Coordinate;

/// Row/column offsets of the four orthogonal neighbours, in ascending cell order
const ORTHOGONAL_OFFSETS: [[isize; 2]; 4] = [[-1, 0], [0, -1], [0, 1], [1, 0]];

/// In-bounds orthogonal neighbours of a cell, in ascending `(row, col)` order
pub fn orthogonal_neighbors(
    cell: Coordinate,
    dimensions: (usize, usize),
) -> impl Iterator<Item = Coordinate> {
    ORTHOGONAL_OFFSETS
        .into_iter()
        .filter_map(move |[row_step, col_step]| {
            let row = cell[0].checked_add_signed(row_step)?;
            let col = cell[1].checked_add_signed(col_step)?;
            (row < dimensions.0 && col < dimensions.1).then_some([row, col])
        })
}

/// Manhattan distance between two cells
pub const fn manhattan_distance(a: Coordinate, b: Coordinate) -> usize {
    a[0].abs_diff(b[0]) + a[1].abs_diff(b[1])
}

/// Check whether two cells share a side
pub const fn are_orthogonal(a: Coordinate, b: Coordinate) -> bool {
    manhattan_distance(a, b) == 1
}

/// Fixed-size lattice with a bidirectional vertex/cell index
#[derive(Debug, Clone)]
pub struct LatticeGrid {
    /// Vertex label per cell, `EMPTY_CELL` when vacant
    cells: Array2<Vertex>,
    /// Committed cell per vertex, indexed by `vertex - 1`
    positions: Vec<Option<Coordinate>>,
    /// Number of vertices holding a cell
    placed_count: usize,
}

impl LatticeGrid {
    /// Create an empty grid of the given size for vertices `1..=vertex_count`
    pub fn new(rows: usize, cols: usize, vertex_count: usize) -> Self {
        Self {
            cells: Array2::from_elem((rows, cols), EMPTY_CELL),
            positions: vec![None; vertex_count],
            placed_count: 0,
        }
    }

    /// Create the square grid sized for a chain of `length` vertices
    pub fn for_chain(length: usize) -> Self {
        let side = (2 * length).saturating_sub(1).max(1);
        Self::new(side, side, length)
    }

    /// Grid dimensions as `(rows, cols)`
    pub fn dimensions(&self) -> (usize, usize) {
        self.cells.dim()
    }

    /// Middle cell, where the first vertex is seeded
    pub fn center(&self) -> Coordinate {
        let (rows, cols) = self.dimensions();
        [rows / 2, cols / 2]
    }

    /// Vertex occupying a cell, `None` if empty or out of bounds
    pub fn occupant(&self, cell: Coordinate) -> Option<Vertex> {
        self.cells
            .get(cell)
            .copied()
            .filter(|&vertex| vertex != EMPTY_CELL)
    }

    /// Check that a cell lies inside the grid and holds no vertex
    pub fn is_vacant(&self, cell: Coordinate) -> bool {
        self.cells.get(cell) == Some(&EMPTY_CELL)
    }

    /// Committed cell of a vertex
    pub fn position(&self, vertex: Vertex) -> Option<Coordinate> {
        vertex
            .checked_sub(1)
            .and_then(|index| self.positions.get(index).copied().flatten())
    }

    /// Number of vertices that hold a cell
    pub const fn placed_count(&self) -> usize {
        self.placed_count
    }

    /// Check whether every vertex has been placed
    pub fn is_complete(&self) -> bool {
        self.placed_count == self.positions.len()
    }

    /// Commit `vertex` to `cell` in both directions
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if the cell is occupied or outside the grid,
    /// or if the vertex is unknown or already placed.
    pub fn place(&mut self, vertex: Vertex, cell: Coordinate) -> Result<()> {
        if !self.is_vacant(cell) {
            return Err(invalid_parameter(
                "cell",
                &format!("{cell:?}"),
                &"cell is occupied or outside the grid",
            ));
        }

        let slot = vertex
            .checked_sub(1)
            .and_then(|index| self.positions.get_mut(index))
            .filter(|slot| slot.is_none())
            .ok_or_else(|| {
                invalid_parameter("vertex", &vertex, &"vertex is unknown or already placed")
            })?;
        *slot = Some(cell);

        if let Some(entry) = self.cells.get_mut(cell) {
            *entry = vertex;
        }
        self.placed_count += 1;
        Ok(())
    }

    /// Clear the cell held by `vertex`, returning it
    ///
    /// `None` if the vertex is unknown or not placed.
    pub fn remove(&mut self, vertex: Vertex) -> Option<Coordinate> {
        let cell = vertex
            .checked_sub(1)
            .and_then(|index| self.positions.get_mut(index))
            .and_then(Option::take)?;

        if let Some(entry) = self.cells.get_mut(cell) {
            *entry = EMPTY_CELL;
        }
        self.placed_count -= 1;
        Some(cell)
    }

    /// In-bounds orthogonal neighbours of a cell
    pub fn neighbors(&self, cell: Coordinate) -> impl Iterator<Item = Coordinate> + use<> {
        orthogonal_neighbors(cell, self.dimensions())
    }

    /// Occupied orthogonal neighbours of a cell with their vertices
    pub fn occupied_neighbors(
        &self,
        cell: Coordinate,
    ) -> impl Iterator<Item = (Coordinate, Vertex)> + '_ {
        self.neighbors(cell)
            .filter_map(|next| self.occupant(next).map(|vertex| (next, vertex)))
    }

    /// Empty orthogonal neighbours of a cell
    pub fn vacant_neighbors(&self, cell: Coordinate) -> impl Iterator<Item = Coordinate> + '_ {
        self.neighbors(cell).filter(|&next| self.is_vacant(next))
    }

    /// Raw label array
    pub const fn cells(&self) -> &Array2<Vertex> {
        &self.cells
    }
}
