use std::collections::BTreeSet;

use crate::graph::{AdjacencyModel, Vertex};
use crate::spatial::{Coordinate, LatticeGrid};

/// Empty cells bordering at least one placed vertex that still lacks neighbours
///
/// Kept in a `BTreeSet` so iteration runs in ascending `(row, col)` order and
/// every search over the fringe is reproducible.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fringe {
    cells: BTreeSet<Coordinate>,
}

impl Fringe {
    /// Create an empty fringe
    pub fn new() -> Self {
        Self::default()
    }

    /// Test fringe membership
    pub fn contains(&self, cell: Coordinate) -> bool {
        self.cells.contains(&cell)
    }

    /// Fringe cells in ascending order
    pub fn iter(&self) -> impl Iterator<Item = Coordinate> + '_ {
        self.cells.iter().copied()
    }

    /// Pairs of orthogonally adjacent fringe cells
    ///
    /// The first cell ascends over the fringe, the second over its neighbours,
    /// so each unordered pair appears twice with the roles swapped.
    pub fn adjacent_pairs<'a>(
        &'a self,
        grid: &'a LatticeGrid,
    ) -> impl Iterator<Item = (Coordinate, Coordinate)> + 'a {
        self.iter().flat_map(move |first| {
            grid.neighbors(first)
                .filter(move |&second| self.contains(second))
                .map(move |second| (first, second))
        })
    }

    /// Update membership after `cell` was filled or cleared
    ///
    /// Only the cell itself and cells bordering it or one of its placed
    /// neighbours can change state, so exactly those are re-examined.
    pub fn refresh_around(&mut self, cell: Coordinate, grid: &LatticeGrid, model: &AdjacencyModel) {
        self.refresh_cell(cell, grid, model);

        let mut anchors = vec![cell];
        anchors.extend(grid.occupied_neighbors(cell).map(|(next, _)| next));

        for anchor in anchors {
            for candidate in grid.vacant_neighbors(anchor) {
                self.refresh_cell(candidate, grid, model);
            }
        }
    }

    fn refresh_cell(&mut self, cell: Coordinate, grid: &LatticeGrid, model: &AdjacencyModel) {
        let borders_open_vertex = grid.is_vacant(cell)
            && grid
                .occupied_neighbors(cell)
                .any(|(next, vertex)| needs_neighbors(grid, model, next, vertex));

        if borders_open_vertex {
            self.cells.insert(cell);
        } else {
            self.cells.remove(&cell);
        }
    }
}

/// Check whether a placed vertex has fewer occupied sides than declared neighbours
pub fn needs_neighbors(
    grid: &LatticeGrid,
    model: &AdjacencyModel,
    cell: Coordinate,
    vertex: Vertex,
) -> bool {
    grid.occupied_neighbors(cell).count() < model.degree(vertex)
}
