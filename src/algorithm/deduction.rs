use crate::algorithm::executor::ReconstructionSession;
use crate::graph::Vertex;
use crate::io::error::Conflict;
use crate::spatial::grid::are_orthogonal;
use crate::spatial::{Coordinate, LatticeGrid};

/// Outcome of trying to pin a vertex down from its placed neighbours
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Deduction {
    /// Exactly one admissible cell remains
    Unique(Coordinate),
    /// Several admissible cells remain, ascending
    Ambiguous(Vec<Coordinate>),
    /// The partial embedding cannot host the vertex
    Contradiction(Conflict),
}

/// Empty cells orthogonally adjacent to every anchor, ascending
///
/// No anchors means no constraint to intersect, which yields no cells.
pub fn common_cells(grid: &LatticeGrid, anchors: &[Coordinate]) -> Vec<Coordinate> {
    let Some((&first, rest)) = anchors.split_first() else {
        return Vec::new();
    };

    grid.vacant_neighbors(first)
        .filter(|&cell| rest.iter().all(|&anchor| are_orthogonal(anchor, cell)))
        .collect()
}

/// Intersect the free sides of each placed neighbour of `vertex`
///
/// The intersection is filtered by admissibility, so a cell touching a placed
/// non-neighbour or lying too far from some placed vertex never counts.
pub fn deduce(session: &ReconstructionSession<'_>, vertex: Vertex) -> Deduction {
    let grid = session.grid();
    let anchors: Vec<Coordinate> = session
        .discovery()
        .discovered(vertex)
        .iter()
        .filter_map(|&neighbor| grid.position(neighbor))
        .collect();

    let common = common_cells(grid, &anchors);
    if common.is_empty() {
        return Deduction::Contradiction(Conflict::NoCommonCell);
    }

    let admissible: Vec<Coordinate> = common
        .into_iter()
        .filter(|&cell| session.admits(vertex, cell, None))
        .collect();

    match admissible.as_slice() {
        [] => Deduction::Contradiction(Conflict::NoAdmissibleCell),
        &[cell] => Deduction::Unique(cell),
        _ => Deduction::Ambiguous(admissible),
    }
}
