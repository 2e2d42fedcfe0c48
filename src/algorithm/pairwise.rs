use crate::algorithm::executor::{Placement, ReconstructionSession};
use crate::graph::Vertex;
use crate::spatial::Coordinate;

/// Two mutually adjacent vertices committed together to adjacent fringe cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairPlacement {
    /// Placement into the lower-ordered scan cell
    pub first: Placement,
    /// Placement into its fringe neighbour
    pub second: Placement,
}

/// Search the fringe for a pair of adjacent cells and a pair of adjacent
/// vertices that can occupy them together
///
/// Cells are scanned in ascending `(row, col)`, bordering placed vertices and
/// their unplaced neighbours in ascending id. The first admissible pair wins,
/// which keeps the search reproducible.
pub fn find_pair(session: &ReconstructionSession<'_>) -> Option<PairPlacement> {
    session
        .fringe()
        .adjacent_pairs(session.grid())
        .find_map(|(first, second)| pair_for_cells(session, first, second))
}

fn pair_for_cells(
    session: &ReconstructionSession<'_>,
    first: Coordinate,
    second: Coordinate,
) -> Option<PairPlacement> {
    let model = session.model();
    let second_candidates = open_neighbors(session, second);

    for v1 in open_neighbors(session, first) {
        if !session.admits(v1, first, None) {
            continue;
        }
        let pending = Placement {
            vertex: v1,
            cell: first,
        };

        for &v2 in &second_candidates {
            if v2 == v1 || !model.are_adjacent(v1, v2) {
                continue;
            }
            if session.admits(v2, second, Some(pending)) {
                return Some(PairPlacement {
                    first: pending,
                    second: Placement {
                        vertex: v2,
                        cell: second,
                    },
                });
            }
        }
    }

    None
}

/// Unplaced declared neighbours of the placed vertices bordering `cell`
///
/// Bordering vertices are taken in ascending id and their neighbours likewise;
/// a vertex reachable through two borders is listed once.
fn open_neighbors(session: &ReconstructionSession<'_>, cell: Coordinate) -> Vec<Vertex> {
    let mut borders: Vec<Vertex> = session
        .grid()
        .occupied_neighbors(cell)
        .map(|(_, vertex)| vertex)
        .collect();
    borders.sort_unstable();

    let mut candidates = Vec::new();
    for border in borders {
        for &neighbor in session.model().neighbors(border) {
            if !session.discovery().is_placed(neighbor) && !candidates.contains(&neighbor) {
                candidates.push(neighbor);
            }
        }
    }
    candidates
}
