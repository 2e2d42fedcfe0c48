//! Self-avoiding walk generation on the square lattice
//!
//! Walks are grown from vertex 1 at the centre of a `(2N-1) x (2N-1)` grid by
//! unit steps and returned cropped, labelled `1..=N` along the chain. They
//! feed the reconstruction as test material and as CLI sample input.

use ndarray::Array2;
use rand::Rng;

use crate::graph::Vertex;
use crate::io::configuration::{EMPTY_CELL, MAX_CHAIN_LENGTH, RANDOM_WALK_ATTEMPTS};
use crate::io::error::{Result, invalid_parameter};
use crate::spatial::Coordinate;
use crate::spatial::crop::crop;
use crate::spatial::grid::LatticeGrid;

/// Unit step on the lattice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Row decreases
    Up,
    /// Column increases
    Right,
    /// Row increases
    Down,
    /// Column decreases
    Left,
}

impl Direction {
    /// All four directions in clockwise order from `Up`
    pub const ALL: [Self; 4] = [Self::Up, Self::Right, Self::Down, Self::Left];

    /// Cell reached by stepping from `cell`, if it stays non-negative
    pub fn step(self, cell: Coordinate) -> Option<Coordinate> {
        match self {
            Self::Up => Some([cell[0].checked_sub(1)?, cell[1]]),
            Self::Right => Some([cell[0], cell[1] + 1]),
            Self::Down => Some([cell[0] + 1, cell[1]]),
            Self::Left => Some([cell[0], cell[1].checked_sub(1)?]),
        }
    }
}

/// Every self-avoiding walk of `length` vertices up to rotation and reflection
///
/// The first step is fixed to `Right` and the first turn, if any, to `Up`.
/// A length of zero yields no walks. The count grows roughly 2.6-fold per
/// vertex, so callers taking lengths from users cap them first.
pub fn enumerate_walks(length: usize) -> Vec<Array2<Vertex>> {
    let mut walks = Vec::new();
    if length == 0 {
        return walks;
    }

    let side = 2 * length - 1;
    let mut cells = Array2::from_elem((side, side), EMPTY_CELL);
    let start = [length - 1, length - 1];
    if let Some(cell) = cells.get_mut(start) {
        *cell = 1;
    }

    if length == 1 {
        walks.push(crop(&cells));
    } else {
        extend_walk(&mut cells, start, 2, length, None, &mut walks);
    }
    walks
}

/// Depth-first growth of a walk whose last vertex sits at `head`
///
/// `heading` is the direction of the previous step; `None` before the first.
fn extend_walk(
    cells: &mut Array2<Vertex>,
    head: Coordinate,
    vertex: Vertex,
    length: usize,
    heading: Option<(Direction, bool)>,
    walks: &mut Vec<Array2<Vertex>>,
) {
    if vertex > length {
        walks.push(crop(cells));
        return;
    }

    for direction in allowed_steps(heading) {
        let Some(next) = direction.step(head) else {
            continue;
        };
        if cells.get(next) != Some(&EMPTY_CELL) {
            continue;
        }

        if let Some(cell) = cells.get_mut(next) {
            *cell = vertex;
        }
        let turned = heading.is_some_and(|(previous, turned)| turned || previous != direction);
        extend_walk(cells, next, vertex + 1, length, Some((direction, turned)), walks);
        if let Some(cell) = cells.get_mut(next) {
            *cell = EMPTY_CELL;
        }
    }
}

/// Steps that keep the enumeration canonical
fn allowed_steps(heading: Option<(Direction, bool)>) -> Vec<Direction> {
    match heading {
        None => vec![Direction::Right],
        Some((previous, false)) => vec![previous, Direction::Up],
        Some(_) => Direction::ALL.to_vec(),
    }
}

/// Sample a self-avoiding walk of `length` vertices by random growth
///
/// Each step picks uniformly among free neighbouring cells; a walk that traps
/// itself is discarded and regrown.
///
/// # Errors
///
/// Returns `InvalidParameter` if `length` is zero or above the supported chain
/// length, or if no walk completes within the restart limit.
pub fn random_walk<R: Rng>(length: usize, rng: &mut R) -> Result<Array2<Vertex>> {
    if length == 0 {
        return Err(invalid_parameter("length", &length, &"walk needs at least one vertex"));
    }
    if length > MAX_CHAIN_LENGTH {
        return Err(invalid_parameter(
            "length",
            &length,
            &format!("at most {MAX_CHAIN_LENGTH} vertices are supported"),
        ));
    }

    for _ in 0..RANDOM_WALK_ATTEMPTS {
        let mut grid = LatticeGrid::for_chain(length);
        let mut head = grid.center();
        grid.place(1, head)?;

        let mut trapped = false;
        for vertex in 2..=length {
            let free: Vec<Coordinate> = grid.vacant_neighbors(head).collect();
            let Some(&next) = free.get(rng.random_range(0..free.len().max(1))) else {
                trapped = true;
                break;
            };
            grid.place(vertex, next)?;
            head = next;
        }

        if !trapped {
            return Ok(crop(grid.cells()));
        }
    }

    Err(invalid_parameter(
        "length",
        &length,
        &format!("no self-avoiding walk completed in {RANDOM_WALK_ATTEMPTS} attempts"),
    ))
}
