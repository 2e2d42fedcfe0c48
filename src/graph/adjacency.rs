//! Validated adjacency model of a lattice chain
//!
//! The model is the only input of a reconstruction. It is built either from
//! padded neighbour rows, where non-positive entries mean "no neighbour in this
//! slot", or from a labelled lattice by reading off orthogonal contacts.
//! Construction rejects anything that cannot be a square-lattice path graph
//! locally: unknown ids, self-loops, asymmetric entries, degree above four and
//! disconnected vertices.

use std::collections::{BTreeMap, VecDeque};
use std::ops::RangeInclusive;

use ndarray::Array2;
use num_traits::ToPrimitive;

use crate::graph::Vertex;
use crate::io::configuration::{MAX_CHAIN_LENGTH, MAX_LATTICE_DEGREE};
use crate::io::error::{Malformation, Result, invalid_parameter};
use crate::spatial::grid::orthogonal_neighbors;

const UNREACHABLE: u16 = u16::MAX;

/// Mapping from each vertex to its sorted declared neighbours
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjacencyModel {
    /// Neighbour lists indexed by `vertex - 1`
    neighbors: Vec<Vec<Vertex>>,
    /// Graph distance between every pair, indexed by `[a - 1, b - 1]`
    distances: Array2<u16>,
}

impl AdjacencyModel {
    /// Build a model from `(vertex, neighbours)` rows
    ///
    /// Neighbour entries `<= 0` are padding and are dropped; repeated entries
    /// collapse into one.
    ///
    /// # Errors
    ///
    /// Returns `MalformedInput` if the rows do not describe vertices `1..=N`
    /// with symmetric, loop-free adjacency of degree at most four forming one
    /// connected graph, and `InvalidParameter` if N exceeds the supported size.
    pub fn from_rows<I, R>(rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = (i64, R)>,
        R: IntoIterator<Item = i64>,
    {
        let mut declared: BTreeMap<Vertex, Vec<i64>> = BTreeMap::new();
        for (key, row) in rows {
            let vertex = usize::try_from(key)
                .ok()
                .filter(|&v| v > 0)
                .ok_or(Malformation::NonPositiveVertex(key))?;
            if declared
                .insert(vertex, row.into_iter().filter(|&n| n > 0).collect())
                .is_some()
            {
                return Err(Malformation::DuplicateVertex(vertex).into());
            }
        }

        let count = declared.len();
        if count == 0 {
            return Err(Malformation::Empty.into());
        }
        if count > MAX_CHAIN_LENGTH {
            return Err(invalid_parameter(
                "vertices",
                &count,
                &format!("at most {MAX_CHAIN_LENGTH} vertices are supported"),
            ));
        }

        // Distinct positive keys cover 1..=count exactly when they are dense
        if let Some(expected) = declared
            .keys()
            .zip(1..=count)
            .find_map(|(&vertex, expected)| (vertex != expected).then_some(expected))
        {
            return Err(Malformation::MissingVertex(expected).into());
        }

        let mut neighbors = Vec::with_capacity(count);
        for (&vertex, row) in &declared {
            let mut list = Vec::with_capacity(row.len());
            for &entry in row {
                let neighbor = usize::try_from(entry)
                    .ok()
                    .filter(|&n| n <= count)
                    .ok_or(Malformation::UnknownNeighbor {
                        vertex,
                        neighbor: entry,
                    })?;
                if neighbor == vertex {
                    return Err(Malformation::SelfLoop(vertex).into());
                }
                list.push(neighbor);
            }
            list.sort_unstable();
            list.dedup();
            if list.len() > MAX_LATTICE_DEGREE {
                return Err(Malformation::ExcessDegree {
                    vertex,
                    degree: list.len(),
                }
                .into());
            }
            neighbors.push(list);
        }

        for (index, list) in neighbors.iter().enumerate() {
            let vertex = index + 1;
            for &neighbor in list {
                let mirrored = neighbors
                    .get(neighbor - 1)
                    .is_some_and(|back| back.binary_search(&vertex).is_ok());
                if !mirrored {
                    return Err(Malformation::Asymmetric { vertex, neighbor }.into());
                }
            }
        }

        let distances = all_pairs_distances(&neighbors);
        if let Some(vertex) = (1..=count).find(|&v| {
            distances
                .get([0, v - 1])
                .is_none_or(|&d| d == UNREACHABLE)
        }) {
            return Err(Malformation::Disconnected(vertex).into());
        }

        Ok(Self {
            neighbors,
            distances,
        })
    }

    /// Build a model from a labelled lattice by orthogonal contact
    ///
    /// Cells holding a value `<= 0`, or one that does not fit in `i64`, are
    /// empty.
    ///
    /// # Errors
    ///
    /// Returns `MalformedInput` if a label repeats or the derived rows fail the
    /// checks of [`AdjacencyModel::from_rows`].
    pub fn from_lattice<T>(lattice: &Array2<T>) -> Result<Self>
    where
        T: ToPrimitive + Copy,
    {
        let label_at = |cell: [usize; 2]| -> i64 {
            lattice
                .get(cell)
                .and_then(|value| value.to_i64())
                .unwrap_or(0)
        };
        let (rows, cols) = lattice.dim();

        let mut contacts: BTreeMap<i64, Vec<i64>> = BTreeMap::new();
        for row in 0..rows {
            for col in 0..cols {
                let label = label_at([row, col]);
                if label <= 0 {
                    continue;
                }
                let touching = orthogonal_neighbors([row, col], (rows, cols))
                    .map(label_at)
                    .filter(|&other| other > 0)
                    .collect();
                if contacts.insert(label, touching).is_some() {
                    return Err(Malformation::RepeatedLabel(label as Vertex).into());
                }
            }
        }

        Self::from_rows(contacts)
    }

    /// Number of vertices
    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    /// Test if the model has no vertices (never true once constructed)
    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    /// All vertex ids in ascending order
    pub fn vertices(&self) -> RangeInclusive<Vertex> {
        1..=self.len()
    }

    /// Sorted declared neighbours of a vertex (empty for unknown ids)
    pub fn neighbors(&self, vertex: Vertex) -> &[Vertex] {
        vertex
            .checked_sub(1)
            .and_then(|index| self.neighbors.get(index))
            .map_or(&[][..], Vec::as_slice)
    }

    /// Declared degree of a vertex
    pub fn degree(&self, vertex: Vertex) -> usize {
        self.neighbors(vertex).len()
    }

    /// Test if two vertices are declared neighbours
    pub fn are_adjacent(&self, a: Vertex, b: Vertex) -> bool {
        self.neighbors(a).binary_search(&b).is_ok()
    }

    /// Graph distance between two vertices
    pub fn distance(&self, a: Vertex, b: Vertex) -> Option<usize> {
        let (a, b) = (a.checked_sub(1)?, b.checked_sub(1)?);
        self.distances
            .get([a, b])
            .copied()
            .filter(|&d| d != UNREACHABLE)
            .map(usize::from)
    }

    /// Every edge once as `(low, high)`, sorted
    pub fn edges(&self) -> Vec<(Vertex, Vertex)> {
        self.vertices()
            .flat_map(|a| {
                self.neighbors(a)
                    .iter()
                    .filter(move |&&b| b > a)
                    .map(move |&b| (a, b))
            })
            .collect()
    }
}

/// Breadth-first distances from every vertex
fn all_pairs_distances(neighbors: &[Vec<Vertex>]) -> Array2<u16> {
    let count = neighbors.len();
    let mut distances = Array2::from_elem((count, count), UNREACHABLE);
    let mut queue = VecDeque::with_capacity(count);

    for source in 0..count {
        if let Some(d) = distances.get_mut([source, source]) {
            *d = 0;
        }
        queue.clear();
        queue.push_back(source);

        while let Some(current) = queue.pop_front() {
            let next = distances
                .get([source, current])
                .copied()
                .unwrap_or(UNREACHABLE)
                .saturating_add(1);
            for &neighbor in neighbors.get(current).map_or(&[][..], Vec::as_slice) {
                if let Some(d) = distances.get_mut([source, neighbor - 1]) {
                    if *d == UNREACHABLE {
                        *d = next;
                        queue.push_back(neighbor - 1);
                    }
                }
            }
        }
    }

    distances
}
