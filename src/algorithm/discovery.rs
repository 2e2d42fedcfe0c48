use std::collections::BTreeSet;

use crate::graph::{AdjacencyModel, Vertex, VertexSet};
use crate::io::configuration::MAX_LATTICE_DEGREE;

/// Placed-neighbour bookkeeping for unplaced vertices
///
/// Each unplaced vertex records which of its declared neighbours already hold
/// a cell. Vertices are also bucketed by that count so the engine can find the
/// most constrained ones without scanning the whole model. A placed vertex
/// sits in no bucket and its record is frozen until it is removed again;
/// removals must come in reverse placement order.
#[derive(Debug, Clone)]
pub struct DiscoveryTracker {
    /// Sorted placed neighbours, indexed by `vertex - 1`
    discovered: Vec<Vec<Vertex>>,
    /// Unplaced vertices grouped by discovery count `0..=4`
    buckets: [BTreeSet<Vertex>; MAX_LATTICE_DEGREE + 1],
    placed: VertexSet,
}

impl DiscoveryTracker {
    /// Start with nothing placed: every vertex in bucket 0
    pub fn new(model: &AdjacencyModel) -> Self {
        let mut buckets: [BTreeSet<Vertex>; MAX_LATTICE_DEGREE + 1] =
            std::array::from_fn(|_| BTreeSet::new());
        if let Some(empty) = buckets.first_mut() {
            empty.extend(model.vertices());
        }

        Self {
            discovered: vec![Vec::new(); model.len()],
            buckets,
            placed: VertexSet::with_capacity(model.len()),
        }
    }

    /// Record that `vertex` now holds a cell
    ///
    /// Removes it from its bucket and promotes each unplaced neighbour that
    /// lists it by one bucket.
    pub fn notify_placed(&mut self, vertex: Vertex, model: &AdjacencyModel) {
        if !self.placed.insert(vertex) {
            return;
        }
        let count = self.discovery_count(vertex);
        if let Some(bucket) = self.buckets.get_mut(count) {
            bucket.remove(&vertex);
        }

        for &neighbor in model.neighbors(vertex) {
            if self.placed.contains(neighbor) || !model.are_adjacent(neighbor, vertex) {
                continue;
            }
            let Some(record) = self.discovered.get_mut(neighbor - 1) else {
                continue;
            };
            let Err(slot) = record.binary_search(&vertex) else {
                continue;
            };
            record.insert(slot, vertex);

            let promoted = record.len();
            if let Some(bucket) = self.buckets.get_mut(promoted - 1) {
                bucket.remove(&neighbor);
            }
            if let Some(bucket) = self.buckets.get_mut(promoted) {
                bucket.insert(neighbor);
            }
        }
    }

    /// Record that `vertex` gave its cell back
    ///
    /// Undoes [`Self::notify_placed`]: each unplaced neighbour drops it and
    /// moves down one bucket, and the vertex returns to the bucket of its own
    /// record.
    pub fn notify_removed(&mut self, vertex: Vertex, model: &AdjacencyModel) {
        if !self.placed.remove(vertex) {
            return;
        }

        for &neighbor in model.neighbors(vertex) {
            if self.placed.contains(neighbor) {
                continue;
            }
            let Some(record) = self.discovered.get_mut(neighbor - 1) else {
                continue;
            };
            let Ok(slot) = record.binary_search(&vertex) else {
                continue;
            };
            record.remove(slot);

            let demoted = record.len();
            if let Some(bucket) = self.buckets.get_mut(demoted + 1) {
                bucket.remove(&neighbor);
            }
            if let Some(bucket) = self.buckets.get_mut(demoted) {
                bucket.insert(neighbor);
            }
        }

        let count = self.discovery_count(vertex);
        if let Some(bucket) = self.buckets.get_mut(count) {
            bucket.insert(vertex);
        }
    }

    /// Placed neighbours recorded for a vertex, ascending
    pub fn discovered(&self, vertex: Vertex) -> &[Vertex] {
        vertex
            .checked_sub(1)
            .and_then(|index| self.discovered.get(index))
            .map_or(&[][..], Vec::as_slice)
    }

    /// Number of placed neighbours recorded for a vertex
    pub fn discovery_count(&self, vertex: Vertex) -> usize {
        self.discovered(vertex).len()
    }

    /// Unplaced vertices with exactly `count` placed neighbours, ascending
    pub fn bucket(&self, count: usize) -> impl Iterator<Item = Vertex> + '_ {
        self.buckets.get(count).into_iter().flatten().copied()
    }

    /// Unplaced vertices with at least `min_degree` placed neighbours
    ///
    /// Ordered by count descending, then id ascending: the most constrained
    /// vertices come first.
    pub fn ready_vertices(&self, min_degree: usize) -> Vec<Vertex> {
        (min_degree..=MAX_LATTICE_DEGREE)
            .rev()
            .flat_map(|count| self.bucket(count))
            .collect()
    }

    /// Check whether a vertex has been placed
    pub fn is_placed(&self, vertex: Vertex) -> bool {
        self.placed.contains(vertex)
    }

    /// Vertices placed so far
    pub const fn placed(&self) -> &VertexSet {
        &self.placed
    }
}
