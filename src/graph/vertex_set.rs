use bitvec::prelude::*;
use std::fmt;

use crate::graph::Vertex;

/// Fixed-size set of vertices backed by a bit vector
///
/// Vertex ids are 1-based; bit `v - 1` records membership of `v`.
/// Ids outside `1..=capacity` are never members.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VertexSet {
    bits: BitVec,
    len: usize,
}

impl VertexSet {
    /// Create an empty set able to hold vertices `1..=capacity`
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bits: bitvec![0; capacity],
            len: 0,
        }
    }

    /// Add a vertex, returning whether it was newly inserted
    pub fn insert(&mut self, vertex: Vertex) -> bool {
        if vertex == 0 || vertex > self.bits.len() || self.contains(vertex) {
            return false;
        }
        self.bits.set(vertex - 1, true);
        self.len += 1;
        true
    }

    /// Drop a vertex, returning whether it was a member
    pub fn remove(&mut self, vertex: Vertex) -> bool {
        if !self.contains(vertex) {
            return false;
        }
        self.bits.set(vertex - 1, false);
        self.len -= 1;
        true
    }

    /// Test vertex membership
    pub fn contains(&self, vertex: Vertex) -> bool {
        vertex
            .checked_sub(1)
            .and_then(|index| self.bits.get(index).as_deref().copied())
            .unwrap_or(false)
    }

    /// Number of member vertices
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Test if no vertex is present
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Largest vertex id the set can hold
    pub fn capacity(&self) -> usize {
        self.bits.len()
    }

    /// Member vertices in ascending order
    pub fn iter(&self) -> impl Iterator<Item = Vertex> + '_ {
        self.bits.iter_ones().map(|index| index + 1)
    }
}

impl fmt::Display for VertexSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let members: Vec<Vertex> = self.iter().collect();
        write!(f, "VertexSet({}/{}: {members:?})", self.len, self.capacity())
    }
}
