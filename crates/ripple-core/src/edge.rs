//! Edge records and node/edge payloads.

use crate::id::{EdgeId, NodeId};

/// A directed edge as seen by traversal code.
///
/// Edges are small `Copy` records; payload (weight, capacity, color) is
/// kept out of line in [`EdgeData`] and looked up by [`Edge::id`] so that
/// adjacency lists stay compact.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Edge {
    /// Identifier of this edge in the owning store.
    pub id: EdgeId,
    /// Node the edge leaves.
    pub source: NodeId,
    /// Node the edge enters.
    pub target: NodeId,
}

impl Edge {
    /// Construct an edge record.
    pub fn new(id: EdgeId, source: NodeId, target: NodeId) -> Self {
        Self { id, source, target }
    }

    /// The same edge seen from the other end.
    ///
    /// Undirected stores list this in the target's out-edges.
    pub fn reversed(self) -> Self {
        Self {
            id: self.id,
            source: self.target,
            target: self.source,
        }
    }

    /// Returns `true` if source and target coincide.
    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}

/// Algorithm-visible payload attached to a node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeData {
    /// Node weight. Default: `0.0`.
    pub weight: f64,
    /// Color assigned by coloring algorithms. Default: `0`.
    pub color: i32,
}

impl Default for NodeData {
    fn default() -> Self {
        Self {
            weight: 0.0,
            color: 0,
        }
    }
}

/// Algorithm-visible payload attached to an edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeData {
    /// Edge weight (length for shortest paths). Default: `1.0`.
    pub weight: f64,
    /// Flow capacity. Default: `0.0`.
    pub capacity: f64,
    /// Edge color. Default: `0`.
    pub color: i32,
}

impl EdgeData {
    /// Payload with the given weight and default capacity/color.
    pub fn weighted(weight: f64) -> Self {
        Self {
            weight,
            ..Self::default()
        }
    }
}

impl Default for EdgeData {
    fn default() -> Self {
        Self {
            weight: 1.0,
            capacity: 0.0,
            color: 0,
        }
    }
}
