//! Error types for graph store access.

use std::error::Error;
use std::fmt;

use crate::id::{EdgeId, NodeId};

/// Errors from building or querying a node/edge store.
///
/// Hot-path accessors ([`EdgeStore::out_edges`](crate::EdgeStore::out_edges)
/// and friends) panic on out-of-range ids; these errors are returned by the
/// fallible entry points that accept ids from callers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreError {
    /// The node id lies inside the id space but no node is stored there.
    UnknownNode {
        /// The missing node.
        node: NodeId,
    },
    /// The node id lies beyond the store's id space.
    NodeOutOfRange {
        /// The offending id.
        node: NodeId,
        /// One past the largest valid id.
        bound: usize,
    },
    /// The edge id does not name a stored edge.
    UnknownEdge {
        /// The missing edge.
        edge: EdgeId,
    },
    /// An edge between the same ordered pair already exists and the store
    /// does not accept parallel edges.
    DuplicateEdge {
        /// Source of the rejected edge.
        source: NodeId,
        /// Target of the rejected edge.
        target: NodeId,
        /// The edge already connecting the pair.
        existing: EdgeId,
    },
    /// The store cannot hand out another id (more than `u32::MAX` entries).
    IdSpaceExhausted,
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownNode { node } => write!(f, "unknown node {node}"),
            Self::NodeOutOfRange { node, bound } => {
                write!(f, "node {node} out of range (bound {bound})")
            }
            Self::UnknownEdge { edge } => write!(f, "unknown edge {edge}"),
            Self::DuplicateEdge {
                source,
                target,
                existing,
            } => {
                write!(
                    f,
                    "edge {source} -> {target} already exists as edge {existing}"
                )
            }
            Self::IdSpaceExhausted => write!(f, "id space exhausted"),
        }
    }
}

impl Error for StoreError {}
