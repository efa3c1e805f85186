//! The read-side node/edge store contract.
//!
//! Propagation engines only ever read a store, and only through
//! [`EdgeStore::out_edges`]. Mutation is the business of whoever owns the
//! concrete store; the engines hold a shared borrow (or an `Arc`) for the
//! duration of a run, so a store cannot change under an in-flight wave.

use std::sync::Arc;

use crate::edge::Edge;
use crate::error::StoreError;
use crate::id::{EdgeId, NodeId};

/// Membership and id-space queries over a node collection.
pub trait NodeStore {
    /// One past the largest node id the store may hold.
    ///
    /// Every per-node array built over the store has this length. Ids in
    /// `0..node_bound()` that were never added (or were removed) are gaps:
    /// [`contains`](Self::contains) is `false` for them.
    fn node_bound(&self) -> usize;

    /// Whether a node with this id is stored.
    ///
    /// Must be O(1). Ids at or beyond [`node_bound`](Self::node_bound)
    /// return `false`.
    fn contains(&self, id: NodeId) -> bool;

    /// Number of stored nodes (gaps excluded).
    fn node_count(&self) -> usize;

    /// Largest stored node id, or `None` for an empty store.
    ///
    /// The default scans down from `node_bound() - 1` past any trailing
    /// gaps.
    fn max_node_id(&self) -> Option<NodeId> {
        (0..self.node_bound())
            .rev()
            .map(NodeId::from_index)
            .find(|&id| self.contains(id))
    }
}

/// Edge iteration per node.
///
/// # Panics
///
/// The slice accessors panic when `id.index() >= node_bound()`. Ids are
/// never clamped or wrapped. A gap id inside the bound yields empty
/// slices. Use [`try_out_edges`](Self::try_out_edges) when the id comes
/// from an untrusted caller.
///
/// Every edge returned references nodes for which
/// [`NodeStore::contains`] holds.
pub trait EdgeStore: NodeStore {
    /// Edges leaving `id`, in a stable, store-defined order.
    ///
    /// Undirected stores list every incident edge here, oriented so that
    /// `edge.source == id`.
    fn out_edges(&self, id: NodeId) -> &[Edge];

    /// Edges entering `id`.
    fn in_edges(&self, id: NodeId) -> &[Edge];

    /// Out- and in-edges together.
    fn both_edges(&self, id: NodeId) -> (&[Edge], &[Edge]) {
        (self.out_edges(id), self.in_edges(id))
    }

    /// Number of edges leaving `id`.
    fn out_degree(&self, id: NodeId) -> usize {
        self.out_edges(id).len()
    }

    /// Number of edges entering `id`.
    fn in_degree(&self, id: NodeId) -> usize {
        self.in_edges(id).len()
    }

    /// Total number of incident edge endpoints (out + in).
    fn degree(&self, id: NodeId) -> usize {
        self.out_degree(id) + self.in_degree(id)
    }

    /// Weight of an edge. Stores without payloads report `1.0`.
    fn edge_weight(&self, edge: EdgeId) -> f64 {
        let _ = edge;
        1.0
    }

    /// Checked variant of [`out_edges`](Self::out_edges).
    fn try_out_edges(&self, id: NodeId) -> Result<&[Edge], StoreError> {
        check_node(self, id)?;
        Ok(self.out_edges(id))
    }

    /// Checked variant of [`in_edges`](Self::in_edges).
    fn try_in_edges(&self, id: NodeId) -> Result<&[Edge], StoreError> {
        check_node(self, id)?;
        Ok(self.in_edges(id))
    }
}

/// Validate that `id` names a stored node.
///
/// Returns [`StoreError::NodeOutOfRange`] beyond the bound and
/// [`StoreError::UnknownNode`] for gaps.
pub fn check_node<S: NodeStore + ?Sized>(store: &S, id: NodeId) -> Result<(), StoreError> {
    let bound = store.node_bound();
    if id.index() >= bound {
        return Err(StoreError::NodeOutOfRange { node: id, bound });
    }
    if !store.contains(id) {
        return Err(StoreError::UnknownNode { node: id });
    }
    Ok(())
}

macro_rules! forward_store {
    ($($ptr:ty),*) => {$(
        impl<S: NodeStore + ?Sized> NodeStore for $ptr {
            fn node_bound(&self) -> usize {
                (**self).node_bound()
            }
            fn contains(&self, id: NodeId) -> bool {
                (**self).contains(id)
            }
            fn node_count(&self) -> usize {
                (**self).node_count()
            }
            fn max_node_id(&self) -> Option<NodeId> {
                (**self).max_node_id()
            }
        }

        impl<S: EdgeStore + ?Sized> EdgeStore for $ptr {
            fn out_edges(&self, id: NodeId) -> &[Edge] {
                (**self).out_edges(id)
            }
            fn in_edges(&self, id: NodeId) -> &[Edge] {
                (**self).in_edges(id)
            }
            fn out_degree(&self, id: NodeId) -> usize {
                (**self).out_degree(id)
            }
            fn in_degree(&self, id: NodeId) -> usize {
                (**self).in_degree(id)
            }
            fn degree(&self, id: NodeId) -> usize {
                (**self).degree(id)
            }
            fn edge_weight(&self, edge: EdgeId) -> f64 {
                (**self).edge_weight(edge)
            }
        }
    )*};
}

forward_store!(&S, Box<S>, Arc<S>);
