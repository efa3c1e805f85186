//! Edge orientation for adjacency stores.

/// How an [`AdjacencyStore`](crate::AdjacencyStore) lists its edges.
///
/// # Examples
///
/// ```
/// use ripple_core::{EdgeStore, NodeId};
/// use ripple_store::{AdjacencyStore, Directedness};
///
/// let directed = AdjacencyStore::from_edges(Directedness::Directed, 2, &[(0, 1)]).unwrap();
/// assert_eq!(directed.out_degree(NodeId(1)), 0);
///
/// let undirected = AdjacencyStore::from_edges(Directedness::Undirected, 2, &[(0, 1)]).unwrap();
/// assert_eq!(undirected.out_degree(NodeId(1)), 1);
/// assert_eq!(undirected.out_edges(NodeId(1))[0].target, NodeId(0));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Directedness {
    /// Edges are listed only at their source.
    #[default]
    Directed,
    /// Edges are listed at both endpoints, oriented away from the listing node.
    Undirected,
}

impl Directedness {
    /// `true` for [`Directedness::Undirected`].
    pub fn is_undirected(self) -> bool {
        matches!(self, Self::Undirected)
    }
}
