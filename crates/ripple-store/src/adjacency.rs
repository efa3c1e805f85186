//! Adjacency-list node/edge store.

use indexmap::IndexMap;
use smallvec::SmallVec;

use ripple_core::{check_node, Edge, EdgeData, EdgeId, EdgeStore, NodeData, NodeId, NodeStore, StoreError};

use crate::directedness::Directedness;

type EdgeList = SmallVec<[Edge; 4]>;

/// An in-memory graph keyed by dense integer ids.
///
/// Nodes and edges carry payloads ([`NodeData`], [`EdgeData`]). Per-node
/// adjacency lists are `SmallVec<[Edge; 4]>`, so nodes of degree four or
/// less need no heap allocation of their own. Edge order within a list is
/// insertion order and stays stable until the list's node is mutated.
///
/// Removing a node or edge leaves a gap in the id space; ids of the
/// remaining elements never change.
///
/// Parallel edges (two edges over the same ordered pair, or the same
/// unordered pair in an undirected store) are rejected unless enabled
/// with [`with_parallel_edges`](Self::with_parallel_edges). Self-loops are
/// not checked; in an undirected store a self-loop is listed twice in its
/// node's out-edges.
///
/// # Examples
///
/// ```
/// use ripple_core::{EdgeData, EdgeStore, NodeData, NodeId, NodeStore};
/// use ripple_store::{AdjacencyStore, Directedness};
///
/// let mut g = AdjacencyStore::new(Directedness::Directed);
/// let a = g.add_node(NodeData::default());
/// let b = g.add_node(NodeData::default());
/// let e = g.add_edge(a, b, EdgeData::weighted(2.0)).unwrap();
///
/// assert_eq!(g.node_count(), 2);
/// assert_eq!(g.out_edges(a)[0].target, b);
/// assert_eq!(g.edge_weight(e), 2.0);
/// assert!(g.add_edge(a, b, EdgeData::default()).is_err());
/// ```
#[derive(Clone, Debug)]
pub struct AdjacencyStore {
    directedness: Directedness,
    parallel_edges: bool,
    present: Vec<bool>,
    node_data: Vec<NodeData>,
    out: Vec<EdgeList>,
    inc: Vec<EdgeList>,
    edges: Vec<Option<(Edge, EdgeData)>>,
    pairs: IndexMap<(NodeId, NodeId), EdgeId>,
    node_count: usize,
    edge_count: usize,
}

impl AdjacencyStore {
    /// Create an empty store.
    pub fn new(directedness: Directedness) -> Self {
        Self::with_capacity(directedness, 0, 0)
    }

    /// Create an empty store with room for `nodes` nodes and `edges` edges.
    pub fn with_capacity(directedness: Directedness, nodes: usize, edges: usize) -> Self {
        Self {
            directedness,
            parallel_edges: false,
            present: Vec::with_capacity(nodes),
            node_data: Vec::with_capacity(nodes),
            out: Vec::with_capacity(nodes),
            inc: Vec::with_capacity(nodes),
            edges: Vec::with_capacity(edges),
            pairs: IndexMap::with_capacity(edges),
            node_count: 0,
            edge_count: 0,
        }
    }

    /// Allow or forbid parallel edges. Default: forbidden.
    ///
    /// Must be chosen before edges are added; switching on an existing
    /// store leaves the duplicate index of already-inserted edges in place.
    pub fn with_parallel_edges(mut self, allow: bool) -> Self {
        self.parallel_edges = allow;
        self
    }

    /// Build a store with nodes `0..node_count` and the given edges, all
    /// with default payloads.
    pub fn from_edges(
        directedness: Directedness,
        node_count: usize,
        edges: &[(u32, u32)],
    ) -> Result<Self, StoreError> {
        let mut store = Self::with_capacity(directedness, node_count, edges.len());
        store.add_nodes(node_count);
        for &(s, t) in edges {
            store.add_edge(NodeId(s), NodeId(t), EdgeData::default())?;
        }
        Ok(store)
    }

    /// Like [`from_edges`](Self::from_edges) with a weight per edge.
    pub fn from_weighted_edges(
        directedness: Directedness,
        node_count: usize,
        edges: &[(u32, u32, f64)],
    ) -> Result<Self, StoreError> {
        let mut store = Self::with_capacity(directedness, node_count, edges.len());
        store.add_nodes(node_count);
        for &(s, t, w) in edges {
            store.add_edge(NodeId(s), NodeId(t), EdgeData::weighted(w))?;
        }
        Ok(store)
    }

    /// Edge orientation of this store.
    pub fn directedness(&self) -> Directedness {
        self.directedness
    }

    /// Whether parallel edges are accepted.
    pub fn allows_parallel_edges(&self) -> bool {
        self.parallel_edges
    }

    // ── Nodes ───────────────────────────────────────────────────

    /// Append a node with the next free id.
    ///
    /// # Panics
    ///
    /// Panics if the id space (`u32`) is exhausted.
    pub fn add_node(&mut self, data: NodeData) -> NodeId {
        let id = NodeId::from_index(self.present.len());
        self.grow_to(self.present.len() + 1);
        self.present[id.index()] = true;
        self.node_data[id.index()] = data;
        self.node_count += 1;
        id
    }

    /// Append `count` nodes with default payloads; returns the first new id.
    pub fn add_nodes(&mut self, count: usize) -> NodeId {
        let first = NodeId::from_index(self.present.len());
        for _ in 0..count {
            self.add_node(NodeData::default());
        }
        first
    }

    /// Make `id` a stored node, growing the id space if needed.
    ///
    /// Ids skipped over by the growth become gaps. Returns `true` if the
    /// node was newly added.
    pub fn ensure_node(&mut self, id: NodeId) -> bool {
        if id.index() >= self.present.len() {
            self.grow_to(id.index() + 1);
        }
        if self.present[id.index()] {
            return false;
        }
        self.present[id.index()] = true;
        self.node_data[id.index()] = NodeData::default();
        self.node_count += 1;
        true
    }

    /// Remove a node and every edge touching it.
    pub fn remove_node(&mut self, id: NodeId) -> Result<NodeData, StoreError> {
        check_node(self, id)?;
        let incident: Vec<EdgeId> = self.out[id.index()]
            .iter()
            .chain(self.inc[id.index()].iter())
            .map(|e| e.id)
            .collect();
        for edge in incident {
            // Already gone when an undirected edge appeared in both lists.
            let _ = self.remove_edge(edge);
        }
        self.present[id.index()] = false;
        self.node_count -= 1;
        Ok(std::mem::take(&mut self.node_data[id.index()]))
    }

    /// Payload of a node.
    pub fn node_data(&self, id: NodeId) -> Result<&NodeData, StoreError> {
        check_node(self, id)?;
        Ok(&self.node_data[id.index()])
    }

    /// Mutable payload of a node.
    pub fn node_data_mut(&mut self, id: NodeId) -> Result<&mut NodeData, StoreError> {
        check_node(self, id)?;
        Ok(&mut self.node_data[id.index()])
    }

    /// Stored node ids, ascending.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.present
            .iter()
            .enumerate()
            .filter(|(_, p)| **p)
            .map(|(i, _)| NodeId::from_index(i))
    }

    fn grow_to(&mut self, len: usize) {
        if len > self.present.len() {
            self.present.resize(len, false);
            self.node_data.resize(len, NodeData::default());
            self.out.resize_with(len, SmallVec::new);
            self.inc.resize_with(len, SmallVec::new);
        }
    }

    // ── Edges ───────────────────────────────────────────────────

    /// Add an edge from `source` to `target`.
    ///
    /// Fails if either endpoint is not stored, or if the pair is already
    /// connected and parallel edges are disabled.
    pub fn add_edge(
        &mut self,
        source: NodeId,
        target: NodeId,
        data: EdgeData,
    ) -> Result<EdgeId, StoreError> {
        check_node(self, source)?;
        check_node(self, target)?;

        let key = self.pair_key(source, target);
        if !self.parallel_edges {
            if let Some(&existing) = self.pairs.get(&key) {
                return Err(StoreError::DuplicateEdge {
                    source,
                    target,
                    existing,
                });
            }
        }

        let raw = u32::try_from(self.edges.len()).map_err(|_| StoreError::IdSpaceExhausted)?;
        let id = EdgeId(raw);
        let edge = Edge::new(id, source, target);

        self.out[source.index()].push(edge);
        self.inc[target.index()].push(edge);
        if self.directedness.is_undirected() {
            let back = edge.reversed();
            self.out[target.index()].push(back);
            self.inc[source.index()].push(back);
        }
        self.edges.push(Some((edge, data)));
        self.pairs.entry(key).or_insert(id);
        self.edge_count += 1;
        Ok(id)
    }

    /// Remove an edge, returning its record and payload.
    pub fn remove_edge(&mut self, id: EdgeId) -> Result<(Edge, EdgeData), StoreError> {
        let (edge, data) = self
            .edges
            .get_mut(id.index())
            .and_then(Option::take)
            .ok_or(StoreError::UnknownEdge { edge: id })?;

        let keep = |e: &Edge| e.id != id;
        self.out[edge.source.index()].retain(|e| keep(e));
        self.inc[edge.target.index()].retain(|e| keep(e));
        if self.directedness.is_undirected() {
            self.out[edge.target.index()].retain(|e| keep(e));
            self.inc[edge.source.index()].retain(|e| keep(e));
        }

        let key = self.pair_key(edge.source, edge.target);
        if self.pairs.get(&key) == Some(&id) {
            self.pairs.swap_remove(&key);
            // Re-index a surviving parallel edge over the same pair.
            let survivor = self.out[edge.source.index()]
                .iter()
                .find(|e| self.pair_key(e.source, e.target) == key)
                .map(|e| e.id);
            if let Some(other) = survivor {
                self.pairs.insert(key, other);
            }
        }
        self.edge_count -= 1;
        Ok((edge, data))
    }

    /// First edge connecting `source` to `target`, if any.
    ///
    /// In an undirected store the pair is unordered.
    pub fn find_edge(&self, source: NodeId, target: NodeId) -> Option<EdgeId> {
        self.pairs.get(&self.pair_key(source, target)).copied()
    }

    /// Edge record by id.
    pub fn edge(&self, id: EdgeId) -> Result<Edge, StoreError> {
        self.edges
            .get(id.index())
            .and_then(Option::as_ref)
            .map(|(e, _)| *e)
            .ok_or(StoreError::UnknownEdge { edge: id })
    }

    /// Payload of an edge.
    pub fn edge_data(&self, id: EdgeId) -> Result<&EdgeData, StoreError> {
        self.edges
            .get(id.index())
            .and_then(Option::as_ref)
            .map(|(_, d)| d)
            .ok_or(StoreError::UnknownEdge { edge: id })
    }

    /// Mutable payload of an edge.
    pub fn edge_data_mut(&mut self, id: EdgeId) -> Result<&mut EdgeData, StoreError> {
        self.edges
            .get_mut(id.index())
            .and_then(Option::as_mut)
            .map(|(_, d)| d)
            .ok_or(StoreError::UnknownEdge { edge: id })
    }

    /// Number of stored edges (an undirected edge counts once).
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// One past the largest edge id ever handed out.
    pub fn edge_bound(&self) -> usize {
        self.edges.len()
    }

    /// Stored edges in id order, in the orientation they were added.
    pub fn edges(&self) -> impl Iterator<Item = (Edge, &EdgeData)> + '_ {
        self.edges
            .iter()
            .filter_map(|slot| slot.as_ref().map(|(e, d)| (*e, d)))
    }

    fn pair_key(&self, source: NodeId, target: NodeId) -> (NodeId, NodeId) {
        if self.directedness.is_undirected() && target < source {
            (target, source)
        } else {
            (source, target)
        }
    }
}

impl Default for AdjacencyStore {
    fn default() -> Self {
        Self::new(Directedness::Directed)
    }
}

impl NodeStore for AdjacencyStore {
    fn node_bound(&self) -> usize {
        self.present.len()
    }

    fn contains(&self, id: NodeId) -> bool {
        self.present.get(id.index()).copied().unwrap_or(false)
    }

    fn node_count(&self) -> usize {
        self.node_count
    }
}

impl EdgeStore for AdjacencyStore {
    fn out_edges(&self, id: NodeId) -> &[Edge] {
        &self.out[id.index()]
    }

    fn in_edges(&self, id: NodeId) -> &[Edge] {
        &self.inc[id.index()]
    }

    /// Directed: out + in. Undirected: number of incident edge ends.
    fn degree(&self, id: NodeId) -> usize {
        match self.directedness {
            Directedness::Directed => self.out[id.index()].len() + self.inc[id.index()].len(),
            Directedness::Undirected => self.out[id.index()].len(),
        }
    }

    fn edge_weight(&self, edge: EdgeId) -> f64 {
        match self.edges.get(edge.index()) {
            Some(Some((_, data))) => data.weight,
            _ => panic!("unknown edge {edge}"),
        }
    }
}
