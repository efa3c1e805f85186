//! Topological layering with atomic in-degree counters.
//!
//! Kahn's algorithm expressed as waves: every node starts with a counter
//! equal to its in-degree, each selected edge decrements its target's
//! counter, and the one edge that brings a counter to zero is the edge
//! that releases the node into the next layer. A node's layer is
//! therefore the length of the longest path reaching it from a source.

use std::sync::atomic::{AtomicU32, Ordering};

use ripple_core::{Edge, EdgeStore, NodeId};
use ripple_propagator::{PropagationError, Visitor, WaveContext};

use crate::run::{with_engine, AlgoError, RunOptions};

/// Persistent flag set on every node that has been placed in a layer.
pub const QUEUED: u8 = 0b0000_0001;

struct Kahn {
    remaining: Vec<AtomicU32>,
}

impl Visitor for Kahn {
    fn select(&self, edge: &Edge, _: &WaveContext<'_>) -> bool {
        self.remaining[edge.target.index()].fetch_sub(1, Ordering::AcqRel) == 1
    }

    fn visit(&self, node: NodeId, ctx: &WaveContext<'_>) {
        ctx.state().add_state(QUEUED, &[node]);
    }
}

/// Nodes grouped by depth.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layers {
    layers: Vec<Vec<NodeId>>,
    depth: Vec<Option<u32>>,
}

impl Layers {
    /// Layer `k` holds the nodes whose longest incoming path has `k`
    /// edges, ascending.
    pub fn layers(&self) -> &[Vec<NodeId>] {
        &self.layers
    }

    /// Layer index of `id`.
    pub fn depth(&self, id: NodeId) -> Option<u32> {
        self.depth.get(id.index()).copied().flatten()
    }

    /// A topological order: layers concatenated.
    pub fn order(&self) -> Vec<NodeId> {
        self.layers.iter().flatten().copied().collect()
    }
}

/// Layer the nodes of a directed acyclic graph.
///
/// Fails with [`AlgoError::Cycle`] listing the nodes that could not be
/// placed if the graph has a cycle. In an undirected store every edge is a
/// two-cycle, so only isolated nodes are placed.
pub fn topological_layers<G>(graph: &G, options: &RunOptions) -> Result<Layers, AlgoError>
where
    G: EdgeStore + Sync + ?Sized,
{
    let bound = graph.node_bound();
    let nodes: Vec<NodeId> = (0..bound)
        .map(NodeId::from_index)
        .filter(|&id| graph.contains(id))
        .collect();
    let remaining = (0..bound)
        .map(NodeId::from_index)
        .map(|id| {
            let degree = if graph.contains(id) { graph.in_degree(id) } else { 0 };
            AtomicU32::new(u32::try_from(degree).unwrap_or(u32::MAX))
        })
        .collect();
    let roots: Vec<NodeId> = nodes
        .iter()
        .copied()
        .filter(|&id| graph.in_degree(id) == 0)
        .collect();
    let kahn = Kahn { remaining };
    let max_waves = options.resolved_max_waves(bound);

    let (layers, unplaced) = with_engine(graph, kahn, options, |engine| {
        engine.set_position(&roots)?;
        engine.add_node_state(QUEUED, &roots)?;
        let mut layers = Vec::new();
        while !engine.frontier().is_empty() {
            if layers.len() == max_waves {
                return Err(PropagationError::WaveLimitExceeded { limit: max_waves }.into());
            }
            layers.push(engine.frontier().to_vec());
            engine.propagate()?;
        }
        let unplaced: Vec<NodeId> = nodes
            .iter()
            .copied()
            .filter(|&id| !engine.is_node_in_state(id, QUEUED))
            .collect();
        Ok((layers, unplaced))
    })?;

    if !unplaced.is_empty() {
        tracing::debug!(unplaced = unplaced.len(), "cycle detected during layering");
        return Err(AlgoError::Cycle { unplaced });
    }

    let mut depth = vec![None; bound];
    for (k, layer) in layers.iter().enumerate() {
        for &id in layer {
            depth[id.index()] = Some(u32::try_from(k).unwrap_or(u32::MAX));
        }
    }
    Ok(Layers { layers, depth })
}

/// Whether `graph` has no directed cycle.
pub fn is_acyclic<G>(graph: &G, options: &RunOptions) -> Result<bool, AlgoError>
where
    G: EdgeStore + Sync + ?Sized,
{
    match topological_layers(graph, options) {
        Ok(_) => Ok(true),
        Err(AlgoError::Cycle { .. }) => Ok(false),
        Err(e) => Err(e),
    }
}
