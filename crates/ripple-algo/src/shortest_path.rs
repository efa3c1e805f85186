//! Label-correcting single- and multi-source shortest paths.
//!
//! Each wave relaxes the out-edges of every node whose distance improved
//! in the previous wave. An edge is selected only if it lowers its
//! target's tentative distance, so the frontier empties exactly when a
//! wave improves nothing: the distances are then a fixed point of the
//! Bellman-Ford relaxation. Negative weights are allowed; a reachable
//! negative cycle never reaches a fixed point and surfaces as
//! [`PropagationError::WaveLimitExceeded`](ripple_propagator::PropagationError::WaveLimitExceeded).

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use ripple_core::{Edge, EdgeStore, NodeId};
use ripple_propagator::{Visitor, WaveContext};

use crate::run::{drain, with_engine, AlgoError, RunOptions};

/// Tentative distances stored as `f64` bit patterns.
struct Relax<'g, G: ?Sized> {
    graph: &'g G,
    dist: Vec<AtomicU64>,
    improved: AtomicBool,
    improving_waves: usize,
}

impl<G: EdgeStore + ?Sized> Relax<'_, G> {
    fn dist(&self, id: NodeId) -> f64 {
        f64::from_bits(self.dist[id.index()].load(Ordering::Acquire))
    }

    /// Lower `slot` to `candidate` if that is an improvement.
    fn lower(slot: &AtomicU64, candidate: f64) -> bool {
        if candidate.is_nan() {
            return false;
        }
        let mut current = slot.load(Ordering::Acquire);
        loop {
            if f64::from_bits(current) <= candidate {
                return false;
            }
            match slot.compare_exchange_weak(
                current,
                candidate.to_bits(),
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return true,
                Err(actual) => current = actual,
            }
        }
    }
}

impl<G: EdgeStore + ?Sized> Visitor for Relax<'_, G> {
    fn start(&mut self, _: &WaveContext<'_>) {
        *self.improved.get_mut() = false;
    }

    fn select(&self, edge: &Edge, _: &WaveContext<'_>) -> bool {
        let candidate = self.dist(edge.source) + self.graph.edge_weight(edge.id);
        let lowered = Self::lower(&self.dist[edge.target.index()], candidate);
        if lowered {
            self.improved.store(true, Ordering::Relaxed);
        }
        lowered
    }

    fn visit(&self, _: NodeId, _: &WaveContext<'_>) {}

    fn end(&mut self, _: &WaveContext<'_>) {
        if *self.improved.get_mut() {
            self.improving_waves += 1;
        }
    }
}

/// Result of [`shortest_paths`].
#[derive(Clone, Debug, PartialEq)]
pub struct ShortestPaths {
    sources: Vec<NodeId>,
    dist: Vec<f64>,
    pred: Vec<Option<NodeId>>,
    waves: usize,
}

impl ShortestPaths {
    /// Distance from the nearest source, `None` if unreachable.
    pub fn distance(&self, id: NodeId) -> Option<f64> {
        self.dist
            .get(id.index())
            .copied()
            .filter(|d| d.is_finite())
    }

    /// All distances by node id; unreachable nodes hold `f64::INFINITY`.
    pub fn distances(&self) -> &[f64] {
        &self.dist
    }

    /// Predecessor of `id` on a shortest path.
    ///
    /// The smallest-id in-neighbour that realises the distance, so the
    /// tree is the same whichever engine computed it.
    pub fn predecessor(&self, id: NodeId) -> Option<NodeId> {
        self.pred.get(id.index()).copied().flatten()
    }

    /// Node sequence from a source to `target`, or `None` if unreachable.
    ///
    /// Returns `None` as well when zero-weight cycles make the predecessor
    /// chain loop.
    pub fn path_to(&self, target: NodeId) -> Option<Vec<NodeId>> {
        self.distance(target)?;
        let mut path = vec![target];
        let mut at = target;
        while !self.sources.contains(&at) {
            at = self.predecessor(at)?;
            path.push(at);
            if path.len() > self.dist.len() {
                return None;
            }
        }
        path.reverse();
        Some(path)
    }

    /// Waves run before the fixed point.
    pub fn waves(&self) -> usize {
        self.waves
    }
}

/// Shortest distances from `sources` along edge weights.
///
/// Fails with [`AlgoError::Propagation`] if a source is not a stored node
/// or the wave cap is reached.
pub fn shortest_paths<G>(
    graph: &G,
    sources: &[NodeId],
    options: &RunOptions,
) -> Result<ShortestPaths, AlgoError>
where
    G: EdgeStore + Sync + ?Sized,
{
    let bound = graph.node_bound();
    let relax = Relax {
        graph,
        dist: (0..bound)
            .map(|_| AtomicU64::new(f64::INFINITY.to_bits()))
            .collect(),
        improved: AtomicBool::new(false),
        improving_waves: 0,
    };
    let max_waves = options.resolved_max_waves(bound);

    let (dist, waves) = with_engine(graph, relax, options, |engine| {
        engine.set_position(sources)?;
        for &s in sources {
            engine.visitor().dist[s.index()].store(0.0f64.to_bits(), Ordering::Release);
        }
        let waves = drain(engine, max_waves)?;
        let relax = engine.visitor();
        debug_assert!(relax.improving_waves <= waves);
        let dist: Vec<f64> = (0..bound).map(|i| relax.dist(NodeId::from_index(i))).collect();
        Ok((dist, waves))
    })?;

    let pred = (0..bound)
        .map(NodeId::from_index)
        .map(|v| {
            if sources.contains(&v) || !dist[v.index()].is_finite() {
                return None;
            }
            graph
                .in_edges(v)
                .iter()
                .filter(|e| dist[e.source.index()] + graph.edge_weight(e.id) == dist[v.index()])
                .map(|e| e.source)
                .min()
        })
        .collect();

    tracing::debug!(sources = sources.len(), waves, "shortest paths converged");
    Ok(ShortestPaths {
        sources: sources.to_vec(),
        dist,
        pred,
        waves,
    })
}
