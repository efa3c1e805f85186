//! Single-threaded wave engine.

use ripple_arena::{ScratchBuffer, StateTracker};
use ripple_core::{EdgeStore, NodeId};

use crate::config::{ConfigError, PropagatorConfig};
use crate::engine::{WaveEngine, WaveReport, WaveState};
use crate::error::PropagationError;
use crate::visitor::{Visitor, WaveContext};

/// Sequential propagator.
///
/// Frontier nodes are expanded in ascending id order and their out-edges
/// in store order, so for a given store and seed the sequence of
/// `select`/`visit` calls is fully deterministic.
///
/// # Example
///
/// ```
/// use ripple_propagator::{FnVisitor, Propagator, WaveEngine};
/// use ripple_core::NodeId;
/// use ripple_store::{AdjacencyStore, Directedness};
///
/// let g = AdjacencyStore::from_edges(Directedness::Directed, 3, &[(0, 1), (1, 2)]).unwrap();
/// let mut p = Propagator::new(&g, FnVisitor::new(|_, _| true, |_, _| {})).unwrap();
/// p.set_position(&[NodeId(0)]).unwrap();
/// p.propagate().unwrap();
/// assert_eq!(p.frontier(), &[NodeId(1)]);
/// p.propagate().unwrap();
/// assert_eq!(p.frontier(), &[NodeId(2)]);
/// ```
pub struct Propagator<G, V> {
    graph: G,
    visitor: V,
    wave: WaveState,
    marks: ScratchBuffer<bool>,
}

impl<G: EdgeStore, V: Visitor> Propagator<G, V> {
    /// Build an engine renting from the global scratch pool.
    pub fn new(graph: G, visitor: V) -> Result<Self, ConfigError> {
        Self::with_config(graph, visitor, &PropagatorConfig::default())
    }

    /// Build an engine with an explicit configuration.
    ///
    /// Only [`PropagatorConfig::pool`] is used.
    pub fn with_config(
        graph: G,
        visitor: V,
        config: &PropagatorConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let bound = graph.node_bound();
        let marks = config.pool.rent(bound)?;
        let wave = WaveState::new(&config.pool, bound)?;
        Ok(Self {
            graph,
            visitor,
            wave,
            marks,
        })
    }
}

impl<G: EdgeStore, V: Visitor> WaveEngine for Propagator<G, V> {
    type Graph = G;
    type Visitor = V;

    fn set_position(&mut self, seeds: &[NodeId]) -> Result<(), PropagationError> {
        self.ensure_usable()?;
        self.wave.seed(&self.graph, seeds)
    }

    fn propagate(&mut self) -> Result<WaveReport, PropagationError> {
        self.ensure_usable()?;
        let generation = self.wave.begin();
        let span = tracing::debug_span!("propagate", engine = "sequential", generation);
        let _enter = span.enter();

        let WaveState {
            state,
            frontier,
            next,
            ..
        } = &mut self.wave;
        let ctx = WaveContext::new(generation, state);
        self.visitor.start(&ctx);

        for &node in frontier.iter() {
            for edge in self.graph.out_edges(node) {
                if !self.visitor.select(edge, &ctx) {
                    continue;
                }
                let mark = &mut self.marks[edge.target.index()];
                if !*mark {
                    *mark = true;
                    self.visitor.visit(edge.target, &ctx);
                    next.push(edge.target);
                }
            }
        }

        for &node in next.iter() {
            self.marks[node.index()] = false;
        }
        next.sort_unstable();
        self.visitor.end(&ctx);

        Ok(self.wave.finish("sequential"))
    }

    fn frontier(&self) -> &[NodeId] {
        &self.wave.frontier
    }

    fn generation(&self) -> u64 {
        self.wave.generation
    }

    fn state(&self) -> &StateTracker {
        &self.wave.state
    }

    fn is_poisoned(&self) -> bool {
        self.wave.poisoned
    }

    fn graph(&self) -> &G {
        &self.graph
    }

    fn visitor(&self) -> &V {
        &self.visitor
    }

    fn visitor_mut(&mut self) -> &mut V {
        &mut self.visitor
    }

    fn reset(&mut self, graph: G, visitor: V) -> Result<(G, V), PropagationError> {
        let bound = graph.node_bound();
        if bound > self.marks.len() {
            self.marks = self.wave.pool.rent(bound)?;
        } else {
            // A poisoned wave may have left marks behind.
            self.marks.zero();
        }
        self.wave.rebind(bound)?;
        let graph = std::mem::replace(&mut self.graph, graph);
        let visitor = std::mem::replace(&mut self.visitor, visitor);
        Ok((graph, visitor))
    }

    fn into_parts(self) -> (G, V) {
        (self.graph, self.visitor)
    }
}

impl<G, V> std::fmt::Debug for Propagator<G, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Propagator")
            .field("generation", &self.wave.generation)
            .field("frontier", &self.wave.frontier.len())
            .field("poisoned", &self.wave.poisoned)
            .finish_non_exhaustive()
    }
}
