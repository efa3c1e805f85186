//! Data-parallel wave engine on rayon.

use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;
use ripple_arena::{ScratchBuffer, StateTracker};
use ripple_core::{EdgeStore, NodeId};

use crate::config::{ConfigError, PropagatorConfig};
use crate::engine::{WaveEngine, WaveReport, WaveState};
use crate::error::PropagationError;
use crate::visitor::{Visitor, WaveContext};

/// Parallel propagator.
///
/// Each wave splits the frontier into contiguous chunks, one per worker.
/// Workers race to claim newly reached nodes through one `AtomicBool`
/// mark per node: a relaxed load filters already-claimed targets, then a
/// compare-and-swap `false -> true` picks exactly one winner, and only the
/// winner calls [`Visitor::visit`] and records the node in its private
/// buffer. After the join the buffers are concatenated and sorted, so the
/// resulting frontier is identical to the one the sequential
/// [`Propagator`](crate::Propagator) produces. The order of `visit` calls
/// within a wave is unspecified.
///
/// Per-worker buffers keep their capacity across waves and across
/// [`reset`](WaveEngine::reset).
///
/// Frontiers smaller than [`PropagatorConfig::parallel_threshold`] are
/// expanded on the calling thread with the same semantics.
pub struct ParallelPropagator<G, V> {
    graph: G,
    visitor: V,
    wave: WaveState,
    marks: ScratchBuffer<AtomicBool>,
    locals: Vec<Vec<NodeId>>,
    threads: Option<rayon::ThreadPool>,
    threshold: usize,
}

impl<G, V> ParallelPropagator<G, V>
where
    G: EdgeStore + Sync,
    V: Visitor + Sync,
{
    /// Build an engine on the global rayon pool with default settings.
    pub fn new(graph: G, visitor: V) -> Result<Self, ConfigError> {
        Self::with_config(graph, visitor, &PropagatorConfig::default())
    }

    /// Build an engine with an explicit configuration.
    pub fn with_config(
        graph: G,
        visitor: V,
        config: &PropagatorConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let threads = match config.workers {
            Some(n) => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .thread_name(|i| format!("ripple-wave-{i}"))
                    .build()
                    .map_err(|e| ConfigError::ThreadPool(e.to_string()))?,
            ),
            None => None,
        };
        let bound = graph.node_bound();
        let marks = config.pool.rent(bound)?;
        let wave = WaveState::new(&config.pool, bound)?;
        Ok(Self {
            graph,
            visitor,
            wave,
            marks,
            locals: vec![Vec::new(); config.resolved_workers()],
            threads,
            threshold: config.parallel_threshold,
        })
    }

    /// Number of frontier chunks per wave.
    pub fn workers(&self) -> usize {
        self.locals.len()
    }

    /// Inline-expansion cutoff.
    pub fn parallel_threshold(&self) -> usize {
        self.threshold
    }
}

/// Expand one frontier node, claiming each newly reached target.
fn expand<G, V>(
    graph: &G,
    visitor: &V,
    ctx: &WaveContext<'_>,
    marks: &[AtomicBool],
    node: NodeId,
    out: &mut Vec<NodeId>,
) where
    G: EdgeStore + ?Sized,
    V: Visitor + ?Sized,
{
    for edge in graph.out_edges(node) {
        if !visitor.select(edge, ctx) {
            continue;
        }
        let mark = &marks[edge.target.index()];
        if mark.load(Ordering::Relaxed) {
            continue;
        }
        if mark
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            visitor.visit(edge.target, ctx);
            out.push(edge.target);
        }
    }
}

impl<G, V> WaveEngine for ParallelPropagator<G, V>
where
    G: EdgeStore + Sync,
    V: Visitor + Sync,
{
    type Graph = G;
    type Visitor = V;

    fn set_position(&mut self, seeds: &[NodeId]) -> Result<(), PropagationError> {
        self.ensure_usable()?;
        self.wave.seed(&self.graph, seeds)
    }

    fn propagate(&mut self) -> Result<WaveReport, PropagationError> {
        self.ensure_usable()?;
        let generation = self.wave.begin();
        let span = tracing::debug_span!("propagate", engine = "parallel", generation);
        let _enter = span.enter();

        let WaveState {
            state,
            frontier,
            next,
            ..
        } = &mut self.wave;
        let ctx = WaveContext::new(generation, state);
        self.visitor.start(&ctx);

        let frontier: &[NodeId] = frontier;
        let graph = &self.graph;
        let visitor = &self.visitor;
        let marks: &[AtomicBool] = &self.marks;

        if frontier.len() < self.threshold {
            let local = &mut self.locals[0];
            for &node in frontier {
                expand(graph, visitor, &ctx, marks, node, local);
            }
        } else {
            let chunk = frontier.len().div_ceil(self.locals.len()).max(1);
            let locals = &mut self.locals;
            let ctx = &ctx;
            let mut fan_out = move || {
                frontier
                    .par_chunks(chunk)
                    .zip(locals.par_iter_mut())
                    .for_each(|(nodes, local)| {
                        for &node in nodes {
                            expand(graph, visitor, ctx, marks, node, local);
                        }
                    });
            };
            match &self.threads {
                Some(pool) => pool.install(fan_out),
                None => fan_out(),
            }
        }

        for local in &mut self.locals {
            next.append(local);
        }
        for &node in next.iter() {
            self.marks[node.index()].store(false, Ordering::Relaxed);
        }
        next.sort_unstable();
        self.visitor.end(&ctx);

        Ok(self.wave.finish("parallel"))
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
            self.marks.zero();
        }
        self.wave.rebind(bound)?;
        for local in &mut self.locals {
            local.clear();
        }
        let graph = std::mem::replace(&mut self.graph, graph);
        let visitor = std::mem::replace(&mut self.visitor, visitor);
        Ok((graph, visitor))
    }

    fn into_parts(self) -> (G, V) {
        (self.graph, self.visitor)
    }
}

impl<G, V> std::fmt::Debug for ParallelPropagator<G, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParallelPropagator")
            .field("workers", &self.locals.len())
            .field("dedicated_pool", &self.threads.is_some())
            .field("threshold", &self.threshold)
            .field("generation", &self.wave.generation)
            .field("frontier", &self.wave.frontier.len())
            .field("poisoned", &self.wave.poisoned)
            .finish_non_exhaustive()
    }
}
