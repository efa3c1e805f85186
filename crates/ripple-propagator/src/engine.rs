//! The engine interface shared by the sequential and parallel propagators.

use ripple_arena::{ArenaError, ScratchPool, StateTracker};
use ripple_core::{EdgeStore, NodeId, NodeStore};

use crate::error::PropagationError;
use crate::visitor::Visitor;

/// Summary of one completed wave.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WaveReport {
    /// 1-based index of the wave.
    pub generation: u64,
    /// Frontier nodes expanded.
    pub expanded: usize,
    /// Nodes reached, which form the next frontier.
    pub reached: usize,
}

/// A generation-based propagation engine.
///
/// An engine owns a graph (any [`EdgeStore`], including `&S` and `Arc<S>`),
/// a [`Visitor`], a frontier and a persistent [`StateTracker`]. Each call
/// to [`propagate`](Self::propagate) runs one wave from the current
/// frontier and replaces it with the set of nodes reached.
///
/// # Poisoning
///
/// A panic inside a visitor callback unwinds out of `propagate()` and
/// leaves the engine poisoned. Every later operation that runs or seeds a
/// wave, or mutates persistent state, returns
/// [`PropagationError::Poisoned`] until [`reset`](Self::reset) is called.
/// Read-only accessors keep answering.
pub trait WaveEngine {
    /// The graph type traversed.
    type Graph: EdgeStore;
    /// The visitor type driven.
    type Visitor: Visitor;

    /// Replace the frontier with `seeds`, sorted and deduplicated.
    ///
    /// Fails with [`PropagationError::InvalidNode`] if any seed is not a
    /// stored node; the frontier is left unchanged in that case.
    fn set_position(&mut self, seeds: &[NodeId]) -> Result<(), PropagationError>;

    /// Run one wave.
    fn propagate(&mut self) -> Result<WaveReport, PropagationError>;

    /// The current frontier, ascending.
    fn frontier(&self) -> &[NodeId];

    /// Number of completed waves since construction or the last reset.
    fn generation(&self) -> u64;

    /// The persistent per-node flags.
    fn state(&self) -> &StateTracker;

    /// Whether a wave unwound and the engine awaits [`reset`](Self::reset).
    fn is_poisoned(&self) -> bool;

    /// The graph being traversed.
    fn graph(&self) -> &Self::Graph;

    /// The visitor being driven.
    fn visitor(&self) -> &Self::Visitor;

    /// Mutable access to the visitor between waves.
    fn visitor_mut(&mut self) -> &mut Self::Visitor;

    /// Rebind to a new graph and visitor, returning the old pair.
    ///
    /// Clears the frontier, the generation counter, persistent state and
    /// poisoning. Scratch buffers are re-rented only if the new graph's
    /// node bound exceeds the current one.
    fn reset(
        &mut self,
        graph: Self::Graph,
        visitor: Self::Visitor,
    ) -> Result<(Self::Graph, Self::Visitor), PropagationError>;

    /// Consume the engine, returning its graph and visitor.
    fn into_parts(self) -> (Self::Graph, Self::Visitor)
    where
        Self: Sized;

    /// Fail with [`PropagationError::Poisoned`] if the engine is poisoned.
    fn ensure_usable(&self) -> Result<(), PropagationError> {
        if self.is_poisoned() {
            tracing::warn!("poisoned propagator used before reset");
            return Err(PropagationError::Poisoned);
        }
        Ok(())
    }

    /// Whether `id` carries every bit of `flag`.
    fn is_node_in_state(&self, id: NodeId, flag: u8) -> bool {
        self.state().is_in_state(flag, id)
    }

    /// Overwrite the flag byte of each listed node.
    fn set_node_state(&mut self, flag: u8, ids: &[NodeId]) -> Result<(), PropagationError> {
        self.ensure_usable()?;
        self.state().set_state(flag, ids);
        Ok(())
    }

    /// OR `flag` into each listed node.
    fn add_node_state(&mut self, flag: u8, ids: &[NodeId]) -> Result<(), PropagationError> {
        self.ensure_usable()?;
        self.state().add_state(flag, ids);
        Ok(())
    }

    /// Clear the bits of `flag` on each listed node.
    fn remove_node_state(&mut self, flag: u8, ids: &[NodeId]) -> Result<(), PropagationError> {
        self.ensure_usable()?;
        self.state().remove_state(flag, ids);
        Ok(())
    }

    /// Propagate until the frontier is empty or `stop` returns `true` for
    /// a completed wave. Returns the number of waves run.
    ///
    /// Fails with [`PropagationError::WaveLimitExceeded`] if `max_waves`
    /// waves have run and neither condition holds.
    fn run_until<F>(&mut self, max_waves: usize, mut stop: F) -> Result<usize, PropagationError>
    where
        F: FnMut(&WaveReport) -> bool,
        Self: Sized,
    {
        self.ensure_usable()?;
        let mut waves = 0;
        while !self.frontier().is_empty() {
            if waves == max_waves {
                return Err(PropagationError::WaveLimitExceeded { limit: max_waves });
            }
            let report = self.propagate()?;
            waves += 1;
            if stop(&report) {
                break;
            }
        }
        Ok(waves)
    }

    /// Propagate until the frontier is empty.
    fn run_to_completion(&mut self, max_waves: usize) -> Result<usize, PropagationError>
    where
        Self: Sized,
    {
        self.run_until(max_waves, |_| false)
    }
}

/// Frontier, persistent state and bookkeeping common to both engines.
#[derive(Debug)]
pub(crate) struct WaveState {
    pub(crate) pool: ScratchPool,
    pub(crate) state: StateTracker,
    pub(crate) frontier: Vec<NodeId>,
    pub(crate) next: Vec<NodeId>,
    pub(crate) generation: u64,
    pub(crate) poisoned: bool,
}

impl WaveState {
    pub(crate) fn new(pool: &ScratchPool, bound: usize) -> Result<Self, ArenaError> {
        Ok(Self {
            pool: pool.clone(),
            state: StateTracker::new(pool, bound)?,
            frontier: Vec::new(),
            next: Vec::new(),
            generation: 0,
            poisoned: false,
        })
    }

    /// Validate and install a new frontier.
    pub(crate) fn seed<G: NodeStore + ?Sized>(
        &mut self,
        graph: &G,
        seeds: &[NodeId],
    ) -> Result<(), PropagationError> {
        if let Some(&node) = seeds.iter().find(|&&id| !graph.contains(id)) {
            return Err(PropagationError::InvalidNode {
                node,
                bound: graph.node_bound(),
            });
        }
        self.frontier.clear();
        self.frontier.extend_from_slice(seeds);
        self.frontier.sort_unstable();
        self.frontier.dedup();
        tracing::trace!(seeds = self.frontier.len(), "frontier re-seeded");
        Ok(())
    }

    /// Mark the start of a wave; returns its generation.
    pub(crate) fn begin(&mut self) -> u64 {
        self.poisoned = true;
        self.next.clear();
        self.generation + 1
    }

    /// Swap in the next frontier and close the wave.
    pub(crate) fn finish(&mut self, engine: &'static str) -> WaveReport {
        let report = WaveReport {
            generation: self.generation + 1,
            expanded: self.frontier.len(),
            reached: self.next.len(),
        };
        std::mem::swap(&mut self.frontier, &mut self.next);
        self.next.clear();
        self.generation = report.generation;
        self.poisoned = false;
        tracing::debug!(
            engine,
            generation = report.generation,
            expanded = report.expanded,
            reached = report.reached,
            "wave complete"
        );
        report
    }

    /// Clear everything for a graph with `bound` node slots.
    ///
    /// On error nothing has been cleared.
    pub(crate) fn rebind(&mut self, bound: usize) -> Result<(), ArenaError> {
        self.state.reset(&self.pool, bound)?;
        self.frontier.clear();
        self.next.clear();
        self.generation = 0;
        self.poisoned = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ripple_arena::ArenaConfig;

    struct Gapped;

    impl NodeStore for Gapped {
        fn node_bound(&self) -> usize {
            4
        }
        fn contains(&self, id: NodeId) -> bool {
            id.0 < 4 && id.0 != 2
        }
        fn node_count(&self) -> usize {
            3
        }
    }

    fn wave_state(bound: usize) -> WaveState {
        let pool = ScratchPool::new(ArenaConfig::default()).unwrap();
        WaveState::new(&pool, bound).unwrap()
    }

    #[test]
    fn seed_sorts_and_dedups() {
        let mut w = wave_state(4);
        w.seed(&Gapped, &[NodeId(3), NodeId(0), NodeId(3)]).unwrap();
        assert_eq!(w.frontier, vec![NodeId(0), NodeId(3)]);
    }

    #[test]
    fn seed_rejects_gap_and_keeps_frontier() {
        let mut w = wave_state(4);
        w.seed(&Gapped, &[NodeId(1)]).unwrap();
        let err = w.seed(&Gapped, &[NodeId(0), NodeId(2)]).unwrap_err();
        assert_eq!(
            err,
            PropagationError::InvalidNode {
                node: NodeId(2),
                bound: 4
            }
        );
        assert_eq!(w.frontier, vec![NodeId(1)]);
    }

    #[test]
    fn finish_swaps_and_counts() {
        let mut w = wave_state(4);
        w.seed(&Gapped, &[NodeId(0)]).unwrap();
        assert_eq!(w.begin(), 1);
        assert!(w.poisoned);
        w.next.extend([NodeId(1), NodeId(3)]);
        let r = w.finish("test");
        assert_eq!(
            r,
            WaveReport {
                generation: 1,
                expanded: 1,
                reached: 2
            }
        );
        assert_eq!(w.frontier, vec![NodeId(1), NodeId(3)]);
        assert!(w.next.is_empty());
        assert!(!w.poisoned);
    }

    #[test]
    fn rebind_grows_only_when_needed() {
        let mut w = wave_state(4);
        w.state.add_state(1, &[NodeId(0)]);
        w.generation = 5;
        w.rebind(2).unwrap();
        assert_eq!(w.state.len(), 4);
        assert_eq!(w.state.state(NodeId(0)), 0);
        assert_eq!(w.generation, 0);
        w.rebind(10).unwrap();
        assert_eq!(w.state.len(), 10);
    }
}
