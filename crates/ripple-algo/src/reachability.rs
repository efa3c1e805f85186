//! Single-source reachability and pruning of unreachable nodes.

use ripple_core::{Edge, EdgeStore, NodeId};
use ripple_propagator::{Visitor, WaveContext};
use ripple_store::AdjacencyStore;

use crate::run::{drain, with_engine, AlgoError, RunOptions};

/// Persistent flag: reached from the root.
pub const REACHED: u8 = 0b0000_0001;
/// Persistent flag: not (yet) reached; the removal candidates.
pub const TO_REMOVE: u8 = 0b0000_0010;

struct Sweep;

impl Visitor for Sweep {
    fn select(&self, edge: &Edge, ctx: &WaveContext<'_>) -> bool {
        !ctx.state().is_in_state(REACHED, edge.target)
    }

    fn visit(&self, node: NodeId, ctx: &WaveContext<'_>) {
        let state = ctx.state();
        state.add_state(REACHED, &[node]);
        state.remove_state(TO_REMOVE, &[node]);
    }
}

/// Outcome of [`reachable_from`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reachability {
    /// Stored nodes reachable from the root, root included, ascending.
    pub reached: Vec<NodeId>,
    /// Stored nodes not reachable from the root, ascending.
    pub unreached: Vec<NodeId>,
    /// Waves run.
    pub waves: usize,
}

/// Partition the stored nodes by reachability from `root` along
/// out-edges.
pub fn reachable_from<G>(
    graph: &G,
    root: NodeId,
    options: &RunOptions,
) -> Result<Reachability, AlgoError>
where
    G: EdgeStore + Sync + ?Sized,
{
    let bound = graph.node_bound();
    let max_waves = options.resolved_max_waves(bound);
    with_engine(graph, Sweep, options, |engine| {
        engine.set_position(&[root])?;
        let state = engine.state();
        state.set_state_to_all(TO_REMOVE);
        state.add_state(REACHED, &[root]);
        state.remove_state(TO_REMOVE, &[root]);

        let waves = drain(engine, max_waves)?;

        let state = engine.state();
        let stored = |id: &NodeId| graph.contains(*id);
        Ok(Reachability {
            reached: state.nodes_in_state(REACHED).filter(stored).collect(),
            unreached: state.nodes_in_state(TO_REMOVE).filter(stored).collect(),
            waves,
        })
    })
}

/// Remove every node of `store` not reachable from `root`.
///
/// Returns the partition computed before removal; ids of the surviving
/// nodes are unchanged.
pub fn prune_unreachable(
    store: &mut AdjacencyStore,
    root: NodeId,
    options: &RunOptions,
) -> Result<Reachability, AlgoError> {
    let result = reachable_from(&*store, root, options)?;
    for &id in &result.unreached {
        store.remove_node(id)?;
    }
    tracing::debug!(
        kept = result.reached.len(),
        removed = result.unreached.len(),
        "pruned unreachable nodes"
    );
    Ok(result)
}
