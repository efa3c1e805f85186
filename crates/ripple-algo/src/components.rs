//! Weakly connected components.
//!
//! A single wave seeded with every stored node: the visitor unions the two
//! endpoints of each edge it is offered and never approves one, so the
//! wave expands every edge exactly once and the next frontier is empty.

use ripple_core::{Edge, EdgeStore, NodeId};
use ripple_propagator::{Visitor, WaveContext};

use crate::run::{with_engine, AlgoError, RunOptions};
use crate::union_find::UnionFind;

struct Link {
    sets: UnionFind,
}

impl Visitor for Link {
    fn select(&self, edge: &Edge, _: &WaveContext<'_>) -> bool {
        self.sets.union(edge.source, edge.target);
        false
    }

    fn visit(&self, _: NodeId, _: &WaveContext<'_>) {}
}

/// Components found by [`weak_components`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Components {
    groups: Vec<Vec<NodeId>>,
    label: Vec<Option<usize>>,
}

impl Components {
    /// Number of components.
    pub fn count(&self) -> usize {
        self.groups.len()
    }

    /// Components ordered by smallest member, members ascending.
    pub fn groups(&self) -> &[Vec<NodeId>] {
        &self.groups
    }

    /// Index into [`groups`](Self::groups) of the component holding `id`.
    pub fn component_of(&self, id: NodeId) -> Option<usize> {
        self.label.get(id.index()).copied().flatten()
    }

    /// Whether `a` and `b` are connected ignoring edge direction.
    pub fn connected(&self, a: NodeId, b: NodeId) -> bool {
        match (self.component_of(a), self.component_of(b)) {
            (Some(x), Some(y)) => x == y,
            _ => false,
        }
    }
}

/// Group the stored nodes of `graph` into weakly connected components.
///
/// Gaps in the id range are not members of any component.
pub fn weak_components<G>(graph: &G, options: &RunOptions) -> Result<Components, AlgoError>
where
    G: EdgeStore + Sync + ?Sized,
{
    let bound = graph.node_bound();
    let link = Link {
        sets: UnionFind::with_pool(&options.engine.pool, bound)?,
    };
    let nodes: Vec<NodeId> = (0..bound)
        .map(NodeId::from_index)
        .filter(|&id| graph.contains(id))
        .collect();

    let sets = with_engine(graph, link, options, |engine| {
        engine.set_position(&nodes)?;
        let report = engine.propagate()?;
        debug_assert!(engine.frontier().is_empty());
        tracing::trace!(?report, "components wave");
        Ok(engine.visitor().sets.groups())
    })?;

    let mut label = vec![None; bound];
    let groups: Vec<Vec<NodeId>> = sets
        .into_values()
        .map(|members| members.into_iter().filter(|&id| graph.contains(id)).collect::<Vec<_>>())
        .filter(|members| !members.is_empty())
        .collect();
    for (k, members) in groups.iter().enumerate() {
        for &id in members {
            label[id.index()] = Some(k);
        }
    }
    tracing::debug!(components = groups.len(), "weak components");
    Ok(Components { groups, label })
}
