//! Sequential and parallel engines agree wave for wave, and both recover
//! from a panicking visitor only through `reset`.

use std::panic::{catch_unwind, AssertUnwindSafe};

use proptest::prelude::*;
use ripple_core::{NodeId, NodeStore};
use ripple_propagator::{
    ParallelPropagator, PropagationError, Propagator, PropagatorConfig, WaveEngine,
};
use ripple_test_utils::fixtures::{chain, random_graph, random_undirected};
use ripple_test_utils::{PanickingVisitor, RecordingVisitor};

fn poison<E: WaveEngine>(engine: &mut E) {
    engine.set_position(&[NodeId(0)]).unwrap();
    engine.propagate().unwrap();
    let unwound = catch_unwind(AssertUnwindSafe(|| engine.propagate()));
    assert!(unwound.is_err());
    assert!(engine.is_poisoned());
}

#[test]
fn sequential_poisoning_requires_reset() {
    let g = chain(4);
    let mut p = Propagator::new(&g, PanickingVisitor::new(NodeId(2))).unwrap();
    poison(&mut p);

    assert_eq!(p.propagate(), Err(PropagationError::Poisoned));
    assert_eq!(p.set_position(&[NodeId(0)]), Err(PropagationError::Poisoned));
    assert_eq!(
        p.add_node_state(1, &[NodeId(0)]),
        Err(PropagationError::Poisoned)
    );
    assert_eq!(p.run_to_completion(5), Err(PropagationError::Poisoned));
    // Reads still answer.
    assert_eq!(p.generation(), 1);

    p.reset(&g, PanickingVisitor::new(NodeId(9))).unwrap();
    assert!(!p.is_poisoned());
    p.set_position(&[NodeId(0)]).unwrap();
    assert_eq!(p.run_to_completion(10), Ok(4));
}

#[test]
fn parallel_poisoning_requires_reset() {
    let g = chain(4);
    let config = PropagatorConfig::new()
        .with_workers(2)
        .with_parallel_threshold(0);
    let mut p =
        ParallelPropagator::with_config(&g, PanickingVisitor::new(NodeId(2)), &config).unwrap();
    poison(&mut p);
    assert_eq!(p.propagate(), Err(PropagationError::Poisoned));

    p.reset(&g, PanickingVisitor::new(NodeId(9))).unwrap();
    p.set_position(&[NodeId(1)]).unwrap();
    // The mark left on node 2 by the unwound wave was cleared by reset.
    p.propagate().unwrap();
    assert_eq!(p.frontier(), &[NodeId(2)]);
}

fn compare<G>(g: &G, seeds: &[NodeId], waves: usize, workers: usize)
where
    G: ripple_core::EdgeStore + Sync,
{
    let config = PropagatorConfig::new()
        .with_workers(workers)
        .with_parallel_threshold(0);
    let mut seq = Propagator::new(g, RecordingVisitor::new(g.node_bound())).unwrap();
    let mut par =
        ParallelPropagator::with_config(g, RecordingVisitor::new(g.node_bound()), &config)
            .unwrap();
    seq.set_position(seeds).unwrap();
    par.set_position(seeds).unwrap();
    for _ in 0..waves {
        assert_eq!(seq.propagate().unwrap(), par.propagate().unwrap());
        assert_eq!(seq.frontier(), par.frontier());
    }
    assert_eq!(seq.visitor().waves(), par.visitor().waves());
    assert_eq!(seq.visitor().selected(), par.visitor().selected());
    for id in (0..g.node_bound()).map(NodeId::from_index) {
        assert_eq!(seq.visitor().hits(id), par.visitor().hits(id));
    }
}

#[test]
fn dense_undirected_graph_agrees() {
    let g = random_undirected(11, 200, 0.1);
    compare(&g, &[NodeId(0), NodeId(100)], 6, 8);
}

#[cfg(not(miri))]
mod proptests {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(48))]

        #[test]
        fn engines_agree_on_random_graphs(
            seed in any::<u64>(),
            nodes in 1u32..120,
            edge_factor in 0usize..6,
            seeds in proptest::collection::vec(any::<prop::sample::Index>(), 1..6),
            workers in 1usize..6,
        ) {
            let g = random_graph(seed, nodes, nodes as usize * edge_factor, 1.0);
            let seeds: Vec<_> = seeds
                .iter()
                .map(|i| NodeId::from_index(i.index(nodes as usize)))
                .collect();
            compare(&g, &seeds, 8, workers);
        }
    }
}
