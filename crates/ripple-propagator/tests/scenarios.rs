//! End-to-end wave scenarios run under both engines.

use std::sync::atomic::{AtomicU8, Ordering};

use ripple_core::{Edge, NodeId, NodeStore};
use ripple_propagator::{
    ParallelPropagator, PropagationError, Propagator, PropagatorConfig, Visitor, WaveContext,
    WaveEngine,
};
use ripple_store::AdjacencyStore;
use ripple_test_utils::fixtures::{chain, diamond, random_graph, two_triangles};
use ripple_test_utils::RecordingVisitor;

fn parallel(g: &AdjacencyStore) -> ParallelPropagator<&AdjacencyStore, RecordingVisitor> {
    let config = PropagatorConfig::new()
        .with_workers(4)
        .with_parallel_threshold(0);
    ParallelPropagator::with_config(g, RecordingVisitor::new(g.node_bound()), &config)
        .unwrap()
}

fn sequential(g: &AdjacencyStore) -> Propagator<&AdjacencyStore, RecordingVisitor> {
    Propagator::new(g, RecordingVisitor::new(g.node_bound())).unwrap()
}

fn frontiers<E: WaveEngine>(engine: &mut E, seeds: &[u32], waves: usize) -> Vec<Vec<NodeId>> {
    let seeds: Vec<_> = seeds.iter().copied().map(NodeId).collect();
    engine.set_position(&seeds).unwrap();
    (0..waves)
        .map(|_| {
            engine.propagate().unwrap();
            engine.frontier().to_vec()
        })
        .collect()
}

#[test]
fn chain_advances_one_node_per_wave() {
    let g = chain(3);
    for waves in [
        frontiers(&mut sequential(&g), &[0], 3),
        frontiers(&mut parallel(&g), &[0], 3),
    ] {
        assert_eq!(waves, vec![vec![NodeId(1)], vec![NodeId(2)], vec![]]);
    }
}

#[test]
fn two_triangles_cycle_independently() {
    let g = two_triangles();
    let expected = vec![
        vec![NodeId(1), NodeId(4)],
        vec![NodeId(2), NodeId(5)],
        vec![NodeId(0), NodeId(3)],
    ];
    assert_eq!(frontiers(&mut sequential(&g), &[0, 3], 3), expected);
    assert_eq!(frontiers(&mut parallel(&g), &[3, 0], 3), expected);
}

#[test]
fn diamond_join_visited_once() {
    let g = diamond();
    let mut seq = sequential(&g);
    let mut par = parallel(&g);
    for engine_waves in [frontiers(&mut seq, &[0], 2), frontiers(&mut par, &[0], 2)] {
        assert_eq!(engine_waves[0], vec![NodeId(1), NodeId(2)]);
        assert_eq!(engine_waves[1], vec![NodeId(3)]);
    }
    assert_eq!(seq.visitor().hits(NodeId(3)), 1);
    assert_eq!(par.visitor().hits(NodeId(3)), 1);
    // Both edges into 3 are still offered to select.
    assert_eq!(seq.visitor().selected(), 4);
    assert_eq!(par.visitor().selected(), 4);
}

#[test]
fn reseeding_is_idempotent() {
    let g = diamond();
    let mut p = sequential(&g);
    p.set_position(&[NodeId(2), NodeId(1), NodeId(2)]).unwrap();
    let first = p.frontier().to_vec();
    p.set_position(&[NodeId(1), NodeId(2)]).unwrap();
    assert_eq!(p.frontier(), first.as_slice());
    assert_eq!(first, vec![NodeId(1), NodeId(2)]);
}

#[test]
fn reseed_after_run_matches_fresh_engine() {
    for seed in 0..20u64 {
        let g = random_graph(seed, 40, 120, 1.0);
        let expected = frontiers(&mut sequential(&g), &[0, 7], 6);

        let mut par = parallel(&g);
        frontiers(&mut par, &[3], 3);
        assert_eq!(frontiers(&mut par, &[7, 0, 7], 6), expected, "parallel, seed {seed}");

        let mut seq = sequential(&g);
        frontiers(&mut seq, &[3], 3);
        assert_eq!(frontiers(&mut seq, &[0, 7], 6), expected, "sequential, seed {seed}");
        assert_eq!(seq.generation(), 9);
    }
}

#[test]
fn unknown_seed_rejected() {
    let g = chain(3);
    let mut p = parallel(&g);
    assert_eq!(
        p.set_position(&[NodeId(0), NodeId(9)]),
        Err(PropagationError::InvalidNode {
            node: NodeId(9),
            bound: 3
        })
    );
    assert!(p.frontier().is_empty());
}

#[test]
fn run_until_reports_wave_limit() {
    let g = two_triangles();
    let mut p = sequential(&g);
    p.set_position(&[NodeId(0)]).unwrap();
    assert_eq!(
        p.run_to_completion(10),
        Err(PropagationError::WaveLimitExceeded { limit: 10 })
    );
    assert_eq!(p.generation(), 10);

    let g = chain(4);
    let mut p = parallel(&g);
    p.set_position(&[NodeId(0)]).unwrap();
    assert_eq!(p.run_to_completion(10), Ok(4));
    let mut q = sequential(&g);
    q.set_position(&[NodeId(0)]).unwrap();
    assert_eq!(q.run_until(10, |r| r.generation == 2), Ok(2));
    assert_eq!(q.frontier(), &[NodeId(2)]);
}

const SEEN: u8 = 0b1;

/// Follows an edge only to nodes never reached in an earlier wave.
struct FirstArrival {
    seen_in_end: AtomicU8,
}

impl Visitor for FirstArrival {
    fn select(&self, edge: &Edge, ctx: &WaveContext<'_>) -> bool {
        !ctx.state().is_in_state(SEEN, edge.target)
    }

    fn visit(&self, _: NodeId, _: &WaveContext<'_>) {}

    fn end(&mut self, ctx: &WaveContext<'_>) {
        self.seen_in_end
            .store(ctx.state().nodes_in_state(SEEN).count() as u8, Ordering::Relaxed);
    }
}

#[test]
fn persistent_state_survives_waves() {
    let g = two_triangles();
    let mut p = Propagator::new(
        &g,
        FirstArrival {
            seen_in_end: AtomicU8::new(0),
        },
    )
    .unwrap();
    p.add_node_state(SEEN, &[NodeId(0)]).unwrap();
    p.set_position(&[NodeId(0)]).unwrap();

    let mut total = 0;
    while !p.frontier().is_empty() {
        p.propagate().unwrap();
        let reached = p.frontier().to_vec();
        p.add_node_state(SEEN, &reached).unwrap();
        total += 1;
        assert!(total < 10);
    }
    // 0 -> 1 -> 2, then the edge back to 0 is refused.
    assert_eq!(total, 3);
    assert!(p.is_node_in_state(NodeId(2), SEEN));
    assert!(!p.is_node_in_state(NodeId(3), SEEN));
    assert_eq!(p.visitor().seen_in_end.load(Ordering::Relaxed), 3);
    p.remove_node_state(SEEN, &[NodeId(0)]).unwrap();
    p.set_node_state(0, &[NodeId(1)]).unwrap();
    assert_eq!(p.state().nodes_in_state(SEEN).collect::<Vec<_>>(), vec![NodeId(2)]);
}
