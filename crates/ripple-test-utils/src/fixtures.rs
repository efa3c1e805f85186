//! Reusable graph fixtures.
//!
//! Small hand-built shapes with known traversal behaviour, plus seeded
//! random graphs for equivalence and property tests:
//!
//! - [`chain`]: `0 -> 1 -> ... -> n-1`.
//! - [`diamond`]: `0 -> {1, 2} -> 3`.
//! - [`two_triangles`]: two disjoint directed 3-cycles.
//! - [`random_graph`], [`random_dag`]: reproducible from a `u64` seed.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use ripple_core::EdgeData;
use ripple_store::{AdjacencyStore, Directedness};

/// Directed path over `n` nodes.
pub fn chain(n: u32) -> AdjacencyStore {
    let edges: Vec<_> = (1..n).map(|i| (i - 1, i)).collect();
    build(Directedness::Directed, n as usize, &edges)
}

/// `0 -> 1`, `0 -> 2`, `1 -> 3`, `2 -> 3`.
pub fn diamond() -> AdjacencyStore {
    build(Directedness::Directed, 4, &[(0, 1), (0, 2), (1, 3), (2, 3)])
}

/// `0 -> 1 -> 2 -> 0` and `3 -> 4 -> 5 -> 3`.
pub fn two_triangles() -> AdjacencyStore {
    build(
        Directedness::Directed,
        6,
        &[(0, 1), (1, 2), (2, 0), (3, 4), (4, 5), (5, 3)],
    )
}

/// Undirected graph over `nodes` nodes where each unordered pair is
/// connected with probability `density`.
pub fn random_undirected(seed: u64, nodes: u32, density: f64) -> AdjacencyStore {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut edges = Vec::new();
    for a in 0..nodes {
        for b in a + 1..nodes {
            if rng.random_bool(density) {
                edges.push((a, b));
            }
        }
    }
    build(Directedness::Undirected, nodes as usize, &edges)
}

/// Directed graph with `edges` random edges (self-loops and duplicates
/// skipped) and weights uniform in `[0, max_weight)`.
pub fn random_graph(seed: u64, nodes: u32, edges: usize, max_weight: f64) -> AdjacencyStore {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut g = AdjacencyStore::new(Directedness::Directed);
    g.add_nodes(nodes as usize);
    if nodes < 2 {
        return g;
    }
    for _ in 0..edges {
        let s = rng.random_range(0..nodes);
        let t = rng.random_range(0..nodes);
        if s == t {
            continue;
        }
        let w = rng.random::<f64>() * max_weight;
        let _ = g.add_edge(s.into(), t.into(), EdgeData::weighted(w));
    }
    g
}

/// Directed acyclic graph: edges only run from lower to higher ids.
pub fn random_dag(seed: u64, nodes: u32, edges: usize) -> AdjacencyStore {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut g = AdjacencyStore::new(Directedness::Directed);
    g.add_nodes(nodes as usize);
    if nodes < 2 {
        return g;
    }
    for _ in 0..edges {
        let a = rng.random_range(0..nodes);
        let b = rng.random_range(0..nodes);
        if a == b {
            continue;
        }
        let (s, t) = (a.min(b), a.max(b));
        let _ = g.add_edge(s.into(), t.into(), EdgeData::default());
    }
    g
}

fn build(directedness: Directedness, n: usize, edges: &[(u32, u32)]) -> AdjacencyStore {
    match AdjacencyStore::from_edges(directedness, n, edges) {
        Ok(g) => g,
        Err(e) => panic!("fixture edges are valid: {e}"),
    }
}
