//! Benchmark graph profiles for the Ripple propagation engine.
//!
//! - [`grid_profile`]: `width x height` 4-neighbour grid, both directions
//! - [`reference_profile`]: 10K nodes, ~50K random weighted edges
//! - [`stress_profile`]: 100K nodes, ~500K random weighted edges

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use ripple_core::{EdgeData, NodeId};
use ripple_store::{AdjacencyStore, Directedness};

/// Directed grid where every cell links to its orthogonal neighbours.
///
/// Node `r * width + c` is the cell at row `r`, column `c`. Edge weights
/// are 1.
pub fn grid_profile(width: u32, height: u32) -> AdjacencyStore {
    let nodes = (width * height) as usize;
    let mut g = AdjacencyStore::with_capacity(Directedness::Directed, nodes, nodes * 4);
    g.add_nodes(nodes);
    let id = |r: u32, c: u32| NodeId(r * width + c);
    for r in 0..height {
        for c in 0..width {
            let here = id(r, c);
            let mut link = |there: NodeId| {
                // Ids are in range and pairs distinct, so this cannot fail.
                let _ = g.add_edge(here, there, EdgeData::default());
            };
            if c + 1 < width {
                link(id(r, c + 1));
            }
            if c > 0 {
                link(id(r, c - 1));
            }
            if r + 1 < height {
                link(id(r + 1, c));
            }
            if r > 0 {
                link(id(r - 1, c));
            }
        }
    }
    g
}

/// 10K-node random weighted graph, average out-degree about 5.
pub fn reference_profile(seed: u64) -> AdjacencyStore {
    random_profile(seed, 10_000, 50_000)
}

/// 100K-node random weighted graph, average out-degree about 5.
pub fn stress_profile(seed: u64) -> AdjacencyStore {
    random_profile(seed, 100_000, 500_000)
}

/// `nodes` nodes and up to `edges` directed edges with weights in
/// `[1, 10)`. Self-loops and duplicate pairs are skipped.
pub fn random_profile(seed: u64, nodes: u32, edges: usize) -> AdjacencyStore {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut g = AdjacencyStore::with_capacity(Directedness::Directed, nodes as usize, edges);
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
        let w = rng.random_range(1.0..10.0);
        let _ = g.add_edge(NodeId(s), NodeId(t), EdgeData::weighted(w));
    }
    g
}

#[cfg(test)]
mod tests {
    use super::*;
    use ripple_core::{EdgeStore, NodeStore};

    #[test]
    fn grid_degrees() {
        let g = grid_profile(4, 3);
        assert_eq!(g.node_count(), 12);
        // Corners have two neighbours, interior cells four.
        assert_eq!(g.out_degree(NodeId(0)), 2);
        assert_eq!(g.out_degree(NodeId(5)), 4);
        assert_eq!(g.edge_count(), 2 * (3 * 3 + 4 * 2));
    }

    #[test]
    fn reference_profile_is_deterministic() {
        let a = random_profile(42, 500, 2_000);
        let b = random_profile(42, 500, 2_000);
        assert_eq!(a.edge_count(), b.edge_count());
        let ea: Vec<_> = a.edges().map(|(e, d)| (e, d.weight)).collect();
        let eb: Vec<_> = b.edges().map(|(e, d)| (e, d.weight)).collect();
        assert_eq!(ea, eb);
    }

    #[test]
    fn reference_profile_size() {
        let g = reference_profile(7);
        assert_eq!(g.node_count(), 10_000);
        assert!(g.edge_count() > 49_000);
    }
}
