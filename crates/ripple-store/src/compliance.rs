//! Store contract compliance test helpers.
//!
//! These functions verify that an `EdgeStore` implementation satisfies the
//! invariants the propagation engines rely on. Generic over the trait so
//! any backend's test module can reuse them.

use indexmap::IndexSet;
use ripple_core::{EdgeStore, NodeId};

use crate::adjacency::AdjacencyStore;

fn ids<S: EdgeStore>(store: &S) -> impl Iterator<Item = NodeId> + '_ {
    (0..store.node_bound()).map(NodeId::from_index)
}

/// Assert that `node_count` agrees with `contains` over the bound, and
/// that gaps have no edges.
pub fn assert_count_matches_membership<S: EdgeStore>(store: &S) {
    let present = ids(store).filter(|&id| store.contains(id)).count();
    assert_eq!(
        store.node_count(),
        present,
        "node_count() = {} but {present} ids are contained",
        store.node_count()
    );
    for id in ids(store).filter(|&id| !store.contains(id)) {
        assert!(
            store.out_edges(id).is_empty() && store.in_edges(id).is_empty(),
            "gap {id} still has edges"
        );
    }
    assert!(!store.contains(NodeId::from_index(store.node_bound())));
}

/// Assert that every listed edge references contained nodes and is
/// oriented from the listing node (out) or towards it (in).
pub fn assert_edges_well_formed<S: EdgeStore>(store: &S) {
    for id in ids(store) {
        for e in store.out_edges(id) {
            assert_eq!(e.source, id, "out_edges({id}) holds {e:?}");
            assert!(store.contains(e.target), "{e:?} targets a missing node");
        }
        for e in store.in_edges(id) {
            assert_eq!(e.target, id, "in_edges({id}) holds {e:?}");
            assert!(store.contains(e.source), "{e:?} leaves a missing node");
        }
    }
}

/// Assert that every out-edge `a -> b` appears in `in_edges(b)`, and the
/// reverse, with matching multiplicity.
pub fn assert_in_out_symmetric<S: EdgeStore>(store: &S) {
    let mut outs = Vec::new();
    let mut ins = Vec::new();
    for id in ids(store) {
        outs.extend(store.out_edges(id).iter().copied());
        ins.extend(store.in_edges(id).iter().copied());
    }
    outs.sort_by_key(|e| (e.id, e.source, e.target));
    ins.sort_by_key(|e| (e.id, e.source, e.target));
    assert_eq!(outs, ins, "out-edge and in-edge listings disagree");
}

/// Assert that every edge of an undirected store is listed from both ends.
pub fn assert_undirected_mirrored<S: EdgeStore>(store: &S) {
    for id in ids(store) {
        for e in store.out_edges(id) {
            let back = store
                .out_edges(e.target)
                .iter()
                .any(|b| b.id == e.id && b.target == id);
            assert!(back, "{e:?} is not mirrored from {}", e.target);
        }
        assert_eq!(
            store.degree(id),
            store.out_edges(id).len(),
            "undirected degree({id}) should count incident ends"
        );
    }
}

/// Run every applicable check against an [`AdjacencyStore`].
pub fn assert_store_consistent(store: &AdjacencyStore) {
    assert_count_matches_membership(store);
    assert_edges_well_formed(store);
    assert_in_out_symmetric(store);
    if store.directedness().is_undirected() {
        assert_undirected_mirrored(store);
    }
    let listed: IndexSet<_> = ids(store)
        .flat_map(|id| store.out_edges(id).iter().map(|e| e.id))
        .collect();
    assert_eq!(
        listed.len(),
        store.edge_count(),
        "edge_count() disagrees with the distinct edges listed"
    );
}
