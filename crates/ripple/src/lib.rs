//! Ripple: generation-based graph propagation.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all Ripple sub-crates. For most users, adding `ripple` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use ripple::prelude::*;
//!
//! const SEEN: u8 = 0b01;
//!
//! // Breadth-first flood: follow edges into nodes not seen before.
//! struct Flood;
//! impl Visitor for Flood {
//!     fn select(&self, edge: &Edge, ctx: &WaveContext<'_>) -> bool {
//!         !ctx.state().is_in_state(SEEN, edge.target)
//!     }
//!     fn visit(&self, node: NodeId, ctx: &WaveContext<'_>) {
//!         ctx.state().add_state(SEEN, &[node]);
//!     }
//! }
//!
//! let graph = AdjacencyStore::from_edges(
//!     Directedness::Directed,
//!     4,
//!     &[(0, 1), (0, 2), (1, 3), (2, 3)],
//! )
//! .unwrap();
//!
//! let mut engine = Propagator::new(&graph, Flood).unwrap();
//! engine.set_position(&[NodeId(0)]).unwrap();
//! engine.add_node_state(SEEN, &[NodeId(0)]).unwrap();
//!
//! engine.propagate().unwrap();
//! assert_eq!(engine.frontier(), &[NodeId(1), NodeId(2)]);
//! engine.propagate().unwrap();
//! assert_eq!(engine.frontier(), &[NodeId(3)]);
//! assert_eq!(engine.generation(), 2);
//!
//! let sp = shortest_paths(&graph, &[NodeId(0)], &RunOptions::parallel()).unwrap();
//! assert_eq!(sp.distance(NodeId(3)), Some(2.0));
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `ripple-core` | Ids, edge records, the store traits |
//! | [`arena`] | `ripple-arena` | Scratch pool, buffers, per-node state flags |
//! | [`store`] | `ripple-store` | The adjacency-list graph store |
//! | [`propagator`] | `ripple-propagator` | Visitor contract, sequential and parallel engines |
//! | [`algo`] | `ripple-algo` | Shortest paths, layering, reachability, components |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Ids, edge records and the store traits (`ripple-core`).
///
/// [`types::NodeStore`] and [`types::EdgeStore`] are the contract every
/// engine reads the graph through.
pub use ripple_core as types;

/// Pooled scratch memory (`ripple-arena`).
///
/// [`arena::ScratchPool`] hands out zeroed [`arena::ScratchBuffer`]s and
/// recycles them on drop; [`arena::StateTracker`] holds one flag byte per
/// node.
pub use ripple_arena as arena;

/// The adjacency-list graph store (`ripple-store`).
pub use ripple_store as store;

/// Visitor contract and wave engines (`ripple-propagator`).
///
/// [`propagator::Propagator`] runs waves on the calling thread,
/// [`propagator::ParallelPropagator`] on rayon. Both implement
/// [`propagator::WaveEngine`].
pub use ripple_propagator as propagator;

/// Reference algorithms built on the engines (`ripple-algo`).
pub use ripple_algo as algo;

/// Common imports for typical Ripple usage.
///
/// ```rust
/// use ripple::prelude::*;
/// ```
pub mod prelude {
    // Core types and traits
    pub use ripple_core::{Edge, EdgeData, EdgeId, EdgeStore, NodeData, NodeId, NodeStore};

    // Errors
    pub use ripple_algo::AlgoError;
    pub use ripple_arena::ArenaError;
    pub use ripple_core::StoreError;
    pub use ripple_propagator::{ConfigError, PropagationError};

    // Arena
    pub use ripple_arena::{ArenaConfig, ScratchBuffer, ScratchPool, StateTracker};

    // Store
    pub use ripple_store::{AdjacencyStore, Directedness};

    // Engines
    pub use ripple_propagator::{
        FnVisitor, ParallelPropagator, Propagator, PropagatorConfig, Visitor, WaveContext,
        WaveEngine, WaveReport,
    };

    // Algorithms
    pub use ripple_algo::{
        is_acyclic, prune_unreachable, reachable_from, shortest_paths, topological_layers,
        weak_components, ExecutionMode, RunOptions, UnionFind,
    };
}
