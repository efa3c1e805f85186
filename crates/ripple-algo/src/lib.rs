//! Reference graph algorithms for Ripple.
//!
//! Every algorithm here is a [`Visitor`](ripple_propagator::Visitor)
//! driven by a wave engine and runs unchanged on either engine; pick one
//! with [`RunOptions`]. Results are identical for both.
//!
//! | Algorithm | Entry point | Waves |
//! |-----------|-------------|-------|
//! | Shortest paths | [`shortest_paths`] | until no distance improves |
//! | Topological layering | [`topological_layers`] | one per layer |
//! | Reachability / pruning | [`reachable_from`], [`prune_unreachable`] | one per BFS level |
//! | Weak components | [`weak_components`] | one |
//!
//! [`UnionFind`] is exported on its own as well; it is safe to share
//! between threads.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod components;
pub mod reachability;
pub mod run;
pub mod shortest_path;
pub mod topological;
pub mod union_find;

pub use components::{weak_components, Components};
pub use reachability::{prune_unreachable, reachable_from, Reachability, REACHED, TO_REMOVE};
pub use run::{AlgoError, ExecutionMode, RunOptions};
pub use shortest_path::{shortest_paths, ShortestPaths};
pub use topological::{is_acyclic, topological_layers, Layers, QUEUED};
pub use union_find::UnionFind;
