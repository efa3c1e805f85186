//! Graph stores for Ripple.
//!
//! This crate provides [`AdjacencyStore`], the in-memory implementation of
//! the [`NodeStore`](ripple_core::NodeStore) /
//! [`EdgeStore`](ripple_core::EdgeStore) contract that the propagation
//! engines read from.
//!
//! # Directedness
//!
//! - [`Directedness::Directed`]: `out_edges` lists edges leaving a node.
//! - [`Directedness::Undirected`]: every edge is listed from both ends, so
//!   a traversal that only follows `out_edges` sees the graph as
//!   undirected.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod adjacency;
pub mod directedness;

#[cfg(test)]
pub(crate) mod compliance;

pub use adjacency::AdjacencyStore;
pub use directedness::Directedness;
