//! Core types and traits for the Ripple graph engine.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the fundamental abstractions used throughout the Ripple workspace:
//! node and edge identifiers, payload types, the read-side store
//! contract, and error types.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod edge;
pub mod error;
pub mod id;
pub mod store;

pub use edge::{Edge, EdgeData, NodeData};
pub use error::StoreError;
pub use id::{EdgeId, NodeId};
pub use store::{check_node, EdgeStore, NodeStore};
