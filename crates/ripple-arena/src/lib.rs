//! Pooled scratch memory for Ripple graph algorithms.
//!
//! Every per-run array an algorithm needs (visited marks, frontier
//! storage, distance labels, per-node flags) is rented from a
//! [`ScratchPool`] as a fixed-length, zero-initialised [`ScratchBuffer`]
//! and handed back when the buffer is dropped. Backing allocations are
//! recycled across runs, so repeated propagations over the same graph
//! stop allocating after the first run.
//!
//! # Architecture
//!
//! ```text
//! ScratchPool (cheap Clone, Arc-shared)
//! ├── ArenaConfig (length cap, retention cap)
//! ├── retained: TypeId → [Vec<T>] (recycled allocations)
//! └── PoolStats counters
//!
//! ScratchBuffer<T> ── derefs to [T], returns its Vec on Drop
//! StateTracker      ── ScratchBuffer<AtomicU8>, one flag byte per node
//! ```
//!
//! # Ownership
//!
//! A buffer is exclusively owned by its renter. Returning storage happens
//! in `Drop`, so it runs on every exit path including unwinding, and
//! [`ScratchBuffer::release`] takes `self` by value: releasing twice is a
//! compile error rather than a runtime condition.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod buffer;
pub mod config;
pub mod error;
pub mod pool;
pub mod state;
pub mod zeroed;

pub use buffer::ScratchBuffer;
pub use config::ArenaConfig;
pub use error::ArenaError;
pub use pool::{PoolStats, ScratchPool};
pub use state::StateTracker;
pub use zeroed::Zeroed;
