//! Visitor contract and wave propagation engines for Ripple.
//!
//! A propagation is a sequence of *waves*. Each wave expands the current
//! frontier along the out-edges a [`Visitor`] approves, visits every newly
//! reached node exactly once, and replaces the frontier with those nodes.
//! [`Propagator`] runs waves on the calling thread; [`ParallelPropagator`]
//! fans them out over rayon and produces the same frontiers.
//!
//! Both engines implement [`WaveEngine`], so algorithms can be written
//! once against the trait and run under either execution strategy.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod engine;
pub mod error;
pub mod parallel;
pub mod sequential;
pub mod visitor;

pub use config::{ConfigError, PropagatorConfig};
pub use engine::{WaveEngine, WaveReport};
pub use error::PropagationError;
pub use parallel::ParallelPropagator;
pub use sequential::Propagator;
pub use visitor::{FnVisitor, Visitor, WaveContext};
