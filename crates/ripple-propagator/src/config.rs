//! Engine configuration, validation, and error types.

use std::error::Error;
use std::fmt;

use ripple_arena::{ArenaError, ScratchPool};

// ── PropagatorConfig ───────────────────────────────────────────────

/// Configuration shared by [`Propagator`](crate::Propagator) and
/// [`ParallelPropagator`](crate::ParallelPropagator).
///
/// The sequential engine only reads [`pool`](Self::pool).
#[derive(Clone, Debug)]
pub struct PropagatorConfig {
    /// Number of worker threads for the parallel engine. `None` = run on
    /// the global rayon pool. `Some(n)` builds a dedicated pool of `n`
    /// threads.
    pub workers: Option<usize>,
    /// Frontiers with fewer nodes than this are expanded inline on the
    /// calling thread. Default: [`DEFAULT_PARALLEL_THRESHOLD`](Self::DEFAULT_PARALLEL_THRESHOLD).
    pub parallel_threshold: usize,
    /// Pool the engine rents its per-node buffers from. Default: the
    /// process-wide [`ScratchPool::global`].
    pub pool: ScratchPool,
}

impl PropagatorConfig {
    /// Default inline-expansion cutoff.
    pub const DEFAULT_PARALLEL_THRESHOLD: usize = 64;

    /// Default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a dedicated pool of `workers` threads.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    /// Set the inline-expansion cutoff. `0` always fans out.
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Rent scratch buffers from `pool` instead of the global one.
    pub fn with_pool(mut self, pool: ScratchPool) -> Self {
        self.pool = pool;
        self
    }

    /// Resolve the actual worker count, applying auto-detection if `None`.
    ///
    /// Auto-detection reports the size of the global rayon pool, which
    /// follows `RAYON_NUM_THREADS` or `available_parallelism`.
    pub fn resolved_workers(&self) -> usize {
        match self.workers {
            Some(n) => n,
            None => rayon::current_num_threads(),
        }
    }

    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workers == Some(0) {
            return Err(ConfigError::ZeroWorkers);
        }
        Ok(())
    }
}

impl Default for PropagatorConfig {
    fn default() -> Self {
        Self {
            workers: None,
            parallel_threshold: Self::DEFAULT_PARALLEL_THRESHOLD,
            pool: ScratchPool::global().clone(),
        }
    }
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected while building an engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// `workers` was `Some(0)`.
    ZeroWorkers,
    /// The dedicated rayon pool could not be built.
    ThreadPool(String),
    /// Initial scratch buffers could not be rented.
    Arena(ArenaError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroWorkers => write!(f, "workers must be at least 1"),
            Self::ThreadPool(reason) => write!(f, "thread pool build failed: {reason}"),
            Self::Arena(e) => write!(f, "arena: {e}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Arena(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ArenaError> for ConfigError {
    fn from(e: ArenaError) -> Self {
        Self::Arena(e)
    }
}
