//! Execution options and the engine driver shared by every algorithm.

use std::error::Error;
use std::fmt;

use ripple_arena::ArenaError;
use ripple_core::{EdgeStore, NodeId, StoreError};
use ripple_propagator::{
    ConfigError, ParallelPropagator, PropagationError, Propagator, PropagatorConfig, Visitor,
    WaveEngine,
};

/// Which engine an algorithm runs on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExecutionMode {
    /// [`Propagator`] on the calling thread.
    #[default]
    Sequential,
    /// [`ParallelPropagator`] on rayon.
    Parallel,
}

/// Options accepted by every algorithm entry point.
#[derive(Clone, Debug, Default)]
pub struct RunOptions {
    /// Engine selection. Default: sequential.
    pub mode: ExecutionMode,
    /// Wave cap. `None` = the graph's node bound plus one, which is enough
    /// for every algorithm here on inputs without negative cycles.
    pub max_waves: Option<usize>,
    /// Engine configuration (worker count, inline threshold, pool).
    pub engine: PropagatorConfig,
}

impl RunOptions {
    /// Sequential execution with defaults.
    pub fn sequential() -> Self {
        Self::default()
    }

    /// Parallel execution with defaults.
    pub fn parallel() -> Self {
        Self {
            mode: ExecutionMode::Parallel,
            ..Self::default()
        }
    }

    /// Override the wave cap.
    pub fn with_max_waves(mut self, max_waves: usize) -> Self {
        self.max_waves = Some(max_waves);
        self
    }

    /// Override the engine configuration.
    pub fn with_engine(mut self, engine: PropagatorConfig) -> Self {
        self.engine = engine;
        self
    }

    /// Wave cap for a graph with `bound` node slots.
    pub fn resolved_max_waves(&self, bound: usize) -> usize {
        self.max_waves.unwrap_or(bound.saturating_add(1))
    }
}

// ── AlgoError ──────────────────────────────────────────────────────

/// Errors returned by the algorithm entry points.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AlgoError {
    /// The engine could not be built.
    Config(ConfigError),
    /// A wave failed or the wave cap was hit.
    Propagation(PropagationError),
    /// Algorithm scratch storage could not be rented.
    Arena(ArenaError),
    /// A store operation failed.
    Store(StoreError),
    /// The graph has a cycle; these nodes could not be ordered.
    Cycle {
        /// Nodes on or downstream of a cycle, ascending.
        unplaced: Vec<NodeId>,
    },
}

impl fmt::Display for AlgoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "engine config: {e}"),
            Self::Propagation(e) => write!(f, "propagation: {e}"),
            Self::Arena(e) => write!(f, "arena: {e}"),
            Self::Store(e) => write!(f, "store: {e}"),
            Self::Cycle { unplaced } => {
                write!(f, "graph has a cycle: {} nodes unplaced", unplaced.len())
            }
        }
    }
}

impl Error for AlgoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Propagation(e) => Some(e),
            Self::Arena(e) => Some(e),
            Self::Store(e) => Some(e),
            Self::Cycle { .. } => None,
        }
    }
}

impl From<ConfigError> for AlgoError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<PropagationError> for AlgoError {
    fn from(e: PropagationError) -> Self {
        Self::Propagation(e)
    }
}

impl From<ArenaError> for AlgoError {
    fn from(e: ArenaError) -> Self {
        Self::Arena(e)
    }
}

impl From<StoreError> for AlgoError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}

// ── Driver ─────────────────────────────────────────────────────────

/// An engine behind the object-safe part of [`WaveEngine`].
pub(crate) type DynEngine<'e, G, V> = dyn WaveEngine<Graph = G, Visitor = V> + 'e;

/// Build the engine `options` selects and hand it to `body`.
pub(crate) fn with_engine<G, V, R>(
    graph: G,
    visitor: V,
    options: &RunOptions,
    body: impl FnOnce(&mut DynEngine<'_, G, V>) -> Result<R, AlgoError>,
) -> Result<R, AlgoError>
where
    G: EdgeStore + Sync,
    V: Visitor + Sync,
{
    match options.mode {
        ExecutionMode::Sequential => {
            let mut engine = Propagator::with_config(graph, visitor, &options.engine)?;
            body(&mut engine)
        }
        ExecutionMode::Parallel => {
            let mut engine = ParallelPropagator::with_config(graph, visitor, &options.engine)?;
            body(&mut engine)
        }
    }
}

/// Propagate until the frontier empties; returns the waves run.
pub(crate) fn drain<G, V>(
    engine: &mut DynEngine<'_, G, V>,
    max_waves: usize,
) -> Result<usize, PropagationError>
where
    G: EdgeStore,
    V: Visitor,
{
    let mut waves = 0;
    while !engine.frontier().is_empty() {
        if waves == max_waves {
            return Err(PropagationError::WaveLimitExceeded { limit: max_waves });
        }
        engine.propagate()?;
        waves += 1;
    }
    Ok(waves)
}
