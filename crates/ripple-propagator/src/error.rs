//! Propagation error types.

use std::error::Error;
use std::fmt;

use ripple_arena::ArenaError;
use ripple_core::NodeId;

/// Errors returned by [`WaveEngine`](crate::WaveEngine) operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PropagationError {
    /// A caller-supplied id does not name a stored node.
    InvalidNode {
        /// The rejected id.
        node: NodeId,
        /// The store's node bound at the time of the call.
        bound: usize,
    },
    /// A previous wave unwound out of `propagate()`.
    ///
    /// The engine refuses further work until
    /// [`reset`](crate::WaveEngine::reset) is called.
    Poisoned,
    /// [`run_until`](crate::WaveEngine::run_until) hit its wave cap with
    /// work still pending.
    WaveLimitExceeded {
        /// The cap that was reached.
        limit: usize,
    },
    /// Scratch storage could not be rented.
    Arena(ArenaError),
}

impl fmt::Display for PropagationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidNode { node, bound } => {
                write!(f, "node {node} is not in the store (bound {bound})")
            }
            Self::Poisoned => write!(f, "propagator poisoned by a panicking wave; call reset"),
            Self::WaveLimitExceeded { limit } => {
                write!(f, "frontier still non-empty after {limit} waves")
            }
            Self::Arena(e) => write!(f, "arena: {e}"),
        }
    }
}

impl Error for PropagationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Arena(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ArenaError> for PropagationError {
    fn from(e: ArenaError) -> Self {
        Self::Arena(e)
    }
}
