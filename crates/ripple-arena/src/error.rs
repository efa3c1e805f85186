//! Arena-specific error types.

use std::error::Error;
use std::fmt;

/// Errors that can occur during arena operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArenaError {
    /// A rental asked for more slots than the pool's configured maximum.
    ///
    /// The pool never truncates a request; the rental fails instead.
    CapacityExceeded {
        /// Number of slots requested.
        requested: usize,
        /// Largest rental the pool accepts.
        max: usize,
    },
    /// The arena configuration failed validation.
    InvalidConfig {
        /// Description of the invalid setting.
        reason: String,
    },
}

impl fmt::Display for ArenaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CapacityExceeded { requested, max } => {
                write!(
                    f,
                    "arena capacity exceeded: requested {requested} slots, max {max} slots"
                )
            }
            Self::InvalidConfig { reason } => write!(f, "invalid arena config: {reason}"),
        }
    }
}

impl Error for ArenaError {}
