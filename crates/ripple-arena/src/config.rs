//! Arena configuration parameters.

use crate::error::ArenaError;

/// Configuration for a [`ScratchPool`](crate::ScratchPool).
///
/// Validated at pool construction; immutable afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArenaConfig {
    /// Largest number of slots a single rental may request.
    ///
    /// Default: 268_435_456 (2^28). Must be at least 1. Larger requests
    /// fail with [`ArenaError::CapacityExceeded`].
    pub max_buffer_len: usize,

    /// How many returned allocations the pool keeps per element type.
    ///
    /// Default: 32. Allocations returned beyond this are freed. Zero
    /// disables recycling entirely.
    pub max_retained_per_type: usize,
}

impl ArenaConfig {
    /// Default rental length cap.
    pub const DEFAULT_MAX_BUFFER_LEN: usize = 1 << 28;

    /// Default retention cap per element type.
    pub const DEFAULT_MAX_RETAINED_PER_TYPE: usize = 32;

    /// Create a config with the given rental cap and default retention.
    pub fn new(max_buffer_len: usize) -> Self {
        Self {
            max_buffer_len,
            max_retained_per_type: Self::DEFAULT_MAX_RETAINED_PER_TYPE,
        }
    }

    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), ArenaError> {
        if self.max_buffer_len == 0 {
            return Err(ArenaError::InvalidConfig {
                reason: "max_buffer_len must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_BUFFER_LEN)
    }
}
