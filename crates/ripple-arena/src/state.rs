//! Persistent per-node flag bytes.
//!
//! [`StateTracker`] keeps one byte of flags per node id for the lifetime
//! of the algorithm that owns it. Unlike the engines' per-wave visited
//! marks, nothing here is cleared between waves: a flag stays set until
//! someone removes it.

use std::sync::atomic::{AtomicU8, Ordering};

use ripple_core::NodeId;

use crate::buffer::ScratchBuffer;
use crate::error::ArenaError;
use crate::pool::ScratchPool;

/// Arena-backed byte-per-node flag store.
///
/// Each byte is an `AtomicU8`, so every single update is indivisible and
/// the tracker can be shared with parallel visitor callbacks. Nothing
/// stronger is promised: there is no ordering between updates to
/// different nodes, and a read followed by a write is two operations.
/// Visitors that make decisions on a read-then-write sequence under the
/// parallel engine must serialize that sequence per node themselves.
///
/// Flags are bit masks chosen by the algorithm. Out-of-range ids panic.
///
/// ```
/// use ripple_arena::{ScratchPool, StateTracker};
/// use ripple_core::NodeId;
///
/// const QUEUED: u8 = 0b01;
/// const DONE: u8 = 0b10;
///
/// let states = StateTracker::new(ScratchPool::global(), 4).unwrap();
/// states.add_state(QUEUED | DONE, &[NodeId(1)]);
/// states.remove_state(DONE, &[NodeId(1)]);
/// assert!(states.is_in_state(QUEUED, NodeId(1)));
/// assert!(!states.is_in_state(QUEUED | DONE, NodeId(1)));
/// ```
pub struct StateTracker {
    states: ScratchBuffer<AtomicU8>,
}

impl StateTracker {
    /// Rent a tracker covering ids `0..len`, all flags clear.
    pub fn new(pool: &ScratchPool, len: usize) -> Result<Self, ArenaError> {
        Ok(Self {
            states: pool.rent(len)?,
        })
    }

    /// Number of node ids covered.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Whether the tracker covers no ids.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Raw flag byte of a node.
    #[inline]
    pub fn state(&self, id: NodeId) -> u8 {
        self.states[id.index()].load(Ordering::Relaxed)
    }

    /// `true` if every bit of `flag` is set on `id`.
    ///
    /// This is masked equality, `(state & flag) == flag`, not a nonzero
    /// test; a zero `flag` is therefore satisfied by every node.
    #[inline]
    pub fn is_in_state(&self, flag: u8, id: NodeId) -> bool {
        self.state(id) & flag == flag
    }

    /// OR `flag` into each listed node.
    pub fn add_state(&self, flag: u8, ids: &[NodeId]) {
        for &id in ids {
            self.states[id.index()].fetch_or(flag, Ordering::Relaxed);
        }
    }

    /// Overwrite each listed node's byte with `flag`.
    pub fn set_state(&self, flag: u8, ids: &[NodeId]) {
        for &id in ids {
            self.states[id.index()].store(flag, Ordering::Relaxed);
        }
    }

    /// Clear the bits of `flag` on each listed node.
    pub fn remove_state(&self, flag: u8, ids: &[NodeId]) {
        for &id in ids {
            self.states[id.index()].fetch_and(!flag, Ordering::Relaxed);
        }
    }

    /// OR `flag` into every node.
    pub fn add_state_to_all(&self, flag: u8) {
        for s in self.states.iter() {
            s.fetch_or(flag, Ordering::Relaxed);
        }
    }

    /// Overwrite every node's byte with `flag`.
    pub fn set_state_to_all(&self, flag: u8) {
        for s in self.states.iter() {
            s.store(flag, Ordering::Relaxed);
        }
    }

    /// Clear the bits of `flag` on every node.
    pub fn remove_state_to_all(&self, flag: u8) {
        for s in self.states.iter() {
            s.fetch_and(!flag, Ordering::Relaxed);
        }
    }

    /// Ids whose byte contains every bit of `flag`, ascending.
    pub fn nodes_in_state(&self, flag: u8) -> impl Iterator<Item = NodeId> + '_ {
        self.states
            .iter()
            .enumerate()
            .filter(move |(_, s)| s.load(Ordering::Relaxed) & flag == flag)
            .map(|(i, _)| NodeId::from_index(i))
    }

    /// Clear every flag on every node.
    pub fn clear(&self) {
        self.set_state_to_all(0);
    }

    /// Discard all flags and make room for ids `0..len`.
    ///
    /// Storage is only re-rented when `len` exceeds the current length;
    /// otherwise the existing slots are cleared and kept. On error the
    /// tracker is unchanged.
    pub fn reset(&mut self, pool: &ScratchPool, len: usize) -> Result<(), ArenaError> {
        if len <= self.states.len() {
            self.clear();
            return Ok(());
        }
        self.states = pool.rent(len)?;
        Ok(())
    }
}

impl std::fmt::Debug for StateTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let flagged = self
            .states
            .iter()
            .filter(|s| s.load(Ordering::Relaxed) != 0)
            .count();
        f.debug_struct("StateTracker")
            .field("len", &self.len())
            .field("flagged", &flagged)
            .finish()
    }
}
