//! Rented, fixed-length scratch buffers.

use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::Weak;

use crate::pool::PoolShared;
use crate::zeroed::Zeroed;

/// A fixed-length, zero-initialised buffer rented from a
/// [`ScratchPool`](crate::ScratchPool).
///
/// Derefs to `[T]`, so indexing is bounds checked and an out-of-range
/// index panics instead of touching neighbouring memory. The length is
/// fixed for the lifetime of the rental.
///
/// Storage goes back to the pool exactly once: when the buffer is
/// dropped, or when [`release`](Self::release) consumes it. Because
/// `release` takes the buffer by value, a second release does not
/// compile:
///
/// ```compile_fail
/// use ripple_arena::ScratchPool;
///
/// let buf = ScratchPool::global().rent::<u8>(8).unwrap();
/// buf.release();
/// buf.release(); // error[E0382]: use of moved value
/// ```
pub struct ScratchBuffer<T: Zeroed> {
    data: Vec<T>,
    pool: Weak<PoolShared>,
}

impl<T: Zeroed> ScratchBuffer<T> {
    pub(crate) fn new(data: Vec<T>, pool: Weak<PoolShared>) -> Self {
        Self { data, pool }
    }

    /// Return the storage to the pool now.
    ///
    /// Equivalent to dropping the buffer; provided so call sites can make
    /// the hand-back explicit.
    pub fn release(self) {
        drop(self);
    }

    /// Reset every slot to `T::zeroed()`.
    pub fn zero(&mut self) {
        for slot in self.data.iter_mut() {
            *slot = T::zeroed();
        }
    }

    /// The buffer contents as a slice.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// The buffer contents as a mutable slice.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }
}

impl<T: Zeroed> Deref for ScratchBuffer<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.data
    }
}

impl<T: Zeroed> DerefMut for ScratchBuffer<T> {
    fn deref_mut(&mut self) -> &mut [T] {
        &mut self.data
    }
}

impl<T: Zeroed> Drop for ScratchBuffer<T> {
    fn drop(&mut self) {
        let data = std::mem::take(&mut self.data);
        if let Some(pool) = self.pool.upgrade() {
            pool.give_back(data);
        }
    }
}

impl<T: Zeroed + fmt::Debug> fmt::Debug for ScratchBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScratchBuffer")
            .field("len", &self.data.len())
            .field("data", &self.data)
            .finish()
    }
}
