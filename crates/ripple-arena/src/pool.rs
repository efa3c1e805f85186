//! The shared scratch pool.
//!
//! [`ScratchPool`] hands out [`ScratchBuffer`]s and recycles their backing
//! `Vec`s once they are dropped. Recycled allocations are grouped by
//! element type; a rental of `T` only ever reuses a `Vec<T>`.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use crate::buffer::ScratchBuffer;
use crate::config::ArenaConfig;
use crate::error::ArenaError;
use crate::zeroed::Zeroed;

type Retained = HashMap<TypeId, Vec<Box<dyn Any + Send>>>;

/// Counters describing pool activity since construction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Successful rentals.
    pub rented: u64,
    /// Buffers whose storage came back to the pool (retained or freed).
    pub returned: u64,
    /// Rentals served from a recycled allocation.
    pub reused: u64,
    /// Allocations currently held for reuse, across all element types.
    pub retained: usize,
}

pub(crate) struct PoolShared {
    config: ArenaConfig,
    retained: Mutex<Retained>,
    rented: AtomicU64,
    returned: AtomicU64,
    reused: AtomicU64,
}

impl PoolShared {
    fn retained(&self) -> MutexGuard<'_, Retained> {
        // The map is never left half-updated, so a poisoned lock is still usable.
        self.retained.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Pull a recycled `Vec<T>`, preferring one that already fits `len`.
    fn take<T: Zeroed>(&self, len: usize) -> Option<Vec<T>> {
        let mut retained = self.retained();
        let list = retained.get_mut(&TypeId::of::<T>())?;
        let fit = list
            .iter()
            .position(|b| b.downcast_ref::<Vec<T>>().is_some_and(|v| v.capacity() >= len));
        let idx = fit.unwrap_or(list.len().checked_sub(1)?);
        let boxed = list.swap_remove(idx);
        boxed.downcast::<Vec<T>>().ok().map(|b| *b)
    }

    /// Return storage from a dropped buffer.
    pub(crate) fn give_back<T: Zeroed>(&self, mut data: Vec<T>) {
        self.returned.fetch_add(1, Ordering::Relaxed);
        if data.capacity() == 0 {
            return;
        }
        data.clear();
        let cap = self.config.max_retained_per_type;
        let mut retained = self.retained();
        let list = retained.entry(TypeId::of::<T>()).or_default();
        if list.len() >= cap {
            tracing::trace!(
                element = std::any::type_name::<T>(),
                capacity = data.capacity(),
                "retention cap reached, freeing scratch storage"
            );
            return;
        }
        list.push(Box::new(data));
    }
}

/// A shared pool of recyclable scratch buffers.
///
/// Cloning a pool is cheap and yields a handle to the same storage.
/// Buffers keep only a weak reference back to their pool: a buffer that
/// outlives every pool handle simply frees its storage on drop.
///
/// # Example
///
/// ```
/// use ripple_arena::{ArenaConfig, ScratchPool};
///
/// let pool = ScratchPool::new(ArenaConfig::default()).unwrap();
/// let mut marks = pool.rent::<u8>(4).unwrap();
/// marks[2] = 1;
/// assert_eq!(&marks[..], &[0, 0, 1, 0]);
/// drop(marks);
///
/// // The next rental reuses the allocation but is zeroed again.
/// let marks = pool.rent::<u8>(4).unwrap();
/// assert!(marks.iter().all(|&m| m == 0));
/// assert_eq!(pool.stats().reused, 1);
/// ```
#[derive(Clone)]
pub struct ScratchPool {
    shared: Arc<PoolShared>,
}

impl ScratchPool {
    /// Create a pool with the given configuration.
    pub fn new(config: ArenaConfig) -> Result<Self, ArenaError> {
        config.validate()?;
        Ok(Self::from_config(config))
    }

    /// The process-wide pool, created on first use with the default config.
    pub fn global() -> &'static ScratchPool {
        static GLOBAL: OnceLock<ScratchPool> = OnceLock::new();
        GLOBAL.get_or_init(|| Self::from_config(ArenaConfig::default()))
    }

    fn from_config(config: ArenaConfig) -> Self {
        Self {
            shared: Arc::new(PoolShared {
                config,
                retained: Mutex::new(HashMap::new()),
                rented: AtomicU64::new(0),
                returned: AtomicU64::new(0),
                reused: AtomicU64::new(0),
            }),
        }
    }

    /// Rent a buffer of exactly `len` slots, all equal to `T::zeroed()`.
    ///
    /// Fails with [`ArenaError::CapacityExceeded`] if `len` is above the
    /// configured maximum.
    pub fn rent<T: Zeroed>(&self, len: usize) -> Result<ScratchBuffer<T>, ArenaError> {
        let max = self.shared.config.max_buffer_len;
        if len > max {
            return Err(ArenaError::CapacityExceeded {
                requested: len,
                max,
            });
        }

        let mut data = match self.shared.take::<T>(len) {
            Some(v) => {
                self.shared.reused.fetch_add(1, Ordering::Relaxed);
                v
            }
            None => Vec::with_capacity(len),
        };
        data.clear();
        data.resize_with(len, T::zeroed);
        self.shared.rented.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(element = std::any::type_name::<T>(), len, "rented scratch buffer");

        Ok(ScratchBuffer::new(data, Arc::downgrade(&self.shared)))
    }

    /// The configuration this pool was built with.
    pub fn config(&self) -> &ArenaConfig {
        &self.shared.config
    }

    /// Snapshot of the pool counters.
    pub fn stats(&self) -> PoolStats {
        let retained = self.shared.retained().values().map(Vec::len).sum();
        PoolStats {
            rented: self.shared.rented.load(Ordering::Relaxed),
            returned: self.shared.returned.load(Ordering::Relaxed),
            reused: self.shared.reused.load(Ordering::Relaxed),
            retained,
        }
    }

    /// Free every retained allocation.
    pub fn trim(&self) {
        self.shared.retained().clear();
    }

    /// Whether two handles refer to the same pool.
    pub fn same_pool(&self, other: &ScratchPool) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }
}

impl std::fmt::Debug for ScratchPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScratchPool")
            .field("config", &self.shared.config)
            .field("stats", &self.stats())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool() -> ScratchPool {
        ScratchPool::new(ArenaConfig::new(1024)).unwrap()
    }

    #[test]
    fn rent_returns_exact_zeroed_length() {
        let p = pool();
        let b = p.rent::<u32>(10).unwrap();
        assert_eq!(b.len(), 10);
        assert!(b.iter().all(|&v| v == 0));
    }

    #[test]
    fn oversized_rental_fails_without_truncating() {
        let p = pool();
        let err = p.rent::<u8>(1025).unwrap_err();
        assert_eq!(
            err,
            ArenaError::CapacityExceeded {
                requested: 1025,
                max: 1024
            }
        );
        assert_eq!(p.stats().rented, 0);
        assert!(p.rent::<u8>(1024).is_ok());
    }

    #[test]
    fn dirty_storage_is_zeroed_on_reuse() {
        let p = pool();
        let mut b = p.rent::<f64>(8).unwrap();
        b.fill(3.5);
        drop(b);

        let b = p.rent::<f64>(8).unwrap();
        assert!(b.iter().all(|&v| v == 0.0));
        assert_eq!(p.stats().reused, 1);
    }

    #[test]
    fn reuse_is_per_element_type() {
        let p = pool();
        drop(p.rent::<u8>(16).unwrap());
        let _b = p.rent::<u32>(16).unwrap();
        assert_eq!(p.stats().reused, 0);
        assert_eq!(p.stats().retained, 1);
    }

    #[test]
    fn smaller_recycled_storage_grows() {
        let p = pool();
        drop(p.rent::<u16>(4).unwrap());
        let b = p.rent::<u16>(64).unwrap();
        assert_eq!(b.len(), 64);
        assert_eq!(p.stats().reused, 1);
    }

    #[test]
    fn retention_cap_frees_extra_storage() {
        let p = ScratchPool::new(ArenaConfig {
            max_buffer_len: 64,
            max_retained_per_type: 1,
        })
        .unwrap();
        let a = p.rent::<u8>(4).unwrap();
        let b = p.rent::<u8>(4).unwrap();
        drop(a);
        drop(b);
        let stats = p.stats();
        assert_eq!(stats.returned, 2);
        assert_eq!(stats.retained, 1);
    }

    #[test]
    fn trim_drops_retained() {
        let p = pool();
        drop(p.rent::<u8>(4).unwrap());
        assert_eq!(p.stats().retained, 1);
        p.trim();
        assert_eq!(p.stats().retained, 0);
    }

    #[test]
    fn clones_share_storage() {
        let p = pool();
        let q = p.clone();
        assert!(p.same_pool(&q));
        drop(q.rent::<u8>(4).unwrap());
        assert_eq!(p.stats().retained, 1);
    }

    #[test]
    fn buffer_outliving_pool_is_freed() {
        let p = pool();
        let b = p.rent::<u8>(4).unwrap();
        drop(p);
        drop(b);
    }

    #[test]
    fn global_pool_is_a_singleton() {
        assert!(ScratchPool::global().same_pool(ScratchPool::global()));
        let b = ScratchPool::global().rent::<u8>(3).unwrap();
        assert_eq!(b.len(), 3);
    }

    #[test]
    fn global_and_new_pools_share_construction() {
        let fresh = ScratchPool::new(ArenaConfig::default()).unwrap();
        assert_eq!(ScratchPool::global().config(), fresh.config());
        assert_eq!(fresh.stats(), PoolStats::default());
        assert!(!fresh.same_pool(ScratchPool::global()));
    }

    #[test]
    fn invalid_config_rejected() {
        assert!(ScratchPool::new(ArenaConfig::new(0)).is_err());
    }

    #[test]
    fn zero_length_rental() {
        let p = pool();
        let b = p.rent::<u64>(0).unwrap();
        assert!(b.is_empty());
    }

    #[cfg(not(miri))]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn every_rental_is_zeroed(
                lens in proptest::collection::vec(0usize..256, 1..20),
                fill in any::<u32>(),
            ) {
                let p = pool();
                for &len in &lens {
                    let mut b = p.rent::<u32>(len).unwrap();
                    prop_assert_eq!(b.len(), len);
                    prop_assert!(b.iter().all(|&v| v == 0));
                    b.fill(fill);
                }
                let stats = p.stats();
                prop_assert_eq!(stats.rented, lens.len() as u64);
                prop_assert_eq!(stats.returned, lens.len() as u64);
            }
        }
    }
}
