//! Concurrency-safe disjoint-set forest.

use std::sync::atomic::{AtomicU32, AtomicU8, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use indexmap::IndexMap;
use ripple_arena::{ArenaError, ScratchBuffer, ScratchPool};
use ripple_core::NodeId;

/// A union-find structure over ids `0..len` that can be shared between
/// threads.
///
/// `find` uses path halving with compare-and-swap, so it never blocks.
/// `union` locks the two roots (one mutex per slot, always taken in
/// ascending index order), re-validates that both are still roots, and
/// retries if another thread got there first. Union-by-rank keeps trees
/// shallow.
///
/// Parent and rank arrays are rented from a [`ScratchPool`].
///
/// # Examples
///
/// ```
/// use ripple_algo::UnionFind;
/// use ripple_core::NodeId;
///
/// let uf = UnionFind::new(4).unwrap();
/// uf.union(NodeId(0), NodeId(1));
/// uf.union(NodeId(2), NodeId(3));
/// assert!(!uf.same_set(NodeId(0), NodeId(3)));
/// uf.union(NodeId(1), NodeId(2));
/// assert!(uf.same_set(NodeId(0), NodeId(3)));
/// assert_eq!(uf.sets_count(), 1);
/// ```
pub struct UnionFind {
    parent: ScratchBuffer<AtomicU32>,
    rank: ScratchBuffer<AtomicU8>,
    locks: Vec<Mutex<()>>,
}

impl UnionFind {
    /// `len` singleton sets, storage from the global pool.
    pub fn new(len: usize) -> Result<Self, ArenaError> {
        Self::with_pool(ScratchPool::global(), len)
    }

    /// `len` singleton sets, storage from `pool`.
    pub fn with_pool(pool: &ScratchPool, len: usize) -> Result<Self, ArenaError> {
        let parent: ScratchBuffer<AtomicU32> = pool.rent(len)?;
        for (i, slot) in parent.iter().enumerate() {
            slot.store(NodeId::from_index(i).0, Ordering::Relaxed);
        }
        Ok(Self {
            parent,
            rank: pool.rent(len)?,
            locks: (0..len).map(|_| Mutex::new(())).collect(),
        })
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.parent.len()
    }

    /// Whether there are no elements.
    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    #[inline]
    fn parent_of(&self, x: u32) -> u32 {
        self.parent[x as usize].load(Ordering::Acquire)
    }

    /// Representative of the set containing `x`.
    ///
    /// The representative of a set can change while other threads union
    /// concurrently; it is stable once all unions have finished.
    ///
    /// # Panics
    ///
    /// Panics if `x` is out of range.
    pub fn find(&self, x: NodeId) -> NodeId {
        let mut x = x.0;
        loop {
            let p = self.parent_of(x);
            if p == x {
                return NodeId(x);
            }
            let gp = self.parent_of(p);
            if gp != p {
                // Parents only ever move towards a root, so a lost race
                // here is harmless.
                let _ = self.parent[x as usize].compare_exchange(
                    p,
                    gp,
                    Ordering::AcqRel,
                    Ordering::Relaxed,
                );
            }
            x = gp;
        }
    }

    fn lock(&self, x: u32) -> MutexGuard<'_, ()> {
        self.locks[x as usize]
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Merge the sets containing `a` and `b`.
    ///
    /// Returns `true` if they were different sets.
    pub fn union(&self, a: NodeId, b: NodeId) -> bool {
        loop {
            let ra = self.find(a).0;
            let rb = self.find(b).0;
            if ra == rb {
                return false;
            }
            let (lo, hi) = if ra < rb { (ra, rb) } else { (rb, ra) };
            let _lo = self.lock(lo);
            let _hi = self.lock(hi);
            if self.parent_of(ra) != ra || self.parent_of(rb) != rb {
                continue;
            }

            let rank_a = self.rank[ra as usize].load(Ordering::Relaxed);
            let rank_b = self.rank[rb as usize].load(Ordering::Relaxed);
            let (child, root) = if rank_a < rank_b { (ra, rb) } else { (rb, ra) };
            if rank_a == rank_b {
                self.rank[root as usize].fetch_add(1, Ordering::Relaxed);
            }
            self.parent[child as usize].store(root, Ordering::Release);
            return true;
        }
    }

    /// Whether `a` and `b` are in the same set.
    pub fn same_set(&self, a: NodeId, b: NodeId) -> bool {
        loop {
            let ra = self.find(a);
            let rb = self.find(b);
            if ra == rb {
                return true;
            }
            // `ra` still being a root means the two were distinct at the
            // moment `rb` was found.
            if self.parent_of(ra.0) == ra.0 {
                return false;
            }
        }
    }

    /// Number of disjoint sets. O(n).
    pub fn sets_count(&self) -> usize {
        self.parent
            .iter()
            .enumerate()
            .filter(|(i, p)| p.load(Ordering::Acquire) as usize == *i)
            .count()
    }

    /// Members of every set, keyed by representative.
    ///
    /// Sets appear in order of their smallest member and members are
    /// ascending.
    pub fn groups(&self) -> IndexMap<NodeId, Vec<NodeId>> {
        let mut groups: IndexMap<NodeId, Vec<NodeId>> = IndexMap::new();
        for i in 0..self.len() {
            let id = NodeId::from_index(i);
            groups.entry(self.find(id)).or_default().push(id);
        }
        groups
    }
}

impl std::fmt::Debug for UnionFind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnionFind")
            .field("len", &self.len())
            .field("sets", &self.sets_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ripple_arena::ArenaConfig;

    #[test]
    fn starts_as_singletons() {
        let uf = UnionFind::new(5).unwrap();
        assert_eq!(uf.sets_count(), 5);
        assert!((0..5).all(|i| uf.find(NodeId(i)) == NodeId(i)));
    }

    #[test]
    fn chained_unions_merge_transitively() {
        let uf = UnionFind::new(6).unwrap();
        let before = uf.sets_count();
        assert!(uf.union(NodeId(0), NodeId(1)));
        assert!(uf.union(NodeId(2), NodeId(3)));
        assert!(uf.union(NodeId(1), NodeId(2)));
        assert!(uf.same_set(NodeId(0), NodeId(3)));
        assert_eq!(uf.sets_count(), before - 3);
        assert!(!uf.union(NodeId(3), NodeId(0)));
        assert!(!uf.same_set(NodeId(0), NodeId(4)));
    }

    #[test]
    fn groups_in_first_seen_order() {
        let uf = UnionFind::new(5).unwrap();
        uf.union(NodeId(4), NodeId(1));
        uf.union(NodeId(3), NodeId(0));
        let groups: Vec<_> = uf.groups().into_values().collect();
        assert_eq!(
            groups,
            vec![
                vec![NodeId(0), NodeId(3)],
                vec![NodeId(1), NodeId(4)],
                vec![NodeId(2)],
            ]
        );
    }

    #[test]
    fn rank_keeps_larger_tree_as_root() {
        let uf = UnionFind::new(4).unwrap();
        uf.union(NodeId(0), NodeId(1));
        let root = uf.find(NodeId(0));
        uf.union(NodeId(2), NodeId(0));
        assert_eq!(uf.find(NodeId(2)), root);
    }

    #[test]
    fn storage_comes_from_pool() {
        let pool = ScratchPool::new(ArenaConfig::default()).unwrap();
        let uf = UnionFind::with_pool(&pool, 8).unwrap();
        assert_eq!(pool.stats().rented, 2);
        drop(uf);
        assert_eq!(pool.stats().returned, 2);
    }

    #[test]
    #[should_panic]
    fn out_of_range_panics() {
        UnionFind::new(2).unwrap().find(NodeId(2));
    }

    #[test]
    fn concurrent_unions_agree_with_sequential() {
        let n = 2000u32;
        let uf = UnionFind::new(n as usize).unwrap();
        std::thread::scope(|s| {
            for t in 0..8u32 {
                let uf = &uf;
                s.spawn(move || {
                    // Every thread links i to i + 2 for its share of i:
                    // evens and odds end up in two sets.
                    let mut i = t;
                    while i + 2 < n {
                        uf.union(NodeId(i), NodeId(i + 2));
                        i += 8;
                    }
                });
            }
        });
        assert_eq!(uf.sets_count(), 2);
        assert!(uf.same_set(NodeId(0), NodeId(n - 2)));
        assert!(uf.same_set(NodeId(1), NodeId(n - 1)));
        assert!(!uf.same_set(NodeId(0), NodeId(1)));
    }

    #[cfg(not(miri))]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn matches_naive_labelling(
                n in 1usize..60,
                pairs in proptest::collection::vec((any::<prop::sample::Index>(), any::<prop::sample::Index>()), 0..80),
            ) {
                let uf = UnionFind::new(n).unwrap();
                let mut label: Vec<usize> = (0..n).collect();
                for (a, b) in &pairs {
                    let (a, b) = (a.index(n), b.index(n));
                    uf.union(NodeId::from_index(a), NodeId::from_index(b));
                    let (la, lb) = (label[a], label[b]);
                    for l in label.iter_mut() {
                        if *l == lb {
                            *l = la;
                        }
                    }
                }
                for a in 0..n {
                    for b in 0..n {
                        prop_assert_eq!(
                            uf.same_set(NodeId::from_index(a), NodeId::from_index(b)),
                            label[a] == label[b]
                        );
                    }
                }
                let distinct: std::collections::HashSet<_> = label.iter().collect();
                prop_assert_eq!(uf.sets_count(), distinct.len());
            }
        }
    }
}
