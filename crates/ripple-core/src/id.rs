//! Strongly-typed node and edge identifiers.
//!
//! Ids are dense, non-negative integers. Per-node and per-edge arrays are
//! indexed directly by [`NodeId::index`] / [`EdgeId::index`], so a store's
//! largest id determines the size of every scratch array built over it.

use std::fmt;

/// Identifies a node within a graph store.
///
/// Node ids are dense: a store holding `n` nodes typically uses ids
/// `0..n`, although removed nodes may leave gaps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Position of this node in per-node arrays.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Build a node id from an array index.
    ///
    /// # Panics
    ///
    /// Panics if `index` does not fit in a `u32`. Ids are never wrapped.
    #[inline]
    pub fn from_index(index: usize) -> Self {
        match u32::try_from(index) {
            Ok(v) => Self(v),
            Err(_) => panic!("node index {index} exceeds u32::MAX"),
        }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for NodeId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Identifies an edge within a graph store.
///
/// Edge ids key the store's payload table ([`EdgeData`](crate::EdgeData)).
/// In an undirected store both directions of one edge share the same id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct EdgeId(pub u32);

impl EdgeId {
    /// Position of this edge in per-edge arrays.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Build an edge id from an array index.
    ///
    /// # Panics
    ///
    /// Panics if `index` does not fit in a `u32`.
    #[inline]
    pub fn from_index(index: usize) -> Self {
        match u32::try_from(index) {
            Ok(v) => Self(v),
            Err(_) => panic!("edge index {index} exceeds u32::MAX"),
        }
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for EdgeId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_round_trips() {
        assert_eq!(NodeId::from_index(17).index(), 17);
        assert_eq!(EdgeId::from_index(0).index(), 0);
    }

    #[test]
    #[should_panic(expected = "exceeds u32::MAX")]
    #[cfg(target_pointer_width = "64")]
    fn from_index_rejects_overflow() {
        let _ = NodeId::from_index(u32::MAX as usize + 1);
    }

    #[test]
    fn ordering_follows_raw_value() {
        let mut ids = vec![NodeId(3), NodeId(0), NodeId(2)];
        ids.sort();
        assert_eq!(ids, vec![NodeId(0), NodeId(2), NodeId(3)]);
    }

    #[test]
    fn display_is_raw_number() {
        assert_eq!(NodeId(42).to_string(), "42");
        assert_eq!(EdgeId(7).to_string(), "7");
    }
}
