//! The [`Zeroed`] trait: element types a scratch buffer can hold.

use std::sync::atomic::{
    AtomicBool, AtomicI32, AtomicI64, AtomicU16, AtomicU32, AtomicU64, AtomicU8, AtomicUsize,
};

use ripple_core::{EdgeId, NodeId};

/// Element types with a well-defined zero value.
///
/// Every slot of a freshly rented [`ScratchBuffer`](crate::ScratchBuffer)
/// holds `T::zeroed()`, whatever the recycled allocation held before.
pub trait Zeroed: Send + Sized + 'static {
    /// The zero value of the type.
    fn zeroed() -> Self;
}

macro_rules! zeroed_num {
    ($($t:ty),*) => {$(
        impl Zeroed for $t {
            #[inline]
            fn zeroed() -> Self {
                0 as $t
            }
        }
    )*};
}

macro_rules! zeroed_atomic {
    ($($t:ty),*) => {$(
        impl Zeroed for $t {
            #[inline]
            fn zeroed() -> Self {
                <$t>::new(0)
            }
        }
    )*};
}

zeroed_num!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize, f32, f64);
zeroed_atomic!(AtomicU8, AtomicU16, AtomicU32, AtomicU64, AtomicUsize, AtomicI32, AtomicI64);

impl Zeroed for bool {
    #[inline]
    fn zeroed() -> Self {
        false
    }
}

impl Zeroed for AtomicBool {
    #[inline]
    fn zeroed() -> Self {
        AtomicBool::new(false)
    }
}

impl Zeroed for NodeId {
    #[inline]
    fn zeroed() -> Self {
        NodeId(0)
    }
}

impl Zeroed for EdgeId {
    #[inline]
    fn zeroed() -> Self {
        EdgeId(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::Ordering;

    #[test]
    fn numeric_zeroes() {
        assert_eq!(u32::zeroed(), 0);
        assert_eq!(f64::zeroed(), 0.0);
        assert!(!bool::zeroed());
        assert_eq!(NodeId::zeroed(), NodeId(0));
    }

    #[test]
    fn atomic_zeroes() {
        assert_eq!(AtomicU8::zeroed().load(Ordering::Relaxed), 0);
        assert!(!AtomicBool::zeroed().load(Ordering::Relaxed));
    }
}
