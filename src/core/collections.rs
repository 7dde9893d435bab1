//! Collection aliases used throughout the crate.
//!
//! Hash-based collections use `rustc_hash` for fast, non-cryptographic hashing
//! of internal keys (vertex bit patterns, face indices). Short sequences such as
//! address paths live inline in a [`SmallBuffer`].

use rustc_hash::{FxBuildHasher, FxHashMap, FxHashSet};
use smallvec::SmallVec;

/// Optimized `HashMap` type for internal mappings.
///
/// ⚠️ **Not DoS-resistant**: only use with trusted, internal keys.
///
/// # Examples
///
/// ```rust
/// use facet_address::core::collections::FastHashMap;
///
/// let mut map: FastHashMap<u64, usize> = FastHashMap::default();
/// map.insert(123, 456);
/// assert_eq!(map.get(&123), Some(&456));
/// ```
pub type FastHashMap<K, V> = FxHashMap<K, V>;

/// Optimized `HashSet` type for internal membership tests.
pub type FastHashSet<T> = FxHashSet<T>;

/// Stack-allocated buffer that spills to the heap beyond `N` elements.
///
/// # Examples
///
/// ```rust
/// use facet_address::core::collections::SmallBuffer;
///
/// let mut buffer: SmallBuffer<usize, 4> = SmallBuffer::new();
/// buffer.extend([1, 2, 3]);
/// assert!(!buffer.spilled());
/// ```
pub type SmallBuffer<T, const N: usize> = SmallVec<[T; N]>;

/// Inline capacity of an address path before it spills to the heap.
///
/// Covers the base index plus 15 subdivision levels.
pub const ADDRESS_INLINE_CAPACITY: usize = 16;

/// Creates a `FastHashMap` with pre-allocated capacity.
#[inline]
#[must_use]
pub fn fast_hash_map_with_capacity<K, V>(capacity: usize) -> FastHashMap<K, V> {
    FastHashMap::with_capacity_and_hasher(capacity, FxBuildHasher)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_helper_preallocates() {
        let map = fast_hash_map_with_capacity::<u64, usize>(100);
        assert!(map.capacity() >= 100);
    }

    #[test]
    fn small_buffer_spills_past_inline_capacity() {
        let mut buffer: SmallBuffer<usize, ADDRESS_INLINE_CAPACITY> = SmallBuffer::new();
        buffer.extend(0..ADDRESS_INLINE_CAPACITY);
        assert!(!buffer.spilled());
        buffer.push(ADDRESS_INLINE_CAPACITY);
        assert!(buffer.spilled());
    }
}
