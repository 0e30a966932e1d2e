//! Hash map constructors backed by ahash
//!
//! Line-keyed maps are built and dropped once per scan, so they use ahash's
//! `RandomState` instead of SipHash.

use ahash::RandomState;
use std::collections::HashMap;

/// Create an empty `HashMap` with the ahash hasher
///
/// # Example
///
/// ```rust
/// use fsl_core::utils::hashers::create_hash_map;
///
/// let mut map = create_hash_map::<usize, &str>();
/// map.insert(0, "first line");
/// assert_eq!(map.len(), 1);
/// ```
#[must_use]
pub fn create_hash_map<K, V>() -> HashMap<K, V, RandomState> {
    HashMap::with_hasher(RandomState::new())
}

/// Create a `HashMap` with the ahash hasher and pre-allocated capacity
#[must_use]
pub fn create_hash_map_with_capacity<K, V>(capacity: usize) -> HashMap<K, V, RandomState> {
    HashMap::with_capacity_and_hasher(capacity, RandomState::new())
}
