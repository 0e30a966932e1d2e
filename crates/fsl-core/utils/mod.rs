//! Shared utilities for FSL core
//!
//! Holds the crate error type and the hash map constructors used by the
//! tokenizer's per-line storage.

pub mod errors;
pub mod hashers;

pub use errors::{CoreError, Result};
pub use hashers::{create_hash_map, create_hash_map_with_capacity};
