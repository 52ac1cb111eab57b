//! Double-key hash table - open addressing with nested linear-probe tables
//!
//! Core library providing:
//! - Polynomial string hashing reduced by each table's current capacity
//! - Linear probing with growth along a fixed capacity sequence
//! - Tombstone-free deletion with cluster repair at both levels
//! - Layout statistics and an order-independent content digest

pub mod digest;
pub mod double_key;
pub mod error;
pub mod hashing;
pub mod linear_probe;
pub mod sizes;
pub mod stats;

pub use digest::ContentDigest;
pub use double_key::DoubleKeyTable;
pub use error::{KeyLevel, TableError};
pub use hashing::{poly_hash, KeyHasher};
pub use linear_probe::{LinearProbeTable, Probe};
pub use sizes::{TableSizes, DEFAULT_SIZES};
pub use stats::{DoubleKeyStats, TableStats};

#[cfg(test)]
mod tests;
