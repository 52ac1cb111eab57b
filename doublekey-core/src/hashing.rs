//! Rolling polynomial hash over a key's characters
//!
//! The hash is always reduced by the *current* capacity of the table it
//! indexes, so a table must rehash with its new capacity after growing.

/// Multiplier growth factor applied after every character
pub const HASH_BASE: u64 = 31;

/// Initial multiplier
pub const HASH_SEED: u64 = 31415;

/// Hash strategy injected into a table: `(key, capacity) -> home slot`
///
/// The returned slot must be `< capacity`.
pub type KeyHasher = fn(&str, usize) -> usize;

/// Polynomial hash of `key` reduced modulo `capacity`
///
/// `capacity` must be at least 2, the multiplier is reduced modulo
/// `capacity - 1`.
#[inline]
pub fn poly_hash(key: &str, capacity: usize) -> usize {
    debug_assert!(capacity >= 2, "capacity must be at least 2");

    let capacity = capacity as u64;
    let mut value = 0u64;
    let mut a = HASH_SEED;

    for c in key.chars() {
        value = (c as u64 + a * value) % capacity;
        a = a * HASH_BASE % (capacity - 1);
    }

    value as usize
}
