//! Two-level hash table keyed by (K1, K2)
//!
//! The outer `LinearProbeTable` maps K1 to an inner `LinearProbeTable<K2, V>`.
//! Inner tables are created on the first insert under their outer key and
//! removed with their last entry, and each grows independently.

use crate::digest::ContentDigest;
use crate::error::{KeyLevel, Result, TableError};
use crate::hashing::{poly_hash, KeyHasher};
use crate::linear_probe::{LinearProbeTable, Probe};
use crate::sizes::TableSizes;
use crate::stats::DoubleKeyStats;
use std::borrow::Borrow;
use std::fmt;

/// Double-key hash table
///
/// Keys are character sequences (`AsRef<str>`); lookups accept any borrowed
/// form, so a `DoubleKeyTable<String, String, V>` is queried with `&str`.
#[derive(Clone)]
pub struct DoubleKeyTable<K1, K2, V> {
    /// K1 -> inner table, never holds an empty inner table
    pub(crate) outer: LinearProbeTable<K1, LinearProbeTable<K2, V>>,

    /// Total (K1, K2) entries
    pub(crate) count: usize,

    /// Capacity sequence for every inner table
    pub(crate) inner_sizes: TableSizes,

    /// Second-key strategy handed to each inner table
    pub(crate) inner_hasher: KeyHasher,
}

impl<K1, K2, V> DoubleKeyTable<K1, K2, V>
where
    K1: AsRef<str> + Eq,
    K2: AsRef<str> + Eq,
{
    /// Create new table with the default capacity sequence at both levels
    pub fn new() -> Self {
        Self::with_sizes(TableSizes::default(), TableSizes::default())
    }

    /// Create new table with separate outer and inner capacity sequences
    pub fn with_sizes(outer_sizes: TableSizes, inner_sizes: TableSizes) -> Self {
        Self::with_hashers(outer_sizes, inner_sizes, poly_hash, poly_hash)
    }

    /// Create new table with injected hash strategies
    ///
    /// # Arguments
    /// * `outer_sizes` - Capacity sequence of the outer table
    /// * `inner_sizes` - Capacity sequence of every inner table
    /// * `hash1` - First-key strategy, reduced by the outer capacity
    /// * `hash2` - Second-key strategy, reduced by each inner table's own capacity
    pub fn with_hashers(
        outer_sizes: TableSizes,
        inner_sizes: TableSizes,
        hash1: KeyHasher,
        hash2: KeyHasher,
    ) -> Self {
        DoubleKeyTable {
            outer: LinearProbeTable::build(outer_sizes, hash1, KeyLevel::Outer),
            count: 0,
            inner_sizes,
            inner_hasher: hash2,
        }
    }

    fn new_inner(&self) -> LinearProbeTable<K2, V> {
        LinearProbeTable::build(self.inner_sizes.clone(), self.inner_hasher, KeyLevel::Inner)
    }

    /// Home slot of a first key in the outer table
    pub fn hash1(&self, key: &str) -> usize {
        self.outer.hash(key)
    }

    /// Home slot of a second key in `inner_table`, reduced by that table's capacity
    pub fn hash2(&self, key: &str, inner_table: &LinearProbeTable<K2, V>) -> usize {
        inner_table.hash(key)
    }

    /// Resolve `(outer_position, inner_position)` of a present compound key
    ///
    /// # Errors
    /// * `NotFound` - either key is absent
    /// * `CapacityExhausted` - a completely full table was scanned without a match
    pub fn locate<Q1, Q2>(&self, key1: &Q1, key2: &Q2) -> Result<(usize, usize)>
    where
        K1: Borrow<Q1>,
        Q1: AsRef<str> + Eq + ?Sized,
        K2: Borrow<Q2>,
        Q2: AsRef<str> + Eq + ?Sized,
    {
        let pos1 = self.outer.locate(key1, false)?;
        let inner = self
            .outer
            .value_at(pos1)
            .ok_or_else(|| TableError::not_found(key1.as_ref(), KeyLevel::Outer))?;
        let pos2 = inner.locate(key2, false)?;
        Ok((pos1, pos2))
    }

    /// Insert-side resolution: binds a fresh inner table to `key1` if needed
    fn locate_for_insert(&mut self, key1: K1, key2: &K2) -> Result<(usize, usize)> {
        let pos1 = match self.outer.probe(&key1) {
            Probe::Occupied(pos) => pos,
            Probe::Vacant(pos) => {
                let inner = self.new_inner();
                self.outer.write_at(pos, key1, inner);
                pos
            }
            Probe::Full => {
                return Err(TableError::CapacityExhausted {
                    capacity: self.outer.capacity(),
                })
            }
        };

        let inner = self
            .outer
            .value_at(pos1)
            .ok_or(TableError::CapacityExhausted {
                capacity: self.outer.capacity(),
            })?;
        let pos2 = inner.locate(key2, true)?;
        Ok((pos1, pos2))
    }

    /// Everything `set` could fail on, checked before any slot is written
    fn check_room(&self, key1: &K1, key2: &K2) -> Result<()> {
        match self.outer.probe(key1) {
            Probe::Full => Err(TableError::CapacityExhausted {
                capacity: self.outer.capacity(),
            }),
            // A fresh inner table always has room for its first entry
            Probe::Vacant(_) => self.outer.check_room(),
            Probe::Occupied(pos) => match self.outer.value_at(pos) {
                Some(inner) => match inner.probe(key2) {
                    Probe::Occupied(_) => Ok(()),
                    Probe::Vacant(_) => inner.check_room(),
                    Probe::Full => Err(TableError::CapacityExhausted {
                        capacity: inner.capacity(),
                    }),
                },
                None => Ok(()),
            },
        }
    }

    /// Set a value, returning the one it replaced
    ///
    /// Either level grows once its occupancy exceeds half its capacity.
    ///
    /// # Errors
    /// * `CapacityExhausted` - the write would need more room than the
    ///   capacity sequence provides; nothing is modified
    pub fn set(&mut self, key1: K1, key2: K2, value: V) -> Result<Option<V>> {
        self.check_room(&key1, &key2)?;
        let (pos1, pos2) = self.locate_for_insert(key1, &key2)?;

        let inner = self
            .outer
            .value_at_mut(pos1)
            .ok_or_else(|| TableError::not_found(key2.as_ref(), KeyLevel::Inner))?;
        let previous = inner.write_at(pos2, key2, value);
        inner.grow_if_needed()?;

        if previous.is_none() {
            self.count += 1;
        }
        self.outer.grow_if_needed()?;
        Ok(previous)
    }

    /// Get value by compound key
    pub fn get<Q1, Q2>(&self, key1: &Q1, key2: &Q2) -> Result<&V>
    where
        K1: Borrow<Q1>,
        Q1: AsRef<str> + Eq + ?Sized,
        K2: Borrow<Q2>,
        Q2: AsRef<str> + Eq + ?Sized,
    {
        let (pos1, pos2) = self.locate(key1, key2)?;
        self.outer
            .value_at(pos1)
            .and_then(|inner| inner.value_at(pos2))
            .ok_or_else(|| TableError::not_found(key2.as_ref(), KeyLevel::Inner))
    }

    /// Get mutable value by compound key
    pub fn get_mut<Q1, Q2>(&mut self, key1: &Q1, key2: &Q2) -> Result<&mut V>
    where
        K1: Borrow<Q1>,
        Q1: AsRef<str> + Eq + ?Sized,
        K2: Borrow<Q2>,
        Q2: AsRef<str> + Eq + ?Sized,
    {
        self.outer.get_mut(key1)?.get_mut(key2)
    }

    /// True when `get` would succeed
    pub fn contains<Q1, Q2>(&self, key1: &Q1, key2: &Q2) -> bool
    where
        K1: Borrow<Q1>,
        Q1: AsRef<str> + Eq + ?Sized,
        K2: Borrow<Q2>,
        Q2: AsRef<str> + Eq + ?Sized,
    {
        self.get(key1, key2).is_ok()
    }

    /// Delete a compound key, returning its value
    ///
    /// The inner slot is cleared and its cluster repaired. If that empties
    /// the inner table, the outer slot is cleared and repaired as well.
    pub fn delete<Q1, Q2>(&mut self, key1: &Q1, key2: &Q2) -> Result<V>
    where
        K1: Borrow<Q1>,
        Q1: AsRef<str> + Eq + ?Sized,
        K2: Borrow<Q2>,
        Q2: AsRef<str> + Eq + ?Sized,
    {
        let (pos1, _) = self.locate(key1, key2)?;

        let inner = self
            .outer
            .value_at_mut(pos1)
            .ok_or_else(|| TableError::not_found(key1.as_ref(), KeyLevel::Outer))?;
        let value = inner.remove(key2)?;
        let emptied = inner.is_empty();

        self.count -= 1;
        if emptied {
            self.outer.remove_at(pos1);
        }
        Ok(value)
    }

    /// Inner table bound to `key1`
    pub fn inner_table<Q1>(&self, key1: &Q1) -> Result<&LinearProbeTable<K2, V>>
    where
        K1: Borrow<Q1>,
        Q1: AsRef<str> + Eq + ?Sized,
    {
        self.outer.get(key1)
    }

    /// Capacity of the inner table bound to `key1`
    pub fn inner_capacity<Q1>(&self, key1: &Q1) -> Result<usize>
    where
        K1: Borrow<Q1>,
        Q1: AsRef<str> + Eq + ?Sized,
    {
        Ok(self.inner_table(key1)?.capacity())
    }

    /// Number of entries under `key1`
    pub fn inner_len<Q1>(&self, key1: &Q1) -> Result<usize>
    where
        K1: Borrow<Q1>,
        Q1: AsRef<str> + Eq + ?Sized,
    {
        Ok(self.inner_table(key1)?.len())
    }

    /// All first keys
    pub fn keys(&self) -> Vec<&K1> {
        self.iter_keys().collect()
    }

    /// Second keys stored under `key1`
    pub fn keys_for<Q1>(&self, key1: &Q1) -> Result<Vec<&K2>>
    where
        K1: Borrow<Q1>,
        Q1: AsRef<str> + Eq + ?Sized,
    {
        Ok(self.iter_keys_for(key1)?.collect())
    }

    /// All values
    pub fn values(&self) -> Vec<&V> {
        self.iter_values().collect()
    }

    /// Values stored under `key1`
    pub fn values_for<Q1>(&self, key1: &Q1) -> Result<Vec<&V>>
    where
        K1: Borrow<Q1>,
        Q1: AsRef<str> + Eq + ?Sized,
    {
        Ok(self.iter_values_for(key1)?.collect())
    }

    pub fn iter_keys_for<Q1>(&self, key1: &Q1) -> Result<impl Iterator<Item = &K2> + '_>
    where
        K1: Borrow<Q1>,
        Q1: AsRef<str> + Eq + ?Sized,
    {
        Ok(self.inner_table(key1)?.keys())
    }

    pub fn iter_values_for<Q1>(&self, key1: &Q1) -> Result<impl Iterator<Item = &V> + '_>
    where
        K1: Borrow<Q1>,
        Q1: AsRef<str> + Eq + ?Sized,
    {
        Ok(self.inner_table(key1)?.values())
    }

    /// Check the structural invariants: no empty inner table, counts match
    /// reachable entries, and every probe chain is unbroken
    pub fn is_consistent(&self) -> bool {
        let mut entries = 0;
        for inner in self.outer.values() {
            if inner.is_empty() || !inner.probe_chains_intact() {
                return false;
            }
            entries += inner.len();
        }
        entries == self.count && self.outer.probe_chains_intact()
    }

    /// Layout statistics for both levels
    pub fn stats(&self) -> DoubleKeyStats {
        DoubleKeyStats {
            entries: self.count,
            outer: self.outer.stats(),
            inner: self.outer.values().map(LinearProbeTable::stats).collect(),
        }
    }

    /// Order-independent digest of every (key1, key2, value) entry
    pub fn digest(&self) -> ContentDigest
    where
        V: AsRef<[u8]>,
    {
        ContentDigest::from_hashes(self.iter().map(|(key1, key2, value)| {
            ContentDigest::hash_entry(&[
                key1.as_ref().as_bytes(),
                key2.as_ref().as_bytes(),
                value.as_ref(),
            ])
        }))
    }
}

impl<K1, K2, V> DoubleKeyTable<K1, K2, V> {
    /// Total number of (key1, key2) entries
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Occupied outer slots, i.e. distinct first keys
    pub fn table_count(&self) -> usize {
        self.outer.len()
    }

    /// Outer table capacity
    pub fn capacity(&self) -> usize {
        self.outer.capacity()
    }

    /// Lazy, one-pass iteration over first keys in storage order
    pub fn iter_keys(&self) -> impl Iterator<Item = &K1> {
        self.outer.keys()
    }

    /// Lazy, one-pass iteration over every value in storage order
    pub fn iter_values(&self) -> impl Iterator<Item = &V> {
        self.outer.values().flat_map(|inner| inner.values())
    }

    /// Iterate over all entries as (key1, key2, value)
    pub fn iter(&self) -> impl Iterator<Item = (&K1, &K2, &V)> {
        self.outer.iter().flat_map(|(key1, inner)| {
            inner.iter().map(move |(key2, value)| (key1, key2, value))
        })
    }
}

impl<K1, K2, V> Default for DoubleKeyTable<K1, K2, V>
where
    K1: AsRef<str> + Eq,
    K2: AsRef<str> + Eq,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K1, K2, V> fmt::Debug for DoubleKeyTable<K1, K2, V>
where
    K1: fmt::Debug,
    K2: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DoubleKeyTable")
            .field("count", &self.count)
            .field("outer", &self.outer)
            .finish()
    }
}

/// Outer slot dump with each inner table indented beneath its key
impl<K1, K2, V> fmt::Display for DoubleKeyTable<K1, K2, V>
where
    K1: AsRef<str>,
    K2: AsRef<str>,
    V: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "START")?;
        for (pos, slot) in self.outer.slots().enumerate() {
            match slot {
                None => writeln!(f, "{} -- EMPTY --", pos)?,
                Some((key1, inner)) => {
                    writeln!(f, "{} ~ {}:", pos, key1.as_ref())?;
                    for line in inner.to_string().lines() {
                        writeln!(f, "  {}", line)?;
                    }
                }
            }
        }
        write!(f, "END")
    }
}
