//! Single-key open-addressed table
//!
//! Provides:
//! - Home slot from an injected `KeyHasher`, stride +1 probing
//! - Growth along a `TableSizes` sequence, keeping load factor <= 0.5
//! - Tombstone-free deletion: the cluster after a cleared slot is
//!   lifted out and reinserted

use crate::error::{KeyLevel, Result, TableError};
use crate::hashing::{poly_hash, KeyHasher};
use crate::sizes::TableSizes;
use crate::stats::TableStats;
use log::{debug, trace, warn};
use std::borrow::Borrow;
use std::fmt;
use std::mem;

/// Occupied slot
#[derive(Clone, Debug)]
pub struct Entry<K, V> {
    pub key: K,
    pub value: V,
}

/// Outcome of a linear probe for one key
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Probe {
    /// Key is stored at this slot
    Occupied(usize),
    /// Key is absent, this is the first empty slot on its probe path
    Vacant(usize),
    /// Every slot was scanned, none empty and none matching
    Full,
}

/// Open-addressed table with linear probing
#[derive(Clone)]
pub struct LinearProbeTable<K, V> {
    /// Slot array, length is always `sizes[size_index]`
    pub(crate) slots: Vec<Option<Entry<K, V>>>,

    /// Position of the current capacity in `sizes`
    pub(crate) size_index: usize,

    /// Occupied slots
    pub(crate) count: usize,

    pub(crate) sizes: TableSizes,

    pub(crate) hasher: KeyHasher,

    /// Reported in `NotFound` errors
    pub(crate) level: KeyLevel,
}

fn empty_slots<K, V>(capacity: usize) -> Vec<Option<Entry<K, V>>> {
    let mut slots = Vec::with_capacity(capacity);
    slots.resize_with(capacity, || None);
    slots
}

impl<K, V> LinearProbeTable<K, V>
where
    K: AsRef<str> + Eq,
{
    /// Create a table with the default capacity sequence and polynomial hash
    pub fn new() -> Self {
        Self::with_hasher(TableSizes::default(), poly_hash)
    }

    /// Create a table that grows along `sizes`
    pub fn with_sizes(sizes: TableSizes) -> Self {
        Self::with_hasher(sizes, poly_hash)
    }

    /// Create a table with an injected hash strategy
    ///
    /// # Arguments
    /// * `sizes` - Capacity sequence, the table starts at its first entry
    /// * `hasher` - Maps `(key, current capacity)` to a home slot
    pub fn with_hasher(sizes: TableSizes, hasher: KeyHasher) -> Self {
        Self::build(sizes, hasher, KeyLevel::Outer)
    }

    pub(crate) fn build(sizes: TableSizes, hasher: KeyHasher, level: KeyLevel) -> Self {
        let capacity = sizes[0];
        LinearProbeTable {
            slots: empty_slots(capacity),
            size_index: 0,
            count: 0,
            sizes,
            hasher,
            level,
        }
    }

    /// Home slot of `key` at the current capacity
    #[inline]
    pub fn hash<Q>(&self, key: &Q) -> usize
    where
        Q: AsRef<str> + ?Sized,
    {
        // Reduced again so a misbehaving strategy cannot index out of bounds
        (self.hasher)(key.as_ref(), self.capacity()) % self.capacity()
    }

    /// Scan from the home slot of `key`, at most `capacity` slots
    pub fn probe<Q>(&self, key: &Q) -> Probe
    where
        K: Borrow<Q>,
        Q: AsRef<str> + Eq + ?Sized,
    {
        let capacity = self.capacity();
        let mut pos = self.hash(key);

        for _ in 0..capacity {
            match &self.slots[pos] {
                None => return Probe::Vacant(pos),
                Some(entry) if Borrow::<Q>::borrow(&entry.key) == key => {
                    return Probe::Occupied(pos)
                }
                Some(_) => {}
            }
            pos = (pos + 1) % capacity;
        }

        Probe::Full
    }

    /// Resolve the slot for `key`
    ///
    /// With `is_insert` an empty slot on the probe path is a valid answer,
    /// otherwise only the key's own slot is.
    ///
    /// # Errors
    /// * `NotFound` - key absent and `is_insert` is false
    /// * `CapacityExhausted` - every slot holds some other key
    pub fn locate<Q>(&self, key: &Q, is_insert: bool) -> Result<usize>
    where
        K: Borrow<Q>,
        Q: AsRef<str> + Eq + ?Sized,
    {
        match self.probe(key) {
            Probe::Occupied(pos) => Ok(pos),
            Probe::Vacant(pos) if is_insert => Ok(pos),
            Probe::Vacant(_) => Err(TableError::not_found(key.as_ref(), self.level)),
            Probe::Full => Err(TableError::CapacityExhausted {
                capacity: self.capacity(),
            }),
        }
    }

    /// Insert or replace, returning the replaced value
    ///
    /// Grows the table once occupancy exceeds half the capacity.
    pub fn insert(&mut self, key: K, value: V) -> Result<Option<V>> {
        let pos = self.locate(&key, true)?;
        if self.slots[pos].is_none() {
            self.check_room()?;
        }

        let previous = self.write_at(pos, key, value);
        self.grow_if_needed()?;
        Ok(previous)
    }

    /// Get value by key
    pub fn get<Q>(&self, key: &Q) -> Result<&V>
    where
        K: Borrow<Q>,
        Q: AsRef<str> + Eq + ?Sized,
    {
        let pos = self.locate(key, false)?;
        self.value_at(pos)
            .ok_or_else(|| TableError::not_found(key.as_ref(), self.level))
    }

    /// Get mutable value by key
    pub fn get_mut<Q>(&mut self, key: &Q) -> Result<&mut V>
    where
        K: Borrow<Q>,
        Q: AsRef<str> + Eq + ?Sized,
    {
        let pos = self.locate(key, false)?;
        let level = self.level;
        self.value_at_mut(pos)
            .ok_or_else(|| TableError::not_found(key.as_ref(), level))
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: AsRef<str> + Eq + ?Sized,
    {
        matches!(self.probe(key), Probe::Occupied(_))
    }

    /// Remove `key` and repair the cluster behind it
    pub fn remove<Q>(&mut self, key: &Q) -> Result<V>
    where
        K: Borrow<Q>,
        Q: AsRef<str> + Eq + ?Sized,
    {
        let pos = self.locate(key, false)?;
        self.remove_at(pos)
            .map(|entry| entry.value)
            .ok_or_else(|| TableError::not_found(key.as_ref(), self.level))
    }

    /// Clear slot `pos` and reinsert every entry of the cluster that follows it
    ///
    /// Returns `None` if the slot was already empty.
    pub(crate) fn remove_at(&mut self, pos: usize) -> Option<Entry<K, V>> {
        let removed = self.slots[pos].take()?;
        self.count -= 1;
        self.repair_cluster(pos);
        Some(removed)
    }

    /// Lift out the contiguous run after `cleared` and place each entry again
    ///
    /// Entries are reinserted in probe order. Placement cannot land past the
    /// end of the old run, so no further repair is needed.
    fn repair_cluster(&mut self, cleared: usize) {
        let capacity = self.capacity();
        let mut displaced = Vec::new();
        let mut pos = (cleared + 1) % capacity;

        while let Some(entry) = self.slots[pos].take() {
            displaced.push(entry);
            pos = (pos + 1) % capacity;
        }

        if displaced.is_empty() {
            return;
        }

        trace!(
            "repairing cluster after slot {}: reinserting {} entries",
            cleared,
            displaced.len()
        );

        self.count -= displaced.len();
        for entry in displaced {
            self.place(entry);
        }
    }

    /// Write an entry into its first empty probe slot
    ///
    /// Caller guarantees the key is absent and at least one slot is empty.
    fn place(&mut self, entry: Entry<K, V>) {
        let capacity = self.capacity();
        let mut pos = self.hash(&entry.key);
        while self.slots[pos].is_some() {
            pos = (pos + 1) % capacity;
        }
        self.slots[pos] = Some(entry);
        self.count += 1;
    }

    /// Store at a slot returned by `locate(.., true)`
    pub(crate) fn write_at(&mut self, pos: usize, key: K, value: V) -> Option<V> {
        if let Some(entry) = self.slots[pos].as_mut() {
            return Some(mem::replace(&mut entry.value, value));
        }
        self.slots[pos] = Some(Entry { key, value });
        self.count += 1;
        None
    }

    /// Fail before any write if one more entry could not be accommodated
    pub(crate) fn check_room(&self) -> Result<()> {
        let needed = self.count + 1;
        if needed * 2 > self.capacity() && self.next_size_index(needed).is_none() {
            warn!(
                "refusing insert: {} entries would exceed load limit and no larger capacity than {} is configured",
                needed,
                self.capacity()
            );
            return Err(TableError::CapacityExhausted {
                capacity: self.capacity(),
            });
        }
        Ok(())
    }

    /// First later capacity in the sequence that holds `entries` at load <= 0.5
    fn next_size_index(&self, entries: usize) -> Option<usize> {
        (self.size_index + 1..self.sizes.len()).find(|&i| entries * 2 <= self.sizes[i])
    }

    pub(crate) fn grow_if_needed(&mut self) -> Result<()> {
        if self.count * 2 > self.capacity() {
            self.rehash()?;
        }
        Ok(())
    }

    /// Rebuild into the next capacity, recomputing every home slot
    pub(crate) fn rehash(&mut self) -> Result<()> {
        let old_capacity = self.capacity();
        let index = self
            .next_size_index(self.count)
            .ok_or(TableError::CapacityExhausted {
                capacity: old_capacity,
            })?;

        let new_capacity = self.sizes[index];
        let old_slots = mem::replace(&mut self.slots, empty_slots(new_capacity));
        self.size_index = index;
        self.count = 0;

        for entry in old_slots.into_iter().flatten() {
            self.place(entry);
        }

        debug!(
            "grew table from {} to {} slots ({} entries)",
            old_capacity, new_capacity, self.count
        );
        Ok(())
    }

    /// True when every key is reachable from its home slot without
    /// crossing an empty slot
    pub fn probe_chains_intact(&self) -> bool {
        self.displacements().enumerate().all(|(pos, displacement)| {
            displacement.map_or(true, |d| {
                (0..d).all(|back| {
                    let capacity = self.capacity();
                    self.slots[(pos + capacity - back - 1) % capacity].is_some()
                })
            })
        })
    }

    /// Probe distance of each slot's entry from its home slot, `None` for empty slots
    pub fn displacements(&self) -> impl Iterator<Item = Option<usize>> + '_ {
        let capacity = self.capacity();
        self.slots.iter().enumerate().map(move |(pos, slot)| {
            slot.as_ref()
                .map(|entry| (pos + capacity - self.hash(&entry.key)) % capacity)
        })
    }

    /// Layout statistics (O(capacity) scan)
    pub fn stats(&self) -> TableStats {
        let displacements: Vec<Option<usize>> = self.displacements().collect();
        TableStats::from_displacements(&displacements)
    }
}

impl<K, V> LinearProbeTable<K, V> {
    pub(crate) fn value_at(&self, pos: usize) -> Option<&V> {
        self.slots.get(pos)?.as_ref().map(|entry| &entry.value)
    }

    pub(crate) fn value_at_mut(&mut self, pos: usize) -> Option<&mut V> {
        self.slots.get_mut(pos)?.as_mut().map(|entry| &mut entry.value)
    }

    /// Get current size
    pub fn len(&self) -> usize {
        self.count
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Number of slots
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Get load factor
    pub fn load_factor(&self) -> f64 {
        self.count as f64 / self.capacity() as f64
    }

    /// Capacity sequence this table grows along
    pub fn sizes(&self) -> &TableSizes {
        &self.sizes
    }

    /// Iterate over all entries in slot order
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.slots
            .iter()
            .filter_map(|slot| slot.as_ref().map(|entry| (&entry.key, &entry.value)))
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter().map(|(key, _)| key)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, value)| value)
    }

    /// Raw slot view, `None` for empty slots
    pub fn slots(&self) -> impl Iterator<Item = Option<(&K, &V)>> {
        self.slots
            .iter()
            .map(|slot| slot.as_ref().map(|entry| (&entry.key, &entry.value)))
    }
}

impl<K, V> Default for LinearProbeTable<K, V>
where
    K: AsRef<str> + Eq,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> fmt::Debug for LinearProbeTable<K, V>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Slot dump, one line per slot
impl<K, V> fmt::Display for LinearProbeTable<K, V>
where
    K: AsRef<str>,
    V: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (pos, slot) in self.slots.iter().enumerate() {
            match slot {
                None => writeln!(f, "{} -- EMPTY --", pos)?,
                Some(entry) => writeln!(f, "{} ~ {}: {}", pos, entry.key.as_ref(), entry.value)?,
            }
        }
        Ok(())
    }
}
