//! Mountain manager backed by a double-key table
//!
//! Records are keyed by (difficulty as a string, name), so every mountain of
//! one difficulty shares an inner table.

use crate::error::RecordError;
use crate::mountain::Mountain;
use doublekey_core::{DoubleKeyStats, DoubleKeyTable};
use log::debug;

/// Groups mountains by difficulty
pub struct MountainManager {
    /// (difficulty, name) -> Mountain
    pub(crate) table: DoubleKeyTable<String, String, Mountain>,
}

impl MountainManager {
    /// Create new, empty manager
    pub fn new() -> Self {
        MountainManager {
            table: DoubleKeyTable::new(),
        }
    }

    /// Add a mountain, replacing any with the same difficulty and name
    pub fn add_mountain(&mut self, mountain: Mountain) -> Result<(), RecordError> {
        debug!("adding {}", mountain);
        self.table
            .set(mountain.difficulty_key(), mountain.name.clone(), mountain)?;
        Ok(())
    }

    /// Remove a mountain, returning the stored record
    pub fn remove_mountain(&mut self, mountain: &Mountain) -> Result<Mountain, RecordError> {
        debug!("removing {}", mountain);
        Ok(self.table.delete(&mountain.difficulty_key(), &mountain.name)?)
    }

    /// Replace `old` with `new`
    ///
    /// Fails without changes if `old` is not stored.
    pub fn edit_mountain(&mut self, old: &Mountain, new: Mountain) -> Result<(), RecordError> {
        let removed = self.remove_mountain(old)?;
        if let Err(err) = self.add_mountain(new) {
            // The slot just freed always takes the old record back
            self.add_mountain(removed)?;
            return Err(err);
        }
        Ok(())
    }

    /// Mountains of one difficulty, sorted by name
    pub fn mountains_with_difficulty(&self, difficulty: u32) -> Vec<Mountain> {
        self.table
            .values_for(&difficulty.to_string())
            .map(|mountains| sorted_by_name(mountains.into_iter().cloned().collect()))
            .unwrap_or_default()
    }

    /// Every mountain, grouped by ascending difficulty, each group sorted by name
    pub fn group_by_difficulty(&self) -> Vec<Vec<Mountain>> {
        let mut groups: Vec<Vec<Mountain>> = self
            .table
            .iter_keys()
            .filter_map(|difficulty| self.table.values_for(difficulty).ok())
            .map(|mountains| sorted_by_name(mountains.into_iter().cloned().collect()))
            .collect();

        groups.sort_by_key(|group| group.first().map(|m| m.difficulty_level));
        groups
    }

    /// Difficulties with at least one mountain, ascending
    pub fn difficulties(&self) -> Vec<u32> {
        let mut difficulties: Vec<u32> = self
            .table
            .iter_keys()
            .filter_map(|key| key.parse().ok())
            .collect();
        difficulties.sort_unstable();
        difficulties
    }

    pub fn contains(&self, mountain: &Mountain) -> bool {
        self.table
            .contains(&mountain.difficulty_key(), &mountain.name)
    }

    /// Number of stored mountains
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Layout statistics of the backing table
    pub fn stats(&self) -> DoubleKeyStats {
        self.table.stats()
    }
}

impl Default for MountainManager {
    fn default() -> Self {
        Self::new()
    }
}

fn sorted_by_name(mut mountains: Vec<Mountain>) -> Vec<Mountain> {
    mountains.sort_by(|a, b| a.name.cmp(&b.name));
    mountains
}
