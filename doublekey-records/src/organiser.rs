//! Mountain organiser
//!
//! Keeps every added mountain sorted by (length, name) so a rank lookup is a
//! binary search.

use crate::error::RecordError;
use crate::mountain::Mountain;
use log::debug;

/// Ranks mountains by length, ties broken by name
#[derive(Clone, Debug, Default)]
pub struct MountainOrganiser {
    /// Sorted by `rank_key`
    pub(crate) mountains: Vec<Mountain>,
}

fn rank_key(mountain: &Mountain) -> (u32, &str) {
    (mountain.length, mountain.name.as_str())
}

impl MountainOrganiser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add mountains, keeping the ranking sorted
    pub fn add_mountains<I>(&mut self, mountains: I)
    where
        I: IntoIterator<Item = Mountain>,
    {
        for mountain in mountains {
            let pos = self.rank_of(&mountain);
            debug!("ranking {} at {}", mountain, pos);
            self.mountains.insert(pos, mountain);
        }
    }

    /// 0-based rank of `mountain`: how many tracked mountains are shorter,
    /// or equally long with a smaller name
    pub fn cur_position(&self, mountain: &Mountain) -> Result<usize, RecordError> {
        let pos = self.rank_of(mountain);
        let key = rank_key(mountain);

        let tracked = self.mountains[pos..]
            .iter()
            .take_while(|m| rank_key(m) == key)
            .any(|m| m == mountain);

        if tracked {
            Ok(pos)
        } else {
            Err(RecordError::UnknownMountain(mountain.name.clone()))
        }
    }

    fn rank_of(&self, mountain: &Mountain) -> usize {
        let key = rank_key(mountain);
        self.mountains.partition_point(|m| rank_key(m) < key)
    }

    pub fn len(&self) -> usize {
        self.mountains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mountains.is_empty()
    }

    /// Mountains in rank order
    pub fn iter(&self) -> impl Iterator<Item = &Mountain> {
        self.mountains.iter()
    }
}
