//! Capacity sequences
//!
//! A table starts at the first capacity of its sequence and only ever
//! advances to the next one. Sequences are shared between every inner
//! table of a `DoubleKeyTable`, hence the `Arc`.

use crate::error::{Result, TableError};
use std::ops::Index;
use std::sync::Arc;

/// Default capacity sequence, enough for well over a million entries
pub const DEFAULT_SIZES: [usize; 19] = [
    5, 13, 29, 53, 97, 193, 389, 769, 1543, 3079, 6151, 12289, 24593, 49157, 98317, 196613,
    393241, 786433, 1572869,
];

/// Validated, strictly ascending list of table capacities
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableSizes {
    sizes: Arc<[usize]>,
}

impl TableSizes {
    /// Validate a custom capacity sequence
    ///
    /// Every capacity must be at least 2 (the hash reduces its multiplier
    /// modulo `capacity - 1`) and the list must be strictly ascending.
    pub fn new(sizes: Vec<usize>) -> Result<Self> {
        if sizes.is_empty() {
            return Err(TableError::InvalidSizes("sequence is empty".to_string()));
        }
        if let Some(small) = sizes.iter().find(|&&s| s < 2) {
            return Err(TableError::InvalidSizes(format!(
                "capacity {} is below the minimum of 2",
                small
            )));
        }
        if let Some(pair) = sizes.windows(2).find(|w| w[0] >= w[1]) {
            return Err(TableError::InvalidSizes(format!(
                "capacities must be strictly ascending, found {} then {}",
                pair[0], pair[1]
            )));
        }

        Ok(TableSizes {
            sizes: sizes.into(),
        })
    }

    /// Number of capacities in the sequence
    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    /// Always false for a validated sequence
    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    /// Capacity at `index`, if the sequence reaches that far
    pub fn get(&self, index: usize) -> Option<usize> {
        self.sizes.get(index).copied()
    }

    /// Largest capacity in the sequence
    pub fn max_capacity(&self) -> usize {
        self.sizes[self.sizes.len() - 1]
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.sizes
    }
}

impl Default for TableSizes {
    fn default() -> Self {
        TableSizes {
            sizes: Arc::from(&DEFAULT_SIZES[..]),
        }
    }
}

impl Index<usize> for TableSizes {
    type Output = usize;

    fn index(&self, index: usize) -> &usize {
        &self.sizes[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sequence() {
        let sizes = TableSizes::default();
        assert_eq!(sizes.len(), 19);
        assert_eq!(sizes[0], 5);
        assert_eq!(sizes.get(1), Some(13));
        assert_eq!(sizes.max_capacity(), 1572869);
        assert_eq!(sizes.get(19), None);
    }

    #[test]
    fn test_custom_sequence() {
        let sizes = TableSizes::new(vec![2, 3, 7]).unwrap();
        assert_eq!(sizes.as_slice(), &[2, 3, 7]);
    }

    #[test]
    fn test_rejects_bad_sequences() {
        assert!(matches!(
            TableSizes::new(vec![]),
            Err(TableError::InvalidSizes(_))
        ));
        assert!(matches!(
            TableSizes::new(vec![1, 5]),
            Err(TableError::InvalidSizes(_))
        ));
        assert!(matches!(
            TableSizes::new(vec![5, 13, 13]),
            Err(TableError::InvalidSizes(_))
        ));
        assert!(matches!(
            TableSizes::new(vec![13, 5]),
            Err(TableError::InvalidSizes(_))
        ));
    }
}
