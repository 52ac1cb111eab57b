//! Error type shared by every table operation

use std::fmt;
use thiserror::Error;

/// Which half of a compound key failed to resolve
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyLevel {
    /// The first key (outer table)
    Outer,
    /// The second key (inner table)
    Inner,
}

impl fmt::Display for KeyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyLevel::Outer => write!(f, "outer"),
            KeyLevel::Inner => write!(f, "inner"),
        }
    }
}

/// Errors surfaced by `LinearProbeTable` and `DoubleKeyTable`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    /// Lookup or delete on a key that is not present
    #[error("{level} key not found: {key:?}")]
    NotFound { key: String, level: KeyLevel },

    /// No free slot, and no larger capacity left in the sequence
    #[error("table capacity exhausted at {capacity} slots")]
    CapacityExhausted { capacity: usize },

    /// Rejected capacity sequence
    #[error("invalid table sizes: {0}")]
    InvalidSizes(String),
}

impl TableError {
    pub(crate) fn not_found(key: &str, level: KeyLevel) -> Self {
        TableError::NotFound {
            key: key.to_string(),
            level,
        }
    }

    /// True for `NotFound`
    pub fn is_not_found(&self) -> bool {
        matches!(self, TableError::NotFound { .. })
    }

    /// True for `CapacityExhausted`
    pub fn is_capacity_exhausted(&self) -> bool {
        matches!(self, TableError::CapacityExhausted { .. })
    }
}

pub type Result<T> = std::result::Result<T, TableError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = TableError::not_found("May", KeyLevel::Outer);
        assert_eq!(err.to_string(), "outer key not found: \"May\"");

        let err = TableError::CapacityExhausted { capacity: 13 };
        assert_eq!(err.to_string(), "table capacity exhausted at 13 slots");
    }

    #[test]
    fn test_kinds_are_distinct() {
        let missing = TableError::not_found("Ben", KeyLevel::Inner);
        let full = TableError::CapacityExhausted { capacity: 5 };

        assert!(missing.is_not_found());
        assert!(!missing.is_capacity_exhausted());
        assert!(full.is_capacity_exhausted());
        assert!(!full.is_not_found());
    }
}
