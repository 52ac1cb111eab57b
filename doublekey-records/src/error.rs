//! Error type for record management

use doublekey_core::TableError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    /// Failure inside the backing table
    #[error(transparent)]
    Table(#[from] TableError),

    /// Ranking asked for a mountain that was never added
    #[error("mountain not tracked: {0}")]
    UnknownMountain(String),
}

impl RecordError {
    pub fn is_not_found(&self) -> bool {
        match self {
            RecordError::Table(err) => err.is_not_found(),
            RecordError::UnknownMountain(_) => true,
        }
    }
}
