//! Mountain records on top of doublekey-core
//!
//! Provides:
//! - Mountain record type
//! - Manager grouping mountains by difficulty in a double-key table
//! - Organiser ranking mountains by length

pub mod error;
pub mod manager;
pub mod mountain;
pub mod organiser;

pub use error::RecordError;
pub use manager::MountainManager;
pub use mountain::Mountain;
pub use organiser::MountainOrganiser;
