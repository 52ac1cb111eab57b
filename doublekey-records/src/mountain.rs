//! Mountain record
//!
//! Plain value stored by the manager and ranked by the organiser

use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Mountain {
    pub name: String,
    pub difficulty_level: u32,
    pub length: u32,
}

impl Mountain {
    /// Create new mountain record
    pub fn new(name: impl Into<String>, difficulty_level: u32, length: u32) -> Self {
        Mountain {
            name: name.into(),
            difficulty_level,
            length,
        }
    }

    /// First table key: the difficulty rendered as a string
    pub fn difficulty_key(&self) -> String {
        self.difficulty_level.to_string()
    }
}

impl fmt::Display for Mountain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (difficulty {}, length {})",
            self.name, self.difficulty_level, self.length
        )
    }
}
