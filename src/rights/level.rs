//! Security levels of the permission catalog.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Ordered security level of a right
///
/// Serialized as its numeric value, the encoding the level catalog exposes.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Level {
    NotSet = 0,
    Permission = 10,
    Protected = 30,
    Secure = 50,
    Danger = 80,
    Critical = 100,
}

/// Every level, ascending
pub const ALL_LEVELS: [Level; 6] = [
    Level::NotSet,
    Level::Permission,
    Level::Protected,
    Level::Secure,
    Level::Danger,
    Level::Critical,
];

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::NotSet => "NOTSET",
            Level::Permission => "PERMISSION",
            Level::Protected => "PROTECTED",
            Level::Secure => "SECURE",
            Level::Danger => "DANGER",
            Level::Critical => "CRITICAL",
        }
    }

    /// Looks a level up by its catalog name.
    pub fn from_name(name: &str) -> Option<Self> {
        ALL_LEVELS.iter().copied().find(|level| level.as_str() == name)
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> u8 {
        level as u8
    }
}

impl TryFrom<u8> for Level {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        ALL_LEVELS
            .iter()
            .copied()
            .find(|level| *level as u8 == value)
            .ok_or_else(|| format!("unknown security level {value}"))
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
