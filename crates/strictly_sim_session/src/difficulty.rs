//! Match difficulty.

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};

/// Search depth the arbiter plays at, in `1..=8`.
///
/// Chosen once before a match starts and fixed for its duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Difficulty(u8);

impl Difficulty {
    /// Easiest setting.
    pub const MIN: Difficulty = Difficulty(1);
    /// Hardest setting.
    pub const MAX: Difficulty = Difficulty(8);

    /// Returns the numeric level.
    pub fn level(self) -> u8 {
        self.0
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Difficulty(3)
    }
}

impl TryFrom<u8> for Difficulty {
    type Error = ValidationError;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        if (Self::MIN.0..=Self::MAX.0).contains(&level) {
            Ok(Difficulty(level))
        } else {
            Err(ValidationError::DifficultyOutOfRange(level))
        }
    }
}

impl From<Difficulty> for u8 {
    fn from(difficulty: Difficulty) -> u8 {
        difficulty.0
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
