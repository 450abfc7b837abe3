//! Challenge corpus types and loading.

use serde::{Deserialize, Serialize};

use crate::board::TileCategory;
use crate::state::Player;

/// Corpus-side category a tile landing maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChallengeCategory {
    Trap,
    Bonus,
    Neutral,
}

impl From<TileCategory> for ChallengeCategory {
    /// Anything that is not a trap or a bonus draws from the neutral pool.
    fn from(tile: TileCategory) -> Self {
        match tile {
            TileCategory::Trap => Self::Trap,
            TileCategory::Bonus => Self::Bonus,
            _ => Self::Neutral,
        }
    }
}

/// Which player an entry may be dealt to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Eligibility {
    Man,
    Woman,
    Both,
}

impl Eligibility {
    #[must_use]
    pub const fn allows(self, player: Player) -> bool {
        match self {
            Self::Both => true,
            Self::Man => matches!(player, Player::Man),
            Self::Woman => matches!(player, Player::Woman),
        }
    }
}

/// A single corpus entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeEntry {
    #[serde(rename = "type")]
    pub category: ChallengeCategory,
    pub player: Eligibility,
    /// Short title shown as the modal headline.
    pub challenge: String,
    /// Detailed description of what to do.
    pub instruction: String,
    #[serde(default = "default_weight")]
    pub weight: u32,
}

const fn default_weight() -> u32 {
    1
}

/// Container for the full challenge corpus, loaded once and read-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct ChallengeData {
    pub entries: Vec<ChallengeEntry>,
}

impl ChallengeData {
    /// Create an empty corpus (useful for tests).
    #[must_use]
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Load the corpus from a JSON array of entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into valid entries.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Create a corpus from pre-parsed entries.
    #[must_use]
    pub fn from_entries(entries: Vec<ChallengeEntry>) -> Self {
        Self { entries }
    }

    /// The corpus bundled with the engine.
    ///
    /// Malformed bundled data degrades to an empty corpus; selection then
    /// falls through to the fixed fallback pair rather than failing.
    #[must_use]
    pub fn builtin() -> Self {
        Self::from_json(include_str!("../assets/challenges.json")).unwrap_or_else(|_| Self::empty())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
