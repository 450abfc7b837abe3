//! Board construction and the deterministic tile category function.
//!
//! A board is generated once per game from a user-visible seed and is
//! immutable afterwards. Interior tiles get their category from a fixed
//! threshold map over a reproducible pseudo-random value, so the same seed
//! always yields the same board on every platform.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    BONUS_THRESHOLD, HER_REQUEST_THRESHOLD, HIS_REQUEST_THRESHOLD, MIN_BOARD_LENGTH,
    TRAP_THRESHOLD,
};

/// Behavioral tag of a board position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TileCategory {
    Start,
    Finish,
    /// Standard challenge square.
    Challenge,
    /// Move back after the challenge.
    Trap,
    /// Move forward after the challenge.
    Bonus,
    /// He asks something of her.
    HisRequest,
    /// She asks something of him.
    HerRequest,
}

impl TileCategory {
    /// Whether this category marks an end of the board.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Start | Self::Finish)
    }
}

/// A single square on the board. Immutable once generated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub id: usize,
    pub category: TileCategory,
    pub label: String,
}

/// Construction-time board violations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("board length {0} is too short; a board needs at least {MIN_BOARD_LENGTH} tiles")]
    TooShort(usize),
    #[error("tile {position} carries id {found}; tile ids must be contiguous from 0")]
    NonContiguousIds { position: usize, found: usize },
    #[error("tile {0} carries a terminal category inside the path")]
    MisplacedTerminal(usize),
}

/// Ordered, fixed-length sequence of tiles owned by one game session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    tiles: Vec<Tile>,
}

impl Board {
    /// Generate a board of `length` tiles from a seed.
    ///
    /// Tile 0 is always `Start`, tile `length - 1` always `Finish`; interior
    /// categories come from [`threshold_category`] over the seed stream.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::TooShort`] when `length` leaves no interior
    /// tile between start and finish.
    pub fn generate(length: usize, seed: u64) -> Result<Self, BoardError> {
        if length < MIN_BOARD_LENGTH {
            return Err(BoardError::TooShort(length));
        }

        let mut tiles = Vec::with_capacity(length);
        tiles.push(Tile {
            id: 0,
            category: TileCategory::Start,
            label: String::from("Start"),
        });
        for id in 1..length - 1 {
            tiles.push(Tile {
                id,
                category: threshold_category(category_roll(seed, id)),
                label: id.to_string(),
            });
        }
        tiles.push(Tile {
            id: length - 1,
            category: TileCategory::Finish,
            label: String::from("Finish"),
        });

        Ok(Self { tiles })
    }

    /// Build a board from pre-made tiles (scripted boards, fixtures).
    ///
    /// # Errors
    ///
    /// Returns an error when the tile sequence violates a board invariant:
    /// too short, non-contiguous ids, terminal categories off the ends.
    pub fn from_tiles(tiles: Vec<Tile>) -> Result<Self, BoardError> {
        if tiles.len() < MIN_BOARD_LENGTH {
            return Err(BoardError::TooShort(tiles.len()));
        }
        for (position, tile) in tiles.iter().enumerate() {
            if tile.id != position {
                return Err(BoardError::NonContiguousIds {
                    position,
                    found: tile.id,
                });
            }
            let interior = position != 0 && position != tiles.len() - 1;
            if interior && tile.category.is_terminal() {
                return Err(BoardError::MisplacedTerminal(position));
            }
        }
        Ok(Self { tiles })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Id of the finish tile.
    #[must_use]
    pub fn finish_id(&self) -> usize {
        self.tiles.len() - 1
    }

    #[must_use]
    pub fn tile(&self, id: usize) -> Option<&Tile> {
        self.tiles.get(id)
    }

    #[must_use]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }
}

/// Reproducible pseudo-random value in `[0, 1)` for an interior tile.
///
/// A pure function of `(seed, id)` so boards can be re-derived from a
/// shared seed without carrying RNG state.
#[allow(clippy::cast_precision_loss)]
fn category_roll(seed: u64, id: usize) -> f64 {
    ((seed as f64 + id as f64).sin() + 1.0) / 2.0
}

/// Fixed threshold map from a roll in `[0, 1)` to an interior category.
pub(crate) fn threshold_category(roll: f64) -> TileCategory {
    if roll < TRAP_THRESHOLD {
        TileCategory::Trap
    } else if roll < BONUS_THRESHOLD {
        TileCategory::Bonus
    } else if roll < HIS_REQUEST_THRESHOLD {
        TileCategory::HisRequest
    } else if roll < HER_REQUEST_THRESHOLD {
        TileCategory::HerRequest
    } else {
        TileCategory::Challenge
    }
}
