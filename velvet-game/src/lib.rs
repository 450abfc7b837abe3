//! Velvet Trail Game Engine
//!
//! Platform-agnostic core game logic for the Velvet Trail couples board
//! game. This crate provides all game mechanics without UI or
//! platform-specific dependencies: board generation, the turn-resolution
//! pipeline, and the pluggable challenge providers.

pub mod board;
pub mod challenge;
pub mod constants;
pub mod data;
pub mod pacer;
pub mod provider;
pub mod rng;
pub mod seed;
pub mod session;
pub mod state;

// Re-export commonly used types
pub use board::{Board, BoardError, Tile, TileCategory};
pub use challenge::{ChallengeRequest, ChallengeResult, pick_challenge};
pub use data::{ChallengeCategory, ChallengeData, ChallengeEntry, Eligibility};
pub use pacer::{InstantPacer, TurnPacer};
pub use provider::{ChallengeProvider, LocalChallenges, RemoteChallenges};
pub use rng::{CountingRng, RngBundle};
pub use seed::{decode_to_seed, encode_friendly, generate_code_from_entropy};
pub use session::{GameSession, GameSnapshot, TurnSummary};
pub use state::{
    EventId, EventSeverity, GameState, ModalPayload, Player, Positions, TurnEvent, TurnEventKind,
    TurnPhase, TurnTag, TurnTagSet,
};

/// Core error type for the Velvet Trail engine.
///
/// Only construction-time violations surface here; runtime provider
/// failures are absorbed behind the provider contract.
#[derive(thiserror::Error, Debug)]
pub enum GameError {
    /// Board construction violated an invariant.
    #[error(transparent)]
    Board(#[from] BoardError),

    /// Challenge corpus could not be parsed.
    #[error("challenge data error: {0}")]
    Data(#[from] serde_json::Error),
}

/// Result type used throughout the engine for construction paths.
pub type GameResult<T> = Result<T, GameError>;
