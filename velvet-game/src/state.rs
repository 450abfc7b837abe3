//! Mutable game aggregate and the structured turn ledger.
//!
//! `GameState` is the single mutable aggregate of a running game. It is
//! owned by the session and mutated only by the turn-resolution pipeline;
//! everything else reads snapshots between transitions.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::board::TileCategory;

/// One of the two players at the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Player {
    Man,
    Woman,
}

impl Player {
    /// The opposing player.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::Man => Self::Woman,
            Self::Woman => Self::Man,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Man => "Man",
            Self::Woman => "Woman",
        }
    }
}

/// Phase of the turn-resolution pipeline.
///
/// Exactly one of `Idle` and `GameOver` holds whenever no turn is in
/// flight; the remaining phases only exist inside a `resolve_turn` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnPhase {
    Idle,
    Rolling,
    Moving,
    AwaitingChallenge,
    ModalOpen,
    GameOver,
}

impl TurnPhase {
    /// Whether the state machine is at rest (no turn in flight).
    #[must_use]
    pub const fn is_settled(self) -> bool {
        matches!(self, Self::Idle | Self::GameOver)
    }
}

/// Token positions, one per player, always within board bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Positions {
    man: usize,
    woman: usize,
}

impl Positions {
    #[must_use]
    pub const fn get(self, player: Player) -> usize {
        match player {
            Player::Man => self.man,
            Player::Woman => self.woman,
        }
    }

    pub const fn set(&mut self, player: Player, position: usize) {
        match player {
            Player::Man => self.man = position,
            Player::Woman => self.woman = position,
        }
    }
}

/// Payload for the modal the presentation layer shows after a landing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModalPayload {
    pub title: String,
    pub body: String,
    pub category: TileCategory,
}

/// Maximum tag capacity stored inline without additional allocations.
pub type TurnTagSet = SmallVec<[TurnTag; 4]>;

/// Tag describing why a turn resolved the way it did.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TurnTag(pub String);

impl TurnTag {
    #[must_use]
    pub fn new(value: &str) -> Self {
        Self(value.trim().to_string())
    }
}

/// Stable, deterministic identifier for a single ledger event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId {
    /// One-based turn counter when the event occurred.
    pub turn: u32,
    /// Per-turn sequence number (0-based) within the emitted event stream.
    pub seq: u16,
}

impl EventId {
    #[must_use]
    pub const fn new(turn: u32, seq: u16) -> Self {
        Self { turn, seq }
    }
}

/// Mechanical event kind emitted by the turn pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnEventKind {
    DiceRolled,
    FinishReached,
    TrapTriggered,
    BonusTriggered,
    ChallengePresented,
    ModalDismissed,
    TurnPassed,
}

/// Severity tier for a ledger event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventSeverity {
    Info,
    Warning,
    Critical,
}

/// Structured event appended to the turn ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnEvent {
    pub id: EventId,
    pub kind: TurnEventKind,
    pub severity: EventSeverity,
    /// Stable tags describing the event (e.g., `trap`, `bonus`, `finish`).
    #[serde(default)]
    pub tags: TurnTagSet,
    /// Structured payload for debugging and downstream rendering.
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub payload: serde_json::Value,
}

/// The single mutable aggregate for one running game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub seed: u64,
    pub board_length: usize,
    pub positions: Positions,
    pub current_turn: Player,
    pub phase: TurnPhase,
    #[serde(default)]
    pub last_roll: Option<u8>,
    #[serde(default)]
    pub pending_modal: Option<ModalPayload>,
    #[serde(default)]
    pub winner: Option<Player>,
    /// One-line human-readable status maintained on every transition.
    #[serde(default)]
    pub status: String,
    /// One-based count of resolved or in-flight turns.
    #[serde(default)]
    pub turn: u32,
    #[serde(default)]
    pub event_seq: u16,
    /// Append-only ledger of everything the pipeline did.
    #[serde(default)]
    pub turn_log: Vec<TurnEvent>,
}

impl GameState {
    /// Fresh state with both tokens on the start tile.
    #[must_use]
    pub fn new(seed: u64, board_length: usize, first: Player) -> Self {
        Self {
            seed,
            board_length,
            positions: Positions::default(),
            current_turn: first,
            phase: TurnPhase::Idle,
            last_roll: None,
            pending_modal: None,
            winner: None,
            status: format!("Luck has decided! The {} begins. Set the mood.", first.label()),
            turn: 0,
            event_seq: 0,
            turn_log: Vec::new(),
        }
    }

    /// Append an event to the ledger, assigning the next per-turn sequence.
    pub fn push_event(
        &mut self,
        kind: TurnEventKind,
        severity: EventSeverity,
        tags: TurnTagSet,
        payload: serde_json::Value,
    ) {
        let id = EventId::new(self.turn, self.event_seq);
        self.event_seq = self.event_seq.saturating_add(1);
        self.turn_log.push(TurnEvent {
            id,
            kind,
            severity,
            tags,
            payload,
        });
    }

    /// Whether the aggregate satisfies its settled-state invariant.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.phase.is_settled()
    }
}
