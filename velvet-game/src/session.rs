//! Session wrapper binding the turn-resolution pipeline to a mutable state.
//!
//! `GameSession` is the single writer of the game aggregate. A driver
//! issues exactly two commands, roll and dismiss, and reads snapshots
//! between transitions; everything in between is sequenced here.

use std::rc::Rc;

use rand::Rng;
use serde::Serialize;

use crate::GameError;
use crate::board::{Board, Tile, TileCategory};
use crate::constants::{
    BONUS_ADVANCE, BONUS_NOTICE, DEFAULT_BOARD_LENGTH, DIE_MAX, DIE_MIN, FINISH_TITLE,
    TRAP_NOTICE, TRAP_SETBACK,
};
use crate::data::ChallengeData;
use crate::pacer::{InstantPacer, TurnPacer};
use crate::provider::{ChallengeProvider, LocalChallenges};
use crate::rng::RngBundle;
use crate::state::{
    EventSeverity, GameState, ModalPayload, Player, Positions, TurnEventKind, TurnPhase, TurnTag,
    TurnTagSet,
};

/// What one resolved turn did, for drivers and tests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TurnSummary {
    pub player: Player,
    pub roll: u8,
    /// Landing square decided by the die (pre-adjustment).
    pub target: usize,
    /// Committed square after trap/bonus displacement.
    pub committed: usize,
    pub category: TileCategory,
    pub finished: bool,
}

/// Read-only view of the session for a presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct GameSnapshot {
    pub seed: u64,
    pub tiles: Vec<Tile>,
    pub positions: Positions,
    pub current_turn: Player,
    pub phase: TurnPhase,
    pub last_roll: Option<u8>,
    pub pending_modal: Option<ModalPayload>,
    pub winner: Option<Player>,
    pub status: String,
}

/// One game at the table: board, state, and collaborators.
pub struct GameSession {
    board: Board,
    state: GameState,
    provider: Box<dyn ChallengeProvider>,
    pacer: Box<dyn TurnPacer>,
    rng: Rc<RngBundle>,
}

impl GameSession {
    /// Start a game on the default board with the local challenge pool.
    ///
    /// # Errors
    ///
    /// Returns an error if the board cannot be constructed.
    pub fn new(seed: u64, data: ChallengeData) -> Result<Self, GameError> {
        Self::with_length(seed, DEFAULT_BOARD_LENGTH, data)
    }

    /// Start a game on a board of `length` tiles with the local pool.
    ///
    /// # Errors
    ///
    /// Returns an error if the board cannot be constructed.
    pub fn with_length(seed: u64, length: usize, data: ChallengeData) -> Result<Self, GameError> {
        let rng = Rc::new(RngBundle::from_user_seed(seed));
        let provider = Box::new(LocalChallenges::new(data, Rc::clone(&rng)));
        let board = Board::generate(length, seed)?;
        Ok(Self::assemble(seed, board, provider, rng))
    }

    /// Start a game with a caller-supplied provider (e.g. the remote one).
    ///
    /// # Errors
    ///
    /// Returns an error if the board cannot be constructed.
    pub fn with_provider(
        seed: u64,
        length: usize,
        provider: Box<dyn ChallengeProvider>,
    ) -> Result<Self, GameError> {
        let board = Board::generate(length, seed)?;
        let rng = Rc::new(RngBundle::from_user_seed(seed));
        Ok(Self::assemble(seed, board, provider, rng))
    }

    /// Assemble a session around a pre-built board (scripted boards).
    #[must_use]
    pub fn from_parts(seed: u64, board: Board, provider: Box<dyn ChallengeProvider>) -> Self {
        let rng = Rc::new(RngBundle::from_user_seed(seed));
        Self::assemble(seed, board, provider, rng)
    }

    fn assemble(
        seed: u64,
        board: Board,
        provider: Box<dyn ChallengeProvider>,
        rng: Rc<RngBundle>,
    ) -> Self {
        let first = Self::draw_opening_player(&rng);
        let state = GameState::new(seed, board.len(), first);
        Self {
            board,
            state,
            provider,
            pacer: Box::new(InstantPacer),
            rng,
        }
    }

    fn draw_opening_player(rng: &RngBundle) -> Player {
        if rng.opening().gen_bool(0.5) {
            Player::Man
        } else {
            Player::Woman
        }
    }

    /// Replace the pacer (drivers that animate transitions).
    pub fn set_pacer(&mut self, pacer: Box<dyn TurnPacer>) {
        self.pacer = pacer;
    }

    /// The shared RNG bundle (providers hold the same handle).
    #[must_use]
    pub fn rng(&self) -> Rc<RngBundle> {
        Rc::clone(&self.rng)
    }

    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// Borrow the underlying immutable game state.
    #[must_use]
    pub const fn state(&self) -> &GameState {
        &self.state
    }

    /// Borrow the underlying mutable game state.
    pub const fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    /// Consume the session, returning the underlying game state.
    #[must_use]
    pub fn into_state(self) -> GameState {
        self.state
    }

    /// Read-only snapshot for rendering.
    #[must_use]
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            seed: self.state.seed,
            tiles: self.board.tiles().to_vec(),
            positions: self.state.positions,
            current_turn: self.state.current_turn,
            phase: self.state.phase,
            last_roll: self.state.last_roll,
            pending_modal: self.state.pending_modal.clone(),
            winner: self.state.winner,
            status: self.state.status.clone(),
        }
    }

    /// Roll the die and resolve the turn.
    ///
    /// Returns `None` without touching state unless the phase is `Idle`;
    /// this guard is the sole protection against double-processing a turn.
    pub async fn roll_and_advance(&mut self) -> Option<TurnSummary> {
        if self.state.phase != TurnPhase::Idle {
            return None;
        }
        let roll = self.rng.dice().gen_range(DIE_MIN..=DIE_MAX);
        self.resolve_turn(roll).await
    }

    /// Resolve a turn with a predetermined die roll (replays, tests).
    ///
    /// Same `Idle` guard as [`Self::roll_and_advance`]; the roll is clamped
    /// into the die range.
    pub async fn resolve_turn(&mut self, roll: u8) -> Option<TurnSummary> {
        if self.state.phase != TurnPhase::Idle {
            return None;
        }
        let roll = roll.clamp(DIE_MIN, DIE_MAX);
        let player = self.state.current_turn;
        self.state.turn += 1;
        self.state.event_seq = 0;

        self.state.phase = TurnPhase::Rolling;
        self.state.status = String::from("Spinning the dice of passion...");
        self.pacer.roll_delay().await;

        self.state.last_roll = Some(roll);
        self.state.push_event(
            TurnEventKind::DiceRolled,
            EventSeverity::Info,
            TurnTagSet::new(),
            serde_json::json!({ "player": player, "roll": roll }),
        );

        let start = self.state.positions.get(player);
        let finish = self.board.finish_id();
        let target = (start + roll as usize).min(finish);

        self.state.phase = TurnPhase::Moving;
        self.state.status = String::from("Moving along the trail...");
        // Intermediate positions are animation frames for the display; the
        // authoritative landing square is `target`.
        for step in start + 1..=target {
            self.state.positions.set(player, step);
            self.pacer.step_delay().await;
        }

        if target == finish {
            return Some(self.finish_game(player, roll, target));
        }

        let category = self
            .board
            .tile(target)
            .map_or(TileCategory::Challenge, |tile| tile.category);
        let (committed, notice) = match category {
            TileCategory::Trap => (target.saturating_sub(TRAP_SETBACK), Some(TRAP_NOTICE)),
            TileCategory::Bonus => ((target + BONUS_ADVANCE).min(finish), Some(BONUS_NOTICE)),
            _ => (target, None),
        };

        self.pacer.reveal_delay().await;
        self.state.phase = TurnPhase::AwaitingChallenge;
        self.state.status = String::from("Drawing a challenge...");
        let challenge = self.provider.provide(player, target, category).await;

        match category {
            TileCategory::Trap => self.state.push_event(
                TurnEventKind::TrapTriggered,
                EventSeverity::Warning,
                tag_set("trap"),
                serde_json::json!({ "target": target, "committed": committed }),
            ),
            TileCategory::Bonus => self.state.push_event(
                TurnEventKind::BonusTriggered,
                EventSeverity::Info,
                tag_set("bonus"),
                serde_json::json!({ "target": target, "committed": committed }),
            ),
            _ => {}
        }

        self.state.positions.set(player, committed);
        let body = match notice {
            Some(prefix) => format!("{prefix}{}", challenge.body),
            None => challenge.body,
        };
        self.state.pending_modal = Some(ModalPayload {
            title: challenge.title,
            body,
            category,
        });
        self.state.phase = TurnPhase::ModalOpen;
        self.state.status = format!("Challenge for the {}", player.label());
        self.state.push_event(
            TurnEventKind::ChallengePresented,
            EventSeverity::Info,
            TurnTagSet::new(),
            serde_json::json!({ "player": player, "position": target, "category": category }),
        );

        Some(TurnSummary {
            player,
            roll,
            target,
            committed,
            category,
            finished: false,
        })
    }

    fn finish_game(&mut self, player: Player, roll: u8, target: usize) -> TurnSummary {
        self.state.winner = Some(player);
        self.state.phase = TurnPhase::GameOver;
        self.state.pending_modal = Some(ModalPayload {
            title: String::from(FINISH_TITLE),
            body: format!(
                "The {} reached the end! The night is only beginning...",
                player.label()
            ),
            category: TileCategory::Finish,
        });
        self.state.status = format!("The {} wins!", player.label());
        self.state.push_event(
            TurnEventKind::FinishReached,
            EventSeverity::Info,
            tag_set("finish"),
            serde_json::json!({ "player": player, "position": target }),
        );
        TurnSummary {
            player,
            roll,
            target,
            committed: target,
            category: TileCategory::Finish,
            finished: true,
        }
    }

    /// Dismiss the open modal.
    ///
    /// In `ModalOpen` this hands the turn to the other player; in
    /// `GameOver` it only clears the terminal modal. Any other phase is a
    /// silent no-op. Returns whether the command was accepted.
    pub fn dismiss_modal(&mut self) -> bool {
        match self.state.phase {
            TurnPhase::ModalOpen => {
                self.state.pending_modal = None;
                let next = self.state.current_turn.other();
                self.state.current_turn = next;
                self.state.phase = TurnPhase::Idle;
                self.state.status = format!("{}'s turn", next.label());
                self.state.push_event(
                    TurnEventKind::ModalDismissed,
                    EventSeverity::Info,
                    TurnTagSet::new(),
                    serde_json::Value::Null,
                );
                self.state.push_event(
                    TurnEventKind::TurnPassed,
                    EventSeverity::Info,
                    TurnTagSet::new(),
                    serde_json::json!({ "next": next }),
                );
                true
            }
            TurnPhase::GameOver => {
                if self.state.pending_modal.take().is_some() {
                    self.state.status = String::from("Game over");
                    self.state.push_event(
                        TurnEventKind::ModalDismissed,
                        EventSeverity::Info,
                        tag_set("finish"),
                        serde_json::Value::Null,
                    );
                }
                true
            }
            _ => false,
        }
    }

    /// Replace board and state wholesale for a fresh game.
    ///
    /// The shared RNG bundle is reseeded in place so providers holding a
    /// handle follow the new seed.
    ///
    /// # Errors
    ///
    /// Returns an error if the board cannot be regenerated.
    pub fn restart(&mut self, seed: u64) -> Result<(), GameError> {
        self.board = Board::generate(self.board.len(), seed)?;
        self.rng.reseed(seed);
        let first = Self::draw_opening_player(&self.rng);
        self.state = GameState::new(seed, self.board.len(), first);
        Ok(())
    }
}

fn tag_set(tag: &str) -> TurnTagSet {
    let mut tags = TurnTagSet::new();
    tags.push(TurnTag::new(tag));
    tags
}
