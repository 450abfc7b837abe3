//! Deterministic headless game simulation and invariant auditing.

use anyhow::{Context, Result, bail, ensure};
use serde::Serialize;
use sha2::{Digest, Sha256};

use velvet_game::constants::{DEFAULT_BOARD_LENGTH, DIE_MAX, DIE_MIN};
use velvet_game::{ChallengeData, GameSession, Player, TileCategory, TurnPhase, TurnSummary};

/// Configuration for a simulation session.
#[derive(Debug, Clone, Copy)]
pub struct SimulationConfig {
    pub seed: u64,
    pub board_length: usize,
    pub max_turns: u32,
}

impl SimulationConfig {
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self {
            seed,
            board_length: DEFAULT_BOARD_LENGTH,
            max_turns: 200,
        }
    }

    #[must_use]
    pub const fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns;
        self
    }
}

/// Snapshot of one resolved turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TurnRecord {
    pub turn: u32,
    pub player: Player,
    pub roll: u8,
    pub target: usize,
    pub committed: usize,
    pub category: TileCategory,
}

/// Full record of one simulated game.
#[derive(Debug, Clone, Serialize)]
pub struct GameTranscript {
    pub seed: u64,
    pub turns: Vec<TurnRecord>,
    pub winner: Option<Player>,
}

impl GameTranscript {
    /// SHA-256 digest of the serialized transcript, hex-encoded.
    #[must_use]
    pub fn digest(&self) -> String {
        let json = serde_json::to_vec(self).unwrap_or_default();
        Sha256::digest(&json)
            .iter()
            .map(|byte| format!("{byte:02x}"))
            .collect()
    }
}

/// Play one full game, auditing the state machine after every command.
pub async fn play_game(config: SimulationConfig) -> Result<GameTranscript> {
    let mut session =
        GameSession::with_length(config.seed, config.board_length, ChallengeData::builtin())
            .context("constructing session")?;
    let mut turns = Vec::new();

    for turn in 1..=config.max_turns {
        ensure!(
            session.state().phase == TurnPhase::Idle,
            "turn {turn} started outside idle"
        );
        let summary = session
            .roll_and_advance()
            .await
            .context("roll ignored while idle")?;
        audit_turn(&session, &summary)?;
        log::debug!(
            "turn {turn}: {} rolled {} -> tile {} (committed {}, {:?})",
            summary.player.label(),
            summary.roll,
            summary.target,
            summary.committed,
            summary.category
        );
        turns.push(TurnRecord {
            turn,
            player: summary.player,
            roll: summary.roll,
            target: summary.target,
            committed: summary.committed,
            category: summary.category,
        });

        if summary.finished {
            ensure!(
                session.state().phase == TurnPhase::GameOver,
                "finish must settle in game over"
            );
            let winner = session
                .state()
                .winner
                .context("winner must be set at game over")?;
            ensure!(winner == summary.player, "winner is the finishing player");
            session.dismiss_modal();
            ensure!(
                session.state().phase == TurnPhase::GameOver,
                "dismissing the terminal modal must not reopen play"
            );
            return Ok(GameTranscript {
                seed: config.seed,
                turns,
                winner: Some(winner),
            });
        }

        ensure!(
            session.state().phase == TurnPhase::ModalOpen,
            "resolution must end with the modal open"
        );
        ensure!(session.dismiss_modal(), "dismiss accepted while modal open");
        ensure!(
            session.state().current_turn == summary.player.other(),
            "turn must pass to the other player"
        );
    }

    bail!("game did not terminate within {} turns", config.max_turns)
}

fn audit_turn(session: &GameSession, summary: &TurnSummary) -> Result<()> {
    let state = session.state();
    let len = session.board().len();
    ensure!(
        (DIE_MIN..=DIE_MAX).contains(&summary.roll),
        "roll {} outside the die range",
        summary.roll
    );
    ensure!(summary.target < len, "target {} out of bounds", summary.target);
    ensure!(
        summary.committed < len,
        "committed {} out of bounds",
        summary.committed
    );
    for player in [Player::Man, Player::Woman] {
        let position = state.positions.get(player);
        ensure!(position < len, "{} token out of bounds: {position}", player.label());
    }
    ensure!(
        state.winner.is_some() == (state.phase == TurnPhase::GameOver),
        "winner must be set exactly at game over"
    );
    ensure!(
        state.pending_modal.is_some(),
        "every resolution emits a modal payload"
    );
    ensure!(
        state.last_roll == Some(summary.roll),
        "last roll must match the summary"
    );
    Ok(())
}
