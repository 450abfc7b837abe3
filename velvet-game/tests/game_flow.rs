//! End-to-end turn-resolution scenarios driven through `GameSession`.

use std::cell::RefCell;
use std::rc::Rc;

use async_trait::async_trait;
use velvet_game::constants::{BONUS_NOTICE, TRAP_NOTICE};
use velvet_game::{
    Board, ChallengeData, ChallengeProvider, ChallengeResult, GameSession, Player, Tile,
    TileCategory, TurnPhase,
};

/// Board with every interior tile a plain challenge except the listed ones.
fn scripted_board(length: usize, specials: &[(usize, TileCategory)]) -> Board {
    let mut tiles: Vec<Tile> = (0..length)
        .map(|id| Tile {
            id,
            category: TileCategory::Challenge,
            label: id.to_string(),
        })
        .collect();
    tiles[0].category = TileCategory::Start;
    tiles[0].label = String::from("Start");
    tiles[length - 1].category = TileCategory::Finish;
    tiles[length - 1].label = String::from("Finish");
    for (id, category) in specials {
        tiles[*id].category = *category;
    }
    Board::from_tiles(tiles).expect("scripted board is valid")
}

/// Provider double that records every call and returns a fixed pair.
#[derive(Clone, Default)]
struct RecordingProvider {
    calls: Rc<RefCell<Vec<(Player, usize, TileCategory)>>>,
}

#[async_trait(?Send)]
impl ChallengeProvider for RecordingProvider {
    async fn provide(
        &self,
        player: Player,
        position: usize,
        category: TileCategory,
    ) -> ChallengeResult {
        self.calls.borrow_mut().push((player, position, category));
        ChallengeResult {
            title: String::from("Scripted"),
            body: String::from("Do the scripted thing."),
        }
    }
}

fn scripted_session(
    specials: &[(usize, TileCategory)],
    first: Player,
) -> (GameSession, RecordingProvider) {
    let provider = RecordingProvider::default();
    let board = scripted_board(25, specials);
    let mut session = GameSession::from_parts(789, board, Box::new(provider.clone()));
    session.state_mut().current_turn = first;
    (session, provider)
}

#[tokio::test]
async fn trap_landing_commits_setback_and_prefixes_notice() {
    let (mut session, provider) = scripted_session(&[(4, TileCategory::Trap)], Player::Man);

    let summary = session.resolve_turn(4).await.expect("idle turn resolves");
    assert_eq!(summary.roll, 4);
    assert_eq!(summary.target, 4);
    assert_eq!(summary.committed, 2);
    assert_eq!(summary.category, TileCategory::Trap);
    assert!(!summary.finished);

    let state = session.state();
    assert_eq!(state.positions.get(Player::Man), 2);
    assert_eq!(state.phase, TurnPhase::ModalOpen);
    assert_eq!(state.last_roll, Some(4));
    let modal = state.pending_modal.as_ref().expect("modal pending");
    assert!(modal.body.starts_with(TRAP_NOTICE), "body: {}", modal.body);
    assert_eq!(modal.category, TileCategory::Trap);

    // The provider sees the pre-adjustment landing square.
    assert_eq!(
        provider.calls.borrow().as_slice(),
        &[(Player::Man, 4, TileCategory::Trap)]
    );

    // The ledger records the trap, not the animation frames.
    assert!(
        state
            .turn_log
            .iter()
            .any(|event| event.kind == velvet_game::TurnEventKind::TrapTriggered)
    );
}

#[tokio::test]
async fn trap_setback_clamps_at_start() {
    let (mut session, _provider) = scripted_session(&[(1, TileCategory::Trap)], Player::Woman);
    let summary = session.resolve_turn(1).await.unwrap();
    assert_eq!(summary.target, 1);
    assert_eq!(summary.committed, 0);
    assert_eq!(session.state().positions.get(Player::Woman), 0);
}

#[tokio::test]
async fn bonus_landing_advances_and_prefixes_notice() {
    let (mut session, _provider) = scripted_session(&[(3, TileCategory::Bonus)], Player::Woman);
    let summary = session.resolve_turn(3).await.unwrap();
    assert_eq!(summary.committed, 5);
    let modal = session.state().pending_modal.as_ref().unwrap();
    assert!(modal.body.starts_with(BONUS_NOTICE));
}

#[tokio::test]
async fn bonus_adjustment_clamps_at_finish_without_winning() {
    // Landing on a bonus two squares shy of the finish: the adjustment
    // clamps to the finish tile but only the landing square decides a win.
    let (mut session, _provider) = scripted_session(&[(22, TileCategory::Bonus)], Player::Man);
    session.state_mut().positions.set(Player::Man, 18);

    let summary = session.resolve_turn(4).await.unwrap();
    assert_eq!(summary.target, 22);
    assert_eq!(summary.committed, 24);
    assert!(!summary.finished);

    let state = session.state();
    assert_eq!(state.positions.get(Player::Man), 24);
    assert_eq!(state.phase, TurnPhase::ModalOpen);
    assert!(state.winner.is_none());
}

#[tokio::test]
async fn reaching_finish_ends_game_without_challenge() {
    let (mut session, provider) = scripted_session(&[], Player::Woman);
    session.state_mut().positions.set(Player::Woman, 22);

    let summary = session.resolve_turn(6).await.unwrap();
    assert_eq!(summary.target, 24, "roll clamps to the finish tile");
    assert!(summary.finished);

    let state = session.state();
    assert_eq!(state.winner, Some(Player::Woman));
    assert_eq!(state.phase, TurnPhase::GameOver);
    assert!(state.pending_modal.is_some(), "terminal modal emitted");
    assert!(provider.calls.borrow().is_empty(), "no challenge fetched");
}

#[tokio::test]
async fn roll_outside_idle_has_no_observable_effect() {
    let (mut session, provider) = scripted_session(&[], Player::Man);
    session.resolve_turn(2).await.unwrap();
    assert_eq!(session.state().phase, TurnPhase::ModalOpen);

    let before = session.state().clone();
    assert!(session.resolve_turn(5).await.is_none());
    assert!(session.roll_and_advance().await.is_none());
    assert_eq!(*session.state(), before);
    assert_eq!(provider.calls.borrow().len(), 1);
}

#[tokio::test]
async fn dismiss_toggles_turn_and_settles_idle() {
    let (mut session, _provider) = scripted_session(&[], Player::Man);
    session.resolve_turn(2).await.unwrap();

    assert!(session.dismiss_modal());
    let state = session.state();
    assert_eq!(state.phase, TurnPhase::Idle);
    assert_eq!(state.current_turn, Player::Woman);
    assert!(state.pending_modal.is_none());
    assert!(state.status.contains("Woman"), "status: {}", state.status);
}

#[tokio::test]
async fn dismiss_after_game_over_stays_game_over() {
    let (mut session, _provider) = scripted_session(&[], Player::Man);
    session.state_mut().positions.set(Player::Man, 23);
    session.resolve_turn(3).await.unwrap();
    assert_eq!(session.state().phase, TurnPhase::GameOver);

    assert!(session.dismiss_modal());
    let state = session.state();
    assert_eq!(state.phase, TurnPhase::GameOver);
    assert_eq!(state.current_turn, Player::Man, "no handoff after the end");
    assert!(state.pending_modal.is_none());

    assert!(session.roll_and_advance().await.is_none(), "no further rolls");
}

#[tokio::test]
async fn dismiss_while_idle_is_a_silent_no_op() {
    let (mut session, _provider) = scripted_session(&[], Player::Man);
    let before = session.state().clone();
    assert!(!session.dismiss_modal());
    assert_eq!(*session.state(), before);
}

#[tokio::test]
async fn full_game_terminates_with_builtin_corpus() {
    let mut session = GameSession::new(2024, ChallengeData::builtin()).unwrap();
    let mut turns = 0;
    while session.state().phase != TurnPhase::GameOver {
        turns += 1;
        assert!(turns < 500, "game must terminate");
        let summary = session
            .roll_and_advance()
            .await
            .expect("session was idle before the roll");
        assert!(summary.target < session.board().len());
        assert!(summary.committed < session.board().len());
        assert!(session.state().phase.is_settled() || session.state().phase == TurnPhase::ModalOpen);
        session.dismiss_modal();
    }
    assert!(session.state().winner.is_some());
}

#[tokio::test]
async fn same_seed_replays_identically() {
    let mut first = GameSession::new(4242, ChallengeData::builtin()).unwrap();
    let mut second = GameSession::new(4242, ChallengeData::builtin()).unwrap();

    for _ in 0..200 {
        if first.state().phase == TurnPhase::GameOver {
            break;
        }
        let a = first.roll_and_advance().await;
        let b = second.roll_and_advance().await;
        assert_eq!(a, b);
        assert_eq!(first.state(), second.state());
        first.dismiss_modal();
        second.dismiss_modal();
    }
    assert_eq!(first.state().winner, second.state().winner);
}

#[tokio::test]
async fn restart_follows_the_new_seed() {
    let mut session = GameSession::new(7, ChallengeData::builtin()).unwrap();
    session.roll_and_advance().await.unwrap();
    session.dismiss_modal();
    session.restart(99).unwrap();

    let mut reference = GameSession::new(99, ChallengeData::builtin()).unwrap();
    assert_eq!(session.state().current_turn, reference.state().current_turn);
    let restarted = session.roll_and_advance().await;
    let fresh = reference.roll_and_advance().await;
    assert_eq!(restarted, fresh);
}
