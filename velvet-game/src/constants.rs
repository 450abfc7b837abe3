//! Centralized balance and tuning constants for Velvet Trail game logic.
//!
//! These values define the deterministic math for the turn loop. Keeping
//! them together ensures that gameplay can only be adjusted via code changes
//! reviewed in version control, rather than through external JSON assets.

// Logging ------------------------------------------------------------------
pub(crate) const DEBUG_ENV_VAR: &str = "VELVET_DEBUG_LOGS";

// Board layout -------------------------------------------------------------
/// Number of tiles on the default board, start and finish included.
pub const DEFAULT_BOARD_LENGTH: usize = 25;
/// Smallest playable board: start, finish, and at least one interior tile.
pub const MIN_BOARD_LENGTH: usize = 3;

// Tile category thresholds -------------------------------------------------
pub(crate) const TRAP_THRESHOLD: f64 = 0.15;
pub(crate) const BONUS_THRESHOLD: f64 = 0.25;
pub(crate) const HIS_REQUEST_THRESHOLD: f64 = 0.50;
pub(crate) const HER_REQUEST_THRESHOLD: f64 = 0.75;

// Dice ---------------------------------------------------------------------
pub const DIE_MIN: u8 = 1;
pub const DIE_MAX: u8 = 6;

// Tile side effects --------------------------------------------------------
/// Squares a trap pushes the landing player back.
pub const TRAP_SETBACK: usize = 2;
/// Squares a bonus pulls the landing player forward.
pub const BONUS_ADVANCE: usize = 2;

// Presentation pacing ------------------------------------------------------
// Reference durations for drivers that animate the turn pipeline. The
// engine itself never sleeps; see `pacer`.
pub const ROLL_ANIMATION_MS: u64 = 1200;
pub const STEP_ANIMATION_MS: u64 = 200;
pub const REVEAL_DELAY_MS: u64 = 500;

// Remote provider ----------------------------------------------------------
/// Hard deadline for a single remote challenge request.
pub const REMOTE_TIMEOUT_SECS: u64 = 8;

// Modal copy ---------------------------------------------------------------
pub const TRAP_NOTICE: &str = "Bad luck! Move back 2 squares after the challenge. ";
pub const BONUS_NOTICE: &str = "Bonus! Move forward 2 squares after the challenge. ";
pub const FINISH_TITLE: &str = "An Unforgettable Night";
pub const FALLBACK_TITLE: &str = "Special Challenge";
pub const FALLBACK_INSTRUCTION: &str = "Do something affectionate for your partner.";
