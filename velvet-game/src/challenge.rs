//! Challenge selection logic
#[cfg(debug_assertions)]
use crate::constants::DEBUG_ENV_VAR;
use crate::constants::{FALLBACK_INSTRUCTION, FALLBACK_TITLE};
use crate::data::{ChallengeCategory, ChallengeData, ChallengeEntry};
use crate::state::Player;
use rand::Rng;
use serde::{Deserialize, Serialize};

#[cfg(debug_assertions)]
fn debug_log_enabled() -> bool {
    matches!(std::env::var(DEBUG_ENV_VAR), Ok(val) if val != "0")
}

#[cfg(not(debug_assertions))]
const fn debug_log_enabled() -> bool {
    false
}

/// Everything selection needs to know about one landing.
pub struct ChallengeRequest<'a> {
    pub player: Player,
    pub position: usize,
    pub category: ChallengeCategory,
    pub data: &'a ChallengeData,
}

/// Title and instruction pair shown in the modal. Ephemeral.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeResult {
    pub title: String,
    pub body: String,
}

impl ChallengeResult {
    /// The fixed pair substituted for every internal failure.
    #[must_use]
    pub fn fallback() -> Self {
        Self {
            title: String::from(FALLBACK_TITLE),
            body: String::from(FALLBACK_INSTRUCTION),
        }
    }
}

/// Select a challenge for a landing. Never fails.
///
/// The primary pool matches both corpus category and player eligibility.
/// When empty it widens to eligibility alone; when that is also empty the
/// fixed fallback pair is returned.
pub fn pick_challenge<R: Rng>(request: &ChallengeRequest<'_>, rng: &mut R) -> ChallengeResult {
    let primary = filter_candidates(request);
    let widened;
    let pool = if primary.is_empty() {
        widened = widen_candidates(request);
        &widened
    } else {
        &primary
    };

    if debug_log_enabled() {
        println!(
            "Challenge selection | player:{} category:{:?} primary:{} pool:{}",
            request.player.label(),
            request.category,
            primary.len(),
            pool.len()
        );
    }

    choose_weighted(pool, rng).map_or_else(ChallengeResult::fallback, |entry| ChallengeResult {
        title: entry.challenge.clone(),
        body: entry.instruction.clone(),
    })
}

fn filter_candidates<'a>(request: &ChallengeRequest<'a>) -> Vec<&'a ChallengeEntry> {
    request
        .data
        .entries
        .iter()
        .filter(|entry| entry.category == request.category && entry.player.allows(request.player))
        .collect()
}

fn widen_candidates<'a>(request: &ChallengeRequest<'a>) -> Vec<&'a ChallengeEntry> {
    request
        .data
        .entries
        .iter()
        .filter(|entry| entry.player.allows(request.player))
        .collect()
}

fn choose_weighted<'a, R: Rng>(
    candidates: &[&'a ChallengeEntry],
    rng: &mut R,
) -> Option<&'a ChallengeEntry> {
    let total_weight: u32 = candidates
        .iter()
        .map(|entry| entry.weight.max(1))
        .sum();
    if total_weight == 0 {
        return None;
    }

    let roll = rng.gen_range(0..total_weight);
    let mut current = 0;
    for entry in candidates {
        current += entry.weight.max(1);
        if roll < current {
            return Some(entry);
        }
    }

    candidates.first().copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Eligibility;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn make_entry(
        category: ChallengeCategory,
        player: Eligibility,
        title: &str,
    ) -> ChallengeEntry {
        ChallengeEntry {
            category,
            player,
            challenge: title.to_string(),
            instruction: format!("Instruction for {title}"),
            weight: 1,
        }
    }

    fn mk_request<'a>(
        player: Player,
        category: ChallengeCategory,
        data: &'a ChallengeData,
    ) -> ChallengeRequest<'a> {
        ChallengeRequest {
            player,
            position: 4,
            category,
            data,
        }
    }

    #[test]
    fn primary_pool_matches_category_and_player() {
        let data = ChallengeData::from_entries(vec![
            make_entry(ChallengeCategory::Trap, Eligibility::Man, "man-trap"),
            make_entry(ChallengeCategory::Trap, Eligibility::Woman, "woman-trap"),
            make_entry(ChallengeCategory::Neutral, Eligibility::Both, "neutral"),
        ]);
        let request = mk_request(Player::Man, ChallengeCategory::Trap, &data);
        let mut rng = ChaCha20Rng::from_seed([0u8; 32]);
        let result = pick_challenge(&request, &mut rng);
        assert_eq!(result.title, "man-trap");
    }

    #[test]
    fn empty_primary_pool_widens_to_player_eligibility() {
        let data = ChallengeData::from_entries(vec![
            make_entry(ChallengeCategory::Neutral, Eligibility::Both, "neutral"),
            make_entry(ChallengeCategory::Bonus, Eligibility::Woman, "her-bonus"),
        ]);
        // No TRAP entries at all: widen to everything the man may draw.
        let request = mk_request(Player::Man, ChallengeCategory::Trap, &data);
        let mut rng = ChaCha20Rng::from_seed([1u8; 32]);
        let result = pick_challenge(&request, &mut rng);
        assert_eq!(result.title, "neutral");
    }

    #[test]
    fn empty_corpus_degrades_to_fallback_pair() {
        let data = ChallengeData::empty();
        let request = mk_request(Player::Woman, ChallengeCategory::Neutral, &data);
        let mut rng = ChaCha20Rng::from_seed([2u8; 32]);
        assert_eq!(pick_challenge(&request, &mut rng), ChallengeResult::fallback());
    }

    #[test]
    fn ineligible_only_corpus_degrades_to_fallback_pair() {
        let data = ChallengeData::from_entries(vec![make_entry(
            ChallengeCategory::Neutral,
            Eligibility::Man,
            "his-only",
        )]);
        let request = mk_request(Player::Woman, ChallengeCategory::Neutral, &data);
        let mut rng = ChaCha20Rng::from_seed([3u8; 32]);
        assert_eq!(pick_challenge(&request, &mut rng), ChallengeResult::fallback());
    }

    #[test]
    fn weighted_choice_prefers_higher_weight() {
        let mut heavy = make_entry(ChallengeCategory::Neutral, Eligibility::Both, "heavy");
        heavy.weight = 50;
        let light = make_entry(ChallengeCategory::Neutral, Eligibility::Both, "light");
        let entries = [&light, &heavy];
        let mut rng = ChaCha20Rng::from_seed([1u8; 32]);
        let mut heavy_hits = 0;
        for _ in 0..20 {
            if choose_weighted(&entries, &mut rng).map(|e| e.challenge.as_str()) == Some("heavy") {
                heavy_hits += 1;
            }
        }
        assert!(heavy_hits >= 15, "heavy entry should dominate: {heavy_hits}");
    }

    #[test]
    fn fixed_seed_selection_is_reproducible() {
        let data = ChallengeData::builtin();
        let request = mk_request(Player::Man, ChallengeCategory::Neutral, &data);
        let mut first = ChaCha20Rng::from_seed([7u8; 32]);
        let mut second = ChaCha20Rng::from_seed([7u8; 32]);
        assert_eq!(
            pick_challenge(&request, &mut first),
            pick_challenge(&request, &mut second)
        );
    }
}
