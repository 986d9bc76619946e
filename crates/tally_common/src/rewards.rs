//! Reward rules - pure mappings from learning events to token and XP amounts.
//!
//! No side effects here: inputs are scalars, outputs are integers. Callers
//! (the ledger) reject zero or negative computed amounts; the rules only
//! decide how much an event is worth.

use chrono::NaiveDate;

/// Fixed reward for the daily login claim
pub const DAILY_CLAIM_TOKENS: i64 = 5;

/// XP needed to advance one level
pub const XP_PER_LEVEL: u32 = 100;

/// Tokens for a finished quiz. Thresholds are inclusive: a score exactly at
/// a boundary earns the higher tier.
pub fn tokens_for_quiz(percentage: u32) -> i64 {
    if percentage >= 100 {
        25
    } else if percentage >= 80 {
        15
    } else if percentage >= 60 {
        10
    } else {
        5
    }
}

/// XP for a finished quiz: half the percentage, rounded.
pub fn xp_for_quiz(percentage: u32) -> u32 {
    ((percentage.min(100) as f64) * 0.5).round() as u32
}

/// Level derived from lifetime XP. Level 1 starts at 0 XP; each level costs
/// [`XP_PER_LEVEL`].
pub fn level_for_xp(xp: u32) -> u32 {
    xp / XP_PER_LEVEL + 1
}

/// Advance a claim streak for a claim happening on `today`.
///
/// - last claim exactly yesterday: streak continues
/// - last claim today: unchanged (the ledger rejects same-day claims before
///   calling this; kept as a no-op so the rule stands alone)
/// - anything else, including no prior claim: streak resets to 1
///
/// Returns `(current, longest)` with longest tracking the running max.
pub fn advance_streak(
    current: u32,
    longest: u32,
    last_claim: Option<NaiveDate>,
    today: NaiveDate,
) -> (u32, u32) {
    let next = match last_claim {
        Some(date) if date == today => current,
        Some(date) if today.pred_opt() == Some(date) => current + 1,
        _ => 1,
    };
    (next, longest.max(next))
}
