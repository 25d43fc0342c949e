//! Score formulas.
//!
//! - Time attack: `matched * 100 + max(0, (limit - elapsed) / 100)`
//! - Classic: `max(0, (matched * 100 - moves * 5) * multiplier)`
//!
//! Difficulty multipliers are easy 1, medium 1.5, hard 2. Under
//! `MultiplierRounding::Truncate` the multiplier is truncated to an integer
//! before use, so medium scores like easy.

use crate::core::config::{GameMode, MultiplierRounding};
use crate::core::state::GameState;

/// Points per found pair.
pub const PAIR_POINTS: i64 = 100;

/// Classic-mode penalty per move.
pub const MOVE_PENALTY: i64 = 5;

/// Milliseconds of leftover time per bonus point in time attack.
pub const TIME_BONUS_DIVISOR: u64 = 100;

/// Compute the score for `state`.
#[must_use]
pub fn compute_score(state: &GameState, rounding: MultiplierRounding) -> i64 {
    let pairs = i64::from(state.matched_pairs) * PAIR_POINTS;

    match state.game_mode {
        GameMode::TimeAttack => {
            let bonus = state.time_limit_ms.saturating_sub(state.time_elapsed_ms) / TIME_BONUS_DIVISOR;
            pairs + bonus as i64
        }
        GameMode::Classic => {
            let base = pairs - i64::from(state.moves) * MOVE_PENALTY;
            let (num, den) = state.difficulty.multiplier();
            let scaled = match rounding {
                MultiplierRounding::Truncate => base * (num / den),
                MultiplierRounding::Exact => (base * num).div_euclid(den),
            };
            scaled.max(0)
        }
    }
}
