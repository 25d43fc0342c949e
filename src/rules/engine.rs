//! Session transitions: flip, resolve, tick, completion, score.
//!
//! `MatchRules` holds the rules configuration and applies transitions to a
//! `GameState` in place. It never schedules anything itself: `flip` reports
//! when a pair is face up and the caller decides when to call
//! `resolve_pending_flips` (see `schedule::GameController`).

use log::debug;

use super::scoring::compute_score;
use crate::core::config::{GameMode, RulesConfig};
use crate::core::state::GameState;

/// Result of a flip request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlipOutcome {
    /// Nothing changed (busy, game over, unknown or unselectable card).
    Ignored,
    /// First card of a move is face up.
    FaceUp,
    /// Second card is face up; resolution is now due.
    PairPending,
}

/// Result of resolving a face-up pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// Both cards share this pair id and stay face up.
    Matched { pair_id: u32 },
    /// Different pairs; both turned back down.
    Mismatched,
}

/// Rules engine for a memorama session.
#[derive(Clone, Debug, Default)]
pub struct MatchRules {
    config: RulesConfig,
}

impl MatchRules {
    /// Create rules with the given configuration.
    pub fn new(config: RulesConfig) -> Self {
        Self { config }
    }

    /// Get the rules configuration.
    #[must_use]
    pub fn config(&self) -> &RulesConfig {
        &self.config
    }

    /// Turn a card face up.
    ///
    /// Silently ignored when two cards are already pending, when the game is
    /// over, or when the card is unknown, face up, or matched.
    pub fn flip(&self, state: &mut GameState, card_id: u32) -> FlipOutcome {
        if state.is_game_over || state.pending().len() >= 2 {
            return FlipOutcome::Ignored;
        }

        match state.card_mut(card_id) {
            Some(card) if card.is_selectable() => card.is_flipped = true,
            _ => return FlipOutcome::Ignored,
        }
        state.push_pending(card_id);

        if state.pending().len() == 2 {
            FlipOutcome::PairPending
        } else {
            FlipOutcome::FaceUp
        }
    }

    /// Resolve the two pending face-up cards.
    ///
    /// Returns `None` (and changes nothing) unless exactly two cards are
    /// pending. A matching pair is marked matched and counted; every
    /// unmatched face-up card is turned back down; the move counter
    /// advances by one.
    ///
    /// After game over the pair is only turned back down: counters are final.
    pub fn resolve_pending_flips(&self, state: &mut GameState) -> Option<Resolution> {
        if state.pending().len() != 2 {
            return None;
        }

        let pending = state.take_pending();
        let pair_ids: Vec<Option<u32>> = pending.iter().map(|id| state.card(*id).map(|c| c.pair_id)).collect();
        let counts = !state.is_game_over;

        let resolution = match pair_ids.as_slice() {
            [Some(a), Some(b)] if a == b && counts => {
                for id in &pending {
                    if let Some(card) = state.card_mut(*id) {
                        card.set_matched();
                    }
                }
                state.matched_pairs += 1;
                Resolution::Matched { pair_id: *a }
            }
            _ => Resolution::Mismatched,
        };

        for card in state.cards.iter_mut().filter(|c| !c.is_matched) {
            card.is_flipped = false;
        }
        if counts {
            state.moves += 1;
        }

        debug!(
            "resolved {:?}: {}/{} pairs after {} moves",
            resolution, state.matched_pairs, state.total_pairs, state.moves
        );
        Some(resolution)
    }

    /// Advance the clock by `delta_ms`.
    ///
    /// No-op once the game is over. In time attack, reaching the limit ends
    /// the game. Pending flips are never resolved here.
    ///
    /// Returns `true` if this tick ran the clock out.
    pub fn tick(&self, state: &mut GameState, delta_ms: u64) -> bool {
        if state.is_game_over {
            return false;
        }

        state.time_elapsed_ms = state.time_elapsed_ms.saturating_add(delta_ms);

        if state.game_mode == GameMode::TimeAttack && state.time_elapsed_ms >= state.time_limit_ms {
            state.is_time_up = true;
            state.is_game_over = true;
            debug!("time up after {} ms", state.time_elapsed_ms);
            return true;
        }
        false
    }

    /// End the game if every pair is found.
    ///
    /// Returns `true` if this call ended the game.
    pub fn check_completion(&self, state: &mut GameState) -> bool {
        if !state.is_game_over && state.is_complete() {
            state.is_game_over = true;
            return true;
        }
        false
    }

    /// Score for `state` under this configuration.
    #[must_use]
    pub fn compute_score(&self, state: &GameState) -> i64 {
        compute_score(state, self.config.rounding)
    }

    /// Recompute and cache the score.
    pub fn update_score(&self, state: &mut GameState) -> i64 {
        state.score = self.compute_score(state);
        state.score
    }
}
