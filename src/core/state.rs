//! Game state: one memorama session.
//!
//! ## GameState
//!
//! Complete session state:
//! - Board (ordered cards) and the pending face-up pair
//! - Progress counters (matched pairs, moves)
//! - Clock (elapsed time, time limit, time-up flag)
//! - Mode, difficulty, cached score, game-over flag
//!
//! ## Lifecycle
//!
//! `Dealing -> Playing -> {Resolving -> Playing}* -> GameOver`
//!
//! Dealing happens inside `GameState::new`. The transitions themselves live
//! in `rules::MatchRules`; this type only holds data and answers queries.

use smallvec::SmallVec;

use super::config::{Difficulty, GameMode, RulesConfig, DEFAULT_TIME_LIMIT_MS};
use super::rng::GameRng;
use crate::cards::{deal, Card};

/// Where a session is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Accepting flips.
    Playing,
    /// Two cards face up, waiting for the delayed resolution.
    Resolving,
    /// Terminal.
    GameOver,
}

/// Why a session ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameOutcome {
    /// Every pair was found.
    Completed,
    /// Time attack clock ran out first.
    TimeUp,
}

/// A memorama session.
///
/// Fields are public so collaborators can render them directly; mutate only
/// through `MatchRules` during play to keep the invariants.
#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    pub difficulty: Difficulty,

    /// Pairs on the board. Derived from difficulty for new sessions; taken
    /// from the file for loaded ones.
    pub total_pairs: u32,

    /// Board in display order.
    pub cards: Vec<Card>,

    pub matched_pairs: u32,

    /// Resolved flip pairs.
    pub moves: u32,

    pub time_elapsed_ms: u64,

    pub game_mode: GameMode,

    /// Only meaningful in time attack.
    pub time_limit_ms: u64,

    pub is_game_over: bool,

    pub is_time_up: bool,

    /// Cached result of the last score update.
    pub score: i64,

    /// Face-up cards awaiting resolution, in flip order. Never persisted.
    pending: SmallVec<[u32; 2]>,
}

impl GameState {
    /// Deal a fresh session for `difficulty`.
    #[must_use]
    pub fn new(difficulty: Difficulty, mode: GameMode, config: &RulesConfig, rng: &mut GameRng) -> Self {
        let total_pairs = difficulty.total_pairs();
        let mut state = Self::blank(difficulty, total_pairs);
        state.cards = deal(total_pairs, rng);
        state.game_mode = mode;
        state.time_limit_ms = config.time_limit_ms;
        state
    }

    /// A session with no cards and every other field at its default.
    ///
    /// Starting point for decoding a save file.
    #[must_use]
    pub fn blank(difficulty: Difficulty, total_pairs: u32) -> Self {
        Self {
            difficulty,
            total_pairs,
            cards: Vec::new(),
            matched_pairs: 0,
            moves: 0,
            time_elapsed_ms: 0,
            game_mode: GameMode::Classic,
            time_limit_ms: DEFAULT_TIME_LIMIT_MS,
            is_game_over: false,
            is_time_up: false,
            score: 0,
            pending: SmallVec::new(),
        }
    }

    // === Queries ===

    /// Current lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        if self.is_game_over {
            Phase::GameOver
        } else if self.pending.len() == 2 {
            Phase::Resolving
        } else {
            Phase::Playing
        }
    }

    /// Why the game ended, if it has.
    #[must_use]
    pub fn outcome(&self) -> Option<GameOutcome> {
        if !self.is_game_over {
            None
        } else if self.is_time_up && self.matched_pairs < self.total_pairs {
            Some(GameOutcome::TimeUp)
        } else {
            Some(GameOutcome::Completed)
        }
    }

    /// Face-up cards awaiting resolution.
    #[must_use]
    pub fn pending(&self) -> &[u32] {
        &self.pending
    }

    /// Look up a card by id.
    #[must_use]
    pub fn card(&self, id: u32) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == id)
    }

    pub(crate) fn card_mut(&mut self, id: u32) -> Option<&mut Card> {
        self.cards.iter_mut().find(|c| c.id == id)
    }

    /// Time left on the time attack clock (zero when expired).
    #[must_use]
    pub fn remaining_time_ms(&self) -> u64 {
        self.time_limit_ms.saturating_sub(self.time_elapsed_ms)
    }

    /// Have all pairs been found?
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.total_pairs > 0 && self.matched_pairs >= self.total_pairs
    }

    // === Pending set ===

    pub(crate) fn push_pending(&mut self, id: u32) {
        self.pending.push(id);
    }

    pub(crate) fn take_pending(&mut self) -> SmallVec<[u32; 2]> {
        std::mem::take(&mut self.pending)
    }

    /// Rebuild the pending set from the board.
    ///
    /// A loaded save may have face-up unmatched cards (saved mid-move).
    /// The first two become pending again so the session resumes in
    /// `Resolving`; a lone face-up card stays pending as a half move.
    /// Any further face-up cards are turned back down.
    pub fn restore_pending(&mut self) {
        self.pending.clear();
        for card in self.cards.iter_mut() {
            if card.is_flipped && !card.is_matched {
                if self.pending.len() < 2 {
                    self.pending.push(card.id);
                } else {
                    card.is_flipped = false;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn easy() -> GameState {
        GameState::new(Difficulty::Easy, GameMode::Classic, &RulesConfig::default(), &mut GameRng::new(1))
    }

    #[test]
    fn test_new_session() {
        let state = easy();

        assert_eq!(state.total_pairs, 6);
        assert_eq!(state.cards.len(), 12);
        assert_eq!(state.matched_pairs, 0);
        assert_eq!(state.moves, 0);
        assert_eq!(state.time_limit_ms, DEFAULT_TIME_LIMIT_MS);
        assert_eq!(state.phase(), Phase::Playing);
        assert!(state.pending().is_empty());
        assert_eq!(state.outcome(), None);
    }

    #[test]
    fn test_new_session_uses_config_time_limit() {
        let config = RulesConfig::new().with_time_limit(45_000);
        let state = GameState::new(Difficulty::Hard, GameMode::TimeAttack, &config, &mut GameRng::new(1));

        assert_eq!(state.total_pairs, 10);
        assert_eq!(state.game_mode, GameMode::TimeAttack);
        assert_eq!(state.time_limit_ms, 45_000);
    }

    #[test]
    fn test_blank_defaults() {
        let state = GameState::blank(Difficulty::Medium, 8);

        assert!(state.cards.is_empty());
        assert_eq!(state.game_mode, GameMode::Classic);
        assert_eq!(state.time_limit_ms, 30_000);
        assert!(!state.is_game_over);
        assert!(!state.is_time_up);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_remaining_time_saturates() {
        let mut state = easy();
        state.time_elapsed_ms = 25_000;
        assert_eq!(state.remaining_time_ms(), 5_000);

        state.time_elapsed_ms = 31_000;
        assert_eq!(state.remaining_time_ms(), 0);
    }

    #[test]
    fn test_outcome() {
        let mut state = easy();
        state.is_game_over = true;
        state.is_time_up = true;
        state.matched_pairs = 3;
        assert_eq!(state.outcome(), Some(GameOutcome::TimeUp));

        state.matched_pairs = 6;
        assert_eq!(state.outcome(), Some(GameOutcome::Completed));
    }

    #[test]
    fn test_restore_pending() {
        let mut state = GameState::blank(Difficulty::Easy, 2);
        state.cards = vec![Card::new(0, 1), Card::new(1, 2), Card::new(2, 1), Card::new(3, 2)];
        state.cards[0].set_matched();
        state.cards[2].set_matched();
        state.cards[1].is_flipped = true;
        state.cards[3].is_flipped = true;

        state.restore_pending();

        assert_eq!(state.pending(), &[1, 3]);
        assert_eq!(state.phase(), Phase::Resolving);
    }

    #[test]
    fn test_restore_pending_turns_down_extra_cards() {
        let mut state = GameState::blank(Difficulty::Easy, 2);
        state.cards = vec![Card::new(0, 1), Card::new(1, 2), Card::new(2, 1), Card::new(3, 2)];
        for card in state.cards.iter_mut() {
            card.is_flipped = true;
        }

        state.restore_pending();

        assert_eq!(state.pending(), &[0, 1]);
        assert!(!state.cards[2].is_flipped);
        assert!(!state.cards[3].is_flipped);
    }
}
