//! Game controller: one session plus its deferred tasks.
//!
//! The controller owns the active `GameState`, the `MatchRules`, and a
//! `Timeline` carrying two kinds of deferred work:
//!
//! - **Flip resolution**: scheduled `flip_back_delay_ms` after the second card
//!   of a move turns face up
//! - **Clock tick**: every `tick_interval_ms` until the game is over
//!
//! ## Cancellation
//!
//! Every task is stamped with the session generation. Replacing the session
//! (reset, mode toggle, difficulty change, loading a save) bumps the
//! generation, so tasks from the old session do nothing when they come due.
//!
//! ## Example
//!
//! ```
//! use memorama::core::{Difficulty, GameMode, GameRng, RulesConfig};
//! use memorama::schedule::GameController;
//!
//! let mut game = GameController::new(Difficulty::Easy, GameMode::Classic, RulesConfig::default(), GameRng::new(7));
//! let first = game.state().cards[0].id;
//! game.flip(first);
//! game.advance(250);
//! assert_eq!(game.state().time_elapsed_ms, 200);
//! ```

use log::debug;

use super::timeline::{TaskKind, Timeline};
use crate::core::config::{Difficulty, GameMode, RulesConfig};
use crate::core::rng::GameRng;
use crate::core::state::{GameOutcome, GameState, Phase};
use crate::rules::{FlipOutcome, MatchRules, Resolution};

/// Something that happened while the timeline advanced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameEvent {
    /// A face-up pair was resolved.
    Resolved(Resolution),
    /// The session ended. Carries the final score.
    Finished { outcome: GameOutcome, score: i64 },
}

/// Drives one session at a time against a logical clock.
#[derive(Clone, Debug)]
pub struct GameController {
    rules: MatchRules,
    rng: GameRng,
    state: GameState,
    timeline: Timeline,
    generation: u64,
    /// A resumed board was already complete; reported on the next advance.
    finish_unreported: bool,
}

impl GameController {
    /// Deal a new session and start its clock.
    pub fn new(difficulty: Difficulty, mode: GameMode, config: RulesConfig, mut rng: GameRng) -> Self {
        let state = GameState::new(difficulty, mode, &config, &mut rng);
        let mut controller = Self {
            rules: MatchRules::new(config),
            rng,
            state,
            timeline: Timeline::new(),
            generation: 0,
            finish_unreported: false,
        };
        controller.start();
        controller
    }

    /// Resume a loaded session.
    ///
    /// Face-up unmatched cards become pending again; a full pair gets a fresh
    /// resolution delay. A board with every pair found ends immediately and
    /// the next `advance` reports `Finished`.
    pub fn resume(mut state: GameState, config: RulesConfig, rng: GameRng) -> Self {
        state.restore_pending();
        let mut controller = Self {
            rules: MatchRules::new(config),
            rng,
            state,
            timeline: Timeline::new(),
            generation: 0,
            finish_unreported: false,
        };
        controller.start();
        controller
    }

    // === Accessors ===

    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub fn rules(&self) -> &MatchRules {
        &self.rules
    }

    /// Current session generation.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Timeline time in milliseconds.
    #[must_use]
    pub fn now_ms(&self) -> u64 {
        self.timeline.now_ms()
    }

    /// Hand the session over (e.g. to the save codec).
    #[must_use]
    pub fn into_state(self) -> GameState {
        self.state
    }

    // === Player input ===

    /// Turn a card face up, scheduling resolution when a pair is showing.
    pub fn flip(&mut self, card_id: u32) -> FlipOutcome {
        let outcome = self.rules.flip(&mut self.state, card_id);
        if outcome == FlipOutcome::PairPending {
            let delay = self.rules.config().flip_back_delay_ms;
            self.timeline.schedule(TaskKind::ResolveFlips, delay, self.generation);
        }
        outcome
    }

    // === Session replacement ===

    /// Re-deal the current difficulty and mode.
    pub fn reset(&mut self) {
        self.redeal(self.state.difficulty, self.state.game_mode);
    }

    /// Switch between classic and time attack. Re-deals.
    pub fn toggle_mode(&mut self) {
        self.redeal(self.state.difficulty, self.state.game_mode.toggled());
    }

    /// Start over at another difficulty, keeping the mode.
    pub fn change_difficulty(&mut self, difficulty: Difficulty) {
        self.redeal(difficulty, self.state.game_mode);
    }

    /// Swap in another session (e.g. one just loaded), returning the old one.
    pub fn replace(&mut self, mut state: GameState) -> GameState {
        state.restore_pending();
        let old = std::mem::replace(&mut self.state, state);
        self.start();
        old
    }

    // === Time ===

    /// Advance the clock by `delta_ms`, running every task that comes due.
    ///
    /// Tasks from replaced sessions are skipped.
    pub fn advance(&mut self, delta_ms: u64) -> Vec<GameEvent> {
        let until = self.timeline.now_ms().saturating_add(delta_ms);
        let mut events = Vec::new();

        if std::mem::take(&mut self.finish_unreported) {
            self.push_finished(&mut events);
        }

        while let Some(task) = self.timeline.pop_due(until) {
            if task.generation != self.generation {
                debug!("skipping stale {} ({:?}) from generation {}", task.id, task.kind, task.generation);
                continue;
            }
            match task.kind {
                TaskKind::ResolveFlips => self.run_resolution(&mut events),
                TaskKind::Tick => self.run_tick(&mut events),
            }
        }

        self.timeline.advance_to(until);
        events
    }

    fn run_resolution(&mut self, events: &mut Vec<GameEvent>) {
        let Some(resolution) = self.rules.resolve_pending_flips(&mut self.state) else {
            return;
        };
        events.push(GameEvent::Resolved(resolution));

        let finished = self.rules.check_completion(&mut self.state);
        self.rules.update_score(&mut self.state);
        if finished {
            self.push_finished(events);
        }
    }

    fn run_tick(&mut self, events: &mut Vec<GameEvent>) {
        if self.state.phase() == Phase::GameOver {
            return;
        }

        let interval = self.rules.config().tick_interval_ms;
        let timed_out = self.rules.tick(&mut self.state, interval);
        self.rules.update_score(&mut self.state);

        if timed_out {
            self.push_finished(events);
        } else {
            self.timeline.schedule(TaskKind::Tick, interval, self.generation);
        }
    }

    fn push_finished(&self, events: &mut Vec<GameEvent>) {
        if let Some(outcome) = self.state.outcome() {
            debug!("game over ({:?}) with score {}", outcome, self.state.score);
            events.push(GameEvent::Finished {
                outcome,
                score: self.state.score,
            });
        }
    }

    fn redeal(&mut self, difficulty: Difficulty, mode: GameMode) {
        let mut rng = self.rng.fork();
        self.state = GameState::new(difficulty, mode, self.rules.config(), &mut rng);
        self.start();
    }

    /// Begin a new generation: completion checked, clock running, pending
    /// pair rescheduled.
    fn start(&mut self) {
        self.generation += 1;

        self.finish_unreported = self.rules.check_completion(&mut self.state);
        if self.finish_unreported {
            self.rules.update_score(&mut self.state);
        }

        let config = self.rules.config();
        let (interval, delay) = (config.tick_interval_ms, config.flip_back_delay_ms);

        if self.state.phase() != Phase::GameOver {
            self.timeline.schedule(TaskKind::Tick, interval, self.generation);
        }
        if self.state.phase() == Phase::Resolving {
            self.timeline.schedule(TaskKind::ResolveFlips, delay, self.generation);
        }
    }
}
