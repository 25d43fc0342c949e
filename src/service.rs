//! The collaborator-facing surface.
//!
//! `Memorama` bundles the rules configuration, a root RNG, the save store and
//! the high-score table. It does not hold a current session: every session it
//! hands out is an owned `GameController`, so callers decide what is active
//! and when it is replaced.
//!
//! ```no_run
//! use memorama::core::{Difficulty, GameRng, RulesConfig};
//! use memorama::save::{SaveFormat, StoreConfig};
//! use memorama::Memorama;
//!
//! let mut app = Memorama::open(StoreConfig::new("saves"), RulesConfig::default(), GameRng::new(1))?;
//! let game = app.new_session(Difficulty::Medium);
//! app.save_session(game.state(), SaveFormat::Json, "slot1")?;
//! let resumed = app.load_session("slot1")?;
//! assert_eq!(resumed.state().cards, game.state().cards);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::path::PathBuf;

use log::debug;

use crate::core::config::{Difficulty, GameMode, RulesConfig};
use crate::core::rng::GameRng;
use crate::core::state::GameState;
use crate::highscores::{HighScores, HIGH_SCORES_FILE};
use crate::save::{ImportError, SaveFormat, SaveStore, SavedGameInfo, StorageError, StoreConfig};
use crate::schedule::GameController;

/// Sessions, saves and high scores behind one handle.
#[derive(Debug)]
pub struct Memorama {
    rules: RulesConfig,
    rng: GameRng,
    store: SaveStore,
    high_scores: HighScores,
}

impl Memorama {
    /// Open the save directory and its high-score table.
    pub fn open(store: StoreConfig, rules: RulesConfig, rng: GameRng) -> Result<Self, StorageError> {
        let store = SaveStore::open(store)?;
        let high_scores = HighScores::load(store.dir().join(HIGH_SCORES_FILE))?;
        debug!("opened save store at {} (rng seed {})", store.dir().display(), rng.seed());
        Ok(Self {
            rules,
            rng,
            store,
            high_scores,
        })
    }

    pub fn rules(&self) -> &RulesConfig {
        &self.rules
    }

    pub fn store(&self) -> &SaveStore {
        &self.store
    }

    // === Sessions ===

    /// Deal a classic session.
    pub fn new_session(&mut self, difficulty: Difficulty) -> GameController {
        self.new_session_in(difficulty, GameMode::Classic)
    }

    /// Deal a session in the given mode. Each session draws from its own
    /// fork of the root RNG.
    pub fn new_session_in(&mut self, difficulty: Difficulty, mode: GameMode) -> GameController {
        GameController::new(difficulty, mode, self.rules.clone(), self.rng.fork())
    }

    /// Wrap a decoded session in a controller.
    pub fn resume(&mut self, state: GameState) -> GameController {
        GameController::resume(state, self.rules.clone(), self.rng.fork())
    }

    // === Saves ===

    pub fn save_session(&self, state: &GameState, format: SaveFormat, name: &str) -> Result<PathBuf, StorageError> {
        self.store.save(state, format, name)
    }

    /// Load `name` (txt, then xml, then json) and resume it.
    pub fn load_session(&mut self, name: &str) -> Result<GameController, StorageError> {
        let state = self.store.load(name)?;
        Ok(self.resume(state))
    }

    /// Remove `name` in every format.
    pub fn delete_session(&self, name: &str) -> Result<Vec<SaveFormat>, StorageError> {
        self.store.delete(name)
    }

    pub fn list_sessions(&self) -> Result<Vec<SavedGameInfo>, StorageError> {
        self.store.list()
    }

    /// File contents for the text viewers.
    pub fn read_raw(&self, name: &str, format: SaveFormat) -> Result<String, StorageError> {
        self.store.read_raw(name, format)
    }

    /// Copy an outside file into the store and resume it.
    pub fn import_external(&mut self, bytes: &[u8], declared_name: &str) -> Result<GameController, ImportError> {
        let state = self.store.import_external(bytes, declared_name)?;
        Ok(self.resume(state))
    }

    // === High scores ===

    /// Record a score. Returns true when it beats the stored best.
    pub fn record_high_score(&mut self, difficulty: Difficulty, score: i64) -> Result<bool, StorageError> {
        self.high_scores.record(difficulty, score)
    }

    /// Record the score of a finished session. Sessions still in play are
    /// ignored.
    pub fn record_result(&mut self, state: &GameState) -> Result<bool, StorageError> {
        if !state.is_game_over {
            return Ok(false);
        }
        self.record_high_score(state.difficulty, state.score)
    }

    pub fn high_score(&self, difficulty: Difficulty) -> i64 {
        self.high_scores.get(difficulty)
    }
}
