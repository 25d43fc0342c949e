//! # memorama
//!
//! Core of a single-player memory-matching game: dealing, flip rules,
//! scoring, the game clock, and save files in three interchangeable formats.
//!
//! ## Design Principles
//!
//! 1. **Plain Data**: `GameState` is an ordinary value. Whoever plays a
//!    session owns it; the codec receives it by reference and decoding
//!    produces a fresh one.
//!
//! 2. **Deterministic**: Every shuffle goes through a seeded `GameRng`, and
//!    time only moves when the caller advances the controller's timeline.
//!
//! 3. **One Field List**: The txt, XML and JSON formats share field names and
//!    a single default table, so they recover from bad input identically.
//!
//! ## Modules
//!
//! - `core`: Difficulty, mode, configuration, RNG, session state
//! - `cards`: Cards and the dealer
//! - `rules`: Flip, resolution, clock and scoring rules
//! - `schedule`: Delayed flip resolution and clock ticks on a logical timeline
//! - `save`: Format codecs and the save directory
//! - `highscores`: Best score per difficulty
//! - `service`: The `Memorama` facade

pub mod core;
pub mod cards;
pub mod rules;
pub mod schedule;
pub mod save;
pub mod highscores;
pub mod service;

// Re-export commonly used types
pub use crate::core::{
    Difficulty, GameMode, MultiplierRounding, RulesConfig,
    GameRng,
    GameOutcome, GameState, Phase,
};

pub use crate::cards::{deal, Card};

pub use crate::rules::{FlipOutcome, MatchRules, Resolution, compute_score};

pub use crate::schedule::{GameController, GameEvent};

pub use crate::save::{
    SaveFormat, SaveStore, SavedGameInfo, StoreConfig,
    DecodeError, EncodeError, ImportError, StorageError,
    decode, encode,
};

pub use crate::highscores::HighScores;

pub use crate::service::Memorama;
