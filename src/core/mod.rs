//! Core types: session state, configuration, RNG.
//!
//! Everything here is plain data. Game rules live in `rules`, persistence in
//! `save`.

pub mod config;
pub mod rng;
pub mod state;

pub use config::{
    Difficulty, GameMode, MultiplierRounding, RulesConfig, DEFAULT_TIME_LIMIT_MS, FLIP_BACK_DELAY_MS,
    TICK_INTERVAL_MS,
};
pub use rng::GameRng;
pub use state::{GameOutcome, GameState, Phase};
