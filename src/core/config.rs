//! Game configuration types.
//!
//! - `Difficulty`: Board size and score multiplier
//! - `GameMode`: Classic (move-penalized) or time attack
//! - `RulesConfig`: Timing constants and scoring policy
//!
//! The string spellings of `Difficulty` and `GameMode` are part of the save
//! file format and must stay stable.

use serde::{Deserialize, Serialize};

/// Default time limit for time attack mode, in milliseconds.
pub const DEFAULT_TIME_LIMIT_MS: u64 = 30_000;

/// Delay before two face-up cards are resolved, in milliseconds.
pub const FLIP_BACK_DELAY_MS: u64 = 1_000;

/// Interval of the game clock, in milliseconds.
pub const TICK_INTERVAL_MS: u64 = 100;

/// Board difficulty.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// All difficulties, easiest first.
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Stable lowercase name (used in save files and high-score keys).
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    /// Parse a stable name. Case-sensitive, like the save format.
    pub fn from_name(s: &str) -> Option<Self> {
        match s {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Board geometry as (rows, columns).
    pub fn grid(&self) -> (u32, u32) {
        match self {
            Difficulty::Easy => (3, 4),
            Difficulty::Medium => (4, 4),
            Difficulty::Hard => (4, 5),
        }
    }

    /// Number of pairs on the board.
    pub fn total_pairs(&self) -> u32 {
        let (rows, columns) = self.grid();
        rows * columns / 2
    }

    /// Classic score multiplier as a ratio (numerator, denominator).
    pub fn multiplier(&self) -> (i64, i64) {
        match self {
            Difficulty::Easy => (1, 1),
            Difficulty::Medium => (3, 2),
            Difficulty::Hard => (2, 1),
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Game mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum GameMode {
    /// Untimed; score penalized per move.
    #[default]
    Classic,
    /// Race against `time_limit_ms`; leftover time is a bonus.
    TimeAttack,
}

impl GameMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Classic => "classic",
            GameMode::TimeAttack => "timeAttack",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s {
            "classic" => Some(GameMode::Classic),
            "timeAttack" => Some(GameMode::TimeAttack),
            _ => None,
        }
    }

    /// The other mode.
    pub fn toggled(self) -> Self {
        match self {
            GameMode::Classic => GameMode::TimeAttack,
            GameMode::TimeAttack => GameMode::Classic,
        }
    }
}

impl std::fmt::Display for GameMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the classic-mode difficulty multiplier is applied.
///
/// Scores already on disk were computed with `Truncate`, which turns the
/// medium multiplier of 1.5 into 1 before multiplying.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum MultiplierRounding {
    /// Truncate the multiplier to an integer first (medium scores like easy).
    #[default]
    Truncate,
    /// Apply the fractional multiplier, flooring the final score.
    Exact,
}

/// Rules configuration.
///
/// Defaults reproduce the shipped game. Builder methods adjust single values.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulesConfig {
    /// Display delay before a face-up pair is resolved.
    pub flip_back_delay_ms: u64,

    /// Game clock interval.
    pub tick_interval_ms: u64,

    /// Time limit given to new sessions.
    pub time_limit_ms: u64,

    /// Classic-mode multiplier policy.
    pub rounding: MultiplierRounding,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            flip_back_delay_ms: FLIP_BACK_DELAY_MS,
            tick_interval_ms: TICK_INTERVAL_MS,
            time_limit_ms: DEFAULT_TIME_LIMIT_MS,
            rounding: MultiplierRounding::Truncate,
        }
    }
}

impl RulesConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_flip_back_delay(mut self, ms: u64) -> Self {
        self.flip_back_delay_ms = ms;
        self
    }

    /// Set the clock interval. Must be non-zero.
    #[must_use]
    pub fn with_tick_interval(mut self, ms: u64) -> Self {
        assert!(ms > 0, "Tick interval must be non-zero");
        self.tick_interval_ms = ms;
        self
    }

    #[must_use]
    pub fn with_time_limit(mut self, ms: u64) -> Self {
        self.time_limit_ms = ms;
        self
    }

    #[must_use]
    pub fn with_rounding(mut self, rounding: MultiplierRounding) -> Self {
        self.rounding = rounding;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pairs_from_grid() {
        assert_eq!(Difficulty::Easy.total_pairs(), 6);
        assert_eq!(Difficulty::Medium.total_pairs(), 8);
        assert_eq!(Difficulty::Hard.total_pairs(), 10);
    }

    #[test]
    fn test_names_roundtrip() {
        for d in Difficulty::ALL {
            assert_eq!(Difficulty::from_name(d.as_str()), Some(d));
        }
        for m in [GameMode::Classic, GameMode::TimeAttack] {
            assert_eq!(GameMode::from_name(m.as_str()), Some(m));
        }
        assert_eq!(Difficulty::from_name("Easy"), None);
        assert_eq!(GameMode::from_name("timeattack"), None);
    }

    #[test]
    fn test_serde_spelling_matches_names() {
        assert_eq!(serde_json::to_string(&Difficulty::Medium).unwrap(), "\"medium\"");
        assert_eq!(serde_json::to_string(&GameMode::TimeAttack).unwrap(), "\"timeAttack\"");
    }

    #[test]
    fn test_mode_toggle() {
        assert_eq!(GameMode::Classic.toggled(), GameMode::TimeAttack);
        assert_eq!(GameMode::TimeAttack.toggled(), GameMode::Classic);
    }

    #[test]
    fn test_rules_config_builder() {
        let config = RulesConfig::new()
            .with_flip_back_delay(500)
            .with_time_limit(60_000)
            .with_rounding(MultiplierRounding::Exact);

        assert_eq!(config.flip_back_delay_ms, 500);
        assert_eq!(config.tick_interval_ms, TICK_INTERVAL_MS);
        assert_eq!(config.time_limit_ms, 60_000);
        assert_eq!(config.rounding, MultiplierRounding::Exact);
    }

    #[test]
    #[should_panic(expected = "non-zero")]
    fn test_zero_tick_interval_rejected() {
        let _ = RulesConfig::new().with_tick_interval(0);
    }
}
