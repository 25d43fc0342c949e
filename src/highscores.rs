//! Best score per difficulty.
//!
//! Persisted as a flat JSON preferences object:
//!
//! ```json
//! { "high_score_easy": 550, "high_score_hard": 1200 }
//! ```
//!
//! A recorded score only replaces the stored one when it is higher.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::core::config::Difficulty;
use crate::save::error::{EncodeError, StorageError};
use crate::save::store::write_atomic;

/// Preferences file, relative to a store directory. Kept in a
/// subdirectory so it never shows up as a saved game.
pub const HIGH_SCORES_FILE: &str = "prefs/high_scores.json";

/// Per-difficulty high scores, optionally backed by a file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HighScores {
    #[serde(flatten)]
    scores: BTreeMap<String, i64>,
    #[serde(skip)]
    path: Option<PathBuf>,
}

impl HighScores {
    /// In-memory table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Preference key for a difficulty.
    pub fn key(difficulty: Difficulty) -> String {
        format!("high_score_{}", difficulty.as_str())
    }

    /// Load from `path`. A missing file starts empty; an unparsable one is
    /// logged and also starts empty, and is overwritten on the next record.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let mut scores = match fs::read(&path) {
            Ok(bytes) => match serde_json::from_slice::<HighScores>(&bytes) {
                Ok(scores) => {
                    info!("loaded {} high score(s) from {}", scores.scores.len(), path.display());
                    scores
                }
                Err(e) => {
                    warn!("ignoring unreadable high scores in {}: {}", path.display(), e);
                    Self::new()
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => Self::new(),
            Err(e) => return Err(StorageError::io(&path, e)),
        };
        scores.path = Some(path);
        Ok(scores)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Best score for `difficulty`, 0 when none was recorded.
    pub fn get(&self, difficulty: Difficulty) -> i64 {
        self.scores.get(&Self::key(difficulty)).copied().unwrap_or(0)
    }

    /// Record a finished game's score. Returns true when it is a new high
    /// score; the file, if any, is only rewritten in that case.
    pub fn record(&mut self, difficulty: Difficulty, score: i64) -> Result<bool, StorageError> {
        if score <= self.get(difficulty) {
            return Ok(false);
        }

        self.scores.insert(Self::key(difficulty), score);
        info!("new {} high score: {}", difficulty, score);
        self.persist()?;
        Ok(true)
    }

    fn persist(&self) -> Result<(), StorageError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e))?;
        }
        let bytes = serde_json::to_vec_pretty(self).map_err(EncodeError::from)?;
        write_atomic(path, &bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_keys() {
        assert_eq!(HighScores::key(Difficulty::Easy), "high_score_easy");
        assert_eq!(HighScores::key(Difficulty::Hard), "high_score_hard");
    }

    #[test]
    fn test_record_is_monotonic() {
        let mut scores = HighScores::new();
        assert_eq!(scores.get(Difficulty::Medium), 0);

        assert!(scores.record(Difficulty::Medium, 300).unwrap());
        assert!(!scores.record(Difficulty::Medium, 200).unwrap());
        assert!(!scores.record(Difficulty::Medium, 300).unwrap());
        assert_eq!(scores.get(Difficulty::Medium), 300);
        assert_eq!(scores.get(Difficulty::Easy), 0);
    }

    #[test]
    fn test_zero_score_is_not_recorded() {
        let mut scores = HighScores::new();
        assert!(!scores.record(Difficulty::Easy, 0).unwrap());
    }

    #[test]
    fn test_persist_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(HIGH_SCORES_FILE);

        let mut scores = HighScores::load(&path).unwrap();
        scores.record(Difficulty::Hard, 1200).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"high_score_hard\": 1200"));

        let reloaded = HighScores::load(&path).unwrap();
        assert_eq!(reloaded.get(Difficulty::Hard), 1200);
        assert_eq!(reloaded.path(), Some(path.as_path()));
    }

    #[test]
    fn test_corrupt_file_starts_fresh() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("high_scores.json");
        fs::write(&path, "not json").unwrap();

        let mut scores = HighScores::load(&path).unwrap();
        assert_eq!(scores.get(Difficulty::Easy), 0);
        assert!(scores.record(Difficulty::Easy, 50).unwrap());
        assert_eq!(HighScores::load(&path).unwrap().get(Difficulty::Easy), 50);
    }
}
