//! Directory-backed save store.
//!
//! Each save is one file, `<name>.<ext>`, directly inside the store
//! directory. The same name may exist in several formats at once; loading
//! picks the first in `SaveFormat::PRIORITY`.
//!
//! Writes go to a temporary file in the same directory which is then renamed
//! over the target, so a crash mid-write never leaves a truncated save.

use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::codec::{decode, encode};
use super::error::{ImportError, StorageError};
use super::format::SaveFormat;
use crate::core::state::GameState;

/// Where saves live.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    pub dir: PathBuf,
}

impl StoreConfig {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

/// One file in the store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedGameInfo {
    /// Base name, without extension.
    pub name: String,
    pub format: SaveFormat,
    /// Modification time in ms since the Unix epoch; 0 if unavailable.
    pub last_modified_ms: u64,
}

/// Saves in one directory.
#[derive(Clone, Debug)]
pub struct SaveStore {
    dir: PathBuf,
}

impl SaveStore {
    /// Open a store, creating its directory if needed.
    pub fn open(config: StoreConfig) -> Result<Self, StorageError> {
        fs::create_dir_all(&config.dir).map_err(|e| StorageError::io(&config.dir, e))?;
        Ok(Self { dir: config.dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of `name` in `format`. The file need not exist.
    pub fn path_for(&self, name: &str, format: SaveFormat) -> Result<PathBuf, StorageError> {
        check_name(name)?;
        Ok(self.dir.join(format.file_name(name)))
    }

    /// Write `state` as `<name>.<ext>`, replacing any previous file in that
    /// format. Other formats under the same name are left alone.
    pub fn save(&self, state: &GameState, format: SaveFormat, name: &str) -> Result<PathBuf, StorageError> {
        let path = self.path_for(name, format)?;
        let bytes = encode(state, format)?;
        write_atomic(&path, &bytes)?;
        debug!("saved '{}' as {} ({} bytes)", name, format, bytes.len());
        Ok(path)
    }

    /// First format, in priority order, that has a file under `name`.
    pub fn detect_format(&self, name: &str) -> Result<SaveFormat, StorageError> {
        for format in SaveFormat::PRIORITY {
            if self.path_for(name, format)?.is_file() {
                return Ok(format);
            }
        }
        Err(StorageError::NotFound(name.to_string()))
    }

    /// Load `name` in its highest-priority format.
    pub fn load(&self, name: &str) -> Result<GameState, StorageError> {
        let format = self.detect_format(name)?;
        let path = self.path_for(name, format)?;
        let bytes = fs::read(&path).map_err(|e| StorageError::io(&path, e))?;

        let state = decode(&bytes, format).map_err(|source| StorageError::Decode {
            name: name.to_string(),
            source,
        })?;
        debug!(
            "loaded '{}' from {}: {} cards, {}/{} pairs",
            name,
            format,
            state.cards.len(),
            state.matched_pairs,
            state.total_pairs
        );
        Ok(state)
    }

    /// File contents as text, for display. Invalid UTF-8 is replaced.
    pub fn read_raw(&self, name: &str, format: SaveFormat) -> Result<String, StorageError> {
        let path = self.path_for(name, format)?;
        match fs::read(&path) {
            Ok(bytes) => Ok(String::from_utf8_lossy(&bytes).into_owned()),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StorageError::NotFound(format.file_name(name))),
            Err(e) => Err(StorageError::io(&path, e)),
        }
    }

    /// Every save file, sorted by name then format priority. Files without a
    /// known extension are ignored.
    pub fn list(&self) -> Result<Vec<SavedGameInfo>, StorageError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StorageError::io(&self.dir, e)),
        };

        let mut saves = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StorageError::io(&self.dir, e))?;
            let file_name = entry.file_name();
            let Some((name, format)) = file_name.to_str().and_then(SaveFormat::split_file_name) else {
                continue;
            };
            let Ok(metadata) = entry.metadata() else {
                continue;
            };
            if !metadata.is_file() {
                continue;
            }

            let last_modified_ms = metadata
                .modified()
                .ok()
                .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
                .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX));

            saves.push(SavedGameInfo {
                name: name.to_string(),
                format,
                last_modified_ms,
            });
        }

        saves.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| priority(a.format).cmp(&priority(b.format))));
        Ok(saves)
    }

    /// Remove `name` in every format. Returns the formats removed.
    pub fn delete(&self, name: &str) -> Result<Vec<SaveFormat>, StorageError> {
        let mut removed = Vec::new();
        for format in SaveFormat::PRIORITY {
            let path = self.path_for(name, format)?;
            match fs::remove_file(&path) {
                Ok(()) => removed.push(format),
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(StorageError::io(&path, e)),
            }
        }

        if removed.is_empty() {
            return Err(StorageError::NotFound(name.to_string()));
        }
        info!("deleted '{}' ({} file(s))", name, removed.len());
        Ok(removed)
    }

    /// Bring an outside file into the store.
    ///
    /// The extension of `declared_name` (case-insensitive) selects the
    /// format; any directory part is dropped. Content that does not decode
    /// is rejected before anything is written, so an existing save of the
    /// same name is left as it was.
    pub fn import_external(&self, bytes: &[u8], declared_name: &str) -> Result<GameState, ImportError> {
        let file_name = Path::new(declared_name)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(declared_name);
        let (name, format) = SaveFormat::split_file_name(file_name)
            .ok_or_else(|| ImportError::UnsupportedFormat(declared_name.to_string()))?;
        let path = self.path_for(name, format)?;

        let state = match decode(bytes, format) {
            Ok(state) => state,
            Err(source) => {
                info!("rejected import of '{}': {}", declared_name, source);
                return Err(ImportError::InvalidContent {
                    name: declared_name.to_string(),
                    source,
                });
            }
        };

        write_atomic(&path, bytes)?;
        info!("imported '{}' as {}", declared_name, format.file_name(name));
        Ok(state)
    }
}

fn priority(format: SaveFormat) -> usize {
    SaveFormat::PRIORITY.iter().position(|f| *f == format).unwrap_or(usize::MAX)
}

fn check_name(name: &str) -> Result<(), StorageError> {
    let invalid = name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']);
    if invalid {
        return Err(StorageError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// Write via a temporary sibling and rename it over `path`.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), StorageError> {
    let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or("save");
    let tmp_path = path.with_file_name(format!(".{}.tmp", file_name));

    write_then_rename(&tmp_path, path, bytes).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        StorageError::io(path, e)
    })
}

fn write_then_rename(tmp_path: &Path, path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut tmp = File::create(tmp_path)?;
    tmp.write_all(bytes)?;
    tmp.sync_all()?;
    drop(tmp);
    fs::rename(tmp_path, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Difficulty;
    use tempfile::TempDir;

    fn store() -> (TempDir, SaveStore) {
        let dir = TempDir::new().unwrap();
        let store = SaveStore::open(StoreConfig::new(dir.path().join("saves"))).unwrap();
        (dir, store)
    }

    #[test]
    fn test_open_creates_directory() {
        let (_dir, store) = store();
        assert!(store.dir().is_dir());
    }

    #[test]
    fn test_save_leaves_no_temp_file() {
        let (_dir, store) = store();
        let path = store.save(&GameState::blank(Difficulty::Easy, 6), SaveFormat::Xml, "slot").unwrap();

        assert_eq!(path, store.dir().join("slot.xml"));
        let names: Vec<_> = fs::read_dir(store.dir()).unwrap().map(|e| e.unwrap().file_name()).collect();
        assert_eq!(names, vec![std::ffi::OsString::from("slot.xml")]);
    }

    #[test]
    fn test_invalid_names() {
        let (_dir, store) = store();
        let state = GameState::blank(Difficulty::Easy, 6);
        for name in ["", "..", "a/b", "a\\b"] {
            assert!(matches!(
                store.save(&state, SaveFormat::Txt, name),
                Err(StorageError::InvalidName(_))
            ));
        }
    }

    #[test]
    fn test_read_raw_missing() {
        let (_dir, store) = store();
        assert!(matches!(
            store.read_raw("ghost", SaveFormat::Json),
            Err(StorageError::NotFound(n)) if n == "ghost.json"
        ));
    }

    #[test]
    fn test_list_ignores_foreign_files() {
        let (_dir, store) = store();
        fs::write(store.dir().join("notes.md"), "x").unwrap();
        fs::write(store.dir().join(".slot.txt.tmp"), "x").unwrap();
        fs::create_dir(store.dir().join("folder.json")).unwrap();
        store.save(&GameState::blank(Difficulty::Easy, 6), SaveFormat::Json, "slot").unwrap();

        let saves = store.list().unwrap();
        assert_eq!(saves.len(), 1);
        assert_eq!(saves[0].name, "slot");
        assert!(saves[0].last_modified_ms > 0);
    }

    #[test]
    fn test_import_strips_directories() {
        let (_dir, store) = store();
        let state = store
            .import_external(b"difficulty=hard\ntotalPairs=10\n", "/downloads/shared.TXT")
            .unwrap();

        assert_eq!(state.difficulty, Difficulty::Hard);
        assert!(store.dir().join("shared.txt").is_file());
    }
}
