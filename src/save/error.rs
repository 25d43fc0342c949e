//! Save and load errors.
//!
//! Per-field decode problems are recovered with defaults and only reported
//! (as `DecodeError::Malformed` entries in a `Decoded` report). Everything
//! else here is surfaced to the caller.

use std::path::PathBuf;

use thiserror::Error;

/// Decoding a save document failed, or a field had to be recovered.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// `difficulty` or `totalPairs` is absent or unparsable.
    #[error("missing or unparsable required field `{0}`")]
    MissingRequiredField(&'static str),

    /// A field is present but unusable; it was replaced by its default.
    #[error("malformed value {value:?} for `{field}`, using default")]
    Malformed { field: String, value: String },

    /// The document itself cannot be read (encoding or syntax).
    #[error("unreadable {format} document: {message}")]
    Unreadable { format: &'static str, message: String },
}

impl DecodeError {
    pub(crate) fn malformed(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Malformed {
            field: field.into(),
            value: value.into(),
        }
    }

    pub(crate) fn unreadable(format: &'static str, message: impl std::fmt::Display) -> Self {
        Self::Unreadable {
            format,
            message: message.to_string(),
        }
    }
}

/// Encoding a session failed.
#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("XML write error: {0}")]
    Xml(String),

    #[error("JSON write error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Save directory access failed.
#[derive(Error, Debug)]
pub enum StorageError {
    /// No save with this name in any known format.
    #[error("no saved game named '{0}'")]
    NotFound(String),

    /// Names must be non-empty and a single path component.
    #[error("invalid save name '{0}'")]
    InvalidName(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Encode(#[from] EncodeError),

    /// A save file exists but does not decode.
    #[error("saved game '{name}' is corrupt: {source}")]
    Decode {
        name: String,
        #[source]
        source: DecodeError,
    },
}

impl StorageError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Importing an external file failed. Nothing is left behind.
#[derive(Error, Debug)]
pub enum ImportError {
    /// The declared name has no `.txt`, `.xml` or `.json` extension.
    #[error("unsupported save format for '{0}'")]
    UnsupportedFormat(String),

    /// The bytes do not decode as a saved game.
    #[error("'{name}' does not contain a valid saved game: {source}")]
    InvalidContent {
        name: String,
        #[source]
        source: DecodeError,
    },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            DecodeError::MissingRequiredField("totalPairs").to_string(),
            "missing or unparsable required field `totalPairs`"
        );
        assert_eq!(
            ImportError::UnsupportedFormat("save.bin".into()).to_string(),
            "unsupported save format for 'save.bin'"
        );
        assert_eq!(StorageError::NotFound("slot1".into()).to_string(), "no saved game named 'slot1'");
    }

    #[test]
    fn test_malformed_constructor() {
        assert_eq!(
            DecodeError::malformed("moves", "lots"),
            DecodeError::Malformed {
                field: "moves".into(),
                value: "lots".into(),
            }
        );
    }
}
