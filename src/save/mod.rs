//! Save files.
//!
//! ## Formats
//!
//! A session can be written as plain text, XML or JSON. All three carry the
//! same fields under the same names (see `fields::keys`) and decode through
//! the same default table, so a file produced by one format converts cleanly
//! into any other.
//!
//! ## Layers
//!
//! - `FormatCodec`: bytes <-> raw fields, one strategy per format
//! - `fields::assemble`: raw fields -> `GameState` (required fields, defaults,
//!   card validation)
//! - `SaveStore`: named saves in a directory, format detection, import

pub mod codec;
pub mod error;
pub mod fields;
pub mod format;
pub mod json;
pub mod store;
pub mod txt;
pub mod xml;

pub use codec::{codec_for, decode, decode_with_report, encode, FormatCodec};
pub use error::{DecodeError, EncodeError, ImportError, StorageError};
pub use fields::{Decoded, SaveDocument};
pub use format::SaveFormat;
pub use store::{SaveStore, SavedGameInfo, StoreConfig};
