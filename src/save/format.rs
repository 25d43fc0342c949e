//! Save file formats.

use serde::{Deserialize, Serialize};

/// A save file encoding. The extension doubles as the format name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveFormat {
    Txt,
    Xml,
    Json,
}

impl SaveFormat {
    /// All formats in load priority order: when one name exists in several
    /// formats, the earliest wins.
    pub const PRIORITY: [SaveFormat; 3] = [SaveFormat::Txt, SaveFormat::Xml, SaveFormat::Json];

    /// File extension, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            SaveFormat::Txt => "txt",
            SaveFormat::Xml => "xml",
            SaveFormat::Json => "json",
        }
    }

    /// Parse an extension (case-insensitive, no dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "txt" => Some(SaveFormat::Txt),
            "xml" => Some(SaveFormat::Xml),
            "json" => Some(SaveFormat::Json),
            _ => None,
        }
    }

    /// Split `name.ext` into base name and format.
    ///
    /// Returns `None` for names without a known extension or with an empty
    /// base name.
    pub fn split_file_name(file_name: &str) -> Option<(&str, Self)> {
        let (base, ext) = file_name.rsplit_once('.')?;
        if base.is_empty() {
            return None;
        }
        Some((base, Self::from_extension(ext)?))
    }

    /// `<base>.<ext>`
    pub fn file_name(&self, base: &str) -> String {
        format!("{}.{}", base, self.extension())
    }

    /// MIME type for share/open intents.
    pub fn mime_type(&self) -> &'static str {
        match self {
            SaveFormat::Txt => "text/plain",
            SaveFormat::Xml => "text/xml",
            SaveFormat::Json => "application/json",
        }
    }
}

impl std::fmt::Display for SaveFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}
