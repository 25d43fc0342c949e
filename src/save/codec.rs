//! Format strategies and the encode/decode entry points.

use log::debug;

use super::error::{DecodeError, EncodeError};
use super::fields::{assemble, Decoded, RawSave, SaveDocument};
use super::format::SaveFormat;
use super::json::JsonCodec;
use super::txt::TxtCodec;
use super::xml::XmlCodec;
use crate::core::state::GameState;

/// One save encoding.
///
/// A codec only maps between bytes and the shared field list. Required
/// fields, defaults and card validation live in `assemble`, so every format
/// recovers from bad input the same way.
pub trait FormatCodec: Send + Sync {
    fn format(&self) -> SaveFormat;

    /// Serialize a document.
    fn write(&self, doc: &SaveDocument<'_>) -> Result<Vec<u8>, EncodeError>;

    /// Parse bytes into raw fields. Fails only when the document as a whole
    /// cannot be read.
    fn read(&self, bytes: &[u8]) -> Result<RawSave, DecodeError>;
}

static TXT: TxtCodec = TxtCodec;
static XML: XmlCodec = XmlCodec;
static JSON: JsonCodec = JsonCodec;

/// The codec for a format.
pub fn codec_for(format: SaveFormat) -> &'static dyn FormatCodec {
    match format {
        SaveFormat::Txt => &TXT,
        SaveFormat::Xml => &XML,
        SaveFormat::Json => &JSON,
    }
}

/// Encode a session.
pub fn encode(state: &GameState, format: SaveFormat) -> Result<Vec<u8>, EncodeError> {
    let bytes = codec_for(format).write(&SaveDocument::from_state(state))?;
    debug!("encoded {} session: {} bytes, {} cards", format, bytes.len(), state.cards.len());
    Ok(bytes)
}

/// Decode a session, applying defaults to malformed optional fields.
pub fn decode(bytes: &[u8], format: SaveFormat) -> Result<GameState, DecodeError> {
    decode_with_report(bytes, format).map(|decoded| decoded.state)
}

/// Decode a session and report every field that was recovered.
pub fn decode_with_report(bytes: &[u8], format: SaveFormat) -> Result<Decoded, DecodeError> {
    let raw = codec_for(format).read(bytes)?;
    assemble(raw)
}
