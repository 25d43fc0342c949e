//! Plain text format.
//!
//! ```text
//! difficulty=easy
//! totalPairs=6
//! ...
//! cards=3,2,false,false;0,1,true,true;...
//! moveHistory=Move 1;Move 2;Move 3
//! ```
//!
//! Values are not escaped; card fields are numeric or boolean so they never
//! contain `,` or `;`.

use super::codec::FormatCodec;
use super::error::{DecodeError, EncodeError};
use super::fields::{keys, RawCard, RawSave, SaveDocument};
use super::format::SaveFormat;

const CARD_SEPARATOR: char = ';';
const FIELD_SEPARATOR: char = ',';

/// `key=value` lines.
#[derive(Clone, Copy, Debug, Default)]
pub struct TxtCodec;

impl FormatCodec for TxtCodec {
    fn format(&self) -> SaveFormat {
        SaveFormat::Txt
    }

    fn write(&self, doc: &SaveDocument<'_>) -> Result<Vec<u8>, EncodeError> {
        let mut out = String::new();

        for (key, value) in &doc.scalars {
            out.push_str(&format!("{}={}\n", key, value));
        }

        let cards: Vec<String> = doc
            .cards
            .iter()
            .map(|c| format!("{},{},{},{}", c.id, c.pair_id, c.is_flipped, c.is_matched))
            .collect();
        out.push_str(&format!("{}={}\n", keys::CARDS, cards.join(";")));

        out.push_str(&format!("{}={}\n", keys::MOVE_HISTORY, doc.move_history.join(";")));

        Ok(out.into_bytes())
    }

    fn read(&self, bytes: &[u8]) -> Result<RawSave, DecodeError> {
        let text = std::str::from_utf8(bytes).map_err(|e| DecodeError::unreadable("txt", e))?;
        let mut raw = RawSave::default();

        // Later lines override earlier ones
        for line in text.lines() {
            if let Some((key, value)) = line.split_once('=') {
                raw.fields.insert(key.to_string(), value.to_string());
            }
        }

        if let Some(cards) = raw.fields.remove(keys::CARDS) {
            raw.cards = Some(parse_cards(&cards, &mut raw.issues));
        }
        raw.fields.remove(keys::MOVE_HISTORY);

        Ok(raw)
    }
}

/// Split the `cards=` value. Entries that are not exactly four
/// comma-separated values are skipped.
fn parse_cards(value: &str, issues: &mut Vec<DecodeError>) -> Vec<RawCard> {
    let mut cards = Vec::new();

    for (i, entry) in value.trim().split(CARD_SEPARATOR).enumerate() {
        if entry.is_empty() {
            continue;
        }
        match entry.split(FIELD_SEPARATOR).collect::<Vec<_>>().as_slice() {
            [id, pair_id, is_flipped, is_matched] => {
                cards.push(RawCard::from_values(id, pair_id, is_flipped, is_matched));
            }
            _ => issues.push(DecodeError::malformed(format!("{}[{}]", keys::CARDS, i), entry)),
        }
    }

    cards
}
