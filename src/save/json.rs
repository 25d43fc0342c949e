//! JSON format.
//!
//! A single object with the scalar fields in canonical order, a `cards`
//! array of card objects and a `moveHistory` array of strings, pretty
//! printed with four-space indentation.

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};

use super::codec::FormatCodec;
use super::error::{DecodeError, EncodeError};
use super::fields::{keys, FieldValue, RawCard, RawSave, SaveDocument};
use super::format::SaveFormat;

/// Pretty-printed JSON object.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonCodec;

impl FormatCodec for JsonCodec {
    fn format(&self) -> SaveFormat {
        SaveFormat::Json
    }

    fn write(&self, doc: &SaveDocument<'_>) -> Result<Vec<u8>, EncodeError> {
        let mut out = Vec::new();
        let mut ser = serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"    "));
        Ordered(doc).serialize(&mut ser)?;
        out.push(b'\n');
        Ok(out)
    }

    fn read(&self, bytes: &[u8]) -> Result<RawSave, DecodeError> {
        let value: Value = serde_json::from_slice(bytes).map_err(|e| DecodeError::unreadable("json", e))?;
        let Value::Object(object) = value else {
            return Err(DecodeError::unreadable("json", "top-level value is not an object"));
        };

        let mut raw = RawSave::default();
        for (key, value) in &object {
            match key.as_str() {
                keys::CARDS => raw.cards = read_cards(value, &mut raw.issues),
                keys::MOVE_HISTORY => {}
                _ => {
                    if let Some(text) = scalar_text(value) {
                        raw.fields.insert(key.clone(), text);
                    }
                }
            }
        }
        Ok(raw)
    }
}

/// Serializes a document as a map so the field order is kept.
struct Ordered<'d, 'a>(&'d SaveDocument<'a>);

impl Serialize for Ordered<'_, '_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let doc = self.0;
        let mut map = serializer.serialize_map(Some(doc.scalars.len() + 2))?;
        for (key, value) in &doc.scalars {
            match value {
                FieldValue::Text(s) => map.serialize_entry(key, s)?,
                FieldValue::Int(n) => map.serialize_entry(key, n)?,
                FieldValue::Bool(b) => map.serialize_entry(key, b)?,
            }
        }
        map.serialize_entry(keys::CARDS, doc.cards)?;
        map.serialize_entry(keys::MOVE_HISTORY, doc.move_history)?;
        map.end()
    }
}

/// Text form of a scalar. `null` counts as absent; arrays and objects are
/// kept as their JSON text so they surface as malformed values.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

fn read_cards(value: &Value, issues: &mut Vec<DecodeError>) -> Option<Vec<RawCard>> {
    let items = match value {
        Value::Null => return None,
        Value::Array(items) => items,
        other => {
            issues.push(DecodeError::malformed(keys::CARDS, other.to_string()));
            return None;
        }
    };

    let mut cards = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        match item {
            Value::Object(fields) => cards.push(read_card(fields)),
            other => issues.push(DecodeError::malformed(format!("{}[{}]", keys::CARDS, i), other.to_string())),
        }
    }
    Some(cards)
}

fn read_card(fields: &Map<String, Value>) -> RawCard {
    let mut card = RawCard::default();
    for (key, value) in fields {
        if let Some(text) = scalar_text(value) {
            card.set(key, text);
        }
    }
    card
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Card;
    use crate::core::config::{Difficulty, GameMode};
    use crate::core::state::GameState;

    fn written(state: &GameState) -> String {
        String::from_utf8(JsonCodec.write(&SaveDocument::from_state(state)).unwrap()).unwrap()
    }

    #[test]
    fn test_write_key_order_and_types() {
        let mut state = GameState::blank(Difficulty::Easy, 6);
        state.game_mode = GameMode::TimeAttack;
        state.cards = vec![Card::new(2, 2)];

        let json = written(&state);
        let difficulty = json.find("\"difficulty\"").unwrap();
        let is_time_up = json.find("\"isTimeUp\"").unwrap();
        let cards = json.find("\"cards\"").unwrap();
        assert!(difficulty < is_time_up && is_time_up < cards);
        assert!(json.contains("\n    \"totalPairs\": 6,"));
        assert!(json.contains("\"gameMode\": \"timeAttack\""));

        let value: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["isGameOver"], Value::Bool(false));
        assert_eq!(value["cards"][0]["pairId"], 2);
        assert_eq!(value["moveHistory"][2], "Move 3");
    }

    #[test]
    fn test_read_accepts_strings_and_numbers() {
        let raw = JsonCodec
            .read(br#"{"difficulty":"hard","totalPairs":"10","moves":4,"score":null,"isTimeUp":true}"#)
            .unwrap();

        assert_eq!(raw.fields.get("totalPairs").map(String::as_str), Some("10"));
        assert_eq!(raw.fields.get("moves").map(String::as_str), Some("4"));
        assert_eq!(raw.fields.get("isTimeUp").map(String::as_str), Some("true"));
        assert!(!raw.fields.contains_key("score"));
        assert!(raw.cards.is_none());
    }

    #[test]
    fn test_read_cards() {
        let raw = JsonCodec
            .read(br#"{"cards":[{"id":1,"pairId":1,"isFlipped":false,"isMatched":false},7,{"id":2}]}"#)
            .unwrap();

        let cards = raw.cards.unwrap();
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0], RawCard::from_values("1", "1", "false", "false"));
        assert_eq!(cards[1].pair_id, None);
        assert_eq!(raw.issues, vec![DecodeError::malformed("cards[1]", "7")]);
    }

    #[test]
    fn test_read_nested_scalar_is_kept_as_text() {
        let raw = JsonCodec.read(br#"{"moves":[1,2]}"#).unwrap();
        assert_eq!(raw.fields.get("moves").map(String::as_str), Some("[1,2]"));
    }

    #[test]
    fn test_read_rejects_non_object() {
        assert!(matches!(JsonCodec.read(b"[1,2,3]"), Err(DecodeError::Unreadable { format: "json", .. })));
        assert!(matches!(JsonCodec.read(b"{\"difficulty\":"), Err(DecodeError::Unreadable { .. })));
    }
}
