//! The field list and default table shared by every save format.
//!
//! Encoding goes through `SaveDocument`, the ordered list of scalar fields
//! plus the card sequence. Decoding goes the other way: a format only has to
//! turn its bytes into a `RawSave` (field name -> text, raw cards); `assemble`
//! applies the required fields, the defaults, and the card rules once for all
//! formats.

use log::warn;
use rustc_hash::FxHashMap;

use super::error::DecodeError;
use crate::cards::Card;
use crate::core::config::{Difficulty, GameMode, DEFAULT_TIME_LIMIT_MS};
use crate::core::state::GameState;

/// Field names. Case-sensitive and stable across formats.
pub mod keys {
    pub const ROOT: &str = "gameState";
    pub const DIFFICULTY: &str = "difficulty";
    pub const TOTAL_PAIRS: &str = "totalPairs";
    pub const MATCHED_PAIRS: &str = "matchedPairs";
    pub const MOVES: &str = "moves";
    pub const TIME_ELAPSED: &str = "timeElapsed";
    pub const IS_GAME_OVER: &str = "isGameOver";
    pub const SCORE: &str = "score";
    pub const GAME_MODE: &str = "gameMode";
    pub const TIME_LIMIT: &str = "timeLimit";
    pub const IS_TIME_UP: &str = "isTimeUp";
    pub const CARDS: &str = "cards";
    pub const CARD: &str = "card";
    pub const MOVE_HISTORY: &str = "moveHistory";
    pub const MOVE: &str = "move";

    pub const CARD_ID: &str = "id";
    pub const CARD_PAIR_ID: &str = "pairId";
    pub const CARD_IS_FLIPPED: &str = "isFlipped";
    pub const CARD_IS_MATCHED: &str = "isMatched";
}

/// Placeholder move history written by every format. Never read back.
pub const PLACEHOLDER_MOVES: [&str; 3] = ["Move 1", "Move 2", "Move 3"];

/// A scalar field value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldValue {
    Text(&'static str),
    Int(i64),
    Bool(bool),
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Int(n) => write!(f, "{}", n),
            FieldValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

/// Everything a format writes, in write order.
#[derive(Clone, Debug)]
pub struct SaveDocument<'a> {
    pub scalars: [(&'static str, FieldValue); 10],
    pub cards: &'a [Card],
    pub move_history: &'static [&'static str],
}

impl<'a> SaveDocument<'a> {
    pub fn from_state(state: &'a GameState) -> Self {
        use keys::*;

        let scalars = [
            (DIFFICULTY, FieldValue::Text(state.difficulty.as_str())),
            (TOTAL_PAIRS, FieldValue::Int(i64::from(state.total_pairs))),
            (MATCHED_PAIRS, FieldValue::Int(i64::from(state.matched_pairs))),
            (MOVES, FieldValue::Int(i64::from(state.moves))),
            (TIME_ELAPSED, FieldValue::Int(clamp_u64(state.time_elapsed_ms))),
            (IS_GAME_OVER, FieldValue::Bool(state.is_game_over)),
            (SCORE, FieldValue::Int(state.score)),
            (GAME_MODE, FieldValue::Text(state.game_mode.as_str())),
            (TIME_LIMIT, FieldValue::Int(clamp_u64(state.time_limit_ms))),
            (IS_TIME_UP, FieldValue::Bool(state.is_time_up)),
        ];

        Self {
            scalars,
            cards: &state.cards,
            move_history: &PLACEHOLDER_MOVES,
        }
    }
}

fn clamp_u64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// A card as read from a document, before validation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawCard {
    pub id: Option<String>,
    pub pair_id: Option<String>,
    pub is_flipped: Option<String>,
    pub is_matched: Option<String>,
}

impl RawCard {
    /// Build from the four positional values (txt order).
    pub fn from_values(id: &str, pair_id: &str, is_flipped: &str, is_matched: &str) -> Self {
        Self {
            id: Some(id.to_string()),
            pair_id: Some(pair_id.to_string()),
            is_flipped: Some(is_flipped.to_string()),
            is_matched: Some(is_matched.to_string()),
        }
    }

    /// Set a field by its key. Unknown keys are ignored.
    pub fn set(&mut self, key: &str, value: String) {
        let slot = match key {
            keys::CARD_ID => &mut self.id,
            keys::CARD_PAIR_ID => &mut self.pair_id,
            keys::CARD_IS_FLIPPED => &mut self.is_flipped,
            keys::CARD_IS_MATCHED => &mut self.is_matched,
            _ => return,
        };
        slot.get_or_insert(value);
    }
}

/// A document as read by a format, before defaults are applied.
#[derive(Clone, Debug, Default)]
pub struct RawSave {
    /// Scalar fields as text.
    pub fields: FxHashMap<String, String>,
    /// `None` when the document has no card list at all.
    pub cards: Option<Vec<RawCard>>,
    /// Problems the format already recovered from (skipped entries).
    pub issues: Vec<DecodeError>,
}

impl RawSave {
    fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(|v| v.trim())
    }
}

/// A decoded session plus every field that had to be recovered.
#[derive(Clone, Debug)]
pub struct Decoded {
    pub state: GameState,
    pub recovered: Vec<DecodeError>,
}

/// Apply the required fields, default table and card rules.
pub fn assemble(raw: RawSave) -> Result<Decoded, DecodeError> {
    use keys::*;

    let difficulty = raw
        .get(DIFFICULTY)
        .and_then(Difficulty::from_name)
        .ok_or(DecodeError::MissingRequiredField(DIFFICULTY))?;
    let total_pairs = raw
        .get(TOTAL_PAIRS)
        .and_then(|v| v.parse::<u32>().ok())
        .ok_or(DecodeError::MissingRequiredField(TOTAL_PAIRS))?;

    let mut issues = raw.issues.clone();
    let mut state = GameState::blank(difficulty, total_pairs);

    state.matched_pairs = recover(&raw, MATCHED_PAIRS, 0, parse_int, &mut issues);
    state.moves = recover(&raw, MOVES, 0, parse_int, &mut issues);
    state.time_elapsed_ms = recover(&raw, TIME_ELAPSED, 0, parse_int, &mut issues);
    state.is_game_over = recover(&raw, IS_GAME_OVER, false, parse_bool, &mut issues);
    state.score = recover(&raw, SCORE, 0, parse_int, &mut issues);
    state.game_mode = recover(&raw, GAME_MODE, GameMode::Classic, GameMode::from_name, &mut issues);
    state.time_limit_ms = recover(&raw, TIME_LIMIT, DEFAULT_TIME_LIMIT_MS, parse_int, &mut issues);
    state.is_time_up = recover(&raw, IS_TIME_UP, false, parse_bool, &mut issues);

    if let Some(cards) = &raw.cards {
        state.cards = cards
            .iter()
            .enumerate()
            .filter_map(|(i, card)| build_card(i, card, &mut issues))
            .collect();
    }

    for issue in &issues {
        warn!("recovered while decoding: {}", issue);
    }

    Ok(Decoded {
        state,
        recovered: issues,
    })
}

/// Value for `key`, or `default` when absent. Unparsable values also fall
/// back to `default` and are recorded.
fn recover<T>(
    raw: &RawSave,
    key: &str,
    default: T,
    parse: impl Fn(&str) -> Option<T>,
    issues: &mut Vec<DecodeError>,
) -> T {
    match raw.get(key) {
        None => default,
        Some(value) => parse(value).unwrap_or_else(|| {
            issues.push(DecodeError::malformed(key, value));
            default
        }),
    }
}

fn parse_int<T: std::str::FromStr>(value: &str) -> Option<T> {
    value.trim().parse().ok()
}

fn parse_bool(value: &str) -> Option<bool> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("true") {
        Some(true)
    } else if value.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Validate one raw card.
///
/// A card missing any of its four fields is skipped. Unparsable numbers
/// become 0 and unparsable flags become false. A matched card is always
/// face up.
fn build_card(index: usize, raw: &RawCard, issues: &mut Vec<DecodeError>) -> Option<Card> {
    let field = |key: &str| format!("{}[{}].{}", keys::CARDS, index, key);

    let (Some(id), Some(pair_id), Some(is_flipped), Some(is_matched)) =
        (&raw.id, &raw.pair_id, &raw.is_flipped, &raw.is_matched)
    else {
        issues.push(DecodeError::malformed(format!("{}[{}]", keys::CARDS, index), "incomplete card"));
        return None;
    };

    let mut number = |key: &str, value: &str| {
        parse_int::<u32>(value).unwrap_or_else(|| {
            issues.push(DecodeError::malformed(field(key), value));
            0
        })
    };
    let id = number(keys::CARD_ID, id.as_str());
    let pair_id = number(keys::CARD_PAIR_ID, pair_id.as_str());

    let mut flag = |key: &str, value: &str| {
        parse_bool(value).unwrap_or_else(|| {
            issues.push(DecodeError::malformed(field(key), value));
            false
        })
    };
    let mut card = Card {
        id,
        pair_id,
        is_flipped: flag(keys::CARD_IS_FLIPPED, is_flipped.as_str()),
        is_matched: flag(keys::CARD_IS_MATCHED, is_matched.as_str()),
    };

    if card.is_matched && !card.is_flipped {
        issues.push(DecodeError::malformed(field(keys::CARD_IS_FLIPPED), "false (matched card)"));
        card.set_matched();
    }
    Some(card)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(fields: &[(&str, &str)]) -> RawSave {
        RawSave {
            fields: fields.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
            ..RawSave::default()
        }
    }

    #[test]
    fn test_document_field_order() {
        let state = GameState::blank(Difficulty::Hard, 10);
        let doc = SaveDocument::from_state(&state);
        let names: Vec<_> = doc.scalars.iter().map(|(k, _)| *k).collect();

        assert_eq!(
            names,
            vec![
                "difficulty",
                "totalPairs",
                "matchedPairs",
                "moves",
                "timeElapsed",
                "isGameOver",
                "score",
                "gameMode",
                "timeLimit",
                "isTimeUp"
            ]
        );
        assert_eq!(doc.scalars[0].1.to_string(), "hard");
        assert_eq!(doc.scalars[5].1.to_string(), "false");
    }

    #[test]
    fn test_required_fields() {
        assert_eq!(
            assemble(raw(&[("totalPairs", "6")])).unwrap_err(),
            DecodeError::MissingRequiredField("difficulty")
        );
        assert_eq!(
            assemble(raw(&[("difficulty", "easy")])).unwrap_err(),
            DecodeError::MissingRequiredField("totalPairs")
        );
        assert_eq!(
            assemble(raw(&[("difficulty", "easy"), ("totalPairs", "six")])).unwrap_err(),
            DecodeError::MissingRequiredField("totalPairs")
        );
        assert_eq!(
            assemble(raw(&[("difficulty", "impossible"), ("totalPairs", "6")])).unwrap_err(),
            DecodeError::MissingRequiredField("difficulty")
        );
    }

    #[test]
    fn test_defaults_when_absent() {
        let decoded = assemble(raw(&[("difficulty", "medium"), ("totalPairs", "8")])).unwrap();
        let state = decoded.state;

        assert_eq!(state.difficulty, Difficulty::Medium);
        assert_eq!(state.total_pairs, 8);
        assert_eq!(state.matched_pairs, 0);
        assert_eq!(state.moves, 0);
        assert_eq!(state.time_elapsed_ms, 0);
        assert!(!state.is_game_over);
        assert_eq!(state.score, 0);
        assert_eq!(state.game_mode, GameMode::Classic);
        assert_eq!(state.time_limit_ms, 30_000);
        assert!(!state.is_time_up);
        assert!(state.cards.is_empty());
        assert!(decoded.recovered.is_empty());
    }

    #[test]
    fn test_malformed_fields_recovered() {
        let decoded = assemble(raw(&[
            ("difficulty", "easy"),
            ("totalPairs", " 6 "),
            ("moves", "many"),
            ("gameMode", "arcade"),
            ("isTimeUp", "TRUE"),
        ]))
        .unwrap();

        assert_eq!(decoded.state.total_pairs, 6);
        assert_eq!(decoded.state.moves, 0);
        assert_eq!(decoded.state.game_mode, GameMode::Classic);
        assert!(decoded.state.is_time_up);
        assert_eq!(decoded.recovered.len(), 2);
        assert!(decoded.recovered.contains(&DecodeError::malformed("moves", "many")));
    }

    #[test]
    fn test_cards_rules() {
        let mut save = raw(&[("difficulty", "easy"), ("totalPairs", "6")]);
        save.cards = Some(vec![
            RawCard::from_values("0", "1", "true", "true"),
            RawCard::from_values("x", "1", "false", "false"),
            RawCard {
                id: Some("2".into()),
                ..RawCard::default()
            },
            RawCard::from_values("3", "2", "false", "true"),
        ]);

        let decoded = assemble(save).unwrap();
        let cards = decoded.state.cards;

        assert_eq!(cards.len(), 3);
        assert_eq!(cards[0], Card { id: 0, pair_id: 1, is_flipped: true, is_matched: true });
        assert_eq!(cards[1].id, 0);
        assert_eq!(cards[2], Card { id: 3, pair_id: 2, is_flipped: true, is_matched: true });
        assert_eq!(decoded.recovered.len(), 3);
    }

    #[test]
    fn test_raw_card_set_first_wins() {
        let mut card = RawCard::default();
        card.set("id", "4".into());
        card.set("id", "5".into());
        card.set("color", "red".into());
        assert_eq!(card.id.as_deref(), Some("4"));
    }
}
