//! Cards and dealing.
//!
//! A `Card` is one tile on the board. Two cards share each `pair_id`; the
//! player wins a pair by turning both face up in the same move.

use serde::{Deserialize, Serialize};

use crate::core::rng::GameRng;

/// A card on the board.
///
/// Serialized with camelCase keys; these are the card keys of every save
/// format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    /// Unique within a session, assigned at deal time.
    pub id: u32,

    /// Shared by exactly two cards.
    pub pair_id: u32,

    /// Face up?
    pub is_flipped: bool,

    /// Part of a found pair. Implies `is_flipped`.
    pub is_matched: bool,
}

impl Card {
    /// Create a face-down, unmatched card.
    #[must_use]
    pub const fn new(id: u32, pair_id: u32) -> Self {
        Self {
            id,
            pair_id,
            is_flipped: false,
            is_matched: false,
        }
    }

    /// Can this card be turned face up?
    #[must_use]
    pub fn is_selectable(&self) -> bool {
        !self.is_flipped && !self.is_matched
    }

    /// Mark matched. Matched cards stay face up.
    pub fn set_matched(&mut self) {
        self.is_matched = true;
        self.is_flipped = true;
    }
}

/// Deal a shuffled deck of `total_pairs` pairs.
///
/// Pair ids run `1..=total_pairs`; pair `p` gets card ids `2(p-1)` and
/// `2(p-1)+1`. The order is a uniform shuffle driven by `rng`.
#[must_use]
pub fn deal(total_pairs: u32, rng: &mut GameRng) -> Vec<Card> {
    let mut cards: Vec<Card> = (1..=total_pairs)
        .flat_map(|pair_id| {
            let first = (pair_id - 1) * 2;
            [Card::new(first, pair_id), Card::new(first + 1, pair_id)]
        })
        .collect();

    rng.shuffle(&mut cards);
    cards
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashMap;

    #[test]
    fn test_card_new() {
        let card = Card::new(3, 2);
        assert_eq!(card.id, 3);
        assert_eq!(card.pair_id, 2);
        assert!(!card.is_flipped);
        assert!(!card.is_matched);
        assert!(card.is_selectable());
    }

    #[test]
    fn test_set_matched_keeps_face_up() {
        let mut card = Card::new(0, 1);
        card.set_matched();
        assert!(card.is_flipped);
        assert!(card.is_matched);
        assert!(!card.is_selectable());
    }

    #[test]
    fn test_deal_pairs() {
        let mut rng = GameRng::new(7);
        let cards = deal(6, &mut rng);

        assert_eq!(cards.len(), 12);

        let mut counts: FxHashMap<u32, usize> = FxHashMap::default();
        for card in &cards {
            *counts.entry(card.pair_id).or_default() += 1;
            assert!(card.is_selectable());
        }
        assert_eq!(counts.len(), 6);
        assert!(counts.iter().all(|(pair, count)| (1..=6).contains(pair) && *count == 2));
    }

    #[test]
    fn test_deal_unique_ids() {
        let mut rng = GameRng::new(7);
        let mut ids: Vec<u32> = deal(10, &mut rng).iter().map(|c| c.id).collect();
        ids.sort_unstable();
        assert_eq!(ids, (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn test_deal_deterministic_under_seed() {
        let a = deal(8, &mut GameRng::new(99));
        let b = deal(8, &mut GameRng::new(99));
        let c = deal(8, &mut GameRng::new(100));

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_deal_zero_pairs() {
        assert!(deal(0, &mut GameRng::new(1)).is_empty());
    }

    #[test]
    fn test_card_serialization_keys() {
        let card = Card::new(4, 3);
        let json = serde_json::to_string(&card).unwrap();
        assert_eq!(json, r#"{"id":4,"pairId":3,"isFlipped":false,"isMatched":false}"#);

        let back: Card = serde_json::from_str(&json).unwrap();
        assert_eq!(back, card);
    }
}
