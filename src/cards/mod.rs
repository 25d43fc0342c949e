//! Card system: the board tiles and the dealer.
//!
//! ## Key Types
//!
//! - `Card`: One tile (id, pair id, face-up and matched flags)
//! - `deal`: Builds a shuffled deck from a pair count

pub mod card;

pub use card::{deal, Card};
