//! Game rules.
//!
//! `MatchRules` applies the session transitions (flip, resolve, tick,
//! completion) and the score formulas in `scoring`.
//!
//! Rules are pure: no clocks, no I/O. Timing is the scheduler's job.

pub mod engine;
pub mod scoring;

pub use engine::{FlipOutcome, MatchRules, Resolution};
pub use scoring::compute_score;
