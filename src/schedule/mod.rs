//! Deferred work: the delayed flip resolution and the game clock.
//!
//! Everything runs on one logical timeline, single-threaded. The UI layer
//! calls `GameController::advance` from its frame or timer callback with the
//! real elapsed time; tests call it with whatever time they like.
//!
//! A clock tick that lands while two cards are face up never resolves them;
//! only the dedicated delayed task does.

mod controller;
mod timeline;

pub use controller::{GameController, GameEvent};
pub use timeline::{ScheduledTask, TaskId, TaskKind, Timeline};
