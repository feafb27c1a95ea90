//! Turn Driver boundary between the obligation containers and a game.
//!
//! Games implement [`TurnDriver`] to define:
//! - How a move changes the game and which follow-ups it owes
//! - What each turn starts with
//! - What gets captured for undo
//!
//! The driver never interprets game-specific concepts; it only routes moves
//! through the obligations and decides when the turn is over.

pub mod driver;
pub mod observer;
pub mod undo;

pub use driver::{TurnDriver, TurnStatus};
pub use observer::{MoveEvent, MoveObserver, NoopObserver, RecordingObserver};
pub use undo::{Snapshot, UndoLog};
