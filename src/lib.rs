//! # tabletop-turns
//!
//! Turn obligations and resolution containers for turn-based tabletop games.
//!
//! ## Design Principles
//!
//! 1. **Game-Agnostic**: Obligations are generic over the game's own action
//!    type. Nothing in the algebra knows what a move does.
//!
//! 2. **Pure State Machines**: An obligation only changes through `perform`
//!    and `skip`, and a rejected call changes nothing.
//!
//! 3. **Game Owns the Effects**: The [`TurnDriver`] routes a move through the
//!    obligations, then lets the game execute it and push its follow-ups.
//!
//! ## Architecture
//!
//! - **Obligation Trees**: `Single`, `Choice`, `Any`, `Repeat` and `WhenThen`
//!   nodes compose into what a player owes or may do this turn.
//!
//! - **Persistent Data Structures**: Containers keep their obligations in
//!   `im` vectors, so snapshots for undo and atomic `skip_all` are cheap.
//!
//! - **Stable Wire Format**: Trees round-trip through camelCase JSON with
//!   action types stored by name.
//!
//! ## Modules
//!
//! - `core`: Action types, errors, move outcomes, players, RNG
//! - `obligation`: The obligation algebra and its JSON form
//! - `stack`: Stack and queue containers of top-level obligations
//! - `rules`: TurnDriver trait, move observers, undo snapshots
//! - `games`: Two small games driven end to end

pub mod core;
pub mod obligation;
pub mod stack;
pub mod rules;
pub mod games;

// Re-export commonly used types
pub use crate::core::{
    ActionType, ActionOutcome,
    ObligationError, WireError,
    PlayerId, PlayerMap,
    GameRng,
};

pub use crate::obligation::{ActionSet, Obligation};

pub use crate::stack::{ObligationContainer, ObligationQueue, ObligationStack, QueueSlot};

pub use crate::rules::{
    TurnDriver, TurnStatus,
    MoveEvent, MoveObserver, NoopObserver, RecordingObserver,
    Snapshot, UndoLog,
};
