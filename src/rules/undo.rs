//! Undo by snapshot replay.
//!
//! Before each move the driver encodes its state with `bincode`. If the move
//! turns out undoable the snapshot is kept; a move that reveals information
//! (drawing a card, rolling) clears the log instead, since it must not be
//! taken back.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::core::WireError;

/// Encoded state captured before a move.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot(Vec<u8>);

impl Snapshot {
    pub fn encode<S: Serialize>(state: &S) -> Result<Self, WireError> {
        Ok(Self(bincode::serialize(state)?))
    }

    pub fn decode<S: DeserializeOwned>(&self) -> Result<S, WireError> {
        Ok(bincode::deserialize(&self.0)?)
    }

    #[must_use]
    pub fn size_bytes(&self) -> usize {
        self.0.len()
    }
}

/// Snapshots of undoable moves in the current turn, oldest first.
#[derive(Clone, Debug, Default)]
pub struct UndoLog {
    snapshots: Vec<Snapshot>,
}

impl UndoLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep the snapshot taken before an undoable move.
    pub fn record(&mut self, snapshot: Snapshot) {
        self.snapshots.push(snapshot);
    }

    /// Latest snapshot, removed from the log.
    pub fn pop(&mut self) -> Option<Snapshot> {
        self.snapshots.pop()
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.snapshots.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
    }
}
