//! Observation of turn progress.
//!
//! A [`MoveObserver`] is handed to every driver call, so the caller decides
//! per call who watches (a replay recorder, a UI, nothing). All hooks
//! default to doing nothing.

use crate::core::{ActionOutcome, ActionType, PlayerId};

/// Hooks called by [`super::TurnDriver`] after each state change.
///
/// The event sequence within one turn is any number of `on_performed` /
/// `on_skipped` calls followed by exactly one `on_turn_ended`.
pub trait MoveObserver<A: ActionType> {
    /// A move was executed and its obligation consumed.
    fn on_performed(&mut self, _player: PlayerId, _action: A, _outcome: &ActionOutcome<A>) {}

    /// The obligation in focus was skipped.
    fn on_skipped(&mut self, _player: PlayerId) {}

    /// `player`'s turn is over and `next` is up.
    fn on_turn_ended(&mut self, _player: PlayerId, _next: PlayerId) {}
}

/// Observer that ignores everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl<A: ActionType> MoveObserver<A> for NoopObserver {}

/// One observed event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MoveEvent<A: ActionType> {
    Performed {
        player: PlayerId,
        action: A,
        follow_ups: usize,
        undo_allowed: bool,
    },
    Skipped {
        player: PlayerId,
    },
    TurnEnded {
        player: PlayerId,
        next: PlayerId,
    },
}

/// Observer that keeps every event, in order.
#[derive(Clone, Debug)]
pub struct RecordingObserver<A: ActionType> {
    events: Vec<MoveEvent<A>>,
}

impl<A: ActionType> RecordingObserver<A> {
    #[must_use]
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    #[must_use]
    pub fn events(&self) -> &[MoveEvent<A>] {
        &self.events
    }

    /// Actions performed so far, in order.
    pub fn performed_actions(&self) -> impl Iterator<Item = A> + '_ {
        self.events.iter().filter_map(|event| match event {
            MoveEvent::Performed { action, .. } => Some(*action),
            _ => None,
        })
    }

    #[must_use]
    pub fn turns_ended(&self) -> usize {
        self.events
            .iter()
            .filter(|event| matches!(event, MoveEvent::TurnEnded { .. }))
            .count()
    }
}

impl<A: ActionType> Default for RecordingObserver<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: ActionType> MoveObserver<A> for RecordingObserver<A> {
    fn on_performed(&mut self, player: PlayerId, action: A, outcome: &ActionOutcome<A>) {
        self.events.push(MoveEvent::Performed {
            player,
            action,
            follow_ups: outcome.obligations().len(),
            undo_allowed: outcome.undo_allowed(),
        });
    }

    fn on_skipped(&mut self, player: PlayerId) {
        self.events.push(MoveEvent::Skipped { player });
    }

    fn on_turn_ended(&mut self, player: PlayerId, next: PlayerId) {
        self.events.push(MoveEvent::TurnEnded { player, next });
    }
}
