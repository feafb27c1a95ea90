//! The Turn Driver boundary.
//!
//! Games implement [`TurnDriver`] to plug their move execution into the
//! obligation containers:
//! - Which container holds the active player's obligations
//! - What a move does to the game and which follow-ups it owes
//! - What a new turn starts with
//!
//! The provided methods run the shared flow: consume the obligation, execute
//! the move, push its follow-ups, keep or drop the undo snapshot, and end the
//! turn once nothing is left.

use tracing::debug;

use crate::core::{ActionOutcome, ActionType, GameRng, ObligationError, PlayerId, WireError};
use crate::obligation::ActionSet;
use crate::stack::ObligationContainer;

use super::observer::MoveObserver;
use super::undo::{Snapshot, UndoLog};

/// Whether the active player keeps the turn after a call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnStatus {
    /// The same player still has something to do.
    Continues,
    /// The turn passed to `next`.
    Ended { next: PlayerId },
}

/// Turn driver trait.
///
/// ## Implementation Notes
///
/// - `execute`: validate and apply the game effect of one move. It runs
///   after the obligation is consumed and may reshape the container (e.g.
///   clear stale obligations). On error the driver restores the snapshot
///   taken before the move.
/// - `snapshot`/`restore`: encode everything a move may change (game state,
///   obligations, RNG position) for undo.
/// - `start_next_turn`: advance the active player and push the opening
///   obligations of their turn.
pub trait TurnDriver {
    type Action: ActionType;
    type Container: ObligationContainer<Self::Action>;
    type Error: From<ObligationError> + From<WireError>;

    fn obligations(&self) -> &Self::Container;

    fn obligations_mut(&mut self) -> &mut Self::Container;

    fn current_player(&self) -> PlayerId;

    fn undo_log(&mut self) -> &mut UndoLog;

    fn execute(
        &mut self,
        action: Self::Action,
        rng: &mut GameRng,
    ) -> Result<ActionOutcome<Self::Action>, Self::Error>;

    fn snapshot(&self) -> Result<Snapshot, WireError>;

    fn restore(&mut self, snapshot: &Snapshot) -> Result<(), WireError>;

    /// Advance to the next player; returns who is up.
    fn start_next_turn(&mut self) -> PlayerId;

    /// Something outside the obligations keeps the turn alive (a pending
    /// interrupt the game tracks itself).
    fn has_pending_interrupt(&self) -> bool {
        false
    }

    // === Convenience Methods ===

    fn can_perform(&self, action: Self::Action) -> bool {
        self.obligations().can_perform(action)
    }

    fn possible_actions(&self) -> ActionSet<Self::Action> {
        self.obligations().possible_action_types()
    }

    /// Turn-ends-now policy: no obligation and no interrupt pending.
    fn should_end_turn(&self) -> bool {
        self.obligations().is_empty() && !self.has_pending_interrupt()
    }

    /// Perform one move for the active player.
    fn perform(
        &mut self,
        action: Self::Action,
        rng: &mut GameRng,
        observer: &mut dyn MoveObserver<Self::Action>,
    ) -> Result<TurnStatus, Self::Error> {
        let before = self.snapshot()?;
        self.obligations_mut().perform(action)?;

        let outcome = match self.execute(action, rng) {
            Ok(outcome) => outcome,
            Err(err) => {
                self.restore(&before)?;
                return Err(err);
            }
        };

        if outcome.undo_allowed() {
            self.undo_log().record(before);
        } else {
            self.undo_log().clear();
        }

        let player = self.current_player();
        observer.on_performed(player, action, &outcome);
        self.obligations_mut().push_outcome(outcome);

        self.end_turn_if_done(observer)
    }

    /// Skip the obligation in focus.
    fn skip(
        &mut self,
        observer: &mut dyn MoveObserver<Self::Action>,
    ) -> Result<TurnStatus, Self::Error> {
        let before = self.snapshot()?;
        self.obligations_mut().skip()?;
        self.undo_log().record(before);

        observer.on_skipped(self.current_player());
        self.end_turn_if_done(observer)
    }

    /// Forfeit everything optional and end the turn.
    ///
    /// Fails, changing nothing, while a mandatory obligation is pending.
    fn end_turn(
        &mut self,
        observer: &mut dyn MoveObserver<Self::Action>,
    ) -> Result<PlayerId, Self::Error> {
        self.obligations_mut().skip_all()?;
        Ok(self.finish_turn(observer))
    }

    /// Restore the state before the latest undoable move.
    ///
    /// Returns `false` if there is nothing to undo.
    fn undo(&mut self) -> Result<bool, Self::Error> {
        let Some(snapshot) = self.undo_log().pop() else {
            return Ok(false);
        };
        self.restore(&snapshot)?;
        Ok(true)
    }

    fn end_turn_if_done(
        &mut self,
        observer: &mut dyn MoveObserver<Self::Action>,
    ) -> Result<TurnStatus, Self::Error> {
        if self.should_end_turn() {
            let next = self.finish_turn(observer);
            Ok(TurnStatus::Ended { next })
        } else {
            Ok(TurnStatus::Continues)
        }
    }

    fn finish_turn(&mut self, observer: &mut dyn MoveObserver<Self::Action>) -> PlayerId {
        let player = self.current_player();
        self.obligations_mut().clear();
        self.undo_log().clear();

        let next = self.start_next_turn();
        debug!(%player, %next, "turn ended");
        observer.on_turn_ended(player, next);
        next
    }
}
