//! The result of executing one concrete move.
//!
//! A move may leave the player with new obligations (follow-ups) and may or
//! may not be undoable. Composite moves combine their parts with
//! [`ActionOutcome::and_then`].

use smallvec::SmallVec;

use crate::obligation::Obligation;

use super::ActionType;

/// Follow-up obligations plus the undo flag of a performed move.
///
/// Most moves produce zero or one follow-up, so the list is inline for
/// the common case.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionOutcome<A: ActionType> {
    follow_ups: SmallVec<[Obligation<A>; 1]>,
    undo_allowed: bool,
}

impl<A: ActionType> ActionOutcome<A> {
    /// No follow-ups.
    #[must_use]
    pub fn none(undo_allowed: bool) -> Self {
        Self {
            follow_ups: SmallVec::new(),
            undo_allowed,
        }
    }

    /// A single follow-up obligation.
    #[must_use]
    pub fn follow_up(obligation: Obligation<A>, undo_allowed: bool) -> Self {
        let mut follow_ups = SmallVec::new();
        follow_ups.push(obligation);
        Self {
            follow_ups,
            undo_allowed,
        }
    }

    /// Several follow-ups, to be resolved in the given order.
    #[must_use]
    pub fn follow_ups(
        obligations: impl IntoIterator<Item = Obligation<A>>,
        undo_allowed: bool,
    ) -> Self {
        Self {
            follow_ups: obligations.into_iter().collect(),
            undo_allowed,
        }
    }

    /// Compose with the outcome of a move performed after this one.
    ///
    /// Follow-ups are concatenated in order; the composite is undoable only
    /// if both parts are.
    #[must_use]
    pub fn and_then(mut self, other: ActionOutcome<A>) -> Self {
        self.follow_ups.extend(other.follow_ups);
        self.undo_allowed &= other.undo_allowed;
        self
    }

    /// Follow-up obligations in resolution order.
    #[must_use]
    pub fn obligations(&self) -> &[Obligation<A>] {
        &self.follow_ups
    }

    /// Can the move that produced this outcome be undone?
    #[must_use]
    pub fn undo_allowed(&self) -> bool {
        self.undo_allowed
    }

    #[must_use]
    pub fn has_follow_ups(&self) -> bool {
        !self.follow_ups.is_empty()
    }

    /// Take the follow-ups, e.g. to push them onto a container.
    #[must_use]
    pub fn into_obligations(self) -> Vec<Obligation<A>> {
        self.follow_ups.into_vec()
    }
}
