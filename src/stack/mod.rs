//! Containers holding the active player's pending obligation trees.
//!
//! Two resolution orders are provided:
//! - **Stack** ([`ObligationStack`]): the most recently pushed obligation is
//!   the only live one; nothing behind it is touched until it is final.
//! - **Queue** ([`ObligationQueue`]): follow-ups are resolved in order, and a
//!   side set of *anytime* obligations may interleave with them. A partially
//!   resolved obligation stays `current` and takes every move until it closes.
//!
//! Games choose the order by instantiating the matching container. Both are
//! driven through [`ObligationContainer`].
//!
//! ## Example Usage
//!
//! ```
//! use tabletop_turns::core::ActionType;
//! use tabletop_turns::obligation::Obligation;
//! use tabletop_turns::stack::{ObligationContainer, ObligationStack};
//!
//! #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
//! enum Act { X, Y }
//!
//! impl ActionType for Act {
//!     fn name(self) -> &'static str {
//!         match self { Act::X => "X", Act::Y => "Y" }
//!     }
//!     fn from_name(name: &str) -> Option<Self> {
//!         match name { "X" => Some(Act::X), "Y" => Some(Act::Y), _ => None }
//!     }
//! }
//!
//! let mut stack = ObligationStack::new();
//! stack.push(vec![Obligation::mandatory(Act::X)]);
//! stack.push(vec![Obligation::mandatory(Act::Y)]);
//!
//! // Last pushed resolves first.
//! assert!(stack.can_perform(Act::Y));
//! assert!(!stack.can_perform(Act::X));
//!
//! stack.perform(Act::Y).unwrap();
//! assert!(stack.can_perform(Act::X));
//! ```

mod obligation_queue;
mod obligation_stack;

pub use obligation_queue::{ObligationQueue, QueueSlot};
pub use obligation_stack::ObligationStack;

use crate::core::{ActionOutcome, ActionType, ObligationError};
use crate::obligation::{ActionSet, Obligation};

/// Ordered collection of top-level obligation trees.
///
/// Every mutating method is all-or-nothing: on error the container is
/// exactly as it was before the call.
pub trait ObligationContainer<A: ActionType> {
    /// Put obligations in front of everything pending, keeping their
    /// relative order (the first one resolves first). Obligations that are
    /// already final are dropped.
    fn push(&mut self, obligations: Vec<Obligation<A>>);

    /// Route one performed move to the obligation in focus.
    ///
    /// Fails with [`ObligationError::NoActionAvailable`] when nothing in
    /// focus accepts `action`.
    fn perform(&mut self, action: A) -> Result<(), ObligationError>;

    /// Forfeit the obligation in focus where the rules permit it.
    fn skip(&mut self) -> Result<(), ObligationError>;

    /// Would [`ObligationContainer::skip`] succeed?
    fn can_skip(&self) -> bool;

    /// Skip until empty; fails on the first obligation that refuses.
    fn skip_all(&mut self) -> Result<(), ObligationError>;

    #[must_use]
    fn can_perform(&self, action: A) -> bool;

    /// Action types the focused obligations accept right now.
    #[must_use]
    fn possible_action_types(&self) -> ActionSet<A>;

    /// Number of top-level obligations pending.
    #[must_use]
    fn len(&self) -> usize;

    /// Drop everything pending, e.g. when a move invalidates stale
    /// location-specific obligations.
    fn clear(&mut self);

    // === Convenience Methods ===

    #[must_use]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn push_one(&mut self, obligation: Obligation<A>) {
        self.push(vec![obligation]);
    }

    /// Push the follow-ups a resolved move produced.
    fn push_outcome(&mut self, outcome: ActionOutcome<A>) {
        if outcome.has_follow_ups() {
            self.push(outcome.into_obligations());
        }
    }
}
