//! The obligation algebra.
//!
//! An [`Obligation`] is a node in a tree describing what the active player
//! still owes or may do this turn. There are five kinds of node:
//!
//! - [`Single`]: one occurrence of one action type, mandatory or optional
//! - [`Choice`]: exactly one branch must be resolved; performing into a
//!   branch discards its siblings for good
//! - [`Any`]: none, some or all branches, in any order
//! - [`Repeat`]: a template resolved between `at_least` and `at_most` times
//! - [`WhenThen`]: every performed *when* owes one *then* before the node
//!   can close
//!
//! Nodes are pure state machines: they know nothing about the game, never
//! log, and only change through [`Obligation::perform`] and
//! [`Obligation::skip`]. A failed call leaves the node untouched.
//!
//! ## Example
//!
//! ```
//! use tabletop_turns::core::{ActionType, ObligationError};
//! use tabletop_turns::obligation::Obligation;
//!
//! #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
//! enum Act { Move, RemoveCard }
//!
//! impl ActionType for Act {
//!     fn name(self) -> &'static str {
//!         match self { Act::Move => "Move", Act::RemoveCard => "RemoveCard" }
//!     }
//!     fn from_name(name: &str) -> Option<Self> {
//!         match name { "Move" => Some(Act::Move), "RemoveCard" => Some(Act::RemoveCard), _ => None }
//!     }
//! }
//!
//! // For every Move performed, one RemoveCard is owed.
//! let mut obligation = Obligation::when_then_actions(Act::Move, Act::RemoveCard, 1, 2);
//!
//! assert!(!obligation.can_perform(Act::RemoveCard));
//! obligation.perform(Act::Move).unwrap();
//! assert_eq!(obligation.skip(), Err(ObligationError::CannotSkipAction));
//!
//! obligation.perform(Act::RemoveCard).unwrap();
//! obligation.skip().unwrap();
//! assert!(obligation.is_final());
//! ```

mod any;
mod choice;
mod repeat;
mod single;
mod when_then;
pub mod wire;

pub use any::Any;
pub use choice::Choice;
pub use repeat::Repeat;
pub use single::Single;
pub use when_then::WhenThen;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::core::{ActionType, ObligationError};

/// Set of action types performable right now.
pub type ActionSet<A> = FxHashSet<A>;

/// A node of the obligation tree.
///
/// Serialized externally tagged with camelCase keys, e.g.
/// `{"single":{"action":"DrawCard","mandatory":true,"completed":false}}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", bound = "A: ActionType")]
pub enum Obligation<A: ActionType> {
    Single(Single<A>),
    Choice(Choice<A>),
    Any(Any<A>),
    Repeat(Repeat<A>),
    WhenThen(WhenThen<A>),
}

impl<A: ActionType> Obligation<A> {
    // === Builders ===

    /// Player MUST perform the action; it cannot be skipped.
    #[must_use]
    pub fn mandatory(action: A) -> Self {
        Obligation::Single(Single::new(action, true))
    }

    /// Player MAY perform the action or skip it.
    #[must_use]
    pub fn optional(action: A) -> Self {
        Obligation::Single(Single::new(action, false))
    }

    /// Player MAY resolve the given obligation or skip it entirely.
    #[must_use]
    pub fn optional_of(obligation: Obligation<A>) -> Self {
        Self::any([obligation])
    }

    /// Player MAY resolve none, some or all branches, in any order.
    ///
    /// Panics if `branches` is empty.
    #[must_use]
    pub fn any(branches: impl IntoIterator<Item = Obligation<A>>) -> Self {
        Obligation::Any(Any::new(branches.into_iter().collect()))
    }

    /// [`Obligation::any`] over single actions.
    #[must_use]
    pub fn any_of_actions(actions: impl IntoIterator<Item = A>) -> Self {
        Self::any(actions.into_iter().map(Self::mandatory))
    }

    /// Player MUST resolve exactly one of the branches.
    ///
    /// Panics if `branches` is empty.
    #[must_use]
    pub fn choice(branches: impl IntoIterator<Item = Obligation<A>>) -> Self {
        Obligation::Choice(Choice::new(branches.into_iter().collect()))
    }

    /// [`Obligation::choice`] over single actions.
    #[must_use]
    pub fn choice_of_actions(actions: impl IntoIterator<Item = A>) -> Self {
        Self::choice(actions.into_iter().map(Self::optional))
    }

    /// Resolve `template` at least `at_least` and at most `at_most` times.
    ///
    /// Panics if `at_least > at_most` or the template is already final.
    #[must_use]
    pub fn repeat(at_least: u32, at_most: u32, template: Obligation<A>) -> Self {
        Obligation::Repeat(Repeat::new(at_least, at_most, template))
    }

    /// [`Obligation::repeat`] of a single action.
    #[must_use]
    pub fn repeat_action(at_least: u32, at_most: u32, action: A) -> Self {
        Self::repeat(at_least, at_most, Self::mandatory(action))
    }

    /// Each resolved `when` (between `at_least` and `at_most` of them) owes
    /// one resolved `then`.
    ///
    /// Panics if `at_least > at_most` or either template is already final.
    #[must_use]
    pub fn when_then(
        when: Obligation<A>,
        then: Obligation<A>,
        at_least: u32,
        at_most: u32,
    ) -> Self {
        Obligation::WhenThen(WhenThen::new(when, then, at_least, at_most))
    }

    /// [`Obligation::when_then`] of single actions.
    #[must_use]
    pub fn when_then_actions(when: A, then: A, at_least: u32, at_most: u32) -> Self {
        Self::when_then(Self::mandatory(when), Self::mandatory(then), at_least, at_most)
    }

    // === Contract ===

    /// Consume one occurrence of `action`.
    ///
    /// Fails with [`ObligationError::CannotPerformAction`] exactly when
    /// [`Obligation::can_perform`] is false; the node is unchanged then.
    pub fn perform(&mut self, action: A) -> Result<(), ObligationError> {
        match self {
            Obligation::Single(single) => single.perform(action),
            Obligation::Choice(choice) => choice.perform(action),
            Obligation::Any(any) => any.perform(action),
            Obligation::Repeat(repeat) => repeat.perform(action),
            Obligation::WhenThen(when_then) => when_then.perform(action),
        }
    }

    /// Forfeit whatever remains, where the rules permit it.
    pub fn skip(&mut self) -> Result<(), ObligationError> {
        self.check_skip()?;
        self.apply_skip();
        Ok(())
    }

    /// Would [`Obligation::skip`] succeed? Returns the error it would give.
    pub fn check_skip(&self) -> Result<(), ObligationError> {
        match self {
            Obligation::Single(single) => single.check_skip(),
            Obligation::Choice(choice) => choice.check_skip(),
            Obligation::Any(any) => any.check_skip(),
            Obligation::Repeat(repeat) => repeat.check_skip(),
            Obligation::WhenThen(when_then) => when_then.check_skip(),
        }
    }

    #[must_use]
    pub fn can_skip(&self) -> bool {
        self.check_skip().is_ok()
    }

    /// Skip after a successful [`Obligation::check_skip`].
    pub(crate) fn apply_skip(&mut self) {
        match self {
            Obligation::Single(single) => single.apply_skip(),
            Obligation::Choice(choice) => choice.apply_skip(),
            Obligation::Any(any) => any.apply_skip(),
            Obligation::Repeat(repeat) => repeat.apply_skip(),
            Obligation::WhenThen(when_then) => when_then.apply_skip(),
        }
    }

    #[must_use]
    pub fn can_perform(&self, action: A) -> bool {
        match self {
            Obligation::Single(single) => single.can_perform(action),
            Obligation::Choice(choice) => choice.can_perform(action),
            Obligation::Any(any) => any.can_perform(action),
            Obligation::Repeat(repeat) => repeat.can_perform(action),
            Obligation::WhenThen(when_then) => when_then.can_perform(action),
        }
    }

    /// Fully resolved; the owning container drops it.
    #[must_use]
    pub fn is_final(&self) -> bool {
        match self {
            Obligation::Single(single) => single.is_final(),
            Obligation::Choice(choice) => choice.is_final(),
            Obligation::Any(any) => any.is_final(),
            Obligation::Repeat(repeat) => repeat.is_final(),
            Obligation::WhenThen(when_then) => when_then.is_final(),
        }
    }

    /// Action types performable right now.
    #[must_use]
    pub fn possible_action_types(&self) -> ActionSet<A> {
        let mut out = ActionSet::default();
        self.collect_possible(&mut out);
        out
    }

    /// Add the action types performable right now to `out`.
    pub fn collect_possible(&self, out: &mut ActionSet<A>) {
        match self {
            Obligation::Single(single) => single.collect_possible(out),
            Obligation::Choice(choice) => choice.collect_possible(out),
            Obligation::Any(any) => any.collect_possible(out),
            Obligation::Repeat(repeat) => repeat.collect_possible(out),
            Obligation::WhenThen(when_then) => when_then.collect_possible(out),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::action_type::testing::{Act, ALL};

    /// optional(choice(any(choice(A, B), C), D))
    fn neutral_building() -> Obligation<Act> {
        Obligation::optional_of(Obligation::choice([
            Obligation::any([
                Obligation::choice_of_actions([Act::A, Act::B]),
                Obligation::mandatory(Act::C),
            ]),
            Obligation::optional(Act::D),
        ]))
    }

    fn performable(o: &Obligation<Act>) -> Vec<Act> {
        let mut acts: Vec<_> = o.possible_action_types().into_iter().collect();
        acts.sort();
        acts
    }

    #[test]
    fn test_nested_initial() {
        let o = neutral_building();
        assert!(!o.is_final());
        assert_eq!(performable(&o), vec![Act::A, Act::B, Act::C, Act::D]);
        assert!(!o.can_perform(Act::Draw));
    }

    #[test]
    fn test_nested_perform_a_then_c() {
        let mut o = neutral_building();
        o.perform(Act::A).unwrap();
        assert!(!o.is_final());
        assert!(!o.can_perform(Act::A));
        assert!(!o.can_perform(Act::B));
        assert!(o.can_perform(Act::C));
        assert!(!o.can_perform(Act::D));
        assert_eq!(
            o.perform(Act::B),
            Err(ObligationError::CannotPerformAction { action: "B" })
        );

        o.perform(Act::C).unwrap();
        assert!(o.is_final());
        assert!(performable(&o).is_empty());
        assert!(o.perform(Act::D).is_err());
    }

    #[test]
    fn test_nested_perform_c_then_b() {
        let mut o = neutral_building();
        o.perform(Act::C).unwrap();
        assert_eq!(performable(&o), vec![Act::A, Act::B]);

        o.perform(Act::B).unwrap();
        assert!(o.is_final());
        assert!(!o.can_perform(Act::A));
    }

    #[test]
    fn test_nested_perform_d_closes_everything() {
        let mut o = neutral_building();
        o.perform(Act::D).unwrap();
        assert!(o.is_final());
        for act in ALL {
            assert!(!o.can_perform(act));
        }
    }

    #[test]
    fn test_nested_skip_at_any_point() {
        let mut fresh = neutral_building();
        fresh.skip().unwrap();
        assert!(fresh.is_final());

        for first in [Act::A, Act::B, Act::C] {
            let mut o = neutral_building();
            o.perform(first).unwrap();
            o.skip().unwrap();
            assert!(o.is_final(), "skip after {first:?} should close the node");
        }
    }

    #[test]
    fn test_failed_perform_leaves_state_untouched() {
        let mut o = neutral_building();
        o.perform(Act::C).unwrap();
        let before = o.clone();

        assert!(o.perform(Act::C).is_err());
        assert!(o.perform(Act::Draw).is_err());
        assert_eq!(o, before);
    }

    #[test]
    fn test_failed_skip_leaves_state_untouched() {
        let mut o = Obligation::repeat(
            1,
            3,
            Obligation::any_of_actions([Act::Draw, Act::Discard]),
        );
        o.perform(Act::Draw).unwrap();
        let before = o.clone();

        assert_eq!(o.skip(), Err(ObligationError::CannotSkipAction));
        assert_eq!(o, before);
        assert!(!o.can_skip());
    }

    #[test]
    fn test_clone_is_independent() {
        let original = Obligation::repeat_action(0, 2, Act::Draw);
        let mut copy = original.clone();
        copy.perform(Act::Draw).unwrap();
        copy.perform(Act::Draw).unwrap();

        assert!(copy.is_final());
        assert!(!original.is_final());
        assert!(original.can_perform(Act::Draw));
    }

    #[test]
    #[should_panic(expected = "must have at least one branch")]
    fn test_empty_any_rejected() {
        let _ = Obligation::<Act>::any(Vec::new());
    }
}
