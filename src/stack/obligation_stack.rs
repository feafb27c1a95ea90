//! LIFO obligation stack.
//!
//! Only the front (most recently pushed) obligation is live. It is removed
//! as soon as it becomes final, exposing the one behind it.

use im::Vector;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::core::{ActionType, ObligationError, WireError};
use crate::obligation::{ActionSet, Obligation};

use super::ObligationContainer;

/// Obligations in resolution order (index 0 = front, resolves first).
///
/// Backed by a persistent vector so cloning for `skip_all`, undo
/// snapshots and search is O(1).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "A: ActionType")]
pub struct ObligationStack<A: ActionType> {
    obligations: Vector<Obligation<A>>,
}

impl<A: ActionType> ObligationStack<A> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            obligations: Vector::new(),
        }
    }

    /// A stack holding `obligations`, first one on top.
    #[must_use]
    pub fn with_obligations(obligations: Vec<Obligation<A>>) -> Self {
        let mut stack = Self::new();
        stack.push(obligations);
        stack
    }

    /// The live obligation, if any.
    #[must_use]
    pub fn peek(&self) -> Option<&Obligation<A>> {
        self.obligations.front()
    }

    /// All pending obligations, front first.
    pub fn iter(&self) -> impl Iterator<Item = &Obligation<A>> {
        self.obligations.iter()
    }

    pub fn to_json(&self) -> Result<String, WireError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode a persisted stack, validating every tree.
    pub fn from_json(json: &str) -> Result<Self, WireError> {
        let stack: Self = serde_json::from_str(json)?;
        stack.validate()?;
        Ok(stack)
    }

    pub fn validate(&self) -> Result<(), WireError> {
        self.obligations.iter().try_for_each(Obligation::validate)
    }

    fn remove_front_if_final(&mut self) {
        if self.obligations.front().is_some_and(Obligation::is_final) {
            self.obligations.pop_front();
            debug!(remaining = self.obligations.len(), "obligation resolved");
        }
    }
}

impl<A: ActionType> Default for ObligationStack<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: ActionType> ObligationContainer<A> for ObligationStack<A> {
    fn push(&mut self, obligations: Vec<Obligation<A>>) {
        let before = self.obligations.len();
        for obligation in obligations.into_iter().rev() {
            if !obligation.is_final() {
                self.obligations.push_front(obligation);
            }
        }
        trace!(
            pushed = self.obligations.len() - before,
            size = self.obligations.len(),
            "obligations pushed"
        );
    }

    fn perform(&mut self, action: A) -> Result<(), ObligationError> {
        let front = self
            .obligations
            .front_mut()
            .filter(|front| front.can_perform(action))
            .ok_or(ObligationError::NoActionAvailable)?;
        front.perform(action)?;
        trace!(action = action.name(), "performed on stack");

        self.remove_front_if_final();
        Ok(())
    }

    fn skip(&mut self) -> Result<(), ObligationError> {
        let front = self
            .obligations
            .front_mut()
            .ok_or(ObligationError::NoActionAvailable)?;
        front.skip()?;
        trace!("skipped on stack");

        self.remove_front_if_final();
        Ok(())
    }

    fn can_skip(&self) -> bool {
        self.obligations.front().is_some_and(Obligation::can_skip)
    }

    fn skip_all(&mut self) -> Result<(), ObligationError> {
        let mut work = self.clone();
        while !work.is_empty() {
            work.skip()?;
        }
        *self = work;
        Ok(())
    }

    fn can_perform(&self, action: A) -> bool {
        self.obligations
            .front()
            .is_some_and(|front| front.can_perform(action))
    }

    fn possible_action_types(&self) -> ActionSet<A> {
        self.obligations
            .front()
            .map(Obligation::possible_action_types)
            .unwrap_or_default()
    }

    fn len(&self) -> usize {
        self.obligations.len()
    }

    fn clear(&mut self) {
        if !self.obligations.is_empty() {
            debug!(dropped = self.obligations.len(), "stack cleared");
        }
        self.obligations.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::action_type::testing::Act;

    #[test]
    fn test_last_pushed_resolves_first() {
        let mut stack = ObligationStack::new();
        stack.push_one(Obligation::mandatory(Act::A));
        stack.push_one(Obligation::mandatory(Act::B));

        assert!(stack.can_perform(Act::B));
        assert!(!stack.can_perform(Act::A));
        assert_eq!(stack.perform(Act::A), Err(ObligationError::NoActionAvailable));

        stack.perform(Act::B).unwrap();
        assert_eq!(stack.len(), 1);
        assert!(stack.can_perform(Act::A));
    }

    #[test]
    fn test_push_keeps_relative_order() {
        let mut stack = ObligationStack::new();
        stack.push_one(Obligation::mandatory(Act::D));
        stack.push(vec![
            Obligation::mandatory(Act::A),
            Obligation::mandatory(Act::B),
        ]);

        let order: Vec<_> = stack
            .iter()
            .map(|o| o.possible_action_types().into_iter().next().unwrap())
            .collect();
        assert_eq!(order, vec![Act::A, Act::B, Act::D]);
    }

    #[test]
    fn test_final_obligations_not_pushed() {
        let mut stack = ObligationStack::new();
        stack.push_one(Obligation::repeat_action(0, 0, Act::Draw));
        assert!(stack.is_empty());
    }

    #[test]
    fn test_empty_stack() {
        let mut stack = ObligationStack::<Act>::new();
        assert_eq!(stack.perform(Act::A), Err(ObligationError::NoActionAvailable));
        assert_eq!(stack.skip(), Err(ObligationError::NoActionAvailable));
        assert!(!stack.can_skip());
        assert!(stack.possible_action_types().is_empty());
        stack.skip_all().unwrap();
    }

    #[test]
    fn test_partial_front_stays() {
        let mut stack = ObligationStack::with_obligations(vec![Obligation::repeat_action(
            1,
            2,
            Act::Discard,
        )]);
        stack.perform(Act::Discard).unwrap();
        assert_eq!(stack.len(), 1);

        stack.skip().unwrap();
        assert!(stack.is_empty());
    }

    #[test]
    fn test_skip_all_is_atomic() {
        let mut stack = ObligationStack::new();
        stack.push_one(Obligation::mandatory(Act::Move));
        stack.push_one(Obligation::optional(Act::Draw));
        stack.push_one(Obligation::any_of_actions([Act::A, Act::B]));
        let before = stack.clone();

        assert_eq!(stack.skip_all(), Err(ObligationError::CannotSkipAction));
        assert_eq!(stack, before);
    }

    #[test]
    fn test_skip_all_drains() {
        let mut stack = ObligationStack::new();
        stack.push_one(Obligation::optional(Act::Move));
        stack.push_one(Obligation::choice_of_actions([Act::A]));
        stack.skip_all().unwrap();
        assert!(stack.is_empty());
    }

    #[test]
    fn test_json_shape() {
        let stack = ObligationStack::with_obligations(vec![Obligation::optional(Act::Move)]);
        let json = stack.to_json().unwrap();
        assert_eq!(
            json,
            r#"{"obligations":[{"single":{"action":"Move","mandatory":false,"completed":false}}]}"#
        );
        assert_eq!(ObligationStack::<Act>::from_json(&json).unwrap(), stack);
    }
}
