//! One occurrence of one action type.

use serde::{Deserialize, Serialize};

use crate::core::action_type::by_name;
use crate::core::{ActionType, ObligationError};

use super::ActionSet;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "A: ActionType")]
pub struct Single<A: ActionType> {
    #[serde(with = "by_name")]
    action: A,
    mandatory: bool,
    completed: bool,
}

impl<A: ActionType> Single<A> {
    #[must_use]
    pub fn new(action: A, mandatory: bool) -> Self {
        Self {
            action,
            mandatory,
            completed: false,
        }
    }

    #[must_use]
    pub fn action(&self) -> A {
        self.action
    }

    #[must_use]
    pub fn is_mandatory(&self) -> bool {
        self.mandatory
    }

    pub(super) fn perform(&mut self, action: A) -> Result<(), ObligationError> {
        if !self.can_perform(action) {
            return Err(ObligationError::cannot_perform(action));
        }
        self.completed = true;
        Ok(())
    }

    pub(super) fn check_skip(&self) -> Result<(), ObligationError> {
        if self.mandatory && !self.completed {
            return Err(ObligationError::CannotSkipAction);
        }
        Ok(())
    }

    pub(super) fn apply_skip(&mut self) {
        self.completed = true;
    }

    pub(super) fn can_perform(&self, action: A) -> bool {
        !self.completed && action == self.action
    }

    pub(super) fn is_final(&self) -> bool {
        self.completed
    }

    pub(super) fn collect_possible(&self, out: &mut ActionSet<A>) {
        if !self.completed {
            out.insert(self.action);
        }
    }
}
