//! Exactly one of several branches.

use serde::{Deserialize, Serialize};

use crate::core::{ActionType, ObligationError};

use super::{ActionSet, Obligation};

/// Exclusive choice between branches.
///
/// The first performed move commits to the branch that accepted it; all
/// siblings are pruned immediately and never come back. Skipping is only
/// possible once the choice is made (or if only one branch was offered).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "A: ActionType")]
pub struct Choice<A: ActionType> {
    branches: Vec<Obligation<A>>,
}

impl<A: ActionType> Choice<A> {
    pub(super) fn new(branches: Vec<Obligation<A>>) -> Self {
        assert!(!branches.is_empty(), "Choice must have at least one branch");
        Self { branches }
    }

    /// Branches still live (one after commitment, none once resolved).
    #[must_use]
    pub fn branches(&self) -> &[Obligation<A>] {
        &self.branches
    }

    pub(super) fn perform(&mut self, action: A) -> Result<(), ObligationError> {
        let index = self
            .branches
            .iter()
            .position(|b| b.can_perform(action))
            .ok_or_else(|| ObligationError::cannot_perform(action))?;

        let branch = &mut self.branches[index];
        branch.perform(action)?;

        if branch.is_final() {
            self.branches.clear();
        } else {
            let chosen = self.branches.swap_remove(index);
            self.branches.clear();
            self.branches.push(chosen);
        }
        Ok(())
    }

    pub(super) fn check_skip(&self) -> Result<(), ObligationError> {
        match self.branches.as_slice() {
            [] => Ok(()),
            [only] => only.check_skip(),
            _ => Err(ObligationError::MustChooseAction),
        }
    }

    pub(super) fn apply_skip(&mut self) {
        if let [only] = self.branches.as_mut_slice() {
            only.apply_skip();
            if only.is_final() {
                self.branches.clear();
            }
        }
    }

    pub(super) fn validate(&self) -> Result<(), String> {
        if self.branches.iter().any(Obligation::is_final) {
            return Err("choice holds a resolved branch".into());
        }
        Ok(())
    }

    pub(super) fn can_perform(&self, action: A) -> bool {
        self.branches.iter().any(|b| b.can_perform(action))
    }

    pub(super) fn is_final(&self) -> bool {
        self.branches.is_empty()
    }

    pub(super) fn collect_possible(&self, out: &mut ActionSet<A>) {
        for branch in &self.branches {
            branch.collect_possible(out);
        }
    }
}
