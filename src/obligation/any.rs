//! Unordered bag of optional branches.

use serde::{Deserialize, Serialize};

use crate::core::{ActionType, ObligationError};

use super::{ActionSet, Obligation};

/// None, some or all of the branches, in any order.
///
/// Once a branch is partially resolved it becomes `current` and must be
/// finished (or skipped) before another branch can be started.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "A: ActionType")]
pub struct Any<A: ActionType> {
    branches: Vec<Obligation<A>>,
    current: Option<usize>,
}

impl<A: ActionType> Any<A> {
    pub(super) fn new(branches: Vec<Obligation<A>>) -> Self {
        assert!(!branches.is_empty(), "Any must have at least one branch");
        let branches = branches.into_iter().filter(|b| !b.is_final()).collect();
        Self {
            branches,
            current: None,
        }
    }

    /// Branches not yet resolved.
    #[must_use]
    pub fn branches(&self) -> &[Obligation<A>] {
        &self.branches
    }

    /// Index into [`Any::branches`] of the partially resolved branch.
    #[must_use]
    pub fn current(&self) -> Option<usize> {
        self.current
    }

    pub(super) fn perform(&mut self, action: A) -> Result<(), ObligationError> {
        let index = match self.current {
            Some(index) => index,
            None => self
                .branches
                .iter()
                .position(|b| b.can_perform(action))
                .ok_or_else(|| ObligationError::cannot_perform(action))?,
        };

        let branch = &mut self.branches[index];
        branch.perform(action)?;

        if branch.is_final() {
            self.branches.remove(index);
            self.current = None;
        } else {
            self.current = Some(index);
        }
        Ok(())
    }

    pub(super) fn check_skip(&self) -> Result<(), ObligationError> {
        match self.current {
            Some(index) => self.branches[index].check_skip(),
            None => Ok(()),
        }
    }

    pub(super) fn apply_skip(&mut self) {
        match self.current.take() {
            Some(index) => {
                self.branches.remove(index);
            }
            None => self.branches.clear(),
        }
    }

    pub(super) fn validate(&self) -> Result<(), String> {
        if self.branches.iter().any(Obligation::is_final) {
            return Err("any holds a resolved branch".into());
        }
        match self.current {
            Some(index) if index >= self.branches.len() => Err(format!(
                "any current {index} out of range for {} branches",
                self.branches.len()
            )),
            _ => Ok(()),
        }
    }

    pub(super) fn can_perform(&self, action: A) -> bool {
        match self.current {
            Some(index) => self.branches[index].can_perform(action),
            None => self.branches.iter().any(|b| b.can_perform(action)),
        }
    }

    pub(super) fn is_final(&self) -> bool {
        self.branches.is_empty()
    }

    pub(super) fn collect_possible(&self, out: &mut ActionSet<A>) {
        match self.current {
            Some(index) => self.branches[index].collect_possible(out),
            None => {
                for branch in &self.branches {
                    branch.collect_possible(out);
                }
            }
        }
    }
}
