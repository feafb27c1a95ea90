//! Bounded repetition of a template.

use serde::{Deserialize, Serialize};

use crate::core::{ActionType, ObligationError};

use super::{ActionSet, Obligation};

/// `template` resolved between `at_least` and `at_most` times.
///
/// Each iteration starts from a fresh clone of the template and counts once
/// it completes. Skipping freezes the count: `at_most` drops to the completed
/// iterations, which makes the node final.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", bound = "A: ActionType")]
pub struct Repeat<A: ActionType> {
    at_least: u32,
    at_most: u32,
    template: Box<Obligation<A>>,
    current: Option<Box<Obligation<A>>>,
    count: u32,
}

impl<A: ActionType> Repeat<A> {
    pub(super) fn new(at_least: u32, at_most: u32, template: Obligation<A>) -> Self {
        assert!(
            at_least <= at_most,
            "Repeat needs at_least <= at_most, got {at_least} > {at_most}"
        );
        assert!(!template.is_final(), "Repeat template must not be final");

        Self {
            at_least,
            at_most,
            template: Box::new(template),
            current: None,
            count: 0,
        }
    }

    #[must_use]
    pub fn at_least(&self) -> u32 {
        self.at_least
    }

    #[must_use]
    pub fn at_most(&self) -> u32 {
        self.at_most
    }

    /// Completed iterations.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.count
    }

    #[must_use]
    pub fn template(&self) -> &Obligation<A> {
        &self.template
    }

    /// The iteration in progress, if any.
    #[must_use]
    pub fn current(&self) -> Option<&Obligation<A>> {
        self.current.as_deref()
    }

    pub(super) fn perform(&mut self, action: A) -> Result<(), ObligationError> {
        if let Some(current) = self.current.as_mut() {
            current.perform(action)?;
            if current.is_final() {
                self.current = None;
                self.count += 1;
            }
            return Ok(());
        }

        if self.count >= self.at_most {
            return Err(ObligationError::cannot_perform(action));
        }

        let mut iteration = (*self.template).clone();
        iteration.perform(action)?;

        if iteration.is_final() {
            self.count += 1;
        } else {
            self.current = Some(Box::new(iteration));
        }
        Ok(())
    }

    pub(super) fn check_skip(&self) -> Result<(), ObligationError> {
        if self.count < self.at_least {
            return Err(ObligationError::CannotSkipAction);
        }
        match &self.current {
            Some(current) => current.check_skip(),
            None => Ok(()),
        }
    }

    pub(super) fn apply_skip(&mut self) {
        // An abandoned iteration does not count.
        self.current = None;
        self.at_most = self.count;
    }

    pub(super) fn can_perform(&self, action: A) -> bool {
        match &self.current {
            Some(current) => current.can_perform(action),
            None => self.count < self.at_most && self.template.can_perform(action),
        }
    }

    pub(super) fn is_final(&self) -> bool {
        self.current.is_none() && self.count == self.at_most
    }

    pub(super) fn collect_possible(&self, out: &mut ActionSet<A>) {
        match &self.current {
            Some(current) => current.collect_possible(out),
            None if self.count < self.at_most => self.template.collect_possible(out),
            None => {}
        }
    }

    pub(super) fn validate(&self) -> Result<(), String> {
        if self.at_least > self.at_most {
            return Err(format!(
                "repeat atLeast {} exceeds atMost {}",
                self.at_least, self.at_most
            ));
        }
        if self.count > self.at_most {
            return Err(format!(
                "repeat count {} exceeds atMost {}",
                self.count, self.at_most
            ));
        }
        if let Some(current) = &self.current {
            if current.is_final() {
                return Err("repeat iteration in progress is already final".into());
            }
            if self.count >= self.at_most {
                return Err("repeat iteration in progress beyond atMost".into());
            }
        }
        Ok(())
    }
}
