//! Paired trigger/obligation relation.

use serde::{Deserialize, Serialize};

use crate::core::{ActionType, ObligationError};

use super::{ActionSet, Obligation};

/// Every resolved `when` owes one resolved `then`.
///
/// `whens` and `thens` count occurrences started from fresh clones of the
/// templates; the one still in progress, if any, lives in `current` and
/// takes every move until it closes. A pending `then` is preferred over a
/// new `when` when both accept the action.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", bound = "A: ActionType")]
pub struct WhenThen<A: ActionType> {
    when: Box<Obligation<A>>,
    then: Box<Obligation<A>>,
    at_least: u32,
    at_most: u32,
    whens: u32,
    thens: u32,
    current: Option<Box<Obligation<A>>>,
}

impl<A: ActionType> WhenThen<A> {
    pub(super) fn new(
        when: Obligation<A>,
        then: Obligation<A>,
        at_least: u32,
        at_most: u32,
    ) -> Self {
        assert!(
            at_least <= at_most,
            "WhenThen needs at_least <= at_most, got {at_least} > {at_most}"
        );
        assert!(!when.is_final(), "WhenThen trigger must not be final");
        assert!(!then.is_final(), "WhenThen consequence must not be final");

        Self {
            when: Box::new(when),
            then: Box::new(then),
            at_least,
            at_most,
            whens: 0,
            thens: 0,
            current: None,
        }
    }

    #[must_use]
    pub fn whens(&self) -> u32 {
        self.whens
    }

    #[must_use]
    pub fn thens(&self) -> u32 {
        self.thens
    }

    #[must_use]
    pub fn at_least(&self) -> u32 {
        self.at_least
    }

    #[must_use]
    pub fn at_most(&self) -> u32 {
        self.at_most
    }

    #[must_use]
    pub fn when(&self) -> &Obligation<A> {
        &self.when
    }

    #[must_use]
    pub fn then(&self) -> &Obligation<A> {
        &self.then
    }

    /// The occurrence in progress, if any.
    #[must_use]
    pub fn current(&self) -> Option<&Obligation<A>> {
        self.current.as_deref()
    }

    /// `then`s owed and not yet started.
    #[must_use]
    pub fn owed(&self) -> u32 {
        self.whens - self.thens
    }

    fn then_available(&self, action: A) -> bool {
        self.thens < self.whens && self.then.can_perform(action)
    }

    fn when_available(&self, action: A) -> bool {
        self.whens < self.at_most && self.when.can_perform(action)
    }

    pub(super) fn perform(&mut self, action: A) -> Result<(), ObligationError> {
        if let Some(current) = self.current.as_mut() {
            current.perform(action)?;
            if current.is_final() {
                self.current = None;
            }
            return Ok(());
        }

        let (mut started, is_then) = if self.then_available(action) {
            ((*self.then).clone(), true)
        } else if self.when_available(action) {
            ((*self.when).clone(), false)
        } else {
            return Err(ObligationError::cannot_perform(action));
        };
        started.perform(action)?;

        if is_then {
            self.thens += 1;
        } else {
            self.whens += 1;
        }
        if !started.is_final() {
            self.current = Some(Box::new(started));
        }
        Ok(())
    }

    pub(super) fn check_skip(&self) -> Result<(), ObligationError> {
        if self.whens < self.at_least || self.thens < self.whens {
            return Err(ObligationError::CannotSkipAction);
        }
        match &self.current {
            Some(current) => current.check_skip(),
            None => Ok(()),
        }
    }

    pub(super) fn apply_skip(&mut self) {
        self.current = None;
        self.at_most = self.whens;
    }

    pub(super) fn can_perform(&self, action: A) -> bool {
        match &self.current {
            Some(current) => current.can_perform(action),
            None => self.then_available(action) || self.when_available(action),
        }
    }

    pub(super) fn is_final(&self) -> bool {
        self.current.is_none() && self.thens == self.whens && self.whens == self.at_most
    }

    pub(super) fn collect_possible(&self, out: &mut ActionSet<A>) {
        if let Some(current) = &self.current {
            current.collect_possible(out);
            return;
        }
        if self.thens < self.whens {
            self.then.collect_possible(out);
        }
        if self.whens < self.at_most {
            self.when.collect_possible(out);
        }
    }

    pub(super) fn validate(&self) -> Result<(), String> {
        if self.thens > self.whens || self.whens > self.at_most {
            return Err(format!(
                "whenThen counters out of order: thens {} whens {} atMost {}",
                self.thens, self.whens, self.at_most
            ));
        }
        if self.at_least > self.at_most {
            return Err(format!(
                "whenThen atLeast {} exceeds atMost {}",
                self.at_least, self.at_most
            ));
        }
        if self.current.as_ref().is_some_and(|c| c.is_final()) {
            return Err("whenThen occurrence in progress is already final".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::action_type::testing::Act;

    fn when_then_of(o: &Obligation<Act>) -> &WhenThen<Act> {
        match o {
            Obligation::WhenThen(wt) => wt,
            other => panic!("expected whenThen, got {other:?}"),
        }
    }

    #[test]
    fn test_move_then_remove() {
        let mut o = Obligation::when_then_actions(Act::Move, Act::Remove, 1, 2);
        assert!(o.can_perform(Act::Move));
        assert!(!o.can_perform(Act::Remove));
        assert_eq!(
            o.perform(Act::Remove),
            Err(ObligationError::CannotPerformAction { action: "Remove" })
        );

        o.perform(Act::Move).unwrap();
        assert_eq!(when_then_of(&o).whens(), 1);
        assert_eq!(o.skip(), Err(ObligationError::CannotSkipAction));

        o.perform(Act::Remove).unwrap();
        assert_eq!(when_then_of(&o).thens(), 1);
        assert!(!o.is_final());

        o.skip().unwrap();
        assert!(o.is_final());
        assert!(!o.can_perform(Act::Move));
    }

    #[test]
    fn test_backlog_accumulates() {
        let mut o = Obligation::when_then_actions(Act::Move, Act::Remove, 0, 3);
        o.perform(Act::Move).unwrap();
        o.perform(Act::Move).unwrap();
        assert_eq!(when_then_of(&o).owed(), 2);

        o.perform(Act::Remove).unwrap();
        o.perform(Act::Remove).unwrap();
        assert!(!o.can_perform(Act::Remove));
        assert!(o.can_perform(Act::Move));

        o.perform(Act::Move).unwrap();
        assert!(!o.can_perform(Act::Move));
        assert!(!o.is_final());
        o.perform(Act::Remove).unwrap();
        assert!(o.is_final());
    }

    #[test]
    fn test_skip_below_at_least() {
        let mut o = Obligation::when_then_actions(Act::Move, Act::Remove, 2, 2);
        o.perform(Act::Move).unwrap();
        o.perform(Act::Remove).unwrap();
        assert_eq!(o.skip(), Err(ObligationError::CannotSkipAction));
    }

    #[test]
    fn test_untouched_optional_skip() {
        let mut o = Obligation::when_then_actions(Act::Draw, Act::Discard, 0, 2);
        o.skip().unwrap();
        assert!(o.is_final());
        assert_eq!(when_then_of(&o).whens(), 0);
    }

    #[test]
    fn test_then_preferred_when_both_match() {
        let mut o = Obligation::when_then(
            Obligation::any_of_actions([Act::Draw, Act::Discard]),
            Obligation::mandatory(Act::Discard),
            0,
            2,
        );
        o.perform(Act::Draw).unwrap();
        // the draw/discard occurrence is still open and takes the discard
        o.perform(Act::Discard).unwrap();
        assert_eq!(when_then_of(&o).thens(), 0);

        o.perform(Act::Discard).unwrap();
        assert_eq!(when_then_of(&o).thens(), 1);
        assert_eq!(when_then_of(&o).whens(), 1);
    }

    #[test]
    fn test_possible_actions() {
        let mut o = Obligation::when_then_actions(Act::Move, Act::Remove, 0, 1);
        let initial: Vec<_> = o.possible_action_types().into_iter().collect();
        assert_eq!(initial, vec![Act::Move]);

        o.perform(Act::Move).unwrap();
        let after: Vec<_> = o.possible_action_types().into_iter().collect();
        assert_eq!(after, vec![Act::Remove]);
    }
}
