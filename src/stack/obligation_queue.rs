//! Obligation queue with anytime interrupts.
//!
//! Follow-ups are resolved in order from the front of `queue`. Obligations in
//! `any_time` are live alongside the front and are preferred when both accept
//! a move. Whatever obligation a move lands in becomes `current` until it is
//! final, so a half-resolved obligation is always finished before anything
//! else is started.

use im::Vector;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::core::{ActionType, ObligationError, WireError};
use crate::obligation::{ActionSet, Obligation};

use super::ObligationContainer;

/// Position of the obligation in progress.
///
/// Serialized as `{"anyTime":i}` or `{"queue":i}`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QueueSlot {
    AnyTime(usize),
    Queue(usize),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", bound = "A: ActionType")]
pub struct ObligationQueue<A: ActionType> {
    any_time: Vec<Obligation<A>>,
    queue: Vector<Obligation<A>>,
    current: Option<QueueSlot>,
}

impl<A: ActionType> ObligationQueue<A> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            any_time: Vec::new(),
            queue: Vector::new(),
            current: None,
        }
    }

    /// Add an obligation performable at any point while the queue has work.
    pub fn push_any_time(&mut self, obligation: Obligation<A>) {
        if obligation.is_final() {
            return;
        }
        self.any_time.push(obligation);
        trace!(any_time = self.any_time.len(), "anytime obligation added");
    }

    #[must_use]
    pub fn any_time_len(&self) -> usize {
        self.any_time.len()
    }

    #[must_use]
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// The obligation in progress, if a move left one half resolved.
    #[must_use]
    pub fn current(&self) -> Option<&Obligation<A>> {
        self.current.and_then(|slot| self.get(slot))
    }

    #[must_use]
    pub fn current_slot(&self) -> Option<QueueSlot> {
        self.current
    }

    /// Stop forcing the in-progress obligation without skipping it. It stays
    /// pending where it is.
    pub fn release_current(&mut self) {
        if self.current.take().is_some() {
            trace!("current obligation released");
        }
    }

    pub fn to_json(&self) -> Result<String, WireError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode a persisted queue, validating every tree and the current slot.
    pub fn from_json(json: &str) -> Result<Self, WireError> {
        let queue: Self = serde_json::from_str(json)?;
        queue.validate()?;
        Ok(queue)
    }

    pub fn validate(&self) -> Result<(), WireError> {
        self.any_time
            .iter()
            .chain(self.queue.iter())
            .try_for_each(Obligation::validate)?;

        if let Some(slot) = self.current {
            match self.get(slot) {
                None => {
                    return Err(WireError::corrupt(format!(
                        "queue current {slot:?} out of range"
                    )))
                }
                Some(obligation) if obligation.is_final() => {
                    return Err(WireError::corrupt("queue current is already final"))
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    fn get(&self, slot: QueueSlot) -> Option<&Obligation<A>> {
        match slot {
            QueueSlot::AnyTime(i) => self.any_time.get(i),
            QueueSlot::Queue(i) => self.queue.get(i),
        }
    }

    fn get_mut(&mut self, slot: QueueSlot) -> Option<&mut Obligation<A>> {
        match slot {
            QueueSlot::AnyTime(i) => self.any_time.get_mut(i),
            QueueSlot::Queue(i) => self.queue.get_mut(i),
        }
    }

    fn remove(&mut self, slot: QueueSlot) {
        match slot {
            QueueSlot::AnyTime(i) => {
                self.any_time.remove(i);
            }
            QueueSlot::Queue(i) => {
                self.queue.remove(i);
            }
        }
    }

    /// Where a move for `action` would land, without current.
    fn locate(&self, action: A) -> Option<QueueSlot> {
        self.any_time
            .iter()
            .position(|o| o.can_perform(action))
            .map(QueueSlot::AnyTime)
            .or_else(|| (!self.queue.is_empty()).then_some(QueueSlot::Queue(0)))
    }

    /// Slot `skip` acts on; `None` when only anytime work is left.
    fn skip_target(&self) -> Option<QueueSlot> {
        self.current
            .or_else(|| (!self.queue.is_empty()).then_some(QueueSlot::Queue(0)))
    }

    fn drop_any_time_if_idle(&mut self) {
        if self.queue.is_empty() && !self.any_time.is_empty() {
            debug!(dropped = self.any_time.len(), "anytime obligations expired");
            self.any_time.clear();
            if matches!(self.current, Some(QueueSlot::AnyTime(_))) {
                self.current = None;
            }
        }
    }
}

impl<A: ActionType> Default for ObligationQueue<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: ActionType> ObligationContainer<A> for ObligationQueue<A> {
    fn push(&mut self, obligations: Vec<Obligation<A>>) {
        let mut pushed = 0;
        for obligation in obligations.into_iter().rev() {
            if !obligation.is_final() {
                self.queue.push_front(obligation);
                pushed += 1;
            }
        }
        if let Some(QueueSlot::Queue(i)) = self.current {
            self.current = Some(QueueSlot::Queue(i + pushed));
        }
        trace!(pushed, size = self.queue.len(), "follow-ups queued");
    }

    fn perform(&mut self, action: A) -> Result<(), ObligationError> {
        let slot = match self.current {
            Some(slot) => slot,
            None => self
                .locate(action)
                .ok_or(ObligationError::NoActionAvailable)?,
        };
        let obligation = self
            .get_mut(slot)
            .filter(|obligation| obligation.can_perform(action))
            .ok_or(ObligationError::NoActionAvailable)?;
        obligation.perform(action)?;
        trace!(action = action.name(), ?slot, "performed on queue");

        if obligation.is_final() {
            self.remove(slot);
            self.current = None;
            debug!(?slot, "obligation resolved");
        } else {
            self.current = Some(slot);
        }
        Ok(())
    }

    fn skip(&mut self) -> Result<(), ObligationError> {
        match self.skip_target() {
            Some(slot) => {
                let obligation = self
                    .get_mut(slot)
                    .ok_or(ObligationError::NoActionAvailable)?;
                obligation.skip()?;
                if obligation.is_final() {
                    self.remove(slot);
                    debug!(?slot, "obligation resolved");
                }
                self.current = None;
                trace!(?slot, "skipped on queue");
            }
            None if !self.any_time.is_empty() => {}
            None => return Err(ObligationError::NoActionAvailable),
        }

        self.drop_any_time_if_idle();
        Ok(())
    }

    fn can_skip(&self) -> bool {
        match self.skip_target() {
            Some(slot) => self.get(slot).is_some_and(Obligation::can_skip),
            None => !self.any_time.is_empty(),
        }
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
        match self.current {
            Some(slot) => self.get(slot).is_some_and(|o| o.can_perform(action)),
            None => {
                self.any_time.iter().any(|o| o.can_perform(action))
                    || self.queue.front().is_some_and(|o| o.can_perform(action))
            }
        }
    }

    fn possible_action_types(&self) -> ActionSet<A> {
        let mut out = ActionSet::default();
        match self.current.and_then(|slot| self.get(slot)) {
            Some(current) => current.collect_possible(&mut out),
            None => {
                for obligation in self.any_time.iter().chain(self.queue.front()) {
                    obligation.collect_possible(&mut out);
                }
            }
        }
        out
    }

    fn len(&self) -> usize {
        self.any_time.len() + self.queue.len()
    }

    fn clear(&mut self) {
        if !self.is_empty() {
            debug!(dropped = self.len(), "queue cleared");
        }
        self.any_time.clear();
        self.queue.clear();
        self.current = None;
    }
}
