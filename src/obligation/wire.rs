//! JSON persistence of obligation trees.
//!
//! Each node is one object keyed by its variant:
//!
//! ```text
//! {"single":{"action":"Draw","mandatory":true,"completed":false}}
//! {"choice":{"branches":[...]}}
//! {"any":{"branches":[...],"current":null}}
//! {"repeat":{"atLeast":2,"atMost":4,"template":{...},"current":null,"count":0}}
//! {"whenThen":{"when":{...},"then":{...},"atLeast":1,"atMost":2,"whens":0,"thens":0,"current":null}}
//! ```
//!
//! Decoding checks the structural constraints the algebra relies on, so a
//! tampered or truncated save is rejected instead of producing a node that
//! later panics on an out-of-range index.

use serde_json::Value;

use crate::core::{ActionType, WireError};

use super::Obligation;

impl<A: ActionType> Obligation<A> {
    pub fn to_json(&self) -> Result<String, WireError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_value(&self) -> Result<Value, WireError> {
        Ok(serde_json::to_value(self)?)
    }

    /// Decode and validate a persisted node.
    pub fn from_json(json: &str) -> Result<Self, WireError> {
        let obligation: Self = serde_json::from_str(json)?;
        obligation.validate()?;
        Ok(obligation)
    }

    pub fn from_json_value(value: Value) -> Result<Self, WireError> {
        let obligation: Self = serde_json::from_value(value)?;
        obligation.validate()?;
        Ok(obligation)
    }

    /// Check counters, bounds and `current` pointers of the whole tree.
    pub fn validate(&self) -> Result<(), WireError> {
        let local = match self {
            Obligation::Single(_) => Ok(()),
            Obligation::Choice(choice) => choice.validate(),
            Obligation::Any(any) => any.validate(),
            Obligation::Repeat(repeat) => repeat.validate(),
            Obligation::WhenThen(when_then) => when_then.validate(),
        };
        local.map_err(WireError::corrupt)?;

        self.children().try_for_each(Obligation::validate)
    }

    fn children(&self) -> Box<dyn Iterator<Item = &Obligation<A>> + '_> {
        match self {
            Obligation::Single(_) => Box::new(std::iter::empty()),
            Obligation::Choice(choice) => Box::new(choice.branches().iter()),
            Obligation::Any(any) => Box::new(any.branches().iter()),
            Obligation::Repeat(repeat) => {
                Box::new(std::iter::once(repeat.template()).chain(repeat.current()))
            }
            Obligation::WhenThen(when_then) => Box::new(
                [when_then.when(), when_then.then()]
                    .into_iter()
                    .chain(when_then.current()),
            ),
        }
    }
}
