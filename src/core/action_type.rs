//! Action-type identifiers.
//!
//! An action type names a *kind* of concrete move ("draw a card", "move
//! the merchant"). The obligation algebra never interprets it: it only
//! compares identifiers to route a performed move to the obligation that
//! accepts it.
//!
//! Games define a closed enum of their action types and register a name
//! for every variant. The name is what goes over the wire, so persisted
//! obligation trees resolve back to the same identifier space without any
//! runtime type lookup.
//!
//! ## Example
//!
//! ```
//! use tabletop_turns::core::ActionType;
//!
//! #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
//! enum Kind {
//!     Draw,
//!     Discard,
//! }
//!
//! impl ActionType for Kind {
//!     fn name(self) -> &'static str {
//!         match self {
//!             Kind::Draw => "Draw",
//!             Kind::Discard => "Discard",
//!         }
//!     }
//!
//!     fn from_name(name: &str) -> Option<Self> {
//!         match name {
//!             "Draw" => Some(Kind::Draw),
//!             "Discard" => Some(Kind::Discard),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! assert_eq!(Kind::from_name(Kind::Draw.name()), Some(Kind::Draw));
//! ```

use std::fmt::Debug;
use std::hash::Hash;

/// An opaque, comparable token naming a kind of move.
///
/// `name` and `from_name` must be inverse on every variant; this is the
/// whole serialization contract for action types.
pub trait ActionType: Copy + Eq + Hash + Debug + 'static {
    /// Stable wire name of this action type.
    fn name(self) -> &'static str;

    /// Resolve a wire name back to the action type, if registered.
    fn from_name(name: &str) -> Option<Self>;
}

/// Serde adapter that writes an action type as its registered name.
///
/// Use with `#[serde(with = "crate::core::action_type::by_name")]`.
pub mod by_name {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::ActionType;

    pub fn serialize<A, S>(action: &A, serializer: S) -> Result<S::Ok, S::Error>
    where
        A: ActionType,
        S: Serializer,
    {
        serializer.serialize_str(action.name())
    }

    pub fn deserialize<'de, A, D>(deserializer: D) -> Result<A, D::Error>
    where
        A: ActionType,
        D: Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        A::from_name(&name)
            .ok_or_else(|| D::Error::custom(format!("unknown action type `{name}`")))
    }
}
