//! Error types.
//!
//! Every error here is a rule violation, never a transient failure: callers
//! must not retry. A failed `perform` or `skip` leaves the obligation state
//! exactly as it was before the call.

use thiserror::Error;

/// A rejected move or skip.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ObligationError {
    #[error("cannot perform action {action}")]
    CannotPerformAction { action: &'static str },

    #[error("cannot skip: a mandatory or minimum requirement is unmet")]
    CannotSkipAction,

    #[error("no action available")]
    NoActionAvailable,

    #[error("must choose one of the remaining options before skipping")]
    MustChooseAction,
}

impl ObligationError {
    pub(crate) fn cannot_perform<A: crate::core::ActionType>(action: A) -> Self {
        Self::CannotPerformAction {
            action: action.name(),
        }
    }
}

/// Failure to restore persisted obligation state.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum WireError {
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("snapshot encoding failed: {0}")]
    Snapshot(#[from] bincode::Error),

    #[error("corrupt obligation state: {reason}")]
    Corrupt { reason: String },
}

impl WireError {
    pub(crate) fn corrupt(reason: impl Into<String>) -> Self {
        Self::Corrupt {
            reason: reason.into(),
        }
    }
}
