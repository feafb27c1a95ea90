//! Core types shared by the obligation algebra, the containers and the games:
//! action-type identifiers, errors, move outcomes, seats and RNG.

pub mod action_type;
pub mod error;
pub mod outcome;
pub mod player;
pub mod rng;

pub use action_type::ActionType;
pub use error::{ObligationError, WireError};
pub use outcome::ActionOutcome;
pub use player::{PlayerId, PlayerMap};
pub use rng::GameRng;
