//! Cattle-trail game, driven by an obligation stack.
//!
//! A small game that exercises the stack end to end:
//! - Each turn starts with a mandatory move along a looping trail
//! - Arriving at a location pushes its obligations (choices, repeats,
//!   draw/discard pairs); moving on forfeits what is left of them
//! - Drawing cards uses the [`GameRng`](crate::core::GameRng) handed to the
//!   driver and cannot be undone
//! - The turn ends by itself once the stack is empty
//!
//! Supports 2-4 players.

mod action;
mod game;

pub use action::{Location, TrailAction};
pub use game::{Herder, TrailError, TrailGame, TrailGameBuilder};
