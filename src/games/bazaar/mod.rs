//! Bazaar merchant game, driven by an obligation queue.
//!
//! Each turn opens with a mandatory move around the bazaar. The place reached
//! queues its obligations behind whatever is left, and bonus cards held at
//! the start of the turn sit in the anytime pool: they can be played between
//! queued obligations, but not in the middle of one.
//!
//! The first merchant to collect enough rubies wins. Supports 2-5 players.

mod action;
mod game;

pub use action::{BazaarAction, Place};
pub use game::{BazaarError, BazaarGame, BazaarGameBuilder, Merchant};
