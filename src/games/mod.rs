//! Game implementations built on the obligation containers.
//!
//! - [`trail`]: stack-driven, location obligations replace each other
//! - [`bazaar`]: queue-driven, with anytime bonus plays

pub mod bazaar;
pub mod trail;
