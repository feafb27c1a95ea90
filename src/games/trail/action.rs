//! Action types and board locations of the trail game.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::core::ActionType;
use crate::obligation::Obligation;

/// Every kind of move a herder can make.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
pub enum TrailAction {
    Move,
    DrawCard,
    DiscardCard,
    Gain2Dollars,
    BuyCattle,
    PayToll,
}

impl ActionType for TrailAction {
    fn name(self) -> &'static str {
        self.into()
    }

    fn from_name(name: &str) -> Option<Self> {
        name.parse().ok()
    }
}

/// A stop on the trail. Arriving at one pushes its obligations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
pub enum Location {
    /// Draw up to two cards, discarding one for each; or ride on.
    Crossing,
    /// Buy up to two cattle, or take 2 dollars.
    Ranch,
    /// Pay 1 dollar toll.
    Hazard,
    /// Deliver: discard 1 to 3 cards for their value in dollars.
    Station,
}

impl Location {
    /// Obligations owed on arrival, first resolves first.
    #[must_use]
    pub fn obligations(self) -> Vec<Obligation<TrailAction>> {
        use TrailAction::*;

        match self {
            Location::Crossing => vec![Obligation::any([
                Obligation::when_then_actions(DrawCard, DiscardCard, 0, 2),
                Obligation::optional(Move),
            ])],
            Location::Ranch => vec![Obligation::optional_of(Obligation::choice([
                Obligation::repeat_action(0, 2, BuyCattle),
                Obligation::mandatory(Gain2Dollars),
            ]))],
            Location::Hazard => vec![Obligation::mandatory(PayToll)],
            Location::Station => vec![Obligation::optional_of(Obligation::repeat_action(
                1,
                3,
                DiscardCard,
            ))],
        }
    }

    /// The trail every game uses unless the builder says otherwise.
    #[must_use]
    pub fn standard_trail() -> Vec<Location> {
        vec![
            Location::Crossing,
            Location::Ranch,
            Location::Hazard,
            Location::Station,
        ]
    }
}
