//! Action types and places of the bazaar game.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::core::ActionType;
use crate::obligation::Obligation;

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
pub enum BazaarAction {
    Move,
    TakeGoods,
    SellGoods,
    BuyRuby,
    DrawBonusCard,
    DiscardBonusCard,
    PlayBonusCard,
}

impl ActionType for BazaarAction {
    fn name(self) -> &'static str {
        self.into()
    }

    fn from_name(name: &str) -> Option<Self> {
        name.parse().ok()
    }
}

/// A place around the bazaar. Arriving queues its obligations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
pub enum Place {
    Warehouse,
    Market,
    Caravansary,
    Jeweler,
}

impl Place {
    /// Follow-ups of arriving here, in resolution order.
    #[must_use]
    pub fn obligations(self) -> Vec<Obligation<BazaarAction>> {
        match self {
            Place::Warehouse => vec![Obligation::mandatory(BazaarAction::TakeGoods)],
            Place::Market => vec![Obligation::repeat_action(0, 3, BazaarAction::SellGoods)],
            // Draw two, then give one back.
            Place::Caravansary => vec![
                Obligation::repeat_action(2, 2, BazaarAction::DrawBonusCard),
                Obligation::mandatory(BazaarAction::DiscardBonusCard),
            ],
            Place::Jeweler => vec![Obligation::optional(BazaarAction::BuyRuby)],
        }
    }

    #[must_use]
    pub fn standard_bazaar() -> Vec<Place> {
        vec![
            Place::Warehouse,
            Place::Market,
            Place::Caravansary,
            Place::Jeweler,
        ]
    }
}
