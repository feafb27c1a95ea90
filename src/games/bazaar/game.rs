//! Bazaar game implementation.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::core::{ActionOutcome, GameRng, ObligationError, PlayerId, PlayerMap, WireError};
use crate::obligation::Obligation;
use crate::rules::{Snapshot, TurnDriver, UndoLog};
use crate::stack::{ObligationContainer, ObligationQueue};

use super::action::{BazaarAction, Place};

const LIRA_PER_GOOD: u32 = 3;
const GOODS_PER_TAKE: u8 = 2;
const BONUS_CARD_MAX: usize = 3;

/// A rejected bazaar move.
#[derive(Error, Debug)]
pub enum BazaarError {
    #[error(transparent)]
    Obligation(#[from] ObligationError),

    #[error(transparent)]
    Wire(#[from] WireError),

    #[error("not enough lira: need {needed}, have {available}")]
    NotEnoughLira { needed: u32, available: u32 },

    #[error("no goods to sell")]
    NoGoods,

    #[error("no bonus card in hand")]
    NoBonusCards,

    #[error("the game is over, {winner} won")]
    GameOver { winner: PlayerId },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Merchant {
    /// Index into the bazaar; `None` before the first move.
    pub place: Option<usize>,
    pub lira: u32,
    pub goods: u8,
    pub rubies: u8,
    /// Lira value of each bonus card held.
    pub bonus_cards: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
struct BazaarRules {
    ruby_price: u32,
    rubies_to_win: u8,
    goods_capacity: u8,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
struct BazaarState {
    rules: BazaarRules,
    places: Vec<Place>,
    merchants: PlayerMap<Merchant>,
    current: PlayerId,
    turn: u32,
    queue: ObligationQueue<BazaarAction>,
}

/// Merchant game driven by an [`ObligationQueue`].
///
/// A turn is a mandatory move followed by the queued obligations of the place
/// reached. Bonus cards held at the start of a turn can be played at any
/// point while the queue still has work.
#[derive(Clone, Debug)]
pub struct BazaarGame {
    state: BazaarState,
    undo: UndoLog,
}

impl BazaarGame {
    #[must_use]
    pub fn merchant(&self, player: PlayerId) -> &Merchant {
        &self.state.merchants[player]
    }

    #[must_use]
    pub fn place_of(&self, player: PlayerId) -> Option<Place> {
        self.state.merchants[player]
            .place
            .map(|index| self.state.places[index])
    }

    #[must_use]
    pub fn queue(&self) -> &ObligationQueue<BazaarAction> {
        &self.state.queue
    }

    #[must_use]
    pub fn turn(&self) -> u32 {
        self.state.turn
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.undo.can_undo()
    }

    /// First merchant holding enough rubies, in seat order.
    #[must_use]
    pub fn winner(&self) -> Option<PlayerId> {
        let target = self.state.rules.rubies_to_win;
        self.state
            .merchants
            .iter()
            .find(|(_, merchant)| merchant.rubies >= target)
            .map(|(player, _)| player)
    }

    /// Stop continuing the half-finished obligation so anytime plays open up
    /// again.
    pub fn release_current(&mut self) {
        self.state.queue.release_current();
    }

    pub fn to_json(&self) -> Result<String, WireError> {
        Ok(serde_json::to_string(&self.state)?)
    }

    pub fn from_json(json: &str) -> Result<Self, WireError> {
        let state: BazaarState = serde_json::from_str(json)?;
        state.queue.validate()?;
        if state.current.index() >= state.merchants.player_count() {
            return Err(WireError::corrupt("current player out of range"));
        }
        let place_count = state.places.len();
        if place_count == 0 {
            return Err(WireError::corrupt("bazaar has no places"));
        }
        if state
            .merchants
            .iter()
            .any(|(_, merchant)| merchant.place.is_some_and(|index| index >= place_count))
        {
            return Err(WireError::corrupt("merchant place outside the bazaar"));
        }
        Ok(Self {
            state,
            undo: UndoLog::new(),
        })
    }

    fn active(&mut self) -> &mut Merchant {
        let current = self.state.current;
        &mut self.state.merchants[current]
    }

    fn open_turn(&mut self) {
        self.state
            .queue
            .push_one(Obligation::mandatory(BazaarAction::Move));

        let held = self.state.merchants[self.state.current].bonus_cards.len() as u32;
        if held > 0 {
            self.state.queue.push_any_time(Obligation::repeat_action(
                0,
                held,
                BazaarAction::PlayBonusCard,
            ));
        }
    }

    fn move_on(&mut self) -> ActionOutcome<BazaarAction> {
        let place_count = self.state.places.len();
        let merchant = self.active();
        let next = merchant.place.map_or(0, |index| (index + 1) % place_count);
        merchant.place = Some(next);

        let place = self.state.places[next];
        debug!(player = %self.state.current, %place, "merchant moved");
        ActionOutcome::follow_ups(place.obligations(), true)
    }

    fn sell_goods(&mut self) -> Result<ActionOutcome<BazaarAction>, BazaarError> {
        let merchant = self.active();
        if merchant.goods == 0 {
            return Err(BazaarError::NoGoods);
        }
        merchant.goods -= 1;
        merchant.lira += LIRA_PER_GOOD;
        Ok(ActionOutcome::none(true))
    }

    fn buy_ruby(&mut self) -> Result<ActionOutcome<BazaarAction>, BazaarError> {
        let price = self.state.rules.ruby_price;
        let merchant = self.active();
        if merchant.lira < price {
            return Err(BazaarError::NotEnoughLira {
                needed: price,
                available: merchant.lira,
            });
        }
        merchant.lira -= price;
        merchant.rubies += 1;
        Ok(ActionOutcome::none(true))
    }

    fn play_bonus_card(&mut self) -> Result<ActionOutcome<BazaarAction>, BazaarError> {
        let merchant = self.active();
        let (index, _) = merchant
            .bonus_cards
            .iter()
            .enumerate()
            .max_by_key(|(_, value)| **value)
            .ok_or(BazaarError::NoBonusCards)?;
        let value = merchant.bonus_cards.remove(index);
        merchant.lira += u32::from(value);
        Ok(ActionOutcome::none(true))
    }

    fn discard_bonus_card(&mut self) -> Result<ActionOutcome<BazaarAction>, BazaarError> {
        let merchant = self.active();
        let (index, _) = merchant
            .bonus_cards
            .iter()
            .enumerate()
            .min_by_key(|(_, value)| **value)
            .ok_or(BazaarError::NoBonusCards)?;
        merchant.bonus_cards.remove(index);
        Ok(ActionOutcome::none(true))
    }
}

impl TurnDriver for BazaarGame {
    type Action = BazaarAction;
    type Container = ObligationQueue<BazaarAction>;
    type Error = BazaarError;

    fn obligations(&self) -> &Self::Container {
        &self.state.queue
    }

    fn obligations_mut(&mut self) -> &mut Self::Container {
        &mut self.state.queue
    }

    fn current_player(&self) -> PlayerId {
        self.state.current
    }

    fn undo_log(&mut self) -> &mut UndoLog {
        &mut self.undo
    }

    /// Bonus plays lapse with the main order: the turn ends once it is empty.
    fn should_end_turn(&self) -> bool {
        self.state.queue.queue_len() == 0 && !self.has_pending_interrupt()
    }

    fn execute(
        &mut self,
        action: BazaarAction,
        rng: &mut GameRng,
    ) -> Result<ActionOutcome<BazaarAction>, BazaarError> {
        if let Some(winner) = self.winner() {
            return Err(BazaarError::GameOver { winner });
        }

        match action {
            BazaarAction::Move => Ok(self.move_on()),
            BazaarAction::TakeGoods => {
                let capacity = self.state.rules.goods_capacity;
                let merchant = self.active();
                merchant.goods = merchant.goods.saturating_add(GOODS_PER_TAKE).min(capacity);
                Ok(ActionOutcome::none(true))
            }
            BazaarAction::SellGoods => self.sell_goods(),
            BazaarAction::BuyRuby => self.buy_ruby(),
            BazaarAction::DrawBonusCard => {
                let value = 1 + rng.gen_index(BONUS_CARD_MAX) as u8;
                self.active().bonus_cards.push(value);
                Ok(ActionOutcome::none(false))
            }
            BazaarAction::DiscardBonusCard => self.discard_bonus_card(),
            BazaarAction::PlayBonusCard => self.play_bonus_card(),
        }
    }

    fn snapshot(&self) -> Result<Snapshot, WireError> {
        Snapshot::encode(&self.state)
    }

    fn restore(&mut self, snapshot: &Snapshot) -> Result<(), WireError> {
        self.state = snapshot.decode()?;
        Ok(())
    }

    fn start_next_turn(&mut self) -> PlayerId {
        let player_count = self.state.merchants.player_count();
        self.state.current = self.state.current.next(player_count);
        self.state.turn += 1;
        self.open_turn();
        self.state.current
    }
}

/// Builder for creating a [`BazaarGame`].
#[derive(Clone, Debug)]
pub struct BazaarGameBuilder {
    player_count: usize,
    starting_lira: u32,
    starting_bonus_cards: Vec<u8>,
    ruby_price: u32,
    rubies_to_win: u8,
    goods_capacity: u8,
    places: Vec<Place>,
}

impl Default for BazaarGameBuilder {
    fn default() -> Self {
        Self {
            player_count: 2,
            starting_lira: 2,
            starting_bonus_cards: Vec::new(),
            ruby_price: 12,
            rubies_to_win: 3,
            goods_capacity: 5,
            places: Place::standard_bazaar(),
        }
    }
}

impl BazaarGameBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn player_count(mut self, count: usize) -> Self {
        assert!((2..=5).contains(&count), "Player count must be 2-5");
        self.player_count = count;
        self
    }

    #[must_use]
    pub fn starting_lira(mut self, lira: u32) -> Self {
        self.starting_lira = lira;
        self
    }

    /// Bonus cards every merchant starts with, by lira value.
    #[must_use]
    pub fn starting_bonus_cards(mut self, cards: Vec<u8>) -> Self {
        self.starting_bonus_cards = cards;
        self
    }

    #[must_use]
    pub fn ruby_price(mut self, price: u32) -> Self {
        self.ruby_price = price;
        self
    }

    #[must_use]
    pub fn rubies_to_win(mut self, rubies: u8) -> Self {
        assert!(rubies > 0, "Rubies to win must be at least 1");
        self.rubies_to_win = rubies;
        self
    }

    #[must_use]
    pub fn goods_capacity(mut self, capacity: u8) -> Self {
        assert!(capacity > 0, "Goods capacity must be at least 1");
        self.goods_capacity = capacity;
        self
    }

    #[must_use]
    pub fn places(mut self, places: Vec<Place>) -> Self {
        assert!(!places.is_empty(), "Bazaar must have at least one place");
        self.places = places;
        self
    }

    #[must_use]
    pub fn build(self) -> BazaarGame {
        let merchants = PlayerMap::new(self.player_count, |_| Merchant {
            place: None,
            lira: self.starting_lira,
            goods: 0,
            rubies: 0,
            bonus_cards: self.starting_bonus_cards.clone(),
        });

        let mut game = BazaarGame {
            state: BazaarState {
                rules: BazaarRules {
                    ruby_price: self.ruby_price,
                    rubies_to_win: self.rubies_to_win,
                    goods_capacity: self.goods_capacity,
                },
                places: self.places,
                merchants,
                current: PlayerId::new(0),
                turn: 0,
                queue: ObligationQueue::new(),
            },
            undo: UndoLog::new(),
        };
        game.open_turn();
        game
    }
}
