//! Trail game implementation.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::core::{ActionOutcome, GameRng, ObligationError, PlayerId, PlayerMap, WireError};
use crate::obligation::Obligation;
use crate::rules::{Snapshot, TurnDriver, UndoLog};
use crate::stack::{ObligationContainer, ObligationStack};

use super::action::{Location, TrailAction};

const CATTLE_PRICE: u32 = 3;
const BOUGHT_CATTLE_VALUE: u8 = 3;
const TOLL: u32 = 1;
const STARTING_DECK: [u8; 8] = [1, 1, 1, 2, 2, 2, 3, 4];

/// A rejected trail move.
#[derive(Error, Debug)]
pub enum TrailError {
    #[error(transparent)]
    Obligation(#[from] ObligationError),

    #[error(transparent)]
    Wire(#[from] WireError),

    #[error("not enough dollars: need {needed}, have {available}")]
    NotEnoughDollars { needed: u32, available: u32 },

    #[error("no card in hand to discard")]
    EmptyHand,

    #[error("draw pile and discard pile are both empty")]
    NothingToDraw,
}

/// One player's herd and purse.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Herder {
    /// Index into the trail; `None` before the first move.
    pub position: Option<usize>,
    pub dollars: u32,
    pub hand: Vec<u8>,
    pub deck: Vec<u8>,
    pub discard: Vec<u8>,
}

impl Herder {
    fn remove_lowest_card(&mut self) -> Option<u8> {
        let (index, _) = self
            .hand
            .iter()
            .enumerate()
            .min_by_key(|(_, value)| **value)?;
        Some(self.hand.remove(index))
    }
}

/// Everything a move can change; what undo snapshots capture.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
struct TrailState {
    trail: Vec<Location>,
    herders: PlayerMap<Herder>,
    current: PlayerId,
    turn: u32,
    stack: ObligationStack<TrailAction>,
}

/// Cattle-trail game driven by an [`ObligationStack`].
///
/// Each turn starts with a mandatory move to the next location on the trail.
/// Arriving pushes that location's obligations; the turn ends by itself once
/// the stack is empty.
#[derive(Clone, Debug)]
pub struct TrailGame {
    state: TrailState,
    undo: UndoLog,
}

impl TrailGame {
    #[must_use]
    pub fn current_player(&self) -> PlayerId {
        self.state.current
    }

    #[must_use]
    pub fn herder(&self, player: PlayerId) -> &Herder {
        &self.state.herders[player]
    }

    #[must_use]
    pub fn location_of(&self, player: PlayerId) -> Option<Location> {
        self.state.herders[player]
            .position
            .map(|index| self.state.trail[index])
    }

    #[must_use]
    pub fn stack(&self) -> &ObligationStack<TrailAction> {
        &self.state.stack
    }

    /// Completed turns.
    #[must_use]
    pub fn turn(&self) -> u32 {
        self.state.turn
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.undo.can_undo()
    }

    /// Persist the whole game (the undo log is not kept).
    pub fn to_json(&self) -> Result<String, WireError> {
        Ok(serde_json::to_string(&self.state)?)
    }

    /// Resume a persisted game.
    pub fn from_json(json: &str) -> Result<Self, WireError> {
        let state: TrailState = serde_json::from_str(json)?;
        state.stack.validate()?;
        if state.current.index() >= state.herders.player_count() {
            return Err(WireError::corrupt("current player out of range"));
        }
        let trail_len = state.trail.len();
        if trail_len == 0 {
            return Err(WireError::corrupt("empty trail"));
        }
        if state
            .herders
            .iter()
            .any(|(_, herder)| herder.position.is_some_and(|index| index >= trail_len))
        {
            return Err(WireError::corrupt("herder position off the trail"));
        }
        Ok(Self {
            state,
            undo: UndoLog::new(),
        })
    }

    fn active(&mut self) -> &mut Herder {
        let current = self.state.current;
        &mut self.state.herders[current]
    }

    fn move_on(&mut self) -> ActionOutcome<TrailAction> {
        let trail_len = self.state.trail.len();
        let herder = self.active();
        let next = herder.position.map_or(0, |index| (index + 1) % trail_len);
        herder.position = Some(next);

        let location = self.state.trail[next];
        // Whatever the old location still offered is forfeited.
        self.state.stack.clear();
        debug!(player = %self.state.current, %location, "herder moved");

        ActionOutcome::follow_ups(location.obligations(), true)
    }

    fn draw_card(&mut self, rng: &mut GameRng) -> Result<ActionOutcome<TrailAction>, TrailError> {
        let herder = self.active();
        if herder.deck.is_empty() {
            if herder.discard.is_empty() {
                return Err(TrailError::NothingToDraw);
            }
            herder.deck.append(&mut herder.discard);
            rng.shuffle(&mut herder.deck);
        }
        let card = herder.deck.pop().ok_or(TrailError::NothingToDraw)?;
        herder.hand.push(card);

        // The drawn card is now known.
        Ok(ActionOutcome::none(false))
    }

    fn discard_card(&mut self) -> Result<ActionOutcome<TrailAction>, TrailError> {
        let at_station = self.location_of(self.state.current) == Some(Location::Station);
        let herder = self.active();
        let card = herder.remove_lowest_card().ok_or(TrailError::EmptyHand)?;
        if at_station {
            herder.dollars += u32::from(card);
        }
        herder.discard.push(card);
        Ok(ActionOutcome::none(true))
    }

    fn buy_cattle(&mut self) -> Result<ActionOutcome<TrailAction>, TrailError> {
        let herder = self.active();
        if herder.dollars < CATTLE_PRICE {
            return Err(TrailError::NotEnoughDollars {
                needed: CATTLE_PRICE,
                available: herder.dollars,
            });
        }
        herder.dollars -= CATTLE_PRICE;
        herder.discard.push(BOUGHT_CATTLE_VALUE);
        Ok(ActionOutcome::none(true))
    }
}

impl TurnDriver for TrailGame {
    type Action = TrailAction;
    type Container = ObligationStack<TrailAction>;
    type Error = TrailError;

    fn obligations(&self) -> &Self::Container {
        &self.state.stack
    }

    fn obligations_mut(&mut self) -> &mut Self::Container {
        &mut self.state.stack
    }

    fn current_player(&self) -> PlayerId {
        self.state.current
    }

    fn undo_log(&mut self) -> &mut UndoLog {
        &mut self.undo
    }

    fn execute(
        &mut self,
        action: TrailAction,
        rng: &mut GameRng,
    ) -> Result<ActionOutcome<TrailAction>, TrailError> {
        match action {
            TrailAction::Move => Ok(self.move_on()),
            TrailAction::DrawCard => self.draw_card(rng),
            TrailAction::DiscardCard => self.discard_card(),
            TrailAction::Gain2Dollars => {
                self.active().dollars += 2;
                Ok(ActionOutcome::none(true))
            }
            TrailAction::BuyCattle => self.buy_cattle(),
            TrailAction::PayToll => {
                let herder = self.active();
                herder.dollars = herder.dollars.saturating_sub(TOLL);
                Ok(ActionOutcome::none(true))
            }
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
        let player_count = self.state.herders.player_count();
        self.state.current = self.state.current.next(player_count);
        self.state.turn += 1;
        self.state
            .stack
            .push_one(Obligation::mandatory(TrailAction::Move));
        self.state.current
    }
}

/// Builder for creating a [`TrailGame`].
#[derive(Clone, Debug)]
pub struct TrailGameBuilder {
    player_count: usize,
    starting_dollars: u32,
    hand_limit: usize,
    trail: Vec<Location>,
}

impl Default for TrailGameBuilder {
    fn default() -> Self {
        Self {
            player_count: 2,
            starting_dollars: 4,
            hand_limit: 4,
            trail: Location::standard_trail(),
        }
    }
}

impl TrailGameBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn player_count(mut self, count: usize) -> Self {
        assert!((2..=4).contains(&count), "Player count must be 2-4");
        self.player_count = count;
        self
    }

    #[must_use]
    pub fn starting_dollars(mut self, dollars: u32) -> Self {
        self.starting_dollars = dollars;
        self
    }

    #[must_use]
    pub fn hand_limit(mut self, limit: usize) -> Self {
        assert!(
            (1..=STARTING_DECK.len()).contains(&limit),
            "Hand limit must be 1-{}",
            STARTING_DECK.len()
        );
        self.hand_limit = limit;
        self
    }

    #[must_use]
    pub fn trail(mut self, trail: Vec<Location>) -> Self {
        assert!(!trail.is_empty(), "Trail must have at least one location");
        self.trail = trail;
        self
    }

    /// Shuffle every starting deck, deal hands and give player 0 the first
    /// turn.
    #[must_use]
    pub fn build(self, rng: &mut GameRng) -> TrailGame {
        let herders = PlayerMap::new(self.player_count, |_| {
            let mut deck = STARTING_DECK.to_vec();
            rng.shuffle(&mut deck);
            let hand = deck.split_off(deck.len() - self.hand_limit);
            Herder {
                position: None,
                dollars: self.starting_dollars,
                hand,
                deck,
                discard: Vec::new(),
            }
        });

        let mut stack = ObligationStack::new();
        stack.push_one(Obligation::mandatory(TrailAction::Move));

        TrailGame {
            state: TrailState {
                trail: self.trail,
                herders,
                current: PlayerId::new(0),
                turn: 0,
                stack,
            },
            undo: UndoLog::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{NoopObserver, TurnStatus};

    fn game() -> (TrailGame, GameRng) {
        let mut rng = GameRng::new(42);
        let game = TrailGameBuilder::new().build(&mut rng);
        (game, rng)
    }

    #[test]
    fn test_build() {
        let (game, _) = game();
        let p0 = PlayerId::new(0);
        assert_eq!(game.current_player(), p0);
        assert_eq!(game.herder(p0).hand.len(), 4);
        assert_eq!(game.herder(p0).deck.len(), 4);
        assert_eq!(game.herder(p0).dollars, 4);
        assert_eq!(game.location_of(p0), None);
        assert!(game.can_perform(TrailAction::Move));
        assert!(!game.can_perform(TrailAction::DrawCard));
    }

    #[test]
    fn test_hazard_turn_ends_itself() {
        let mut rng = GameRng::new(1);
        let mut game = TrailGameBuilder::new()
            .trail(vec![Location::Hazard])
            .build(&mut rng);
        let mut observer = NoopObserver;

        let status = game.perform(TrailAction::Move, &mut rng, &mut observer).unwrap();
        assert_eq!(status, TurnStatus::Continues);
        assert!(game.can_perform(TrailAction::PayToll));

        let status = game
            .perform(TrailAction::PayToll, &mut rng, &mut observer)
            .unwrap();
        assert_eq!(status, TurnStatus::Ended { next: PlayerId::new(1) });
        assert_eq!(game.herder(PlayerId::new(0)).dollars, 3);
        assert_eq!(game.turn(), 1);
    }

    #[test]
    fn test_not_enough_dollars_restores_obligation() {
        let mut rng = GameRng::new(3);
        let mut game = TrailGameBuilder::new()
            .starting_dollars(2)
            .trail(vec![Location::Ranch])
            .build(&mut rng);
        let mut observer = NoopObserver;
        game.perform(TrailAction::Move, &mut rng, &mut observer).unwrap();

        let err = game
            .perform(TrailAction::BuyCattle, &mut rng, &mut observer)
            .unwrap_err();
        assert!(matches!(
            err,
            TrailError::NotEnoughDollars { needed: 3, available: 2 }
        ));
        // Still free to choose the dollars instead.
        assert!(game.can_perform(TrailAction::Gain2Dollars));
        assert!(game.can_perform(TrailAction::BuyCattle));
    }

    #[test]
    fn test_discard_lowest() {
        let mut herder = Herder {
            position: None,
            dollars: 0,
            hand: vec![3, 1, 2],
            deck: Vec::new(),
            discard: Vec::new(),
        };
        assert_eq!(herder.remove_lowest_card(), Some(1));
        assert_eq!(herder.hand, vec![3, 2]);
    }

    #[test]
    fn test_json_resume() {
        let (mut game, mut rng) = game();
        game.perform(TrailAction::Move, &mut rng, &mut NoopObserver)
            .unwrap();

        let json = game.to_json().unwrap();
        let resumed = TrailGame::from_json(&json).unwrap();
        assert_eq!(resumed.state, game.state);
        assert!(!resumed.can_undo());
        assert_eq!(resumed.possible_actions(), game.possible_actions());
    }
}
