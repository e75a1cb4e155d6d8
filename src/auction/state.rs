//! Game state: players, the undrawn deck and the live round.
//!
//! `GameState` holds the mutation primitives of the auction (pass, bid,
//! resolve, open). The engine in `crate::env` decides when to call them.
//!
//! ## Money accounting
//!
//! For every player, `total_money + committed bid + spent` is constant:
//! bidding moves money from free funds into escrow, passing moves it back,
//! winning moves it from escrow into `spent`.

use im::Vector;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::round::AuctionRound;
use crate::cards::{money_hand, prestige_deck, total_money, total_prestige, MoneyCard, PrestigeCard, PrestigeHand};
use crate::core::{EnvConfig, EnvError, GameRng, PlayerId, PlayerMap};

/// One player's holdings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlayerState {
    pub(crate) player: PlayerId,
    pub(crate) name: String,
    pub(crate) money_cards: Vec<MoneyCard>,
    pub(crate) prestige_cards: PrestigeHand,
    pub(crate) total_prestige: f64,
    pub(crate) total_money: f64,
    pub(crate) spent: f64,
}

impl PlayerState {
    fn new(player: PlayerId, money_cards: Vec<MoneyCard>) -> Self {
        let total_money = total_money(&money_cards);
        Self {
            player,
            name: player.agent_name(),
            money_cards,
            prestige_cards: PrestigeHand::new(),
            total_prestige: 0.0,
            total_money,
            spent: 0.0,
        }
    }

    #[must_use]
    pub fn player(&self) -> PlayerId {
        self.player
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Money cards dealt at setup.
    #[must_use]
    pub fn money_cards(&self) -> &[MoneyCard] {
        &self.money_cards
    }

    /// Free funds, excluding anything escrowed in the live round.
    #[must_use]
    pub fn total_money(&self) -> f64 {
        self.total_money
    }

    #[must_use]
    pub fn prestige_cards(&self) -> &[PrestigeCard] {
        &self.prestige_cards
    }

    #[must_use]
    pub fn total_prestige(&self) -> f64 {
        self.total_prestige
    }

    /// Money paid for cards won so far.
    #[must_use]
    pub fn spent(&self) -> f64 {
        self.spent
    }

    fn win(&mut self, card: PrestigeCard, price: f64) {
        self.prestige_cards.push(card);
        self.total_prestige = total_prestige(&self.prestige_cards);
        self.spent += price;
    }
}

/// How a round ended.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum RoundOutcome {
    /// The high bidder took the card.
    Won {
        winner: PlayerId,
        card: PrestigeCard,
        price: f64,
    },
    /// Nobody bid; the card leaves the game.
    Discarded { card: PrestigeCard },
}

/// Complete state of one game.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameState {
    pub(crate) round_starter: PlayerId,
    pub(crate) remaining_special_cards: usize,
    pub(crate) players: PlayerMap<PlayerState>,
    pub(crate) deck: Vector<PrestigeCard>,
    pub(crate) round: AuctionRound,
}

impl GameState {
    /// Deal a new game and open round 1.
    ///
    /// The config must already be validated: a deck with at least one
    /// special card is never empty.
    ///
    /// # Panics
    ///
    /// On a config whose deck has no cards at all.
    pub fn deal(config: &EnvConfig, rng: &mut GameRng) -> Self {
        let mut cards = prestige_deck(config);
        rng.shuffle(&mut cards);

        let hand = money_hand(config);
        let players = PlayerMap::new(config.player_count, |p| PlayerState::new(p, hand.clone()));

        let mut deck: Vector<PrestigeCard> = cards.into_iter().collect();
        let mut remaining_special_cards = config.special_cards;
        let card = deck
            .pop_back()
            .expect("validated config always has at least one special card");
        if card.is_special() {
            remaining_special_cards = remaining_special_cards.saturating_sub(1);
        }

        let starter = PlayerId::new(0);
        let round = AuctionRound::open(1, starter, card, value_snapshot(&players, card));
        debug!(round = 1, %card, "round opened");

        Self {
            round_starter: starter,
            remaining_special_cards,
            players,
            deck,
            round,
        }
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.player_count()
    }

    /// Seat that opens the current round.
    #[must_use]
    pub fn round_starter(&self) -> PlayerId {
        self.round_starter
    }

    /// Seat that will open the next round.
    #[must_use]
    pub fn next_round_starter(&self) -> PlayerId {
        self.round_starter.next(self.player_count())
    }

    #[must_use]
    pub fn remaining_special_cards(&self) -> usize {
        self.remaining_special_cards
    }

    #[must_use]
    pub fn players(&self) -> &PlayerMap<PlayerState> {
        &self.players
    }

    #[must_use]
    pub fn player(&self, player: PlayerId) -> Option<&PlayerState> {
        self.players.get(player)
    }

    /// The live round, or the final round once the game is over.
    #[must_use]
    pub fn round(&self) -> &AuctionRound {
        &self.round
    }

    /// Cards not yet drawn.
    #[must_use]
    pub fn deck(&self) -> &Vector<PrestigeCard> {
        &self.deck
    }

    /// Free funds plus the player's own refundable bid.
    #[must_use]
    pub fn available_money(&self, player: PlayerId) -> f64 {
        self.players[player].total_money + self.round.committed(player)
    }

    /// Whether a player can cover the minimum bid of the live round.
    #[must_use]
    pub fn can_afford_min_bid(&self, player: PlayerId) -> bool {
        self.available_money(player) >= self.round.min_bid()
    }

    /// Game ends once every special card is out.
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.remaining_special_cards == 0
    }

    /// Sum of free, escrowed and spent money across the table.
    #[must_use]
    pub fn money_in_system(&self) -> f64 {
        self.players
            .values()
            .map(|p| p.total_money + p.spent)
            .sum::<f64>()
            + self.round.total_committed()
    }

    /// Withdraw from the round, refunding any escrowed bid.
    pub(crate) fn pass(&mut self, player: PlayerId) {
        let refund = std::mem::take(&mut self.round.bids[player]);
        self.players[player].total_money += refund;
        self.round.players_to_bid.remove(&player);
    }

    /// Replace the player's bid with `amount`.
    ///
    /// Nothing changes if the bid is rejected.
    pub(crate) fn place_bid(&mut self, player: PlayerId, amount: f64) -> Result<(), EnvError> {
        if !amount.is_finite() {
            return Err(EnvError::InvalidAction(amount));
        }

        let min_bid = self.round.min_bid();
        if amount < min_bid {
            return Err(EnvError::BidTooLow { min_bid, bid: amount });
        }

        let available = self.available_money(player);
        if amount > available {
            return Err(EnvError::InsufficientFunds { available, bid: amount });
        }

        let previous = std::mem::replace(&mut self.round.bids[player], amount);
        let state = &mut self.players[player];
        state.total_money += previous;
        state.total_money -= amount;
        self.round.cur_bid = amount;
        self.round.high_bidder = player;
        Ok(())
    }

    /// Close the live round and rotate the round starter.
    pub(crate) fn resolve_round(&mut self) -> RoundOutcome {
        let round = &mut self.round;
        let card = round.card;

        let outcome = if round.cur_bid > 0.0 && round.players_to_bid.contains(&round.high_bidder) {
            let winner = round.high_bidder;
            let price = std::mem::take(&mut round.bids[winner]);
            self.players[winner].win(card, price);
            RoundOutcome::Won { winner, card, price }
        } else {
            RoundOutcome::Discarded { card }
        };

        // Anything still escrowed belongs to a player who did not win.
        for (player, bid) in round.bids.iter_mut() {
            if *bid > 0.0 {
                self.players[player].total_money += std::mem::take(bid);
            }
        }

        self.round_starter = self.round_starter.next(self.players.player_count());
        debug!(round = round.num, ?outcome, "round resolved");
        outcome
    }

    /// Draw the next card and open a round for it.
    ///
    /// Returns `false` when the deck is empty.
    pub(crate) fn open_round(&mut self) -> bool {
        let Some(card) = self.deck.pop_back() else {
            return false;
        };
        if card.is_special() {
            self.remaining_special_cards = self.remaining_special_cards.saturating_sub(1);
        }

        let num = self.round.num + 1;
        self.round = AuctionRound::open(num, self.round_starter, card, value_snapshot(&self.players, card));
        debug!(
            round = num,
            %card,
            starter = %self.round_starter,
            remaining_special_cards = self.remaining_special_cards,
            "round opened"
        );
        true
    }
}

fn value_snapshot(players: &PlayerMap<PlayerState>, card: PrestigeCard) -> PlayerMap<f64> {
    PlayerMap::new(players.player_count(), |p| {
        total_prestige(players[p].prestige_cards.iter().chain(std::iter::once(&card)))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> GameState {
        GameState::deal(&EnvConfig::default(), &mut GameRng::new(42))
    }

    #[test]
    fn test_deal() {
        let state = state();
        assert_eq!(state.player_count(), 3);
        assert_eq!(state.deck().len(), 12);
        assert_eq!(state.round().num(), 1);
        assert_eq!(state.round_starter(), PlayerId::new(0));
        for (_, player) in state.players().iter() {
            assert_eq!(player.total_money(), 45.0);
            assert!(player.prestige_cards().is_empty());
        }

        let expected_specials = if state.round().card().is_special() { 3 } else { 4 };
        assert_eq!(state.remaining_special_cards(), expected_specials);
    }

    #[test]
    #[should_panic(expected = "at least one special card")]
    fn test_deal_rejects_empty_deck() {
        let config = EnvConfig::new().with_value_cards(Vec::new()).with_special_cards(0);
        GameState::deal(&config, &mut GameRng::new(0));
    }

    #[test]
    fn test_bid_escrows_and_pass_refunds() {
        let mut state = state();
        let p0 = PlayerId::new(0);

        state.place_bid(p0, 10.0).unwrap();
        assert_eq!(state.players[p0].total_money(), 35.0);
        assert_eq!(state.round().committed(p0), 10.0);
        assert_eq!(state.available_money(p0), 45.0);

        state.pass(p0);
        assert_eq!(state.players[p0].total_money(), 45.0);
        assert_eq!(state.round().committed(p0), 0.0);
        assert!(!state.round().is_bidding(p0));
    }

    #[test]
    fn test_raising_own_bid_refunds_previous() {
        let mut state = state();
        let p1 = PlayerId::new(1);

        state.place_bid(p1, 5.0).unwrap();
        state.place_bid(p1, 12.0).unwrap();
        assert_eq!(state.players[p1].total_money(), 33.0);
        assert_eq!(state.round().cur_bid(), 12.0);
    }

    #[test]
    fn test_rejected_bid_leaves_state_untouched() {
        let mut state = state();
        let p0 = PlayerId::new(0);
        state.place_bid(p0, 10.0).unwrap();

        let err = state.place_bid(PlayerId::new(1), 10.0).unwrap_err();
        assert_eq!(err, EnvError::BidTooLow { min_bid: 11.0, bid: 10.0 });

        let err = state.place_bid(PlayerId::new(1), 46.0).unwrap_err();
        assert_eq!(err, EnvError::InsufficientFunds { available: 45.0, bid: 46.0 });

        assert!(matches!(
            state.place_bid(PlayerId::new(1), f64::NAN),
            Err(EnvError::InvalidAction(_))
        ));

        assert_eq!(state.round().cur_bid(), 10.0);
        assert_eq!(state.round().high_bidder(), p0);
        assert_eq!(state.players[PlayerId::new(1)].total_money(), 45.0);
    }

    #[test]
    fn test_resolve_awards_card_to_high_bidder() {
        let mut state = state();
        let card = state.round().card();
        state.place_bid(PlayerId::new(0), 7.0).unwrap();
        state.pass(PlayerId::new(1));
        state.pass(PlayerId::new(2));

        let outcome = state.resolve_round();
        assert_eq!(
            outcome,
            RoundOutcome::Won { winner: PlayerId::new(0), card, price: 7.0 }
        );

        let winner = &state.players[PlayerId::new(0)];
        assert_eq!(winner.prestige_cards(), &[card]);
        assert_eq!(winner.total_money(), 38.0);
        assert_eq!(winner.spent(), 7.0);
        assert_eq!(state.round_starter(), PlayerId::new(1));
        assert_eq!(state.money_in_system(), 135.0);
    }

    #[test]
    fn test_resolve_without_bids_discards() {
        let mut state = state();
        let card = state.round().card();
        state.pass(PlayerId::new(0));
        state.pass(PlayerId::new(1));

        assert_eq!(state.resolve_round(), RoundOutcome::Discarded { card });
        assert!(state.players().values().all(|p| p.prestige_cards().is_empty()));
        assert_eq!(state.round_starter(), PlayerId::new(1));
    }

    #[test]
    fn test_open_round_snapshots_potential_prestige() {
        let mut state = state();
        state.place_bid(PlayerId::new(2), 3.0).unwrap();
        state.pass(PlayerId::new(0));
        state.pass(PlayerId::new(1));
        state.resolve_round();

        assert!(state.open_round());
        let round = state.round();
        assert_eq!(round.num(), 2);
        assert_eq!(round.high_bidder(), PlayerId::new(1));

        for (p, player) in state.players().iter() {
            let mut cards = player.prestige_cards().to_vec();
            cards.push(round.card());
            assert_eq!(round.value_to_agent()[p], total_prestige(&cards));
        }
    }

    #[test]
    fn test_open_round_on_empty_deck() {
        let mut state = state();
        while !state.deck.is_empty() {
            state.deck.pop_back();
        }
        assert!(!state.open_round());
        assert_eq!(state.round().num(), 1);
    }
}
