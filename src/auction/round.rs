//! A single ascending-bid auction for one prestige card.

use im::OrdSet;
use serde::{Deserialize, Serialize};

use crate::cards::PrestigeCard;
use crate::core::{PlayerId, PlayerMap};

/// The live auction round.
///
/// Committed bids are escrowed: the money has left the bidder's free funds
/// but is refunded on a pass. A seat stays in `players_to_bid` until it
/// passes or is auto-passed.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AuctionRound {
    pub(crate) num: u32,
    pub(crate) high_bidder: PlayerId,
    pub(crate) cur_bid: f64,
    pub(crate) bids: PlayerMap<f64>,
    pub(crate) players_to_bid: OrdSet<PlayerId>,
    pub(crate) card: PrestigeCard,
    pub(crate) value_to_agent: PlayerMap<f64>,
}

impl AuctionRound {
    pub(crate) fn open(
        num: u32,
        starter: PlayerId,
        card: PrestigeCard,
        value_to_agent: PlayerMap<f64>,
    ) -> Self {
        let player_count = value_to_agent.player_count();
        Self {
            num,
            high_bidder: starter,
            cur_bid: 0.0,
            bids: PlayerMap::with_value(player_count, 0.0),
            players_to_bid: PlayerId::all(player_count).collect(),
            card,
            value_to_agent,
        }
    }

    /// Round number, starting at 1.
    #[must_use]
    pub fn num(&self) -> u32 {
        self.num
    }

    /// Current high bid (0 until someone bids).
    #[must_use]
    pub fn cur_bid(&self) -> f64 {
        self.cur_bid
    }

    /// Smallest bid that would be accepted.
    #[must_use]
    pub fn min_bid(&self) -> f64 {
        self.cur_bid + 1.0
    }

    /// Holder of the current high bid; the round starter until someone bids.
    #[must_use]
    pub fn high_bidder(&self) -> PlayerId {
        self.high_bidder
    }

    /// Money a player currently has escrowed in this round.
    #[must_use]
    pub fn committed(&self, player: PlayerId) -> f64 {
        self.bids.get(player).copied().unwrap_or(0.0)
    }

    /// Escrowed bids in seat order.
    #[must_use]
    pub fn bids(&self) -> &PlayerMap<f64> {
        &self.bids
    }

    /// Whether a player may still act this round.
    #[must_use]
    pub fn is_bidding(&self, player: PlayerId) -> bool {
        self.players_to_bid.contains(&player)
    }

    /// Seats still able to act, ascending.
    #[must_use]
    pub fn players_to_bid(&self) -> &OrdSet<PlayerId> {
        &self.players_to_bid
    }

    #[must_use]
    pub fn bidders_left(&self) -> usize {
        self.players_to_bid.len()
    }

    /// The card being auctioned.
    #[must_use]
    pub fn card(&self) -> PrestigeCard {
        self.card
    }

    /// Prestige each player would hold if they won this card.
    #[must_use]
    pub fn value_to_agent(&self) -> &PlayerMap<f64> {
        &self.value_to_agent
    }

    /// Money held in escrow across all bidders.
    #[must_use]
    pub fn total_committed(&self) -> f64 {
        self.bids.values().sum()
    }
}
