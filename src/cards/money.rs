//! Money cards.
//!
//! Players are dealt discrete money cards, but bidding only ever looks at
//! the total. The cards exist at setup and are summed immediately.

use serde::{Deserialize, Serialize};

use crate::core::EnvConfig;

/// A money card of a single denomination.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoneyCard(pub u32);

impl MoneyCard {
    #[must_use]
    pub fn value(self) -> f64 {
        f64::from(self.0)
    }
}

/// The money cards each player is dealt.
pub fn money_hand(config: &EnvConfig) -> Vec<MoneyCard> {
    config.money_denominations.iter().copied().map(MoneyCard).collect()
}

/// Total value of a set of money cards.
pub fn total_money(cards: &[MoneyCard]) -> f64 {
    cards.iter().map(|card| card.value()).sum()
}
