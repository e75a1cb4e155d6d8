//! Cards: prestige cards under auction and the money used to buy them.

pub mod money;
pub mod prestige;

pub use money::{money_hand, total_money, MoneyCard};
pub use prestige::{prestige_deck, total_prestige, PrestigeCard, PrestigeHand};
