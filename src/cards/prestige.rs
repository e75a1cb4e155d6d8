//! Prestige cards: the lots put up for auction.
//!
//! A value card adds its face value to a collection; a special card
//! multiplies the whole collection. Drawing the last special card starts the
//! final round.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::EnvConfig;

/// A card collection. Thirteen cards exist in total, most players hold few.
pub type PrestigeHand = SmallVec<[PrestigeCard; 8]>;

/// A single prestige card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrestigeCard {
    /// Adds the face value.
    Value(u32),
    /// Multiplies the collection total by the given factor.
    Special(u32),
}

impl PrestigeCard {
    /// The standard "2x" card.
    pub const DOUBLE: PrestigeCard = PrestigeCard::Special(2);

    #[must_use]
    pub fn is_special(self) -> bool {
        matches!(self, PrestigeCard::Special(_))
    }

    /// Factor this card applies to the collection (1 for value cards).
    #[must_use]
    pub fn multiplier(self) -> f64 {
        match self {
            PrestigeCard::Value(_) => 1.0,
            PrestigeCard::Special(factor) => f64::from(factor),
        }
    }

    /// Face value this card adds (0 for special cards).
    #[must_use]
    pub fn face_value(self) -> f64 {
        match self {
            PrestigeCard::Value(face) => f64::from(face),
            PrestigeCard::Special(_) => 0.0,
        }
    }
}

impl std::fmt::Display for PrestigeCard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PrestigeCard::Value(face) => write!(f, "{face}"),
            PrestigeCard::Special(factor) => write!(f, "{factor}x"),
        }
    }
}

/// Score a collection: sum of value cards times the product of multipliers.
///
/// ```
/// use high_society::cards::{total_prestige, PrestigeCard};
///
/// let cards = [PrestigeCard::Value(3), PrestigeCard::Value(5), PrestigeCard::DOUBLE];
/// assert_eq!(total_prestige(&cards), 16.0);
/// assert_eq!(total_prestige(&[] as &[PrestigeCard]), 0.0);
/// ```
pub fn total_prestige<'a>(cards: impl IntoIterator<Item = &'a PrestigeCard>) -> f64 {
    let (sum, multiplier) = cards
        .into_iter()
        .fold((0.0, 1.0), |(sum, mult), card| {
            (sum + card.face_value(), mult * card.multiplier())
        });
    sum * multiplier
}

/// Unshuffled deck for a configuration: value cards then special cards.
pub fn prestige_deck(config: &EnvConfig) -> Vec<PrestigeCard> {
    config
        .value_cards
        .iter()
        .map(|&face| PrestigeCard::Value(face))
        .chain(std::iter::repeat(PrestigeCard::Special(config.special_multiplier)).take(config.special_cards))
        .collect()
}
