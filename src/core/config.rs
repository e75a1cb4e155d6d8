//! Environment configuration.
//!
//! `EnvConfig` fixes the table size, the seed and the card pools. Defaults
//! are the standard game: 3 players, money cards 1..=9 each (45 per player),
//! value cards 1..=9 and four 2x special cards.
//!
//! ```
//! use high_society::core::EnvConfig;
//!
//! let config = EnvConfig::new()
//!     .with_player_count(4)
//!     .with_seed(7)
//!     .with_max_steps(500);
//! assert!(config.validate().is_ok());
//! assert_eq!(config.starting_money(), 45.0);
//! ```

use serde::{Deserialize, Serialize};

use super::error::EnvError;

/// Smallest supported table.
pub const MIN_PLAYERS: usize = 3;
/// Largest supported table.
pub const MAX_PLAYERS: usize = 5;

/// Configuration for a `HighSocietyEnv`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvConfig {
    /// Number of seats (3-5).
    pub player_count: usize,

    /// Seed for the deck shuffle.
    pub seed: u64,

    /// Truncate the episode after this many accepted steps.
    pub max_steps: Option<usize>,

    /// Money cards every player starts with.
    pub money_denominations: Vec<u32>,

    /// Face values of the value cards in the prestige deck.
    pub value_cards: Vec<u32>,

    /// Number of special cards; drawing the last one ends the game.
    pub special_cards: usize,

    /// Multiplier carried by each special card.
    pub special_multiplier: u32,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            player_count: MIN_PLAYERS,
            seed: 0,
            max_steps: None,
            money_denominations: (1..=9).collect(),
            value_cards: (1..=9).collect(),
            special_cards: 4,
            special_multiplier: 2,
        }
    }
}

impl EnvConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_player_count(mut self, count: usize) -> Self {
        self.player_count = count;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = Some(max_steps);
        self
    }

    pub fn with_money_denominations(mut self, denominations: Vec<u32>) -> Self {
        self.money_denominations = denominations;
        self
    }

    pub fn with_value_cards(mut self, values: Vec<u32>) -> Self {
        self.value_cards = values;
        self
    }

    pub fn with_special_cards(mut self, count: usize) -> Self {
        self.special_cards = count;
        self
    }

    /// Money each player starts with (sum of the denominations).
    pub fn starting_money(&self) -> f64 {
        self.money_denominations.iter().map(|&d| f64::from(d)).sum()
    }

    /// Check the configuration describes a playable game.
    pub fn validate(&self) -> Result<(), EnvError> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&self.player_count) {
            return Err(EnvError::InvalidPlayerCount {
                got: self.player_count,
                min: MIN_PLAYERS,
                max: MAX_PLAYERS,
            });
        }
        if self.special_cards == 0 {
            return Err(EnvError::InvalidConfig("at least one special card is required"));
        }
        if self.special_multiplier == 0 {
            return Err(EnvError::InvalidConfig("special multiplier must be positive"));
        }
        Ok(())
    }
}
