//! The auction: round bookkeeping and the game state it mutates.

pub mod round;
pub mod state;

pub use round::AuctionRound;
pub use state::{GameState, PlayerState, RoundOutcome};
