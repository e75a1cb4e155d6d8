//! Errors raised by the engine and its drivers.

use thiserror::Error;

use super::player::PlayerId;

/// Everything that can go wrong while configuring or driving a game.
///
/// Auto-passing a player who cannot afford the minimum bid is normal play,
/// not an error, and stepping a finished player is a no-op.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EnvError {
    #[error("must have between {min} - {max} players, got {got}")]
    InvalidPlayerCount { got: usize, min: usize, max: usize },
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
    #[error("bid must be at least {min_bid}, got {bid}")]
    BidTooLow { min_bid: f64, bid: f64 },
    #[error("insufficient funds: have {available}, bid {bid}")]
    InsufficientFunds { available: f64, bid: f64 },
    #[error("action must be a finite number, got {0}")]
    InvalidAction(f64),
    #[error("no such player: {0}")]
    UnknownPlayer(PlayerId),
    #[error("no agent controls {0}")]
    MissingAgent(PlayerId),
}
