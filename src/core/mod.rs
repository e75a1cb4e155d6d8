//! Core types shared by the engine, the agents and the training loop:
//! seats, per-seat storage, RNG, configuration and errors.

pub mod config;
pub mod error;
pub mod player;
pub mod rng;

pub use config::{EnvConfig, MAX_PLAYERS, MIN_PLAYERS};
pub use error::EnvError;
pub use player::{PlayerId, PlayerMap};
pub use rng::{GameRng, GameRngState};
