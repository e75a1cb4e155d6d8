//! # high-society
//!
//! The High Society bidding card game as a turn-based, multi-agent
//! environment for reinforcement-learning training.
//!
//! ## Design Principles
//!
//! 1. **Engine Owns State**: All mutation happens inside `step`. Agents and
//!    drivers receive value snapshots (`Observation`) and read-only views.
//!
//! 2. **N-Player First**: Every per-player value lives in a `PlayerMap`
//!    sized by the configured player count (3 to 5).
//!
//! 3. **Deterministic**: Each engine and agent owns a seeded `GameRng`.
//!    The same seed and the same actions replay the same game.
//!
//! ## Modules
//!
//! - `core`: Players, RNG, configuration, errors
//! - `cards`: Prestige and money cards, prestige scoring
//! - `auction`: Round bookkeeping and game state primitives
//! - `env`: The step/observe/reset engine, observations and spaces
//! - `agents`: Agent traits, random and policy-gradient agents
//!   (the latter behind the default `rl` feature)
//! - `training`: Trajectory collection and self-play
//!
//! ## Example
//!
//! ```
//! use high_society::{Action, HighSocietyEnv, PlayerId};
//!
//! let mut env = HighSocietyEnv::with_players(3).unwrap();
//! env.step(Action::Bid(15.0)).unwrap();
//! env.step(Action::Pass).unwrap();
//! env.step(Action::Pass).unwrap();
//!
//! assert_eq!(env.money(PlayerId::new(0)), 30.0);
//! assert_eq!(env.round_number(), 2);
//! ```

pub mod agents;
pub mod auction;
pub mod cards;
pub mod core;
pub mod env;
pub mod training;

#[cfg(feature = "python")]
mod python;

// Re-export commonly used types
pub use crate::core::{EnvConfig, EnvError, GameRng, GameRngState, PlayerId, PlayerMap};

pub use crate::cards::{MoneyCard, PrestigeCard};

pub use crate::auction::{AuctionRound, GameState, PlayerState, RoundOutcome};

pub use crate::env::{Action, ActionSpace, BoxSpace, HighSocietyEnv, Info, Observation, ObservationSpace};

pub use crate::agents::{Agent, AgentAction, RandomAgent, Trainable, UpdateStats};

#[cfg(feature = "rl")]
pub use crate::agents::PolicyGradientAgent;

pub use crate::training::{collect_trajectories, Episode, PlayerTrajectory, SelfPlayConfig, SelfPlayWorker};
