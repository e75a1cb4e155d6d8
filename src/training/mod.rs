//! Training infrastructure: trajectory collection and self-play.
//!
//! ## Overview
//!
//! - **PlayerTrajectory**: one trainable agent's decisions in one episode
//! - **collect_trajectories**: plays an episode through the public engine API
//! - **SelfPlayWorker**: batches episodes and dispatches policy updates
//!
//! ## Usage
//!
//! ```rust
//! # #[cfg(feature = "rl")] {
//! use high_society::agents::{Agent, PolicyGradientAgent, RandomAgent};
//! use high_society::core::PlayerId;
//! use high_society::training::{SelfPlayConfig, SelfPlayWorker};
//! use high_society::HighSocietyEnv;
//!
//! let env = HighSocietyEnv::with_players(3).unwrap();
//! let obs_dim = env.obs_dim();
//! let agents: Vec<Box<dyn Agent>> = vec![
//!     Box::new(PolicyGradientAgent::new(PlayerId::new(0), obs_dim, 0)),
//!     Box::new(RandomAgent::with_seed(PlayerId::new(1), 1)),
//!     Box::new(RandomAgent::with_seed(PlayerId::new(2), 2)),
//! ];
//!
//! let config = SelfPlayConfig::new().with_episodes_per_update(2);
//! let mut worker = SelfPlayWorker::new(env, agents, config);
//! let stats = worker.run_iteration().unwrap();
//! assert_eq!(stats.updates.len(), 1);
//! # }
//! ```

pub mod self_play;
pub mod trajectory;

pub use self_play::{IterationStats, SelfPlayConfig, SelfPlayWorker};
pub use trajectory::{collect_trajectories, Episode, PlayerTrajectory};
