//! Agents that choose a raise intensity from a flat observation.
//!
//! - `Agent`: the policy seam the trajectory collector drives
//! - `Trainable`: optional update capability, reached through
//!   `Agent::as_trainable`
//! - `RandomAgent`: fixed stochastic baseline
//! - `PolicyGradientAgent`: MLP Beta policy trained with REINFORCE on burn
//!   (feature `rl`)

#[cfg(feature = "rl")]
pub mod beta;
#[cfg(feature = "rl")]
pub mod policy;
#[cfg(feature = "rl")]
pub mod policy_gradient;
pub mod random;
pub mod traits;

#[cfg(feature = "rl")]
pub use policy::{BetaPolicyNet, PolicyConfig};
#[cfg(feature = "rl")]
pub use policy_gradient::{PolicyGradientAgent, TrainBackend};
pub use random::RandomAgent;
pub use traits::{Agent, AgentAction, Trainable, UpdateStats};
