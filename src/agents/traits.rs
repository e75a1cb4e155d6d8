//! Agent traits.
//!
//! These traits define the interface between the environment drivers and
//! the policies that play each seat.

use serde::{Deserialize, Serialize};

use crate::core::PlayerId;
use crate::env::Action;
use crate::training::PlayerTrajectory;

/// One decision of an agent.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AgentAction {
    /// Intensity handed to the environment; 0 passes.
    pub raise_intensity: f32,

    /// Log-probability of `sample` under the agent's policy.
    pub log_prob: f32,

    /// What the policy actually drew. Differs from `raise_intensity` when
    /// the agent turns a low draw into a pass.
    pub sample: f32,
}

impl AgentAction {
    /// An action whose intensity is exactly what the policy drew.
    #[must_use]
    pub fn new(raise_intensity: f32, log_prob: f32) -> Self {
        Self {
            raise_intensity,
            log_prob,
            sample: raise_intensity,
        }
    }

    #[must_use]
    pub fn pass() -> Self {
        Self::new(0.0, 0.0)
    }

    /// The engine action this decision maps to.
    #[must_use]
    pub fn action(&self) -> Action {
        Action::from_intensity(self.raise_intensity)
    }
}

/// Summary of one policy update.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateStats {
    /// Surrogate loss `-mean(advantage * log_prob)` before the step.
    pub loss: f64,

    /// Mean undiscounted return-to-go across the batch.
    pub mean_return: f64,

    /// Decisions contributing to the gradient.
    pub samples: usize,

    /// L2 norm of the applied gradient.
    pub grad_norm: f64,
}

/// A policy controlling one seat.
pub trait Agent: Send {
    /// The seat this agent plays.
    fn player(&self) -> PlayerId;

    /// Choose a raise intensity for a flattened observation.
    fn act(&mut self, observation: &[f32]) -> AgentAction;

    /// Whether trajectories should be recorded for this agent.
    fn is_trainable(&self) -> bool {
        false
    }

    /// Update capability, if the agent learns.
    fn as_trainable(&mut self) -> Option<&mut dyn Trainable> {
        None
    }
}

/// An agent that learns from its own trajectories.
pub trait Trainable {
    /// Apply one update from a batch of this agent's trajectories.
    fn update(&mut self, batch: &[PlayerTrajectory]) -> UpdateStats;
}
