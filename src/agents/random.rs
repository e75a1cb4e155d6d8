//! Random baseline agent.

use crate::core::{GameRng, PlayerId};

use super::traits::{Agent, AgentAction};

/// Passes with probability `pass_probability`, otherwise raises with an
/// intensity drawn uniformly from `[0, 1)`.
///
/// Reports a log-probability of 0: it is never trained.
#[derive(Clone, Debug)]
pub struct RandomAgent {
    player: PlayerId,
    pass_probability: f64,
    rng: GameRng,
}

impl RandomAgent {
    pub fn new(player: PlayerId, pass_probability: f64, seed: u64) -> Self {
        Self {
            player,
            pass_probability,
            rng: GameRng::new(seed),
        }
    }

    /// An agent that passes half of the time.
    pub fn with_seed(player: PlayerId, seed: u64) -> Self {
        Self::new(player, 0.5, seed)
    }

    #[must_use]
    pub fn pass_probability(&self) -> f64 {
        self.pass_probability
    }
}

impl Agent for RandomAgent {
    fn player(&self) -> PlayerId {
        self.player
    }

    fn act(&mut self, _observation: &[f32]) -> AgentAction {
        if self.rng.gen_bool(self.pass_probability) {
            return AgentAction::pass();
        }
        AgentAction::new(self.rng.gen_unit_f32(), 0.0)
    }
}
