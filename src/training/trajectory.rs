//! Per-player trajectories and the episode collector.
//!
//! A trajectory records one agent's decisions over one episode, capturing:
//! - The flattened observation it acted on
//! - The intensity it submitted and the policy draw behind it
//! - The log-probability of that draw
//! - Reward and termination flags as the engine reported them
//!
//! Only trainable agents are recorded. Rewards are sparse, so the final
//! record of each trajectory is patched with the terminal reward once the
//! episode ends.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::agents::{Agent, AgentAction};
use crate::core::{EnvError, PlayerId, PlayerMap};
use crate::env::HighSocietyEnv;

/// One agent's decisions over one episode.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerTrajectory {
    pub player: PlayerId,
    pub observations: Vec<Vec<f32>>,
    /// Raise intensities handed to the engine.
    pub actions: Vec<f32>,
    /// Policy draws, used for learning.
    pub samples: Vec<f32>,
    pub log_probs: Vec<f32>,
    pub rewards: Vec<f64>,
    pub terminateds: Vec<bool>,
    pub truncateds: Vec<bool>,
}

impl PlayerTrajectory {
    pub fn new(player: PlayerId) -> Self {
        Self {
            player,
            ..Self::default()
        }
    }

    /// Record one decision.
    pub fn push(
        &mut self,
        observation: Vec<f32>,
        decision: AgentAction,
        reward: f64,
        terminated: bool,
        truncated: bool,
    ) {
        self.observations.push(observation);
        self.actions.push(decision.raise_intensity);
        self.samples.push(decision.sample);
        self.log_probs.push(decision.log_prob);
        self.rewards.push(reward);
        self.terminateds.push(terminated);
        self.truncateds.push(truncated);
    }

    /// Overwrite the last record with the episode's outcome.
    ///
    /// Does nothing on an empty trajectory.
    pub fn finish(&mut self, reward: f64, terminated: bool, truncated: bool) {
        if let (Some(r), Some(term), Some(trunc)) = (
            self.rewards.last_mut(),
            self.terminateds.last_mut(),
            self.truncateds.last_mut(),
        ) {
            *r = reward;
            *term = terminated;
            *trunc = truncated;
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Undiscounted reward-to-go from each step.
    ///
    /// ```
    /// use high_society::training::PlayerTrajectory;
    /// use high_society::core::PlayerId;
    ///
    /// let mut traj = PlayerTrajectory::new(PlayerId::new(0));
    /// traj.rewards = vec![0.0, 1.0, 2.0];
    /// assert_eq!(traj.returns(), vec![3.0, 3.0, 2.0]);
    /// ```
    #[must_use]
    pub fn returns(&self) -> Vec<f64> {
        let mut returns = vec![0.0; self.rewards.len()];
        let mut acc = 0.0;
        for (ret, reward) in returns.iter_mut().zip(&self.rewards).rev() {
            acc += reward;
            *ret = acc;
        }
        returns
    }

    #[must_use]
    pub fn total_reward(&self) -> f64 {
        self.rewards.iter().sum()
    }
}

/// Result of one collected episode.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    /// One trajectory per trainable agent, in the order the agents were given.
    pub trajectories: Vec<PlayerTrajectory>,

    /// Engine steps taken.
    pub steps: usize,

    /// Whether collection stopped before the game ended.
    pub truncated: bool,

    /// Episode reward of every seat.
    pub final_rewards: PlayerMap<f64>,
}

impl Episode {
    /// Trajectory recorded for `player`, if it is trainable.
    pub fn trajectory(&self, player: PlayerId) -> Option<&PlayerTrajectory> {
        self.trajectories.iter().find(|t| t.player == player)
    }
}

/// Play one episode and record the trainable agents' decisions.
///
/// The engine is reset with `seed` (`None` continues its RNG stream) and
/// stepped until every seat terminates, the engine truncates, or
/// `max_steps` steps have been taken.
pub fn collect_trajectories(
    env: &mut HighSocietyEnv,
    agents: &mut [Box<dyn Agent>],
    seed: Option<u64>,
    max_steps: usize,
) -> Result<Episode, EnvError> {
    env.reset(seed);

    let mut seats: PlayerMap<Option<usize>> = PlayerMap::with_value(env.player_count(), None);
    for (index, agent) in agents.iter().enumerate() {
        let player = agent.player();
        if player.index() < env.player_count() {
            seats[player] = Some(index);
        }
    }

    let mut trajectories: Vec<PlayerTrajectory> = agents
        .iter()
        .filter(|agent| agent.is_trainable())
        .map(|agent| PlayerTrajectory::new(agent.player()))
        .collect();

    let mut steps = 0;
    while !env.is_done() && steps < max_steps {
        let player = env.agent_selection();
        let index = seats[player].ok_or(EnvError::MissingAgent(player))?;

        let observation = env.observe(player)?.to_vec();
        let decision = agents[index].act(&observation);

        if let Some(trajectory) = trajectories.iter_mut().find(|t| t.player == player) {
            trajectory.push(
                observation,
                decision,
                env.rewards()[player],
                env.terminations()[player],
                env.truncations()[player],
            );
        }

        env.step(decision.action())?;
        steps += 1;
    }

    let truncated = !env.all_terminated();
    for trajectory in &mut trajectories {
        let player = trajectory.player;
        trajectory.finish(env.rewards()[player], env.terminations()[player], truncated);
    }

    debug!(steps, truncated, rewards = ?env.cumulative_rewards().to_vec(), "episode collected");

    Ok(Episode {
        trajectories,
        steps,
        truncated,
        final_rewards: env.cumulative_rewards().clone(),
    })
}
