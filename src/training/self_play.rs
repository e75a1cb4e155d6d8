//! Self-play loop for training agents against each other.
//!
//! Each iteration collects a batch of episodes on one engine and then hands
//! every trainable agent the trajectories of its own seat.

use tracing::{debug, info};

use crate::agents::{Agent, UpdateStats};
use crate::core::{EnvError, PlayerId, PlayerMap};
use crate::env::HighSocietyEnv;

use super::trajectory::{collect_trajectories, PlayerTrajectory};

/// Configuration for self-play.
#[derive(Clone, Debug)]
pub struct SelfPlayConfig {
    /// Episodes collected before each update.
    pub episodes_per_update: usize,

    /// Maximum engine steps per episode.
    pub max_steps: usize,

    /// Seed offset for episode resets (combined with the episode index).
    pub seed_offset: u64,
}

impl Default for SelfPlayConfig {
    fn default() -> Self {
        Self {
            episodes_per_update: 16,
            max_steps: 1000,
            seed_offset: 0,
        }
    }
}

impl SelfPlayConfig {
    /// Create a new self-play config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of episodes per update.
    pub fn with_episodes_per_update(mut self, episodes: usize) -> Self {
        self.episodes_per_update = episodes;
        self
    }

    /// Set maximum steps per episode.
    pub fn with_max_steps(mut self, max: usize) -> Self {
        self.max_steps = max;
        self
    }

    /// Set seed offset.
    pub fn with_seed_offset(mut self, offset: u64) -> Self {
        self.seed_offset = offset;
        self
    }

    /// Reset seed of the `episode`-th episode overall.
    pub fn episode_seed(&self, episode: u64) -> u64 {
        self.seed_offset.wrapping_add(episode)
    }
}

/// Summary of one self-play iteration.
#[derive(Clone, Debug)]
pub struct IterationStats {
    pub episodes: usize,
    pub total_steps: usize,
    pub truncated_episodes: usize,
    /// Mean episode reward per seat.
    pub mean_rewards: PlayerMap<f64>,
    /// Update result of each trainable agent.
    pub updates: Vec<(PlayerId, UpdateStats)>,
}

/// Worker running self-play iterations on one engine.
pub struct SelfPlayWorker {
    env: HighSocietyEnv,
    agents: Vec<Box<dyn Agent>>,
    config: SelfPlayConfig,
    episodes_played: u64,
}

impl SelfPlayWorker {
    /// Create a new self-play worker.
    pub fn new(env: HighSocietyEnv, agents: Vec<Box<dyn Agent>>, config: SelfPlayConfig) -> Self {
        Self {
            env,
            agents,
            config,
            episodes_played: 0,
        }
    }

    pub fn config(&self) -> &SelfPlayConfig {
        &self.config
    }

    pub fn env(&self) -> &HighSocietyEnv {
        &self.env
    }

    pub fn agents(&self) -> &[Box<dyn Agent>] {
        &self.agents
    }

    pub fn agents_mut(&mut self) -> &mut [Box<dyn Agent>] {
        &mut self.agents
    }

    pub fn episodes_played(&self) -> u64 {
        self.episodes_played
    }

    /// Collect one batch of episodes and update every trainable agent.
    pub fn run_iteration(&mut self) -> Result<IterationStats, EnvError> {
        let n = self.env.player_count();
        let mut batches: PlayerMap<Vec<PlayerTrajectory>> = PlayerMap::new(n, |_| Vec::new());
        let mut reward_sums = PlayerMap::with_value(n, 0.0);
        let mut total_steps = 0;
        let mut truncated_episodes = 0;

        for _ in 0..self.config.episodes_per_update {
            let seed = self.config.episode_seed(self.episodes_played);
            let episode = collect_trajectories(
                &mut self.env,
                &mut self.agents,
                Some(seed),
                self.config.max_steps,
            )?;
            self.episodes_played += 1;

            total_steps += episode.steps;
            if episode.truncated {
                truncated_episodes += 1;
            }
            for (player, reward) in episode.final_rewards.iter() {
                reward_sums[player] += reward;
            }
            for trajectory in episode.trajectories {
                let player = trajectory.player;
                batches[player].push(trajectory);
            }
        }

        let mut updates = Vec::new();
        for agent in &mut self.agents {
            let player = agent.player();
            let Some(batch) = batches.get(player) else {
                continue;
            };
            if let Some(trainable) = agent.as_trainable() {
                let stats = trainable.update(batch);
                debug!(%player, loss = stats.loss, samples = stats.samples, "agent updated");
                updates.push((player, stats));
            }
        }

        let episodes = self.config.episodes_per_update;
        let scale = if episodes > 0 { 1.0 / episodes as f64 } else { 0.0 };
        let mut mean_rewards = reward_sums;
        for (_, reward) in mean_rewards.iter_mut() {
            *reward *= scale;
        }

        info!(
            episodes,
            total_steps,
            truncated_episodes,
            mean_rewards = ?mean_rewards.to_vec(),
            "self-play iteration finished"
        );

        Ok(IterationStats {
            episodes,
            total_steps,
            truncated_episodes,
            mean_rewards,
            updates,
        })
    }
}
