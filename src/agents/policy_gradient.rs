//! REINFORCE agent with an MLP Beta policy, trained with Adam.
//!
//! ## Policy
//!
//! Observations are scaled by `input_scale` and fed to a [`BetaPolicyNet`],
//! which returns the shape parameters of the raise-intensity distribution.
//! The intensity is drawn from `Beta(alpha, beta)`.
//!
//! ## Update
//!
//! One Adam step on the loss `-mean(advantage * log_prob)` per batch, where
//! the advantage is the return-to-go normalized across the whole batch.
//! Gradients come from burn's autodiff backend.

use std::fmt;

use burn::backend::ndarray::NdArrayDevice;
use burn::backend::{Autodiff, NdArray};
use burn::module::{AutodiffModule, Module};
use burn::optim::adaptor::OptimizerAdaptor;
use burn::optim::{Adam, AdamConfig, GradientsParams, Optimizer};
use burn::prelude::*;
use burn::tensor::ElementConversion;
use tracing::debug;

use crate::core::{GameRng, PlayerId};
use crate::training::PlayerTrajectory;

use super::beta;
use super::policy::{BetaPolicyNet, PolicyConfig};
use super::traits::{Agent, AgentAction, Trainable, UpdateStats};

/// Backend the policy trains on.
pub type TrainBackend = Autodiff<NdArray>;

const ADVANTAGE_EPSILON: f64 = 1e-8;

/// A trainable agent sampling raise intensities from a Beta policy.
pub struct PolicyGradientAgent {
    player: PlayerId,
    obs_dim: usize,
    model: BetaPolicyNet<TrainBackend>,
    optimizer: OptimizerAdaptor<Adam, BetaPolicyNet<TrainBackend>, TrainBackend>,
    device: NdArrayDevice,
    rng: GameRng,
    learning_rate: f64,
    pass_threshold: f32,
    input_scale: f32,
}

impl PolicyGradientAgent {
    /// Agent for `player` reading observations of length `obs_dim`, with
    /// the default network shape.
    pub fn new(player: PlayerId, obs_dim: usize, seed: u64) -> Self {
        Self::with_policy(player, obs_dim, seed, &PolicyConfig::new())
    }

    /// Agent with an explicit network shape.
    pub fn with_policy(player: PlayerId, obs_dim: usize, seed: u64, config: &PolicyConfig) -> Self {
        let device = NdArrayDevice::default();
        TrainBackend::seed(seed);
        Self {
            player,
            obs_dim,
            model: BetaPolicyNet::new(&device, obs_dim, config),
            optimizer: AdamConfig::new().init(),
            device,
            rng: GameRng::new(seed),
            learning_rate: 1e-3,
            pass_threshold: 0.0,
            input_scale: 0.01,
        }
    }

    /// Adam step size.
    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    /// Draws below this value are submitted as a pass.
    pub fn with_pass_threshold(mut self, pass_threshold: f32) -> Self {
        self.pass_threshold = pass_threshold;
        self
    }

    /// Factor applied to every observation value before the network.
    pub fn with_input_scale(mut self, input_scale: f32) -> Self {
        self.input_scale = input_scale;
        self
    }

    #[must_use]
    pub fn obs_dim(&self) -> usize {
        self.obs_dim
    }

    #[must_use]
    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    #[must_use]
    pub fn pass_threshold(&self) -> f32 {
        self.pass_threshold
    }

    /// Number of trainable scalars in the network.
    #[must_use]
    pub fn num_params(&self) -> usize {
        self.model.num_params()
    }

    /// Scaled `[rows, obs_dim]` input tensor.
    fn inputs<B: Backend>(&self, observations: &[&[f32]], device: &B::Device) -> Tensor<B, 2> {
        let flat: Vec<f32> = observations
            .iter()
            .flat_map(|obs| obs.iter().map(|&v| self.input_scale * v))
            .collect();
        Tensor::<B, 1>::from_floats(flat.as_slice(), device).reshape([observations.len(), self.obs_dim])
    }

    /// `(alpha, beta)` of the policy at an observation.
    #[must_use]
    pub fn distribution(&self, observation: &[f32]) -> (f64, f64) {
        let model = self.model.valid();
        let (alpha, beta) = model.forward(self.inputs(&[observation], &self.device));
        (alpha.into_scalar().elem::<f64>(), beta.into_scalar().elem::<f64>())
    }

    /// Log-probability of drawing `sample` at `observation`.
    #[must_use]
    pub fn log_prob(&self, observation: &[f32], sample: f32) -> f64 {
        let model = self.model.valid();
        let (alpha, beta) = model.forward(self.inputs(&[observation], &self.device));
        let sample = Tensor::from_floats([sample], &self.device);
        beta::log_prob(sample, alpha, beta).into_scalar().elem::<f64>()
    }
}

impl fmt::Debug for PolicyGradientAgent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PolicyGradientAgent")
            .field("player", &self.player)
            .field("obs_dim", &self.obs_dim)
            .field("num_params", &self.num_params())
            .field("learning_rate", &self.learning_rate)
            .field("pass_threshold", &self.pass_threshold)
            .field("input_scale", &self.input_scale)
            .finish_non_exhaustive()
    }
}

impl Agent for PolicyGradientAgent {
    fn player(&self) -> PlayerId {
        self.player
    }

    fn act(&mut self, observation: &[f32]) -> AgentAction {
        debug_assert_eq!(observation.len(), self.obs_dim, "observation length mismatch");

        let (alpha, beta) = self.distribution(observation);
        let sample = self
            .rng
            .gen_beta(alpha, beta)
            .clamp(beta::EPSILON, 1.0 - beta::EPSILON) as f32;
        let log_prob = self.log_prob(observation, sample) as f32;

        let raise_intensity = if sample < self.pass_threshold { 0.0 } else { sample };
        AgentAction {
            raise_intensity,
            log_prob,
            sample,
        }
    }

    fn is_trainable(&self) -> bool {
        true
    }

    fn as_trainable(&mut self) -> Option<&mut dyn Trainable> {
        Some(self)
    }
}

impl Trainable for PolicyGradientAgent {
    fn update(&mut self, batch: &[PlayerTrajectory]) -> UpdateStats {
        let mut observations: Vec<&[f32]> = Vec::new();
        let mut samples = Vec::new();
        let mut returns = Vec::new();
        for trajectory in batch {
            observations.extend(trajectory.observations.iter().map(Vec::as_slice));
            samples.extend_from_slice(&trajectory.samples);
            returns.extend(trajectory.returns());
        }

        let n = observations.len();
        if n == 0 {
            return UpdateStats::default();
        }

        let mean_return = returns.iter().sum::<f64>() / n as f64;
        let std = if n > 1 {
            let var = returns.iter().map(|g| (g - mean_return).powi(2)).sum::<f64>() / (n - 1) as f64;
            var.sqrt()
        } else {
            0.0
        };
        let advantages: Vec<f32> = returns
            .iter()
            .map(|g| ((g - mean_return) / (std + ADVANTAGE_EPSILON)) as f32)
            .collect();

        let inputs = self.inputs::<TrainBackend>(&observations, &self.device);
        let samples = Tensor::<TrainBackend, 1>::from_floats(samples.as_slice(), &self.device);
        let advantages = Tensor::<TrainBackend, 1>::from_floats(advantages.as_slice(), &self.device);

        let (alpha, beta) = self.model.forward(inputs);
        let log_probs = beta::log_prob(samples, alpha, beta);
        let loss = -(log_probs * advantages).mean();
        let loss_value = loss.clone().into_scalar().elem::<f64>();

        let grads = loss.backward();
        let grad_norm = self.model.grad_norm(&grads);
        let grads = GradientsParams::from_grads(grads, &self.model);
        self.model = self.optimizer.step(self.learning_rate, self.model.clone(), grads);

        let stats = UpdateStats {
            loss: loss_value,
            mean_return,
            samples: n,
            grad_norm,
        };
        debug!(player = %self.player, ?stats, "policy updated");
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_policy() -> PolicyConfig {
        PolicyConfig::new().with_hidden_size(16).with_hidden_layers(2)
    }

    fn agent(player: PlayerId, obs_dim: usize, seed: u64) -> PolicyGradientAgent {
        PolicyGradientAgent::with_policy(player, obs_dim, seed, &small_policy())
    }

    fn trajectory(player: PlayerId, obs_dim: usize, samples: &[f32], final_reward: f64) -> PlayerTrajectory {
        let mut traj = PlayerTrajectory::new(player);
        for (i, &sample) in samples.iter().enumerate() {
            let observation = vec![10.0 * (i as f32 + 1.0); obs_dim];
            traj.push(observation, AgentAction::new(sample, 0.0), 0.0, false, false);
        }
        traj.finish(final_reward, true, false);
        traj
    }

    #[test]
    fn test_act_samples_inside_unit_interval() {
        let mut agent = agent(PlayerId::new(0), 20, 1);
        let obs = vec![1.0; 20];
        for _ in 0..50 {
            let action = agent.act(&obs);
            assert!(action.raise_intensity > 0.0 && action.raise_intensity < 1.0);
            assert!(action.log_prob.is_finite());
            let expected = agent.log_prob(&obs, action.sample) as f32;
            assert!((action.log_prob - expected).abs() < 1e-4);
        }
    }

    #[test]
    fn test_initial_shape_parameters_above_one() {
        let agent = agent(PlayerId::new(0), 20, 1);
        let (alpha, beta) = agent.distribution(&[45.0; 20]);
        assert!(alpha > 1.0 && beta > 1.0);
    }

    #[test]
    fn test_default_network_is_deep_mlp() {
        let agent = PolicyGradientAgent::new(PlayerId::new(0), 20, 0);
        // 20 -> 256, nine 256 -> 256, 256 -> 2
        let expected = (20 * 256 + 256) + 9 * (256 * 256 + 256) + (256 * 2 + 2);
        assert_eq!(agent.num_params(), expected);
    }

    #[test]
    fn test_pass_threshold_turns_low_draws_into_passes() {
        let mut agent = agent(PlayerId::new(0), 4, 2).with_pass_threshold(1.0);
        let action = agent.act(&[0.0; 4]);
        assert_eq!(action.raise_intensity, 0.0);
        assert!(action.sample > 0.0);
    }

    #[test]
    fn test_is_trainable() {
        let mut agent = agent(PlayerId::new(2), 4, 0);
        assert!(agent.is_trainable());
        assert!(agent.as_trainable().is_some());
    }

    #[test]
    fn test_empty_batch_leaves_policy() {
        let mut agent = agent(PlayerId::new(0), 4, 0);
        let obs = [10.0; 4];
        let before = agent.distribution(&obs);
        let stats = agent.update(&[]);
        assert_eq!(stats.samples, 0);
        assert_eq!(agent.distribution(&obs), before);
    }

    #[test]
    fn test_update_increases_log_prob_of_rewarded_draws() {
        let player = PlayerId::new(0);
        let mut agent = agent(player, 4, 0).with_learning_rate(0.01);

        // High draws lead to reward, low draws do not.
        let batch = vec![
            trajectory(player, 4, &[0.9], 10.0),
            trajectory(player, 4, &[0.1], 0.0),
        ];
        let obs = batch[0].observations[0].clone();
        let high_before = agent.log_prob(&obs, 0.9);
        let low_before = agent.log_prob(&obs, 0.1);

        let stats = agent.update(&batch);
        assert_eq!(stats.samples, 2);
        assert!(stats.grad_norm > 0.0);
        assert!(stats.loss.is_finite());
        assert!((stats.mean_return - 5.0).abs() < 1e-12);

        let high_after = agent.log_prob(&obs, 0.9);
        let low_after = agent.log_prob(&obs, 0.1);
        assert!(high_after - low_after > high_before - low_before);
    }
}
