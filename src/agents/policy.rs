//! Beta policy network.
//!
//! A tanh MLP mapping a flat observation batch to the two Beta shape
//! parameters of the raise intensity:
//!
//! ```text
//! obs -> [Linear -> tanh] x hidden_layers -> Linear(2) -> 1 + softplus
//! ```
//!
//! The `1 +` offset keeps both shapes above 1, so the density is unimodal
//! and finite on `(0, 1)`.

use burn::module::Module;
use burn::nn::{Linear, LinearConfig};
use burn::prelude::*;
use burn::tensor::activation::{softplus, tanh};
use burn::tensor::backend::AutodiffBackend;
use burn::tensor::ElementConversion;

/// Shape of the policy network.
#[derive(Config, Debug)]
pub struct PolicyConfig {
    /// Width of every hidden layer.
    #[config(default = 256)]
    pub hidden_size: usize,
    /// Number of hidden layers.
    #[config(default = 10)]
    pub hidden_layers: usize,
}

/// Observation batch to `(alpha, beta)`.
#[derive(Module, Debug)]
pub struct BetaPolicyNet<B: Backend> {
    hidden: Vec<Linear<B>>,
    output: Linear<B>,
}

impl<B: Backend> BetaPolicyNet<B> {
    pub fn new(device: &B::Device, obs_dim: usize, config: &PolicyConfig) -> Self {
        let mut hidden = Vec::with_capacity(config.hidden_layers);
        let mut in_size = obs_dim;
        for _ in 0..config.hidden_layers {
            hidden.push(LinearConfig::new(in_size, config.hidden_size).init(device));
            in_size = config.hidden_size;
        }
        let output = LinearConfig::new(in_size, 2).init(device);

        Self { hidden, output }
    }

    /// Shape parameters for a `[batch, obs_dim]` input, each `[batch]`.
    pub fn forward(&self, obs: Tensor<B, 2>) -> (Tensor<B, 1>, Tensor<B, 1>) {
        let mut x = obs;
        for layer in &self.hidden {
            x = tanh(layer.forward(x));
        }

        let shape = softplus(self.output.forward(x), 1.0).add_scalar(1.0);
        let alpha = shape.clone().narrow(1, 0, 1).squeeze(1);
        let beta = shape.narrow(1, 1, 1).squeeze(1);
        (alpha, beta)
    }
}

impl<B: AutodiffBackend> BetaPolicyNet<B> {
    /// L2 norm of the gradient over every weight and bias.
    pub fn grad_norm(&self, grads: &B::Gradients) -> f64 {
        let mut sum = 0.0;
        for layer in self.hidden.iter().chain(std::iter::once(&self.output)) {
            if let Some(grad) = layer.weight.grad(grads) {
                sum += grad.powf_scalar(2.0).sum().into_scalar().elem::<f64>();
            }
            if let Some(grad) = layer.bias.as_ref().and_then(|bias| bias.grad(grads)) {
                sum += grad.powf_scalar(2.0).sum().into_scalar().elem::<f64>();
            }
        }
        sum.sqrt()
    }
}
