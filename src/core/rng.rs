//! Deterministic random number generation owned by each engine and agent.
//!
//! There is no process-wide generator: every `HighSocietyEnv` and every
//! stochastic agent carries its own `GameRng`, so many instances can run side
//! by side and each one replays exactly from its seed.
//!
//! ```
//! use high_society::core::GameRng;
//!
//! let mut a = GameRng::new(42);
//! let mut b = GameRng::new(42);
//! assert_eq!(a.gen_unit(), b.gen_unit());
//!
//! // A fork is an independent but reproducible stream.
//! let mut agent_rng = a.fork();
//! let _ = agent_rng.gen_unit();
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Deterministic RNG backed by ChaCha8.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
    fork_counter: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
            fork_counter: 0,
        }
    }

    /// The seed this stream was created from.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Derive an independent stream.
    ///
    /// Each call yields a different stream; the sequence of forks is itself
    /// determined by the parent seed.
    #[must_use]
    pub fn fork(&mut self) -> Self {
        self.fork_counter += 1;
        let fork_seed = self
            .seed
            .wrapping_add(self.fork_counter.wrapping_mul(0x9E37_79B9_7F4A_7C15));
        Self::new(fork_seed)
    }

    /// Uniform sample in `[0, 1)`.
    pub fn gen_unit(&mut self) -> f64 {
        self.inner.gen::<f64>()
    }

    /// Uniform sample in `[0, 1)` as `f32`.
    pub fn gen_unit_f32(&mut self) -> f32 {
        self.inner.gen::<f32>()
    }

    /// Bernoulli trial. `probability` is clamped into `[0, 1]`.
    pub fn gen_bool(&mut self, probability: f64) -> bool {
        let p = if probability.is_nan() { 0.0 } else { probability.clamp(0.0, 1.0) };
        self.inner.gen_bool(p)
    }

    /// Shuffle a slice in place (uniform permutation).
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        use rand::seq::SliceRandom;
        slice.shuffle(&mut self.inner);
    }

    /// Standard normal sample (Box-Muller).
    pub fn gen_standard_normal(&mut self) -> f64 {
        // 1 - U keeps the log argument in (0, 1].
        let u1 = 1.0 - self.gen_unit();
        let u2 = self.gen_unit();
        (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos()
    }

    /// Gamma(shape, 1) sample using Marsaglia and Tsang's method.
    ///
    /// Shapes below 1 are boosted: `Gamma(k) = Gamma(k + 1) * U^(1/k)`.
    pub fn gen_gamma(&mut self, shape: f64) -> f64 {
        debug_assert!(shape > 0.0, "gamma shape must be positive");

        if shape < 1.0 {
            let u = 1.0 - self.gen_unit();
            return self.gen_gamma(shape + 1.0) * u.powf(1.0 / shape);
        }

        let d = shape - 1.0 / 3.0;
        let c = 1.0 / (9.0 * d).sqrt();
        loop {
            let x = self.gen_standard_normal();
            let v = 1.0 + c * x;
            if v <= 0.0 {
                continue;
            }
            let v = v * v * v;
            let u = 1.0 - self.gen_unit();
            if u < 1.0 - 0.0331 * x.powi(4) || u.ln() < 0.5 * x * x + d * (1.0 - v + v.ln()) {
                return d * v;
            }
        }
    }

    /// Beta(alpha, beta) sample in `[0, 1]`.
    pub fn gen_beta(&mut self, alpha: f64, beta: f64) -> f64 {
        let x = self.gen_gamma(alpha);
        let y = self.gen_gamma(beta);
        let total = x + y;
        if total > 0.0 {
            x / total
        } else {
            0.5
        }
    }

    /// Get the current state for checkpointing.
    #[must_use]
    pub fn state(&self) -> GameRngState {
        GameRngState {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
            fork_counter: self.fork_counter,
        }
    }

    /// Restore from a saved state.
    #[must_use]
    pub fn from_state(state: &GameRngState) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(state.seed);
        inner.set_word_pos(state.word_pos);
        Self {
            inner,
            seed: state.seed,
            fork_counter: state.fork_counter,
        }
    }
}

/// Serializable RNG position.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRngState {
    /// Seed the stream was created from
    pub seed: u64,
    /// ChaCha8 word position
    pub word_pos: u128,
    /// Number of forks taken so far
    pub fork_counter: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinism() {
        let mut rng1 = GameRng::new(7);
        let mut rng2 = GameRng::new(7);

        for _ in 0..100 {
            assert_eq!(rng1.gen_unit(), rng2.gen_unit());
        }
    }

    #[test]
    fn test_forks_differ_from_parent() {
        let mut rng = GameRng::new(42);
        let mut forked = rng.fork();

        let seq1: Vec<_> = (0..10).map(|_| rng.gen_unit()).collect();
        let seq2: Vec<_> = (0..10).map(|_| forked.gen_unit()).collect();
        assert_ne!(seq1, seq2);
    }

    #[test]
    fn test_shuffle_is_permutation() {
        let mut rng = GameRng::new(42);
        let mut deck: Vec<u32> = (1..=13).collect();
        rng.shuffle(&mut deck);

        deck.sort_unstable();
        assert_eq!(deck, (1..=13).collect::<Vec<_>>());
    }

    #[test]
    fn test_gen_bool_extremes() {
        let mut rng = GameRng::new(3);
        assert!((0..50).all(|_| !rng.gen_bool(0.0)));
        assert!((0..50).all(|_| rng.gen_bool(1.0)));
        assert!((0..50).all(|_| rng.gen_bool(7.5)));
    }

    #[test]
    fn test_gamma_mean() {
        let mut rng = GameRng::new(11);
        for shape in [0.5, 1.0, 3.0] {
            let n = 20_000;
            let mean = (0..n).map(|_| rng.gen_gamma(shape)).sum::<f64>() / n as f64;
            assert!((mean - shape).abs() < 0.1 * shape.max(1.0), "shape {shape}: mean {mean}");
        }
    }

    #[test]
    fn test_beta_in_unit_interval_with_expected_mean() {
        let mut rng = GameRng::new(5);
        let n = 20_000;
        let samples: Vec<f64> = (0..n).map(|_| rng.gen_beta(2.0, 6.0)).collect();

        assert!(samples.iter().all(|&x| (0.0..=1.0).contains(&x)));
        let mean = samples.iter().sum::<f64>() / n as f64;
        assert!((mean - 0.25).abs() < 0.02, "mean {mean}");
    }

    #[test]
    fn test_state_restore_resumes_sequence() {
        let mut rng = GameRng::new(42);
        for _ in 0..17 {
            rng.gen_unit();
        }

        let state = rng.state();
        let expected: Vec<_> = (0..10).map(|_| rng.gen_unit()).collect();

        let mut restored = GameRng::from_state(&state);
        let actual: Vec<_> = (0..10).map(|_| restored.gen_unit()).collect();
        assert_eq!(expected, actual);
    }
}
