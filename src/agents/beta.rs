//! Beta-distribution log-density as a tensor expression.
//!
//! Everything here is built from elementwise tensor ops, so on an autodiff
//! backend the gradient with respect to both shape parameters comes out of
//! `backward()`.

use burn::prelude::*;

/// Samples are kept this far away from 0 and 1 so the log-density stays
/// finite.
pub const EPSILON: f64 = 1e-6;

/// `0.5 * ln(2 pi)`.
const HALF_LN_TWO_PI: f64 = 0.918_938_533_204_672_8;

/// Arguments are shifted up by this much before the Stirling series.
const STIRLING_SHIFT: usize = 6;

/// `ln Gamma(x)` for `x > 0`, elementwise.
///
/// Uses `ln Gamma(x) = ln Gamma(x + k) - ln(x (x + 1) ... (x + k - 1))` and
/// evaluates the shifted term with a three-term Stirling series.
pub fn ln_gamma<B: Backend, const D: usize>(x: Tensor<B, D>) -> Tensor<B, D> {
    let mut rising = x.clone();
    for k in 1..STIRLING_SHIFT {
        rising = rising * x.clone().add_scalar(k as f64);
    }

    let z = x.add_scalar(STIRLING_SHIFT as f64);
    let inv = z.clone().recip();
    let inv2 = inv.clone() * inv.clone();
    // 1/(12z) - 1/(360z^3) + 1/(1260z^5)
    let series = inv * (inv2.clone() * inv2.mul_scalar(1.0 / 1260.0).sub_scalar(1.0 / 360.0)).add_scalar(1.0 / 12.0);

    z.clone().sub_scalar(0.5) * z.clone().log() - z + series.add_scalar(HALF_LN_TWO_PI) - rising.log()
}

/// `ln B(a, b)`.
pub fn ln_beta<B: Backend, const D: usize>(a: Tensor<B, D>, b: Tensor<B, D>) -> Tensor<B, D> {
    ln_gamma(a.clone()) + ln_gamma(b.clone()) - ln_gamma(a + b)
}

/// Log-density of `Beta(alpha, beta)` at `x`, elementwise.
pub fn log_prob<B: Backend, const D: usize>(
    x: Tensor<B, D>,
    alpha: Tensor<B, D>,
    beta: Tensor<B, D>,
) -> Tensor<B, D> {
    let x = x.clamp(EPSILON, 1.0 - EPSILON);
    let log_x = x.clone().log();
    let log_one_minus_x = x.neg().add_scalar(1.0).log();

    alpha.clone().sub_scalar(1.0) * log_x + beta.clone().sub_scalar(1.0) * log_one_minus_x - ln_beta(alpha, beta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::{Autodiff, NdArray};
    use burn::tensor::ElementConversion;

    type B = NdArray;

    fn scalar(values: Tensor<B, 1>) -> f64 {
        values.into_scalar().elem::<f64>()
    }

    fn t(value: f64) -> Tensor<B, 1> {
        Tensor::from_floats([value as f32], &Default::default())
    }

    #[test]
    fn test_ln_gamma_known_values() {
        assert!(scalar(ln_gamma(t(1.0))).abs() < 1e-5);
        assert!(scalar(ln_gamma(t(2.0))).abs() < 1e-5);
        assert!((scalar(ln_gamma(t(5.0))) - 24f64.ln()).abs() < 1e-4);
        assert!((scalar(ln_gamma(t(0.5))) - std::f64::consts::PI.sqrt().ln()).abs() < 1e-4);
    }

    #[test]
    fn test_uniform_and_symmetric_densities() {
        assert!(scalar(log_prob(t(0.3), t(1.0), t(1.0))).abs() < 1e-4);
        // Beta(2, 2) has density 6x(1-x).
        assert!((scalar(log_prob(t(0.5), t(2.0), t(2.0))) - 1.5f64.ln()).abs() < 1e-4);
    }

    #[test]
    fn test_boundary_samples_stay_finite() {
        assert!(scalar(log_prob(t(0.0), t(2.0), t(2.0))).is_finite());
        assert!(scalar(log_prob(t(1.0), t(2.0), t(2.0))).is_finite());
    }

    #[test]
    fn test_backward_gives_shape_gradients() {
        type AB = Autodiff<NdArray>;
        let device = Default::default();
        let x = Tensor::<AB, 1>::from_floats([0.5f32], &device);
        let alpha = Tensor::<AB, 1>::from_floats([1.0f32], &device).require_grad();
        let beta = Tensor::<AB, 1>::from_floats([1.0f32], &device).require_grad();

        let grads = log_prob(x, alpha.clone(), beta.clone()).backward();
        let d_alpha = alpha.grad(&grads).unwrap().into_scalar().elem::<f64>();
        let d_beta = beta.grad(&grads).unwrap().into_scalar().elem::<f64>();

        // d/da = ln x - psi(a) + psi(a + b), and psi(2) - psi(1) = 1.
        let expected = 0.5f64.ln() + 1.0;
        assert!((d_alpha - expected).abs() < 1e-3, "{d_alpha} vs {expected}");
        assert!((d_beta - expected).abs() < 1e-3, "{d_beta} vs {expected}");
    }
}
