//! Expected-a-posteriori ability estimation.
//!
//! Purpose
//! -------
//! Estimate θ as the posterior mean over a discretized prior: for each grid
//! cell, weight the exponentiated pattern log-likelihood by the prior mass
//! and average the cell abscissas. The prior grid need not be normalized —
//! the normalizing constant cancels in the ratio.

use crate::irt::likelihood::log_likelihood;
use crate::irt::params::ItemParams;
use crate::irt::priors::PriorGrid;

/// Posterior-mean estimate of θ over `grid`.
///
/// Returns `Σ θ·ℓ(θ)·π(θ) / Σ ℓ(θ)·π(θ)` with `ℓ = exp(logL)`. When the
/// denominator underflows to zero (a pattern impossible everywhere the
/// prior has mass), the estimate falls back to 0.
pub fn estimate_eap(zetas: &[ItemParams], responses: &[bool], grid: &PriorGrid) -> f64 {
    let mut numerator = 0.0;
    let mut denominator = 0.0;
    for (&theta, &weight) in grid.points.iter().zip(grid.weights.iter()) {
        let likelihood = log_likelihood(theta, zetas, responses).exp();
        numerator += theta * likelihood * weight;
        denominator += likelihood * weight;
    }
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::irt::priors::PriorSpec;
    use approx::assert_abs_diff_eq;

    fn standard_grid() -> PriorGrid {
        PriorSpec::default().to_grid(-6.0, 6.0).expect("default prior is valid")
    }

    #[test]
    // Purpose
    // -------
    // With no responses the posterior is the prior, so the estimate sits at
    // the prior mean.
    fn empty_pattern_returns_the_prior_mean() {
        let theta = estimate_eap(&[], &[], &standard_grid());

        assert_abs_diff_eq!(theta, 0.0, epsilon = 1e-9);
    }

    #[test]
    // Purpose
    // -------
    // Evidence moves the posterior mean in the direction of the responses,
    // but the prior keeps it short of the likelihood-only estimate.
    fn prior_shrinks_the_estimate_toward_its_mean() {
        let zetas = [ItemParams::with_difficulty(-1.0), ItemParams::with_difficulty(-0.5)];
        let responses = [false, false];

        let eap = estimate_eap(&zetas, &responses, &standard_grid());
        let mle = crate::estimation::mle::estimate_mle(&zetas, &responses, -6.0, 6.0);

        assert!(eap < 0.0);
        assert!(eap > mle, "EAP {eap} should sit above MLE {mle}");
    }

    #[test]
    // Purpose
    // -------
    // A uniform prior confines the estimate to its support even when the
    // evidence points outside it.
    fn uniform_prior_confines_the_estimate_to_its_support() {
        let grid = PriorSpec::Uniform { min_support: 0.0, max_support: 2.0 }
            .to_grid(-6.0, 6.0)
            .expect("valid prior");
        let zetas = [ItemParams::with_difficulty(0.0); 3];

        let theta = estimate_eap(&zetas, &[false, false, false], &grid);

        assert!((0.0..=2.0).contains(&theta));
    }

    #[test]
    // Purpose
    // -------
    // When the likelihood underflows everywhere the prior has mass, the
    // estimate falls back to zero instead of dividing by zero.
    fn underflowed_posterior_falls_back_to_zero() {
        let grid = PriorSpec::Uniform { min_support: 4.0, max_support: 6.0 }
            .to_grid(-6.0, 6.0)
            .expect("valid prior");
        // Forty incorrect answers on an item that is trivially easy
        // everywhere in the support: each contributes log(ε).
        let zetas = vec![ItemParams::new(5.0, -10.0, 0.0, 1.0).expect("valid params"); 40];
        let responses = vec![false; 40];

        let theta = estimate_eap(&zetas, &responses, &grid);

        assert_eq!(theta, 0.0);
    }
}
