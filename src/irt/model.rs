//! 4PL response model: probability and Fisher information.
//!
//! Purpose
//! -------
//! Evaluate the four-parameter logistic response function and its Fisher
//! information for a single item at a given ability. These two functions are
//! the kernel every higher layer builds on: the likelihood sums responses
//! over [`probability`], item selection maximizes [`fisher_information`],
//! and the standard error inverts its accumulated sum.
//!
//! Conventions
//! -----------
//! - `P(θ; ζ) = c + (d − c) / (1 + exp(−a (θ − b)))`, so `P → c` as
//!   `θ → −∞` and `P → d` as `θ → +∞`.
//! - `I(θ; ζ) = a² (q / p) ((p − c)² / (1 − c)²)` with `p = P(θ; ζ)` and
//!   `q = 1 − p`.
//! - Information is clamped to 0 when `p` sits numerically at or past an
//!   asymptote (`p ≤ c` or `p ≥ d`); the exact formula would otherwise
//!   produce NaN or ±∞ there.

use crate::irt::params::ItemParams;

/// Probability of a correct response under the 4PL model.
///
/// Bounded by the asymptotes: `c ≤ P(θ; ζ) ≤ d` for all finite `θ`.
pub fn probability(theta: f64, zeta: &ItemParams) -> f64 {
    let exponent = -zeta.discrimination * (theta - zeta.difficulty);
    zeta.guessing + (zeta.slipping - zeta.guessing) / (1.0 + exponent.exp())
}

/// Fisher information contributed by one item at ability `theta`.
///
/// Non-negative everywhere; exactly 0 when the response probability is at
/// or past an asymptote.
pub fn fisher_information(theta: f64, zeta: &ItemParams) -> f64 {
    let p = probability(theta, zeta);
    if p <= zeta.guessing || p >= zeta.slipping {
        return 0.0;
    }
    let q = 1.0 - p;
    let a = zeta.discrimination;
    let scaled = (p - zeta.guessing) / (1.0 - zeta.guessing);
    a * a * (q / p) * scaled * scaled
}
