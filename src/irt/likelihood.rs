//! Log-likelihood of a binary response pattern.
//!
//! Purpose
//! -------
//! Accumulate the Bernoulli log-likelihood of an administered response
//! pattern under the 4PL model. This is the objective both estimators share:
//! MLE minimizes its negation, EAP exponentiates it cell-by-cell over the
//! prior grid.
//!
//! Conventions
//! -----------
//! - Responses are `bool` (`true` = correct). Each pair contributes
//!   `r·log p + (1 − r)·log(1 − p)`.
//! - Probabilities are clamped from below at `ε = 1e−10` inside the logs, so
//!   a response that is impossible under an item's asymptotes degrades the
//!   likelihood instead of producing `log 0 = −∞` and poisoning the sum.

use crate::irt::model::probability;
use crate::irt::params::ItemParams;

/// Lower clamp applied inside the logs to avoid `log 0`.
const LIKELIHOOD_EPS: f64 = 1e-10;

/// Log-likelihood of `responses` under `zetas` at ability `theta`.
///
/// The two slices are consumed pairwise; callers guarantee equal lengths
/// (the session enforces this at its boundary). An empty pattern has
/// log-likelihood 0.
pub fn log_likelihood(theta: f64, zetas: &[ItemParams], responses: &[bool]) -> f64 {
    zetas
        .iter()
        .zip(responses)
        .map(|(zeta, &correct)| {
            let p = probability(theta, zeta);
            if correct {
                p.max(LIKELIHOOD_EPS).ln()
            } else {
                (1.0 - p).max(LIKELIHOOD_EPS).ln()
            }
        })
        .sum()
}
