//! irt — the IRT math kernel.
//!
//! Purpose
//! -------
//! Provide the mathematical base layer of the adaptive engine: the
//! four-parameter logistic response model, Fisher information, the
//! log-likelihood of a response pattern, prior grids for EAP quadrature,
//! and the bisection search used by difficulty-targeted selection. Every
//! higher layer (estimators, selectors, sessions, the multi-CAT
//! controller) is built from these primitives.
//!
//! Key behaviors
//! -------------
//! - Canonicalize dynamically keyed item-parameter records into
//!   [`ItemParams`] and validate the 4PL domain (`params`).
//! - Evaluate `P(θ; ζ)` and `I(θ; ζ)` with asymptote guards (`model`).
//! - Accumulate ε-clamped Bernoulli log-likelihoods (`likelihood`).
//! - Build validated 0.1-step prior grids over the θ-bounds (`priors`).
//! - Locate the nearest difficulty in a sorted pool in O(log n)
//!   (`search`).
//!
//! Invariants & assumptions
//! ------------------------
//! - All kernel functions are pure; they neither allocate shared state nor
//!   perform I/O, and they assume their [`ItemParams`] inputs passed
//!   validation.
//! - `c ≤ P(θ; ζ) ≤ d` for all finite θ, and `I(θ; ζ) ≥ 0` with equality
//!   at or past the asymptotes.
//!
//! Downstream usage
//! ----------------
//! - The estimators consume [`log_likelihood`] and
//!   [`fisher_information`]; selection consumes [`fisher_information`] and
//!   [`closest_index`]; sessions own a [`PriorGrid`] when configured for
//!   EAP.

pub mod likelihood;
pub mod model;
pub mod params;
pub mod priors;
pub mod search;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::likelihood::log_likelihood;
pub use self::model::{fisher_information, probability};
pub use self::params::ItemParams;
pub use self::priors::{PriorGrid, PriorSpec};
pub use self::search::closest_index;

// ---- Optional convenience prelude for downstream crates -------------------

pub mod prelude {
    pub use super::likelihood::log_likelihood;
    pub use super::model::{fisher_information, probability};
    pub use super::params::ItemParams;
    pub use super::priors::{PriorGrid, PriorSpec};
    pub use super::search::closest_index;
}
