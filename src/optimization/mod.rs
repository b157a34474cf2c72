//! optimization — bracketed one-dimensional minimization.
//!
//! Purpose
//! -------
//! Provide the scalar minimizer behind maximum-likelihood ability
//! estimation. The search has two stages: grow a bracket around a minimum
//! from an initial guess (`bracket`), then shrink it with Brent-style
//! iteration, parabolic interpolation with a golden-section fallback
//! (`brent`).
//!
//! Key behaviors
//! -------------
//! - [`bracket_minimum`] probes one unit to each side of the start and
//!   walks downhill with doubled steps until the objective turns upward.
//! - [`brent`] refines to tolerance `1e−8` within 200 iterations and
//!   reports the abscissa, value, and iteration count in a
//!   [`MinimizeOutcome`].
//! - [`minimize_scalar`] composes the two stages.
//!
//! Invariants & assumptions
//! ------------------------
//! - Objectives are total functions `f64 → f64`; the estimator layer
//!   guarantees finiteness via ε-clamped likelihoods, so minimization is
//!   infallible and bounded.
//! - Work per call is bounded: at most 64 bracketing doublings plus 200
//!   refinement steps, each a single objective evaluation.
//!
//! Conventions
//! -----------
//! - This module and its submodules avoid I/O and logging; callers own all
//!   reporting.

pub mod bracket;
pub mod brent;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::bracket::{bracket_minimum, Bracket};
pub use self::brent::{brent, minimize_scalar, MinimizeOutcome};

// ---- Optional convenience prelude for downstream crates -------------------

pub mod prelude {
    pub use super::bracket::{bracket_minimum, Bracket};
    pub use super::brent::{brent, minimize_scalar, MinimizeOutcome};
}
