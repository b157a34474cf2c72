//! estimation — ability estimators and the precision readout.
//!
//! Purpose
//! -------
//! Turn an administered response pattern into a point estimate of θ and a
//! standard error. Two estimators are provided: maximum likelihood
//! (`mle`, a multi-start sweep over the bracketed scalar minimizer) and
//! expected a posteriori (`eap`, grid quadrature against a prior).
//!
//! Key behaviors
//! -------------
//! - [`estimate_mle`] minimizes `−logL` from four starting points and
//!   clamps the winner into the θ-bounds.
//! - [`estimate_eap`] computes the posterior mean over a [`PriorGrid`],
//!   falling back to 0 on an underflowed posterior.
//! - [`standard_error`] inverts the square root of the accumulated Fisher
//!   information at the current estimate; an uninformative pool yields +∞.
//!
//! Invariants & assumptions
//! ------------------------
//! - Callers pass equal-length ζ/response slices; the session boundary
//!   enforces this before estimation runs.
//! - Estimates are finite; the standard error is positive or +∞.
//!
//! [`PriorGrid`]: crate::irt::priors::PriorGrid

pub mod eap;
pub mod mle;

use crate::irt::model::fisher_information;
use crate::irt::params::ItemParams;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::eap::estimate_eap;
pub use self::mle::estimate_mle;

/// Standard error of measurement at `theta` over the administered items.
///
/// `1/√Σ I(θ; ζᵢ)`; +∞ when the information sum is zero (no items, or all
/// items pinned at their asymptotes).
pub fn standard_error(theta: f64, zetas: &[ItemParams]) -> f64 {
    let information: f64 = zetas.iter().map(|zeta| fisher_information(theta, zeta)).sum();
    if information == 0.0 {
        f64::INFINITY
    } else {
        1.0 / information.sqrt()
    }
}

// ---- Optional convenience prelude for downstream crates -------------------

pub mod prelude {
    pub use super::eap::estimate_eap;
    pub use super::mle::estimate_mle;
    pub use super::standard_error;
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    // Purpose
    // -------
    // The standard error is the inverse root of the information sum, and
    // shrinks as informative items accumulate.
    fn standard_error_inverts_accumulated_information() {
        let zeta = ItemParams::default();
        let single = fisher_information(0.0, &zeta);

        assert_relative_eq!(standard_error(0.0, &[zeta]), 1.0 / single.sqrt());
        assert!(standard_error(0.0, &[zeta; 4]) < standard_error(0.0, &[zeta]));
    }

    #[test]
    // Purpose
    // -------
    // No items, or items whose probability is pinned at an asymptote,
    // carry zero information and produce an infinite standard error.
    fn zero_information_yields_infinite_standard_error() {
        assert_eq!(standard_error(0.0, &[]), f64::INFINITY);

        let pinned = ItemParams::new(3.0, 0.0, 0.3, 0.9).expect("valid params");
        assert_eq!(standard_error(200.0, &[pinned]), f64::INFINITY);
    }
}
