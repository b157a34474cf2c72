//! Session configuration: estimation method, selection policy, θ-bounds.
//!
//! Purpose
//! -------
//! Bundle everything a CAT session needs to be constructed in one validated
//! place: the ability estimator (with its prior when applicable), the item
//! selector, the non-adaptive start-up policy, the θ-bounds, and the RNG
//! seed. String labels from the caller boundary are parsed exactly once,
//! here; the session itself only ever sees the typed forms.
//!
//! Conventions
//! -----------
//! - Defaults mirror the conventional CAT setup: MLE, maximum-information
//!   selection, no start-up phase with a `middle` opener, bounds `[−6, 6]`.
//! - Validation of numeric prior parameters happens against the θ-bounds
//!   when the session builds its grid, since both live here.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{CatError, CatResult};
use crate::irt::priors::PriorSpec;
use crate::selection::Selector;

/// Ability-estimation method.
///
/// Variants:
/// - `Mle`: maximum likelihood via the bracketed minimizer.
/// - `Eap(PriorSpec)`: posterior mean over the prior's quadrature grid.
///
/// Parsing: `FromStr` accepts `mle` and `eap` case-insensitively; `eap`
/// starts from the standard-normal prior, which callers refine via
/// [`PriorSpec::parse`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Method {
    Mle,
    Eap(PriorSpec),
}

impl FromStr for Method {
    type Err = CatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mle" => Ok(Method::Mle),
            "eap" => Ok(Method::Eap(PriorSpec::default())),
            _ => Err(CatError::InvalidMethod { name: s.to_string() }),
        }
    }
}

/// Inclusive ability bounds `[lower, upper]`.
///
/// Every estimate is clamped into these bounds, the EAP grid spans them,
/// and prior parameters are validated against them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThetaBounds {
    pub lower: f64,
    pub upper: f64,
}

impl Default for ThetaBounds {
    fn default() -> Self {
        ThetaBounds { lower: -6.0, upper: 6.0 }
    }
}

impl ThetaBounds {
    /// Construct validated bounds.
    ///
    /// # Errors
    /// [`CatError::InvalidThetaBounds`] unless `lower < upper` and both are
    /// finite.
    pub fn new(lower: f64, upper: f64) -> CatResult<Self> {
        if !lower.is_finite() || !upper.is_finite() || lower >= upper {
            return Err(CatError::InvalidThetaBounds { lower, upper });
        }
        Ok(ThetaBounds { lower, upper })
    }

    /// Clamp a value into the bounds.
    pub fn clamp(&self, theta: f64) -> f64 {
        theta.clamp(self.lower, self.upper)
    }
}

/// Configuration for one CAT session.
///
/// Fields:
/// - `method`: ability estimator; `Eap` carries its prior.
/// - `item_select`: selector used after the start-up phase.
/// - `n_start_items` / `start_select`: length of the non-adaptive opening
///   and the selector that drives it (restricted to `random`, `middle`,
///   `fixed`).
/// - `bounds`: θ-bounds for clamping, the EAP grid, and MLE starts.
/// - `seed`: RNG seed; `None` draws one from entropy, so pass a seed for
///   reproducible `random`/`middle` selection.
///
/// Construct via struct update over [`CatOptions::default`]; the session
/// constructor performs cross-field validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatOptions {
    pub method: Method,
    pub item_select: Selector,
    pub n_start_items: usize,
    pub start_select: Selector,
    pub bounds: ThetaBounds,
    pub seed: Option<u64>,
}

impl Default for CatOptions {
    fn default() -> Self {
        CatOptions {
            method: Method::Mle,
            item_select: Selector::Mfi,
            n_start_items: 0,
            start_select: Selector::Middle,
            bounds: ThetaBounds::default(),
            seed: None,
        }
    }
}

impl CatOptions {
    /// Validate cross-field constraints.
    ///
    /// # Errors
    /// - [`CatError::InvalidStartSelector`] when the start-up selector is
    ///   ability-driven.
    /// - [`CatError::InvalidThetaBounds`] for degenerate bounds.
    ///
    /// Prior-vs-bounds validation happens when the session builds its grid.
    pub fn validate(&self) -> CatResult<()> {
        if !self.start_select.is_valid_start() {
            return Err(CatError::InvalidStartSelector {
                name: self.start_select.label().to_string(),
            });
        }
        ThetaBounds::new(self.bounds.lower, self.bounds.upper)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    #[test]
    // Purpose
    // -------
    // Method labels parse case-insensitively; `eap` starts from the
    // standard-normal prior.
    fn method_labels_parse() {
        assert_eq!("MLE".parse::<Method>().expect("parses"), Method::Mle);
        assert_eq!(
            "eap".parse::<Method>().expect("parses"),
            Method::Eap(PriorSpec::Normal { mean: 0.0, sd: 1.0 })
        );
        assert_eq!(
            "map".parse::<Method>().expect_err("unknown method").kind(),
            ErrorKind::InvalidConfig
        );
    }

    #[test]
    // Purpose
    // -------
    // Bounds must be finite and ordered; clamping respects them.
    fn bounds_validate_and_clamp() {
        let bounds = ThetaBounds::new(-4.0, 4.0).expect("valid bounds");
        assert_eq!(bounds.clamp(-9.0), -4.0);
        assert_eq!(bounds.clamp(1.5), 1.5);

        assert!(matches!(
            ThetaBounds::new(2.0, 2.0),
            Err(CatError::InvalidThetaBounds { .. })
        ));
        assert!(matches!(
            ThetaBounds::new(f64::NEG_INFINITY, 0.0),
            Err(CatError::InvalidThetaBounds { .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Cross-field validation rejects ability-driven start selectors and
    // accepts the defaults.
    fn validate_rejects_adaptive_start_selectors() {
        assert!(CatOptions::default().validate().is_ok());

        let options = CatOptions { start_select: Selector::Mfi, ..CatOptions::default() };
        let err = options.validate().expect_err("mfi cannot open a session");
        assert_eq!(err, CatError::InvalidStartSelector { name: "mfi".into() });
    }
}
