//! The per-construct CAT session.
//!
//! Purpose
//! -------
//! Own the adaptive state for one construct: the administered (ζ, response)
//! history, the current ability estimate and its standard error, the
//! selection policy, and the session RNG. Each update re-estimates θ over
//! the full history with the configured estimator, clamps it into the
//! θ-bounds, and refreshes the standard error at the new estimate.
//!
//! Key behaviors
//! -------------
//! - [`CatSession::new`] validates the configuration once (start-selector
//!   restriction, bounds, prior-vs-bounds) and builds the EAP grid up
//!   front.
//! - [`CatSession::update`] / [`CatSession::update_batch`] append to the
//!   history atomically: incoming parameters are validated before any
//!   state changes, and a length mismatch rejects the whole batch.
//! - [`CatSession::find_next`] applies the start-up policy, then the
//!   configured selector, honoring a per-call override after start-up.
//!
//! Invariants
//! ----------
//! - `zetas.len() == responses.len() == n_items()` at all times.
//! - `θ ∈ [lower, upper]` after every update; SE is positive or +∞, the
//!   latter exactly when the accumulated information is zero.
//! - A session with no responses reports `θ = 0` and `SE = +∞`.

use rand::SeedableRng;
use rand_pcg::Pcg64;

use crate::errors::{CatError, CatResult};
use crate::estimation::{estimate_eap, estimate_mle, standard_error};
use crate::irt::params::ItemParams;
use crate::irt::priors::PriorGrid;
use crate::selection::{FlatStimulus, Selector};
use crate::session::options::{CatOptions, Method};

/// Adaptive-testing state for a single construct.
///
/// Construct with [`CatSession::new`]; drive with `update*` and
/// `find_next`; read `theta`, `se`, and `n_items` between turns.
#[derive(Debug, Clone)]
pub struct CatSession {
    options: CatOptions,
    /// Quadrature grid, present exactly when the method is EAP.
    prior_grid: Option<PriorGrid>,
    theta: f64,
    se: f64,
    zetas: Vec<ItemParams>,
    responses: Vec<bool>,
    rng: Pcg64,
}

impl CatSession {
    /// Build a session from validated options.
    ///
    /// The response history starts empty with `θ = 0` and `SE = +∞`. For
    /// EAP, the prior is validated against the θ-bounds and discretized
    /// here, once.
    ///
    /// # Errors
    /// Configuration failures per [`CatOptions::validate`] and
    /// [`PriorSpec::to_grid`](crate::irt::priors::PriorSpec::to_grid).
    pub fn new(options: CatOptions) -> CatResult<Self> {
        options.validate()?;
        let prior_grid = match options.method {
            Method::Eap(prior) => {
                Some(prior.to_grid(options.bounds.lower, options.bounds.upper)?)
            }
            Method::Mle => None,
        };
        let rng = match options.seed {
            Some(seed) => Pcg64::seed_from_u64(seed),
            None => Pcg64::from_rng(&mut rand::rng()),
        };
        Ok(CatSession {
            options,
            prior_grid,
            theta: 0.0,
            se: f64::INFINITY,
            zetas: Vec::new(),
            responses: Vec::new(),
            rng,
        })
    }

    /// Append one administered item and re-estimate.
    ///
    /// # Errors
    /// Domain failures on `zeta` (classified as configuration errors).
    pub fn update(&mut self, zeta: ItemParams, response: bool) -> CatResult<()> {
        self.update_batch(&[zeta], &[response])
    }

    /// Append a batch of administered items and re-estimate once.
    ///
    /// The batch is atomic: every ζ is validated before any state changes.
    ///
    /// # Errors
    /// - [`CatError::ParamResponseLengthMismatch`] when the slices differ
    ///   in length.
    /// - Domain failures on any ζ in the batch.
    pub fn update_batch(&mut self, zetas: &[ItemParams], responses: &[bool]) -> CatResult<()> {
        if zetas.len() != responses.len() {
            return Err(CatError::ParamResponseLengthMismatch {
                params: zetas.len(),
                responses: responses.len(),
            });
        }
        for zeta in zetas {
            zeta.validate()?;
        }

        self.zetas.extend_from_slice(zetas);
        self.responses.extend_from_slice(responses);

        // An empty history has nothing to estimate from; keep the neutral
        // state rather than optimizing a flat likelihood.
        if self.zetas.is_empty() {
            return Ok(());
        }

        let bounds = self.options.bounds;
        let estimate = match &self.prior_grid {
            Some(grid) => estimate_eap(&self.zetas, &self.responses, grid),
            None => estimate_mle(&self.zetas, &self.responses, bounds.lower, bounds.upper),
        };
        self.theta = bounds.clamp(estimate);
        self.se = standard_error(self.theta, &self.zetas);
        Ok(())
    }

    /// Select the next item from `pool`.
    ///
    /// While fewer than `n_start_items` responses have been recorded, the
    /// start-up selector drives the choice and `item_select_override` is
    /// ignored; afterwards the override (when given) replaces the
    /// configured selector for this call only. Returns `(chosen, rest)`;
    /// an empty pool yields `(None, vec![])`.
    pub fn find_next(
        &mut self, pool: Vec<FlatStimulus>, item_select_override: Option<Selector>,
    ) -> (Option<FlatStimulus>, Vec<FlatStimulus>) {
        let selector = if self.n_items() < self.options.n_start_items {
            self.options.start_select
        } else {
            item_select_override.unwrap_or(self.options.item_select)
        };
        selector.select(pool, self.theta, self.options.n_start_items, &mut self.rng)
    }

    /// Current ability estimate.
    pub fn theta(&self) -> f64 {
        self.theta
    }

    /// Current standard error of measurement.
    pub fn se(&self) -> f64 {
        self.se
    }

    /// Number of administered items.
    pub fn n_items(&self) -> usize {
        self.responses.len()
    }

    /// Administered item parameters, in administration order.
    pub fn zetas(&self) -> &[ItemParams] {
        &self.zetas
    }

    /// Recorded responses, in administration order.
    pub fn responses(&self) -> &[bool] {
        &self.responses
    }

    /// The configuration this session was built from.
    pub fn options(&self) -> &CatOptions {
        &self.options
    }
}
