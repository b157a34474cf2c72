//! Prior distributions over ability and their quadrature grids.
//!
//! Purpose
//! -------
//! Define [`PriorSpec`], the validated description of an EAP prior, and
//! [`PriorGrid`], its discretization over the session's θ-bounds at step
//! 0.1. The EAP estimator integrates `likelihood · prior` over the grid, so
//! a non-normalized Gaussian grid is harmless; the uniform grid normalizes
//! its nonzero cells to sum exactly to 1.
//!
//! Key behaviors
//! -------------
//! - Parse prior labels case-insensitively (`norm`, `unif`) with exactly two
//!   numeric parameters via [`PriorSpec::parse`].
//! - Validate prior parameters against the θ-bounds at grid-build time:
//!   `σ > 0` and `μ` inside the bounds for the Gaussian, a nonempty support
//!   inside the bounds for the uniform.
//! - Emit grid points `θ = lower, lower + 0.1, …, upper` with each point
//!   rounded to 10 decimals so grid values compare exactly across builders.
//!
//! Conventions
//! -----------
//! - Gaussian cell weights are raw densities (`φ(θ; μ, σ)`), not cell
//!   masses.
//! - Uniform cells carry `1/k` inside the support (`k` nonzero cells) and
//!   exactly 0 outside.

use ndarray::Array1;
use serde::{Deserialize, Serialize};
use statrs::distribution::{Continuous, Normal};

use crate::errors::{CatError, CatResult};

/// Grid resolution over θ.
const GRID_STEP: f64 = 0.1;

/// Round a grid point to 10 decimals so arithmetically equal points compare
/// bitwise equal.
fn round10(value: f64) -> f64 {
    (value * 1e10).round() / 1e10
}

/// Grid points `lower, lower + 0.1, …` up to and including `upper`.
fn theta_points(lower: f64, upper: f64) -> Vec<f64> {
    let mut points = Vec::new();
    let mut index = 0usize;
    loop {
        let theta = round10(lower + GRID_STEP * index as f64);
        if theta > upper + 1e-9 {
            break;
        }
        points.push(theta);
        index += 1;
    }
    points
}

/// Validated description of an EAP prior.
///
/// Variants:
/// - `Normal { mean, sd }` — truncated Gaussian over the θ-bounds.
/// - `Uniform { min_support, max_support }` — equal mass inside the support,
///   zero outside.
///
/// Parse from the string boundary with [`PriorSpec::parse`]; numeric
/// validation happens against the θ-bounds when the grid is built, since
/// the bounds live on the session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PriorSpec {
    Normal { mean: f64, sd: f64 },
    Uniform { min_support: f64, max_support: f64 },
}

impl Default for PriorSpec {
    /// Standard-normal prior, the conventional EAP default.
    fn default() -> Self {
        PriorSpec::Normal { mean: 0.0, sd: 1.0 }
    }
}

impl PriorSpec {
    /// Parse a prior from its label and parameter vector.
    ///
    /// Labels are case-insensitive: `norm` takes `[mean, sd]`, `unif` takes
    /// `[min_support, max_support]`.
    ///
    /// # Errors
    /// - [`CatError::PriorParamCount`] unless exactly two parameters are
    ///   supplied.
    /// - [`CatError::InvalidPriorLabel`] for any other label.
    pub fn parse(label: &str, params: &[f64]) -> CatResult<Self> {
        if params.len() != 2 {
            return Err(CatError::PriorParamCount { expected: 2, actual: params.len() });
        }
        match label.to_lowercase().as_str() {
            "norm" => Ok(PriorSpec::Normal { mean: params[0], sd: params[1] }),
            "unif" => Ok(PriorSpec::Uniform { min_support: params[0], max_support: params[1] }),
            _ => Err(CatError::InvalidPriorLabel { name: label.to_string() }),
        }
    }

    /// Validate this prior against θ-bounds and discretize it.
    ///
    /// # Errors
    /// - [`CatError::InvalidPriorSigma`] for a non-finite or non-positive
    ///   Gaussian standard deviation.
    /// - [`CatError::PriorMeanOutOfBounds`] when the Gaussian mean leaves
    ///   `[lower, upper]`.
    /// - [`CatError::EmptyUniformSupport`] when `min_support >= max_support`.
    /// - [`CatError::UniformSupportOutOfBounds`] when the support extends
    ///   beyond `[lower, upper]`.
    pub fn to_grid(&self, lower: f64, upper: f64) -> CatResult<PriorGrid> {
        match *self {
            PriorSpec::Normal { mean, sd } => {
                if !sd.is_finite() || sd <= 0.0 {
                    return Err(CatError::InvalidPriorSigma { sigma: sd });
                }
                if mean < lower || mean > upper {
                    return Err(CatError::PriorMeanOutOfBounds { mean, lower, upper });
                }
                let gaussian =
                    Normal::new(mean, sd).map_err(|_| CatError::InvalidPriorSigma { sigma: sd })?;
                let points = theta_points(lower, upper);
                let weights = points.iter().map(|&theta| gaussian.pdf(theta)).collect::<Vec<_>>();
                Ok(PriorGrid {
                    points: Array1::from_vec(points),
                    weights: Array1::from_vec(weights),
                })
            }
            PriorSpec::Uniform { min_support, max_support } => {
                if min_support >= max_support {
                    return Err(CatError::EmptyUniformSupport { min_support, max_support });
                }
                if min_support < lower || max_support > upper {
                    return Err(CatError::UniformSupportOutOfBounds {
                        min_support,
                        max_support,
                        lower,
                        upper,
                    });
                }
                let points = theta_points(lower, upper);
                let in_support = |theta: f64| theta >= min_support && theta <= max_support;
                let nonzero = points.iter().copied().filter(|&t| in_support(t)).count();
                let mass = 1.0 / nonzero as f64;
                let weights = points
                    .iter()
                    .map(|&theta| if in_support(theta) { mass } else { 0.0 })
                    .collect::<Vec<_>>();
                Ok(PriorGrid {
                    points: Array1::from_vec(points),
                    weights: Array1::from_vec(weights),
                })
            }
        }
    }
}

/// Discretized prior: paired grid points and weights.
///
/// Invariant: `points.len() == weights.len() > 0`, points strictly
/// increasing on the 0.1 grid.
#[derive(Debug, Clone, PartialEq)]
pub struct PriorGrid {
    pub points: Array1<f64>,
    pub weights: Array1<f64>,
}

impl PriorGrid {
    /// Number of grid cells.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True when the grid holds no cells.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
