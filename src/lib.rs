//! rust_adaptive_testing — a computerized adaptive testing engine on IRT.
//!
//! Purpose
//! -------
//! Estimate an examinee's latent ability from a live response stream and
//! pick, at every turn, the item that measures them best, stopping once
//! precision suffices. The crate is a pure library core: callers supply
//! calibrated item pools as in-memory values and receive updated engine
//! state plus the next item; rendering, transport, and persistence stay
//! with the caller.
//!
//! Key behaviors
//! -------------
//! - Evaluate the four-parameter logistic response model, Fisher
//!   information, and pattern log-likelihoods (`irt`).
//! - Estimate ability by maximum likelihood (bracketed scalar
//!   minimization, `optimization`) or expected a posteriori (prior-grid
//!   quadrature), with a standard-error readout (`estimation`).
//! - Select items by maximum information, closest difficulty, or the
//!   non-adaptive strategies, behind a start-up policy (`selection`).
//! - Track per-construct state — history, θ, SE — in a [`CatSession`]
//!   (`session`).
//! - Orchestrate several constructs over one shared multi-zeta corpus
//!   with early-stopping criteria in a [`MultiCat`] (`multicat`).
//!
//! Invariants & assumptions
//! ------------------------
//! - Item parameters are given, already calibrated; the engine never
//!   re-estimates them and never learns across examinees.
//! - All work for one examinee is sequential and cheap enough for a
//!   request handler; nothing blocks, spawns, or logs.
//! - Every fallible boundary returns a classified [`CatError`]; exhausted
//!   item pools are not errors but `None` results with a recorded
//!   stopping reason.
//! - Randomness is reproducible: a caller-supplied seed pins the
//!   `random` and `middle` selectors and every controller draw.
//!
//! Conventions
//! -----------
//! - String labels (methods, selectors, priors, operators) are parsed
//!   once, case-insensitively, at configuration time; the engine works on
//!   typed enums afterwards.
//! - Item metadata is opaque `serde_json` data, passed through untouched.
//!
//! Downstream usage
//! ----------------
//! - Single-construct callers drive a [`CatSession`] directly:
//!
//!   ```rust
//!   use rust_adaptive_testing::prelude::*;
//!
//!   # fn main() -> Result<(), CatError> {
//!   let mut session = CatSession::new(CatOptions { seed: Some(7), ..CatOptions::default() })?;
//!   session.update(ItemParams::default(), true)?;
//!   let pool = vec![FlatStimulus::new(0, ItemParams::with_difficulty(0.5))];
//!   let (next, _rest) = session.find_next(pool, None);
//!   assert!(next.is_some());
//!   # Ok(())
//!   # }
//!   ```
//!
//! - Multi-construct callers loop on [`MultiCat::update_and_select`],
//!   echoing each administered stimulus back with its answer.
//!
//! Testing notes
//! -------------
//! - Numerical behavior is covered by unit tests colocated with each
//!   module; the end-to-end controller scenarios live in
//!   `tests/integration_multicat_pipeline.rs`.

pub mod errors;
pub mod estimation;
pub mod irt;
pub mod multicat;
pub mod optimization;
pub mod selection;
pub mod session;

// ---- Re-exports (primary public surface) ----------------------------------

pub use crate::errors::{CatError, CatResult, ErrorKind};
pub use crate::irt::{ItemParams, PriorGrid, PriorSpec};
pub use crate::multicat::{
    LogicalOperator, MultiCat, StopAfterNItems, StopIfSeBelowThreshold, StopOnSePlateau,
    Stimulus, StoppingController, UpdateSelectOptions, Zeta, UNVALIDATED_CAT,
};
pub use crate::selection::{FlatStimulus, Selector};
pub use crate::session::{CatOptions, CatSession, Method, ThetaBounds};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rust_adaptive_testing::prelude::*;
//
// to import the main engine surface in a single line.

pub mod prelude {
    pub use crate::errors::{CatError, CatResult, ErrorKind};
    pub use crate::estimation::prelude::*;
    pub use crate::irt::prelude::*;
    pub use crate::multicat::prelude::*;
    pub use crate::optimization::prelude::*;
    pub use crate::selection::prelude::*;
    pub use crate::session::prelude::*;
}
