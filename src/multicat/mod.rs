//! multicat — multi-construct orchestration over a shared corpus.
//!
//! Purpose
//! -------
//! Run several CAT sessions — one per named construct, plus a reserved
//! session for uncalibrated items — against a single pool of multi-zeta
//! stimuli, and decide when the run may stop early. This is the top layer
//! of the engine: callers hand [`MultiCat::update_and_select`] one batch
//! of administered items per turn and receive the next stimulus (or
//! `None` with a stopping reason).
//!
//! Key behaviors
//! -------------
//! - [`Stimulus`]/[`Zeta`] model items calibrated for several constructs,
//!   with the no-duplicate-cat invariant checked at construction
//!   (`stimulus`).
//! - [`MultiCat`] owns the session map, the remaining/seen bookkeeping,
//!   and the selection pipeline (`controller`).
//! - [`StoppingController`] and its three implementations decide early
//!   termination across constructs under a [`LogicalOperator`]
//!   (`stopping`).
//!
//! Invariants & assumptions
//! ------------------------
//! - The whole layer is single-threaded per examinee: one turn runs to
//!   completion on plain value types, with no I/O and no internal
//!   locking. Share a controller across threads only behind external
//!   synchronization.
//! - Randomness flows from the controller seed through derived
//!   per-session seeds; a fixed seed reproduces the full item sequence.
//!
//! Downstream usage
//! ----------------
//! - Typical callers construct the controller once per examinee and loop:
//!   administer the returned stimulus, collect the answer, and feed both
//!   into the next `update_and_select` call until it returns `None`.

pub mod controller;
pub mod stimulus;
pub mod stopping;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::controller::{MultiCat, UpdateSelectOptions};
pub use self::stimulus::{
    check_no_duplicate_cat_names, partition_by_availability, Stimulus, Zeta, UNVALIDATED_CAT,
};
pub use self::stopping::{
    LogicalOperator, StopAfterNItems, StopIfSeBelowThreshold, StopOnSePlateau,
    StoppingController,
};

// ---- Optional convenience prelude for downstream crates -------------------

pub mod prelude {
    pub use super::controller::{MultiCat, UpdateSelectOptions};
    pub use super::stimulus::{Stimulus, Zeta, UNVALIDATED_CAT};
    pub use super::stopping::{
        LogicalOperator, StopAfterNItems, StopIfSeBelowThreshold, StopOnSePlateau,
        StoppingController,
    };
}
