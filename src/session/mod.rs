//! session — per-construct adaptive-testing state.
//!
//! Purpose
//! -------
//! Provide the single-construct CAT session: validated configuration
//! ([`CatOptions`]), the stateful session itself ([`CatSession`]), and the
//! typed forms of the string-boundary labels ([`Method`],
//! [`ThetaBounds`]). A session owns its response history, its ability
//! estimate and standard error, and its seeded RNG; the multi-CAT layer
//! composes several of these over one shared corpus.
//!
//! Key behaviors
//! -------------
//! - Parse and validate configuration once, at construction; sessions
//!   never re-validate labels at runtime.
//! - Re-estimate θ over the full history on every update and clamp it into
//!   the θ-bounds; refresh SE at the new estimate.
//! - Apply the non-adaptive start-up policy before the configured (or
//!   per-call overridden) selector.
//!
//! Downstream usage
//! ----------------
//! - Single-construct callers drive a [`CatSession`] directly with flat
//!   item records.
//! - The multi-CAT controller owns one session per construct plus the
//!   `unvalidated` session, projecting corpus stimuli into flat records
//!   per construct.

pub mod core;
pub mod options;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::core::CatSession;
pub use self::options::{CatOptions, Method, ThetaBounds};

// ---- Optional convenience prelude for downstream crates -------------------

pub mod prelude {
    pub use super::core::CatSession;
    pub use super::options::{CatOptions, Method, ThetaBounds};
}
