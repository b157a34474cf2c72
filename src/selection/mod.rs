//! selection — item-selection strategies and the flat item record.
//!
//! Purpose
//! -------
//! Choose the next item to administer from the remaining pool. Five
//! strategies are provided — maximum Fisher information, closest
//! difficulty, random, fixed, and middle — plus the start-up restriction
//! that limits the opening items to the order-insensitive strategies.
//!
//! Key behaviors
//! -------------
//! - Parse selector labels case-insensitively via `FromStr`
//!   (`mfi | closest | random | fixed | middle`).
//! - Dispatch a strategy over a pool of [`FlatStimulus`] records through
//!   [`Selector::select`], returning the chosen record and the rest.
//! - Restrict start-up selectors to `random | middle | fixed` via
//!   [`Selector::is_valid_start`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Selection partitions its input: the chosen record and the returned
//!   rest are disjoint and together equal the input pool.
//! - An empty pool selects nothing and returns an empty rest.
//! - All randomness flows through the caller-supplied `Pcg64`, so a fixed
//!   seed reproduces the full selection sequence.
//!
//! Conventions
//! -----------
//! - Items travel as flat records carrying a stable `id`; the multi-CAT
//!   layer maps a chosen record back to its corpus stimulus by this id
//!   rather than by structural comparison.

pub mod rules;

use std::str::FromStr;

use rand_pcg::Pcg64;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::CatError;
use crate::irt::params::ItemParams;

/// A flat, single-calibration item record as seen by selection and by
/// single-construct sessions.
///
/// Fields:
/// - `id`: stable identifier threaded through selection so controllers can
///   recover the originating corpus stimulus.
/// - `params`: canonical ζ for the construct under consideration.
/// - `metadata`: opaque caller payload (ids, content, rendering hints);
///   the engine never interprets it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatStimulus {
    pub id: u64,
    pub params: ItemParams,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl FlatStimulus {
    /// Flat record with empty metadata.
    pub fn new(id: u64, params: ItemParams) -> Self {
        FlatStimulus { id, params, metadata: Map::new() }
    }

    /// Flat record carrying caller metadata.
    pub fn with_metadata(id: u64, params: ItemParams, metadata: Map<String, Value>) -> Self {
        FlatStimulus { id, params, metadata }
    }
}

/// Item-selection strategy.
///
/// Variants:
/// - `Mfi`: maximize Fisher information at the current θ.
/// - `Closest`: nearest difficulty to `θ + 0.481`.
/// - `Random`: uniform draw.
/// - `Fixed`: first item in input order.
/// - `Middle`: center of the pool with a small random offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selector {
    Mfi,
    Closest,
    Random,
    Fixed,
    Middle,
}

impl FromStr for Selector {
    type Err = CatError;

    /// Parse a selector label (case-insensitive).
    ///
    /// Any value outside `mfi | closest | random | fixed | middle` returns
    /// [`CatError::InvalidSelector`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mfi" => Ok(Selector::Mfi),
            "closest" => Ok(Selector::Closest),
            "random" => Ok(Selector::Random),
            "fixed" => Ok(Selector::Fixed),
            "middle" => Ok(Selector::Middle),
            _ => Err(CatError::InvalidSelector { name: s.to_string() }),
        }
    }
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl Selector {
    /// Canonical lowercase label, the inverse of `FromStr`.
    pub fn label(&self) -> &'static str {
        match self {
            Selector::Mfi => "mfi",
            Selector::Closest => "closest",
            Selector::Random => "random",
            Selector::Fixed => "fixed",
            Selector::Middle => "middle",
        }
    }

    /// Whether this strategy may serve as a start-up selector.
    ///
    /// The opening items are deliberately non-adaptive, so the
    /// ability-driven strategies (`mfi`, `closest`) are excluded.
    pub fn is_valid_start(&self) -> bool {
        matches!(self, Selector::Random | Selector::Fixed | Selector::Middle)
    }

    /// Apply this strategy to `items` at ability `theta`.
    ///
    /// `n_start_items` parameterizes the `middle` offset window; `rng` is
    /// the session's seeded generator. Returns `(chosen, rest)`; an empty
    /// pool yields `(None, vec![])`.
    pub fn select(
        &self, items: Vec<FlatStimulus>, theta: f64, n_start_items: usize, rng: &mut Pcg64,
    ) -> (Option<FlatStimulus>, Vec<FlatStimulus>) {
        if items.is_empty() {
            return (None, Vec::new());
        }
        match self {
            Selector::Mfi => rules::select_mfi(items, theta),
            Selector::Closest => rules::select_closest(items, theta),
            Selector::Random => rules::select_random(items, rng),
            Selector::Fixed => rules::select_fixed(items),
            Selector::Middle => rules::select_middle(items, n_start_items, rng),
        }
    }
}

// ---- Optional convenience prelude for downstream crates -------------------

pub mod prelude {
    pub use super::{FlatStimulus, Selector};
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    #[test]
    // Purpose
    // -------
    // Labels parse case-insensitively and unknown labels classify as
    // configuration errors.
    fn labels_parse_case_insensitively() {
        assert_eq!("MFI".parse::<Selector>().expect("parses"), Selector::Mfi);
        assert_eq!("Closest".parse::<Selector>().expect("parses"), Selector::Closest);
        assert_eq!("random".parse::<Selector>().expect("parses"), Selector::Random);
        assert_eq!("FIXED".parse::<Selector>().expect("parses"), Selector::Fixed);
        assert_eq!("miDDle".parse::<Selector>().expect("parses"), Selector::Middle);

        let err = "nearest".parse::<Selector>().expect_err("unknown label");
        assert_eq!(err.kind(), ErrorKind::InvalidConfig);
    }

    #[test]
    // Purpose
    // -------
    // Only the non-adaptive strategies qualify for start-up.
    fn start_up_excludes_ability_driven_strategies() {
        assert!(Selector::Random.is_valid_start());
        assert!(Selector::Fixed.is_valid_start());
        assert!(Selector::Middle.is_valid_start());
        assert!(!Selector::Mfi.is_valid_start());
        assert!(!Selector::Closest.is_valid_start());
    }
}
