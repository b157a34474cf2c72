//! Multi-zeta stimuli: items calibrated for several constructs.
//!
//! Purpose
//! -------
//! Define the corpus item of the multi-CAT layer. One [`Stimulus`] carries
//! several [`Zeta`] tuples, each tagged with the constructs it is
//! calibrated for, plus opaque caller metadata. The module also provides
//! the corpus-level invariant check (no cat name twice within a stimulus),
//! the availability predicates the controller filters with, and the flat
//! projection handed to per-construct sessions.
//!
//! Key behaviors
//! -------------
//! - [`Stimulus::validate_cats`] / [`check_no_duplicate_cat_names`]:
//!   reject a stimulus whose zetas mention one construct twice.
//! - [`Stimulus::is_unvalidated`]: no zetas, or only empty cat lists.
//! - [`Stimulus::available_for`]: whether a construct can consume this
//!   item (the reserved `unvalidated` name selects the uncalibrated ones).
//! - [`Stimulus::to_flat`]: project the calibration for one construct into
//!   a [`FlatStimulus`], threading the stable `id` so the controller maps
//!   a chosen flat record back to its corpus stimulus without structural
//!   matching.
//!
//! Invariants
//! ----------
//! - Within one stimulus no cat name appears in more than one zeta.
//! - `id` is assigned by the controller at construction, in corpus order;
//!   callers echo items back by this id.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::{CatError, CatResult};
use crate::irt::params::ItemParams;
use crate::selection::FlatStimulus;

/// Name of the controller's internal session for uncalibrated items.
pub const UNVALIDATED_CAT: &str = "unvalidated";

/// One calibration of a stimulus, tagged with the constructs it serves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zeta {
    pub cats: Vec<String>,
    pub params: ItemParams,
}

impl Zeta {
    pub fn new(cats: Vec<String>, params: ItemParams) -> Self {
        Zeta { cats, params }
    }
}

/// A corpus item: calibrations plus opaque caller metadata.
///
/// `id` is stable within one controller and threads through selection;
/// construct stimuli with [`Stimulus::new`] and let the controller assign
/// ids in corpus order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stimulus {
    pub id: u64,
    pub zetas: Vec<Zeta>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl Stimulus {
    /// Stimulus with empty metadata; the controller assigns the id.
    pub fn new(zetas: Vec<Zeta>) -> Self {
        Stimulus { id: 0, zetas, metadata: Map::new() }
    }

    /// Stimulus carrying caller metadata.
    pub fn with_metadata(zetas: Vec<Zeta>, metadata: Map<String, Value>) -> Self {
        Stimulus { id: 0, zetas, metadata }
    }

    /// Check the duplicate-cat invariant for this stimulus.
    ///
    /// # Errors
    /// [`CatError::DuplicateCatName`] naming the first repeated construct.
    pub fn validate_cats(&self) -> CatResult<()> {
        let mut seen: HashSet<&str> = HashSet::new();
        for zeta in &self.zetas {
            for cat in &zeta.cats {
                if !seen.insert(cat.as_str()) {
                    return Err(CatError::DuplicateCatName { name: cat.clone() });
                }
            }
        }
        Ok(())
    }

    /// True when this stimulus carries no construct calibration: no zetas,
    /// or only zetas with empty cat lists.
    pub fn is_unvalidated(&self) -> bool {
        self.zetas.iter().all(|zeta| zeta.cats.is_empty())
    }

    /// The zeta calibrated for `cat`, if any.
    pub fn zeta_for_cat(&self, cat: &str) -> Option<&Zeta> {
        self.zetas.iter().find(|zeta| zeta.cats.iter().any(|name| name == cat))
    }

    /// Whether `cat` can consume this item. The reserved
    /// [`UNVALIDATED_CAT`] name selects the uncalibrated stimuli.
    pub fn available_for(&self, cat: &str) -> bool {
        if cat == UNVALIDATED_CAT {
            self.is_unvalidated()
        } else {
            self.zeta_for_cat(cat).is_some()
        }
    }

    /// Project the calibration for `cat` into a flat record, threading the
    /// stable id and cloning the metadata through.
    pub fn to_flat(&self, cat: &str) -> Option<FlatStimulus> {
        self.zeta_for_cat(cat)
            .map(|zeta| FlatStimulus::with_metadata(self.id, zeta.params, self.metadata.clone()))
    }
}

/// Check the duplicate-cat invariant over a whole corpus.
///
/// # Errors
/// [`CatError::DuplicateCatName`] for the first offending stimulus.
pub fn check_no_duplicate_cat_names(corpus: &[Stimulus]) -> CatResult<()> {
    for stimulus in corpus {
        stimulus.validate_cats()?;
    }
    Ok(())
}

/// Split `items` into those available for `cat` and those that are not.
///
/// Accepts any iterator of stimulus references so the controller can chain
/// partitions (corpus filter, then selection filter) without re-deriving
/// the availability predicate.
pub fn partition_by_availability<'a, I>(
    items: I, cat: &str,
) -> (Vec<&'a Stimulus>, Vec<&'a Stimulus>)
where
    I: IntoIterator<Item = &'a Stimulus>,
{
    items.into_iter().partition(|item| item.available_for(cat))
}
