//! The multi-construct orchestrator.
//!
//! Purpose
//! -------
//! Drive several CAT sessions over one shared multi-zeta corpus. Each turn
//! the caller reports a batch of administered items with their answers,
//! names the constructs whose sessions should absorb the batch, and names
//! the construct that drives the next selection. The controller moves
//! reported items from the remaining pool to the seen list, fans the
//! batch's calibrations out to the named sessions, consults the optional
//! early-stopping criterion, filters the pool by calibration availability,
//! and delegates the final choice to the selecting construct's session.
//!
//! Key behaviors
//! -------------
//! - Construction validates the corpus (no duplicate cat name within a
//!   stimulus), assigns stable ids in corpus order, derives per-session
//!   seeds from the controller seed, and adds the reserved `unvalidated`
//!   session (selector `random`) for uncalibrated items.
//! - [`MultiCat::update_and_select`] implements the full turn contract;
//!   see its documentation for the step order.
//! - Pool exhaustion is not an error: the turn returns `None` and records
//!   a human-readable reason in [`MultiCat::stopping_reason`].
//!
//! Invariants
//! ----------
//! - Every corpus stimulus is in exactly one of `remaining` or `seen`;
//!   their sizes always sum to the corpus size.
//! - Items move from `remaining` to `seen` only when the caller reports
//!   them in a batch, so a freshly selected stimulus stays available until
//!   its answer arrives.
//! - Session iteration order is deterministic (`BTreeMap`), and all
//!   randomness derives from the controller seed, so a fixed seed
//!   reproduces the full run.

use std::collections::BTreeMap;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;

use crate::errors::{CatError, CatResult};
use crate::multicat::stimulus::{
    check_no_duplicate_cat_names, partition_by_availability, Stimulus, UNVALIDATED_CAT,
};
use crate::multicat::stopping::{SessionView, StoppingController};
use crate::selection::{FlatStimulus, Selector};
use crate::session::{CatOptions, CatSession};

/// Stopping reason recorded when the early-stopping criterion fires.
const REASON_EARLY_STOPPING: &str = "Early stopping";

/// Stopping reason recorded when no uncalibrated items remain.
const REASON_NO_UNVALIDATED: &str = "No unvalidated items remaining";

/// Stride between derived per-session seeds.
const SESSION_SEED_STRIDE: u64 = 1000;

/// One turn's worth of input to [`MultiCat::update_and_select`].
///
/// Required: `cat_to_select`. Everything else defaults to "no batch, no
/// override, select from the same construct's corpus, return `None` on
/// exhaustion"; build with [`UpdateSelectOptions::new`] and struct update.
#[derive(Debug, Clone)]
pub struct UpdateSelectOptions {
    /// Construct whose session drives the next selection. The reserved
    /// `unvalidated` name draws a random uncalibrated item.
    pub cat_to_select: String,
    /// Constructs whose sessions absorb the batch. The reserved name is
    /// not allowed here.
    pub cats_to_update: Vec<String>,
    /// Administered items, echoed back by id.
    pub items: Vec<Stimulus>,
    /// Answers paired with `items`.
    pub answers: Vec<bool>,
    /// Per-call selector override, applied by the selecting session after
    /// its start-up phase.
    pub item_select_override: Option<Selector>,
    /// When set, the pool is first filtered by this construct's
    /// calibration availability before `cat_to_select`'s own filter.
    pub corpus_to_select_from: Option<String>,
    /// Construct evaluated by an `only`-operator stopping criterion.
    pub cat_to_evaluate_early_stopping: Option<String>,
    /// On an exhausted candidate set: `true` returns `None` with a
    /// stopping reason; `false` falls back to a uniform draw from the
    /// items that failed the availability filters, even though they are
    /// not calibrated for the requested construct. Callers that want
    /// strict exhaustion semantics should keep the default.
    pub return_undefined_on_exhaustion: bool,
}

impl UpdateSelectOptions {
    /// Options for a turn that selects for `cat_to_select`, with every
    /// optional field at its default.
    pub fn new(cat_to_select: impl Into<String>) -> Self {
        UpdateSelectOptions {
            cat_to_select: cat_to_select.into(),
            cats_to_update: Vec::new(),
            items: Vec::new(),
            answers: Vec::new(),
            item_select_override: None,
            corpus_to_select_from: None,
            cat_to_evaluate_early_stopping: None,
            return_undefined_on_exhaustion: true,
        }
    }
}

/// Orchestrator over named CAT sessions and a shared corpus.
pub struct MultiCat {
    sessions: BTreeMap<String, CatSession>,
    remaining: Vec<Stimulus>,
    seen: Vec<Stimulus>,
    stopping: Option<Box<dyn StoppingController>>,
    stopping_reason: Option<String>,
    rng: Pcg64,
}

impl std::fmt::Debug for MultiCat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MultiCat")
            .field("sessions", &self.sessions)
            .field("remaining", &self.remaining)
            .field("seen", &self.seen)
            .field("stopping", &self.stopping.as_ref().map(|_| "<dyn StoppingController>"))
            .field("stopping_reason", &self.stopping_reason)
            .field("rng", &self.rng)
            .finish()
    }
}

impl MultiCat {
    /// Build a controller over `cats` and `corpus`.
    ///
    /// Stable ids are assigned to the corpus in order. When `seed` is
    /// given, the controller RNG uses it directly and each session whose
    /// options carry no seed receives a derived one, so one seed pins the
    /// whole run. The reserved `unvalidated` session (selector `random`)
    /// is always added.
    ///
    /// # Errors
    /// - [`CatError::ReservedCatName`] when `cats` defines `unvalidated`.
    /// - [`CatError::DuplicateCatName`] from the corpus invariant check.
    /// - Configuration failures from any session constructor.
    pub fn new(
        cats: BTreeMap<String, CatOptions>, mut corpus: Vec<Stimulus>, seed: Option<u64>,
        early_stopping: Option<Box<dyn StoppingController>>,
    ) -> CatResult<Self> {
        if cats.contains_key(UNVALIDATED_CAT) {
            return Err(CatError::ReservedCatName { name: UNVALIDATED_CAT.to_string() });
        }
        check_no_duplicate_cat_names(&corpus)?;
        for (index, stimulus) in corpus.iter_mut().enumerate() {
            stimulus.id = index as u64;
            for zeta in &stimulus.zetas {
                zeta.params.validate()?;
            }
        }

        let mut sessions = BTreeMap::new();
        for (index, (name, mut options)) in cats.into_iter().enumerate() {
            if options.seed.is_none() {
                options.seed =
                    seed.map(|s| s.wrapping_add((index as u64 + 1) * SESSION_SEED_STRIDE));
            }
            sessions.insert(name, CatSession::new(options)?);
        }
        let unvalidated_options = CatOptions {
            item_select: Selector::Random,
            seed: seed.map(|s| s.wrapping_add(SESSION_SEED_STRIDE / 2)),
            ..CatOptions::default()
        };
        sessions.insert(UNVALIDATED_CAT.to_string(), CatSession::new(unvalidated_options)?);

        let rng = match seed {
            Some(s) => Pcg64::seed_from_u64(s),
            None => Pcg64::from_rng(&mut rand::rng()),
        };

        Ok(MultiCat {
            sessions,
            remaining: corpus,
            seen: Vec::new(),
            stopping: early_stopping,
            stopping_reason: None,
            rng,
        })
    }

    /// Absorb a response batch and select the next item.
    ///
    /// Steps, in order:
    /// 1. Clear any previous stopping reason.
    /// 2. Validate the construct names (`cat_to_select` and
    ///    `corpus_to_select_from` may name the reserved session;
    ///    `cats_to_update` may not).
    /// 3. Move each reported item from `remaining` to `seen` and fan its
    ///    per-construct calibrations out to the named sessions, one batch
    ///    update per session.
    /// 4. Update the early-stopping criterion over every session except
    ///    the reserved one; when it fires, record `"Early stopping"` and
    ///    return `None`.
    /// 5. Filter `remaining` by availability for `corpus_to_select_from`
    ///    (defaulting to `cat_to_select`) and for `cat_to_select`; the
    ///    intersection is the candidate set.
    /// 6. Select: uncalibrated turns draw randomly from the unvalidated
    ///    items; calibrated turns project the candidates into flat records
    ///    and delegate to the selecting session. An exhausted candidate
    ///    set returns `None` with a reason, or, when
    ///    `return_undefined_on_exhaustion` is `false`, a uniform draw
    ///    from the filtered-out items.
    ///
    /// # Errors
    /// - [`CatError::UnknownCatName`] for any unknown construct (or the
    ///   reserved name in `cats_to_update`).
    /// - [`CatError::ItemAnswerLengthMismatch`] when the batch lists
    ///   differ in length.
    /// - Session-update and stopping-criterion failures.
    pub fn update_and_select(
        &mut self, opts: &UpdateSelectOptions,
    ) -> CatResult<Option<Stimulus>> {
        self.stopping_reason = None;

        self.check_cat_name(&opts.cat_to_select)?;
        if let Some(corpus_cat) = &opts.corpus_to_select_from {
            self.check_cat_name(corpus_cat)?;
        }
        for cat in &opts.cats_to_update {
            if cat == UNVALIDATED_CAT {
                return Err(CatError::UnknownCatName { name: cat.clone() });
            }
            self.check_cat_name(cat)?;
        }

        self.absorb_batch(opts)?;

        if self.stopping.is_some() {
            let fired = self.update_stopping(opts.cat_to_evaluate_early_stopping.as_deref())?;
            if fired {
                self.stopping_reason = Some(REASON_EARLY_STOPPING.to_string());
                return Ok(None);
            }
        }

        let corpus_cat =
            opts.corpus_to_select_from.as_deref().unwrap_or(opts.cat_to_select.as_str());

        if opts.cat_to_select == UNVALIDATED_CAT {
            self.select_unvalidated(opts.return_undefined_on_exhaustion)
        } else {
            self.select_for_cat(opts, corpus_cat)
        }
    }

    /// Current ability estimate per construct.
    pub fn thetas(&self) -> BTreeMap<String, f64> {
        self.sessions.iter().map(|(name, s)| (name.clone(), s.theta())).collect()
    }

    /// Current standard error per construct.
    pub fn se_measurements(&self) -> BTreeMap<String, f64> {
        self.sessions.iter().map(|(name, s)| (name.clone(), s.se())).collect()
    }

    /// Administered item count per construct.
    pub fn n_items(&self) -> BTreeMap<String, usize> {
        self.sessions.iter().map(|(name, s)| (name.clone(), s.n_items())).collect()
    }

    /// Items not yet reported as administered.
    pub fn remaining_items(&self) -> &[Stimulus] {
        &self.remaining
    }

    /// Items reported as administered, in report order.
    pub fn seen_items(&self) -> &[Stimulus] {
        &self.seen
    }

    /// Why the last turn returned `None`, if it did.
    pub fn stopping_reason(&self) -> Option<&str> {
        self.stopping_reason.as_deref()
    }

    /// The session for `cat`, including the reserved one.
    pub fn session(&self, cat: &str) -> Option<&CatSession> {
        self.sessions.get(cat)
    }

    /// All construct names, including the reserved session.
    pub fn cat_names(&self) -> Vec<&str> {
        self.sessions.keys().map(String::as_str).collect()
    }

    fn check_cat_name(&self, cat: &str) -> CatResult<()> {
        if self.sessions.contains_key(cat) {
            Ok(())
        } else {
            Err(CatError::UnknownCatName { name: cat.to_string() })
        }
    }

    /// Step 3: bookkeeping and session fan-out for the reported batch.
    fn absorb_batch(&mut self, opts: &UpdateSelectOptions) -> CatResult<()> {
        if opts.items.len() != opts.answers.len() {
            return Err(CatError::ItemAnswerLengthMismatch {
                items: opts.items.len(),
                answers: opts.answers.len(),
            });
        }

        let mut queued: BTreeMap<&str, (Vec<_>, Vec<bool>)> = BTreeMap::new();
        for (item, &answer) in opts.items.iter().zip(&opts.answers) {
            // Prefer the stored stimulus over the caller's echo, so the
            // sessions always learn from the corpus calibration.
            let stored = self.remaining.iter().position(|s| s.id == item.id).map(|position| {
                let stimulus = self.remaining.remove(position);
                self.seen.push(stimulus.clone());
                stimulus
            });
            let source = stored.as_ref().unwrap_or(item);
            for cat in &opts.cats_to_update {
                if let Some(zeta) = source.zeta_for_cat(cat) {
                    let entry = queued.entry(cat.as_str()).or_default();
                    entry.0.push(zeta.params);
                    entry.1.push(answer);
                }
            }
        }

        for (cat, (zetas, answers)) in queued {
            let session = self
                .sessions
                .get_mut(cat)
                .ok_or_else(|| CatError::UnknownCatName { name: cat.to_string() })?;
            session.update_batch(&zetas, &answers)?;
        }
        Ok(())
    }

    /// Step 4: fold the batch into the stopping criterion.
    fn update_stopping(&mut self, cat_to_evaluate: Option<&str>) -> CatResult<bool> {
        let view: SessionView<'_> = self
            .sessions
            .iter()
            .filter(|(name, _)| name.as_str() != UNVALIDATED_CAT)
            .map(|(name, session)| (name.as_str(), session))
            .collect();
        match self.stopping.as_mut() {
            Some(stopping) => {
                stopping.update(&view, cat_to_evaluate)?;
                Ok(stopping.early_stop())
            }
            None => Ok(false),
        }
    }

    /// Step 6, uncalibrated branch: a random draw from the unvalidated
    /// items.
    fn select_unvalidated(
        &mut self, return_none_on_exhaustion: bool,
    ) -> CatResult<Option<Stimulus>> {
        let (candidates, missing) =
            partition_by_availability(&self.remaining, UNVALIDATED_CAT);

        if !candidates.is_empty() {
            let pick = candidates[self.rng.random_range(0..candidates.len())];
            return Ok(Some(pick.clone()));
        }
        if return_none_on_exhaustion || missing.is_empty() {
            self.stopping_reason = Some(REASON_NO_UNVALIDATED.to_string());
            return Ok(None);
        }
        let pick = missing[self.rng.random_range(0..missing.len())];
        Ok(Some(pick.clone()))
    }

    /// Step 6, calibrated branch: project the candidates and delegate to
    /// the selecting session.
    fn select_for_cat(
        &mut self, opts: &UpdateSelectOptions, corpus_cat: &str,
    ) -> CatResult<Option<Stimulus>> {
        let cat = opts.cat_to_select.as_str();

        // Corpus filter, then selection filter; items failing either form
        // the missing set.
        let (available, mut missing) = partition_by_availability(&self.remaining, corpus_cat);
        let (candidates, unavailable_for_cat) = partition_by_availability(available, cat);
        missing.extend(unavailable_for_cat);

        if !candidates.is_empty() {
            let flats: Vec<FlatStimulus> =
                candidates.iter().filter_map(|stimulus| stimulus.to_flat(cat)).collect();
            let session = self
                .sessions
                .get_mut(cat)
                .ok_or_else(|| CatError::UnknownCatName { name: cat.to_string() })?;
            let (chosen, _rest) = session.find_next(flats, opts.item_select_override);
            let chosen = match chosen {
                Some(flat) => flat,
                None => return Ok(None),
            };
            return Ok(self.remaining.iter().find(|s| s.id == chosen.id).cloned());
        }

        let reason = format!("No validated items remaining for the requested corpus {corpus_cat}");
        if opts.return_undefined_on_exhaustion || missing.is_empty() {
            self.stopping_reason = Some(reason);
            return Ok(None);
        }
        let pick = missing[self.rng.random_range(0..missing.len())];
        Ok(Some(pick.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use crate::irt::params::ItemParams;
    use crate::multicat::stimulus::Zeta;

    fn zeta(cats: &[&str], difficulty: f64) -> Zeta {
        Zeta::new(
            cats.iter().map(|c| c.to_string()).collect(),
            ItemParams::with_difficulty(difficulty),
        )
    }

    fn two_cat_controller() -> MultiCat {
        let corpus = vec![
            Stimulus::new(vec![zeta(&["math", "reading"], 0.0)]),
            Stimulus::new(vec![zeta(&["math"], 1.0), zeta(&["reading"], -1.0)]),
            Stimulus::new(vec![zeta(&["math"], -0.5)]),
            Stimulus::new(vec![zeta(&[], 0.3)]),
        ];
        let cats = BTreeMap::from([
            ("math".to_string(), CatOptions::default()),
            ("reading".to_string(), CatOptions::default()),
        ]);
        MultiCat::new(cats, corpus, Some(7), None).expect("valid controller")
    }

    #[test]
    // Purpose
    // -------
    // Construction assigns ids in corpus order, adds the reserved session,
    // and rejects a caller-defined `unvalidated` construct and a corpus
    // with duplicate cat names.
    fn construction_validates_and_prepares() {
        let controller = two_cat_controller();

        let ids: Vec<u64> = controller.remaining_items().iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);
        assert_eq!(controller.cat_names(), vec!["math", "reading", UNVALIDATED_CAT]);

        let reserved = BTreeMap::from([(UNVALIDATED_CAT.to_string(), CatOptions::default())]);
        assert!(matches!(
            MultiCat::new(reserved, vec![], Some(1), None),
            Err(CatError::ReservedCatName { .. })
        ));

        let bad_corpus =
            vec![Stimulus::new(vec![zeta(&["math"], 0.0), zeta(&["math"], 1.0)])];
        let err = MultiCat::new(BTreeMap::new(), bad_corpus, Some(1), None)
            .expect_err("duplicate cat in one stimulus");
        assert_eq!(err.kind(), ErrorKind::DuplicateCatName);
    }

    #[test]
    // Purpose
    // -------
    // Unknown constructs are rejected wherever they appear, and the
    // reserved name is rejected in the update list specifically.
    fn update_and_select_validates_cat_names() {
        let mut controller = two_cat_controller();

        let err = controller
            .update_and_select(&UpdateSelectOptions::new("science"))
            .expect_err("unknown selection cat");
        assert_eq!(err.kind(), ErrorKind::UnknownCat);

        let mut opts = UpdateSelectOptions::new("math");
        opts.corpus_to_select_from = Some("science".to_string());
        assert!(controller.update_and_select(&opts).is_err());

        let mut opts = UpdateSelectOptions::new("math");
        opts.cats_to_update = vec![UNVALIDATED_CAT.to_string()];
        let err = controller.update_and_select(&opts).expect_err("reserved update cat");
        assert_eq!(err, CatError::UnknownCatName { name: UNVALIDATED_CAT.to_string() });
    }

    #[test]
    // Purpose
    // -------
    // A mismatched batch is rejected before any bookkeeping happens.
    fn batch_length_mismatch_changes_nothing() {
        let mut controller = two_cat_controller();
        let item = controller.remaining_items()[0].clone();

        let mut opts = UpdateSelectOptions::new("math");
        opts.cats_to_update = vec!["math".to_string()];
        opts.items = vec![item];

        let err = controller.update_and_select(&opts).expect_err("no answers supplied");
        assert_eq!(err, CatError::ItemAnswerLengthMismatch { items: 1, answers: 0 });
        assert_eq!(controller.remaining_items().len(), 4);
        assert!(controller.seen_items().is_empty());
    }

    #[test]
    // Purpose
    // -------
    // A reported batch moves its items to the seen list, updates exactly
    // the named sessions with the matching calibrations, and the next
    // selection avoids the seen item.
    fn batch_moves_items_and_fans_out_updates() {
        let mut controller = two_cat_controller();
        let item = controller.remaining_items()[1].clone();

        let mut opts = UpdateSelectOptions::new("math");
        opts.cats_to_update = vec!["math".to_string(), "reading".to_string()];
        opts.items = vec![item.clone()];
        opts.answers = vec![true];

        let next = controller.update_and_select(&opts).expect("turn succeeds");

        assert_eq!(controller.remaining_items().len(), 3);
        assert_eq!(controller.seen_items().len(), 1);
        assert_eq!(controller.n_items()["math"], 1);
        assert_eq!(controller.n_items()["reading"], 1);
        assert_eq!(controller.n_items()[UNVALIDATED_CAT], 0);
        // The math session saw the math calibration, not the reading one.
        assert_eq!(
            controller.session("math").expect("session exists").zetas()[0].difficulty,
            1.0
        );
        assert_eq!(
            controller.session("reading").expect("session exists").zetas()[0].difficulty,
            -1.0
        );

        let next = next.expect("validated items remain");
        assert_ne!(next.id, item.id);
        assert!(next.available_for("math"));
    }

    #[test]
    // Purpose
    // -------
    // Selecting for the reserved construct draws the uncalibrated item,
    // and reports exhaustion through the literal stopping reason once none
    // remain.
    fn unvalidated_selection_and_exhaustion() {
        let mut controller = two_cat_controller();

        let first = controller
            .update_and_select(&UpdateSelectOptions::new(UNVALIDATED_CAT))
            .expect("turn succeeds")
            .expect("one unvalidated item exists");
        assert!(first.is_unvalidated());

        // Report it; no construct can absorb it, so no session updates.
        let mut opts = UpdateSelectOptions::new(UNVALIDATED_CAT);
        opts.items = vec![first];
        opts.answers = vec![false];
        let next = controller.update_and_select(&opts).expect("turn succeeds");

        assert!(next.is_none());
        assert_eq!(controller.stopping_reason(), Some("No unvalidated items remaining"));

        // With the exhaustion flag cleared, a draw from the validated
        // leftovers is produced instead.
        let mut opts = UpdateSelectOptions::new(UNVALIDATED_CAT);
        opts.return_undefined_on_exhaustion = false;
        let fallback = controller.update_and_select(&opts).expect("turn succeeds");
        assert!(fallback.expect("fallback draw").available_for("math"));
    }

    #[test]
    // Purpose
    // -------
    // Exhaustion of a calibrated corpus substitutes the construct name
    // into the literal stopping reason.
    fn calibrated_exhaustion_reports_the_corpus_name() {
        let corpus = vec![Stimulus::new(vec![zeta(&["reading"], 0.0)])];
        let cats = BTreeMap::from([
            ("math".to_string(), CatOptions::default()),
            ("reading".to_string(), CatOptions::default()),
        ]);
        let mut controller = MultiCat::new(cats, corpus, Some(3), None).expect("valid controller");

        let next = controller
            .update_and_select(&UpdateSelectOptions::new("math"))
            .expect("turn succeeds");

        assert!(next.is_none());
        assert_eq!(
            controller.stopping_reason(),
            Some("No validated items remaining for the requested corpus math")
        );

        // A cross-corpus turn names the corpus it filtered by.
        let mut opts = UpdateSelectOptions::new("reading");
        opts.corpus_to_select_from = Some("math".to_string());
        let next = controller.update_and_select(&opts).expect("turn succeeds");
        assert!(next.is_none());
        assert_eq!(
            controller.stopping_reason(),
            Some("No validated items remaining for the requested corpus math")
        );
    }

    #[test]
    // Purpose
    // -------
    // The readouts cover every session and reflect the live state.
    fn readouts_track_sessions() {
        let controller = two_cat_controller();

        let thetas = controller.thetas();
        let ses = controller.se_measurements();

        assert_eq!(thetas.len(), 3);
        assert_eq!(thetas["math"], 0.0);
        assert_eq!(ses["reading"], f64::INFINITY);
    }
}
