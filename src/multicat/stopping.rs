//! Early-stopping controllers for multi-CAT runs.
//!
//! Purpose
//! -------
//! Decide, after each response batch, whether the run has measured its
//! constructs well enough to stop. Three criteria are provided — a fixed
//! item count, a standard-error plateau, and a standard-error threshold —
//! each combining its per-construct verdicts through a logical operator.
//!
//! Key behaviors
//! -------------
//! - [`LogicalOperator`]: `or` fires on any construct, `and` on all
//!   configured constructs, `only` on a single construct named at
//!   evaluation time (failing the call when the name is omitted).
//! - [`StoppingController`]: the capability the controller layer drives —
//!   `update` folds in the latest session states, `early_stop` reads the
//!   verdict, `evaluation_cats` lists the constructs a criterion watches.
//! - SE-based criteria record a session's standard error only when its
//!   item count strictly increased since the last update, so a construct
//!   that sat out a batch is not double-counted.
//!
//! Conventions
//! -----------
//! - Per-construct settings arrive as maps; a construct missing from a map
//!   falls back to patience 1, tolerance 0, threshold 0. The required item
//!   count has no default: a construct absent from `required` never
//!   satisfies [`StopAfterNItems`].
//! - Controllers are stateful values owned by one run; the verdict is
//!   recomputed on every update.

use std::collections::BTreeMap;
use std::str::FromStr;

use crate::errors::{CatError, CatResult};
use crate::session::CatSession;

/// Fallback patience for constructs unlisted in a patience map.
const DEFAULT_PATIENCE: usize = 1;

/// Fallback tolerance for constructs unlisted in a tolerance map.
const DEFAULT_TOLERANCE: f64 = 0.0;

/// Fallback threshold for constructs unlisted in a threshold map.
const DEFAULT_THRESHOLD: f64 = 0.0;

/// How per-construct verdicts combine into one stop decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOperator {
    And,
    Or,
    Only,
}

impl FromStr for LogicalOperator {
    type Err = CatError;

    /// Parse an operator label (case-insensitive).
    ///
    /// Any value outside `and | or | only` returns
    /// [`CatError::InvalidLogicalOperator`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "and" => Ok(LogicalOperator::And),
            "or" => Ok(LogicalOperator::Or),
            "only" => Ok(LogicalOperator::Only),
            _ => Err(CatError::InvalidLogicalOperator { name: s.to_string() }),
        }
    }
}

/// A read-only view of the live sessions, keyed by construct name. The
/// controller excludes its internal `unvalidated` session before handing
/// the view to a criterion.
pub type SessionView<'a> = BTreeMap<&'a str, &'a CatSession>;

/// The early-stopping capability.
///
/// Implementations are updated after every response batch and queried for
/// their verdict before the next selection.
pub trait StoppingController {
    /// Fold the latest session states into the criterion and recompute the
    /// verdict.
    ///
    /// # Errors
    /// - [`CatError::MissingEvaluationCat`] for the `only` operator without
    ///   a named construct.
    /// - [`CatError::UnknownCatName`] when the named construct is not in
    ///   the view.
    fn update(&mut self, sessions: &SessionView<'_>, cat_to_evaluate: Option<&str>)
        -> CatResult<()>;

    /// Constructs this criterion watches (the keys of its setting maps).
    fn evaluation_cats(&self) -> Vec<String>;

    /// The verdict from the most recent update.
    fn early_stop(&self) -> bool;
}

/// Combine per-construct verdicts under an operator.
fn combine(
    operator: LogicalOperator, evaluation_cats: &[String], sessions: &SessionView<'_>,
    cat_to_evaluate: Option<&str>, predicate: impl Fn(&str) -> bool,
) -> CatResult<bool> {
    match operator {
        LogicalOperator::Only => {
            let cat = cat_to_evaluate.ok_or(CatError::MissingEvaluationCat)?;
            if !sessions.contains_key(cat) {
                return Err(CatError::UnknownCatName { name: cat.to_string() });
            }
            Ok(predicate(cat))
        }
        LogicalOperator::Or => Ok(evaluation_cats
            .iter()
            .any(|cat| sessions.contains_key(cat.as_str()) && predicate(cat))),
        LogicalOperator::And => Ok(evaluation_cats
            .iter()
            .all(|cat| sessions.contains_key(cat.as_str()) && predicate(cat))),
    }
}

/// Per-construct standard-error history, appended only when a session's
/// item count strictly increased since the last update.
#[derive(Debug, Clone, Default)]
struct SeTracker {
    counts: BTreeMap<String, usize>,
    history: BTreeMap<String, Vec<f64>>,
}

impl SeTracker {
    fn record(&mut self, sessions: &SessionView<'_>) {
        for (&name, session) in sessions {
            let count = self.counts.entry(name.to_string()).or_insert(0);
            if session.n_items() > *count {
                *count = session.n_items();
                self.history.entry(name.to_string()).or_default().push(session.se());
            }
        }
    }

    /// The last `patience` recorded values for `cat`, once enough exist.
    fn window(&self, cat: &str, patience: usize) -> Option<&[f64]> {
        if patience == 0 {
            return None;
        }
        let history = self.history.get(cat)?;
        if history.len() < patience {
            return None;
        }
        Some(&history[history.len() - patience..])
    }
}

/// Stop once the configured constructs have administered enough items.
#[derive(Debug, Clone)]
pub struct StopAfterNItems {
    required: BTreeMap<String, usize>,
    operator: LogicalOperator,
    counts: BTreeMap<String, usize>,
    early_stop: bool,
}

impl StopAfterNItems {
    pub fn new(required: BTreeMap<String, usize>, operator: LogicalOperator) -> Self {
        StopAfterNItems { required, operator, counts: BTreeMap::new(), early_stop: false }
    }
}

impl StoppingController for StopAfterNItems {
    fn update(
        &mut self, sessions: &SessionView<'_>, cat_to_evaluate: Option<&str>,
    ) -> CatResult<()> {
        for (&name, session) in sessions {
            self.counts.insert(name.to_string(), session.n_items());
        }
        let cats = self.evaluation_cats();
        self.early_stop = combine(self.operator, &cats, sessions, cat_to_evaluate, |cat| {
            match (self.counts.get(cat), self.required.get(cat)) {
                (Some(&count), Some(&required)) => count >= required,
                _ => false,
            }
        })?;
        Ok(())
    }

    fn evaluation_cats(&self) -> Vec<String> {
        self.required.keys().cloned().collect()
    }

    fn early_stop(&self) -> bool {
        self.early_stop
    }
}

/// Stop once the standard error has stabilized: the last `patience`
/// recorded values all sit within `tolerance` of their mean.
#[derive(Debug, Clone)]
pub struct StopOnSePlateau {
    patience: BTreeMap<String, usize>,
    tolerance: BTreeMap<String, f64>,
    operator: LogicalOperator,
    tracker: SeTracker,
    early_stop: bool,
}

impl StopOnSePlateau {
    pub fn new(
        patience: BTreeMap<String, usize>, tolerance: BTreeMap<String, f64>,
        operator: LogicalOperator,
    ) -> Self {
        StopOnSePlateau {
            patience,
            tolerance,
            operator,
            tracker: SeTracker::default(),
            early_stop: false,
        }
    }
}

impl StoppingController for StopOnSePlateau {
    fn update(
        &mut self, sessions: &SessionView<'_>, cat_to_evaluate: Option<&str>,
    ) -> CatResult<()> {
        self.tracker.record(sessions);
        let cats = self.evaluation_cats();
        self.early_stop = combine(self.operator, &cats, sessions, cat_to_evaluate, |cat| {
            let patience = self.patience.get(cat).copied().unwrap_or(DEFAULT_PATIENCE);
            let tolerance = self.tolerance.get(cat).copied().unwrap_or(DEFAULT_TOLERANCE);
            match self.tracker.window(cat, patience) {
                Some(window) => {
                    let mean: f64 = window.iter().sum::<f64>() / window.len() as f64;
                    window.iter().all(|se| (se - mean).abs() <= tolerance)
                }
                None => false,
            }
        })?;
        Ok(())
    }

    fn evaluation_cats(&self) -> Vec<String> {
        let mut cats: Vec<String> =
            self.patience.keys().chain(self.tolerance.keys()).cloned().collect();
        cats.sort();
        cats.dedup();
        cats
    }

    fn early_stop(&self) -> bool {
        self.early_stop
    }
}

/// Stop once the standard error has dropped to a target: the last
/// `patience` recorded values each satisfy `se − threshold ≤ tolerance`.
#[derive(Debug, Clone)]
pub struct StopIfSeBelowThreshold {
    threshold: BTreeMap<String, f64>,
    patience: BTreeMap<String, usize>,
    tolerance: BTreeMap<String, f64>,
    operator: LogicalOperator,
    tracker: SeTracker,
    early_stop: bool,
}

impl StopIfSeBelowThreshold {
    pub fn new(
        threshold: BTreeMap<String, f64>, patience: BTreeMap<String, usize>,
        tolerance: BTreeMap<String, f64>, operator: LogicalOperator,
    ) -> Self {
        StopIfSeBelowThreshold {
            threshold,
            patience,
            tolerance,
            operator,
            tracker: SeTracker::default(),
            early_stop: false,
        }
    }
}

impl StoppingController for StopIfSeBelowThreshold {
    fn update(
        &mut self, sessions: &SessionView<'_>, cat_to_evaluate: Option<&str>,
    ) -> CatResult<()> {
        self.tracker.record(sessions);
        let cats = self.evaluation_cats();
        self.early_stop = combine(self.operator, &cats, sessions, cat_to_evaluate, |cat| {
            let threshold = self.threshold.get(cat).copied().unwrap_or(DEFAULT_THRESHOLD);
            let patience = self.patience.get(cat).copied().unwrap_or(DEFAULT_PATIENCE);
            let tolerance = self.tolerance.get(cat).copied().unwrap_or(DEFAULT_TOLERANCE);
            match self.tracker.window(cat, patience) {
                Some(window) => window.iter().all(|se| se - threshold <= tolerance),
                None => false,
            }
        })?;
        Ok(())
    }

    fn evaluation_cats(&self) -> Vec<String> {
        let mut cats: Vec<String> = self
            .threshold
            .keys()
            .chain(self.patience.keys())
            .chain(self.tolerance.keys())
            .cloned()
            .collect();
        cats.sort();
        cats.dedup();
        cats
    }

    fn early_stop(&self) -> bool {
        self.early_stop
    }
}
