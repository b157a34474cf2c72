//! errors — classified error surface for the adaptive-testing engine.
//!
//! Purpose
//! -------
//! Provide a crate-wide error and result type for every fallible operation
//! in the engine: session configuration, prior construction, parameter-record
//! canonicalization, batch updates, corpus validation, and the multi-CAT
//! orchestration layer. All failures are classified into a stable set of
//! variants collected in [`CatError`].
//!
//! Key behaviors
//! -------------
//! - Define [`CatError`] as the canonical error type and expose
//!   [`CatResult`] as a convenience alias.
//! - Group fine-grained variants by concern (configuration, stopping
//!   operators, batch arguments, parameter records, corpus/controller) and
//!   map each onto one of the seven coarse categories in [`ErrorKind`] via
//!   [`CatError::kind`].
//! - Provide human-readable `Display` messages for all variants to make
//!   diagnostics easier to interpret.
//!
//! Invariants & assumptions
//! ------------------------
//! - Errors are reported at the call boundary and never caught internally;
//!   no variant wraps another error type.
//! - Pool exhaustion is *not* an error: the controller returns `None`
//!   together with a populated stopping reason instead.
//! - Variants carry enough context (names, values, lengths) for debugging
//!   without access to the originating data structures; payloads are kept
//!   small so the enum stays cheap to clone and compare in tests.
//!
//! Conventions
//! -----------
//! - The `Display` implementation is intended for user-facing messages.
//!   Tests should not depend on its exact wording unless they intentionally
//!   pin it down.
//! - Category membership is part of the public contract and is pinned by
//!   unit tests on [`CatError::kind`].

/// Crate-wide result alias for engine operations.
pub type CatResult<T> = Result<T, CatError>;

/// Coarse classification of engine failures.
///
/// Every [`CatError`] variant maps onto exactly one of these categories via
/// [`CatError::kind`]. The categories are part of the public contract:
/// callers that do not care about the fine-grained variant can branch on
/// the kind alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Unknown method/selector/prior label, bad prior parameters, or
    /// out-of-range configuration values.
    InvalidConfig,
    /// Logical stopping operator is unknown, or `only` was requested
    /// without naming a construct to evaluate.
    InvalidOperator,
    /// Paired list arguments have different lengths.
    ArgumentMismatch,
    /// A parameter record carries both the symbolic and the semantic
    /// spelling of the same quantity.
    RedundantKeys,
    /// Strict parameter validation and a required quantity is absent.
    MissingKeys,
    /// The same cat name appears in more than one zeta of one stimulus.
    DuplicateCatName,
    /// A construct name is not present in the multi-CAT controller.
    UnknownCat,
}

/// `CatError` — unified error enum for the adaptive-testing engine.
///
/// Variants are grouped by concern; see [`ErrorKind`] for the coarse
/// categories. Construction sites are the validating constructors
/// (`CatSession::new`, `PriorSpec` parsing, `Stimulus` corpus checks) and
/// the batch entry points (`CatSession::update_batch`,
/// `MultiCat::update_and_select`).
#[derive(Debug, Clone, PartialEq)]
pub enum CatError {
    // ---- Configuration: labels ----
    /// Estimation-method label is not `mle` or `eap`.
    InvalidMethod { name: String },
    /// Item-selector label is not one of `mfi`, `closest`, `random`,
    /// `fixed`, `middle`.
    InvalidSelector { name: String },
    /// Start-up selector label is not one of `random`, `middle`, `fixed`.
    InvalidStartSelector { name: String },
    /// Prior-distribution label is not `norm` or `unif`.
    InvalidPriorLabel { name: String },

    // ---- Configuration: prior parameters ----
    /// Prior parameter vector is not exactly length 2.
    PriorParamCount { expected: usize, actual: usize },
    /// Normal prior with non-positive or non-finite standard deviation.
    InvalidPriorSigma { sigma: f64 },
    /// Normal prior mean outside the theta bounds.
    PriorMeanOutOfBounds { mean: f64, lower: f64, upper: f64 },
    /// Uniform prior with an empty support (`min_support >= max_support`).
    EmptyUniformSupport { min_support: f64, max_support: f64 },
    /// Uniform prior support extends beyond the theta bounds.
    UniformSupportOutOfBounds { min_support: f64, max_support: f64, lower: f64, upper: f64 },

    // ---- Configuration: theta bounds ----
    /// Ability bounds with `lower >= upper`.
    InvalidThetaBounds { lower: f64, upper: f64 },

    // ---- Configuration: item parameters ----
    /// A recognized parameter key holds a non-numeric value.
    NonNumericParam { key: String },
    /// Discrimination is non-positive or non-finite.
    InvalidDiscrimination { value: f64 },
    /// Difficulty is non-finite.
    InvalidDifficulty { value: f64 },
    /// Guessing parameter outside `[0, 1)`.
    InvalidGuessing { value: f64 },
    /// Slipping parameter outside `(guessing, 1]`.
    InvalidSlipping { guessing: f64, slipping: f64 },

    // ---- Stopping operators ----
    /// Logical operator label is not one of `and`, `or`, `only`.
    InvalidLogicalOperator { name: String },
    /// Operator `only` requires a construct to evaluate and none was given.
    MissingEvaluationCat,

    // ---- Batch arguments ----
    /// `items` and `answers` lengths differ in a controller batch.
    ItemAnswerLengthMismatch { items: usize, answers: usize },
    /// Parameter list and response list lengths differ in a session update.
    ParamResponseLengthMismatch { params: usize, responses: usize },

    // ---- Parameter records ----
    /// Both spellings of one quantity present in a single record.
    RedundantParamKeys { symbolic: &'static str, semantic: &'static str },
    /// Strict validation and neither spelling of a quantity present.
    MissingParamKey { symbolic: &'static str, semantic: &'static str },

    // ---- Corpus / controller ----
    /// A caller-defined construct collides with the reserved session name.
    ReservedCatName { name: String },
    /// The same cat name appears in more than one zeta of one stimulus.
    DuplicateCatName { name: String },
    /// Construct name not present in the controller (or reserved, like
    /// `unvalidated` in an update list).
    UnknownCatName { name: String },
}

impl CatError {
    /// Coarse category of this error; see [`ErrorKind`].
    pub fn kind(&self) -> ErrorKind {
        match self {
            CatError::InvalidMethod { .. }
            | CatError::InvalidSelector { .. }
            | CatError::InvalidStartSelector { .. }
            | CatError::InvalidPriorLabel { .. }
            | CatError::PriorParamCount { .. }
            | CatError::InvalidPriorSigma { .. }
            | CatError::PriorMeanOutOfBounds { .. }
            | CatError::EmptyUniformSupport { .. }
            | CatError::UniformSupportOutOfBounds { .. }
            | CatError::InvalidThetaBounds { .. }
            | CatError::NonNumericParam { .. }
            | CatError::InvalidDiscrimination { .. }
            | CatError::InvalidDifficulty { .. }
            | CatError::InvalidGuessing { .. }
            | CatError::InvalidSlipping { .. } => ErrorKind::InvalidConfig,

            CatError::InvalidLogicalOperator { .. } | CatError::MissingEvaluationCat => {
                ErrorKind::InvalidOperator
            }

            CatError::ItemAnswerLengthMismatch { .. }
            | CatError::ParamResponseLengthMismatch { .. } => ErrorKind::ArgumentMismatch,

            CatError::ReservedCatName { .. } => ErrorKind::InvalidConfig,
            CatError::RedundantParamKeys { .. } => ErrorKind::RedundantKeys,
            CatError::MissingParamKey { .. } => ErrorKind::MissingKeys,
            CatError::DuplicateCatName { .. } => ErrorKind::DuplicateCatName,
            CatError::UnknownCatName { .. } => ErrorKind::UnknownCat,
        }
    }
}

impl std::error::Error for CatError {}

impl std::fmt::Display for CatError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Configuration: labels ----
            CatError::InvalidMethod { name } => {
                write!(f, "Invalid estimation method '{name}': expected 'MLE' or 'EAP'")
            }
            CatError::InvalidSelector { name } => {
                write!(
                    f,
                    "Invalid item selector '{name}': expected one of 'MFI', 'closest', \
                     'random', 'fixed', 'middle'"
                )
            }
            CatError::InvalidStartSelector { name } => {
                write!(
                    f,
                    "Invalid start selector '{name}': expected one of 'random', 'middle', \
                     'fixed'"
                )
            }
            CatError::InvalidPriorLabel { name } => {
                write!(f, "Invalid prior distribution '{name}': expected 'norm' or 'unif'")
            }

            // ---- Configuration: prior parameters ----
            CatError::PriorParamCount { expected, actual } => {
                write!(f, "Prior parameter count mismatch: expected {expected}, got {actual}")
            }
            CatError::InvalidPriorSigma { sigma } => {
                write!(f, "Invalid prior standard deviation {sigma}: must be finite and > 0")
            }
            CatError::PriorMeanOutOfBounds { mean, lower, upper } => {
                write!(f, "Prior mean {mean} outside the theta bounds [{lower}, {upper}]")
            }
            CatError::EmptyUniformSupport { min_support, max_support } => {
                write!(
                    f,
                    "Uniform prior support is empty: min {min_support} must be below max \
                     {max_support}"
                )
            }
            CatError::UniformSupportOutOfBounds { min_support, max_support, lower, upper } => {
                write!(
                    f,
                    "Uniform prior support [{min_support}, {max_support}] outside the theta \
                     bounds [{lower}, {upper}]"
                )
            }

            // ---- Configuration: theta bounds ----
            CatError::InvalidThetaBounds { lower, upper } => {
                write!(f, "Invalid theta bounds [{lower}, {upper}]: lower must be below upper")
            }

            // ---- Configuration: item parameters ----
            CatError::NonNumericParam { key } => {
                write!(f, "Item parameter '{key}' is not a finite number")
            }
            CatError::InvalidDiscrimination { value } => {
                write!(f, "Invalid discrimination {value}: must be finite and > 0")
            }
            CatError::InvalidDifficulty { value } => {
                write!(f, "Invalid difficulty {value}: must be finite")
            }
            CatError::InvalidGuessing { value } => {
                write!(f, "Invalid guessing parameter {value}: must lie in [0, 1)")
            }
            CatError::InvalidSlipping { guessing, slipping } => {
                write!(
                    f,
                    "Invalid slipping parameter {slipping}: must lie in ({guessing}, 1]"
                )
            }

            // ---- Stopping operators ----
            CatError::InvalidLogicalOperator { name } => {
                write!(f, "Invalid logical operator '{name}': expected 'and', 'or', or 'only'")
            }
            CatError::MissingEvaluationCat => {
                write!(f, "Operator 'only' requires a cat to evaluate and none was provided")
            }

            // ---- Batch arguments ----
            CatError::ItemAnswerLengthMismatch { items, answers } => {
                write!(f, "Length mismatch: {items} items but {answers} answers")
            }
            CatError::ParamResponseLengthMismatch { params, responses } => {
                write!(f, "Length mismatch: {params} parameter sets but {responses} responses")
            }

            // ---- Parameter records ----
            CatError::RedundantParamKeys { symbolic, semantic } => {
                write!(
                    f,
                    "Redundant item parameter keys: record defines both '{symbolic}' and \
                     '{semantic}'"
                )
            }
            CatError::MissingParamKey { symbolic, semantic } => {
                write!(
                    f,
                    "Missing item parameter: record defines neither '{symbolic}' nor \
                     '{semantic}'"
                )
            }

            // ---- Corpus / controller ----
            CatError::ReservedCatName { name } => {
                write!(f, "Cat name '{name}' is reserved for the controller's internal session")
            }
            CatError::DuplicateCatName { name } => {
                write!(f, "Duplicate cat name '{name}' within a single stimulus")
            }
            CatError::UnknownCatName { name } => {
                write!(f, "Unknown cat name '{name}'")
            }
        }
    }
}
