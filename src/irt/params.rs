//! Canonical item parameters (ζ) and the dynamic-record boundary.
//!
//! Purpose
//! -------
//! Define [`ItemParams`], the canonical four-parameter tuple of a calibrated
//! item, together with the boundary that canonicalizes dynamically keyed
//! parameter records. Two naming conventions coexist at the boundary —
//! symbolic (`a`, `b`, `c`, `d`) and semantic (`discrimination`,
//! `difficulty`, `guessing`, `slipping`) — and exactly one canonical form is
//! used internally.
//!
//! Key behaviors
//! -------------
//! - Parse a `serde_json` map into [`ItemParams`] via
//!   [`ItemParams::from_record`], rejecting records that spell the same
//!   quantity twice and, in strict mode, records that omit a quantity.
//! - Fill missing quantities with the documented defaults
//!   `a = 1, b = 0, c = 0, d = 1`.
//! - Render the canonical form back into either spelling via
//!   [`ItemParams::to_symbolic_record`] / [`ItemParams::to_semantic_record`].
//! - Enforce the parameter domain (`a > 0`, `c ∈ [0, 1)`, `d ∈ (c, 1]`,
//!   everything finite) in [`ItemParams::new`] and [`ItemParams::validate`].
//!
//! Invariants
//! ----------
//! - `discrimination` is finite and strictly positive.
//! - `difficulty` is finite.
//! - `guessing ∈ [0, 1)` and `slipping ∈ (guessing, 1]`, so the 4PL response
//!   curve is strictly increasing between its asymptotes.
//!
//! Conventions
//! -----------
//! - Parsing and rendering only translate between spellings; they never
//!   rescale or reparameterize. The engine works exclusively with the
//!   canonical struct after the boundary.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::errors::{CatError, CatResult};

/// Symbolic/semantic key pairs, one per quantity, in canonical order.
const KEY_PAIRS: [(&str, &str); 4] = [
    ("a", "discrimination"),
    ("b", "difficulty"),
    ("c", "guessing"),
    ("d", "slipping"),
];

/// Canonical 4PL item parameters (ζ).
///
/// Fields:
/// - `discrimination` (`a`): slope at the inflection point, `> 0`.
/// - `difficulty` (`b`): location of the inflection point.
/// - `guessing` (`c`): lower asymptote, `∈ [0, 1)`.
/// - `slipping` (`d`): upper asymptote, `∈ (c, 1]`.
///
/// `Default` is the neutral 2PL-like item `a = 1, b = 0, c = 0, d = 1`.
/// Construct with [`ItemParams::new`] or [`ItemParams::from_record`] to
/// validate the domain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ItemParams {
    pub discrimination: f64,
    pub difficulty: f64,
    pub guessing: f64,
    pub slipping: f64,
}

impl Default for ItemParams {
    fn default() -> Self {
        ItemParams { discrimination: 1.0, difficulty: 0.0, guessing: 0.0, slipping: 1.0 }
    }
}

impl ItemParams {
    /// Construct validated item parameters.
    ///
    /// # Errors
    /// - [`CatError::InvalidDiscrimination`] if `a` is non-finite or `<= 0`.
    /// - [`CatError::InvalidDifficulty`] if `b` is non-finite.
    /// - [`CatError::InvalidGuessing`] if `c` lies outside `[0, 1)`.
    /// - [`CatError::InvalidSlipping`] if `d` lies outside `(c, 1]`.
    pub fn new(
        discrimination: f64, difficulty: f64, guessing: f64, slipping: f64,
    ) -> CatResult<Self> {
        let params = ItemParams { discrimination, difficulty, guessing, slipping };
        params.validate()?;
        Ok(params)
    }

    /// Item parameters with a given difficulty and defaults elsewhere.
    ///
    /// Convenience for Rasch-style pools where only `b` varies.
    pub fn with_difficulty(difficulty: f64) -> Self {
        ItemParams { difficulty, ..ItemParams::default() }
    }

    /// Check the parameter domain without consuming the value.
    ///
    /// # Errors
    /// Same classification as [`ItemParams::new`].
    pub fn validate(&self) -> CatResult<()> {
        if !self.discrimination.is_finite() || self.discrimination <= 0.0 {
            return Err(CatError::InvalidDiscrimination { value: self.discrimination });
        }
        if !self.difficulty.is_finite() {
            return Err(CatError::InvalidDifficulty { value: self.difficulty });
        }
        if !self.guessing.is_finite() || !(0.0..1.0).contains(&self.guessing) {
            return Err(CatError::InvalidGuessing { value: self.guessing });
        }
        if !self.slipping.is_finite()
            || self.slipping <= self.guessing
            || self.slipping > 1.0
        {
            return Err(CatError::InvalidSlipping {
                guessing: self.guessing,
                slipping: self.slipping,
            });
        }
        Ok(())
    }

    /// Canonicalize a dynamically keyed parameter record.
    ///
    /// Accepts symbolic (`a`, `b`, `c`, `d`) and semantic
    /// (`discrimination`, `difficulty`, `guessing`, `slipping`) keys. Keys
    /// outside the eight recognized names are ignored so callers can pass a
    /// full stimulus record containing metadata.
    ///
    /// # Errors
    /// - [`CatError::RedundantParamKeys`] if a record spells the same
    ///   quantity both ways.
    /// - [`CatError::MissingParamKey`] if `strict` and a quantity is absent.
    /// - [`CatError::NonNumericParam`] if a recognized key holds anything
    ///   but a number.
    /// - Domain failures as in [`ItemParams::new`].
    pub fn from_record(record: &Map<String, Value>, strict: bool) -> CatResult<Self> {
        let mut values = [0.0_f64; 4];
        let defaults = ItemParams::default();
        let default_values = [
            defaults.discrimination,
            defaults.difficulty,
            defaults.guessing,
            defaults.slipping,
        ];

        for (slot, &(symbolic, semantic)) in KEY_PAIRS.iter().enumerate() {
            let sym = record.get(symbolic);
            let sem = record.get(semantic);
            let raw = match (sym, sem) {
                (Some(_), Some(_)) => {
                    return Err(CatError::RedundantParamKeys { symbolic, semantic });
                }
                (Some(value), None) => Some((symbolic, value)),
                (None, Some(value)) => Some((semantic, value)),
                (None, None) if strict => {
                    return Err(CatError::MissingParamKey { symbolic, semantic });
                }
                (None, None) => None,
            };
            values[slot] = match raw {
                Some((key, value)) => value
                    .as_f64()
                    .ok_or_else(|| CatError::NonNumericParam { key: key.to_string() })?,
                None => default_values[slot],
            };
        }

        ItemParams::new(values[0], values[1], values[2], values[3])
    }

    /// Render the canonical form under symbolic keys (`a`, `b`, `c`, `d`).
    pub fn to_symbolic_record(&self) -> Map<String, Value> {
        self.to_record(|pair| pair.0)
    }

    /// Render the canonical form under semantic keys
    /// (`discrimination`, `difficulty`, `guessing`, `slipping`).
    pub fn to_semantic_record(&self) -> Map<String, Value> {
        self.to_record(|pair| pair.1)
    }

    fn to_record(&self, key_of: impl Fn(&(&'static str, &'static str)) -> &'static str) -> Map<String, Value> {
        let values = [self.discrimination, self.difficulty, self.guessing, self.slipping];
        let mut record = Map::new();
        for (pair, value) in KEY_PAIRS.iter().zip(values) {
            let number = Number::from_f64(value)
                .unwrap_or_else(|| Number::from(0));
            record.insert(key_of(pair).to_string(), Value::Number(number));
        }
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use approx::assert_relative_eq;
    use serde_json::json;

    fn record(value: Value) -> Map<String, Value> {
        value.as_object().expect("test record must be a JSON object").clone()
    }

    #[test]
    // Purpose
    // -------
    // Missing quantities fall back to the documented defaults in lenient
    // mode.
    //
    // Given
    // -----
    // - A record carrying only a difficulty under its symbolic key.
    //
    // Expect
    // ------
    // - `a = 1, c = 0, d = 1` and the supplied `b`.
    fn from_record_fills_defaults_for_missing_quantities() {
        let params =
            ItemParams::from_record(&record(json!({ "b": 0.75 })), false).expect("should parse");

        assert_relative_eq!(params.discrimination, 1.0);
        assert_relative_eq!(params.difficulty, 0.75);
        assert_relative_eq!(params.guessing, 0.0);
        assert_relative_eq!(params.slipping, 1.0);
    }

    #[test]
    // Purpose
    // -------
    // Semantic keys parse to the same canonical form as symbolic keys, and
    // unrecognized metadata keys are ignored.
    fn from_record_accepts_semantic_keys_and_ignores_metadata() {
        let symbolic = ItemParams::from_record(
            &record(json!({ "a": 2.0, "b": -1.0, "c": 0.25, "d": 0.95 })),
            false,
        )
        .expect("symbolic record should parse");
        let semantic = ItemParams::from_record(
            &record(json!({
                "discrimination": 2.0,
                "difficulty": -1.0,
                "guessing": 0.25,
                "slipping": 0.95,
                "id": "item-17",
                "content": "2 + 2 = ?"
            })),
            false,
        )
        .expect("semantic record should parse");

        assert_eq!(symbolic, semantic);
    }

    #[test]
    // Purpose
    // -------
    // A record spelling one quantity both ways is rejected with the
    // RedundantKeys classification.
    fn from_record_rejects_redundant_spellings() {
        let err = ItemParams::from_record(
            &record(json!({ "a": 1.0, "discrimination": 1.5 })),
            false,
        )
        .expect_err("both spellings must be rejected");

        assert_eq!(err.kind(), ErrorKind::RedundantKeys);
        assert_eq!(err, CatError::RedundantParamKeys { symbolic: "a", semantic: "discrimination" });
    }

    #[test]
    // Purpose
    // -------
    // Strict mode requires every quantity under one of its spellings.
    fn from_record_strict_requires_all_quantities() {
        let err = ItemParams::from_record(
            &record(json!({ "a": 1.0, "b": 0.0, "c": 0.0 })),
            true,
        )
        .expect_err("missing slipping must be rejected in strict mode");

        assert_eq!(err.kind(), ErrorKind::MissingKeys);
    }

    #[test]
    // Purpose
    // -------
    // Non-numeric values under a recognized key are classified as
    // configuration errors.
    fn from_record_rejects_non_numeric_values() {
        let err = ItemParams::from_record(&record(json!({ "b": "hard" })), false)
            .expect_err("string difficulty must be rejected");

        assert_eq!(err, CatError::NonNumericParam { key: "b".into() });
        assert_eq!(err.kind(), ErrorKind::InvalidConfig);
    }

    #[test]
    // Purpose
    // -------
    // Domain validation rejects each out-of-range parameter with its own
    // variant.
    fn new_rejects_out_of_domain_parameters() {
        assert_eq!(
            ItemParams::new(0.0, 0.0, 0.0, 1.0).expect_err("a = 0").kind(),
            ErrorKind::InvalidConfig
        );
        assert!(matches!(
            ItemParams::new(1.0, f64::NAN, 0.0, 1.0),
            Err(CatError::InvalidDifficulty { .. })
        ));
        assert!(matches!(
            ItemParams::new(1.0, 0.0, 1.0, 1.0),
            Err(CatError::InvalidGuessing { .. })
        ));
        assert!(matches!(
            ItemParams::new(1.0, 0.0, 0.5, 0.4),
            Err(CatError::InvalidSlipping { .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Rendering and re-parsing under either spelling is the identity on the
    // canonical form.
    fn record_rendering_round_trips() {
        let params = ItemParams::new(1.8, -0.4, 0.2, 0.98).expect("valid params");

        let via_symbolic = ItemParams::from_record(&params.to_symbolic_record(), true)
            .expect("symbolic rendering should re-parse strictly");
        let via_semantic = ItemParams::from_record(&params.to_semantic_record(), true)
            .expect("semantic rendering should re-parse strictly");

        assert_eq!(via_symbolic, params);
        assert_eq!(via_semantic, params);
    }
}
