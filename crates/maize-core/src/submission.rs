//! Raw create/update bodies and their validation.
//!
//! Numeric fields arrive as arbitrary JSON so that a bad value is reported as
//! a field error instead of failing deserialisation of the whole body. Numbers
//! and numeric strings (`"12.5"`) are both accepted.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::prediction::{PredictionInputs, Readings};

/// Longest accepted `seed_variety`, in characters.
pub const SEED_VARIETY_MAX_CHARS: usize = 100;

const REQUIRED: &str = "this field is required";
const NOT_NULL: &str = "this field may not be null";
const NOT_A_NUMBER: &str = "a valid number is required";
const NOT_A_STRING: &str = "not a valid string";

// ─── Errors ──────────────────────────────────────────────────────────────────

/// Every field that failed validation, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("invalid input: {}", describe(.fields))]
pub struct ValidationError {
  pub fields: BTreeMap<&'static str, String>,
}

impl ValidationError {
  fn push(&mut self, field: &'static str, message: impl Into<String>) {
    self.fields.insert(field, message.into());
  }

  fn into_result<T>(self, ok: impl FnOnce() -> T) -> Result<T, Self> {
    if self.fields.is_empty() { Ok(ok()) } else { Err(self) }
  }
}

fn describe(fields: &BTreeMap<&'static str, String>) -> String {
  fields
    .iter()
    .map(|(field, message)| format!("{field}: {message}"))
    .collect::<Vec<_>>()
    .join("; ")
}

// ─── Submission ──────────────────────────────────────────────────────────────

/// A create or update body as received.
///
/// Each field is `None` when absent and `Some(Value::Null)` when explicitly
/// `null`, so updates can tell "leave unchanged" from "clear".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Submission {
  #[serde(default, deserialize_with = "present")]
  pub rainfall:     Option<Value>,
  #[serde(default, deserialize_with = "present")]
  pub temperature:  Option<Value>,
  #[serde(default, deserialize_with = "present")]
  pub nitrogen:     Option<Value>,
  #[serde(default, deserialize_with = "present")]
  pub phosphorus:   Option<Value>,
  #[serde(default, deserialize_with = "present")]
  pub potassium:    Option<Value>,
  #[serde(default, deserialize_with = "present")]
  pub ph:           Option<Value>,
  #[serde(default, deserialize_with = "present")]
  pub seed_variety: Option<Value>,
}

/// Keeps an explicit `null` as `Some(Value::Null)`; `#[serde(default)]`
/// covers the absent case.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
  D: Deserializer<'de>,
{
  Value::deserialize(deserializer).map(Some)
}

impl Submission {
  /// Validate as a create body: all six readings are required.
  pub fn into_new(self) -> Result<PredictionInputs, ValidationError> {
    let mut errors = ValidationError::default();
    let mut required = |field: &'static str, raw: Option<Value>| match raw {
      None => {
        errors.push(field, REQUIRED);
        0.0
      }
      Some(v) => number(field, &v, &mut errors).unwrap_or_default(),
    };

    let readings = Readings {
      rainfall:    required("rainfall", self.rainfall),
      temperature: required("temperature", self.temperature),
      nitrogen:    required("nitrogen", self.nitrogen),
      phosphorus:  required("phosphorus", self.phosphorus),
      potassium:   required("potassium", self.potassium),
      ph:          required("ph", self.ph),
    };
    let seed_variety = match self.seed_variety {
      None => None,
      Some(v) => seed_variety(&v, &mut errors),
    };

    errors.into_result(|| PredictionInputs { readings, seed_variety })
  }

  /// Validate as an update body and merge it over `current`.
  ///
  /// Absent fields keep their current values. An explicit `null`
  /// `seed_variety` clears it.
  pub fn merge_into(
    self,
    current: &PredictionInputs,
  ) -> Result<PredictionInputs, ValidationError> {
    let mut errors = ValidationError::default();
    let mut optional = |field: &'static str, raw: Option<Value>, old: f64| {
      raw
        .and_then(|v| number(field, &v, &mut errors))
        .unwrap_or(old)
    };

    let old = current.readings;
    let readings = Readings {
      rainfall:    optional("rainfall", self.rainfall, old.rainfall),
      temperature: optional("temperature", self.temperature, old.temperature),
      nitrogen:    optional("nitrogen", self.nitrogen, old.nitrogen),
      phosphorus:  optional("phosphorus", self.phosphorus, old.phosphorus),
      potassium:   optional("potassium", self.potassium, old.potassium),
      ph:          optional("ph", self.ph, old.ph),
    };
    let seed_variety = match self.seed_variety {
      None => current.seed_variety.clone(),
      Some(v) => seed_variety(&v, &mut errors),
    };

    errors.into_result(|| PredictionInputs { readings, seed_variety })
  }

  /// Validate without a stored record to merge into. Used to reject a bad
  /// update body before touching the store.
  pub fn check_update(&self) -> Result<(), ValidationError> {
    let mut errors = ValidationError::default();
    let numerics = [
      ("rainfall", &self.rainfall),
      ("temperature", &self.temperature),
      ("nitrogen", &self.nitrogen),
      ("phosphorus", &self.phosphorus),
      ("potassium", &self.potassium),
      ("ph", &self.ph),
    ];
    for (field, raw) in numerics {
      if let Some(v) = raw {
        number(field, v, &mut errors);
      }
    }
    if let Some(v) = &self.seed_variety {
      seed_variety(v, &mut errors);
    }
    errors.into_result(|| ())
  }
}

// ─── Field parsers ───────────────────────────────────────────────────────────

fn number(
  field: &'static str,
  raw: &Value,
  errors: &mut ValidationError,
) -> Option<f64> {
  let parsed = match raw {
    Value::Null => {
      errors.push(field, NOT_NULL);
      return None;
    }
    Value::Number(n) => n.as_f64(),
    Value::String(s) => s.trim().parse::<f64>().ok(),
    _ => None,
  };

  match parsed.filter(|n| n.is_finite()) {
    Some(n) => Some(n),
    None => {
      errors.push(field, NOT_A_NUMBER);
      None
    }
  }
}

fn seed_variety(raw: &Value, errors: &mut ValidationError) -> Option<String> {
  match raw {
    Value::Null => None,
    Value::String(s) if s.chars().count() > SEED_VARIETY_MAX_CHARS => {
      errors.push(
        "seed_variety",
        format!(
          "ensure this field has no more than {SEED_VARIETY_MAX_CHARS} characters"
        ),
      );
      None
    }
    Value::String(s) => Some(s.clone()),
    _ => {
      errors.push("seed_variety", NOT_A_STRING);
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  fn submission(body: Value) -> Submission {
    serde_json::from_value(body).unwrap()
  }

  fn full() -> Value {
    json!({
      "rainfall": 120, "temperature": 25, "nitrogen": 40,
      "phosphorus": 20, "potassium": 20, "ph": 6.5,
    })
  }

  #[test]
  fn create_accepts_numbers_and_numeric_strings() {
    let mut body = full();
    body["ph"] = json!(" 6.5 ");
    body["seed_variety"] = json!("SC 403");
    let inputs = submission(body).into_new().unwrap();
    assert_eq!(inputs.readings.ph, 6.5);
    assert_eq!(inputs.readings.rainfall, 120.0);
    assert_eq!(inputs.seed_variety.as_deref(), Some("SC 403"));
  }

  #[test]
  fn create_reports_every_bad_field_at_once() {
    let err = submission(json!({
      "rainfall": "lots", "temperature": null, "nitrogen": true,
      "phosphorus": 20, "potassium": 20,
    }))
    .into_new()
    .unwrap_err();

    assert_eq!(err.fields.len(), 4);
    assert_eq!(err.fields["rainfall"], NOT_A_NUMBER);
    assert_eq!(err.fields["temperature"], NOT_NULL);
    assert_eq!(err.fields["nitrogen"], NOT_A_NUMBER);
    assert_eq!(err.fields["ph"], REQUIRED);
  }

  #[test]
  fn non_finite_strings_are_rejected() {
    let mut body = full();
    body["rainfall"] = json!("NaN");
    body["ph"] = json!("inf");
    let err = submission(body).into_new().unwrap_err();
    assert_eq!(err.fields.keys().copied().collect::<Vec<_>>(), ["ph", "rainfall"]);
  }

  #[test]
  fn out_of_domain_values_pass() {
    let mut body = full();
    body["rainfall"] = json!(-5);
    body["ph"] = json!(15);
    assert!(submission(body).into_new().is_ok());
  }

  #[test]
  fn long_seed_variety_is_rejected() {
    let mut body = full();
    body["seed_variety"] = json!("x".repeat(SEED_VARIETY_MAX_CHARS + 1));
    let err = submission(body).into_new().unwrap_err();
    assert!(err.fields.contains_key("seed_variety"));

    let mut body = full();
    body["seed_variety"] = json!(7);
    let err = submission(body).into_new().unwrap_err();
    assert_eq!(err.fields["seed_variety"], NOT_A_STRING);
  }

  #[test]
  fn merge_keeps_absent_fields_and_clears_null_variety() {
    let current = PredictionInputs {
      readings:     submission(full()).into_new().unwrap().readings,
      seed_variety: Some("H614".into()),
    };

    let merged = submission(json!({ "nitrogen": "10" }))
      .merge_into(&current)
      .unwrap();
    assert_eq!(merged.readings.nitrogen, 10.0);
    assert_eq!(merged.readings.rainfall, 120.0);
    assert_eq!(merged.seed_variety.as_deref(), Some("H614"));

    let cleared = submission(json!({ "seed_variety": null }))
      .merge_into(&current)
      .unwrap();
    assert_eq!(cleared.seed_variety, None);
    assert_eq!(cleared.readings, current.readings);
  }

  #[test]
  fn merge_rejects_null_numeric() {
    let current = submission(full()).into_new().unwrap();
    let err = submission(json!({ "ph": null })).merge_into(&current).unwrap_err();
    assert_eq!(err.fields["ph"], NOT_NULL);
  }

  #[test]
  fn check_update_matches_merge_validation() {
    assert!(submission(json!({})).check_update().is_ok());
    assert!(submission(json!({ "ph": "7" })).check_update().is_ok());
    let err = submission(json!({ "ph": "acid", "seed_variety": [] }))
      .check_update()
      .unwrap_err();
    assert_eq!(err.fields.len(), 2);
  }

  #[test]
  fn display_lists_fields() {
    let err = submission(json!({})).into_new().unwrap_err();
    let text = err.to_string();
    assert!(text.starts_with("invalid input: "));
    assert!(text.contains("ph: this field is required"));
  }

  #[test]
  fn display_joins_fields_in_name_order() {
    let err = submission(json!({
      "rainfall": 1, "temperature": 1, "nitrogen": 1, "phosphorus": 1,
      "potassium": "lots", "ph": null,
    }))
    .into_new()
    .unwrap_err();
    assert_eq!(
      err.to_string(),
      "invalid input: ph: this field may not be null; potassium: a valid number is required",
    );
    let source: &dyn std::error::Error = &err;
    assert!(source.source().is_none());
  }
}
