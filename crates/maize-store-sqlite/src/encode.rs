//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 strings (microseconds, `Z`)
//! so that lexical order is chronological order. UUIDs are stored as
//! hyphenated lowercase strings. Readings are plain `REAL` columns.

use chrono::{DateTime, SecondsFormat, Utc};
use maize_core::prediction::{OwnerId, Prediction, Readings};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Row type ────────────────────────────────────────────────────────────────

/// Column list shared by every `SELECT` and `RETURNING` clause; order matches
/// [`RawPrediction::from_row`].
pub const COLUMNS: &str = "prediction_id, owner, rainfall, temperature, \
  nitrogen, phosphorus, potassium, ph, seed_variety, yield_estimate, \
  created_at";

/// Raw values read directly from a `predictions` row.
pub struct RawPrediction {
  pub prediction_id:  String,
  pub owner:          String,
  pub rainfall:       f64,
  pub temperature:    f64,
  pub nitrogen:       f64,
  pub phosphorus:     f64,
  pub potassium:      f64,
  pub ph:             f64,
  pub seed_variety:   Option<String>,
  pub yield_estimate: f64,
  pub created_at:     String,
}

impl RawPrediction {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      prediction_id:  row.get(0)?,
      owner:          row.get(1)?,
      rainfall:       row.get(2)?,
      temperature:    row.get(3)?,
      nitrogen:       row.get(4)?,
      phosphorus:     row.get(5)?,
      potassium:      row.get(6)?,
      ph:             row.get(7)?,
      seed_variety:   row.get(8)?,
      yield_estimate: row.get(9)?,
      created_at:     row.get(10)?,
    })
  }

  pub fn into_prediction(self) -> Result<Prediction> {
    Ok(Prediction {
      prediction_id:  decode_uuid(&self.prediction_id)?,
      owner:          OwnerId::new(self.owner),
      readings:       Readings {
        rainfall:    self.rainfall,
        temperature: self.temperature,
        nitrogen:    self.nitrogen,
        phosphorus:  self.phosphorus,
        potassium:   self.potassium,
        ph:          self.ph,
      },
      seed_variety:   self.seed_variety,
      yield_estimate: self.yield_estimate,
      created_at:     decode_dt(&self.created_at)?,
    })
  }
}
