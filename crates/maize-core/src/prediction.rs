//! Prediction records and their read models.
//!
//! A [`Prediction`] stores the six readings a user submitted, the yield
//! computed from them, and the time of submission. Recommendations are not a
//! field: [`AdvisedPrediction`] attaches them on the way out.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  advice::{Recommendation, generate_recommendations},
  scoring::estimate_yield,
};

// ─── Owner ───────────────────────────────────────────────────────────────────

/// The authenticated caller a record belongs to. Opaque to the core; the
/// server uses the login name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(String);

impl OwnerId {
  pub fn new(id: impl Into<String>) -> Self { Self(id.into()) }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for OwnerId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

// ─── Readings ────────────────────────────────────────────────────────────────

/// The six soil/climate inputs to the scoring and advice engines.
///
/// Values are not range-checked: negative rainfall or a pH above 14 are
/// scored as given.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Readings {
  /// Millimetres.
  pub rainfall:    f64,
  /// Degrees Celsius.
  pub temperature: f64,
  pub nitrogen:    f64,
  pub phosphorus:  f64,
  pub potassium:   f64,
  pub ph:          f64,
}

impl Readings {
  pub fn estimate_yield(&self) -> f64 {
    estimate_yield(
      self.rainfall,
      self.temperature,
      self.nitrogen,
      self.phosphorus,
      self.potassium,
      self.ph,
    )
  }

  pub fn recommendations(&self) -> Vec<Recommendation> {
    generate_recommendations(
      self.nitrogen,
      self.phosphorus,
      self.potassium,
      self.ph,
    )
  }
}

/// Everything a caller controls on a record.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionInputs {
  pub readings:     Readings,
  pub seed_variety: Option<String>,
}

impl PredictionInputs {
  /// Attach the yield derived from these readings.
  pub fn score(self) -> ScoredInputs {
    let yield_estimate = self.readings.estimate_yield();
    ScoredInputs { inputs: self, yield_estimate }
  }
}

/// Inputs paired with the yield computed from them. Only [`PredictionInputs::score`]
/// builds one, so a stored yield always matches its readings.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredInputs {
  inputs:         PredictionInputs,
  yield_estimate: f64,
}

impl ScoredInputs {
  pub fn inputs(&self) -> &PredictionInputs { &self.inputs }

  pub fn yield_estimate(&self) -> f64 { self.yield_estimate }

  pub fn into_parts(self) -> (PredictionInputs, f64) {
    (self.inputs, self.yield_estimate)
  }
}

// ─── Prediction ──────────────────────────────────────────────────────────────

/// A stored submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
  pub prediction_id:  Uuid,
  pub owner:          OwnerId,
  #[serde(flatten)]
  pub readings:       Readings,
  pub seed_variety:   Option<String>,
  /// Tons per hectare; derived from `readings`, never caller-supplied.
  pub yield_estimate: f64,
  /// Server-assigned at creation; never changes.
  pub created_at:     DateTime<Utc>,
}

impl Prediction {
  /// The caller-controlled part of this record.
  pub fn inputs(&self) -> PredictionInputs {
    PredictionInputs {
      readings:     self.readings,
      seed_variety: self.seed_variety.clone(),
    }
  }

  /// Annotate with recommendations derived from the stored readings.
  pub fn advise(self) -> AdvisedPrediction {
    let recommendations = self.readings.recommendations();
    AdvisedPrediction { prediction: self, recommendations }
  }
}

/// Input to [`crate::store::PredictionStore::insert`].
/// `prediction_id` and `created_at` are always set by the store.
#[derive(Debug, Clone)]
pub struct NewPrediction {
  pub owner:  OwnerId,
  pub scored: ScoredInputs,
}

// ─── Read models ─────────────────────────────────────────────────────────────

/// A record plus the advice derived from it at read time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdvisedPrediction {
  #[serde(flatten)]
  pub prediction:      Prediction,
  pub recommendations: Vec<Recommendation>,
}

/// Aggregate view over one owner's history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistorySummary {
  pub total:         usize,
  /// Mean yield, rounded to two places. `None` when the history is empty.
  pub average_yield: Option<f64>,
  pub best_yield:    Option<f64>,
  pub latest:        Option<AdvisedPrediction>,
}
