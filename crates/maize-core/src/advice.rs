//! Rule-based agronomic advice derived from nutrient and pH readings.
//!
//! Advice is never stored; it is recomputed from a record's readings every
//! time the record is read.

use std::fmt;

use serde::{Serialize, Serializer};

/// Nitrogen index below which N fertilizer is advised.
pub const NITROGEN_FLOOR: f64 = 30.0;
/// Phosphorus index below which phosphate fertilizer is advised.
pub const PHOSPHORUS_FLOOR: f64 = 10.0;
/// Potassium index below which potash is advised.
pub const POTASSIUM_FLOOR: f64 = 10.0;
/// pH below which liming is advised.
pub const ACIDIC_PH: f64 = 6.0;
/// pH above which an acidifying treatment is advised.
pub const ALKALINE_PH: f64 = 7.5;

/// A single advisory. Serialises as its human-readable message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Recommendation {
  ApplyNitrogen,
  ApplyPhosphorus,
  ApplyPotash,
  RaisePh,
  LowerPh,
  /// Emitted alone, and only when no other rule fired.
  Optimal,
}

impl Recommendation {
  pub fn message(self) -> &'static str {
    match self {
      Self::ApplyNitrogen => {
        "Nitrogen is low. Consider applying N fertilizer (e.g., Urea)."
      }
      Self::ApplyPhosphorus => {
        "Phosphorus is low. Consider adding DAP fertilizer."
      }
      Self::ApplyPotash => {
        "Potassium is low. Consider using Muriate of Potash (KCl)."
      }
      Self::RaisePh => "Soil is acidic. Consider liming to raise pH.",
      Self::LowerPh => {
        "Soil is alkaline. Consider sulfur-based treatment to lower pH."
      }
      Self::Optimal => {
        "All nutrient levels are within optimal range. Maintain current \
         practices."
      }
    }
  }
}

impl fmt::Display for Recommendation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.message())
  }
}

impl Serialize for Recommendation {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(self.message())
  }
}

/// Evaluate every rule in fixed order and collect the ones that fire.
///
/// The result is never empty: if no rule fires it holds exactly
/// [`Recommendation::Optimal`].
pub fn generate_recommendations(
  nitrogen: f64,
  phosphorus: f64,
  potassium: f64,
  ph: f64,
) -> Vec<Recommendation> {
  let rules = [
    (nitrogen < NITROGEN_FLOOR, Recommendation::ApplyNitrogen),
    (phosphorus < PHOSPHORUS_FLOOR, Recommendation::ApplyPhosphorus),
    (potassium < POTASSIUM_FLOOR, Recommendation::ApplyPotash),
    (ph < ACIDIC_PH, Recommendation::RaisePh),
    (ph > ALKALINE_PH, Recommendation::LowerPh),
  ];

  let fired: Vec<Recommendation> = rules
    .into_iter()
    .filter_map(|(hit, rec)| hit.then_some(rec))
    .collect();

  if fired.is_empty() {
    vec![Recommendation::Optimal]
  } else {
    fired
  }
}
