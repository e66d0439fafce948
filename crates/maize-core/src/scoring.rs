//! The yield heuristic.
//!
//! An additive model: a fixed baseline, linear nutrient terms, and banded
//! adjustments for rainfall, temperature and pH. There is no upper clamp on
//! the nutrient terms, so very large nutrient readings produce very large
//! estimates.

/// Baseline yield in tons per hectare before any adjustment.
pub const BASELINE_YIELD: f64 = 2.0;

const NITROGEN_WEIGHT: f64 = 0.05;
const PHOSPHORUS_WEIGHT: f64 = 0.03;
const POTASSIUM_WEIGHT: f64 = 0.02;

/// Ideal rainfall band in millimetres, both ends inclusive.
pub const IDEAL_RAINFALL_MM: (f64, f64) = (100.0, 150.0);
/// Ideal temperature band in °C, both ends inclusive.
pub const IDEAL_TEMPERATURE_C: (f64, f64) = (20.0, 30.0);
/// Ideal pH band for yield, both ends inclusive. Independent of the advisory
/// thresholds in [`crate::advice`].
pub const IDEAL_PH: (f64, f64) = (6.0, 7.0);

/// Estimate yield in tons per hectare from six soil/climate readings.
///
/// The result is never negative and is rounded to two decimal places, half
/// away from zero (equivalently half-up, since the value is already clamped
/// to `>= 0`).
pub fn estimate_yield(
  rainfall: f64,
  temperature: f64,
  nitrogen: f64,
  phosphorus: f64,
  potassium: f64,
  ph: f64,
) -> f64 {
  let mut estimate = BASELINE_YIELD;

  estimate += NITROGEN_WEIGHT * nitrogen;
  estimate += PHOSPHORUS_WEIGHT * phosphorus;
  estimate += POTASSIUM_WEIGHT * potassium;

  estimate += rainfall_adjustment(rainfall);
  estimate += band(temperature, IDEAL_TEMPERATURE_C, 0.5);
  estimate += band(ph, IDEAL_PH, 0.2);

  round2(estimate.max(0.0))
}

fn rainfall_adjustment(rainfall: f64) -> f64 {
  let (low, high) = IDEAL_RAINFALL_MM;
  if (low..=high).contains(&rainfall) {
    1.0
  } else if rainfall < low {
    -0.5
  } else {
    -0.3
  }
}

/// `+step` inside the inclusive band, `-step` anywhere else.
fn band(value: f64, (low, high): (f64, f64), step: f64) -> f64 {
  if (low..=high).contains(&value) { step } else { -step }
}

/// Round to two decimal places, half away from zero.
///
/// Values too large to scale by 100 already have no fractional digits and
/// are returned unchanged.
pub fn round2(value: f64) -> f64 {
  let scaled = value * 100.0;
  if !scaled.is_finite() {
    return value;
  }
  scaled.round() / 100.0
}
