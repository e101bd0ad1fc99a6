//! Unit normalization for incoming metric values.
//!
//! Every stored value is kept in the metric's canonical unit. Input in the
//! canonical unit passes through unchanged; a small set of common aliases
//! is converted; anything else is rejected at the boundary.

use crate::types::MetricType;

const KG_PER_LB: f64 = 0.453_592_37;
const ML_PER_FL_OZ: f64 = 29.5735;

/// Convert a value in `unit` to the canonical unit for `metric_type`.
///
/// Returns `None` when the unit is not recognized for that metric; the
/// caller maps this to a validation error.
pub fn to_canonical(metric_type: MetricType, value: f64, unit: &str) -> Option<f64> {
    let unit = unit.trim();
    if unit.eq_ignore_ascii_case(metric_type.canonical_unit()) {
        return Some(value);
    }

    match metric_type {
        MetricType::BodyWeight => match unit.to_ascii_lowercase().as_str() {
            "lb" | "lbs" => Some(value * KG_PER_LB),
            "g" => Some(value / 1000.0),
            _ => None,
        },
        MetricType::BodyTemperature => match unit.to_ascii_lowercase().as_str() {
            "f" => Some((value - 32.0) * 5.0 / 9.0),
            _ => None,
        },
        MetricType::ActiveMinutes | MetricType::SleepDuration => {
            match unit.to_ascii_lowercase().as_str() {
                "h" | "hours" => Some(value * 60.0),
                _ => None,
            }
        }
        MetricType::WaterIntake => match unit.to_ascii_lowercase().as_str() {
            "l" => Some(value * 1000.0),
            "oz" | "fl_oz" => Some(value * ML_PER_FL_OZ),
            _ => None,
        },
        _ => None,
    }
}
