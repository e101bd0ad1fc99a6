//! Domain types for health metric samples and their derived aggregates.

use crate::error::EngineError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Broad grouping of metric types, used for presentation and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricCategory {
    Vitals,
    Body,
    Activity,
    Sleep,
    Nutrition,
}

/// Types of health metrics that can be tracked.
///
/// Wire identifiers are snake_case strings (e.g. `heart_rate`, `vo2_max`)
/// matching the public API contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricType {
    // Vital signs
    HeartRate,
    RestingHeartRate,
    BloodOxygen,
    BodyTemperature,
    RespiratoryRate,

    // Body composition
    BodyWeight,
    Bmi,
    BodyFatPercentage,

    // Activity and fitness
    Steps,
    ActiveMinutes,
    CaloriesBurned,
    Vo2Max,

    // Sleep
    SleepDuration,
    SleepScore,

    // Nutrition
    CaloriesConsumed,
    ProteinIntake,
    WaterIntake,
}

impl MetricType {
    /// Canonical unit every stored value is normalized to.
    pub fn canonical_unit(&self) -> &'static str {
        match self {
            Self::HeartRate | Self::RestingHeartRate => "bpm",
            Self::BloodOxygen | Self::BodyFatPercentage => "%",
            Self::BodyTemperature => "C",
            Self::RespiratoryRate => "breaths/min",
            Self::BodyWeight => "kg",
            Self::Bmi => "kg/m2",
            Self::Steps => "count",
            Self::ActiveMinutes | Self::SleepDuration => "min",
            Self::CaloriesBurned | Self::CaloriesConsumed => "kcal",
            Self::Vo2Max => "mL/kg/min",
            Self::SleepScore => "score",
            Self::ProteinIntake => "g",
            Self::WaterIntake => "mL",
        }
    }

    /// Category the metric belongs to.
    pub fn category(&self) -> MetricCategory {
        match self {
            Self::HeartRate
            | Self::RestingHeartRate
            | Self::BloodOxygen
            | Self::BodyTemperature
            | Self::RespiratoryRate => MetricCategory::Vitals,
            Self::BodyWeight | Self::Bmi | Self::BodyFatPercentage => MetricCategory::Body,
            Self::Steps | Self::ActiveMinutes | Self::CaloriesBurned | Self::Vo2Max => {
                MetricCategory::Activity
            }
            Self::SleepDuration | Self::SleepScore => MetricCategory::Sleep,
            Self::CaloriesConsumed | Self::ProteinIntake | Self::WaterIntake => {
                MetricCategory::Nutrition
            }
        }
    }

    /// Wire identifier for the metric type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HeartRate => "heart_rate",
            Self::RestingHeartRate => "resting_heart_rate",
            Self::BloodOxygen => "blood_oxygen",
            Self::BodyTemperature => "body_temperature",
            Self::RespiratoryRate => "respiratory_rate",
            Self::BodyWeight => "body_weight",
            Self::Bmi => "bmi",
            Self::BodyFatPercentage => "body_fat_percentage",
            Self::Steps => "steps",
            Self::ActiveMinutes => "active_minutes",
            Self::CaloriesBurned => "calories_burned",
            Self::Vo2Max => "vo2_max",
            Self::SleepDuration => "sleep_duration",
            Self::SleepScore => "sleep_score",
            Self::CaloriesConsumed => "calories_consumed",
            Self::ProteinIntake => "protein_intake",
            Self::WaterIntake => "water_intake",
        }
    }
}

impl fmt::Display for MetricType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bucket size selector for aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Daily,
    Weekly,
    Monthly,
}

impl Granularity {
    /// Wire identifier for the granularity.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" | "day" => Ok(Self::Daily),
            "weekly" | "week" => Ok(Self::Weekly),
            "monthly" | "month" => Ok(Self::Monthly),
            other => Err(EngineError::UnsupportedGranularity(other.to_string())),
        }
    }
}

/// Inclusive calendar date range `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Build a range, rejecting one that starts after it ends.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, EngineError> {
        if start > end {
            return Err(EngineError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Whether a date falls inside the range (both ends inclusive).
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// A single time-stamped metric measurement.
///
/// `recorded_at` is always timezone-aware; values are stored in the
/// metric's canonical unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSample {
    pub metric_type: MetricType,
    pub value: f64,
    pub unit: String,
    pub recorded_at: DateTime<Utc>,
    pub source: String,
}

/// Statistical summary of the samples falling into one calendar period.
///
/// Derived, never persisted; recomputed per request. `period_end` is the
/// exclusive start of the following period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregationBucket {
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub min: f64,
    pub max: f64,
    pub avg: f64,
    pub median: f64,
    pub sample_count: usize,
}

/// One element of a trend series.
///
/// `percent_change_from_previous` is `None` for the first period and when
/// the previous period's value is zero; it serializes as JSON `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub period_start: NaiveDate,
    pub value: f64,
    pub percent_change_from_previous: Option<f64>,
}
