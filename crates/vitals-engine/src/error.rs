//! Engine-local error taxonomy
//!
//! All engine errors are input-validation failures surfaced synchronously to
//! the caller. Empty input is never an error: aggregation over zero samples
//! yields an empty bucket sequence.

use chrono::NaiveDate;
use thiserror::Error;
use vitals_common::VitalsError;

/// Errors produced by the aggregation and trend engines
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    /// The requested date range starts after it ends
    #[error("Invalid range: start {start} is after end {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    /// The requested bucket size is not one of daily, weekly, monthly
    #[error("Unsupported granularity: {0}")]
    UnsupportedGranularity(String),

    /// Trend input is not in ascending chronological order
    #[error("Unsorted sequence: element at index {index} is not after its predecessor")]
    UnsortedSequence { index: usize },
}

impl From<EngineError> for VitalsError {
    fn from(err: EngineError) -> Self {
        VitalsError::engine(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = EngineError::InvalidRange {
            start: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid range: start 2024-02-01 is after end 2024-01-01"
        );

        let err = EngineError::UnsupportedGranularity("hourly".to_string());
        assert_eq!(err.to_string(), "Unsupported granularity: hourly");

        let err = EngineError::UnsortedSequence { index: 3 };
        assert!(err.to_string().contains("index 3"));
    }

    #[test]
    fn test_conversion_to_vitals_error() {
        let err: VitalsError = EngineError::UnsupportedGranularity("yearly".to_string()).into();
        assert!(err.to_string().contains("Unsupported granularity"));
    }
}
