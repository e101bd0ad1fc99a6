//! Utility functions used across the vitals workspace

use crate::{MetricId, Result, Timestamp};
use chrono::Utc;
use uuid::Uuid;

/// Generate a new unique metric record ID
pub fn new_metric_id() -> MetricId {
    MetricId(Uuid::new_v4())
}

/// Get the current timestamp
pub fn now() -> Timestamp {
    Utc::now()
}

/// Format a timestamp for display
pub fn format_timestamp(timestamp: &Timestamp) -> String {
    timestamp.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Validate that a string is not empty after trimming
pub fn validate_non_empty(value: &str, field_name: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(crate::VitalsError::validation_field(
            format!("{} cannot be empty", field_name),
            field_name,
        ))
    } else {
        Ok(trimmed.to_string())
    }
}
