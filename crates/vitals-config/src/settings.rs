//! Application configuration structures

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Settings {
    /// Reporting and aggregation settings
    #[validate]
    pub reporting: ReportingConfig,

    /// Metric store settings
    #[validate]
    pub store: StoreConfig,

    /// Logging settings
    #[validate]
    pub logging: LoggingSettings,
}

/// Reporting and aggregation configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ReportingConfig {
    /// Reporting timezone used for bucket boundaries (IANA name)
    /// Example: "America/New_York" or "UTC"
    #[validate(custom(function = "crate::validation::validate_timezone", message = "Unknown IANA timezone"))]
    pub timezone: String,

    /// Emit zeroed buckets for empty periods so charts stay continuous.
    /// When false, empty periods are omitted from aggregation output.
    pub fill_empty_buckets: bool,

    /// Window length in days for trend comparisons
    #[validate(range(min = 1, max = 365, message = "Trend window must be between 1 and 365 days"))]
    pub trend_window_days: u32,
}

/// Metric store configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct StoreConfig {
    /// Default page size for metric listings
    #[validate(range(min = 1, max = 1000, message = "Page size must be between 1 and 1000"))]
    pub default_page_size: usize,

    /// Maximum number of cached aggregation responses
    #[validate(range(min = 1, max = 100_000, message = "Cache capacity must be between 1 and 100000"))]
    pub cache_capacity: u64,

    /// Cached aggregation time-to-live in seconds
    #[validate(range(min = 1, max = 86_400, message = "Cache TTL must be between 1 second and 1 day"))]
    pub cache_ttl_seconds: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoggingSettings {
    /// Log level (trace, debug, info, warn, error)
    #[validate(custom(function = "crate::validation::validate_log_level", message = "Log level must be one of: trace, debug, info, warn, error"))]
    pub level: String,

    /// Optional log file path
    pub file: Option<String>,

    /// Whether to emit compact JSON-style output
    pub json_format: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            reporting: ReportingConfig::default(),
            store: StoreConfig::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl Default for ReportingConfig {
    fn default() -> Self {
        Self {
            timezone: "UTC".to_string(),
            fill_empty_buckets: false,
            trend_window_days: 30,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            default_page_size: 100,
            cache_capacity: 1024,
            cache_ttl_seconds: 300,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            json_format: false,
        }
    }
}

impl Settings {
    /// Comprehensive validation of the entire configuration
    pub fn validate_all(&self) -> Result<(), validator::ValidationErrors> {
        self.validate()
    }
}

impl ReportingConfig {
    /// Parsed reporting timezone. Falls back to UTC if the stored name is
    /// invalid, which validation normally prevents.
    pub fn tz(&self) -> chrono_tz::Tz {
        self.timezone.parse().unwrap_or(chrono_tz::UTC)
    }
}

impl LoggingSettings {
    /// Translate into the common logging bootstrap configuration.
    pub fn to_logging_config(&self) -> vitals_common::logging::LoggingConfig {
        vitals_common::logging::LoggingConfig {
            level: self.level.clone(),
            json_format: self.json_format,
            pretty_format: !self.json_format,
            file_path: self.file.clone(),
            ..vitals_common::logging::LoggingConfig::default()
        }
    }
}
