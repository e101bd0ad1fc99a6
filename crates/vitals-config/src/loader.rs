//! Configuration loading utilities

use crate::Settings;
use std::env;
use std::path::Path;
use thiserror::Error;
use vitals_common::Result as VitalsResult;

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error when reading configuration file
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML configuration: {0}")]
    ParseError(#[from] serde_yaml::Error),

    /// Configuration validation error
    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] validator::ValidationErrors),

    /// Environment variable parsing error
    #[error("Failed to parse environment variable '{var}': {source}")]
    EnvParseError {
        var: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl From<ConfigError> for vitals_common::VitalsError {
    fn from(err: ConfigError) -> Self {
        vitals_common::VitalsError::config(err.to_string())
    }
}

/// Configuration loader for the application
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a YAML file with environment variable overrides
    pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Settings, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let mut settings: Settings = serde_yaml::from_str(&content)?;

        Self::apply_env_overrides(&mut settings)?;
        settings.validate_all().map_err(ConfigError::ValidationError)?;

        Ok(settings)
    }

    /// Load configuration from environment variables and files
    pub fn load() -> VitalsResult<Settings> {
        let settings = if let Ok(config_path) = env::var("VITALS_CONFIG_PATH") {
            Self::load_config(&config_path)?
        } else if Path::new("config.yaml").exists() {
            Self::load_config("config.yaml")?
        } else if Path::new("config.yml").exists() {
            Self::load_config("config.yml")?
        } else {
            // No config file found, use defaults with env overrides
            let mut settings = Settings::default();
            Self::apply_env_overrides(&mut settings)?;
            settings.validate_all().map_err(ConfigError::ValidationError)?;
            settings
        };

        Ok(settings)
    }

    /// Load configuration from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> VitalsResult<Settings> {
        Ok(Self::load_config(path)?)
    }

    /// Apply environment variable overrides to configuration
    fn apply_env_overrides(settings: &mut Settings) -> Result<(), ConfigError> {
        if let Ok(timezone) = env::var("VITALS_TIMEZONE") {
            settings.reporting.timezone = timezone;
        }

        if let Ok(fill) = env::var("VITALS_FILL_EMPTY_BUCKETS") {
            settings.reporting.fill_empty_buckets =
                fill.parse().map_err(|e| ConfigError::EnvParseError {
                    var: "VITALS_FILL_EMPTY_BUCKETS".to_string(),
                    source: Box::new(e),
                })?;
        }

        if let Ok(days) = env::var("VITALS_TREND_WINDOW_DAYS") {
            settings.reporting.trend_window_days =
                days.parse().map_err(|e| ConfigError::EnvParseError {
                    var: "VITALS_TREND_WINDOW_DAYS".to_string(),
                    source: Box::new(e),
                })?;
        }

        if let Ok(page_size) = env::var("VITALS_DEFAULT_PAGE_SIZE") {
            settings.store.default_page_size =
                page_size.parse().map_err(|e| ConfigError::EnvParseError {
                    var: "VITALS_DEFAULT_PAGE_SIZE".to_string(),
                    source: Box::new(e),
                })?;
        }

        if let Ok(capacity) = env::var("VITALS_CACHE_CAPACITY") {
            settings.store.cache_capacity =
                capacity.parse().map_err(|e| ConfigError::EnvParseError {
                    var: "VITALS_CACHE_CAPACITY".to_string(),
                    source: Box::new(e),
                })?;
        }

        if let Ok(ttl) = env::var("VITALS_CACHE_TTL_SECONDS") {
            settings.store.cache_ttl_seconds =
                ttl.parse().map_err(|e| ConfigError::EnvParseError {
                    var: "VITALS_CACHE_TTL_SECONDS".to_string(),
                    source: Box::new(e),
                })?;
        }

        if let Ok(level) = env::var("VITALS_LOG_LEVEL") {
            settings.logging.level = level;
        }

        if let Ok(file) = env::var("VITALS_LOG_FILE") {
            settings.logging.file = Some(file);
        }

        Ok(())
    }
}
