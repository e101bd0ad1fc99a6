//! # Vitals Config
//!
//! Typed application settings for the vitals workspace: serde structs with
//! validator-backed field checks, loaded from YAML with environment
//! variable overrides.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod loader;
pub mod settings;
pub mod validation;

pub use loader::{ConfigError, ConfigLoader};
pub use settings::{LoggingSettings, ReportingConfig, Settings, StoreConfig};
