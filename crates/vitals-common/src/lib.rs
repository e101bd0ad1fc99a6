//! # Vitals Common
//!
//! Shared types, errors and utilities for the vitals workspace.
//!
//! This crate provides the foundational types used across all other
//! crates: entity identifiers, the application-wide error type and the
//! tracing-based logging bootstrap.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod logging;
pub mod types;
pub mod utils;

pub use error::{Result, VitalsError};
pub use types::*;
pub use utils::*;
