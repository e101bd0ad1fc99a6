//! # Vitals Store
//!
//! The metric storage collaborator: an async trait describing the reads and
//! writes the service layer needs, plus an in-memory implementation used in
//! tests and single-process deployments.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod memory;
pub mod traits;

pub use memory::InMemoryMetricStore;
pub use traits::{MetricRecord, MetricStore, MetricUpdate, NewMetric};
