//! # Vitals Service
//!
//! Orchestration layer between the API handlers and the pure engine: CRUD
//! over the metric store with unit normalization, cached aggregation
//! queries and trend reports.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod cache;
pub mod service;

pub use cache::{AggregationCache, CacheKey};
pub use service::{MetricService, TrendReport};
