//! # Vitals Engine
//!
//! Pure aggregation and trend computation over health metric samples.
//!
//! The engine consumes already-materialized, time-ordered samples (supplied
//! by a metric store) and produces calendar-bucketed statistical summaries
//! and period-over-period trend series. It performs no I/O, holds no shared
//! state and is safe to call concurrently from independent requests.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod aggregator;
pub mod error;
pub mod score;
pub mod trend;
pub mod types;
pub mod units;

pub use aggregator::{aggregate, AggregateOptions, SummaryStats};
pub use error::EngineError;
pub use score::{average_score, health_score, ActivityTotals};
pub use trend::{percent_changes, representative_values, TrendDirection};
pub use types::*;
