//! Storage trait and record types for metric persistence.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use vitals_common::{MetricId, Result, Timestamp, UserId};
use vitals_engine::{MetricSample, MetricType};

/// A stored metric measurement, owned by a single user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    pub id: MetricId,
    pub user_id: UserId,
    #[serde(flatten)]
    pub sample: MetricSample,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Input for creating a metric record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMetric {
    pub metric_type: MetricType,
    pub value: f64,
    pub unit: String,
    pub recorded_at: Timestamp,
    pub source: String,
    pub notes: Option<String>,
}

/// Partial update for a metric record. Only set fields are applied.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricUpdate {
    pub value: Option<f64>,
    pub unit: Option<String>,
    pub recorded_at: Option<Timestamp>,
    pub source: Option<String>,
    pub notes: Option<String>,
}

/// Persistence seam for metric records.
///
/// `list_range` is the aggregation engine's feed: it must return records
/// already scoped to the user, type and time window, ordered ascending by
/// `recorded_at`. `list` is the paginated listing used by read endpoints
/// and returns newest-first.
#[async_trait]
pub trait MetricStore: Send + Sync {
    /// Persist a new metric record for a user.
    async fn insert(&self, user_id: UserId, metric: NewMetric) -> Result<MetricRecord>;

    /// Fetch a record by ID.
    async fn get(&self, id: MetricId) -> Result<Option<MetricRecord>>;

    /// Apply a partial update. Returns the updated record, or `None` if the
    /// ID does not exist.
    async fn update(&self, id: MetricId, update: MetricUpdate) -> Result<Option<MetricRecord>>;

    /// Delete a record. Returns whether anything was removed.
    async fn delete(&self, id: MetricId) -> Result<bool>;

    /// Paginated listing of a user's records of one type, newest first.
    /// Returns the total match count alongside the page.
    async fn list(
        &self,
        user_id: UserId,
        metric_type: MetricType,
        skip: usize,
        limit: usize,
    ) -> Result<(usize, Vec<MetricRecord>)>;

    /// Time-window read feeding the aggregation engine: records with
    /// `recorded_at` in `[start, end]`, ascending by `recorded_at`.
    async fn list_range(
        &self,
        user_id: UserId,
        metric_type: MetricType,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<Vec<MetricRecord>>;

    /// Most recent record of a type for a user.
    async fn latest(&self, user_id: UserId, metric_type: MetricType)
        -> Result<Option<MetricRecord>>;
}
