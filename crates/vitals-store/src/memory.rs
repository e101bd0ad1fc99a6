//! In-memory metric store.

use crate::traits::{MetricRecord, MetricStore, MetricUpdate, NewMetric};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::debug;
use vitals_common::{new_metric_id, now, MetricId, Result, Timestamp, UserId};
use vitals_engine::{MetricSample, MetricType};

/// Metric store backed by a process-local map, keyed by user.
///
/// Suitable for tests and single-process deployments; all operations are
/// linear in the owning user's record count.
#[derive(Debug, Default)]
pub struct InMemoryMetricStore {
    records: RwLock<HashMap<UserId, Vec<MetricRecord>>>,
}

impl InMemoryMetricStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records across all users.
    pub fn len(&self) -> usize {
        self.records.read().values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl MetricStore for InMemoryMetricStore {
    async fn insert(&self, user_id: UserId, metric: NewMetric) -> Result<MetricRecord> {
        let created = now();
        let record = MetricRecord {
            id: new_metric_id(),
            user_id,
            sample: MetricSample {
                metric_type: metric.metric_type,
                value: metric.value,
                unit: metric.unit,
                recorded_at: metric.recorded_at,
                source: metric.source,
            },
            notes: metric.notes,
            created_at: created,
            updated_at: created,
        };

        self.records
            .write()
            .entry(user_id)
            .or_default()
            .push(record.clone());

        debug!(%user_id, metric_type = %record.sample.metric_type, "inserted metric record");
        Ok(record)
    }

    async fn get(&self, id: MetricId) -> Result<Option<MetricRecord>> {
        let records = self.records.read();
        Ok(records
            .values()
            .flat_map(|user_records| user_records.iter())
            .find(|record| record.id == id)
            .cloned())
    }

    async fn update(&self, id: MetricId, update: MetricUpdate) -> Result<Option<MetricRecord>> {
        let mut records = self.records.write();
        for user_records in records.values_mut() {
            if let Some(record) = user_records.iter_mut().find(|record| record.id == id) {
                if let Some(value) = update.value {
                    record.sample.value = value;
                }
                if let Some(unit) = update.unit {
                    record.sample.unit = unit;
                }
                if let Some(recorded_at) = update.recorded_at {
                    record.sample.recorded_at = recorded_at;
                }
                if let Some(source) = update.source {
                    record.sample.source = source;
                }
                if let Some(notes) = update.notes {
                    record.notes = Some(notes);
                }
                record.updated_at = now();
                return Ok(Some(record.clone()));
            }
        }
        Ok(None)
    }

    async fn delete(&self, id: MetricId) -> Result<bool> {
        let mut records = self.records.write();
        for user_records in records.values_mut() {
            if let Some(position) = user_records.iter().position(|record| record.id == id) {
                user_records.remove(position);
                return Ok(true);
            }
        }
        Ok(false)
    }

    async fn list(
        &self,
        user_id: UserId,
        metric_type: MetricType,
        skip: usize,
        limit: usize,
    ) -> Result<(usize, Vec<MetricRecord>)> {
        let records = self.records.read();
        let mut matching: Vec<MetricRecord> = records
            .get(&user_id)
            .map(|user_records| {
                user_records
                    .iter()
                    .filter(|record| record.sample.metric_type == metric_type)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        let total = matching.len();
        matching.sort_by(|a, b| b.sample.recorded_at.cmp(&a.sample.recorded_at));
        let page = matching.into_iter().skip(skip).take(limit).collect();
        Ok((total, page))
    }

    async fn list_range(
        &self,
        user_id: UserId,
        metric_type: MetricType,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<Vec<MetricRecord>> {
        let records = self.records.read();
        let mut matching: Vec<MetricRecord> = records
            .get(&user_id)
            .map(|user_records| {
                user_records
                    .iter()
                    .filter(|record| {
                        record.sample.metric_type == metric_type
                            && record.sample.recorded_at >= start
                            && record.sample.recorded_at <= end
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        matching.sort_by(|a, b| a.sample.recorded_at.cmp(&b.sample.recorded_at));
        Ok(matching)
    }

    async fn latest(
        &self,
        user_id: UserId,
        metric_type: MetricType,
    ) -> Result<Option<MetricRecord>> {
        let records = self.records.read();
        Ok(records
            .get(&user_id)
            .and_then(|user_records| {
                user_records
                    .iter()
                    .filter(|record| record.sample.metric_type == metric_type)
                    .max_by_key(|record| record.sample.recorded_at)
            })
            .cloned())
    }
}
