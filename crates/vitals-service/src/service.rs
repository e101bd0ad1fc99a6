//! Metric service: the operations an API handler layer calls into.

use crate::cache::AggregationCache;
use chrono::{Duration, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration as StdDuration;
use tracing::{debug, instrument};
use vitals_common::{MetricId, Result, Timestamp, UserId, VitalsError};
use vitals_config::{ReportingConfig, Settings};
use vitals_engine::{
    aggregate, percent_changes, representative_values, units, AggregateOptions,
    AggregationBucket, ActivityTotals, DateRange, Granularity, MetricSample, MetricType,
    TrendDirection, TrendPoint,
};
use vitals_store::{MetricRecord, MetricStore, MetricUpdate, NewMetric};

/// Trend report for one metric type over a comparison window.
///
/// Mirrors the aggregation wire contract: undefined values are emitted as
/// JSON `null`, never omitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendReport {
    pub current_value: Option<f64>,
    pub current_unit: Option<String>,
    pub change_percent: Option<f64>,
    pub direction: TrendDirection,
    pub data_points: Vec<TrendPoint>,
}

impl TrendReport {
    fn no_data() -> Self {
        Self {
            current_value: None,
            current_unit: None,
            change_percent: None,
            direction: TrendDirection::Neutral,
            data_points: Vec::new(),
        }
    }
}

/// Service layer over a metric store and the aggregation engine.
pub struct MetricService<S: MetricStore> {
    store: Arc<S>,
    reporting: ReportingConfig,
    fill_empty: bool,
    cache: AggregationCache,
}

impl<S: MetricStore> MetricService<S> {
    /// Build a service from a store and validated settings.
    pub fn new(store: Arc<S>, settings: &Settings) -> Self {
        Self {
            store,
            reporting: settings.reporting.clone(),
            fill_empty: settings.reporting.fill_empty_buckets,
            cache: AggregationCache::new(
                settings.store.cache_capacity,
                StdDuration::from_secs(settings.store.cache_ttl_seconds),
            ),
        }
    }

    /// Record a new measurement. The value is normalized to the metric's
    /// canonical unit before storage.
    #[instrument(skip(self, metric), fields(metric_type = %metric.metric_type))]
    pub async fn record(&self, user_id: UserId, mut metric: NewMetric) -> Result<MetricRecord> {
        let unit = vitals_common::validate_non_empty(&metric.unit, "unit")?;
        let value = units::to_canonical(metric.metric_type, metric.value, &unit)
            .ok_or_else(|| {
                VitalsError::validation_field(
                    format!("Unit '{}' is not valid for {}", unit, metric.metric_type),
                    "unit",
                )
            })?;

        metric.value = value;
        metric.unit = metric.metric_type.canonical_unit().to_string();

        let record = self.store.insert(user_id, metric).await?;
        self.cache.invalidate(user_id, record.sample.metric_type);
        Ok(record)
    }

    /// Fetch one record.
    pub async fn get_metric(&self, id: MetricId) -> Result<MetricRecord> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| VitalsError::not_found("metric", id))
    }

    /// Paginated listing, newest first. Returns `(total, page)`.
    pub async fn list_metrics(
        &self,
        user_id: UserId,
        metric_type: MetricType,
        skip: usize,
        limit: usize,
    ) -> Result<(usize, Vec<MetricRecord>)> {
        self.store.list(user_id, metric_type, skip, limit).await
    }

    /// Apply a partial update; value/unit changes re-run canonical
    /// normalization against the record's metric type.
    #[instrument(skip(self, update))]
    pub async fn update_metric(
        &self,
        id: MetricId,
        mut update: MetricUpdate,
    ) -> Result<MetricRecord> {
        let existing = self.get_metric(id).await?;
        let metric_type = existing.sample.metric_type;

        // A stored value is already canonical; reinterpreting it in a new
        // unit would silently rescale it.
        if update.unit.is_some() && update.value.is_none() {
            return Err(VitalsError::validation_field(
                "Changing the unit requires the value expressed in that unit",
                "unit",
            ));
        }

        if let Some(value) = update.value {
            let unit = update
                .unit
                .clone()
                .unwrap_or_else(|| existing.sample.unit.clone());
            let normalized = units::to_canonical(metric_type, value, &unit).ok_or_else(|| {
                VitalsError::validation_field(
                    format!("Unit '{}' is not valid for {}", unit, metric_type),
                    "unit",
                )
            })?;
            update.value = Some(normalized);
            update.unit = Some(metric_type.canonical_unit().to_string());
        }

        let updated = self
            .store
            .update(id, update)
            .await?
            .ok_or_else(|| VitalsError::not_found("metric", id))?;

        self.cache.invalidate(updated.user_id, metric_type);
        Ok(updated)
    }

    /// Delete one record.
    pub async fn delete_metric(&self, id: MetricId) -> Result<()> {
        let existing = self.get_metric(id).await?;
        if !self.store.delete(id).await? {
            return Err(VitalsError::not_found("metric", id));
        }
        self.cache
            .invalidate(existing.user_id, existing.sample.metric_type);
        Ok(())
    }

    /// Most recent measurement of a type.
    pub async fn latest(
        &self,
        user_id: UserId,
        metric_type: MetricType,
    ) -> Result<Option<MetricRecord>> {
        self.store.latest(user_id, metric_type).await
    }

    /// Bucketed statistics for a metric over an inclusive date range.
    ///
    /// Responses are cached; any write to the same (user, type) invalidates
    /// prior entries.
    #[instrument(skip(self))]
    pub async fn aggregate(
        &self,
        user_id: UserId,
        metric_type: MetricType,
        range: DateRange,
        granularity: Granularity,
    ) -> Result<Arc<Vec<AggregationBucket>>> {
        let key = self.cache.key(user_id, metric_type, range, granularity);
        if let Some(cached) = self.cache.get(&key).await {
            debug!("aggregation cache hit");
            return Ok(cached);
        }

        let (start, end) = self.window_utc(range)?;
        let records = self
            .store
            .list_range(user_id, metric_type, start, end)
            .await?;
        let samples: Vec<MetricSample> =
            records.into_iter().map(|record| record.sample).collect();

        let options = AggregateOptions {
            timezone: self.reporting.tz(),
            fill_empty: self.fill_empty,
        };
        let buckets = Arc::new(aggregate(&samples, range, granularity, &options)?);

        self.cache.put(key, Arc::clone(&buckets)).await;
        Ok(buckets)
    }

    /// Trend report comparing the current window against the previous one,
    /// with a daily data-point series for charting.
    #[instrument(skip(self))]
    pub async fn trend(
        &self,
        user_id: UserId,
        metric_type: MetricType,
        window_days: Option<u32>,
    ) -> Result<TrendReport> {
        let Some(current) = self.store.latest(user_id, metric_type).await? else {
            return Ok(TrendReport::no_data());
        };

        let days = i64::from(window_days.unwrap_or(self.reporting.trend_window_days)).max(1);
        let today = Utc::now().with_timezone(&self.reporting.tz()).date_naive();

        let current_range = DateRange::new(today - Duration::days(days - 1), today)?;
        let previous_range = DateRange::new(
            today - Duration::days(2 * days - 1),
            today - Duration::days(days),
        )?;

        let current_avg = self.window_average(user_id, metric_type, current_range).await?;
        let previous_avg = self
            .window_average(user_id, metric_type, previous_range)
            .await?;

        let change_percent = match (previous_avg, current_avg) {
            (Some(prev), Some(cur)) if prev != 0.0 => Some((cur - prev) / prev * 100.0),
            _ => None,
        };
        let direction = change_percent
            .map(TrendDirection::from_change_percent)
            .unwrap_or(TrendDirection::Neutral);

        let buckets = self
            .aggregate(user_id, metric_type, current_range, Granularity::Daily)
            .await?;
        let data_points = percent_changes(&representative_values(&buckets))?;

        Ok(TrendReport {
            current_value: Some(current.sample.value),
            current_unit: Some(current.sample.unit),
            change_percent,
            direction,
            data_points,
        })
    }

    /// Activity-derived health score over a trailing window: active minutes
    /// supply duration and session count, calories burned supply energy.
    pub async fn health_score(&self, user_id: UserId, window_days: Option<u32>) -> Result<f64> {
        let days = i64::from(window_days.unwrap_or(self.reporting.trend_window_days)).max(1);
        let today = Utc::now().with_timezone(&self.reporting.tz()).date_naive();
        let range = DateRange::new(today - Duration::days(days - 1), today)?;
        let (start, end) = self.window_utc(range)?;

        let sessions = self
            .store
            .list_range(user_id, MetricType::ActiveMinutes, start, end)
            .await?;
        let calories = self
            .store
            .list_range(user_id, MetricType::CaloriesBurned, start, end)
            .await?;

        let totals = ActivityTotals {
            total_duration_minutes: sessions.iter().map(|r| r.sample.value).sum(),
            total_calories: calories.iter().map(|r| r.sample.value).sum(),
            activity_count: sessions.len(),
        };
        Ok(vitals_engine::health_score(&totals))
    }

    /// Mean sample value over a local-date window; `None` when empty.
    async fn window_average(
        &self,
        user_id: UserId,
        metric_type: MetricType,
        range: DateRange,
    ) -> Result<Option<f64>> {
        let (start, end) = self.window_utc(range)?;
        let records = self
            .store
            .list_range(user_id, metric_type, start, end)
            .await?;
        if records.is_empty() {
            return Ok(None);
        }
        let sum: f64 = records.iter().map(|record| record.sample.value).sum();
        Ok(Some(sum / records.len() as f64))
    }

    /// UTC instants covering the local calendar range `[start, end]` in the
    /// reporting timezone.
    fn window_utc(&self, range: DateRange) -> Result<(Timestamp, Timestamp)> {
        let tz = self.reporting.tz();
        let start_local = range.start.and_time(NaiveTime::MIN);
        let end_local = (range.end + Duration::days(1)).and_time(NaiveTime::MIN);

        // DST gaps can make local midnight ambiguous or nonexistent; take
        // the earliest valid interpretation, falling back to treating the
        // wall time as UTC.
        let start = tz
            .from_local_datetime(&start_local)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|| Utc.from_utc_datetime(&start_local));
        let end = tz
            .from_local_datetime(&end_local)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|| Utc.from_utc_datetime(&end_local));

        Ok((start, end - Duration::nanoseconds(1)))
    }
}
