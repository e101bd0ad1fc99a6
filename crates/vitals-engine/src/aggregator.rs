//! Calendar-period aggregation of metric samples.
//!
//! Samples are grouped by their local calendar date in the reporting
//! timezone, aligned to the requested period (day, Monday-start week, or
//! calendar month), then reduced to per-bucket summary statistics. The
//! whole pipeline is a pure function of its inputs.

use crate::error::EngineError;
use crate::types::{AggregationBucket, DateRange, Granularity, MetricSample};
use chrono::{Datelike, Duration, NaiveDate};
use chrono_tz::Tz;
use std::collections::BTreeMap;
use tracing::{debug, instrument};

/// Options controlling bucket boundary placement and gap handling.
#[derive(Debug, Clone)]
pub struct AggregateOptions {
    /// Reporting timezone bucket boundaries are aligned to.
    pub timezone: Tz,
    /// Emit zeroed buckets for periods without samples instead of
    /// omitting them. Off by default.
    pub fill_empty: bool,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            timezone: chrono_tz::UTC,
            fill_empty: false,
        }
    }
}

/// Summary statistics over a set of raw sample values.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    pub sum: f64,
    pub count: usize,
}

/// Reduce raw values to summary statistics. Returns `None` for empty input.
///
/// Median is the standard one: the mean of the two middle values for even
/// counts.
pub fn summarize(values: &[f64]) -> Option<SummaryStats> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let count = sorted.len();
    let min = sorted[0];
    let max = sorted[count - 1];
    let sum: f64 = sorted.iter().sum();
    let mean = sum / count as f64;

    let median = if count % 2 == 0 {
        (sorted[count / 2 - 1] + sorted[count / 2]) / 2.0
    } else {
        sorted[count / 2]
    };

    Some(SummaryStats {
        min,
        max,
        mean,
        median,
        sum,
        count,
    })
}

/// Align a date to the start of its period.
///
/// Weeks start on Monday; months on the first.
pub fn period_start(date: NaiveDate, granularity: Granularity) -> NaiveDate {
    match granularity {
        Granularity::Daily => date,
        Granularity::Weekly => {
            date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
        }
        Granularity::Monthly => {
            NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date)
        }
    }
}

/// Exclusive end of the period beginning at `start`, i.e. the start of the
/// next period.
pub fn period_end(start: NaiveDate, granularity: Granularity) -> NaiveDate {
    match granularity {
        Granularity::Daily => start + Duration::days(1),
        Granularity::Weekly => start + Duration::days(7),
        Granularity::Monthly => {
            let (year, month) = if start.month() == 12 {
                (start.year() + 1, 1)
            } else {
                (start.year(), start.month() + 1)
            };
            NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(start)
        }
    }
}

/// Bucket samples into calendar periods and compute per-bucket statistics.
///
/// Input samples are expected to be pre-scoped to one user and metric type
/// by the store; the engine only re-checks the local-date window. Output is
/// ascending by `period_start` with one bucket per period containing at
/// least one sample (unless `fill_empty` is set). Empty input yields an
/// empty sequence, not an error.
#[instrument(skip(samples, options), fields(samples = samples.len()))]
pub fn aggregate(
    samples: &[MetricSample],
    range: DateRange,
    granularity: Granularity,
    options: &AggregateOptions,
) -> Result<Vec<AggregationBucket>, EngineError> {
    // DateRange::new validates, but the fields are public; re-check so the
    // contract holds for any caller.
    if range.start > range.end {
        return Err(EngineError::InvalidRange {
            start: range.start,
            end: range.end,
        });
    }

    let mut periods: BTreeMap<NaiveDate, Vec<f64>> = BTreeMap::new();

    for sample in samples {
        let local_date = sample
            .recorded_at
            .with_timezone(&options.timezone)
            .date_naive();
        if !range.contains(local_date) {
            continue;
        }
        periods
            .entry(period_start(local_date, granularity))
            .or_default()
            .push(sample.value);
    }

    if options.fill_empty {
        let last = period_start(range.end, granularity);
        let mut cursor = period_start(range.start, granularity);
        while cursor <= last {
            periods.entry(cursor).or_default();
            cursor = period_end(cursor, granularity);
        }
    }

    let buckets: Vec<AggregationBucket> = periods
        .into_iter()
        .map(|(start, values)| {
            let end = period_end(start, granularity);
            match summarize(&values) {
                Some(stats) => AggregationBucket {
                    period_start: start,
                    period_end: end,
                    min: stats.min,
                    max: stats.max,
                    avg: stats.mean,
                    median: stats.median,
                    sample_count: stats.count,
                },
                // Only reachable with fill_empty set.
                None => AggregationBucket {
                    period_start: start,
                    period_end: end,
                    min: 0.0,
                    max: 0.0,
                    avg: 0.0,
                    median: 0.0,
                    sample_count: 0,
                },
            }
        })
        .collect();

    debug!(buckets = buckets.len(), %granularity, "aggregated samples into buckets");
    Ok(buckets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MetricType;
    use chrono::{TimeZone, Utc};

    fn sample(rfc3339: &str, value: f64) -> MetricSample {
        MetricSample {
            metric_type: MetricType::HeartRate,
            value,
            unit: "bpm".to_string(),
            recorded_at: rfc3339.parse().unwrap(),
            source: "device".to_string(),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_daily_buckets_worked_example() {
        // Two samples on Jan 1, one on Jan 2.
        let samples = vec![
            sample("2024-01-01T08:00:00Z", 70.0),
            sample("2024-01-01T20:00:00Z", 72.0),
            sample("2024-01-02T09:00:00Z", 68.0),
        ];
        let range = DateRange::new(date(2024, 1, 1), date(2024, 1, 2)).unwrap();

        let buckets = aggregate(
            &samples,
            range,
            Granularity::Daily,
            &AggregateOptions::default(),
        )
        .unwrap();

        assert_eq!(buckets.len(), 2);

        assert_eq!(buckets[0].period_start, date(2024, 1, 1));
        assert_eq!(buckets[0].period_end, date(2024, 1, 2));
        assert_eq!(buckets[0].min, 70.0);
        assert_eq!(buckets[0].max, 72.0);
        assert_eq!(buckets[0].avg, 71.0);
        assert_eq!(buckets[0].median, 71.0);
        assert_eq!(buckets[0].sample_count, 2);

        assert_eq!(buckets[1].period_start, date(2024, 1, 2));
        assert_eq!(buckets[1].min, 68.0);
        assert_eq!(buckets[1].max, 68.0);
        assert_eq!(buckets[1].avg, 68.0);
        assert_eq!(buckets[1].median, 68.0);
        assert_eq!(buckets[1].sample_count, 1);
    }

    #[test]
    fn test_weekly_buckets_align_to_monday() {
        // 2024-01-03 is a Wednesday; its week starts Monday 2024-01-01.
        // 2024-01-08 is the following Monday.
        let samples = vec![
            sample("2024-01-03T12:00:00Z", 10.0),
            sample("2024-01-07T12:00:00Z", 20.0),
            sample("2024-01-08T12:00:00Z", 30.0),
        ];
        let range = DateRange::new(date(2024, 1, 1), date(2024, 1, 14)).unwrap();

        let buckets = aggregate(
            &samples,
            range,
            Granularity::Weekly,
            &AggregateOptions::default(),
        )
        .unwrap();

        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].period_start, date(2024, 1, 1));
        assert_eq!(buckets[0].period_end, date(2024, 1, 8));
        assert_eq!(buckets[0].sample_count, 2);
        assert_eq!(buckets[1].period_start, date(2024, 1, 8));
        assert_eq!(buckets[1].period_end, date(2024, 1, 15));
        assert_eq!(buckets[1].sample_count, 1);
    }

    #[test]
    fn test_monthly_buckets_align_to_calendar_months() {
        let samples = vec![
            sample("2023-12-15T12:00:00Z", 1.0),
            sample("2023-12-31T23:00:00Z", 2.0),
            sample("2024-01-01T00:30:00Z", 3.0),
        ];
        let range = DateRange::new(date(2023, 12, 1), date(2024, 1, 31)).unwrap();

        let buckets = aggregate(
            &samples,
            range,
            Granularity::Monthly,
            &AggregateOptions::default(),
        )
        .unwrap();

        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].period_start, date(2023, 12, 1));
        assert_eq!(buckets[0].period_end, date(2024, 1, 1));
        assert_eq!(buckets[0].sample_count, 2);
        assert_eq!(buckets[1].period_start, date(2024, 1, 1));
        assert_eq!(buckets[1].period_end, date(2024, 2, 1));
        assert_eq!(buckets[1].sample_count, 1);
    }

    #[test]
    fn test_reporting_timezone_shifts_bucket_date() {
        // 2024-01-02T03:00 UTC is still Jan 1 in New York (UTC-5).
        let samples = vec![sample("2024-01-02T03:00:00Z", 50.0)];
        let range = DateRange::new(date(2024, 1, 1), date(2024, 1, 2)).unwrap();

        let utc = aggregate(
            &samples,
            range,
            Granularity::Daily,
            &AggregateOptions::default(),
        )
        .unwrap();
        assert_eq!(utc[0].period_start, date(2024, 1, 2));

        let ny = aggregate(
            &samples,
            range,
            Granularity::Daily,
            &AggregateOptions {
                timezone: chrono_tz::America::New_York,
                fill_empty: false,
            },
        )
        .unwrap();
        assert_eq!(ny[0].period_start, date(2024, 1, 1));
    }

    #[test]
    fn test_single_day_range() {
        let samples = vec![sample("2024-03-05T10:00:00Z", 42.0)];
        let range = DateRange::new(date(2024, 3, 5), date(2024, 3, 5)).unwrap();

        let buckets = aggregate(
            &samples,
            range,
            Granularity::Daily,
            &AggregateOptions::default(),
        )
        .unwrap();

        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].period_start, date(2024, 3, 5));
        assert_eq!(buckets[0].sample_count, 1);
    }

    #[test]
    fn test_invalid_range_rejected_for_all_granularities() {
        let range = DateRange {
            start: date(2024, 2, 1),
            end: date(2024, 1, 1),
        };
        for granularity in [Granularity::Daily, Granularity::Weekly, Granularity::Monthly] {
            let err = aggregate(&[], range, granularity, &AggregateOptions::default())
                .unwrap_err();
            assert!(matches!(err, EngineError::InvalidRange { .. }));
        }
    }

    #[test]
    fn test_empty_input_yields_empty_output() {
        let range = DateRange::new(date(2024, 1, 1), date(2024, 1, 31)).unwrap();
        let buckets = aggregate(
            &[],
            range,
            Granularity::Daily,
            &AggregateOptions::default(),
        )
        .unwrap();
        assert!(buckets.is_empty());
    }

    #[test]
    fn test_samples_outside_range_are_skipped() {
        let samples = vec![
            sample("2023-12-31T12:00:00Z", 1.0),
            sample("2024-01-15T12:00:00Z", 2.0),
            sample("2024-02-01T12:00:00Z", 3.0),
        ];
        let range = DateRange::new(date(2024, 1, 1), date(2024, 1, 31)).unwrap();

        let buckets = aggregate(
            &samples,
            range,
            Granularity::Monthly,
            &AggregateOptions::default(),
        )
        .unwrap();

        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].sample_count, 1);
        assert_eq!(buckets[0].min, 2.0);
    }

    #[test]
    fn test_bucketing_is_a_partition() {
        // Every in-range sample lands in exactly one bucket.
        let samples: Vec<MetricSample> = (0..40)
            .map(|i| {
                let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
                    + Duration::hours(i * 13);
                MetricSample {
                    metric_type: MetricType::Steps,
                    value: i as f64,
                    unit: "count".to_string(),
                    recorded_at: ts,
                    source: "device".to_string(),
                }
            })
            .collect();
        let range = DateRange::new(date(2024, 1, 1), date(2024, 1, 31)).unwrap();

        let buckets = aggregate(
            &samples,
            range,
            Granularity::Weekly,
            &AggregateOptions::default(),
        )
        .unwrap();

        let total: usize = buckets.iter().map(|b| b.sample_count).sum();
        assert_eq!(total, samples.len());

        // Disjoint, ascending periods.
        for pair in buckets.windows(2) {
            assert!(pair[0].period_end <= pair[1].period_start);
            assert!(pair[0].period_start < pair[1].period_start);
        }
    }

    #[test]
    fn test_stat_ordering_invariants() {
        let samples = vec![
            sample("2024-01-01T01:00:00Z", 3.0),
            sample("2024-01-01T02:00:00Z", 9.0),
            sample("2024-01-01T03:00:00Z", 4.0),
            sample("2024-01-01T04:00:00Z", 7.0),
        ];
        let range = DateRange::new(date(2024, 1, 1), date(2024, 1, 1)).unwrap();

        let buckets = aggregate(
            &samples,
            range,
            Granularity::Daily,
            &AggregateOptions::default(),
        )
        .unwrap();

        let b = &buckets[0];
        assert!(b.min <= b.avg && b.avg <= b.max);
        assert!(b.min <= b.median && b.median <= b.max);
        assert_eq!(b.median, (4.0 + 7.0) / 2.0);
    }

    #[test]
    fn test_fill_empty_emits_zeroed_buckets() {
        let samples = vec![sample("2024-01-02T12:00:00Z", 5.0)];
        let range = DateRange::new(date(2024, 1, 1), date(2024, 1, 3)).unwrap();

        let buckets = aggregate(
            &samples,
            range,
            Granularity::Daily,
            &AggregateOptions {
                timezone: chrono_tz::UTC,
                fill_empty: true,
            },
        )
        .unwrap();

        assert_eq!(buckets.len(), 3);
        assert_eq!(buckets[0].sample_count, 0);
        assert_eq!(buckets[0].avg, 0.0);
        assert_eq!(buckets[1].sample_count, 1);
        assert_eq!(buckets[2].sample_count, 0);
    }

    #[test]
    fn test_aggregation_is_idempotent() {
        let samples = vec![
            sample("2024-01-01T08:00:00Z", 70.0),
            sample("2024-01-02T09:00:00Z", 68.0),
        ];
        let range = DateRange::new(date(2024, 1, 1), date(2024, 1, 2)).unwrap();
        let options = AggregateOptions::default();

        let first = aggregate(&samples, range, Granularity::Daily, &options).unwrap();
        let second = aggregate(&samples, range, Granularity::Daily, &options).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_summarize_empty_is_none() {
        assert!(summarize(&[]).is_none());
    }

    #[test]
    fn test_summarize_odd_median() {
        let stats = summarize(&[5.0, 1.0, 3.0]).unwrap();
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 5.0);
        assert_eq!(stats.mean, 3.0);
        assert_eq!(stats.median, 3.0);
        assert_eq!(stats.count, 3);
    }
}
