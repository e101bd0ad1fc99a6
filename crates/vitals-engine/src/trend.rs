//! Period-over-period trend computation.

use crate::error::EngineError;
use crate::types::{AggregationBucket, TrendPoint};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Direction of trend movement, classified from a percentage change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
    Neutral,
}

impl TrendDirection {
    /// Classify a percentage change. Changes within ±5% count as neutral.
    pub fn from_change_percent(change_percent: f64) -> Self {
        if change_percent > 5.0 {
            Self::Up
        } else if change_percent < -5.0 {
            Self::Down
        } else {
            Self::Neutral
        }
    }
}

/// Reduce buckets to one representative `(period_start, value)` pair each,
/// using the bucket average.
pub fn representative_values(buckets: &[AggregationBucket]) -> Vec<(NaiveDate, f64)> {
    buckets
        .iter()
        .map(|bucket| (bucket.period_start, bucket.avg))
        .collect()
}

/// Compute period-over-period percentage change across an ordered series.
///
/// Input must be strictly ascending by date; duplicates are rejected since a
/// period can appear only once in a series. The change for the first point
/// is always `None`, as is any change whose predecessor value is zero
/// (undefined ratio). Output length equals input length.
pub fn percent_changes(points: &[(NaiveDate, f64)]) -> Result<Vec<TrendPoint>, EngineError> {
    for (index, pair) in points.windows(2).enumerate() {
        if pair[1].0 <= pair[0].0 {
            return Err(EngineError::UnsortedSequence { index: index + 1 });
        }
    }

    let mut result = Vec::with_capacity(points.len());
    let mut previous: Option<f64> = None;

    for &(period_start, value) in points {
        let percent_change_from_previous = match previous {
            Some(prev) if prev != 0.0 => Some((value - prev) / prev * 100.0),
            _ => None,
        };
        result.push(TrendPoint {
            period_start,
            value,
            percent_change_from_previous,
        });
        previous = Some(value);
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_first_point_has_no_change() {
        let points = vec![(date(2024, 1, 1), 71.0)];
        let trend = percent_changes(&points).unwrap();

        assert_eq!(trend.len(), 1);
        assert_eq!(trend[0].value, 71.0);
        assert!(trend[0].percent_change_from_previous.is_none());
    }

    #[test]
    fn test_percent_change_worked_example() {
        let points = vec![(date(2024, 1, 1), 71.0), (date(2024, 1, 2), 68.0)];
        let trend = percent_changes(&points).unwrap();

        assert_eq!(trend.len(), 2);
        assert!(trend[0].percent_change_from_previous.is_none());

        let change = trend[1].percent_change_from_previous.unwrap();
        // (68 - 71) / 71 * 100
        assert!((change - (-4.225352112676056)).abs() < 1e-12);
    }

    #[test]
    fn test_zero_previous_value_yields_null() {
        let points = vec![(date(2024, 1, 1), 0.0), (date(2024, 1, 2), 5.0)];
        let trend = percent_changes(&points).unwrap();

        assert!(trend[1].percent_change_from_previous.is_none());
    }

    #[test]
    fn test_output_length_matches_input() {
        let points: Vec<(NaiveDate, f64)> = (1..=10)
            .map(|d| (date(2024, 1, d), d as f64))
            .collect();
        let trend = percent_changes(&points).unwrap();
        assert_eq!(trend.len(), points.len());
    }

    #[test]
    fn test_unsorted_input_rejected() {
        let points = vec![(date(2024, 1, 2), 1.0), (date(2024, 1, 1), 2.0)];
        let err = percent_changes(&points).unwrap_err();
        assert_eq!(err, EngineError::UnsortedSequence { index: 1 });
    }

    #[test]
    fn test_duplicate_period_rejected() {
        let points = vec![(date(2024, 1, 1), 1.0), (date(2024, 1, 1), 2.0)];
        assert!(matches!(
            percent_changes(&points),
            Err(EngineError::UnsortedSequence { index: 1 })
        ));
    }

    #[test]
    fn test_empty_input_yields_empty_output() {
        let trend = percent_changes(&[]).unwrap();
        assert!(trend.is_empty());
    }

    #[test]
    fn test_representative_values_use_bucket_average() {
        let buckets = vec![AggregationBucket {
            period_start: date(2024, 1, 1),
            period_end: date(2024, 1, 2),
            min: 70.0,
            max: 72.0,
            avg: 71.0,
            median: 71.0,
            sample_count: 2,
        }];
        let values = representative_values(&buckets);
        assert_eq!(values, vec![(date(2024, 1, 1), 71.0)]);
    }

    #[test]
    fn test_direction_thresholds() {
        assert_eq!(
            TrendDirection::from_change_percent(10.0),
            TrendDirection::Up
        );
        assert_eq!(
            TrendDirection::from_change_percent(-10.0),
            TrendDirection::Down
        );
        assert_eq!(
            TrendDirection::from_change_percent(5.0),
            TrendDirection::Neutral
        );
        assert_eq!(
            TrendDirection::from_change_percent(-5.0),
            TrendDirection::Neutral
        );
        assert_eq!(
            TrendDirection::from_change_percent(0.0),
            TrendDirection::Neutral
        );
    }
}
