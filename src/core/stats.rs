//! Aggregates over the finish times of an event.

use crate::db::pool::DbPool;
use crate::db::queries;
use crate::errors::{AppError, AppResult};
use crate::models::stats::{HistogramBucket, Statistics};
use std::collections::BTreeMap;

/// Continuous percentile of sorted values, interpolating linearly between
/// the two closest ranks.
fn percentile(sorted: &[i64], fraction: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    let pos = fraction * last as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let weight = pos - lower as f64;
    Some(sorted[lower] as f64 + (sorted[upper] - sorted[lower]) as f64 * weight)
}

fn histogram(sorted: &[i64], bucket_minutes: u32) -> Vec<HistogramBucket> {
    let minutes = i64::from(bucket_minutes.max(1));
    let width_ms = minutes * 60_000;

    let mut buckets: BTreeMap<i64, i64> = BTreeMap::new();
    for ms in sorted {
        *buckets.entry(ms / width_ms * minutes).or_default() += 1;
    }

    buckets
        .into_iter()
        .map(|(from_minute, count)| HistogramBucket { from_minute, count })
        .collect()
}

pub struct StatsLogic;

impl StatsLogic {
    /// Pure computation over elapsed times (any order).
    pub fn compute(times: &[i64], bucket_minutes: u32) -> Statistics {
        if times.is_empty() {
            return Statistics::default();
        }

        let mut sorted = times.to_vec();
        sorted.sort_unstable();

        let count = sorted.len();
        let mean = sorted.iter().map(|&t| t as f64).sum::<f64>() / count as f64;

        let stddev = (count >= 2).then(|| {
            let sq: f64 = sorted.iter().map(|&t| (t as f64 - mean).powi(2)).sum();
            (sq / (count - 1) as f64).sqrt()
        });

        Statistics {
            count: count as i64,
            mean_ms: Some(mean),
            min_ms: sorted.first().copied(),
            max_ms: sorted.last().copied(),
            stddev_ms: stddev,
            median_ms: percentile(&sorted, 0.5),
            p25_ms: percentile(&sorted, 0.25),
            p75_ms: percentile(&sorted, 0.75),
            histogram: histogram(&sorted, bucket_minutes),
            last_recorded_at: None,
        }
    }

    pub fn for_event(pool: &DbPool, event_id: i64, bucket_minutes: u32) -> AppResult<Statistics> {
        if !queries::event_exists(&pool.conn, event_id)? {
            return Err(AppError::EventNotFound(event_id));
        }

        let (times, last) = queries::load_elapsed_sorted(&pool.conn, event_id)?;
        let mut stats = Self::compute(&times, bucket_minutes);
        stats.last_recorded_at = last;
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_set_has_no_aggregates() {
        let s = StatsLogic::compute(&[], 5);
        assert_eq!(s, Statistics::default());
        assert!(s.histogram.is_empty());
    }

    #[test]
    fn single_value_has_no_stddev() {
        let s = StatsLogic::compute(&[60_000], 5);
        assert_eq!(s.count, 1);
        assert_eq!(s.stddev_ms, None);
        assert_eq!(s.median_ms, Some(60_000.0));
        assert_eq!(s.p25_ms, Some(60_000.0));
    }

    #[test]
    fn percentiles_interpolate() {
        let s = StatsLogic::compute(&[4_000, 1_000, 3_000, 2_000], 5);
        assert_eq!(s.min_ms, Some(1_000));
        assert_eq!(s.max_ms, Some(4_000));
        assert_eq!(s.mean_ms, Some(2_500.0));
        assert_eq!(s.median_ms, Some(2_500.0));
        assert_eq!(s.p25_ms, Some(1_750.0));
        assert_eq!(s.p75_ms, Some(3_250.0));

        let sd = s.stddev_ms.unwrap();
        assert!((sd - 1_290.994_448_735_805_6).abs() < 1e-6);
    }

    #[test]
    fn histogram_buckets_by_lower_bound() {
        // 2:00:00, 2:01:00, 2:02:00 and 2:07:30
        let s = StatsLogic::compute(&[7_200_000, 7_260_000, 7_320_000, 7_650_000], 5);
        assert_eq!(
            s.histogram,
            vec![
                HistogramBucket {
                    from_minute: 120,
                    count: 3
                },
                HistogramBucket {
                    from_minute: 125,
                    count: 1
                },
            ]
        );
    }
}
