use serde::Serialize;

/// Read-only aggregates over the finish times of one event.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Statistics {
    pub count: i64,
    pub mean_ms: Option<f64>,
    pub min_ms: Option<i64>,
    pub max_ms: Option<i64>,
    /// Sample standard deviation; `None` below two records.
    pub stddev_ms: Option<f64>,
    pub median_ms: Option<f64>,
    pub p25_ms: Option<f64>,
    pub p75_ms: Option<f64>,
    pub histogram: Vec<HistogramBucket>,
    pub last_recorded_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistogramBucket {
    /// Lower bound of the bucket, in minutes of elapsed time.
    pub from_minute: i64,
    pub count: i64,
}
