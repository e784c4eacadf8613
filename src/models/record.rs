use chrono::{DateTime, Utc};
use serde::Serialize;

/// One arrival observation within an event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub id: i64,
    pub event_id: i64,
    pub bib: Option<String>,
    pub arrival_instant: DateTime<Utc>,
    /// Sort key. Immutable after insert.
    pub elapsed_ms: i64,
    pub rank: i64,
    pub gap_leader_ms: i64,
    pub gap_prev_ms: i64,
    pub note: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// A timing submission.
///
/// `elapsed_ms` may be omitted when the event has a start instant: it is
/// then derived as `arrival - start`. `arrival_instant` defaults to now.
#[derive(Debug, Clone, Default)]
pub struct NewRecord {
    pub bib: Option<String>,
    pub arrival_instant: Option<DateTime<Utc>>,
    pub elapsed_ms: Option<i64>,
    pub note: Option<String>,
}

impl NewRecord {
    pub fn with_elapsed(elapsed_ms: i64) -> Self {
        Self {
            elapsed_ms: Some(elapsed_ms),
            ..Self::default()
        }
    }

    pub fn bib(mut self, bib: &str) -> Self {
        self.bib = Some(bib.to_string());
        self
    }
}

/// A record in classification order, decorated from the bib list.
#[derive(Debug, Clone, Serialize)]
pub struct Standing {
    /// Position within the returned list (differs from `rank` when filtered).
    pub position: i64,
    #[serde(flatten)]
    pub record: Record,
    pub athlete_name: Option<String>,
    pub category: Option<String>,
    /// `arrival - event start`, when the event has a start instant.
    pub race_time_ms: Option<i64>,
}
