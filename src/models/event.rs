use super::event_status::EventStatus;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// One timed session (a race).
#[derive(Debug, Clone, Serialize)]
pub struct Event {
    pub id: i64,
    pub name: String,
    pub start_instant: Option<DateTime<Utc>>, // ⇔ events.start_instant (TEXT, RFC 3339)
    pub status: EventStatus,                  // ⇔ events.status ('active' | 'closed')
    pub note: Option<String>,
    pub created_at: String, // ⇔ events.created_at (TEXT, RFC 3339 UTC, µs)
    pub updated_at: String,
}

/// Event row plus the aggregates shown by `event list` / `event show`.
#[derive(Debug, Clone, Serialize)]
pub struct EventSummary {
    #[serde(flatten)]
    pub event: Event,
    pub participants: i64,
    pub mean_ms: Option<f64>,
    pub best_ms: Option<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct NewEvent {
    pub name: String,
    pub start_instant: Option<DateTime<Utc>>,
    pub note: Option<String>,
}

/// Partial update of an event. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct EventUpdate {
    pub name: Option<String>,
    pub start_instant: Option<DateTime<Utc>>,
    pub clear_start: bool,
    /// An empty note clears it.
    pub note: Option<String>,
    pub status: Option<EventStatus>,
}
