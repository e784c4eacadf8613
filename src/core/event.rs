use crate::core::record::RecordLogic;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries;
use crate::errors::{AppError, AppResult};
use crate::models::event::{Event, EventSummary, EventUpdate, NewEvent};
use crate::utils::time::now_rfc3339;

pub const MAX_EVENT_NAME_LEN: usize = 255;
pub const MAX_EVENT_NOTE_LEN: usize = 1000;

fn validate_name(name: &str) -> AppResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("event name cannot be empty".into()));
    }
    if name.chars().count() > MAX_EVENT_NAME_LEN {
        return Err(AppError::Validation(format!(
            "event name exceeds {MAX_EVENT_NAME_LEN} characters"
        )));
    }
    Ok(name.to_string())
}

fn validate_note(note: Option<&str>) -> AppResult<Option<String>> {
    let note = note.map(str::trim).filter(|n| !n.is_empty());
    if let Some(n) = note
        && n.chars().count() > MAX_EVENT_NOTE_LEN
    {
        return Err(AppError::Validation(format!(
            "event note exceeds {MAX_EVENT_NOTE_LEN} characters"
        )));
    }
    Ok(note.map(str::to_string))
}

pub struct EventLogic;

impl EventLogic {
    /// Create an event. While `max_events` or more exist, the oldest is
    /// deleted first, together with its records and bib list.
    pub fn create(pool: &mut DbPool, new: &NewEvent, max_events: u32) -> AppResult<Event> {
        let name = validate_name(&new.name)?;
        let note = validate_note(new.note.as_deref())?;

        pool.write(|tx| {
            while queries::count_events(tx)? >= i64::from(max_events) {
                let Some(oldest) = queries::oldest_event_id(tx)? else {
                    break;
                };
                queries::delete_event_cascade(tx, oldest)?;
                ttlog(
                    tx,
                    "evict",
                    &format!("event {oldest}"),
                    &format!("Oldest event removed (limit {max_events})"),
                )?;
                tracing::info!(event_id = oldest, max_events, "oldest event evicted");
            }

            let id = queries::insert_event(
                tx,
                &name,
                new.start_instant.as_ref(),
                note.as_deref(),
                &now_rfc3339(),
            )?;
            ttlog(tx, "add", &format!("event {id}"), &format!("Event '{name}' created"))?;

            queries::find_event(tx, id)?.ok_or(AppError::EventNotFound(id))
        })
    }

    /// Event with participant count, mean and best time.
    pub fn get(pool: &DbPool, id: i64) -> AppResult<EventSummary> {
        queries::find_event_summary(&pool.conn, id)?.ok_or(AppError::EventNotFound(id))
    }

    /// All events, newest first.
    pub fn list(pool: &DbPool) -> AppResult<Vec<EventSummary>> {
        queries::load_event_summaries(&pool.conn)
    }

    pub fn update(pool: &mut DbPool, id: i64, upd: &EventUpdate) -> AppResult<Event> {
        let name = upd.name.as_deref().map(validate_name).transpose()?;
        let note = upd
            .note
            .as_deref()
            .map(|n| validate_note(Some(n)))
            .transpose()?;

        pool.write(|tx| {
            let mut ev = queries::find_event(tx, id)?.ok_or(AppError::EventNotFound(id))?;

            if let Some(n) = name {
                ev.name = n;
            }
            if upd.clear_start {
                ev.start_instant = None;
            } else if let Some(start) = upd.start_instant {
                ev.start_instant = Some(start);
            }
            if let Some(n) = note {
                ev.note = n;
            }
            if let Some(status) = upd.status {
                ev.status = status;
            }
            ev.updated_at = now_rfc3339();

            queries::update_event(tx, &ev)?;
            ttlog(tx, "edit", &format!("event {id}"), "Event updated")?;
            Ok(ev)
        })
    }

    /// Delete an event, its records and its bib list.
    pub fn delete(pool: &mut DbPool, id: i64) -> AppResult<()> {
        pool.write(|tx| {
            if !queries::delete_event_cascade(tx, id)? {
                return Err(AppError::EventNotFound(id));
            }
            ttlog(tx, "del", &format!("event {id}"), "Event deleted")?;
            Ok(())
        })
    }

    pub fn reset(pool: &mut DbPool, id: i64) -> AppResult<usize> {
        RecordLogic::reset(pool, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::bib::BibLogic;
    use crate::core::stats::StatsLogic;
    use crate::db::initialize::open_in_memory;
    use crate::models::bib::NewBibEntry;
    use crate::models::event_status::EventStatus;
    use crate::models::record::NewRecord;
    use crate::models::sort::ListQuery;

    fn named(name: &str) -> NewEvent {
        NewEvent {
            name: name.into(),
            ..NewEvent::default()
        }
    }

    #[test]
    fn sixth_event_evicts_the_oldest() {
        let mut pool = open_in_memory().unwrap();
        let ids: Vec<i64> = (1..=5)
            .map(|i| EventLogic::create(&mut pool, &named(&format!("Race {i}")), 5).unwrap().id)
            .collect();
        RecordLogic::record(&mut pool, ids[0], &NewRecord::with_elapsed(1_000)).unwrap();

        EventLogic::create(&mut pool, &named("Race 6"), 5).unwrap();

        let events = EventLogic::list(&pool).unwrap();
        assert_eq!(events.len(), 5);
        assert!(events.iter().all(|e| e.event.id != ids[0]));
        assert_eq!(events[0].event.name, "Race 6");

        let orphans: i64 = pool
            .conn
            .query_row(
                "SELECT COUNT(*) FROM records WHERE event_id = ?1",
                [ids[0]],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(orphans, 0);
    }

    #[test]
    fn delete_cascades_and_then_not_found() {
        let mut pool = open_in_memory().unwrap();
        let ev = EventLogic::create(&mut pool, &named("Sprint"), 5).unwrap();
        RecordLogic::record(&mut pool, ev.id, &NewRecord::with_elapsed(9_580)).unwrap();
        BibLogic::replace(&mut pool, ev.id, &[NewBibEntry::from_arg("1:Usain:M")]).unwrap();

        EventLogic::delete(&mut pool, ev.id).unwrap();

        assert!(matches!(EventLogic::get(&pool, ev.id), Err(AppError::EventNotFound(_))));
        assert!(matches!(
            RecordLogic::list(&pool, ev.id, &ListQuery::default()),
            Err(AppError::EventNotFound(_))
        ));
        let bibs: i64 = pool
            .conn
            .query_row("SELECT COUNT(*) FROM bib_list", [], |r| r.get(0))
            .unwrap();
        assert_eq!(bibs, 0);
        assert!(matches!(
            EventLogic::delete(&mut pool, ev.id),
            Err(AppError::EventNotFound(_))
        ));
    }

    #[test]
    fn reset_keeps_the_event() {
        let mut pool = open_in_memory().unwrap();
        let ev = EventLogic::create(&mut pool, &named("Relay"), 5).unwrap();
        for ms in [3_000, 1_000, 2_000] {
            RecordLogic::record(&mut pool, ev.id, &NewRecord::with_elapsed(ms)).unwrap();
        }

        assert_eq!(EventLogic::reset(&mut pool, ev.id).unwrap(), 3);

        let summary = EventLogic::get(&pool, ev.id).unwrap();
        assert_eq!(summary.participants, 0);
        assert_eq!(summary.best_ms, None);
        assert_eq!(StatsLogic::for_event(&pool, ev.id, 5).unwrap().count, 0);
        assert!(matches!(
            EventLogic::reset(&mut pool, 999),
            Err(AppError::EventNotFound(999))
        ));
    }

    #[test]
    fn summary_aggregates_times() {
        let mut pool = open_in_memory().unwrap();
        let ev = EventLogic::create(&mut pool, &named("10k"), 5).unwrap();
        for ms in [2_000, 4_000] {
            RecordLogic::record(&mut pool, ev.id, &NewRecord::with_elapsed(ms)).unwrap();
        }

        let s = EventLogic::get(&pool, ev.id).unwrap();
        assert_eq!(s.participants, 2);
        assert_eq!(s.mean_ms, Some(3_000.0));
        assert_eq!(s.best_ms, Some(2_000));
    }

    #[test]
    fn names_are_validated() {
        let mut pool = open_in_memory().unwrap();
        assert!(EventLogic::create(&mut pool, &named("   "), 5).unwrap_err().is_validation());
        let long = "x".repeat(MAX_EVENT_NAME_LEN + 1);
        assert!(EventLogic::create(&mut pool, &named(&long), 5).unwrap_err().is_validation());
        assert_eq!(EventLogic::list(&pool).unwrap().len(), 0);
    }

    #[test]
    fn update_changes_only_given_fields() {
        let mut pool = open_in_memory().unwrap();
        let ev = EventLogic::create(
            &mut pool,
            &NewEvent {
                name: "Marathon".into(),
                note: Some("windy".into()),
                ..NewEvent::default()
            },
            5,
        )
        .unwrap();

        let upd = EventLogic::update(
            &mut pool,
            ev.id,
            &EventUpdate {
                status: Some(EventStatus::Closed),
                ..EventUpdate::default()
            },
        )
        .unwrap();
        assert_eq!(upd.name, "Marathon");
        assert_eq!(upd.note.as_deref(), Some("windy"));
        assert_eq!(upd.status, EventStatus::Closed);

        let cleared = EventLogic::update(
            &mut pool,
            ev.id,
            &EventUpdate {
                note: Some(String::new()),
                ..EventUpdate::default()
            },
        )
        .unwrap();
        assert_eq!(cleared.note, None);

        assert!(matches!(
            EventLogic::update(&mut pool, 999, &EventUpdate::default()),
            Err(AppError::EventNotFound(999))
        ));
    }
}
