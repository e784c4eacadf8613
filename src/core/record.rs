//! Timing records: insert, edit, delete, list and standings.
//!
//! Every mutation runs inside one `BEGIN IMMEDIATE` transaction and ends
//! with [`recompute_standings`], so ranks and gaps are never observed
//! half-updated.

use crate::core::ranking::Standings;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries::{self, RecordRow, StoredPlacement};
use crate::errors::{AppError, AppResult};
use crate::models::event::Event;
use crate::models::event_status::EventStatus;
use crate::models::record::{NewRecord, Record, Standing};
use crate::models::sort::ListQuery;
use crate::utils::csv_input::{cell, read_rows};
use crate::utils::time::{now_rfc3339, parse_elapsed, parse_instant};
use chrono::{DateTime, Utc};
use rusqlite::Connection;
use std::collections::HashMap;
use std::path::Path;

pub const MAX_BIB_LEN: usize = 50;
pub const MAX_RECORD_NOTE_LEN: usize = 500;

const BIB_COLUMNS: &[&str] = &["bib", "pettorale", "numero", "number"];
const ELAPSED_COLUMNS: &[&str] = &["elapsed", "elapsed_ms", "tempo_millisecondi", "time", "tempo"];
const ARRIVAL_COLUMNS: &[&str] = &["arrival", "arrival_instant", "tempo_arrivo"];
const NOTE_COLUMNS: &[&str] = &["note", "notes"];

/// A submission after validation, ready to be written.
struct Resolved {
    bib: Option<String>,
    arrival: DateTime<Utc>,
    elapsed_ms: i64,
    note: Option<String>,
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn check_len(field: &str, value: Option<&str>, max: usize) -> AppResult<()> {
    if let Some(v) = value
        && v.chars().count() > max
    {
        return Err(AppError::Validation(format!(
            "{field} exceeds {max} characters"
        )));
    }
    Ok(())
}

fn load_open_event(conn: &Connection, event_id: i64) -> AppResult<Event> {
    let event = queries::find_event(conn, event_id)?.ok_or(AppError::EventNotFound(event_id))?;
    if event.status == EventStatus::Closed {
        return Err(AppError::Validation(format!(
            "event {event_id} is closed"
        )));
    }
    Ok(event)
}

/// Validate a submission and derive its elapsed time.
///
/// Without an explicit elapsed time the event start is used:
/// `elapsed = arrival - start`.
fn resolve(event: &Event, new: &NewRecord) -> AppResult<Resolved> {
    let bib = non_empty(new.bib.as_deref());
    let note = non_empty(new.note.as_deref());
    check_len("bib", bib.as_deref(), MAX_BIB_LEN)?;
    check_len("note", note.as_deref(), MAX_RECORD_NOTE_LEN)?;

    let arrival = new.arrival_instant.unwrap_or_else(Utc::now);

    let elapsed_ms = match (new.elapsed_ms, event.start_instant) {
        (Some(ms), _) => ms,
        (None, Some(start)) => (arrival - start).num_milliseconds(),
        (None, None) => {
            return Err(AppError::Validation(format!(
                "event {} has no start instant: an elapsed time is required",
                event.id
            )));
        }
    };

    if elapsed_ms < 0 {
        return Err(AppError::Validation(format!(
            "elapsed time must be >= 0 (got {elapsed_ms} ms)"
        )));
    }

    Ok(Resolved {
        bib,
        arrival,
        elapsed_ms,
        note,
    })
}

fn insert_resolved(conn: &Connection, event_id: i64, r: &Resolved, now: &str) -> AppResult<i64> {
    queries::insert_record(
        conn,
        &RecordRow {
            event_id,
            bib: r.bib.as_deref(),
            arrival_instant: &r.arrival,
            elapsed_ms: r.elapsed_ms,
            note: r.note.as_deref(),
        },
        now,
    )
}

/// Recompute rank and gaps of every record of an event.
///
/// Only rows whose stored values differ are rewritten; returns how many.
pub fn recompute_standings(conn: &Connection, event_id: i64) -> AppResult<usize> {
    let stored: HashMap<i64, StoredPlacement> = queries::load_placements(conn, event_id)?
        .into_iter()
        .map(|s| (s.id, s))
        .collect();
    let standings = Standings::from_entries(stored.values().map(|s| (s.id, s.elapsed_ms)));

    let mut changed = 0;
    for placement in standings.placements() {
        let Some(row) = stored.get(&placement.record_id) else {
            continue;
        };

        if row.rank != placement.rank
            || row.gap_leader_ms != placement.gaps.leader_ms
            || row.gap_prev_ms != placement.gaps.previous_ms
        {
            queries::update_placement(
                conn,
                placement.record_id,
                placement.rank,
                placement.gaps.leader_ms,
                placement.gaps.previous_ms,
            )?;
            changed += 1;
        }
    }

    tracing::debug!(event_id, records = standings.len(), changed, "standings recomputed");
    Ok(changed)
}

pub struct RecordLogic;

impl RecordLogic {
    /// Insert one record and re-rank its event.
    pub fn record(pool: &mut DbPool, event_id: i64, new: &NewRecord) -> AppResult<Record> {
        pool.write(|tx| {
            let event = load_open_event(tx, event_id)?;
            let resolved = resolve(&event, new)?;
            let now = now_rfc3339();

            let id = insert_resolved(tx, event_id, &resolved, &now)?;
            recompute_standings(tx, event_id)?;

            ttlog(
                tx,
                "add",
                &format!("event {event_id}"),
                &format!(
                    "Record {id} added (bib {}, {} ms)",
                    resolved.bib.as_deref().unwrap_or("-"),
                    resolved.elapsed_ms
                ),
            )?;

            queries::find_record(tx, id)?.ok_or(AppError::RecordNotFound(id))
        })
    }

    /// Insert many records at once. Nothing is written unless every entry
    /// is valid.
    pub fn record_bulk(
        pool: &mut DbPool,
        event_id: i64,
        entries: &[NewRecord],
    ) -> AppResult<Vec<Record>> {
        if entries.is_empty() {
            return Err(AppError::Validation("no records to insert".into()));
        }

        pool.write(|tx| {
            let event = load_open_event(tx, event_id)?;

            let resolved = entries
                .iter()
                .enumerate()
                .map(|(i, e)| {
                    resolve(&event, e).map_err(|err| match err {
                        AppError::Validation(msg) => {
                            AppError::Validation(format!("entry {}: {msg}", i + 1))
                        }
                        other => other,
                    })
                })
                .collect::<AppResult<Vec<_>>>()?;

            let now = now_rfc3339();
            let mut ids = Vec::with_capacity(resolved.len());
            for r in &resolved {
                ids.push(insert_resolved(tx, event_id, r, &now)?);
            }

            recompute_standings(tx, event_id)?;

            ttlog(
                tx,
                "add",
                &format!("event {event_id}"),
                &format!("{} records added in bulk", ids.len()),
            )?;

            let mut out = Vec::with_capacity(ids.len());
            for id in ids {
                out.push(queries::find_record(tx, id)?.ok_or(AppError::RecordNotFound(id))?);
            }
            Ok(out)
        })
    }

    /// Change bib and/or note. `None` keeps the value, an empty string
    /// clears it. Rank and gaps are unaffected.
    pub fn edit(
        pool: &mut DbPool,
        record_id: i64,
        bib: Option<&str>,
        note: Option<&str>,
    ) -> AppResult<Record> {
        pool.write(|tx| {
            let current =
                queries::find_record(tx, record_id)?.ok_or(AppError::RecordNotFound(record_id))?;

            let bib = match bib {
                Some(b) => non_empty(Some(b)),
                None => current.bib.clone(),
            };
            let note = match note {
                Some(n) => non_empty(Some(n)),
                None => current.note.clone(),
            };
            check_len("bib", bib.as_deref(), MAX_BIB_LEN)?;
            check_len("note", note.as_deref(), MAX_RECORD_NOTE_LEN)?;

            queries::update_record_labels(
                tx,
                record_id,
                bib.as_deref(),
                note.as_deref(),
                &now_rfc3339(),
            )?;

            ttlog(
                tx,
                "edit",
                &format!("record {record_id}"),
                "Record bib/note updated",
            )?;

            queries::find_record(tx, record_id)?.ok_or(AppError::RecordNotFound(record_id))
        })
    }

    /// Delete one record and re-rank what is left of its event.
    pub fn remove(pool: &mut DbPool, record_id: i64) -> AppResult<()> {
        pool.write(|tx| {
            let current =
                queries::find_record(tx, record_id)?.ok_or(AppError::RecordNotFound(record_id))?;

            queries::delete_record(tx, record_id)?;
            recompute_standings(tx, current.event_id)?;

            ttlog(
                tx,
                "del",
                &format!("record {record_id}"),
                &format!(
                    "Record removed from event {} ({} ms)",
                    current.event_id, current.elapsed_ms
                ),
            )?;
            Ok(())
        })
    }

    /// Delete every record of an event, keeping the event itself.
    pub fn reset(pool: &mut DbPool, event_id: i64) -> AppResult<usize> {
        pool.write(|tx| {
            if !queries::event_exists(tx, event_id)? {
                return Err(AppError::EventNotFound(event_id));
            }

            let deleted = queries::delete_records_for_event(tx, event_id)?;
            ttlog(
                tx,
                "reset",
                &format!("event {event_id}"),
                &format!("{deleted} records deleted"),
            )?;
            Ok(deleted)
        })
    }

    /// Records of an event, filtered and ordered.
    ///
    /// The filter is a case-insensitive substring of bib or note; it is
    /// matched literally, so `%` and `_` have no special meaning.
    pub fn list(pool: &DbPool, event_id: i64, query: &ListQuery) -> AppResult<Vec<Record>> {
        if !queries::event_exists(&pool.conn, event_id)? {
            return Err(AppError::EventNotFound(event_id));
        }

        let records = queries::load_records(&pool.conn, event_id, query)?;

        let Some(needle) = query.filter.as_deref().map(str::to_lowercase) else {
            return Ok(records);
        };

        let matches = |field: &Option<String>| {
            field
                .as_deref()
                .is_some_and(|v| v.to_lowercase().contains(&needle))
        };

        Ok(records
            .into_iter()
            .filter(|r| matches(&r.bib) || matches(&r.note))
            .collect())
    }

    /// Classification of an event, decorated with the bib list.
    pub fn standings(
        pool: &DbPool,
        event_id: i64,
        category: Option<&str>,
    ) -> AppResult<Vec<Standing>> {
        let event =
            queries::find_event(&pool.conn, event_id)?.ok_or(AppError::EventNotFound(event_id))?;

        let category = category.map(str::trim).filter(|c| !c.is_empty());
        let rows = queries::load_decorated_records(&pool.conn, event_id, category)?;

        Ok(rows
            .into_iter()
            .enumerate()
            .map(|(idx, (record, athlete_name, category))| {
                let race_time_ms = event
                    .start_instant
                    .map(|start| (record.arrival_instant - start).num_milliseconds());
                Standing {
                    position: idx as i64 + 1,
                    record,
                    athlete_name,
                    category,
                    race_time_ms,
                }
            })
            .collect())
    }

    /// Read a bulk timing file.
    ///
    /// Recognized columns (header names are case-insensitive):
    /// `bib`, `elapsed` (ms or `H:MM:SS[.fff]`), `arrival` (instant), `note`.
    /// Every row needs an elapsed time or an arrival instant.
    pub fn read_bulk_csv(path: &Path) -> AppResult<Vec<NewRecord>> {
        let (headers, rows) = read_rows(path)?;

        let bib_col = headers.position(BIB_COLUMNS);
        let elapsed_col = headers.position(ELAPSED_COLUMNS);
        let arrival_col = headers.position(ARRIVAL_COLUMNS);
        let note_col = headers.position(NOTE_COLUMNS);

        if elapsed_col.is_none() && arrival_col.is_none() {
            return Err(AppError::Validation(
                "CSV needs an elapsed or an arrival column".into(),
            ));
        }

        let mut out = Vec::with_capacity(rows.len());
        for (i, row) in rows.iter().enumerate() {
            let elapsed = cell(row, elapsed_col)
                .map(|v| parse_elapsed(&v))
                .transpose()?;
            let arrival = cell(row, arrival_col)
                .map(|v| parse_instant(&v))
                .transpose()?;

            if elapsed.is_none() && arrival.is_none() {
                return Err(AppError::Validation(format!(
                    "row {}: missing elapsed time and arrival",
                    i + 2
                )));
            }

            out.push(NewRecord {
                bib: cell(row, bib_col),
                arrival_instant: arrival,
                elapsed_ms: elapsed,
                note: cell(row, note_col),
            });
        }

        Ok(out)
    }
}
