use crate::errors::AppResult;
use crate::models::bib::{BibEntry, NewBibEntry};
use crate::models::event::{Event, EventSummary};
use crate::models::event_status::EventStatus;
use crate::models::record::Record;
use crate::models::sort::ListQuery;
use crate::utils::time::{from_db_instant, to_db_instant};
use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, params};

const EVENT_COLUMNS: &str = "e.id, e.name, e.start_instant, e.status, e.note, e.created_at, e.updated_at";

const RECORD_COLUMNS: &str = "id, event_id, bib, arrival_instant, elapsed_ms, rank, \
     gap_leader_ms, gap_prev_ms, note, created_at, updated_at";

fn conversion_error(idx: usize, msg: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        idx,
        Type::Text,
        Box::new(std::io::Error::other(msg)),
    )
}

fn get_instant(row: &Row, col: &str) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(col)?;
    from_db_instant(&raw).ok_or_else(|| {
        conversion_error(
            row.as_ref().column_index(col).unwrap_or(0),
            format!("invalid instant in {col}: {raw}"),
        )
    })
}

fn get_optional_instant(row: &Row, col: &str) -> rusqlite::Result<Option<DateTime<Utc>>> {
    let raw: Option<String> = row.get(col)?;
    match raw {
        None => Ok(None),
        Some(s) => from_db_instant(&s).map(Some).ok_or_else(|| {
            conversion_error(
                row.as_ref().column_index(col).unwrap_or(0),
                format!("invalid instant in {col}: {s}"),
            )
        }),
    }
}

// ---------------------------------------------------------------------------
// events
// ---------------------------------------------------------------------------

pub fn map_event(row: &Row) -> rusqlite::Result<Event> {
    let status_str: String = row.get("status")?;
    let status = EventStatus::from_db_str(&status_str).ok_or_else(|| {
        conversion_error(
            row.as_ref().column_index("status").unwrap_or(0),
            format!("invalid status: {status_str}"),
        )
    })?;

    Ok(Event {
        id: row.get("id")?,
        name: row.get("name")?,
        start_instant: get_optional_instant(row, "start_instant")?,
        status,
        note: row.get("note")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn map_event_summary(row: &Row) -> rusqlite::Result<EventSummary> {
    Ok(EventSummary {
        event: map_event(row)?,
        participants: row.get("participants")?,
        mean_ms: row.get("mean_ms")?,
        best_ms: row.get("best_ms")?,
    })
}

pub fn find_event(conn: &Connection, id: i64) -> AppResult<Option<Event>> {
    let sql = format!("SELECT {EVENT_COLUMNS} FROM events e WHERE e.id = ?1");
    Ok(conn.query_row(&sql, [id], map_event).optional()?)
}

pub fn event_exists(conn: &Connection, id: i64) -> AppResult<bool> {
    let mut stmt = conn.prepare_cached("SELECT 1 FROM events WHERE id = ?1")?;
    Ok(stmt.exists([id])?)
}

fn summary_sql(filter: &str) -> String {
    format!(
        "SELECT {EVENT_COLUMNS},
                COUNT(r.id)       AS participants,
                AVG(r.elapsed_ms) AS mean_ms,
                MIN(r.elapsed_ms) AS best_ms
         FROM events e
         LEFT JOIN records r ON r.event_id = e.id
         {filter}
         GROUP BY e.id
         ORDER BY e.created_at DESC, e.id DESC"
    )
}

pub fn find_event_summary(conn: &Connection, id: i64) -> AppResult<Option<EventSummary>> {
    let sql = summary_sql("WHERE e.id = ?1");
    Ok(conn.query_row(&sql, [id], map_event_summary).optional()?)
}

/// All events, newest first.
pub fn load_event_summaries(conn: &Connection) -> AppResult<Vec<EventSummary>> {
    let mut stmt = conn.prepare(&summary_sql(""))?;
    let rows = stmt.query_map([], map_event_summary)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn count_events(conn: &Connection) -> AppResult<i64> {
    Ok(conn.query_row("SELECT COUNT(*) FROM events", [], |row| row.get(0))?)
}

/// Oldest event by creation time, ties broken by id.
pub fn oldest_event_id(conn: &Connection) -> AppResult<Option<i64>> {
    Ok(conn
        .query_row(
            "SELECT id FROM events ORDER BY created_at ASC, id ASC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()?)
}

pub fn insert_event(
    conn: &Connection,
    name: &str,
    start_instant: Option<&DateTime<Utc>>,
    note: Option<&str>,
    now: &str,
) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO events (name, start_instant, status, note, created_at, updated_at)
         VALUES (?1, ?2, 'active', ?3, ?4, ?4)",
        params![name, start_instant.map(to_db_instant), note, now],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Update an event (all mutable fields)
pub fn update_event(conn: &Connection, ev: &Event) -> AppResult<()> {
    conn.execute(
        "UPDATE events
         SET name = ?1, start_instant = ?2, status = ?3, note = ?4, updated_at = ?5
         WHERE id = ?6",
        params![
            ev.name,
            ev.start_instant.as_ref().map(to_db_instant),
            ev.status.to_db_str(),
            ev.note,
            ev.updated_at,
            ev.id,
        ],
    )?;
    Ok(())
}

/// Delete an event and everything hanging off it. Returns false if absent.
///
/// Children are deleted explicitly as well, so the cascade does not depend
/// on `PRAGMA foreign_keys` being enabled on this connection.
pub fn delete_event_cascade(conn: &Connection, id: i64) -> AppResult<bool> {
    conn.execute("DELETE FROM records WHERE event_id = ?1", [id])?;
    conn.execute("DELETE FROM bib_list WHERE event_id = ?1", [id])?;
    let deleted = conn.execute("DELETE FROM events WHERE id = ?1", [id])?;
    Ok(deleted > 0)
}

// ---------------------------------------------------------------------------
// records
// ---------------------------------------------------------------------------

pub fn map_record(row: &Row) -> rusqlite::Result<Record> {
    Ok(Record {
        id: row.get("id")?,
        event_id: row.get("event_id")?,
        bib: row.get("bib")?,
        arrival_instant: get_instant(row, "arrival_instant")?,
        elapsed_ms: row.get("elapsed_ms")?,
        rank: row.get("rank")?,
        gap_leader_ms: row.get("gap_leader_ms")?,
        gap_prev_ms: row.get("gap_prev_ms")?,
        note: row.get("note")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

pub fn find_record(conn: &Connection, id: i64) -> AppResult<Option<Record>> {
    let sql = format!("SELECT {RECORD_COLUMNS} FROM records WHERE id = ?1");
    Ok(conn.query_row(&sql, [id], map_record).optional()?)
}

pub struct RecordRow<'a> {
    pub event_id: i64,
    pub bib: Option<&'a str>,
    pub arrival_instant: &'a DateTime<Utc>,
    pub elapsed_ms: i64,
    pub note: Option<&'a str>,
}

/// Insert a record with rank and gaps zeroed; the caller recomputes them.
pub fn insert_record(conn: &Connection, row: &RecordRow<'_>, now: &str) -> AppResult<i64> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO records (event_id, bib, arrival_instant, elapsed_ms, note, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
    )?;
    stmt.execute(params![
        row.event_id,
        row.bib,
        to_db_instant(row.arrival_instant),
        row.elapsed_ms,
        row.note,
        now,
    ])?;
    Ok(conn.last_insert_rowid())
}

pub fn update_record_labels(
    conn: &Connection,
    id: i64,
    bib: Option<&str>,
    note: Option<&str>,
    now: &str,
) -> AppResult<bool> {
    let changed = conn.execute(
        "UPDATE records SET bib = ?1, note = ?2, updated_at = ?3 WHERE id = ?4",
        params![bib, note, now, id],
    )?;
    Ok(changed > 0)
}

pub fn delete_record(conn: &Connection, id: i64) -> AppResult<bool> {
    Ok(conn.execute("DELETE FROM records WHERE id = ?1", [id])? > 0)
}

pub fn delete_records_for_event(conn: &Connection, event_id: i64) -> AppResult<usize> {
    Ok(conn.execute("DELETE FROM records WHERE event_id = ?1", [event_id])?)
}

/// Placement columns of one record, as stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoredPlacement {
    pub id: i64,
    pub elapsed_ms: i64,
    pub rank: i64,
    pub gap_leader_ms: i64,
    pub gap_prev_ms: i64,
}

pub fn load_placements(conn: &Connection, event_id: i64) -> AppResult<Vec<StoredPlacement>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, elapsed_ms, rank, gap_leader_ms, gap_prev_ms
         FROM records WHERE event_id = ?1",
    )?;
    let rows = stmt.query_map([event_id], |row| {
        Ok(StoredPlacement {
            id: row.get(0)?,
            elapsed_ms: row.get(1)?,
            rank: row.get(2)?,
            gap_leader_ms: row.get(3)?,
            gap_prev_ms: row.get(4)?,
        })
    })?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn update_placement(
    conn: &Connection,
    id: i64,
    rank: i64,
    gap_leader_ms: i64,
    gap_prev_ms: i64,
) -> AppResult<()> {
    let mut stmt = conn.prepare_cached(
        "UPDATE records SET rank = ?1, gap_leader_ms = ?2, gap_prev_ms = ?3 WHERE id = ?4",
    )?;
    stmt.execute(params![rank, gap_leader_ms, gap_prev_ms, id])?;
    Ok(())
}

/// Records of an event in the requested order.
///
/// `id ASC` is always the last key so the order is total.
pub fn load_records(conn: &Connection, event_id: i64, query: &ListQuery) -> AppResult<Vec<Record>> {
    let sql = format!(
        "SELECT {RECORD_COLUMNS} FROM records
         WHERE event_id = ?1
         ORDER BY {col} {dir}, id ASC",
        col = query.order_by.sql_column(),
        dir = query.order_dir.sql(),
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([event_id], map_record)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Records of an event in classification order with bib list decoration.
pub fn load_decorated_records(
    conn: &Connection,
    event_id: i64,
    category: Option<&str>,
) -> AppResult<Vec<(Record, Option<String>, Option<String>)>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM (
             SELECT r.*,
                    (SELECT b.athlete_name FROM bib_list b
                      WHERE b.event_id = r.event_id AND b.bib = r.bib
                      ORDER BY b.id LIMIT 1) AS athlete_name,
                    (SELECT b.category FROM bib_list b
                      WHERE b.event_id = r.event_id AND b.bib = r.bib
                      ORDER BY b.id LIMIT 1) AS category
             FROM records r
             WHERE r.event_id = ?1
         )
         WHERE ?2 IS NULL OR category = ?2
         ORDER BY elapsed_ms ASC, id ASC",
    )?;

    let rows = stmt.query_map(params![event_id, category], |row| {
        Ok((
            map_record(row)?,
            row.get::<_, Option<String>>("athlete_name")?,
            row.get::<_, Option<String>>("category")?,
        ))
    })?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Sorted elapsed times and the latest insertion time of an event.
pub fn load_elapsed_sorted(conn: &Connection, event_id: i64) -> AppResult<(Vec<i64>, Option<String>)> {
    let mut stmt =
        conn.prepare_cached("SELECT elapsed_ms FROM records WHERE event_id = ?1 ORDER BY elapsed_ms ASC")?;
    let rows = stmt.query_map([event_id], |row| row.get::<_, i64>(0))?;

    let mut times = Vec::new();
    for r in rows {
        times.push(r?);
    }

    let last: Option<String> = conn.query_row(
        "SELECT MAX(created_at) FROM records WHERE event_id = ?1",
        [event_id],
        |row| row.get(0),
    )?;

    Ok((times, last))
}

// ---------------------------------------------------------------------------
// bib list
// ---------------------------------------------------------------------------

fn map_bib(row: &Row) -> rusqlite::Result<BibEntry> {
    Ok(BibEntry {
        id: row.get("id")?,
        event_id: row.get("event_id")?,
        bib: row.get("bib")?,
        athlete_name: row.get("athlete_name")?,
        category: row.get("category")?,
        created_at: row.get("created_at")?,
    })
}

pub fn load_bib_list(conn: &Connection, event_id: i64) -> AppResult<Vec<BibEntry>> {
    let mut stmt = conn.prepare(
        "SELECT id, event_id, bib, athlete_name, category, created_at
         FROM bib_list WHERE event_id = ?1
         ORDER BY bib ASC, id ASC",
    )?;
    let rows = stmt.query_map([event_id], map_bib)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn insert_bib(conn: &Connection, event_id: i64, entry: &NewBibEntry, now: &str) -> AppResult<()> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO bib_list (event_id, bib, athlete_name, category, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )?;
    stmt.execute(params![
        event_id,
        entry.bib,
        entry.athlete_name,
        entry.category,
        now
    ])?;
    Ok(())
}

pub fn delete_bib_list(conn: &Connection, event_id: i64) -> AppResult<usize> {
    Ok(conn.execute("DELETE FROM bib_list WHERE event_id = ?1", [event_id])?)
}

// ---------------------------------------------------------------------------
// audit log
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct LogRow {
    pub id: i64,
    pub date: String,
    pub operation: String,
    pub target: String,
    pub message: String,
}

pub fn load_log(conn: &Connection) -> AppResult<Vec<LogRow>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, date, operation, COALESCE(target, ''), message FROM log ORDER BY id ASC",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok(LogRow {
            id: row.get(0)?,
            date: row.get(1)?,
            operation: row.get(2)?,
            target: row.get(3)?,
            message: row.get(4)?,
        })
    })?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
