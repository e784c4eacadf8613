//! Schema migrations.
//!
//! Each migration runs once; applied migrations are recorded in the `log`
//! table as `migration_applied` rows keyed by the migration id.

use crate::errors::{AppError, AppResult};
use crate::utils::time::now_rfc3339;
use rusqlite::{Connection, OptionalExtension, params};

struct Migration {
    id: &'static str,
    description: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        id: "20250301_0001_create_events",
        description: "Created events table",
        sql: r#"
        CREATE TABLE IF NOT EXISTS events (
            id             INTEGER PRIMARY KEY AUTOINCREMENT,
            name           TEXT NOT NULL,
            start_instant  TEXT,
            status         TEXT NOT NULL DEFAULT 'active' CHECK(status IN ('active','closed')),
            note           TEXT,
            created_at     TEXT NOT NULL,
            updated_at     TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_events_created_at ON events(created_at);
        "#,
    },
    Migration {
        id: "20250301_0002_create_records",
        description: "Created records table",
        sql: r#"
        CREATE TABLE IF NOT EXISTS records (
            id               INTEGER PRIMARY KEY AUTOINCREMENT,
            event_id         INTEGER NOT NULL REFERENCES events(id) ON DELETE CASCADE,
            bib              TEXT,
            arrival_instant  TEXT NOT NULL,
            elapsed_ms       INTEGER NOT NULL CHECK(elapsed_ms >= 0),
            rank             INTEGER NOT NULL DEFAULT 0,
            gap_leader_ms    INTEGER NOT NULL DEFAULT 0,
            gap_prev_ms      INTEGER NOT NULL DEFAULT 0,
            note             TEXT,
            created_at       TEXT NOT NULL,
            updated_at       TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_records_event_elapsed ON records(event_id, elapsed_ms, id);
        CREATE INDEX IF NOT EXISTS idx_records_bib ON records(bib);
        "#,
    },
    Migration {
        id: "20250301_0003_create_bib_list",
        description: "Created bib_list table",
        sql: r#"
        CREATE TABLE IF NOT EXISTS bib_list (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            event_id      INTEGER NOT NULL REFERENCES events(id) ON DELETE CASCADE,
            bib           TEXT NOT NULL,
            athlete_name  TEXT,
            category      TEXT,
            created_at    TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_bib_list_event_bib ON bib_list(event_id, bib);
        "#,
    },
];

/// Ensure that the `log` table exists.
fn ensure_log_table(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )
}

fn is_applied(conn: &Connection, id: &str) -> rusqlite::Result<bool> {
    let mut chk = conn.prepare_cached(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([id], |_| Ok(())).optional()?.is_some())
}

/// Schema change and its `migration_applied` row commit together.
fn apply(conn: &Connection, m: &Migration) -> AppResult<()> {
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| AppError::Migration(format!("{}: {}", m.id, e)))?;

    tx.execute_batch(m.sql)
        .and_then(|_| {
            tx.execute(
                "INSERT INTO log (date, operation, target, message)
                 VALUES (?1, 'migration_applied', ?2, ?3)",
                params![now_rfc3339(), m.id, m.description],
            )
        })
        .map_err(|e| AppError::Migration(format!("{}: {}", m.id, e)))?;

    tx.commit()
        .map_err(|e| AppError::Migration(format!("{}: {}", m.id, e)))?;

    tracing::info!(migration = m.id, "migration applied");
    Ok(())
}

/// Ids of the migrations not yet applied to this database.
pub fn pending_migrations(conn: &Connection) -> AppResult<Vec<&'static str>> {
    ensure_log_table(conn)?;
    let mut pending = Vec::new();
    for m in MIGRATIONS {
        if !is_applied(conn, m.id)? {
            pending.push(m.id);
        }
    }
    Ok(pending)
}

/// Public entry point: run all pending migrations, return how many ran.
///
/// Invoked by db::initialize::init_db().
pub fn run_pending_migrations(conn: &Connection) -> AppResult<usize> {
    ensure_log_table(conn)?;

    let mut applied = 0;
    for m in MIGRATIONS {
        if is_applied(conn, m.id)? {
            continue;
        }
        apply(conn, m)?;
        applied += 1;
    }

    Ok(applied)
}
