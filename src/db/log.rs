use crate::errors::AppResult;
use crate::utils::time::now_rfc3339;
use rusqlite::Connection;
use rusqlite::params;

/// Write an audit line into the `log` table.
///
/// Called with the transaction of the operation being logged, so the audit
/// row commits or rolls back together with it.
pub fn ttlog(conn: &Connection, operation: &str, target: &str, message: &str) -> AppResult<()> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO log (date, operation, target, message)
         VALUES (?1, ?2, ?3, ?4)",
    )?;

    stmt.execute(params![now_rfc3339(), operation, target, message])?;

    Ok(())
}
