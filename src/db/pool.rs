//! SQLite connection handle.
//!
//! One `DbPool` per process (or per thread): it is opened by the command
//! handler, passed down to every operation, and closed explicitly.

use crate::errors::{AppError, AppResult};
use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::path::Path;
use std::time::Duration;

pub struct DbPool {
    pub conn: Connection,
}

impl DbPool {
    /// Open a database file with the default busy timeout.
    pub fn new(path: &str) -> AppResult<Self> {
        Self::open(Path::new(path), Duration::from_millis(5000))
    }

    /// Open a database file. Concurrent writers wait up to `busy_timeout`
    /// for the write lock before failing.
    pub fn open(path: &Path, busy_timeout: Duration) -> AppResult<Self> {
        let conn = Connection::open(path)?;
        conn.busy_timeout(busy_timeout)?;
        // WAL lets readers proceed while a writer holds the lock
        let _mode: String = conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
        Self::configure(conn)
    }

    pub fn open_in_memory() -> AppResult<Self> {
        Self::configure(Connection::open_in_memory()?)
    }

    fn configure(conn: Connection) -> AppResult<Self> {
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(Self { conn })
    }

    /// Run `func` inside a `BEGIN IMMEDIATE` transaction.
    ///
    /// The write lock is taken before `func` reads anything, so a
    /// read-modify-write sequence cannot interleave with another writer.
    /// The transaction is rolled back if `func` fails.
    pub fn write<F, T>(&mut self, func: F) -> AppResult<T>
    where
        F: FnOnce(&Transaction<'_>) -> AppResult<T>,
    {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let out = func(&tx)?;
        tx.commit()?;
        Ok(out)
    }

    pub fn close(self) -> AppResult<()> {
        self.conn.close().map_err(|(_, e)| AppError::Db(e))
    }
}
