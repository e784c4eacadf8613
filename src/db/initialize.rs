use crate::config::Config;
use crate::db::migrate::run_pending_migrations;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use rusqlite::Connection;

/// Initialize the database.
/// Delegates all schema creation / upgrades to the migration engine.
pub fn init_db(conn: &Connection) -> AppResult<usize> {
    run_pending_migrations(conn)
}

/// Open the configured database and make sure its schema is current.
pub fn open_pool(cfg: &Config) -> AppResult<DbPool> {
    let path = cfg.database_path();
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }

    let pool = DbPool::open(&path, cfg.busy_timeout())?;
    init_db(&pool.conn)?;
    Ok(pool)
}

/// In-memory database with the full schema, for tests.
pub fn open_in_memory() -> AppResult<DbPool> {
    let pool = DbPool::open_in_memory()?;
    init_db(&pool.conn)?;
    Ok(pool)
}
