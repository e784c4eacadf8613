//! Unified application error type.
//! All modules (db, core, cli, export) return AppError so that a failure
//! in any layer reaches `main` through `?` unchanged.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Persistence
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    // ---------------------------
    // Input validation
    // ---------------------------
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid time format: {0}")]
    InvalidTime(String),

    #[error("Invalid event status: {0}")]
    InvalidStatus(String),

    // ---------------------------
    // Lookups
    // ---------------------------
    #[error("Event {0} not found")]
    EventNotFound(i64),

    #[error("Record {0} not found")]
    RecordNotFound(i64),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // ---------------------------
    // Import / export
    // ---------------------------
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Export error: {0}")]
    Export(String),
}

impl AppError {
    /// True for errors caused by the caller's input rather than by storage.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            AppError::Validation(_) | AppError::InvalidTime(_) | AppError::InvalidStatus(_)
        )
    }
}

pub type AppResult<T> = Result<T, AppError>;
