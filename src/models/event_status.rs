use crate::errors::{AppError, AppResult};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Active,
    Closed,
}

impl EventStatus {
    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            EventStatus::Active => "active",
            EventStatus::Closed => "closed",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "active" => Some(EventStatus::Active),
            "closed" => Some(EventStatus::Closed),
            _ => None,
        }
    }

    /// Helper: parse user input (case-insensitive)
    pub fn parse(input: &str) -> AppResult<Self> {
        Self::from_db_str(&input.trim().to_lowercase())
            .ok_or_else(|| AppError::InvalidStatus(input.to_string()))
    }
}
