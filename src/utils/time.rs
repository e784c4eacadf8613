//! Time utilities: parsing elapsed times and instants, timestamps for rows.

use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Local, NaiveDateTime, NaiveTime, SecondsFormat, TimeZone, Utc};

/// Current instant as stored in `created_at` / `updated_at` columns.
///
/// Microsecond precision keeps lexical order equal to chronological order.
pub fn now_rfc3339() -> String {
    to_db_instant(&Utc::now())
}

pub fn to_db_instant(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn from_db_instant(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Parse an elapsed time.
///
/// Accepted forms:
/// - `7260000` (milliseconds)
/// - `MM:SS[.fff]`
/// - `H:MM:SS[.fff]`
pub fn parse_elapsed(input: &str) -> AppResult<i64> {
    let s = input.trim();
    let invalid = || AppError::InvalidTime(input.to_string());

    if s.is_empty() {
        return Err(invalid());
    }

    if s.chars().all(|c| c.is_ascii_digit()) {
        return s.parse::<i64>().map_err(|_| invalid());
    }

    let (clock, millis) = match s.split_once('.') {
        Some((clock, frac)) => {
            if frac.is_empty() || frac.len() > 3 || !frac.chars().all(|c| c.is_ascii_digit()) {
                return Err(invalid());
            }
            // ".5" is half a second, not 5 ms
            let padded = format!("{frac:0<3}");
            (clock, padded.parse::<i64>().map_err(|_| invalid())?)
        }
        None => (s, 0),
    };

    let parts: Vec<&str> = clock.split(':').collect();
    let nums: Vec<i64> = parts
        .iter()
        .map(|p| {
            if p.is_empty() || !p.chars().all(|c| c.is_ascii_digit()) {
                Err(invalid())
            } else {
                p.parse::<i64>().map_err(|_| invalid())
            }
        })
        .collect::<AppResult<_>>()?;

    let (hours, minutes, seconds) = match nums.as_slice() {
        [m, s] => (0, *m, *s),
        [h, m, s] => (*h, *m, *s),
        _ => return Err(invalid()),
    };

    if seconds >= 60 || (parts.len() == 3 && minutes >= 60) {
        return Err(invalid());
    }

    hours
        .checked_mul(60)
        .and_then(|m| m.checked_add(minutes))
        .and_then(|m| m.checked_mul(60))
        .and_then(|s| s.checked_add(seconds))
        .and_then(|s| s.checked_mul(1000))
        .and_then(|ms| ms.checked_add(millis))
        .ok_or_else(invalid)
}

/// Parse an arrival or start instant.
///
/// RFC 3339 is taken as is; `YYYY-MM-DD HH:MM[:SS]` and bare `HH:MM[:SS]`
/// (today) are interpreted in local time.
pub fn parse_instant(input: &str) -> AppResult<DateTime<Utc>> {
    let s = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    for fmt in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return local_to_utc(naive, input);
        }
    }

    for fmt in ["%H:%M:%S%.f", "%H:%M"] {
        if let Ok(t) = NaiveTime::parse_from_str(s, fmt) {
            let naive = Local::now().date_naive().and_time(t);
            return local_to_utc(naive, input);
        }
    }

    Err(AppError::InvalidTime(input.to_string()))
}

pub fn parse_optional_instant(input: Option<&String>) -> AppResult<Option<DateTime<Utc>>> {
    input.map(|s| parse_instant(s)).transpose()
}

fn local_to_utc(naive: NaiveDateTime, input: &str) -> AppResult<DateTime<Utc>> {
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| AppError::InvalidTime(input.to_string()))
}
