// src/export/model.rs

use crate::models::bib::BibEntry;
use crate::models::event::EventSummary;
use crate::models::record::Standing;
use crate::models::stats::Statistics;
use crate::utils::formatting::{gap2readable, ms2readable};
use crate::utils::time::to_db_instant;
use serde::Serialize;

/// Flat standings row shared by CSV / XLSX / PDF.
#[derive(Serialize, Clone, Debug)]
pub struct StandingExport {
    pub position: i64,
    pub bib: String,
    pub athlete: String,
    pub category: String,
    pub time: String,
    pub time_ms: i64,
    pub gap_leader: String,
    pub gap_leader_ms: i64,
    pub gap_prev: String,
    pub gap_prev_ms: i64,
    pub note: String,
    pub arrival: String,
}

impl StandingExport {
    pub fn from_standing(s: &Standing, millis: bool) -> Self {
        let r = &s.record;
        Self {
            position: s.position,
            bib: r.bib.clone().unwrap_or_default(),
            athlete: s.athlete_name.clone().unwrap_or_default(),
            category: s.category.clone().unwrap_or_default(),
            time: ms2readable(r.elapsed_ms, millis),
            time_ms: r.elapsed_ms,
            gap_leader: gap2readable(r.gap_leader_ms, millis),
            gap_leader_ms: r.gap_leader_ms,
            gap_prev: gap2readable(r.gap_prev_ms, millis),
            gap_prev_ms: r.gap_prev_ms,
            note: r.note.clone().unwrap_or_default(),
            arrival: to_db_instant(&r.arrival_instant),
        }
    }
}

/// Full JSON export of one event.
#[derive(Serialize, Debug)]
pub struct EventSnapshot {
    pub exported_at: String,
    pub version: &'static str,
    pub event: EventSummary,
    pub standings: Vec<Standing>,
    pub bib_list: Vec<BibEntry>,
    pub statistics: Statistics,
}

/// Header per CSV / XLSX / PDF
pub(crate) fn get_headers() -> Vec<&'static str> {
    vec![
        "position",
        "bib",
        "athlete",
        "category",
        "time",
        "time_ms",
        "gap_leader",
        "gap_leader_ms",
        "gap_prev",
        "gap_prev_ms",
        "note",
        "arrival",
    ]
}

/// Columns written as numbers in spreadsheets.
pub(crate) fn is_numeric_column(idx: usize) -> bool {
    matches!(idx, 0 | 5 | 7 | 9)
}

pub(crate) fn standing_to_row(s: &StandingExport) -> Vec<String> {
    vec![
        s.position.to_string(),
        s.bib.clone(),
        s.athlete.clone(),
        s.category.clone(),
        s.time.clone(),
        s.time_ms.to_string(),
        s.gap_leader.clone(),
        s.gap_leader_ms.to_string(),
        s.gap_prev.clone(),
        s.gap_prev_ms.to_string(),
        s.note.clone(),
        s.arrival.clone(),
    ]
}

/// Shorter table for the PDF page width: no ms columns, no arrival.
pub(crate) fn pdf_headers() -> Vec<&'static str> {
    vec!["Pos", "Bib", "Athlete", "Cat", "Time", "Gap leader", "Gap prev", "Note"]
}

pub(crate) fn standings_to_pdf_table(rows: &[StandingExport]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|s| {
            vec![
                s.position.to_string(),
                s.bib.clone(),
                s.athlete.clone(),
                s.category.clone(),
                s.time.clone(),
                s.gap_leader.clone(),
                s.gap_prev.clone(),
                s.note.clone(),
            ]
        })
        .collect()
}
