// src/export/pdf_export.rs

use crate::errors::{AppError, AppResult};
use crate::export::model::{EventSnapshot, StandingExport, pdf_headers, standings_to_pdf_table};
use crate::export::notify_export_success;
use crate::export::pdf::PdfManager;
use crate::ui::messages::info;
use crate::utils::formatting::ms2readable;
use std::path::Path;

fn summary_lines(snapshot: &EventSnapshot, millis: bool) -> Vec<String> {
    let ev = &snapshot.event.event;
    let st = &snapshot.statistics;
    let fmt = |v: Option<f64>| {
        v.map(|ms| ms2readable(ms.round() as i64, millis))
            .unwrap_or_else(|| "-".to_string())
    };

    let mut lines = vec![format!("Event #{}: {} ({})", ev.id, ev.name, ev.status.to_db_str())];
    if let Some(start) = ev.start_instant {
        lines.push(format!("Start: {}", start.to_rfc3339()));
    }
    if let Some(note) = &ev.note {
        lines.push(format!("Note: {note}"));
    }
    lines.push(format!(
        "Finishers: {}   Best: {}   Mean: {}   Median: {}",
        st.count,
        fmt(st.min_ms.map(|v| v as f64)),
        fmt(st.mean_ms),
        fmt(st.median_ms)
    ));
    lines.push(format!(
        "P25: {}   P75: {}   Std dev: {}",
        fmt(st.p25_ms),
        fmt(st.p75_ms),
        fmt(st.stddev_ms)
    ));
    lines.push(format!("Exported at {}", snapshot.exported_at));
    lines
}

pub(crate) fn export_pdf(
    snapshot: &EventSnapshot,
    rows: &[StandingExport],
    path: &Path,
    millis: bool,
) -> AppResult<()> {
    info(format!("Exporting to PDF: {}", path.display()));

    let title = format!("Standings - {}", snapshot.event.event.name);
    let preamble = summary_lines(snapshot, millis);

    let mut pdf = PdfManager::new();
    pdf.write_report(&title, &preamble, &pdf_headers(), &standings_to_pdf_table(rows));

    pdf.save(path)
        .map_err(|e| AppError::Export(format!("PDF export error: {e}")))?;

    notify_export_success("PDF", path);
    Ok(())
}
