// src/export/logic.rs

use crate::config::Config;
use crate::core::bib::BibLogic;
use crate::core::event::EventLogic;
use crate::core::record::RecordLogic;
use crate::core::stats::StatsLogic;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::export::ExportFormat;
use crate::export::fs_utils::{ensure_writable, require_absolute};
use crate::export::json_csv::{export_csv, export_json};
use crate::export::model::{EventSnapshot, StandingExport};
use crate::export::pdf_export::export_pdf;
use crate::export::xlsx::export_xlsx;
use crate::ui::messages::warning;
use crate::utils::time::now_rfc3339;
use std::path::Path;

/// Standings export of a single event.
pub struct ExportLogic;

impl ExportLogic {
    /// Export the standings of `event_id`.
    ///
    /// - `file`: absolute path of the output file
    /// - `category`: restrict the standings to one category
    /// - `force`: overwrite without asking
    pub fn export(
        pool: &mut DbPool,
        cfg: &Config,
        event_id: i64,
        format: ExportFormat,
        file: &str,
        category: Option<&str>,
        force: bool,
    ) -> AppResult<()> {
        let path = Path::new(file);
        require_absolute(path)?;

        let snapshot = Self::snapshot(pool, cfg, event_id, category)?;

        ensure_writable(path, force)?;

        if snapshot.standings.is_empty() {
            warning(format!("No records for event {event_id}: exporting an empty table."));
        }

        let rows: Vec<StandingExport> = snapshot
            .standings
            .iter()
            .map(|s| StandingExport::from_standing(s, cfg.show_millis))
            .collect();

        match format {
            ExportFormat::Csv => export_csv(&rows, path)?,
            ExportFormat::Json => export_json(&snapshot, path)?,
            ExportFormat::Xlsx => export_xlsx(&rows, &snapshot.event.event.name, path)?,
            ExportFormat::Pdf => export_pdf(&snapshot, &rows, path, cfg.show_millis)?,
        }

        ttlog(
            &pool.conn,
            "export",
            &path.to_string_lossy(),
            &format!(
                "Event {event_id} exported as {} ({} rows)",
                format.as_str(),
                rows.len()
            ),
        )?;
        tracing::info!(event_id, format = format.as_str(), rows = rows.len(), "export written");

        Ok(())
    }

    /// Everything known about one event at this instant.
    pub fn snapshot(
        pool: &DbPool,
        cfg: &Config,
        event_id: i64,
        category: Option<&str>,
    ) -> AppResult<EventSnapshot> {
        Ok(EventSnapshot {
            exported_at: now_rfc3339(),
            version: env!("CARGO_PKG_VERSION"),
            event: EventLogic::get(pool, event_id)?,
            standings: RecordLogic::standings(pool, event_id, category)?,
            bib_list: BibLogic::list(pool, event_id)?,
            statistics: StatsLogic::for_event(pool, event_id, cfg.histogram_bucket_minutes)?,
        })
    }
}
