use crate::cli::parser::{Commands, TimeAction};
use crate::config::Config;
use crate::core::record::RecordLogic;
use crate::db::initialize::open_pool;
use crate::errors::AppResult;
use crate::models::record::{NewRecord, Record, Standing};
use crate::models::sort::ListQuery;
use crate::ui::messages::{confirm, header, info, success, warning};
use crate::utils::colors::{RESET, color_for_rank};
use crate::utils::formatting::opt_or_dash;
use crate::utils::table::{Column, Table};
use crate::utils::time::{parse_elapsed, parse_optional_instant};
use crate::utils::{gap2readable, ms2readable};
use std::path::Path;

fn render_records(records: &[Record], millis: bool) -> String {
    let mut table = Table::new(vec![
        Column::right("ID"),
        Column::right("Rank"),
        Column::left("Bib"),
        Column::right("Time"),
        Column::right("Gap leader"),
        Column::right("Gap prev"),
        Column::left("Note"),
    ]);

    for r in records {
        table.add_row(vec![
            r.id.to_string(),
            r.rank.to_string(),
            opt_or_dash(r.bib.as_deref()),
            ms2readable(r.elapsed_ms, millis),
            gap2readable(r.gap_leader_ms, millis),
            gap2readable(r.gap_prev_ms, millis),
            opt_or_dash(r.note.as_deref()),
        ]);
    }

    table.render()
}

fn render_standings(rows: &[Standing], millis: bool) -> String {
    let mut table = Table::new(vec![
        Column::right("Pos"),
        Column::left("Bib"),
        Column::left("Athlete"),
        Column::left("Cat"),
        Column::right("Time"),
        Column::right("Gap leader"),
        Column::right("Gap prev"),
        Column::right("Race time"),
    ]);

    for s in rows {
        let r = &s.record;
        table.add_row(vec![
            s.position.to_string(),
            opt_or_dash(r.bib.as_deref()),
            opt_or_dash(s.athlete_name.as_deref()),
            opt_or_dash(s.category.as_deref()),
            ms2readable(r.elapsed_ms, millis),
            gap2readable(r.gap_leader_ms, millis),
            gap2readable(r.gap_prev_ms, millis),
            s.race_time_ms
                .map(|ms| ms2readable(ms, millis))
                .unwrap_or_else(|| "-".to_string()),
        ]);
    }

    // podium rows are coloured after layout so escapes do not skew widths
    let rendered = table.render();
    let mut out = String::with_capacity(rendered.len());
    for (idx, line) in rendered.lines().enumerate() {
        let color = idx
            .checked_sub(2)
            .and_then(|i| rows.get(i))
            .map_or(RESET, |s| color_for_rank(s.position));
        out.push_str(&format!("{color}{line}{RESET}\n"));
    }
    out
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Time { action } = cmd else {
        return Ok(());
    };

    let mut pool = open_pool(cfg)?;
    let millis = cfg.show_millis;

    match action {
        TimeAction::Add {
            event,
            elapsed,
            at,
            bib,
            note,
        } => {
            let new = NewRecord {
                bib: bib.clone(),
                arrival_instant: parse_optional_instant(at.as_ref())?,
                elapsed_ms: elapsed.as_deref().map(parse_elapsed).transpose()?,
                note: note.clone(),
            };
            let rec = RecordLogic::record(&mut pool, *event, &new)?;
            success(format!(
                "Time #{} recorded: {} rank {} ({} from leader)",
                rec.id,
                ms2readable(rec.elapsed_ms, millis),
                rec.rank,
                gap2readable(rec.gap_leader_ms, millis)
            ));
        }

        TimeAction::Bulk { event, file } => {
            let entries = RecordLogic::read_bulk_csv(Path::new(file))?;
            let inserted = RecordLogic::record_bulk(&mut pool, *event, &entries)?;
            success(format!("{} times recorded for event #{event}", inserted.len()));
        }

        TimeAction::Edit { id, bib, note } => {
            if bib.is_none() && note.is_none() {
                warning("Nothing to change: pass --bib and/or --note.");
            } else {
                let rec = RecordLogic::edit(&mut pool, *id, bib.as_deref(), note.as_deref())?;
                success(format!("Time #{} updated", rec.id));
            }
        }

        TimeAction::Del { id, yes } => {
            if !*yes && !confirm(format!("Delete time #{id}?")) {
                warning("Cancelled.");
            } else {
                RecordLogic::remove(&mut pool, *id)?;
                success(format!("Time #{id} deleted"));
            }
        }

        TimeAction::List {
            event,
            search,
            order_by,
            order_dir,
        } => {
            let query = ListQuery::new(search.as_deref(), order_by, order_dir);
            let records = RecordLogic::list(&pool, *event, &query)?;
            if records.is_empty() {
                info(format!("No times for event #{event}."));
            } else {
                header(format!("Times of event #{event}"));
                print!("{}", render_records(&records, millis));
            }
        }

        TimeAction::Standings { event, category } => {
            let rows = RecordLogic::standings(&pool, *event, category.as_deref())?;
            if rows.is_empty() {
                info(format!("No standings for event #{event}."));
            } else {
                header(format!("Standings of event #{event}"));
                print!("{}", render_standings(&rows, millis));
            }
        }
    }

    pool.close()
}
