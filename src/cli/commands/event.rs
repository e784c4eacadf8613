use crate::cli::parser::{Commands, EventAction};
use crate::config::Config;
use crate::core::event::EventLogic;
use crate::db::initialize::open_pool;
use crate::errors::AppResult;
use crate::models::event::{EventSummary, EventUpdate, NewEvent};
use crate::models::event_status::EventStatus;
use crate::ui::messages::{confirm, header, info, success, warning};
use crate::utils::colors::{GREY, RESET, color_for_optional_field};
use crate::utils::formatting::opt_or_dash;
use crate::utils::ms2readable;
use crate::utils::table::{Column, Table};
use crate::utils::time::parse_optional_instant;

fn render_events(events: &[EventSummary], millis: bool) -> String {
    let mut table = Table::new(vec![
        Column::right("ID"),
        Column::left("Name"),
        Column::left("Status"),
        Column::left("Start"),
        Column::right("Athletes"),
        Column::right("Best"),
        Column::right("Mean"),
        Column::left("Created"),
    ]);

    for s in events {
        let ev = &s.event;
        table.add_row(vec![
            ev.id.to_string(),
            ev.name.clone(),
            ev.status.to_db_str().to_string(),
            ev.start_instant
                .map(|d| d.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_else(|| "-".to_string()),
            s.participants.to_string(),
            s.best_ms
                .map(|ms| ms2readable(ms, millis))
                .unwrap_or_else(|| "-".to_string()),
            s.mean_ms
                .map(|ms| ms2readable(ms.round() as i64, millis))
                .unwrap_or_else(|| "-".to_string()),
            ev.created_at.chars().take(19).collect(),
        ]);
    }

    table.render()
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Event { action } = cmd else {
        return Ok(());
    };

    let mut pool = open_pool(cfg)?;

    match action {
        EventAction::Add { name, start, note } => {
            let new = NewEvent {
                name: name.clone(),
                start_instant: parse_optional_instant(start.as_ref())?,
                note: note.clone(),
            };
            let ev = EventLogic::create(&mut pool, &new, cfg.max_events)?;
            success(format!("Event #{} '{}' created", ev.id, ev.name));
        }

        EventAction::List => {
            let events = EventLogic::list(&pool)?;
            if events.is_empty() {
                info("No events found.");
            } else {
                header("Events");
                print!("{}", render_events(&events, cfg.show_millis));
            }
        }

        EventAction::Show { id } => {
            let summary = EventLogic::get(&pool, *id)?;
            header(format!("Event #{}", summary.event.id));
            print!("{}", render_events(std::slice::from_ref(&summary), cfg.show_millis));

            let note = opt_or_dash(summary.event.note.as_deref());
            println!(
                "\nNote: {}{}{}",
                color_for_optional_field(&note),
                note,
                RESET
            );
            println!("{GREY}Updated: {}{RESET}", summary.event.updated_at);
        }

        EventAction::Edit {
            id,
            name,
            start,
            clear_start,
            note,
            status,
        } => {
            let upd = EventUpdate {
                name: name.clone(),
                start_instant: parse_optional_instant(start.as_ref())?,
                clear_start: *clear_start,
                note: note.clone(),
                status: status.as_deref().map(EventStatus::parse).transpose()?,
            };
            let ev = EventLogic::update(&mut pool, *id, &upd)?;
            success(format!("Event #{} updated", ev.id));
        }

        EventAction::Del { id, yes } => {
            if !*yes && !confirm(format!("Delete event #{id} with all its times and bib list?")) {
                warning("Cancelled.");
            } else {
                EventLogic::delete(&mut pool, *id)?;
                success(format!("Event #{id} deleted"));
            }
        }

        EventAction::Reset { id, yes } => {
            if !*yes && !confirm(format!("Delete all times of event #{id}?")) {
                warning("Cancelled.");
            } else {
                let n = EventLogic::reset(&mut pool, *id)?;
                success(format!("Event #{id} reset: {n} times deleted"));
            }
        }
    }

    pool.close()
}
