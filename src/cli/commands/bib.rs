use crate::cli::parser::{BibAction, Commands};
use crate::config::Config;
use crate::core::bib::BibLogic;
use crate::db::initialize::open_pool;
use crate::errors::AppResult;
use crate::models::bib::NewBibEntry;
use crate::ui::messages::{confirm, header, info, success, warning};
use crate::utils::formatting::opt_or_dash;
use crate::utils::table::{Column, Table};
use std::path::Path;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Bib { action } = cmd else {
        return Ok(());
    };

    let mut pool = open_pool(cfg)?;

    match action {
        BibAction::Import { event, file } => {
            let n = BibLogic::import_csv(&mut pool, *event, Path::new(file))?;
            success(format!("{n} bib entries imported for event #{event}"));
        }

        BibAction::Set { event, entries } => {
            let parsed: Vec<NewBibEntry> =
                entries.iter().map(|e| NewBibEntry::from_arg(e)).collect();
            let n = BibLogic::replace(&mut pool, *event, &parsed)?;
            success(format!("{n} bib entries stored for event #{event}"));
        }

        BibAction::List { event } => {
            let list = BibLogic::list(&pool, *event)?;
            if list.is_empty() {
                info(format!("No bib list for event #{event}."));
            } else {
                header(format!("Bib list of event #{event}"));
                let mut table = Table::new(vec![
                    Column::left("Bib"),
                    Column::left("Athlete"),
                    Column::left("Category"),
                ]);
                for b in &list {
                    table.add_row(vec![
                        b.bib.clone(),
                        opt_or_dash(b.athlete_name.as_deref()),
                        opt_or_dash(b.category.as_deref()),
                    ]);
                }
                print!("{}", table.render());
            }
        }

        BibAction::Clear { event, yes } => {
            if !*yes && !confirm(format!("Delete the bib list of event #{event}?")) {
                warning("Cancelled.");
            } else {
                let n = BibLogic::clear(&mut pool, *event)?;
                success(format!("{n} bib entries deleted"));
            }
        }
    }

    pool.close()
}
