use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries;
use crate::errors::{AppError, AppResult};
use crate::models::bib::{BibEntry, NewBibEntry};
use crate::utils::csv_input::{cell, read_rows};
use crate::utils::time::now_rfc3339;
use std::path::Path;

const BIB_COLUMNS: &[&str] = &["bib", "numero", "pettorale", "number"];
const NAME_COLUMNS: &[&str] = &["nome", "nome_atleta", "atleta", "name", "athlete"];
const CATEGORY_COLUMNS: &[&str] = &["categoria", "cat", "category"];

pub struct BibLogic;

impl BibLogic {
    /// Replace the whole bib list of an event. Entries without a bib are
    /// skipped. Returns the number of entries stored.
    pub fn replace(pool: &mut DbPool, event_id: i64, entries: &[NewBibEntry]) -> AppResult<usize> {
        let kept: Vec<NewBibEntry> = entries
            .iter()
            .filter(|e| !e.bib.trim().is_empty())
            .map(|e| NewBibEntry {
                bib: e.bib.trim().to_string(),
                ..e.clone()
            })
            .collect();

        if kept.is_empty() {
            return Err(AppError::Validation("bib list is empty".into()));
        }

        pool.write(|tx| {
            if !queries::event_exists(tx, event_id)? {
                return Err(AppError::EventNotFound(event_id));
            }

            queries::delete_bib_list(tx, event_id)?;
            let now = now_rfc3339();
            for entry in &kept {
                queries::insert_bib(tx, event_id, entry, &now)?;
            }

            ttlog(
                tx,
                "bib",
                &format!("event {event_id}"),
                &format!("Bib list replaced ({} entries)", kept.len()),
            )?;
            Ok(kept.len())
        })
    }

    pub fn read_csv(path: &Path) -> AppResult<Vec<NewBibEntry>> {
        let (headers, rows) = read_rows(path)?;

        let Some(bib_col) = headers.position(BIB_COLUMNS) else {
            return Err(AppError::Validation(
                "CSV has no bib column (bib, numero, pettorale, number)".into(),
            ));
        };
        let name_col = headers.position(NAME_COLUMNS);
        let cat_col = headers.position(CATEGORY_COLUMNS);

        Ok(rows
            .iter()
            .map(|row| NewBibEntry {
                bib: cell(row, Some(bib_col)).unwrap_or_default(),
                athlete_name: cell(row, name_col),
                category: cell(row, cat_col),
            })
            .collect())
    }

    pub fn import_csv(pool: &mut DbPool, event_id: i64, path: &Path) -> AppResult<usize> {
        let entries = Self::read_csv(path)?;
        Self::replace(pool, event_id, &entries)
    }

    pub fn list(pool: &DbPool, event_id: i64) -> AppResult<Vec<BibEntry>> {
        if !queries::event_exists(&pool.conn, event_id)? {
            return Err(AppError::EventNotFound(event_id));
        }
        queries::load_bib_list(&pool.conn, event_id)
    }

    pub fn clear(pool: &mut DbPool, event_id: i64) -> AppResult<usize> {
        pool.write(|tx| {
            if !queries::event_exists(tx, event_id)? {
                return Err(AppError::EventNotFound(event_id));
            }
            let deleted = queries::delete_bib_list(tx, event_id)?;
            ttlog(
                tx,
                "bib",
                &format!("event {event_id}"),
                &format!("Bib list cleared ({deleted} entries)"),
            )?;
            Ok(deleted)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::event::EventLogic;
    use crate::core::record::RecordLogic;
    use crate::db::initialize::open_in_memory;
    use crate::models::event::NewEvent;
    use crate::models::record::NewRecord;
    use std::io::Write;

    fn setup() -> (DbPool, i64) {
        let mut pool = open_in_memory().unwrap();
        let ev = EventLogic::create(
            &mut pool,
            &NewEvent {
                name: "Cross".into(),
                ..NewEvent::default()
            },
            5,
        )
        .unwrap();
        (pool, ev.id)
    }

    #[test]
    fn csv_headers_are_mapped_through_aliases() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Pettorale, Nome Atleta ,CAT").unwrap();
        writeln!(file, "7,Anna Rossi,F40").unwrap();
        writeln!(file, ",Nobody,M").unwrap();
        writeln!(file, "8,Luca Bianchi,").unwrap();
        file.flush().unwrap();

        let (mut pool, ev) = setup();
        assert_eq!(BibLogic::import_csv(&mut pool, ev, file.path()).unwrap(), 2);

        let list = BibLogic::list(&pool, ev).unwrap();
        assert_eq!(list[0].bib, "7");
        assert_eq!(list[0].athlete_name.as_deref(), Some("Anna Rossi"));
        assert_eq!(list[0].category.as_deref(), Some("F40"));
        assert_eq!(list[1].category, None);
    }

    #[test]
    fn replace_drops_the_previous_list() {
        let (mut pool, ev) = setup();
        BibLogic::replace(&mut pool, ev, &[NewBibEntry::from_arg("1:A"), NewBibEntry::from_arg("2:B")])
            .unwrap();
        BibLogic::replace(&mut pool, ev, &[NewBibEntry::from_arg("3:C")]).unwrap();

        let list = BibLogic::list(&pool, ev).unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].bib, "3");

        assert!(BibLogic::replace(&mut pool, ev, &[NewBibEntry::from_arg("  ")])
            .unwrap_err()
            .is_validation());
        assert_eq!(BibLogic::list(&pool, ev).unwrap().len(), 1);
    }

    #[test]
    fn standings_are_decorated_and_filtered_by_category() {
        let (mut pool, ev) = setup();
        BibLogic::replace(
            &mut pool,
            ev,
            &[
                NewBibEntry::from_arg("10:Anna:F"),
                NewBibEntry::from_arg("11:Marco:M"),
            ],
        )
        .unwrap();
        RecordLogic::record(&mut pool, ev, &NewRecord::with_elapsed(3_000).bib("10")).unwrap();
        RecordLogic::record(&mut pool, ev, &NewRecord::with_elapsed(2_000).bib("11")).unwrap();
        RecordLogic::record(&mut pool, ev, &NewRecord::with_elapsed(4_000).bib("99")).unwrap();

        let all = RecordLogic::standings(&pool, ev, None).unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].athlete_name.as_deref(), Some("Marco"));
        assert_eq!(all[2].athlete_name, None);

        let women = RecordLogic::standings(&pool, ev, Some("F")).unwrap();
        assert_eq!(women.len(), 1);
        assert_eq!(women[0].position, 1);
        assert_eq!(women[0].record.rank, 2);
    }

    #[test]
    fn clear_reports_deleted_entries() {
        let (mut pool, ev) = setup();
        BibLogic::replace(&mut pool, ev, &[NewBibEntry::from_arg("1")]).unwrap();
        assert_eq!(BibLogic::clear(&mut pool, ev).unwrap(), 1);
        assert_eq!(BibLogic::clear(&mut pool, ev).unwrap(), 0);
        assert!(matches!(BibLogic::clear(&mut pool, 42), Err(AppError::EventNotFound(42))));
    }
}
