use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::migrate::{pending_migrations, run_pending_migrations};
use crate::db::pool::DbPool;
use crate::db::stats;
use crate::errors::AppResult;
use crate::utils::colors::{CYAN, GREEN, RED, RESET};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Db {
        migrate,
        check,
        vacuum,
        info,
    } = cmd
    else {
        return Ok(());
    };

    // opened without migrating, so `--migrate` can report what is pending
    let db_path = cfg.database_path();
    let pool = DbPool::open(&db_path, cfg.busy_timeout())?;

    //
    // 1) MIGRATE
    //
    if *migrate {
        let pending = pending_migrations(&pool.conn)?;
        println!("{}▶ Running migrations… ({} pending){}", CYAN, pending.len(), RESET);
        let applied = run_pending_migrations(&pool.conn)?;
        println!("{}✔ Migration completed: {} applied.{}\n", GREEN, applied, RESET);
    } else {
        run_pending_migrations(&pool.conn)?;
    }

    //
    // 2) INFO
    //
    if *info {
        stats::print_db_info(&pool, &db_path)?;
    }

    //
    // 3) CHECK
    //
    if *check {
        println!("{}▶ Running integrity check…{}", CYAN, RESET);

        let integrity: String = pool
            .conn
            .query_row("PRAGMA integrity_check;", [], |row| row.get(0))?;

        if integrity == "ok" {
            println!("{}✔ Integrity check passed.{}\n", GREEN, RESET);
        } else {
            println!("{}✘ Integrity check failed:{} {}\n", RED, RESET, integrity);
        }
    }

    //
    // 4) VACUUM
    //
    if *vacuum {
        println!("{}▶ Running VACUUM…{}", CYAN, RESET);
        pool.conn.execute_batch("VACUUM;")?;
        println!("{}✔ Vacuum completed.{}\n", GREEN, RESET);
    }

    pool.close()
}
