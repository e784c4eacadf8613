use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::initialize::open_pool;
use crate::errors::AppResult;
use crate::export::ExportLogic;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Export {
        event,
        format,
        file,
        category,
        force,
    } = cmd
    {
        let mut pool = open_pool(cfg)?;
        ExportLogic::export(
            &mut pool,
            cfg,
            *event,
            *format,
            file,
            category.as_deref(),
            *force,
        )?;
        pool.close()?;
    }

    Ok(())
}
