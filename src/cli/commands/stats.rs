use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::stats::StatsLogic;
use crate::db::initialize::open_pool;
use crate::errors::{AppError, AppResult};
use crate::models::stats::Statistics;
use crate::ui::messages::{header, info};
use crate::utils::colors::{CYAN, GREEN, RESET};
use crate::utils::ms2readable;

fn fmt_ms(v: Option<f64>, millis: bool) -> String {
    v.map(|ms| ms2readable(ms.round() as i64, millis))
        .unwrap_or_else(|| "-".to_string())
}

fn print_stats(st: &Statistics, bucket_minutes: u32, millis: bool) {
    let line = |label: &str, value: String| {
        println!("{CYAN}• {label:<10}{RESET} {value}");
    };

    line("Finishers", format!("{GREEN}{}{RESET}", st.count));
    line("Best", fmt_ms(st.min_ms.map(|v| v as f64), millis));
    line("Worst", fmt_ms(st.max_ms.map(|v| v as f64), millis));
    line("Mean", fmt_ms(st.mean_ms, millis));
    line("Median", fmt_ms(st.median_ms, millis));
    line("P25", fmt_ms(st.p25_ms, millis));
    line("P75", fmt_ms(st.p75_ms, millis));
    line("Std dev", fmt_ms(st.stddev_ms, millis));
    line(
        "Last time",
        st.last_recorded_at.clone().unwrap_or_else(|| "-".to_string()),
    );

    if st.histogram.is_empty() {
        return;
    }

    println!("\n{CYAN}Distribution ({bucket_minutes} min buckets){RESET}");
    let max = st.histogram.iter().map(|b| b.count).max().unwrap_or(1).max(1);
    for b in &st.histogram {
        let bar_len = ((b.count * 40 + max - 1) / max) as usize;
        println!(
            "  {:>8} {} {}",
            ms2readable(b.from_minute * 60_000, false),
            "█".repeat(bar_len),
            b.count
        );
    }
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Stats { event, json } = cmd else {
        return Ok(());
    };

    let pool = open_pool(cfg)?;
    let stats = StatsLogic::for_event(&pool, *event, cfg.histogram_bucket_minutes)?;

    if *json {
        let out = serde_json::to_string_pretty(&stats)
            .map_err(|e| AppError::Export(format!("JSON serialization error: {e}")))?;
        println!("{out}");
    } else if stats.count == 0 {
        info(format!("No times recorded for event #{event}."));
    } else {
        header(format!("Statistics of event #{event}"));
        print_stats(&stats, cfg.histogram_bucket_minutes, cfg.show_millis);
    }

    pool.close()
}
