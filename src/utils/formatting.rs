//! Formatting utilities used for CLI and export outputs.

/// Milliseconds as `HH:MM:SS` (or `HH:MM:SS.mmm` with `millis`).
///
/// Hours are not wrapped: a 26 hour ultra finishes at `26:00:00`.
pub fn ms2readable(ms: i64, millis: bool) -> String {
    let sign = if ms < 0 { "-" } else { "" };
    let abs = ms.unsigned_abs();
    let total_secs = abs / 1000;
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;

    if millis {
        format!(
            "{}{:02}:{:02}:{:02}.{:03}",
            sign,
            hours,
            minutes,
            seconds,
            abs % 1000
        )
    } else {
        format!("{}{:02}:{:02}:{:02}", sign, hours, minutes, seconds)
    }
}

/// Gap column text: `-` for zero, `+HH:MM:SS` otherwise.
pub fn gap2readable(ms: i64, millis: bool) -> String {
    if ms == 0 {
        "-".to_string()
    } else {
        format!("+{}", ms2readable(ms, millis))
    }
}

pub fn opt_or_dash(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.to_string(),
        _ => "-".to_string(),
    }
}

/// Make a string safe to use as a file name stem.
pub fn file_stem(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn readable_times() {
        assert_eq!(ms2readable(7_260_000, false), "02:01:00");
        assert_eq!(ms2readable(7_260_123, true), "02:01:00.123");
        assert_eq!(ms2readable(93_600_000, false), "26:00:00");
        assert_eq!(ms2readable(0, false), "00:00:00");
    }

    #[test]
    fn gaps_render_dash_for_leader() {
        assert_eq!(gap2readable(0, false), "-");
        assert_eq!(gap2readable(60_000, false), "+00:01:00");
    }

    #[test]
    fn file_stem_replaces_symbols() {
        assert_eq!(file_stem("Trail 10k / 2025"), "Trail_10k___2025");
    }
}
