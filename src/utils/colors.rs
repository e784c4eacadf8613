/// ANSI color helper utilities for terminal output.
pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";

pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

/// Podium colors: rank 1 yellow, 2-3 cyan, others plain.
pub fn color_for_rank(rank: i64) -> &'static str {
    match rank {
        1 => YELLOW,
        2 | 3 => CYAN,
        _ => RESET,
    }
}

/// Returns GREY for an empty or dash placeholder, RESET otherwise.
pub fn color_for_optional_field(value: &str) -> &'static str {
    let v = value.trim();
    if v.is_empty() || v == "-" { GREY } else { RESET }
}
