//! Ordering options for record listings.
//!
//! Unknown values never fail: they fall back to elapsed time, ascending.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    Rank,
    Bib,
    #[default]
    Elapsed,
    Created,
}

impl SortField {
    /// Case and `_` are ignored, so `createdAt`, `created_at` and
    /// `CREATEDAT` all pick the same column.
    pub fn parse_lenient(input: &str) -> Self {
        let key: String = input
            .trim()
            .chars()
            .filter(|c| *c != '_')
            .flat_map(char::to_lowercase)
            .collect();
        match key.as_str() {
            "rank" | "position" | "pos" | "posizione" => SortField::Rank,
            "bib" | "pettorale" => SortField::Bib,
            "created" | "createdat" => SortField::Created,
            "elapsed" | "elapsedms" | "tempomillisecondi" => SortField::Elapsed,
            _ => SortField::Elapsed,
        }
    }

    /// Whitelisted column name, safe to splice into ORDER BY.
    pub fn sql_column(&self) -> &'static str {
        match self {
            SortField::Rank => "rank",
            SortField::Bib => "bib",
            SortField::Elapsed => "elapsed_ms",
            SortField::Created => "created_at",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

impl SortDir {
    pub fn parse_lenient(input: &str) -> Self {
        if input.trim().eq_ignore_ascii_case("desc") {
            SortDir::Desc
        } else {
            SortDir::Asc
        }
    }

    pub fn sql(&self) -> &'static str {
        match self {
            SortDir::Asc => "ASC",
            SortDir::Desc => "DESC",
        }
    }
}

/// Filter and ordering of `time list`.
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    /// Case-insensitive substring matched against bib or note.
    pub filter: Option<String>,
    pub order_by: SortField,
    pub order_dir: SortDir,
}

impl ListQuery {
    pub fn new(filter: Option<&str>, order_by: &str, order_dir: &str) -> Self {
        Self {
            filter: filter
                .map(str::trim)
                .filter(|f| !f.is_empty())
                .map(str::to_string),
            order_by: SortField::parse_lenient(order_by),
            order_dir: SortDir::parse_lenient(order_dir),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_values_fall_back() {
        assert_eq!(SortField::parse_lenient("nonsense"), SortField::Elapsed);
        assert_eq!(SortField::parse_lenient("; DROP TABLE records"), SortField::Elapsed);
        assert_eq!(SortDir::parse_lenient("sideways"), SortDir::Asc);
    }

    #[test]
    fn known_values_are_case_insensitive() {
        assert_eq!(SortField::parse_lenient("RANK"), SortField::Rank);
        assert_eq!(SortField::parse_lenient("Bib"), SortField::Bib);
        assert_eq!(SortField::parse_lenient("created_at"), SortField::Created);
        assert_eq!(SortField::parse_lenient("createdAt"), SortField::Created);
        assert_eq!(SortField::parse_lenient("posizione"), SortField::Rank);
        assert_eq!(SortField::parse_lenient("elapsedMs"), SortField::Elapsed);
        assert_eq!(SortField::parse_lenient("tempo_millisecondi"), SortField::Elapsed);
        assert_eq!(SortDir::parse_lenient("desc"), SortDir::Desc);
    }
}
