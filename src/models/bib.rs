use serde::Serialize;

/// Bib-to-athlete lookup row used to decorate standings and exports.
#[derive(Debug, Clone, Serialize)]
pub struct BibEntry {
    pub id: i64,
    pub event_id: i64,
    pub bib: String,
    pub athlete_name: Option<String>,
    pub category: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewBibEntry {
    pub bib: String,
    pub athlete_name: Option<String>,
    pub category: Option<String>,
}

impl NewBibEntry {
    /// Parse the `BIB[:NAME[:CATEGORY]]` shorthand used on the command line.
    pub fn from_arg(arg: &str) -> Self {
        let mut parts = arg.splitn(3, ':').map(str::trim);
        let bib = parts.next().unwrap_or_default().to_string();
        let non_empty = |p: Option<&str>| p.filter(|v| !v.is_empty()).map(str::to_string);
        Self {
            bib,
            athlete_name: non_empty(parts.next()),
            category: non_empty(parts.next()),
        }
    }
}
