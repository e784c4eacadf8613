//! Helpers for reading operator-supplied CSV files with loose headers.

use crate::errors::AppResult;
use csv::StringRecord;
use std::path::Path;

/// Normalize a header cell: trim, lowercase, whitespace runs become `_`.
pub fn normalize_header(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

/// Column positions of a CSV file, looked up by any of several aliases.
pub struct HeaderMap {
    names: Vec<String>,
}

impl HeaderMap {
    pub fn new(headers: &StringRecord) -> Self {
        Self {
            names: headers.iter().map(normalize_header).collect(),
        }
    }

    pub fn position(&self, aliases: &[&str]) -> Option<usize> {
        aliases
            .iter()
            .find_map(|alias| self.names.iter().position(|n| n == alias))
    }
}

/// Trimmed, non-empty value of `idx` in `row`.
pub fn cell(row: &StringRecord, idx: Option<usize>) -> Option<String> {
    idx.and_then(|i| row.get(i))
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Read all rows of a headered CSV file.
pub fn read_rows(path: &Path) -> AppResult<(HeaderMap, Vec<StringRecord>)> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let headers = HeaderMap::new(rdr.headers()?);
    let rows = rdr.records().collect::<Result<Vec<_>, _>>()?;
    Ok((headers, rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_are_normalized() {
        assert_eq!(normalize_header("  Nome Atleta "), "nome_atleta");
        assert_eq!(normalize_header("BIB"), "bib");
    }

    #[test]
    fn aliases_are_tried_in_order() {
        let map = HeaderMap::new(&StringRecord::from(vec!["Pettorale", "Nome"]));
        assert_eq!(map.position(&["bib", "pettorale"]), Some(0));
        assert_eq!(map.position(&["nome_atleta", "nome"]), Some(1));
        assert_eq!(map.position(&["categoria"]), None);
    }
}
