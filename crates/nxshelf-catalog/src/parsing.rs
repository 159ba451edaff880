//! Parsers for the two catalog documents.
//!
//! Both are lenient per record: a malformed entry is skipped and counted,
//! only a document that cannot be read at all is an error.

use std::collections::HashMap;

use chrono::NaiveDate;
use nxshelf_core::{CatalogTitle, TitleId};
use serde_json::Value;

use crate::error::{ClientError, ClientResult};

const DATE_FORMAT: &str = "%Y-%m-%d";

// ============================================================================
// Title List
// ============================================================================

/// Parse the title map `{ "<id>": { "Game Name", "Version", "Size" } }`.
///
/// Entries with a malformed id or missing fields are skipped.
pub fn parse_titles(json: &Value) -> ClientResult<Vec<CatalogTitle>> {
    let map = json
        .as_object()
        .ok_or_else(|| ClientError::InvalidResponse {
            message: "title list is not a JSON object".to_string(),
        })?;

    let mut titles = Vec::with_capacity(map.len());
    let mut skipped = 0usize;
    for (id, record) in map {
        match parse_title_entry(id, record) {
            Some(title) => titles.push(title),
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        tracing::debug!(target: "nxshelf.catalog", skipped, "Skipped malformed title records");
    }
    Ok(titles)
}

/// Parse one title record. Returns None when any required field is unusable.
pub fn parse_title_entry(id: &str, record: &Value) -> Option<CatalogTitle> {
    let id = TitleId::parse(id).ok()?;
    let name = record.get("Game Name").and_then(Value::as_str)?;
    let version = record.get("Version").and_then(version_text)?;
    let size = record.get("Size").and_then(Value::as_u64)?;

    Some(CatalogTitle::new(id, name, version, size))
}

/// The source publishes versions both as strings and as bare numbers.
fn version_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

// ============================================================================
// Release Dates
// ============================================================================

/// Parse `id|yyyy-MM-dd` lines. Extra fields are ignored; lines with a bad
/// id or date are skipped. A later line for the same id wins.
pub fn parse_release_dates(text: &str) -> HashMap<TitleId, NaiveDate> {
    let mut dates = HashMap::new();
    let mut skipped = 0usize;

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        match parse_date_line(line) {
            Some((id, date)) => {
                dates.insert(id, date);
            }
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        tracing::debug!(target: "nxshelf.catalog", skipped, "Skipped malformed release-date lines");
    }
    dates
}

fn parse_date_line(line: &str) -> Option<(TitleId, NaiveDate)> {
    let mut fields = line.split('|');
    let id = TitleId::parse(fields.next()?.trim()).ok()?;
    let date = NaiveDate::parse_from_str(fields.next()?.trim(), DATE_FORMAT).ok()?;
    Some((id, date))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_titles_accepts_string_and_numeric_versions() {
        let json = json!({
            "01001E500F7FC000": {"Game Name": "Alpha", "Version": "1.0.2", "Size": 1024},
            "01001E500F7FC800": {"Game Name": "Alpha", "Version": 131072, "Size": 2048}
        });

        let titles = parse_titles(&json).unwrap();
        assert_eq!(titles.len(), 2);

        let update = titles
            .iter()
            .find(|t| t.id.as_str() == "01001E500F7FC800")
            .unwrap();
        assert_eq!(update.version, "131072");
        assert_eq!(update.base_id.as_str(), "01001E500F7FC000");
        assert_eq!(update.size_bytes, 2048);
        assert!(update.release_date.is_none());
    }

    #[test]
    fn test_parse_titles_skips_bad_records() {
        let json = json!({
            "01001E500F7FC000": {"Game Name": "Alpha", "Version": "1", "Size": 1},
            "bad": {"Game Name": "Too short", "Version": "1", "Size": 1},
            "01001E500F7FD001": {"Version": "1", "Size": 1},
            "01001E500F7FE001": {"Game Name": "No size", "Version": "1"},
            "01001E500F7FF001": {"Game Name": "Bad version", "Version": [1], "Size": 1}
        });

        let titles = parse_titles(&json).unwrap();
        assert_eq!(titles.len(), 1);
        assert_eq!(titles[0].name, "Alpha");
    }

    #[test]
    fn test_parse_titles_rejects_non_object() {
        let result = parse_titles(&json!([1, 2, 3]));
        assert!(matches!(result, Err(ClientError::InvalidResponse { .. })));
    }

    #[test]
    fn test_parse_release_dates() {
        let text = "\
01001E500F7FC000|2020-03-20
01001E500F7FC800|2021-01-02|extra|fields

nodelimiter
01001E500F7FD001|not-a-date
ab|2020-01-01
0100AAAAAAAAA000 | 2019-12-31
";
        let dates = parse_release_dates(text);

        assert_eq!(dates.len(), 3);
        let id = TitleId::parse("01001E500F7FC000").unwrap();
        assert_eq!(dates[&id], NaiveDate::from_ymd_opt(2020, 3, 20).unwrap());
        let spaced = TitleId::parse("0100AAAAAAAAA000").unwrap();
        assert_eq!(dates[&spaced], NaiveDate::from_ymd_opt(2019, 12, 31).unwrap());
    }

    #[test]
    fn test_parse_release_dates_later_line_wins() {
        let dates = parse_release_dates("0100AAAAAAAAA000|2019-01-01\n0100AAAAAAAAA000|2020-01-01");
        let id = TitleId::parse("0100AAAAAAAAA000").unwrap();
        assert_eq!(dates[&id], NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
    }
}
