use std::path::Path;

use anyhow::{Context, Result};
use csv::ReaderBuilder;

/// A CSV file loaded as raw strings. Cells keep their source text apart
/// from whitespace/BOM trimming so later passes can report the original
/// value verbatim.
#[derive(Debug, Clone)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CsvTable {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }

    /// Cell at (row, column-name), empty string when the column is absent
    /// or the row is short.
    pub fn cell<'a>(&'a self, row: &'a [String], name: &str) -> &'a str {
        self.column_index(name)
            .and_then(|idx| row.get(idx))
            .map_or("", String::as_str)
    }
}

fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    let mut parts = trimmed.split_whitespace();
    let mut normalized = String::new();
    if let Some(first) = parts.next() {
        normalized.push_str(first);
        for part in parts {
            normalized.push(' ');
            normalized.push_str(part);
        }
    }
    normalized.to_ascii_lowercase()
}

fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

/// Sentinels hospital exports use for "no value". Treated as missing
/// everywhere, never as literal text.
pub fn is_null_like(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty()
        || trimmed.eq_ignore_ascii_case("na")
        || trimmed.eq_ignore_ascii_case("n/a")
        || trimmed.eq_ignore_ascii_case("null")
        || trimmed.eq_ignore_ascii_case("none")
        || trimmed == "-"
}

/// Non-missing cell content, or `None` for null sentinels.
pub fn present(value: &str) -> Option<String> {
    if is_null_like(value) {
        None
    } else {
        Some(value.trim().to_string())
    }
}

pub fn read_csv_table(path: &Path) -> Result<CsvTable> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("read csv: {}", path.display()))?;
    let mut raw_rows: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record.with_context(|| format!("read record: {}", path.display()))?;
        let row: Vec<String> = record.iter().map(normalize_cell).collect();
        if row.iter().all(|value| value.trim().is_empty()) {
            continue;
        }
        raw_rows.push(row);
    }
    let Some((header_row, data_rows)) = raw_rows.split_first() else {
        return Ok(CsvTable {
            headers: Vec::new(),
            rows: Vec::new(),
        });
    };
    let headers: Vec<String> = header_row.iter().map(|value| normalize_header(value)).collect();
    let mut rows = Vec::with_capacity(data_rows.len());
    for record in data_rows {
        let mut row = Vec::with_capacity(headers.len());
        for idx in 0..headers.len() {
            let value = record.get(idx).map_or("", String::as_str);
            row.push(normalize_cell(value));
        }
        rows.push(row);
    }
    Ok(CsvTable { headers, rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn reads_headers_and_rows() {
        let file = write_csv("patient_id,name\nP001,Ana Garcia\nP002,Luis Perez\n");
        let table = read_csv_table(file.path()).unwrap();
        assert_eq!(table.headers, vec!["patient_id", "name"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.cell(&table.rows[0], "name"), "Ana Garcia");
    }

    #[test]
    fn skips_blank_rows_and_trims_bom() {
        let file = write_csv("\u{feff}id,value\n\n1,  a  \n,,\n2,b\n");
        let table = read_csv_table(file.path()).unwrap();
        assert_eq!(table.headers, vec!["id", "value"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0], vec!["1", "a"]);
    }

    #[test]
    fn short_rows_pad_with_empty_cells() {
        let file = write_csv("a,b,c\n1,2\n");
        let table = read_csv_table(file.path()).unwrap();
        assert_eq!(table.rows[0], vec!["1", "2", ""]);
    }

    #[test]
    fn null_sentinels_are_missing() {
        for value in ["", "  ", "NA", "n/a", "NULL", "None", "-"] {
            assert!(is_null_like(value), "{value:?} should be null-like");
        }
        assert!(!is_null_like("0"));
        assert!(!is_null_like("nan@example.com"));
        assert_eq!(present(" x "), Some("x".to_string()));
        assert_eq!(present("N/A"), None);
    }
}
