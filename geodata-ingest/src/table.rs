//! Tabular (CSV) loader for per-area statistics.

use crate::error::{IngestError, Result};
use crate::normalize::{
    coerce_id_str, resolve_key, KeyMatch, CA_ID, CA_NAME, TABLE_ID_COLUMNS, TABLE_NAME_COLUMNS,
};
use csv::ReaderBuilder;
use serde_json::{Map, Value};
use std::io::Read;
use std::path::Path;

/// One row of the statistics table.
#[derive(Debug, Clone, PartialEq)]
pub struct AreaRecord {
    pub id: Option<i64>,
    pub name: Option<String>,
    /// Every column of the row, typed, keyed by trimmed header.
    pub attributes: Map<String, Value>,
}

/// All rows of a statistics table plus what was learned about its columns.
#[derive(Debug, Clone)]
pub struct AreaTable {
    pub records: Vec<AreaRecord>,
    pub id_column: String,
    pub name_column: Option<String>,
}

impl AreaTable {
    /// Rows whose identifier could not be coerced to an integer.
    pub fn unparsed_ids(&self) -> usize {
        self.records.iter().filter(|r| r.id.is_none()).count()
    }
}

/// Types a raw CSV cell: empty → null, booleans, integers, floats, else trimmed text.
pub fn coerce_cell(s: &str) -> Value {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }

    if trimmed.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if trimmed.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }

    if let Ok(i) = trimmed.parse::<i64>() {
        return Value::Number(i.into());
    }

    if let Ok(f) = trimmed.parse::<f64>() {
        if let Some(n) = serde_json::Number::from_f64(f) {
            return Value::Number(n);
        }
    }

    Value::String(trimmed.to_string())
}

/// Loads the statistics CSV at `path`.
///
/// A missing file or a missing identifier column is fatal. A missing name
/// column only produces a warning.
pub fn load_area_table(path: &Path, hint: &str) -> Result<AreaTable> {
    if !path.exists() {
        return Err(IngestError::MissingFile {
            path: path.to_path_buf(),
            hint: hint.to_string(),
        });
    }

    tracing::info!(path = %path.display(), "Reading area statistics CSV");
    let file = std::fs::File::open(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    parse_area_table(file, path)
}

/// Parses statistics rows from any reader. `source` is only used in messages.
pub fn parse_area_table<R: Read>(reader: R, source: &Path) -> Result<AreaTable> {
    let csv_error = |e: csv::Error| IngestError::Csv {
        path: source.to_path_buf(),
        source: e,
    };

    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(csv_error)?
        .iter()
        .map(|h| h.trim().to_string())
        .collect::<Vec<_>>();

    let id_idx = find_column(&headers, TABLE_ID_COLUMNS).ok_or_else(|| {
        IngestError::MissingIdColumn {
            path: source.to_path_buf(),
            expected: TABLE_ID_COLUMNS.join(", "),
        }
    })?;

    let name_idx = find_column(&headers, TABLE_NAME_COLUMNS);
    if name_idx.is_none() {
        tracing::warn!(
            expected = %TABLE_NAME_COLUMNS.join(", "),
            "Name column not found; proceeding without names"
        );
    }

    let mut records = Vec::new();
    for result in rdr.records() {
        let row = result.map_err(csv_error)?;
        let cell = |idx: usize| row.get(idx).unwrap_or("");

        let mut attributes = Map::new();
        for (idx, header) in headers.iter().enumerate() {
            if header == CA_ID || header == CA_NAME {
                continue;
            }
            attributes.insert(header.clone(), coerce_cell(cell(idx)));
        }

        let name = name_idx
            .map(|idx| cell(idx).trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        records.push(AreaRecord {
            id: coerce_id_str(cell(id_idx)),
            name,
            attributes,
        });
    }

    let table = AreaTable {
        records,
        id_column: headers[id_idx].clone(),
        name_column: name_idx.map(|idx| headers[idx].clone()),
    };

    let unparsed = table.unparsed_ids();
    if unparsed > 0 {
        tracing::warn!(
            rows = unparsed,
            column = %table.id_column,
            "Some identifiers are not numeric; those rows will not join"
        );
    }

    Ok(table)
}

fn find_column(headers: &[String], candidates: &[&str]) -> Option<usize> {
    let key = resolve_key(
        headers.iter().map(String::as_str),
        candidates,
        KeyMatch::CaseInsensitive,
    )?;
    headers.iter().position(|h| h == key)
}
