//! Identifier and display-name normalization.
//!
//! Source datasets name the community-area key and label inconsistently
//! (`GEOID`, `area_numbe`, `area_num_1`, ...). Each field is located by
//! trying an ordered list of synonyms and taking the first hit.

use serde_json::{Map, Value};

/// Property keys tried, in order, for a polygon's area identifier.
pub const FEATURE_ID_KEYS: &[&str] = &["area_numbe", "area_num", "area_num_1", "ca", "geoid"];

/// Property keys tried, in order, for a polygon's display name.
pub const FEATURE_NAME_KEYS: &[&str] = &["community", "name", "geog", "pri_neigh", "sec_neigh"];

/// Header names (case-insensitive) tried for the tabular identifier column.
pub const TABLE_ID_COLUMNS: &[&str] = &["geoid", "area_numbe", "area_num", "ca", "id"];

/// Header names (case-insensitive) tried for the tabular name column.
pub const TABLE_NAME_COLUMNS: &[&str] = &["geog", "community", "name"];

/// Output property holding the resolved identifier.
pub const CA_ID: &str = "CA_ID";

/// Output property holding the resolved display name.
pub const CA_NAME: &str = "CA_NAME";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyMatch {
    /// Literal key comparison.
    Exact,
    /// ASCII case-insensitive key comparison.
    CaseInsensitive,
}

impl KeyMatch {
    fn matches(self, key: &str, candidate: &str) -> bool {
        match self {
            KeyMatch::Exact => key == candidate,
            KeyMatch::CaseInsensitive => key.eq_ignore_ascii_case(candidate),
        }
    }
}

/// Returns the first candidate key present in `keys`, as spelled in `keys`.
pub fn resolve_key<'a, I>(keys: I, candidates: &[&str], mode: KeyMatch) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str> + Clone,
{
    candidates.iter().find_map(|candidate| {
        keys.clone()
            .into_iter()
            .find(|key| mode.matches(key, candidate))
    })
}

/// Returns the value of the first candidate key present in `mapping`.
pub fn resolve<'a>(
    mapping: &'a Map<String, Value>,
    candidates: &[&str],
    mode: KeyMatch,
) -> Option<&'a Value> {
    resolve_key(mapping.keys().map(String::as_str), candidates, mode)
        .and_then(|key| mapping.get(key))
}

/// Coerces a raw cell or property value to an integer identifier.
///
/// Integral floats (`5.0`, `"5.0"`) are accepted. Anything else yields `None`.
pub fn coerce_id(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(integral)),
        Value::String(s) => coerce_id_str(s),
        _ => None,
    }
}

/// String form of [`coerce_id`], used directly on CSV cells.
pub fn coerce_id_str(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    trimmed
        .parse::<i64>()
        .ok()
        .or_else(|| trimmed.parse::<f64>().ok().and_then(integral))
}

fn integral(f: f64) -> Option<i64> {
    if f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

/// Coerces a value to a trimmed, non-empty display name.
pub fn coerce_name(value: &Value) -> Option<String> {
    let raw = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!raw.is_empty()).then_some(raw)
}

/// Resolves a polygon's identifier from its properties.
///
/// Candidates whose value is null or fails coercion are skipped, so a
/// feature with `area_numbe: null, area_num: "7"` resolves to 7.
pub fn feature_id(props: &Map<String, Value>) -> Option<i64> {
    FEATURE_ID_KEYS
        .iter()
        .filter_map(|key| props.get(*key))
        .find_map(coerce_id)
}

/// Resolves a polygon's display name from its properties.
pub fn feature_name(props: &Map<String, Value>) -> Option<String> {
    FEATURE_NAME_KEYS
        .iter()
        .filter_map(|key| props.get(*key))
        .find_map(coerce_name)
}
