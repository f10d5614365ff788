//! Left join of polygon features against area statistics.

use crate::normalize::{feature_id, feature_name, CA_ID, CA_NAME};
use crate::polygons::PolygonFeature;
use crate::table::AreaRecord;
use serde::Serialize;
use serde_json::value::RawValue;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Lookup from area identifier to statistics row. Immutable once built.
#[derive(Debug, Default)]
pub struct AreaIndex<'a> {
    by_id: HashMap<i64, &'a AreaRecord>,
    duplicates: usize,
    unindexed: usize,
}

impl<'a> AreaIndex<'a> {
    /// Indexes records by identifier. When an identifier repeats, the last
    /// row loaded wins; rows without an identifier are left out.
    pub fn build(records: &'a [AreaRecord]) -> Self {
        let mut index = AreaIndex::default();
        for record in records {
            match record.id {
                Some(id) => {
                    if index.by_id.insert(id, record).is_some() {
                        index.duplicates += 1;
                    }
                }
                None => index.unindexed += 1,
            }
        }

        if index.duplicates > 0 {
            tracing::warn!(
                duplicates = index.duplicates,
                "Repeated area identifiers in statistics table; the last row for each id was kept"
            );
        }

        index
    }

    pub fn get(&self, id: i64) -> Option<&'a AreaRecord> {
        self.by_id.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Number of rows that replaced an earlier row with the same identifier.
    pub fn duplicates(&self) -> usize {
        self.duplicates
    }

    /// Number of rows excluded because their identifier was not numeric.
    pub fn unindexed(&self) -> usize {
        self.unindexed
    }
}

/// A polygon with statistics attached.
#[derive(Debug, Serialize)]
pub struct MergedFeature {
    #[serde(rename = "type")]
    kind: &'static str,
    pub geometry: Option<Box<RawValue>>,
    pub properties: Map<String, Value>,
}

impl MergedFeature {
    pub fn new(geometry: Option<Box<RawValue>>, properties: Map<String, Value>) -> Self {
        Self {
            kind: "Feature",
            geometry,
            properties,
        }
    }
}

/// Outcome counts of a join run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JoinReport {
    pub features: usize,
    pub matched: usize,
    pub unmatched: usize,
}

/// Joins every polygon, in source order, to its statistics row.
///
/// Output properties are the polygon's own properties, then `CA_ID` and
/// `CA_NAME`, then the matched row's columns. `CA_ID` is always the
/// polygon's resolved id.
pub fn left_join(
    features: Vec<PolygonFeature>,
    index: &AreaIndex<'_>,
) -> (Vec<MergedFeature>, JoinReport) {
    let mut report = JoinReport {
        features: features.len(),
        ..JoinReport::default()
    };

    let merged = features
        .into_iter()
        .map(|feature| {
            let ca_id = feature_id(&feature.properties);
            let mut ca_name = feature_name(&feature.properties);
            let record = ca_id.and_then(|id| index.get(id));

            match record {
                Some(record) => {
                    report.matched += 1;
                    if record.name.is_some() {
                        ca_name = record.name.clone();
                    }
                }
                None => report.unmatched += 1,
            }

            let mut properties = feature.properties;
            properties.insert(CA_ID.to_string(), ca_id.map_or(Value::Null, Value::from));
            properties.insert(CA_NAME.to_string(), ca_name.map_or(Value::Null, Value::from));
            if let Some(record) = record {
                properties.extend(
                    record
                        .attributes
                        .iter()
                        .map(|(key, value)| (key.clone(), value.clone())),
                );
            }

            MergedFeature::new(feature.geometry, properties)
        })
        .collect();

    if report.unmatched > 0 {
        tracing::info!(
            unmatched = report.unmatched,
            "Polygons had no matching statistics row (by CA_ID)"
        );
    }

    (merged, report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polygons::parse_polygons;
    use serde_json::json;
    use std::path::Path;

    fn record(id: Option<i64>, name: &str, poverty: f64) -> AreaRecord {
        let mut attributes = Map::new();
        attributes.insert("GEOG".into(), json!(name));
        attributes.insert("pct_poverty".into(), json!(poverty));
        AreaRecord {
            id,
            name: Some(name.to_string()),
            attributes,
        }
    }

    fn polygons(ids: &[&str]) -> Vec<PolygonFeature> {
        let features: Vec<Value> = ids
            .iter()
            .map(|id| {
                json!({
                    "type": "Feature",
                    "properties": {"area_numbe": id, "community": format!("AREA {id}")},
                    "geometry": {"type": "Point", "coordinates": [0, 0]}
                })
            })
            .collect();
        let text = json!({"type": "FeatureCollection", "features": features}).to_string();
        parse_polygons(&text, Path::new("test.geojson")).unwrap()
    }

    #[test]
    fn joins_matching_rows_and_counts_unmatched() {
        let records = vec![
            record(Some(1), "Rogers Park", 12.4),
            record(Some(2), "West Ridge", 8.1),
        ];
        let index = AreaIndex::build(&records);
        let (merged, report) = left_join(polygons(&["1", "2", "3"]), &index);

        assert_eq!(merged.len(), 3);
        assert_eq!(
            report,
            JoinReport {
                features: 3,
                matched: 2,
                unmatched: 1
            }
        );
        assert_eq!(merged[0].properties["pct_poverty"], json!(12.4));
        assert_eq!(merged[1].properties["pct_poverty"], json!(8.1));
        assert!(!merged[2].properties.contains_key("pct_poverty"));
        assert_eq!(merged[2].properties[CA_ID], json!(3));
        assert_eq!(merged[2].properties[CA_NAME], json!("AREA 3"));
    }

    #[test]
    fn matched_rows_supply_display_name() {
        let records = vec![record(Some(1), "Rogers Park", 12.4)];
        let index = AreaIndex::build(&records);
        let (merged, _) = left_join(polygons(&["1"]), &index);

        assert_eq!(merged[0].properties[CA_NAME], json!("Rogers Park"));
        assert_eq!(merged[0].properties[CA_ID], json!(1));
    }

    #[test]
    fn property_order_is_polygon_then_ids_then_attributes() {
        let records = vec![record(Some(1), "Rogers Park", 12.4)];
        let index = AreaIndex::build(&records);
        let (merged, _) = left_join(polygons(&["1"]), &index);

        let keys: Vec<&str> = merged[0].properties.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            ["area_numbe", "community", CA_ID, CA_NAME, "GEOG", "pct_poverty"]
        );
    }

    #[test]
    fn duplicate_ids_keep_last_row() {
        let records = vec![
            record(Some(1), "First", 1.0),
            record(Some(1), "Second", 2.0),
        ];
        let index = AreaIndex::build(&records);

        assert_eq!(index.len(), 1);
        assert_eq!(index.duplicates(), 1);
        assert_eq!(index.get(1).unwrap().name.as_deref(), Some("Second"));
    }

    #[test]
    fn rows_without_ids_are_not_indexed() {
        let records = vec![record(None, "Nowhere", 1.0), record(Some(4), "Uptown", 2.0)];
        let index = AreaIndex::build(&records);

        assert_eq!(index.len(), 1);
        assert_eq!(index.unindexed(), 1);
    }

    #[test]
    fn polygon_without_resolvable_id_is_unmatched() {
        let records = vec![record(Some(1), "Rogers Park", 12.4)];
        let index = AreaIndex::build(&records);
        let (merged, report) = left_join(polygons(&["n/a"]), &index);

        assert_eq!(report.unmatched, 1);
        assert_eq!(merged[0].properties[CA_ID], Value::Null);
        assert!(!merged[0].properties.contains_key("pct_poverty"));
    }
}
