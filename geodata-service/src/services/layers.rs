//! Read-only access to processed GeoJSON layers on disk.

use crate::models::AreaSummary;
use crate::services::metrics;
use serde::Deserialize;
use serde_json::{Map, Value};
use service_core::error::AppError;
use std::path::PathBuf;

/// Property keys tried, in order, for an area's identifier in a processed layer.
const AREA_ID_KEYS: &[&str] = &["CA_ID", "area_numbe", "area_num"];

/// Property keys tried, in order, for an area's display name.
const AREA_NAME_KEYS: &[&str] = &["CA_NAME", "community", "GEOG"];

pub type JsonObject = Map<String, Value>;

/// Body served when a layer has not been built yet.
pub const EMPTY_COLLECTION: &str = r#"{"type":"FeatureCollection","features":[]}"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    /// Community areas joined with CCA statistics.
    Cca25,
    FoodAccess,
}

impl Layer {
    pub fn as_str(&self) -> &'static str {
        match self {
            Layer::Cca25 => "cca25",
            Layer::FoodAccess => "food_access",
        }
    }
}

/// Result of looking up one area by identifier.
#[derive(Debug, PartialEq)]
pub enum AreaLookup {
    Found(JsonObject),
    NotFound,
    DatasetMissing,
}

#[derive(Debug, Clone)]
pub struct LayerStore {
    processed_dir: PathBuf,
}

impl LayerStore {
    pub fn new(processed_dir: impl Into<PathBuf>) -> Self {
        Self {
            processed_dir: processed_dir.into(),
        }
    }

    pub fn processed_dir(&self) -> &std::path::Path {
        &self.processed_dir
    }

    /// Path of `<city>_<layer>.geojson`. City names are restricted to
    /// ASCII letters, digits, `_` and `-` so they cannot leave the directory.
    pub fn layer_path(&self, city: &str, layer: Layer) -> Result<PathBuf, AppError> {
        let valid = !city.is_empty()
            && city
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "invalid city '{}'",
                city
            )));
        }
        Ok(self
            .processed_dir
            .join(format!("{}_{}.geojson", city, layer.as_str())))
    }

    /// Raw file contents, or `None` if the layer has not been built.
    pub async fn read_raw(&self, city: &str, layer: Layer) -> Result<Option<String>, AppError> {
        let path = self.layer_path(city, layer)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(text) => {
                metrics::record_layer_read(layer.as_str(), "served");
                Ok(Some(text))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "Layer not built yet");
                metrics::record_layer_read(layer.as_str(), "absent");
                Ok(None)
            }
            Err(e) => Err(AppError::InternalError(
                anyhow::Error::new(e).context(format!("reading {}", path.display())),
            )),
        }
    }

    /// Feature properties of a layer, or `None` if the layer has not been
    /// built. Geometry is not inspected; features without properties are
    /// skipped.
    pub async fn read_properties(
        &self,
        city: &str,
        layer: Layer,
    ) -> Result<Option<Vec<JsonObject>>, AppError> {
        let Some(text) = self.read_raw(city, layer).await? else {
            return Ok(None);
        };
        let collection: PropertiesOnly = serde_json::from_str(&text).map_err(|e| {
            AppError::InternalError(anyhow::anyhow!(
                "{}_{} layer is not a valid FeatureCollection: {}",
                city,
                layer.as_str(),
                e
            ))
        })?;
        Ok(Some(
            collection
                .features
                .into_iter()
                .filter_map(|feature| feature.properties)
                .collect(),
        ))
    }

    /// Distinct (id, name) pairs of the community-area layer, sorted by
    /// name then id. Features without an id are skipped.
    pub async fn area_names(&self, city: &str) -> Result<Vec<AreaSummary>, AppError> {
        let Some(features) = self.read_properties(city, Layer::Cca25).await? else {
            return Ok(Vec::new());
        };

        let mut names: Vec<AreaSummary> = Vec::new();
        for props in &features {
            let Some(id) = first_present(props, AREA_ID_KEYS) else {
                continue;
            };
            let name = first_present(props, AREA_NAME_KEYS)
                .cloned()
                .unwrap_or(Value::Null);

            let summary = AreaSummary {
                id: id.clone(),
                name,
            };
            if !names.contains(&summary) {
                names.push(summary);
            }
        }

        names.sort_by_cached_key(|area| (sort_text(&area.name), sort_text(&area.id)));
        Ok(names)
    }

    /// Properties of the first feature whose resolved id, compared as text,
    /// equals `id`.
    pub async fn area_properties(&self, city: &str, id: &str) -> Result<AreaLookup, AppError> {
        let Some(features) = self.read_properties(city, Layer::Cca25).await? else {
            return Ok(AreaLookup::DatasetMissing);
        };

        let found = features.into_iter().find_map(|props| {
            let matches = first_present(&props, AREA_ID_KEYS)
                .is_some_and(|value| id_text(value) == id);
            matches.then_some(props)
        });

        Ok(found.map_or(AreaLookup::NotFound, AreaLookup::Found))
    }
}

/// The parts of a FeatureCollection the lookups need.
#[derive(Debug, Deserialize)]
struct PropertiesOnly {
    #[serde(default)]
    features: Vec<FeatureProperties>,
}

#[derive(Debug, Deserialize)]
struct FeatureProperties {
    #[serde(default)]
    properties: Option<JsonObject>,
}

/// First candidate key holding a usable value (not null, not an empty string).
fn first_present<'a>(props: &'a JsonObject, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| props.get(*key))
        .find(|value| match value {
            Value::Null => false,
            Value::String(s) => !s.is_empty(),
            _ => true,
        })
}

/// Text form used for id comparison: strings bare, everything else as JSON.
fn id_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Sort key; a missing name sorts as the empty string.
fn sort_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        other => id_text(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn store_with(body: Value) -> (TempDir, LayerStore) {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("chicago_cca25.geojson"),
            body.to_string(),
        )
        .unwrap();
        let store = LayerStore::new(dir.path());
        (dir, store)
    }

    fn feature(props: Value) -> Value {
        json!({"type": "Feature", "geometry": null, "properties": props})
    }

    #[test]
    fn rejects_city_names_with_path_segments() {
        let store = LayerStore::new("/data");
        assert!(store.layer_path("../etc", Layer::Cca25).is_err());
        assert!(store.layer_path("", Layer::Cca25).is_err());
        assert_eq!(
            store.layer_path("chicago", Layer::FoodAccess).unwrap(),
            PathBuf::from("/data/chicago_food_access.geojson")
        );
    }

    #[tokio::test]
    async fn missing_layer_reads_as_none() {
        let dir = TempDir::new().unwrap();
        let store = LayerStore::new(dir.path());
        assert_eq!(store.read_raw("chicago", Layer::Cca25).await.unwrap(), None);
        assert_eq!(
            store.area_properties("chicago", "1").await.unwrap(),
            AreaLookup::DatasetMissing
        );
        assert!(store.area_names("chicago").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn names_are_deduplicated_and_sorted() {
        let (_dir, store) = store_with(json!({
            "type": "FeatureCollection",
            "features": [
                feature(json!({"CA_ID": 2, "CA_NAME": "West Ridge"})),
                feature(json!({"CA_ID": 1, "CA_NAME": "Rogers Park"})),
                feature(json!({"CA_ID": 2, "CA_NAME": "West Ridge"})),
                feature(json!({"CA_ID": null, "area_num": "9", "community": "EDISON PARK"})),
                feature(json!({"CA_ID": null, "CA_NAME": "No Id"})),
                feature(json!({"CA_ID": 77})),
            ]
        }));

        let names = store.area_names("chicago").await.unwrap();

        assert_eq!(
            names,
            vec![
                AreaSummary { id: json!(77), name: Value::Null },
                AreaSummary { id: json!("9"), name: json!("EDISON PARK") },
                AreaSummary { id: json!(1), name: json!("Rogers Park") },
                AreaSummary { id: json!(2), name: json!("West Ridge") },
            ]
        );
    }

    #[tokio::test]
    async fn area_lookup_compares_ids_as_text() {
        let (_dir, store) = store_with(json!({
            "type": "FeatureCollection",
            "features": [
                feature(json!({"CA_ID": 5, "CA_NAME": "North Center"})),
                feature(json!({"CA_ID": null, "area_numbe": "6", "community": "LAKE VIEW"})),
            ]
        }));

        match store.area_properties("chicago", "5").await.unwrap() {
            AreaLookup::Found(props) => assert_eq!(props["CA_NAME"], json!("North Center")),
            other => panic!("expected a match, got {:?}", other),
        }
        match store.area_properties("chicago", "6").await.unwrap() {
            AreaLookup::Found(props) => assert_eq!(props["community"], json!("LAKE VIEW")),
            other => panic!("expected a match, got {:?}", other),
        }
        assert_eq!(
            store.area_properties("chicago", "05").await.unwrap(),
            AreaLookup::NotFound
        );
    }

    #[tokio::test]
    async fn ids_of_different_types_are_listed_separately() {
        let (_dir, store) = store_with(json!({
            "type": "FeatureCollection",
            "features": [
                feature(json!({"CA_ID": 1, "CA_NAME": "Rogers Park"})),
                feature(json!({"CA_ID": "1", "CA_NAME": "Rogers Park"})),
                feature(json!({"CA_ID": 1, "CA_NAME": "Rogers Park"})),
            ]
        }));

        let names = store.area_names("chicago").await.unwrap();

        assert_eq!(
            names,
            vec![
                AreaSummary { id: json!(1), name: json!("Rogers Park") },
                AreaSummary { id: json!("1"), name: json!("Rogers Park") },
            ]
        );
    }

    #[tokio::test]
    async fn lookups_ignore_geometry() {
        let (_dir, store) = store_with(json!({
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "geometry": {"type": "Polygon"},
                 "properties": {"CA_ID": 1, "CA_NAME": "Rogers Park", "pct_poverty": 12.4}},
                {"type": "Feature", "properties": {"CA_ID": 2, "CA_NAME": "West Ridge"}},
                {"type": "Feature", "geometry": null},
            ]
        }));

        assert_eq!(
            store.area_names("chicago").await.unwrap(),
            vec![
                AreaSummary { id: json!(1), name: json!("Rogers Park") },
                AreaSummary { id: json!(2), name: json!("West Ridge") },
            ]
        );
        match store.area_properties("chicago", "1").await.unwrap() {
            AreaLookup::Found(props) => assert_eq!(props["pct_poverty"], json!(12.4)),
            other => panic!("expected a match, got {:?}", other),
        }
        assert!(matches!(
            store.area_properties("chicago", "2").await.unwrap(),
            AreaLookup::Found(_)
        ));
    }

    #[tokio::test]
    async fn corrupt_layer_is_an_internal_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("chicago_cca25.geojson"), "{oops").unwrap();
        let store = LayerStore::new(dir.path());

        assert!(matches!(
            store.area_names("chicago").await,
            Err(AppError::InternalError(_))
        ));
    }
}
