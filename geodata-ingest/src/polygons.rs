//! Polygon (GeoJSON) source loading.
//!
//! Geometries are kept as raw JSON text so they reach the output exactly as
//! they appeared in the source file.

use crate::error::{IngestError, Result};
use serde::Deserialize;
use serde_json::value::RawValue;
use serde_json::{Map, Value};
use std::path::Path;

/// One polygon feature from the geometry source.
#[derive(Debug, Deserialize)]
pub struct PolygonFeature {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub properties: Map<String, Value>,
    #[serde(default)]
    pub geometry: Option<Box<RawValue>>,
}

#[derive(Debug, Deserialize)]
struct PolygonCollection {
    #[serde(default)]
    features: Option<Vec<PolygonFeature>>,
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Map<String, Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Map<String, Value>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Reads the polygon collection at `path`. An empty or absent `features`
/// sequence is fatal.
pub fn load_polygons(path: &Path) -> Result<Vec<PolygonFeature>> {
    tracing::info!(path = %path.display(), "Reading community area polygons");
    let text = std::fs::read_to_string(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_polygons(&text, path)
}

/// Parses a polygon collection from GeoJSON text.
pub fn parse_polygons(text: &str, source: &Path) -> Result<Vec<PolygonFeature>> {
    let collection: PolygonCollection =
        serde_json::from_str(text).map_err(|e| IngestError::Json {
            path: source.to_path_buf(),
            source: e,
        })?;

    match collection.features {
        Some(features) if !features.is_empty() => Ok(features),
        _ => Err(IngestError::NoFeatures {
            path: source.to_path_buf(),
        }),
    }
}
