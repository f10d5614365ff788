//! Serialization of the merged layer.

use crate::error::{IngestError, Result};
use crate::join::MergedFeature;
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Serialize)]
struct FeatureCollection<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    features: &'a [MergedFeature],
}

/// Renders features as a GeoJSON FeatureCollection.
pub fn to_geojson(features: &[MergedFeature]) -> serde_json::Result<Vec<u8>> {
    serde_json::to_vec(&FeatureCollection {
        kind: "FeatureCollection",
        features,
    })
}

/// Writes the collection to `path`, creating parent directories and
/// replacing whatever was there before.
pub fn write_collection(path: &Path, features: &[MergedFeature]) -> Result<()> {
    let io_error = |source: std::io::Error| IngestError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_error)?;
    }

    let body = to_geojson(features).map_err(|source| IngestError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path, body).map_err(io_error)
}
