//! Per-region dataset naming conventions.

use crate::discovery::SourceStrategy;
use crate::error::{IngestError, Result};
use std::path::{Path, PathBuf};

/// File naming conventions for one supported region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionProfile {
    pub region: &'static str,
    /// Layer name used in the processed file, `<region>_<layer>.geojson`.
    pub layer: &'static str,
    pub table_file: &'static str,
    /// Polygon filenames tried in order before falling back to a scan.
    pub polygon_candidates: &'static [&'static str],
    pub polygon_keywords: &'static [&'static str],
    pub polygon_hint: &'static str,
}

pub const CHICAGO: RegionProfile = RegionProfile {
    region: "chicago",
    layer: "cca25",
    table_file: "CCA_25_chi_csv.csv",
    polygon_candidates: &[
        "chicago_community_areas.geojson",
        "Boundaries_-_Community_Areas.geojson",
        "Boundaries_-_Community_Areas_20251005.geojson",
    ],
    polygon_keywords: &["community", "area"],
    polygon_hint: "Put the City of Chicago 'Community Areas (current)' GeoJSON under the \
                   datasets directory with a name like 'chicago_community_areas.geojson' or \
                   'Boundaries_-_Community_Areas_*.geojson'.",
};

pub const SUPPORTED: &[RegionProfile] = &[CHICAGO];

impl RegionProfile {
    /// Looks up a region by name, ignoring case and surrounding whitespace.
    pub fn for_region(region: &str) -> Result<Self> {
        let wanted = region.trim().to_lowercase();
        SUPPORTED
            .iter()
            .find(|profile| profile.region == wanted)
            .copied()
            .ok_or_else(|| IngestError::UnsupportedRegion {
                region: wanted,
                supported: SUPPORTED
                    .iter()
                    .map(|p| p.region)
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }

    pub fn table_path(&self, datasets_dir: &Path) -> PathBuf {
        datasets_dir.join(self.table_file)
    }

    pub fn table_hint(&self) -> String {
        format!("Place {} under the datasets directory.", self.table_file)
    }

    /// Exact candidates first, then a keyword scan of the datasets directory.
    pub fn polygon_strategies(&self, datasets_dir: &Path) -> Vec<SourceStrategy> {
        self.polygon_candidates
            .iter()
            .map(|name| SourceStrategy::Exact(datasets_dir.join(name)))
            .chain(std::iter::once(SourceStrategy::Scan {
                dir: datasets_dir.to_path_buf(),
                extension: "geojson".to_string(),
                keywords: self.polygon_keywords.iter().map(|k| k.to_string()).collect(),
            }))
            .collect()
    }

    pub fn output_path(&self, processed_dir: &Path) -> PathBuf {
        processed_dir.join(format!("{}_{}.geojson", self.region, self.layer))
    }
}
