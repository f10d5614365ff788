//! The `join` batch: load, index, join, write.

use crate::discovery::discover;
use crate::error::{IngestError, Result};
use crate::join::{left_join, AreaIndex, JoinReport};
use crate::polygons::load_polygons;
use crate::region::RegionProfile;
use crate::table::load_area_table;
use crate::writer::write_collection;
use std::path::{Path, PathBuf};

/// Where inputs are read from and outputs written to.
#[derive(Debug, Clone)]
pub struct IngestPaths {
    pub datasets_dir: PathBuf,
    pub processed_dir: PathBuf,
}

impl IngestPaths {
    /// Uses `<datasets_dir>/processed` unless an output directory is given.
    pub fn new(datasets_dir: impl Into<PathBuf>, processed_dir: Option<PathBuf>) -> Self {
        let datasets_dir = datasets_dir.into();
        let processed_dir = processed_dir.unwrap_or_else(|| datasets_dir.join("processed"));
        Self {
            datasets_dir,
            processed_dir,
        }
    }
}

/// Result of a successful run.
#[derive(Debug, Clone)]
pub struct JoinOutcome {
    pub output: PathBuf,
    pub report: JoinReport,
}

/// Finds the polygon file for `profile`, failing with the naming conventions
/// the operator should follow.
pub fn find_polygon_source(profile: &RegionProfile, datasets_dir: &Path) -> Result<PathBuf> {
    discover(&profile.polygon_strategies(datasets_dir)).ok_or_else(|| {
        IngestError::NoPolygonSource {
            expected: profile.polygon_hint.to_string(),
        }
    })
}

/// Builds the processed layer for `region`.
pub fn run_join(region: &str, paths: &IngestPaths) -> Result<JoinOutcome> {
    let profile = RegionProfile::for_region(region)?;

    let table = load_area_table(
        &profile.table_path(&paths.datasets_dir),
        &profile.table_hint(),
    )?;
    let polygon_path = find_polygon_source(&profile, &paths.datasets_dir)?;
    let polygons = load_polygons(&polygon_path)?;

    let index = AreaIndex::build(&table.records);
    tracing::debug!(
        rows = table.records.len(),
        indexed = index.len(),
        unindexed = index.unindexed(),
        "Built area index"
    );

    let (merged, report) = left_join(polygons, &index);

    let output = profile.output_path(&paths.processed_dir);
    write_collection(&output, &merged)?;
    tracing::info!(
        path = %output.display(),
        features = report.features,
        matched = report.matched,
        unmatched = report.unmatched,
        "Wrote {} with {} features",
        output.display(),
        report.features
    );

    Ok(JoinOutcome { output, report })
}
