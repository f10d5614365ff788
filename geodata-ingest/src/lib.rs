//! Joins per-area statistics (CSV) onto community-area polygons (GeoJSON)
//! and writes the processed layer served by `geodata-service`.

pub mod discovery;
pub mod error;
pub mod join;
pub mod normalize;
pub mod pipeline;
pub mod polygons;
pub mod region;
pub mod table;
pub mod writer;

pub use error::IngestError;
pub use pipeline::{run_join, IngestPaths, JoinOutcome};
