use std::path::PathBuf;
use thiserror::Error;

/// Fatal ingest conditions. Each one needs operator action and a re-run.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Missing file at {path}. {hint}")]
    MissingFile { path: PathBuf, hint: String },

    #[error("{path} must include a community id column (one of: {expected})")]
    MissingIdColumn { path: PathBuf, expected: String },

    #[error("Missing polygons. {expected}")]
    NoPolygonSource { expected: String },

    #[error("{path} has no features")]
    NoFeatures { path: PathBuf },

    #[error("region '{region}' is not supported (supported: {supported})")]
    UnsupportedRegion { region: String, supported: String },

    #[error("Failed reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed parsing CSV {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Failed parsing JSON {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, IngestError>;
