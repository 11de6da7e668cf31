use crate::loader::error::LoadError;
use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DataStoryError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("Failed processing DataFrame: {0}")]
    Polars(#[from] PolarsError),

    #[error("{rows} records in '{path}' have no timestamp")]
    MissingTimestamp { path: PathBuf, rows: usize },

    #[error("Failed to create output directory '{0}'")]
    OutputDirCreation(PathBuf, #[source] std::io::Error),

    #[error("Failed to write report '{0}'")]
    ReportWrite(PathBuf, #[source] std::io::Error),

    #[error("Failed to serialise report")]
    Serialize(#[from] serde_json::Error),
}
