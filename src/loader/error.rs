use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read dataset '{0}'")]
    FileRead(PathBuf, #[source] std::io::Error),

    #[error("Parsing error processing CSV data from '{path}'")]
    CsvParse {
        path: PathBuf,
        #[source]
        source: PolarsError,
    },

    #[error("Missing required column '{column}' in '{path}'")]
    MissingColumn { path: PathBuf, column: String },
}
