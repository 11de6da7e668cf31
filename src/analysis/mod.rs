pub mod exchange;
pub mod traffic;

use crate::error::DataStoryError;
use crate::utils::ensure_dir_exists;
use log::info;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Writes `report` as pretty-printed JSON, creating the parent directory if needed.
pub(crate) fn write_json<T: Serialize>(report: &T, path: &Path) -> Result<(), DataStoryError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_dir_exists(parent)?;
    }
    let file =
        File::create(path).map_err(|e| DataStoryError::ReportWrite(path.to_path_buf(), e))?;
    serde_json::to_writer_pretty(BufWriter::new(file), report)?;
    info!("Wrote report to {}", path.display());
    Ok(())
}
