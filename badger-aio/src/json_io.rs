// badger-aio/src/json_io.rs
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use badger_common::error::{BadgerError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

/// Writes serializable data to a JSON file (pretty-printed), creating the
/// parent directory. This is a plain truncate-and-write, not an atomic replace.
pub fn write_json_sync<T: Serialize>(path: &Path, data: &T) -> Result<()> {
    debug!("Sync Writing JSON to: {}", path.display());
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::File::create(path)?;
    let mut writer = std::io::BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, data).map_err(|e| BadgerError::Json(Arc::new(e)))?;
    writer.flush()?;
    Ok(())
}

/// Reads and deserializes data from a JSON file.
pub fn read_json_sync<T: DeserializeOwned>(path: &Path) -> Result<T> {
    debug!("Sync Reading JSON from: {}", path.display());
    let file = std::fs::File::open(path)?;
    let reader = std::io::BufReader::new(file);
    serde_json::from_reader(reader).map_err(|e| BadgerError::Json(Arc::new(e)))
}
