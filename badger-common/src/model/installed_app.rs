// badger-common/src/model/installed_app.rs
use std::path::Path;

use serde::{Deserialize, Serialize};

pub const UNKNOWN_VERSION: &str = "unknown";

/// One installation recorded in the ledger. `install_path` is the unique key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstalledApp {
    pub name: String,
    pub version: String,
    /// Where the bundle was installed from.
    pub source_path: String,
    /// Where the bundle was copied to.
    pub install_path: String,
    pub icon_name: String,
    pub categories: Vec<String>,
    /// ISO-8601 local timestamp, e.g. `2024-03-01T09:00:00.000000`.
    pub install_date: String,
    #[serde(default)]
    pub comment: Option<String>,
    /// Path of the generated launcher descriptor.
    #[serde(default)]
    pub desktop_file: Option<String>,
}

impl InstalledApp {
    /// Final path segment of `install_path`.
    pub fn install_filename(&self) -> Option<&str> {
        Path::new(&self.install_path)
            .file_name()
            .and_then(|name| name.to_str())
    }
}
