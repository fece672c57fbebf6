// badger-core/src/installed.rs
//! The installed-apps ledger: every installation recorded in one JSON file.
//!
//! Each [`Ledger`] value holds its own snapshot and rewrites the whole file on
//! every mutation. There is no file lock: two processes mutating the ledger at
//! once race, and the last writer wins.

use std::path::{Path, PathBuf};

use badger_aio::json_io::{read_json_sync, write_json_sync};
use badger_common::error::Result;
use badger_common::model::InstalledApp;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(Debug, Default, Serialize, Deserialize)]
struct LedgerFile {
    #[serde(default)]
    apps: Vec<InstalledApp>,
}

#[derive(Debug, Clone)]
pub struct Ledger {
    path: PathBuf,
    apps: Vec<InstalledApp>,
}

impl Ledger {
    /// Loads the ledger at `path`. A missing file is an empty ledger; so is a
    /// corrupt one, which is logged and otherwise ignored.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let apps = if path.is_file() {
            match read_json_sync::<LedgerFile>(&path) {
                Ok(file) => file.apps,
                Err(e) => {
                    warn!(
                        "Installed-apps ledger {} is unreadable, starting empty: {}",
                        path.display(),
                        e
                    );
                    Vec::new()
                }
            }
        } else {
            debug!("No ledger at {}, starting empty", path.display());
            Vec::new()
        };
        Self { path, apps }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.apps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.apps.is_empty()
    }

    /// Records `app`, replacing any entry with the same `install_path`.
    pub fn add(&mut self, app: InstalledApp) -> Result<()> {
        debug!("Recording {} at {}", app.name, app.install_path);
        self.apps.retain(|a| a.install_path != app.install_path);
        self.apps.push(app);
        self.save()
    }

    /// Drops every entry for `install_path`. Returns whether one existed.
    pub fn remove(&mut self, install_path: &str) -> Result<bool> {
        let before = self.apps.len();
        self.apps.retain(|a| a.install_path != install_path);
        let removed = self.apps.len() != before;
        debug!("Removing {} from ledger (found: {})", install_path, removed);
        self.save()?;
        Ok(removed)
    }

    /// All records, newest `install_date` first. Equal dates keep insertion order.
    pub fn list_all(&self) -> Vec<InstalledApp> {
        let mut apps = self.apps.clone();
        apps.sort_by(|a, b| b.install_date.cmp(&a.install_date));
        apps
    }

    /// Case-insensitive exact match on the display name.
    pub fn find_by_name(&self, name: &str) -> Option<&InstalledApp> {
        let wanted = name.to_lowercase();
        self.apps.iter().find(|a| a.name.to_lowercase() == wanted)
    }

    /// Exact match on the final segment of `install_path`.
    pub fn find_by_install_path_basename(&self, filename: &str) -> Option<&InstalledApp> {
        self.apps
            .iter()
            .find(|a| a.install_filename() == Some(filename))
    }

    pub fn is_installed(&self, name: &str) -> bool {
        self.find_by_name(name).is_some()
    }

    fn save(&self) -> Result<()> {
        let file = LedgerFile {
            apps: self.apps.clone(),
        };
        write_json_sync(&self.path, &file)
    }
}
