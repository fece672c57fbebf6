// badger-common/src/settings.rs
//! User settings persisted as `settings.json` next to the ledger.
//!
//! Keys written by other front-ends (sound and notification toggles of the
//! graphical drop target) are ignored when reading. A missing, unreadable or
//! malformed file yields the defaults; only saving can fail.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{BadgerError, Result};

pub const DEFAULT_INSTALL_DIRECTORY: &str = "~/Applications";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Add the execute bit to a bundle before self-extraction instead of failing.
    pub auto_make_executable: bool,
    /// Where installed bundles are copied. `~` expands to the home directory.
    pub install_directory: String,
    /// Run the `--version` probe that detects runtimes needing `--no-sandbox`.
    pub probe_sandbox: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            auto_make_executable: true,
            install_directory: DEFAULT_INSTALL_DIRECTORY.to_string(),
            probe_sandbox: true,
        }
    }
}

impl Settings {
    pub fn load(path: &Path) -> Self {
        if !path.is_file() {
            debug!("No settings file at {}, using defaults", path.display());
            return Self::default();
        }
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Could not read settings {}: {}", path.display(), e);
                return Self::default();
            }
        };
        match serde_json::from_str::<Settings>(&raw) {
            Ok(settings) => settings,
            Err(e) => {
                warn!(
                    "Ignoring malformed settings file {}: {}",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        debug!("Writing settings to {}", path.display());
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Updates one setting from its CLI spelling (`auto-make-executable`,
    /// `install-directory`, `probe-sandbox`; underscores accepted too).
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key.replace('-', "_").as_str() {
            "auto_make_executable" => self.auto_make_executable = parse_bool(key, value)?,
            "probe_sandbox" => self.probe_sandbox = parse_bool(key, value)?,
            "install_directory" => {
                let value = value.trim();
                if value.is_empty() {
                    return Err(BadgerError::Config(
                        "install-directory cannot be empty".to_string(),
                    ));
                }
                self.install_directory = value.to_string();
            }
            _ => {
                return Err(BadgerError::Config(format!("Unknown setting '{key}'")));
            }
        }
        Ok(())
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        other => Err(BadgerError::Config(format!(
            "Invalid value '{other}' for {key}: expected true or false"
        ))),
    }
}
