// badger-common/src/config.rs
use std::env;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{BadgerError, Result};
use crate::settings::Settings;

const APP_DIR_NAME: &str = "badgerdrop";
const LEDGER_FILENAME: &str = "installed.json";
const SETTINGS_FILENAME: &str = "settings.json";

/// Resolved per-user directories plus the loaded settings.
#[derive(Debug, Clone)]
pub struct Config {
    /// `~/.config/badgerdrop`: ledger, settings, logs.
    pub config_dir: PathBuf,
    /// `~/.local/share`: launcher descriptors and icon theme live below it.
    pub data_dir: PathBuf,
    pub home_dir: PathBuf,
    pub settings: Settings,
}

impl Config {
    pub fn load() -> Result<Self> {
        debug!("Loading badgerdrop configuration");

        let home_dir = dirs::home_dir().ok_or_else(|| {
            BadgerError::Config("Could not determine the home directory".to_string())
        })?;

        let config_dir = match env::var("BADGERDROP_CONFIG_DIR").ok().filter(|s| !s.is_empty()) {
            Some(dir) => PathBuf::from(dir),
            None => dirs::config_dir()
                .unwrap_or_else(|| home_dir.join(".config"))
                .join(APP_DIR_NAME),
        };

        let data_dir = match env::var("BADGERDROP_DATA_DIR").ok().filter(|s| !s.is_empty()) {
            Some(dir) => PathBuf::from(dir),
            None => dirs::data_dir().unwrap_or_else(|| home_dir.join(".local").join("share")),
        };

        debug!("Config dir: {}", config_dir.display());
        debug!("Data dir: {}", data_dir.display());

        Ok(Self::with_roots(config_dir, data_dir, home_dir))
    }

    /// Builds a config from explicit roots and loads settings from `config_dir`.
    pub fn with_roots(config_dir: PathBuf, data_dir: PathBuf, home_dir: PathBuf) -> Self {
        let settings = Settings::load(&config_dir.join(SETTINGS_FILENAME));
        Self {
            config_dir,
            data_dir,
            home_dir,
            settings,
        }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn ledger_path(&self) -> PathBuf {
        self.config_dir.join(LEDGER_FILENAME)
    }

    pub fn settings_path(&self) -> PathBuf {
        self.config_dir.join(SETTINGS_FILENAME)
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.config_dir.join("logs")
    }

    /// Managed directory that receives copied bundles.
    pub fn applications_dir(&self) -> PathBuf {
        self.expand_home(&self.settings.install_directory)
    }

    /// `~/.local/share/applications`: desktop-launcher descriptors.
    pub fn launchers_dir(&self) -> PathBuf {
        self.data_dir.join("applications")
    }

    /// `~/.local/share/icons/hicolor`
    pub fn icons_dir(&self) -> PathBuf {
        self.data_dir.join("icons").join("hicolor")
    }

    pub fn save_settings(&self) -> Result<()> {
        self.settings.save(&self.settings_path())
    }

    fn expand_home(&self, raw: &str) -> PathBuf {
        if raw == "~" {
            self.home_dir.clone()
        } else if let Some(rest) = raw.strip_prefix("~/") {
            self.home_dir.join(rest)
        } else {
            PathBuf::from(raw)
        }
    }
}
