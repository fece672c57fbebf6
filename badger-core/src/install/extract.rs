// Path: badger-core/src/install/extract.rs
//! Self-extraction of AppImage bundles into scoped temporary directories.

use std::path::{Path, PathBuf};

use badger_aio::fs::{add_mode_bits, is_executable, EXEC_BITS};
use badger_aio::process::run_command_sync;
use badger_common::error::{BadgerError, Result};
use badger_common::Settings;
use tempfile::TempDir;
use tracing::{debug, warn};

/// Flag understood by every type-2 AppImage runtime.
const SELF_EXTRACT_FLAG: &str = "--appimage-extract";
/// Directory the runtime creates inside its working directory.
const EXTRACTED_ROOT_NAME: &str = "squashfs-root";
const TEMP_PREFIX: &str = "badgerdrop_";

#[derive(Debug, Clone)]
pub struct BundleExtractor {
    /// Add the execute bit instead of failing on non-executable bundles.
    pub auto_make_executable: bool,
    /// Persist the temp dir of a failed extraction for inspection.
    pub keep_failed_extractions: bool,
}

impl Default for BundleExtractor {
    fn default() -> Self {
        Self {
            auto_make_executable: true,
            keep_failed_extractions: false,
        }
    }
}

impl BundleExtractor {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            auto_make_executable: settings.auto_make_executable,
            keep_failed_extractions: false,
        }
    }

    pub fn keep_failed_extractions(mut self, keep: bool) -> Self {
        self.keep_failed_extractions = keep;
        self
    }

    /// Runs the bundle's self-extraction into a fresh temporary directory.
    /// Blocks until the runtime exits.
    pub fn extract(&self, bundle_path: &Path) -> Result<ExtractedBundle> {
        if !bundle_path.exists() {
            return Err(BadgerError::NotFound(bundle_path.display().to_string()));
        }
        // The runtime is started from inside the temp dir, so relative paths
        // must be resolved first.
        let program = bundle_path.canonicalize()?;
        self.ensure_executable(&program)?;

        let workdir = tempfile::Builder::new().prefix(TEMP_PREFIX).tempdir()?;
        debug!(
            "Extracting AppImage {} to: {}",
            program.display(),
            workdir.path().display()
        );

        let output = run_command_sync(&program, &[SELF_EXTRACT_FLAG], Some(workdir.path()))
            .map_err(|e| {
                BadgerError::Extraction(format!("could not run {}: {e}", program.display()))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            if self.keep_failed_extractions {
                let kept = workdir.keep();
                warn!("Keeping failed extraction directory {}", kept.display());
            }
            return Err(BadgerError::Extraction(if stderr.is_empty() {
                format!("self-extraction exited with {}", output.status)
            } else {
                stderr
            }));
        }

        Ok(ExtractedBundle::from_tempdir(workdir))
    }

    fn ensure_executable(&self, path: &Path) -> Result<()> {
        if is_executable(path)? {
            return Ok(());
        }
        if !self.auto_make_executable {
            return Err(BadgerError::Permission(format!(
                "{} is not executable",
                path.display()
            )));
        }
        debug!("Making AppImage executable: {}", path.display());
        add_mode_bits(path, EXEC_BITS).map_err(|e| {
            BadgerError::Permission(format!(
                "Cannot make {} executable: {e}",
                path.display()
            ))
        })
    }
}

/// An extracted bundle tree. The directory is deleted by [`release`] or on drop.
///
/// [`release`]: ExtractedBundle::release
#[derive(Debug)]
pub struct ExtractedBundle {
    workdir: Option<TempDir>,
    workdir_path: PathBuf,
    root: PathBuf,
}

impl ExtractedBundle {
    /// Adopts a temp dir whose `squashfs-root` holds the payload tree.
    pub fn from_tempdir(workdir: TempDir) -> Self {
        let workdir_path = workdir.path().to_path_buf();
        let root = workdir_path.join(EXTRACTED_ROOT_NAME);
        Self {
            workdir: Some(workdir),
            workdir_path,
            root,
        }
    }

    /// Root of the payload tree (`<tmp>/squashfs-root`).
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The temporary directory that owns the tree.
    pub fn workdir(&self) -> &Path {
        &self.workdir_path
    }

    pub fn is_released(&self) -> bool {
        self.workdir.is_none()
    }

    /// Deletes the temporary tree. Safe to call more than once.
    pub fn release(&mut self) {
        if let Some(dir) = self.workdir.take() {
            debug!("Removing extraction directory {}", self.workdir_path.display());
            if let Err(e) = dir.close() {
                warn!(
                    "Failed to remove extraction directory {}: {}",
                    self.workdir_path.display(),
                    e
                );
            }
        }
    }

    /// Leaves the tree on disk and returns its location.
    pub fn persist(mut self) -> PathBuf {
        if let Some(dir) = self.workdir.take() {
            return dir.keep();
        }
        self.workdir_path.clone()
    }
}
