// ===== badger-core/src/install/mod.rs =====
//! End-to-end installation of a parsed bundle.
//!
//! Steps run in order: copy bundle, install icon, probe sandbox needs, write
//! launcher, refresh desktop caches, record in the ledger. A failing step
//! aborts the install and leaves what earlier steps produced on disk; naming
//! is deterministic, so a retry overwrites the residue.

use std::path::{Path, PathBuf};

use badger_aio::fs::{add_mode_bits, copy_file_preserving, create_dir_all, write_file_with_mode, EXEC_BITS};
use badger_common::config::Config;
use badger_common::error::{BadgerError, Result};
use badger_common::model::{InstalledApp, UNKNOWN_VERSION};
use tracing::{debug, error, instrument};

use crate::installed::Ledger;
use crate::integration::DesktopIntegration;
use crate::probe::SandboxProbe;

// --- Submodules ---
pub mod descriptor;
pub mod extract;
pub mod icons;
pub mod launcher;

pub use descriptor::{parse_bundle, BundleDescriptor};
pub use extract::{BundleExtractor, ExtractedBundle};
pub use launcher::{sanitize_filename, LauncherEntry};

const LAUNCHER_MODE: u32 = 0o644;
const ICON_FALLBACK_SIZE: &str = "128x128";
const BUNDLE_EXTENSION: &str = "appimage";

/// Whether `path` carries the `.AppImage` extension (any case).
pub fn is_appimage_filename(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(BUNDLE_EXTENSION))
}

/// Target directories of an installation.
#[derive(Debug, Clone)]
pub struct InstallLayout {
    /// Managed directory receiving the bundle copies.
    pub applications_dir: PathBuf,
    /// `~/.local/share/applications`
    pub launchers_dir: PathBuf,
    /// `~/.local/share/icons/hicolor`
    pub icons_dir: PathBuf,
}

impl InstallLayout {
    pub fn from_config(config: &Config) -> Self {
        Self {
            applications_dir: config.applications_dir(),
            launchers_dir: config.launchers_dir(),
            icons_dir: config.icons_dir(),
        }
    }

    pub fn bundle_target(&self, bundle_path: &Path) -> Result<PathBuf> {
        let filename = bundle_path.file_name().ok_or_else(|| {
            BadgerError::Install(format!(
                "Invalid bundle path (no filename): {}",
                bundle_path.display()
            ))
        })?;
        Ok(self.applications_dir.join(filename))
    }

    pub fn launcher_target(&self, display_name: &str) -> PathBuf {
        self.launchers_dir
            .join(format!("{}.desktop", sanitize_filename(display_name)))
    }

    /// Theme path for an icon. Refuses names that would leave `icons_dir`.
    pub fn icon_target(&self, icon_source: &Path, icon_name: &str) -> Result<PathBuf> {
        if !icons::is_plain_icon_name(icon_name) {
            return Err(BadgerError::Install(format!(
                "Refusing to install icon with unsafe name '{icon_name}'"
            )));
        }
        let target = if icons::is_svg(icon_source) {
            self.icons_dir
                .join("scalable")
                .join("apps")
                .join(format!("{icon_name}.svg"))
        } else {
            self.icons_dir
                .join(ICON_FALLBACK_SIZE)
                .join("apps")
                .join(format!("{icon_name}.png"))
        };
        Ok(target)
    }
}

pub struct Installer {
    layout: InstallLayout,
    ledger: Ledger,
    integration: Box<dyn DesktopIntegration>,
    probe: Box<dyn SandboxProbe>,
}

impl Installer {
    pub fn new(
        layout: InstallLayout,
        ledger: Ledger,
        integration: Box<dyn DesktopIntegration>,
        probe: Box<dyn SandboxProbe>,
    ) -> Self {
        Self {
            layout,
            ledger,
            integration,
            probe,
        }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn into_ledger(self) -> Ledger {
        self.ledger
    }

    /// Installs `bundle_path` using metadata parsed from it. The descriptor's
    /// extraction tree must still exist if it carries an icon path.
    #[instrument(skip(self, descriptor), fields(app = %descriptor.name))]
    pub fn install(&mut self, bundle_path: &Path, descriptor: &BundleDescriptor) -> Result<InstalledApp> {
        create_dir_all(&self.layout.applications_dir)?;
        create_dir_all(&self.layout.launchers_dir)?;

        let target = self.layout.bundle_target(bundle_path)?;
        debug!("Installing to: {}", target.display());
        copy_file_preserving(bundle_path, &target)?;
        add_mode_bits(&target, EXEC_BITS)?;
        debug!("Copied bundle to {}", target.display());

        if let Some(icon_path) = &descriptor.icon_path {
            self.install_icon(icon_path, &descriptor.icon_name)?;
            debug!("Icon installed for {}", descriptor.name);
        }

        let no_sandbox = self.probe.requires_no_sandbox(&target);
        if no_sandbox {
            debug!("{} needs {}", descriptor.name, crate::probe::NO_SANDBOX_FLAG);
        }

        let launcher_path = self.layout.launcher_target(&descriptor.name);
        let entry = LauncherEntry {
            name: &descriptor.name,
            bundle_path: &target,
            no_sandbox,
            icon_name: &descriptor.icon_name,
            categories: &descriptor.categories,
            comment: &descriptor.comment,
        };
        let contents = entry.render();
        debug!(
            "Creating .desktop file: {}\n{}",
            launcher_path.display(),
            contents
        );
        write_file_with_mode(&launcher_path, contents.as_bytes(), LAUNCHER_MODE)?;

        self.integration
            .refresh_menu_database(&self.layout.launchers_dir);
        self.integration.refresh_icon_cache(&self.layout.icons_dir);

        let record = InstalledApp {
            name: descriptor.name.clone(),
            version: descriptor
                .version
                .clone()
                .unwrap_or_else(|| UNKNOWN_VERSION.to_string()),
            source_path: absolute_display(bundle_path),
            install_path: target.to_string_lossy().into_owned(),
            icon_name: descriptor.icon_name.clone(),
            categories: descriptor.categories.clone(),
            install_date: iso_timestamp_now(),
            comment: Some(descriptor.comment.clone()).filter(|c| !c.is_empty()),
            desktop_file: Some(launcher_path.to_string_lossy().into_owned()),
        };
        self.ledger.add(record.clone()).map_err(|e| {
            error!("Failed to record {} in the ledger: {}", record.name, e);
            e
        })?;
        debug!("Successfully installed {}", record.name);
        Ok(record)
    }

    fn install_icon(&self, icon_path: &Path, icon_name: &str) -> Result<PathBuf> {
        let target = self.layout.icon_target(icon_path, icon_name)?;
        if let Some(parent) = target.parent() {
            create_dir_all(parent)?;
        }
        debug!("Installing icon: {}", target.display());
        copy_file_preserving(icon_path, &target)?;
        Ok(target)
    }
}

/// Current local time as `YYYY-MM-DDTHH:MM:SS.ffffff`.
pub fn iso_timestamp_now() -> String {
    chrono::Local::now()
        .naive_local()
        .format("%Y-%m-%dT%H:%M:%S%.6f")
        .to_string()
}

fn absolute_display(path: &Path) -> String {
    path.canonicalize()
        .unwrap_or_else(|_| path.to_path_buf())
        .to_string_lossy()
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> InstallLayout {
        InstallLayout {
            applications_dir: PathBuf::from("/home/me/Applications"),
            launchers_dir: PathBuf::from("/home/me/.local/share/applications"),
            icons_dir: PathBuf::from("/home/me/.local/share/icons/hicolor"),
        }
    }

    #[test]
    fn bundle_keeps_original_filename() {
        let target = layout()
            .bundle_target(Path::new("/downloads/Tool: v2?.AppImage"))
            .unwrap();
        assert_eq!(target, PathBuf::from("/home/me/Applications/Tool: v2?.AppImage"));
        assert!(layout().bundle_target(Path::new("/")).is_err());
    }

    #[test]
    fn launcher_uses_sanitized_name() {
        assert_eq!(
            layout().launcher_target("Tool: v2?"),
            PathBuf::from("/home/me/.local/share/applications/Tool v2.desktop")
        );
    }

    #[test]
    fn icon_bucket_follows_format() {
        let l = layout();
        assert_eq!(
            l.icon_target(Path::new("/tmp/x/app.svg"), "app").unwrap(),
            PathBuf::from("/home/me/.local/share/icons/hicolor/scalable/apps/app.svg")
        );
        assert_eq!(
            l.icon_target(Path::new("/tmp/x/app.png"), "app").unwrap(),
            PathBuf::from("/home/me/.local/share/icons/hicolor/128x128/apps/app.png")
        );
    }

    #[test]
    fn icon_target_stays_inside_theme() {
        let l = layout();
        for name in ["../../../../.bashrc", "/etc/passwd", "..", ".", "a/b", ""] {
            let err = l.icon_target(Path::new("/tmp/x/app.png"), name).unwrap_err();
            assert!(matches!(err, BadgerError::Install(_)), "{name} accepted");
        }
    }

    #[test]
    fn recognises_bundle_extension() {
        assert!(is_appimage_filename(Path::new("/d/Tool-1.0-x86_64.AppImage")));
        assert!(is_appimage_filename(Path::new("tool.appimage")));
        assert!(!is_appimage_filename(Path::new("/d/tool.tar.gz")));
        assert!(!is_appimage_filename(Path::new("/d/AppImage")));
    }

    #[test]
    fn timestamp_shape() {
        let ts = iso_timestamp_now();
        assert_eq!(ts.len(), "2024-01-01T10:00:00.000000".len());
        assert_eq!(&ts[10..11], "T");
    }
}
