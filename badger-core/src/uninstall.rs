// badger-core/src/uninstall.rs
//! Removal of an installed bundle and its launcher.

use std::path::{Path, PathBuf};

use badger_aio::fs::remove_file_if_exists;
use badger_common::error::Result;
use badger_common::model::InstalledApp;
use tracing::debug;

use crate::installed::Ledger;
use crate::integration::DesktopIntegration;

/// What an uninstall actually found and removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UninstallReport {
    pub bundle_removed: bool,
    pub launcher_removed: bool,
    pub ledger_entry_removed: bool,
}

/// Deletes the installed bundle and launcher of `record`, drops its ledger
/// entry and refreshes the menu database. Installed icons stay: other apps
/// may share the icon name.
pub fn uninstall(
    record: &InstalledApp,
    ledger: &mut Ledger,
    integration: &dyn DesktopIntegration,
) -> Result<UninstallReport> {
    debug!("Uninstalling {} ({})", record.name, record.install_path);
    let bundle_removed = remove_file_if_exists(Path::new(&record.install_path))?;

    let launcher = record.desktop_file.as_ref().map(PathBuf::from);
    let launcher_removed = match &launcher {
        Some(path) => remove_file_if_exists(path)?,
        None => {
            debug!("No launcher recorded for {}", record.name);
            false
        }
    };

    let ledger_entry_removed = ledger.remove(&record.install_path)?;

    if let Some(dir) = launcher.as_deref().and_then(Path::parent) {
        integration.refresh_menu_database(dir);
    }

    Ok(UninstallReport {
        bundle_removed,
        launcher_removed,
        ledger_entry_removed,
    })
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[derive(Default)]
    struct RecordingIntegration {
        menu_refreshes: RefCell<Vec<PathBuf>>,
    }

    impl DesktopIntegration for RecordingIntegration {
        fn refresh_menu_database(&self, launchers_dir: &Path) {
            self.menu_refreshes
                .borrow_mut()
                .push(launchers_dir.to_path_buf());
        }

        fn refresh_icon_cache(&self, _icons_dir: &Path) {}
    }

    fn record(dir: &Path) -> InstalledApp {
        InstalledApp {
            name: "Tool".to_string(),
            version: "1.0".to_string(),
            source_path: "/downloads/Tool.AppImage".to_string(),
            install_path: dir.join("Tool.AppImage").to_string_lossy().into_owned(),
            icon_name: "tool".to_string(),
            categories: vec![],
            install_date: "2024-01-01T10:00:00.000000".to_string(),
            comment: None,
            desktop_file: Some(dir.join("apps").join("Tool.desktop").to_string_lossy().into_owned()),
        }
    }

    #[test]
    fn removes_files_and_entry() {
        let dir = TempDir::new().unwrap();
        let app = record(dir.path());
        fs::write(&app.install_path, b"bundle").unwrap();
        fs::create_dir_all(dir.path().join("apps")).unwrap();
        fs::write(app.desktop_file.as_ref().unwrap(), b"[Desktop Entry]\n").unwrap();

        let mut ledger = Ledger::load(dir.path().join("installed.json"));
        ledger.add(app.clone()).unwrap();
        let integration = RecordingIntegration::default();

        let report = uninstall(&app, &mut ledger, &integration).unwrap();
        assert_eq!(
            report,
            UninstallReport {
                bundle_removed: true,
                launcher_removed: true,
                ledger_entry_removed: true,
            }
        );
        assert!(!Path::new(&app.install_path).exists());
        assert!(Ledger::load(dir.path().join("installed.json")).is_empty());
        assert_eq!(
            integration.menu_refreshes.borrow().as_slice(),
            &[dir.path().join("apps")]
        );
    }

    #[test]
    fn missing_files_are_not_errors() {
        let dir = TempDir::new().unwrap();
        let app = record(dir.path());
        let mut ledger = Ledger::load(dir.path().join("installed.json"));
        ledger.add(app.clone()).unwrap();

        let report = uninstall(&app, &mut ledger, &RecordingIntegration::default()).unwrap();
        assert!(!report.bundle_removed);
        assert!(!report.launcher_removed);
        assert!(report.ledger_entry_removed);
    }
}
