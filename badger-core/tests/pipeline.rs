// badger-core/tests/pipeline.rs
//! Parse, install and uninstall against fake self-extracting bundles.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use badger_common::error::BadgerError;
use badger_core::install::InstallLayout;
use badger_core::{
    parse_bundle, uninstall, BundleExtractor, DisabledProbe, Installer, Ledger, NoopIntegration,
    ProcessProbe, SandboxProbe,
};
use tempfile::TempDir;

const NOTES_DESKTOP: &str = "[Desktop Entry]\n\
Type=Application\n\
Name=Badger Notes\n\
Exec=AppRun %U\n\
Icon=badger-notes\n\
Categories=Office;TextEditor;\n\
Comment=Take notes\n\
X-AppImage-Version=2.4.1\n";

/// Writes a shell script that behaves like a bundle runtime: it unpacks
/// `desktop` (and an svg icon) on `--appimage-extract` and prints
/// `version_stderr` to stderr on `--version`.
fn fake_bundle(dir: &Path, filename: &str, desktop: Option<&str>, version_stderr: &str) -> PathBuf {
    let mut script = String::from("#!/bin/sh\nif [ \"$1\" = \"--appimage-extract\" ]; then\n");
    script.push_str("  mkdir -p squashfs-root/usr/share/applications\n");
    if let Some(desktop) = desktop {
        script.push_str("  cat > squashfs-root/usr/share/applications/notes.desktop <<'DESKTOP'\n");
        script.push_str(desktop);
        script.push_str("DESKTOP\n");
        script.push_str("  printf '<svg/>' > squashfs-root/badger-notes.svg\n");
    }
    script.push_str("  exit 0\nfi\n");
    script.push_str("if [ \"$1\" = \"--version\" ]; then\n");
    if !version_stderr.is_empty() {
        script.push_str(&format!("  echo '{version_stderr}' >&2\n"));
    }
    script.push_str("  echo 2.4.1\n  exit 0\nfi\nexit 0\n");

    let path = dir.join(filename);
    fs::write(&path, script).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

struct Workspace {
    _root: TempDir,
    downloads: PathBuf,
    layout: InstallLayout,
    ledger_path: PathBuf,
}

impl Workspace {
    fn new() -> Self {
        let root = TempDir::new().unwrap();
        let downloads = root.path().join("downloads");
        fs::create_dir_all(&downloads).unwrap();
        let layout = InstallLayout {
            applications_dir: root.path().join("Applications"),
            launchers_dir: root.path().join("share/applications"),
            icons_dir: root.path().join("share/icons/hicolor"),
        };
        let ledger_path = root.path().join("config/installed.json");
        Self {
            _root: root,
            downloads,
            layout,
            ledger_path,
        }
    }

    fn installer(&self, probe: Box<dyn SandboxProbe>) -> Installer {
        Installer::new(
            self.layout.clone(),
            Ledger::load(&self.ledger_path),
            Box::new(NoopIntegration),
            probe,
        )
    }
}

#[test]
fn parse_and_install_bundle() {
    let ws = Workspace::new();
    let bundle = fake_bundle(&ws.downloads, "Notes-2.4.1.AppImage", Some(NOTES_DESKTOP), "");

    let mut descriptor = parse_bundle(&bundle, &BundleExtractor::default()).unwrap();
    assert_eq!(descriptor.name, "Badger Notes");
    assert_eq!(descriptor.exec_command, "AppRun %U");
    assert_eq!(descriptor.categories, vec!["Office", "TextEditor"]);
    assert_eq!(descriptor.version.as_deref(), Some("2.4.1"));
    assert!(descriptor.icon_path.as_ref().unwrap().ends_with("badger-notes.svg"));
    let workdir = descriptor.extraction_workdir().unwrap().to_path_buf();

    let mut installer = ws.installer(Box::new(ProcessProbe::default()));
    let record = installer.install(&bundle, &descriptor).unwrap();
    descriptor.release();
    assert!(!workdir.exists());

    let installed = ws.layout.applications_dir.join("Notes-2.4.1.AppImage");
    assert_eq!(record.install_path, installed.to_string_lossy());
    assert_eq!(fs::read(&installed).unwrap(), fs::read(&bundle).unwrap());
    assert_eq!(fs::metadata(&installed).unwrap().permissions().mode() & 0o111, 0o111);
    assert!(ws
        .layout
        .icons_dir
        .join("scalable/apps/badger-notes.svg")
        .is_file());

    let launcher = ws.layout.launchers_dir.join("Badger Notes.desktop");
    assert_eq!(record.desktop_file.as_deref(), Some(&*launcher.to_string_lossy()));
    assert_eq!(fs::metadata(&launcher).unwrap().permissions().mode() & 0o777, 0o644);
    let text = fs::read_to_string(&launcher).unwrap();
    assert!(text.contains(&format!("Exec=\"{}\"\n", installed.display())));
    assert!(text.contains("Categories=Office;TextEditor;\n"));
    assert!(!text.contains("--no-sandbox"));

    assert_eq!(record.version, "2.4.1");
    assert_eq!(record.comment.as_deref(), Some("Take notes"));
    let ledger = Ledger::load(&ws.ledger_path);
    assert_eq!(ledger.find_by_name("badger notes"), Some(&record));
}

#[test]
fn reinstall_keeps_single_ledger_entry() {
    let ws = Workspace::new();
    let bundle = fake_bundle(&ws.downloads, "Notes.AppImage", Some(NOTES_DESKTOP), "");
    let mut installer = ws.installer(Box::new(DisabledProbe));

    for _ in 0..2 {
        let mut descriptor = parse_bundle(&bundle, &BundleExtractor::default()).unwrap();
        installer.install(&bundle, &descriptor).unwrap();
        descriptor.release();
    }

    assert_eq!(installer.ledger().len(), 1);
    assert_eq!(Ledger::load(&ws.ledger_path).len(), 1);
}

#[test]
fn sandbox_failure_adds_flag() {
    let ws = Workspace::new();
    let bundle = fake_bundle(
        &ws.downloads,
        "Chat.AppImage",
        Some(NOTES_DESKTOP),
        "The SUID sandbox helper binary was found, but is not configured correctly.",
    );
    let descriptor = parse_bundle(&bundle, &BundleExtractor::default()).unwrap();
    let mut installer = ws.installer(Box::new(ProcessProbe::default()));
    installer.install(&bundle, &descriptor).unwrap();

    let text = fs::read_to_string(ws.layout.launchers_dir.join("Badger Notes.desktop")).unwrap();
    assert!(text.contains("Chat.AppImage\" --no-sandbox\n"));
}

#[test]
fn bundle_without_descriptor_is_rejected() {
    let ws = Workspace::new();
    let bundle = fake_bundle(&ws.downloads, "Empty.AppImage", None, "");
    let err = parse_bundle(&bundle, &BundleExtractor::default()).unwrap_err();
    assert!(matches!(err, BadgerError::DescriptorNotFound(_)));
}

#[test]
fn minimal_descriptor_uses_defaults() {
    let ws = Workspace::new();
    let bundle = fake_bundle(
        &ws.downloads,
        "Bare-1.0.AppImage",
        Some("[Desktop Entry]\nType=Application\n"),
        "",
    );
    let descriptor = parse_bundle(&bundle, &BundleExtractor::default()).unwrap();
    assert_eq!(descriptor.name, "Bare-1.0");
    assert_eq!(descriptor.icon_name, "application");
    assert!(descriptor.icon_path.is_none());

    let mut installer = ws.installer(Box::new(DisabledProbe));
    let record = installer.install(&bundle, &descriptor).unwrap();
    assert_eq!(record.version, "unknown");
    assert_eq!(record.comment, None);
    assert!(record.categories.is_empty());
    assert!(!ws.layout.icons_dir.exists());
}

#[test]
fn uninstall_reverses_install() {
    let ws = Workspace::new();
    let bundle = fake_bundle(&ws.downloads, "Notes.AppImage", Some(NOTES_DESKTOP), "");
    let descriptor = parse_bundle(&bundle, &BundleExtractor::default()).unwrap();
    let mut installer = ws.installer(Box::new(DisabledProbe));
    let record = installer.install(&bundle, &descriptor).unwrap();
    drop(descriptor);

    let mut ledger = installer.into_ledger();
    let found = ledger
        .find_by_install_path_basename("Notes.AppImage")
        .cloned()
        .unwrap();
    assert_eq!(found, record);

    let report = uninstall(&found, &mut ledger, &NoopIntegration).unwrap();
    assert!(report.bundle_removed && report.launcher_removed && report.ledger_entry_removed);
    assert!(!Path::new(&record.install_path).exists());
    assert!(!ws.layout.launchers_dir.join("Badger Notes.desktop").exists());
    assert!(Ledger::load(&ws.ledger_path).is_empty());
    // icons may be shared and stay behind
    assert!(ws
        .layout
        .icons_dir
        .join("scalable/apps/badger-notes.svg")
        .is_file());
    // the source bundle is never touched
    assert!(bundle.is_file());
}

#[test]
fn reinstall_from_managed_folder_keeps_bundle_intact() {
    let ws = Workspace::new();
    fs::create_dir_all(&ws.layout.applications_dir).unwrap();
    let bundle = fake_bundle(
        &ws.layout.applications_dir,
        "Notes.AppImage",
        Some(NOTES_DESKTOP),
        "",
    );
    let before = fs::read(&bundle).unwrap();

    let mut descriptor = parse_bundle(&bundle, &BundleExtractor::default()).unwrap();
    let mut installer = ws.installer(Box::new(DisabledProbe));
    let record = installer.install(&bundle, &descriptor).unwrap();
    descriptor.release();

    assert_eq!(fs::read(&bundle).unwrap(), before);
    assert_eq!(Path::new(&record.install_path), bundle.as_path());
    assert_eq!(Ledger::load(&ws.ledger_path).len(), 1);
}

#[test]
fn icon_name_cannot_reach_outside_the_bundle() {
    let ws = Workspace::new();
    let outside = ws.downloads.join("victim.png");
    fs::write(&outside, b"precious").unwrap();
    let desktop = format!(
        "[Desktop Entry]\nName=Sneaky\nIcon={}\n",
        ws.downloads.join("victim").display()
    );
    let bundle = fake_bundle(&ws.downloads, "Sneaky.AppImage", Some(&desktop), "");

    let descriptor = parse_bundle(&bundle, &BundleExtractor::default()).unwrap();
    assert!(descriptor.icon_path.is_none());

    let mut installer = ws.installer(Box::new(DisabledProbe));
    installer.install(&bundle, &descriptor).unwrap();
    assert_eq!(fs::read(&outside).unwrap(), b"precious");
    assert!(!ws.layout.icons_dir.exists());
}
