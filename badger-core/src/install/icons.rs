// Path: badger-core/src/install/icons.rs
//! Icon lookup inside an extracted bundle.

use std::path::{Path, PathBuf};

use tracing::debug;

/// hicolor buckets probed in order of preference.
const HICOLOR_PNG_SIZES: [&str; 3] = ["256x256", "128x128", "64x64"];

/// Ordered candidate locations for `icon_name` under `root`.
pub fn icon_candidates(root: &Path, icon_name: &str) -> Vec<PathBuf> {
    let png = format!("{icon_name}.png");
    let svg = format!("{icon_name}.svg");
    let hicolor = root.join("usr/share/icons/hicolor");
    let pixmaps = root.join("usr/share/pixmaps");

    let mut candidates = vec![root.join(&png), root.join(&svg)];
    for size in HICOLOR_PNG_SIZES {
        candidates.push(hicolor.join(size).join("apps").join(&png));
    }
    candidates.push(hicolor.join("scalable/apps").join(&svg));
    candidates.push(pixmaps.join(&png));
    candidates.push(pixmaps.join(&svg));
    candidates
}

/// Icon names are plain theme identifiers: a single path component, never
/// `.` or `..`.
pub fn is_plain_icon_name(icon_name: &str) -> bool {
    !icon_name.is_empty()
        && icon_name != "."
        && icon_name != ".."
        && !icon_name.contains(['/', '\\', '\0'])
}

/// First existing candidate, or `None` if the bundle ships no matching icon
/// or `icon_name` is not a plain name.
pub fn resolve_icon(root: &Path, icon_name: &str) -> Option<PathBuf> {
    if !is_plain_icon_name(icon_name) {
        if !icon_name.is_empty() {
            debug!("Ignoring icon name with path components: {}", icon_name);
        }
        return None;
    }
    let found = icon_candidates(root, icon_name)
        .into_iter()
        .find(|path| path.exists());
    match &found {
        Some(path) => debug!("Found icon: {}", path.display()),
        None => debug!("Icon not found: {}", icon_name),
    }
    found
}

/// Whether the icon should be installed into the scalable bucket.
pub fn is_svg(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "svg")
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn touch(root: &Path, rel: &str) -> PathBuf {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, b"icon").unwrap();
        path
    }

    #[test]
    fn bundle_root_png_beats_theme_directory() {
        let dir = TempDir::new().unwrap();
        let root_png = touch(dir.path(), "app.png");
        touch(dir.path(), "usr/share/icons/hicolor/128x128/apps/app.png");
        assert_eq!(resolve_icon(dir.path(), "app"), Some(root_png));
    }

    #[test]
    fn larger_theme_size_wins() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "usr/share/icons/hicolor/64x64/apps/app.png");
        let big = touch(dir.path(), "usr/share/icons/hicolor/256x256/apps/app.png");
        assert_eq!(resolve_icon(dir.path(), "app"), Some(big));
    }

    #[test]
    fn pixmaps_are_the_last_resort() {
        let dir = TempDir::new().unwrap();
        let svg = touch(dir.path(), "usr/share/pixmaps/app.svg");
        assert_eq!(resolve_icon(dir.path(), "app"), Some(svg.clone()));
        assert!(is_svg(&svg));

        let png = touch(dir.path(), "usr/share/pixmaps/app.png");
        assert_eq!(resolve_icon(dir.path(), "app"), Some(png));
    }

    #[test]
    fn missing_icon_is_none() {
        let dir = TempDir::new().unwrap();
        assert_eq!(resolve_icon(dir.path(), "app"), None);
        assert_eq!(resolve_icon(dir.path(), ""), None);
    }

    #[test]
    fn names_with_path_components_are_not_resolved() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("squashfs-root");
        fs::create_dir_all(&root).unwrap();
        touch(dir.path(), "outside.png");
        touch(dir.path(), "..png");

        assert_eq!(resolve_icon(&root, "../outside"), None);
        assert_eq!(
            resolve_icon(&root, &dir.path().join("outside").to_string_lossy()),
            None
        );
        assert_eq!(resolve_icon(dir.path(), "."), None);
        assert_eq!(resolve_icon(&root, ".."), None);
        assert!(is_plain_icon_name("org.example.Tool"));
        assert!(!is_plain_icon_name("a\\b"));
    }

    #[test]
    fn candidate_order() {
        let names: Vec<String> = icon_candidates(Path::new("/r"), "x")
            .iter()
            .map(|p| p.display().to_string())
            .collect();
        assert_eq!(
            names,
            vec![
                "/r/x.png",
                "/r/x.svg",
                "/r/usr/share/icons/hicolor/256x256/apps/x.png",
                "/r/usr/share/icons/hicolor/128x128/apps/x.png",
                "/r/usr/share/icons/hicolor/64x64/apps/x.png",
                "/r/usr/share/icons/hicolor/scalable/apps/x.svg",
                "/r/usr/share/pixmaps/x.png",
                "/r/usr/share/pixmaps/x.svg",
            ]
        );
    }
}
