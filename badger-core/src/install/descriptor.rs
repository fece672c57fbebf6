// Path: badger-core/src/install/descriptor.rs
//! Discovery and parsing of the `.desktop` descriptor embedded in a bundle.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use badger_common::error::{BadgerError, Result};
use tracing::{debug, warn};

use super::extract::{BundleExtractor, ExtractedBundle};
use super::icons::resolve_icon;

const DESKTOP_ENTRY_SECTION: &str = "Desktop Entry";
/// Fallback location when the bundle root carries no descriptor.
const NESTED_APPLICATIONS_DIR: &str = "usr/share/applications";
/// Icon identifier used when the descriptor names none.
pub const DEFAULT_ICON_NAME: &str = "application";

/// Metadata extracted from a bundle. Owns the extraction tree until released.
#[derive(Debug)]
pub struct BundleDescriptor {
    pub name: String,
    pub exec_command: String,
    pub icon_name: String,
    /// Icon file inside the extraction tree; invalid once released.
    pub icon_path: Option<PathBuf>,
    pub categories: Vec<String>,
    pub comment: String,
    pub raw_descriptor_text: String,
    pub version: Option<String>,
    extraction: Option<ExtractedBundle>,
}

impl BundleDescriptor {
    /// Parses the descriptor out of an extracted tree, taking ownership of it.
    /// On error the tree is dropped (and therefore removed).
    pub fn from_extraction(extracted: ExtractedBundle, bundle_path: &Path) -> Result<Self> {
        let root = extracted.root().to_path_buf();
        let descriptor_file = find_descriptor_file(&root)?;
        debug!("Found .desktop file: {}", descriptor_file.display());

        let bytes = fs::read(&descriptor_file)?;
        let raw = String::from_utf8_lossy(&bytes).into_owned();
        let entry = DesktopEntry::parse(&raw)?;

        let name = entry
            .non_empty("Name")
            .map(str::to_string)
            .unwrap_or_else(|| bundle_stem(bundle_path));
        let icon_name = entry
            .non_empty("Icon")
            .unwrap_or(DEFAULT_ICON_NAME)
            .to_string();
        let icon_path = resolve_icon(&root, &icon_name);

        Ok(Self {
            name,
            exec_command: entry.get("Exec").unwrap_or_default().to_string(),
            icon_path,
            icon_name,
            categories: split_categories(entry.get("Categories").unwrap_or_default()),
            comment: entry.get("Comment").unwrap_or_default().to_string(),
            version: entry.non_empty("X-AppImage-Version").map(str::to_string),
            raw_descriptor_text: raw,
            extraction: Some(extracted),
        })
    }

    /// Root of the extracted tree, while it still exists.
    pub fn extraction_root(&self) -> Option<&Path> {
        self.extraction
            .as_ref()
            .filter(|e| !e.is_released())
            .map(ExtractedBundle::root)
    }

    /// Temporary directory holding the tree, while it still exists.
    pub fn extraction_workdir(&self) -> Option<&Path> {
        self.extraction
            .as_ref()
            .filter(|e| !e.is_released())
            .map(ExtractedBundle::workdir)
    }

    /// Deletes the extraction tree. Idempotent.
    pub fn release(&mut self) {
        if let Some(extracted) = self.extraction.as_mut() {
            extracted.release();
        }
        self.icon_path = None;
    }

    /// Keeps the extraction tree on disk (debug inspection) and returns its path.
    pub fn persist_extraction(&mut self) -> Option<PathBuf> {
        self.extraction.take().map(ExtractedBundle::persist)
    }
}

/// Extracts `bundle_path` and parses its descriptor.
pub fn parse_bundle(bundle_path: &Path, extractor: &BundleExtractor) -> Result<BundleDescriptor> {
    let extracted = extractor.extract(bundle_path)?;
    BundleDescriptor::from_extraction(extracted, bundle_path)
}

/// Returns the first `.desktop` file at the root, else in
/// `usr/share/applications`. Candidates are taken in sorted order.
pub fn find_descriptor_file(root: &Path) -> Result<PathBuf> {
    let nested = root.join(NESTED_APPLICATIONS_DIR);
    for dir in [root, nested.as_path()] {
        if let Some(found) = desktop_files_in(dir).into_iter().next() {
            return Ok(found);
        }
    }
    Err(BadgerError::DescriptorNotFound(format!(
        "{} and {}",
        root.display(),
        nested.display()
    )))
}

fn desktop_files_in(dir: &Path) -> Vec<PathBuf> {
    let Some(dir_str) = dir.to_str() else {
        warn!("Skipping non UTF-8 directory {}", dir.display());
        return Vec::new();
    };
    let pattern = format!("{}/*.desktop", glob::Pattern::escape(dir_str));
    match glob::glob(&pattern) {
        Ok(paths) => paths.filter_map(|p| p.ok()).filter(|p| p.is_file()).collect(),
        Err(e) => {
            warn!("Invalid glob pattern {}: {}", pattern, e);
            Vec::new()
        }
    }
}

fn bundle_stem(bundle_path: &Path) -> String {
    bundle_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Splits a `Categories` value: `"A;B;;C;"` becomes `["A", "B", "C"]`.
pub fn split_categories(raw: &str) -> Vec<String> {
    raw.split(';')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(String::from)
        .collect()
}

/// Key/value pairs of the `[Desktop Entry]` section. Keys keep their case.
#[derive(Debug, Clone, Default)]
pub struct DesktopEntry {
    entries: HashMap<String, String>,
}

impl DesktopEntry {
    pub fn parse(content: &str) -> Result<Self> {
        let mut entries = HashMap::new();
        let mut in_desktop_entry = false;
        let mut saw_section = false;

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            if line.starts_with('[') && line.ends_with(']') {
                in_desktop_entry = &line[1..line.len() - 1] == DESKTOP_ENTRY_SECTION;
                saw_section |= in_desktop_entry;
                continue;
            }

            if in_desktop_entry {
                if let Some((key, value)) = line.split_once('=') {
                    entries.insert(key.trim().to_string(), value.trim().to_string());
                }
            }
        }

        if !saw_section {
            return Err(BadgerError::InvalidDescriptor(format!(
                "no [{DESKTOP_ENTRY_SECTION}] section"
            )));
        }
        Ok(Self { entries })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    fn non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.is_empty())
    }
}
