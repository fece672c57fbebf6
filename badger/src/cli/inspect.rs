// badger/src/cli/inspect.rs
use std::path::PathBuf;

use badger_common::config::Config;
use badger_common::error::Result;
use badger_core::{parse_bundle, BundleExtractor};
use clap::Args;
use colored::Colorize;

#[derive(Args, Debug)]
pub struct Inspect {
    /// The AppImage to inspect
    pub path: PathBuf,

    /// Keep the extracted tree on disk and print where it is
    #[arg(long)]
    pub keep: bool,
}

impl Inspect {
    pub fn run(&self, config: &Config) -> Result<()> {
        let extractor =
            BundleExtractor::from_settings(&config.settings).keep_failed_extractions(self.keep);
        let mut descriptor = parse_bundle(&self.path, &extractor)?;

        let field = |label: &str, value: &str| {
            let value = if value.is_empty() { "-" } else { value };
            println!("{:<12} {}", format!("{label}:").bold(), value);
        };

        field("Name", &descriptor.name);
        field("Exec", &descriptor.exec_command);
        field("Icon", &descriptor.icon_name);
        field(
            "Icon path",
            &descriptor
                .icon_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
        );
        field("Categories", &descriptor.categories.join(", "));
        field("Comment", &descriptor.comment);
        field("Version", descriptor.version.as_deref().unwrap_or_default());

        if self.keep {
            if let Some(kept) = descriptor.persist_extraction() {
                field("Extracted", &kept.display().to_string());
            }
        } else {
            field(
                "Temp dir",
                &descriptor
                    .extraction_workdir()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default(),
            );
        }

        println!("\n{}", "Descriptor:".bold());
        println!("{}", descriptor.raw_descriptor_text.trim_end());

        descriptor.release();
        Ok(())
    }
}
