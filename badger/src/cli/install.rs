// badger/src/cli/install.rs
use std::path::{Path, PathBuf};

use badger_common::config::Config;
use badger_common::error::{BadgerError, Result};
use badger_common::model::InstalledApp;
use badger_core::install::InstallLayout;
use badger_core::{
    is_appimage_filename, parse_bundle, BundleExtractor, DesktopIntegration, DisabledProbe,
    Installer, Ledger, NoopIntegration, ProcessProbe, SandboxProbe, SystemIntegration,
};
use clap::Args;
use colored::Colorize;
use tracing::{debug, error};

#[derive(Args, Debug)]
pub struct InstallArgs {
    /// AppImage files to install
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Do not run the bundle to detect whether it needs --no-sandbox
    #[arg(long)]
    pub no_probe: bool,

    /// Do not refresh the desktop menu database and icon cache
    #[arg(long)]
    pub no_refresh: bool,

    /// Install files that lack the .AppImage extension
    #[arg(long)]
    pub force: bool,

    /// Keep the temporary directory of a failed extraction for inspection
    #[arg(long)]
    pub keep_failed: bool,
}

impl InstallArgs {
    pub fn run(&self, config: &Config) -> Result<()> {
        let extractor = BundleExtractor::from_settings(&config.settings)
            .keep_failed_extractions(self.keep_failed);

        let probe: Box<dyn SandboxProbe> = if self.no_probe || !config.settings.probe_sandbox {
            debug!("Sandbox probe disabled");
            Box::new(DisabledProbe)
        } else {
            Box::new(ProcessProbe::default())
        };
        let integration: Box<dyn DesktopIntegration> = if self.no_refresh {
            Box::new(NoopIntegration)
        } else {
            Box::new(SystemIntegration)
        };

        let mut installer = Installer::new(
            InstallLayout::from_config(config),
            Ledger::load(config.ledger_path()),
            integration,
            probe,
        );

        let mut failures = 0;
        for path in &self.paths {
            println!("Installing {}...", path.display());
            match self.install_one(&mut installer, &extractor, path) {
                Ok(app) => println!(
                    "✓ Installed {} {} to {}",
                    app.name.green(),
                    app.version,
                    app.install_path
                ),
                Err(e) => {
                    error!("✖ Failed to install '{}': {}", path.display(), e);
                    failures += 1;
                }
            }
        }

        super::batch_result("install", self.paths.len(), failures)
    }

    fn install_one(
        &self,
        installer: &mut Installer,
        extractor: &BundleExtractor,
        path: &Path,
    ) -> Result<InstalledApp> {
        if !self.force && !is_appimage_filename(path) {
            return Err(BadgerError::Install(format!(
                "{} is not an .AppImage file (use --force to install it anyway)",
                path.display()
            )));
        }

        let mut descriptor = parse_bundle(path, extractor)?;
        let result = installer.install(path, &descriptor);
        descriptor.release();
        result
    }
}
