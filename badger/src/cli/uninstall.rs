// badger/src/cli/uninstall.rs
use badger_common::config::Config;
use badger_common::error::Result;
use badger_core::{uninstall, DesktopIntegration, Ledger, NoopIntegration, SystemIntegration};
use clap::Args;
use colored::Colorize;
use tracing::{debug, error};

#[derive(Args, Debug)]
pub struct Uninstall {
    /// Display names or installed file names of the applications to remove
    #[arg(required = true)]
    pub names: Vec<String>,

    /// Do not refresh the desktop menu database
    #[arg(long)]
    pub no_refresh: bool,
}

impl Uninstall {
    pub fn run(&self, config: &Config) -> Result<()> {
        let mut ledger = Ledger::load(config.ledger_path());
        let integration: Box<dyn DesktopIntegration> = if self.no_refresh {
            Box::new(NoopIntegration)
        } else {
            Box::new(SystemIntegration)
        };

        let mut failures = 0;
        for name in &self.names {
            let record = ledger
                .find_by_name(name)
                .or_else(|| ledger.find_by_install_path_basename(name))
                .cloned();
            let Some(record) = record else {
                error!("✖ '{}' is not installed", name);
                failures += 1;
                continue;
            };

            println!("Uninstalling {}...", record.name);
            match uninstall(&record, &mut ledger, integration.as_ref()) {
                Ok(report) => {
                    debug!("Uninstall report for {}: {:?}", record.name, report);
                    println!("✓ Uninstalled {}", record.name.green());
                }
                Err(e) => {
                    error!("✖ Failed to uninstall '{}': {}", name.cyan(), e);
                    failures += 1;
                }
            }
        }

        super::batch_result("uninstall", self.names.len(), failures)
    }
}
