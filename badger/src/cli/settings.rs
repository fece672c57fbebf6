// badger/src/cli/settings.rs
use badger_common::config::Config;
use badger_common::error::Result;
use clap::{Args, Subcommand};
use colored::Colorize;

#[derive(Args, Debug)]
pub struct SettingsArgs {
    #[command(subcommand)]
    pub action: Option<SettingsAction>,
}

#[derive(Subcommand, Debug)]
pub enum SettingsAction {
    /// Print the current settings
    Show,
    /// Change one setting (auto-make-executable, install-directory, probe-sandbox)
    Set { key: String, value: String },
}

impl SettingsArgs {
    pub fn run(&self, config: &Config) -> Result<()> {
        match &self.action {
            None | Some(SettingsAction::Show) => {
                show(config);
                Ok(())
            }
            Some(SettingsAction::Set { key, value }) => {
                let mut updated = config.clone();
                updated.settings.set(key, value)?;
                updated.save_settings()?;
                println!("✓ Set {} = {}", key.green(), value);
                Ok(())
            }
        }
    }
}

fn show(config: &Config) {
    let settings = &config.settings;
    println!("{}", format!("Settings ({})", config.settings_path().display()).bold());
    println!("  auto-make-executable: {}", settings.auto_make_executable);
    println!(
        "  install-directory:    {} ({})",
        settings.install_directory,
        config.applications_dir().display()
    );
    println!("  probe-sandbox:        {}", settings.probe_sandbox);
}
