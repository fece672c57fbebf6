// badger/src/cli.rs
//! Defines the command-line argument structure using clap.
use badger_common::error::Result;
use badger_common::Config;
use clap::{ArgAction, Parser, Subcommand};

pub mod inspect;
pub mod install;
pub mod list;
pub mod settings;
pub mod uninstall;

use crate::cli::inspect::Inspect;
use crate::cli::install::InstallArgs;
use crate::cli::list::List;
use crate::cli::settings::SettingsArgs;
use crate::cli::uninstall::Uninstall;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None, name = "badgerdrop", bin_name = "badgerdrop")]
#[command(propagate_version = true)]
pub struct CliArgs {
    /// Increase log verbosity (-v debug, -vv trace); also logs to a file
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Install one or more AppImage files
    Install(InstallArgs),
    /// List installed applications
    List(List),
    /// Show the metadata embedded in an AppImage without installing it
    Inspect(Inspect),
    /// Remove installed applications
    Uninstall(Uninstall),
    /// Show or change settings
    Settings(SettingsArgs),
}

impl Command {
    pub fn run(&self, config: &Config) -> Result<()> {
        match self {
            Self::Install(command) => command.run(config),
            Self::List(command) => command.run(config),
            Self::Inspect(command) => command.run(config),
            Self::Uninstall(command) => command.run(config),
            Self::Settings(command) => command.run(config),
        }
    }
}

/// Collapses per-item failures of a batch command into one result.
pub(crate) fn batch_result(verb: &str, total: usize, failures: usize) -> Result<()> {
    if failures == 0 {
        Ok(())
    } else {
        Err(badger_common::BadgerError::Generic(format!(
            "Failed to {verb} {failures} of {total} item(s)"
        )))
    }
}
