// badger-core/src/integration.rs
//! Best-effort refresh of the desktop menu database and icon cache.

use std::ffi::OsStr;
use std::path::Path;
use std::time::Duration;

use badger_aio::process::run_command_with_timeout;
use tracing::{debug, warn};

const MENU_DATABASE_TOOL: &str = "update-desktop-database";
const ICON_CACHE_TOOL: &str = "gtk-update-icon-cache";
const REFRESH_TIMEOUT: Duration = Duration::from_secs(30);

/// Desktop-shell hooks run after launcher and icon files change.
/// Implementations never fail; problems are logged.
pub trait DesktopIntegration {
    fn refresh_menu_database(&self, launchers_dir: &Path);
    fn refresh_icon_cache(&self, icons_dir: &Path);
}

/// Runs the freedesktop tools found on `PATH`; absent tools are skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemIntegration;

impl SystemIntegration {
    fn run_optional(&self, tool: &str, args: &[&OsStr]) {
        let program = match which::which(tool) {
            Ok(program) => program,
            Err(_) => {
                debug!("{} not found (optional), skipping", tool);
                return;
            }
        };
        match run_command_with_timeout(&program, args, None, REFRESH_TIMEOUT) {
            Ok(Some(output)) if output.status.success() => debug!("{} completed", tool),
            Ok(Some(output)) => debug!("{} exited with {}", tool, output.status),
            Ok(None) => warn!("{} did not finish within {:?}", tool, REFRESH_TIMEOUT),
            Err(e) => debug!("Could not run {}: {}", tool, e),
        }
    }
}

impl DesktopIntegration for SystemIntegration {
    fn refresh_menu_database(&self, launchers_dir: &Path) {
        self.run_optional(MENU_DATABASE_TOOL, &[launchers_dir.as_os_str()]);
    }

    fn refresh_icon_cache(&self, icons_dir: &Path) {
        if !icons_dir.is_dir() {
            debug!("Icon directory {} absent, skipping cache refresh", icons_dir.display());
            return;
        }
        self.run_optional(
            ICON_CACHE_TOOL,
            &[OsStr::new("-f"), OsStr::new("-t"), icons_dir.as_os_str()],
        );
    }
}

/// Does nothing. For tests and `--no-refresh`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopIntegration;

impl DesktopIntegration for NoopIntegration {
    fn refresh_menu_database(&self, _launchers_dir: &Path) {}

    fn refresh_icon_cache(&self, _icons_dir: &Path) {}
}
