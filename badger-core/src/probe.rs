// badger-core/src/probe.rs
//! Detection of runtimes (typically Electron based) that refuse to start
//! without `--no-sandbox` on systems lacking a usable setuid sandbox or user
//! namespaces.

use std::path::Path;
use std::time::Duration;

use badger_aio::process::run_command_with_timeout;
use tracing::debug;

pub const NO_SANDBOX_FLAG: &str = "--no-sandbox";
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(10);
const VERSION_FLAG: &str = "--version";
const SANDBOX_MARKERS: [&str; 4] = ["sandbox", "setuid", "suid", "namespace"];

pub trait SandboxProbe {
    /// Whether the installed bundle needs `--no-sandbox` to launch.
    fn requires_no_sandbox(&self, bundle: &Path) -> bool;
}

/// Runs `<bundle> --version` and inspects its stderr.
#[derive(Debug, Clone)]
pub struct ProcessProbe {
    pub timeout: Duration,
}

impl Default for ProcessProbe {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }
}

impl SandboxProbe for ProcessProbe {
    fn requires_no_sandbox(&self, bundle: &Path) -> bool {
        match run_command_with_timeout(bundle, &[VERSION_FLAG], None, self.timeout) {
            Ok(Some(output)) => {
                // Exit status is irrelevant: sandbox failures often still exit 0
                // after printing the version, or abort after printing the error.
                let stderr = String::from_utf8_lossy(&output.stderr);
                let detected = stderr_requires_no_sandbox(&stderr);
                debug!(
                    "Sandbox probe for {} finished ({}), detected: {}",
                    bundle.display(),
                    output.status,
                    detected
                );
                detected
            }
            Ok(None) => {
                debug!(
                    "Sandbox probe for {} timed out after {:?}",
                    bundle.display(),
                    self.timeout
                );
                false
            }
            Err(e) => {
                debug!("Sandbox probe for {} failed: {}", bundle.display(), e);
                false
            }
        }
    }
}

/// Never detects anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledProbe;

impl SandboxProbe for DisabledProbe {
    fn requires_no_sandbox(&self, _bundle: &Path) -> bool {
        false
    }
}

/// Case-insensitive search for sandbox, setuid or namespace failures.
pub fn stderr_requires_no_sandbox(stderr: &str) -> bool {
    let lower = stderr.to_lowercase();
    SANDBOX_MARKERS.iter().any(|marker| lower.contains(marker))
}
