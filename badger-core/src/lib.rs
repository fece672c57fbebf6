// badger-core/src/lib.rs

pub mod install;
pub mod installed;
pub mod integration;
pub mod probe;
pub mod uninstall;

// Re-export key types for easier use by the CLI crate
pub use install::descriptor::{self, parse_bundle, BundleDescriptor};
pub use install::extract::{BundleExtractor, ExtractedBundle};
pub use install::{is_appimage_filename, InstallLayout, Installer};
pub use installed::Ledger;
pub use integration::{DesktopIntegration, NoopIntegration, SystemIntegration};
pub use probe::{DisabledProbe, ProcessProbe, SandboxProbe};
pub use uninstall::{uninstall, UninstallReport};
