// badger-common/src/model/mod.rs
pub mod installed_app;

pub use installed_app::{InstalledApp, UNKNOWN_VERSION};
