// badger-common/src/lib.rs
pub mod config;
pub mod error;
pub mod model;
pub mod settings;

// Re-export key types
pub use config::Config;
pub use error::{BadgerError, Result};
pub use model::InstalledApp;
pub use settings::Settings;
