// badger-common/src/error.rs
use std::sync::Arc;

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum BadgerError {
    #[error("I/O Error: {0}")]
    Io(#[from] Arc<std::io::Error>),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] Arc<serde_json::Error>),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("AppImage not found: {0}")]
    NotFound(String),

    #[error("Permission Error: {0}")]
    Permission(String),

    #[error("Failed to extract AppImage: {0}")]
    Extraction(String),

    #[error("No .desktop file found in AppImage (searched {0})")]
    DescriptorNotFound(String),

    #[error("Invalid .desktop file: {0}")]
    InvalidDescriptor(String),

    #[error("Installation Error: {0}")]
    Install(String),

    #[error("Failed to execute command: {0}")]
    CommandExec(String),

    #[error("Generic Error: {0}")]
    Generic(String),
}

impl From<std::io::Error> for BadgerError {
    fn from(err: std::io::Error) -> Self {
        BadgerError::Io(Arc::new(err))
    }
}

impl From<serde_json::Error> for BadgerError {
    fn from(err: serde_json::Error) -> Self {
        BadgerError::Json(Arc::new(err))
    }
}

pub type Result<T> = std::result::Result<T, BadgerError>;
