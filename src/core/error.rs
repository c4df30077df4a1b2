//! Error types for the stamina watcher

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Invalid settings; raised before the poll loop starts.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Configured data does not match what the ledger reports.
    #[error("Data inconsistency: {0}")]
    DataInconsistency(String),

    #[error("Remote call failed: {0}")]
    RemoteCall(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Settings error: {0}")]
    Settings(#[from] serde_json::Error),
}

impl Error {
    /// Whether retrying on the next cycle cannot help.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Configuration(_) | Self::DataInconsistency(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
