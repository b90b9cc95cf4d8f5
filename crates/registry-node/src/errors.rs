//! Node error types.

use registry_contract::config::ConfigError;
use registry_contract::errors::LedgerError;
use std::path::PathBuf;
use thiserror::Error;

/// Failures outside a single invocation: startup, I/O, shutdown.
#[derive(Debug, Error)]
pub enum NodeError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid file {path}: {reason}")]
    InvalidFile { path: PathBuf, reason: String },

    #[error("gateway stream error: {0}")]
    Stream(#[from] std::io::Error),

    #[error("response encoding failed: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),
}
