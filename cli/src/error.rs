//! Unified error handling for the CLI.

use crate::config::ConfigError;
use std::path::PathBuf;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Engine error: {0}")]
    Engine(#[from] carhire_engine::Error),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Usage: {0}")]
    Usage(String),
}

/// Result type alias for commands.
pub type Result<T> = std::result::Result<T, CliError>;
