//! Error types for deploying scripts.

use std::path::PathBuf;

use playerbot_directory_watcher::WatcherError;
use playerbot_gateway::GatewayError;
use thiserror::Error;

/// Result type alias for deploy operations.
pub type Result<T> = std::result::Result<T, DeployError>;

/// Errors that can occur while deploying scripts.
#[derive(Error, Debug)]
pub enum DeployError {
    /// Configuration file could not be parsed.
    #[error("failed to parse {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Configuration values are unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A local script could not be read.
    #[error("failed to read script {}: {source}", path.display())]
    ReadScript {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Remote API error.
    #[error("gateway error: {0}")]
    Gateway(#[from] GatewayError),

    /// Directory watcher error.
    #[error("watcher error: {0}")]
    Watcher(#[from] WatcherError),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
