//! Client configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{DeployError, Result};

/// File name looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "playerbot.toml";

const CONFIG_TEMPLATE: &str = r#"# Playerbot script client configuration.

# Base URL of the playerbot script API.
api_host = "http://localhost:5000"

# Token from `.bot ai get token` in-game. Tokens expire after a day.
token = ""

# Directory holding your .lua scripts, relative to this file.
src_dir = "scripts"

# Minimum time between two watch deploys of the same file.
watcher_deploy_throttle_ms = 500
"#;

/// Configuration for the script client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the script API.
    pub api_host: String,

    /// In-game account token.
    pub token: String,

    /// Script directory, relative to the configuration file unless absolute.
    pub src_dir: PathBuf,

    /// Throttle window for watch deploys, in milliseconds.
    pub watcher_deploy_throttle_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_host: "http://localhost:5000".to_string(),
            token: String::new(),
            src_dir: PathBuf::from("scripts"),
            watcher_deploy_throttle_ms: 500,
        }
    }
}

/// Outcome of [`ClientConfig::load_or_init`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigLoad {
    /// An existing, valid configuration.
    Loaded(ClientConfig),

    /// No configuration existed; a template was written to this path.
    Created(PathBuf),
}

impl ClientConfig {
    /// Set the API host.
    pub fn with_api_host(mut self, api_host: impl Into<String>) -> Self {
        self.api_host = api_host.into();
        self
    }

    /// Set the account token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = token.into();
        self
    }

    /// Set the script directory.
    pub fn with_src_dir(mut self, src_dir: impl Into<PathBuf>) -> Self {
        self.src_dir = src_dir.into();
        self
    }

    /// Set the throttle window in milliseconds.
    pub fn with_throttle_ms(mut self, ms: u64) -> Self {
        self.watcher_deploy_throttle_ms = ms;
        self
    }

    /// Minimum time between two watch deploys of the same file.
    pub fn throttle_window(&self) -> Duration {
        Duration::from_millis(self.watcher_deploy_throttle_ms)
    }

    /// Resolve the script directory against `base`.
    pub fn src_dir_in(&self, base: &Path) -> PathBuf {
        base.join(&self.src_dir)
    }

    /// Parse and validate a configuration document.
    pub fn parse(source: &str, path: &Path) -> Result<Self> {
        let config: Self = toml::from_str(source).map_err(|source| DeployError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load the configuration at `path`, writing a template if it is missing.
    pub fn load_or_init(path: &Path) -> Result<ConfigLoad> {
        if !path.exists() {
            write_template(path)?;
            info!("Wrote configuration template to {}", path.display());
            return Ok(ConfigLoad::Created(path.to_path_buf()));
        }

        debug!("Loading configuration from {}", path.display());
        let source = std::fs::read_to_string(path)?;
        Self::parse(&source, path).map(ConfigLoad::Loaded)
    }

    /// Check that the values are usable.
    pub fn validate(&self) -> Result<()> {
        let host = self.api_host.trim();
        if !(host.starts_with("http://") || host.starts_with("https://")) {
            return Err(DeployError::InvalidConfig(format!(
                "api_host must be an http(s) URL, got '{}'",
                self.api_host
            )));
        }

        if self.token.trim().is_empty() {
            return Err(DeployError::InvalidConfig(
                "token is empty; use '.bot ai get token' in-game to get one".to_string(),
            ));
        }

        if self.src_dir.as_os_str().is_empty() {
            return Err(DeployError::InvalidConfig("src_dir is empty".to_string()));
        }

        Ok(())
    }
}

fn write_template(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, CONFIG_TEMPLATE)?;
    Ok(())
}
