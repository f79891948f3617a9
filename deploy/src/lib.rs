//! # Deploy
//!
//! Keeps a local directory of Lua scripts and the playerbot server in step:
//!
//! - **Resolver**: file paths to logical script names and back
//! - **Workspace**: full deploys, downloads and the starter script
//! - **Reporter**: per-file throttled deploys of watched changes
//! - **Watch**: the loop tying the directory watcher to the reporter
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         Deploy                                  │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  DirectoryWatcher ──► WatchSession ──► ChangeReporter           │
//! │                                            │                    │
//! │                                            ▼                    │
//! │                     ScriptRoot ◄──── Deployer ──► ScriptGateway │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod reporter;
pub mod resolver;
pub mod watch;
pub mod workspace;

#[cfg(test)]
mod test_support;

pub use config::{ClientConfig, ConfigLoad, DEFAULT_CONFIG_FILE};
pub use error::{DeployError, Result};
pub use reporter::{ChangeReporter, Deployment, DeploymentKind, ThrottleLedger};
pub use resolver::{LogicalName, ScriptFile, ScriptRoot, resolve_name};
pub use watch::WatchSession;
pub use workspace::{Deployer, DownloadReport, discover_scripts, ensure_root, init_script_dir};

// Re-export from dependencies for convenience
pub use playerbot_directory_watcher::ChangeEvent;
pub use playerbot_gateway::{AccountId, HttpGateway, ScriptGateway};
