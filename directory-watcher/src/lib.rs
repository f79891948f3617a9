//! # Directory Watcher
//!
//! This crate watches the local script directory and turns raw file system
//! notifications into [`ChangeEvent`]s for the deploy pipeline.
//!
//! ## Features
//!
//! - **Recursive Watching**: Monitor the whole script tree
//! - **Event Normalization**: Collapse platform events into four kinds
//! - **Channel Delivery**: Events arrive on a bounded tokio channel
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Directory Watcher                            │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  WatchConfig ──► notify backend ──► ChangeEvent ──► mpsc        │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod event;
pub mod watcher;

pub use config::WatchConfig;
pub use error::{Result, WatcherError};
pub use event::{ChangeEvent, ChangeKind};
pub use watcher::DirectoryWatcher;
