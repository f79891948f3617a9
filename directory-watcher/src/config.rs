//! Configuration for watching a script directory.

use std::path::PathBuf;

/// Default capacity of the event channel.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;

/// Configuration for a watched directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchConfig {
    /// Path to the directory.
    pub path: PathBuf,

    /// Whether subdirectories are watched too.
    pub recursive: bool,

    /// Number of events buffered before the backend blocks.
    pub channel_capacity: usize,
}

impl WatchConfig {
    /// Create a recursive watch config for `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            recursive: true,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }

    /// Only watch the top level of the directory.
    pub fn non_recursive(mut self) -> Self {
        self.recursive = false;
        self
    }

    /// Set the event channel capacity (at least one).
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity.max(1);
        self
    }

    pub(crate) fn recursive_mode(&self) -> notify::RecursiveMode {
        if self.recursive {
            notify::RecursiveMode::Recursive
        } else {
            notify::RecursiveMode::NonRecursive
        }
    }
}
