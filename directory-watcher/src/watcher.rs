//! Directory watcher implementation.

use notify::{RecommendedWatcher, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::config::WatchConfig;
use crate::error::{Result, WatcherError};
use crate::event::ChangeEvent;

/// Watches one directory tree and forwards changes over a channel.
///
/// Starting is non-blocking: the notify backend runs on its own thread and
/// pushes events into the channel returned by [`DirectoryWatcher::take_events`].
pub struct DirectoryWatcher {
    /// Watched directory.
    config: WatchConfig,

    /// Internal notify watcher, present while running.
    watcher: Option<RecommendedWatcher>,

    /// Event sender.
    event_tx: mpsc::Sender<ChangeEvent>,

    /// Event receiver, until a consumer takes it.
    event_rx: Option<mpsc::Receiver<ChangeEvent>>,
}

impl DirectoryWatcher {
    /// Create a watcher for an existing directory.
    pub fn new(config: WatchConfig) -> Result<Self> {
        let path = &config.path;

        if !path.exists() {
            return Err(WatcherError::DirectoryNotFound(path.display().to_string()));
        }

        if !path.is_dir() {
            return Err(WatcherError::NotADirectory(path.display().to_string()));
        }

        let (event_tx, event_rx) = mpsc::channel(config.channel_capacity);

        Ok(Self {
            config,
            watcher: None,
            event_tx,
            event_rx: Some(event_rx),
        })
    }

    /// Start watching the configured directory.
    pub fn start(&mut self) -> Result<()> {
        if self.watcher.is_some() {
            return Err(WatcherError::AlreadyWatching(
                self.config.path.display().to_string(),
            ));
        }

        let event_tx = self.event_tx.clone();

        let mut watcher = notify::recommended_watcher(
            move |res: std::result::Result<notify::Event, notify::Error>| match res {
                Ok(event) => {
                    for change in ChangeEvent::from_notify(&event) {
                        debug!("{} {}", change.kind(), change.path().display());
                        if let Err(e) = event_tx.blocking_send(change) {
                            warn!("Dropping file event, receiver closed: {e}");
                        }
                    }
                }
                Err(e) => {
                    error!("Watch error: {e}");
                }
            },
        )?;

        watcher.watch(&self.config.path, self.config.recursive_mode())?;
        self.watcher = Some(watcher);

        info!("Watching {}", self.config.path.display());
        Ok(())
    }

    /// Stop watching. Pending events stay in the channel.
    pub fn stop(&mut self) {
        if let Some(mut watcher) = self.watcher.take() {
            if let Err(e) = watcher.unwatch(&self.config.path) {
                debug!("Failed to unwatch {}: {e}", self.config.path.display());
            }
            info!("Stopped watching {}", self.config.path.display());
        }
    }

    /// Check if the watcher is running.
    pub fn is_running(&self) -> bool {
        self.watcher.is_some()
    }

    /// Take the event receiver. Only the first call returns `Some`.
    pub fn take_events(&mut self) -> Option<mpsc::Receiver<ChangeEvent>> {
        self.event_rx.take()
    }

    /// The watch configuration.
    pub fn config(&self) -> &WatchConfig {
        &self.config
    }
}

impl Drop for DirectoryWatcher {
    fn drop(&mut self) {
        self.stop();
    }
}
