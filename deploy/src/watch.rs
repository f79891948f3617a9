//! Watch loop: directory events in, deployments out.

use playerbot_directory_watcher::{ChangeEvent, DirectoryWatcher, WatchConfig, WatcherError};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::error::Result;
use crate::reporter::{ChangeReporter, Deployment};

/// A running watcher and the task deploying its events.
pub struct WatchSession {
    watcher: DirectoryWatcher,
    task: JoinHandle<ChangeReporter>,
}

impl WatchSession {
    /// Start watching the reporter's script root.
    ///
    /// Returns as soon as the watcher is registered; events are handled on a
    /// spawned task, one at a time.
    pub fn start(reporter: ChangeReporter) -> Result<Self> {
        let config = WatchConfig::new(reporter.deployer().root().path());
        Self::start_with(config, reporter)
    }

    /// Start with an explicit watch configuration.
    pub fn start_with(config: WatchConfig, reporter: ChangeReporter) -> Result<Self> {
        let mut watcher = DirectoryWatcher::new(config)?;
        let events = watcher.take_events().ok_or_else(|| {
            WatcherError::AlreadyWatching(watcher.config().path.display().to_string())
        })?;
        watcher.start()?;

        let task = tokio::spawn(run(events, reporter, |deployment| {
            println!("{deployment}");
        }));

        Ok(Self { watcher, task })
    }

    /// Stop watching. Events still queued are dropped and an in-flight
    /// request is abandoned.
    pub fn stop(mut self) {
        self.watcher.stop();
        self.task.abort();
        info!("Watch session stopped");
    }

    pub fn is_running(&self) -> bool {
        self.watcher.is_running() && !self.task.is_finished()
    }
}

/// Feed every event to the reporter until the channel closes.
///
/// A failed deployment is logged and the loop moves on to the next event.
/// Returns the reporter so callers can inspect its ledger.
pub async fn run<F>(
    mut events: mpsc::Receiver<ChangeEvent>,
    mut reporter: ChangeReporter,
    mut notify: F,
) -> ChangeReporter
where
    F: FnMut(&Deployment),
{
    while let Some(event) = events.recv().await {
        match reporter.handle(&event).await {
            Ok(Some(deployment)) => notify(&deployment),
            Ok(None) => {}
            Err(e) => error!(
                "Failed to deploy {} of {}: {e}",
                event.kind(),
                event.path().display()
            ),
        }
    }
    reporter
}
