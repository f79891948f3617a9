//! Throttled deployment of watched script changes.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::slice;
use std::time::{Duration, Instant};

use playerbot_directory_watcher::ChangeEvent;
use tracing::{debug, trace};

use crate::error::Result;
use crate::resolver::LogicalName;
use crate::workspace::Deployer;

/// Last upload time per script path.
///
/// Entries are only added or refreshed, never removed, so a path seen once
/// stays throttled for one window after each upload.
#[derive(Debug, Clone)]
pub struct ThrottleLedger {
    window: Duration,
    sends: HashMap<PathBuf, Instant>,
}

impl ThrottleLedger {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            sends: HashMap::new(),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Whether an upload of `path` at `now` falls inside the window of the
    /// previous one.
    pub fn is_throttled(&self, path: &Path, now: Instant) -> bool {
        self.sends
            .get(path)
            .is_some_and(|last| now.saturating_duration_since(*last) < self.window)
    }

    /// Record an upload of `path` at `now`.
    pub fn record(&mut self, path: PathBuf, now: Instant) {
        self.sends.insert(path, now);
    }

    pub fn last_sent(&self, path: &Path) -> Option<Instant> {
        self.sends.get(path).copied()
    }

    pub fn len(&self) -> usize {
        self.sends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sends.is_empty()
    }
}

/// What a handled change did on the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeploymentKind {
    /// The script was created or replaced.
    Upsert,

    /// The script was removed.
    Removal,
}

/// A change that reached the server.
///
/// Displays as the console notification, e.g. `Deployed module 'util'`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deployment {
    pub kind: DeploymentKind,
    pub script: LogicalName,
}

impl fmt::Display for Deployment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            DeploymentKind::Upsert => write!(f, "Deployed {}", self.script.pretty()),
            DeploymentKind::Removal => write!(f, "Deployed removal of {}", self.script.pretty()),
        }
    }
}

/// Turns change events into uploads and deletes.
///
/// Deletes always go through. Creates, modifications and moves are the same
/// upsert signal and are throttled per path.
///
/// Upserts of a directory whose name ends in `.lua` are ignored. A removed
/// path cannot be inspected afterwards, so deleting such a directory still
/// sends a delete for a module that never existed.
pub struct ChangeReporter {
    deployer: Deployer,
    ledger: ThrottleLedger,
}

impl ChangeReporter {
    pub fn new(deployer: Deployer, window: Duration) -> Self {
        Self {
            deployer,
            ledger: ThrottleLedger::new(window),
        }
    }

    pub fn ledger(&self) -> &ThrottleLedger {
        &self.ledger
    }

    pub fn deployer(&self) -> &Deployer {
        &self.deployer
    }

    /// Handle `event` now.
    pub async fn handle(&mut self, event: &ChangeEvent) -> Result<Option<Deployment>> {
        self.handle_at(event, Instant::now()).await
    }

    /// Handle `event` as if it arrived at `now`.
    ///
    /// Returns `None` when the event was ignored or throttled. On error
    /// nothing is recorded.
    pub async fn handle_at(
        &mut self,
        event: &ChangeEvent,
        now: Instant,
    ) -> Result<Option<Deployment>> {
        let path = event.path();
        let Some(script) = self.deployer.root().resolve(path) else {
            trace!("Ignoring {} of {}", event.kind(), path.display());
            return Ok(None);
        };

        match event {
            ChangeEvent::Deleted(_) => {
                self.deployer.delete_scripts(slice::from_ref(&script)).await?;
                Ok(Some(Deployment {
                    kind: DeploymentKind::Removal,
                    script: script.name,
                }))
            }
            ChangeEvent::Created(_) | ChangeEvent::Modified(_) | ChangeEvent::Moved(_) => {
                if script.path.is_dir() {
                    trace!("Ignoring {} of directory {}", event.kind(), path.display());
                    return Ok(None);
                }
                if self.ledger.is_throttled(path, now) {
                    debug!("Throttled {} of {}", event.kind(), path.display());
                    return Ok(None);
                }

                self.deployer
                    .upload_scripts(slice::from_ref(&script), false)
                    .await?;
                self.ledger.record(path.to_path_buf(), now);
                Ok(Some(Deployment {
                    kind: DeploymentKind::Upsert,
                    script: script.name,
                }))
            }
        }
    }
}
