//! Change events produced by directory watching.

use std::fmt;
use std::path::{Path, PathBuf};

use notify::event::{ModifyKind, RenameMode};
use notify::EventKind;

/// A change to a file in the watched tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeEvent {
    /// File was created.
    Created(PathBuf),

    /// File contents changed.
    Modified(PathBuf),

    /// File was deleted.
    Deleted(PathBuf),

    /// File was moved or renamed to this path.
    Moved(PathBuf),
}

/// Kind of a [`ChangeEvent`], without its path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    Created,
    Modified,
    Deleted,
    Moved,
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Created => "created",
            Self::Modified => "modified",
            Self::Deleted => "deleted",
            Self::Moved => "moved",
        };
        f.write_str(name)
    }
}

impl ChangeEvent {
    /// Build an event of the given kind.
    pub fn new(kind: ChangeKind, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match kind {
            ChangeKind::Created => Self::Created(path),
            ChangeKind::Modified => Self::Modified(path),
            ChangeKind::Deleted => Self::Deleted(path),
            ChangeKind::Moved => Self::Moved(path),
        }
    }

    /// The kind of change.
    pub fn kind(&self) -> ChangeKind {
        match self {
            Self::Created(_) => ChangeKind::Created,
            Self::Modified(_) => ChangeKind::Modified,
            Self::Deleted(_) => ChangeKind::Deleted,
            Self::Moved(_) => ChangeKind::Moved,
        }
    }

    /// Path of the affected file. For moves this is the destination.
    pub fn path(&self) -> &Path {
        match self {
            Self::Created(path) | Self::Modified(path) | Self::Deleted(path) | Self::Moved(path) => {
                path
            }
        }
    }

    /// Whether the event removes the file.
    pub fn is_delete(&self) -> bool {
        matches!(self, Self::Deleted(_))
    }

    /// Convert a raw notify event into change events.
    ///
    /// Access and metadata-only events are dropped, as is the source half of
    /// a rename: a move only ever reports its destination.
    pub fn from_notify(event: &notify::Event) -> Vec<Self> {
        let kind = match event.kind {
            EventKind::Create(_) => ChangeKind::Created,
            EventKind::Remove(_) => ChangeKind::Deleted,
            EventKind::Modify(ModifyKind::Name(rename)) => {
                return Self::from_rename(rename, &event.paths);
            }
            EventKind::Modify(ModifyKind::Metadata(_)) => return Vec::new(),
            EventKind::Modify(_) => ChangeKind::Modified,
            EventKind::Access(_) | EventKind::Any | EventKind::Other => return Vec::new(),
        };

        event
            .paths
            .iter()
            .map(|path| Self::new(kind, path.clone()))
            .collect()
    }

    fn from_rename(mode: RenameMode, paths: &[PathBuf]) -> Vec<Self> {
        match mode {
            RenameMode::To => paths.iter().cloned().map(Self::Moved).collect(),
            RenameMode::Both => paths.last().cloned().map(Self::Moved).into_iter().collect(),
            RenameMode::From => Vec::new(),
            // Backends that cannot tell the halves apart report each path
            // once; only the one still on disk is a destination.
            RenameMode::Any | RenameMode::Other => paths
                .iter()
                .filter(|path| path.exists())
                .cloned()
                .map(Self::Moved)
                .collect(),
        }
    }
}
