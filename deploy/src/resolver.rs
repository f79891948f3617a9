//! Mapping between script files and logical script names.
//!
//! A script's logical name is its path relative to the script root with the
//! `.lua` extension removed and directories joined by `.`, the way Lua's
//! `require` addresses modules: `ai/combat.lua` is `ai.combat`.

use std::ffi::OsStr;
use std::fmt;
use std::path::{Component, Path, PathBuf};

use tracing::warn;

/// Extension of deployable scripts.
pub const SCRIPT_EXTENSION: &str = "lua";

/// Logical name of the script the game server runs.
pub const ENTRYPOINT_NAME: &str = "main";

const SEPARATOR: char = '.';

/// Logical name of a script, as stored on the server.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LogicalName(String);

impl LogicalName {
    /// Validate a name received from the server.
    ///
    /// Rejects names that cannot be laid out on disk: empty segments and
    /// path separators.
    pub fn parse(name: &str) -> Option<Self> {
        let valid = !name.is_empty()
            && name
                .split(SEPARATOR)
                .all(|segment| !segment.is_empty() && !segment.contains(['/', '\\']));
        valid.then(|| Self(name.to_string()))
    }

    fn from_segments(segments: &[&str]) -> Option<Self> {
        if segments.is_empty() {
            return None;
        }
        Self::parse(&segments.join("."))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the entry-point script.
    pub fn is_entrypoint(&self) -> bool {
        self.0 == ENTRYPOINT_NAME
    }

    /// Human-readable form used in console notifications.
    pub fn pretty(&self) -> PrettyName<'_> {
        PrettyName(self)
    }
}

impl fmt::Display for LogicalName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Renders `entrypoint script 'main'` or `module '<name>'`.
#[derive(Debug, Clone, Copy)]
pub struct PrettyName<'a>(&'a LogicalName);

impl fmt::Display for PrettyName<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_entrypoint() {
            write!(f, "entrypoint script '{ENTRYPOINT_NAME}'")
        } else {
            write!(f, "module '{}'", self.0)
        }
    }
}

/// A script on disk together with its logical name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptFile {
    /// Location on disk.
    pub path: PathBuf,

    /// Logical name.
    pub name: LogicalName,
}

/// Whether `path` has the script extension.
pub fn is_script_path(path: &Path) -> bool {
    path.extension() == Some(OsStr::new(SCRIPT_EXTENSION))
}

/// Resolve the logical name of `path` below `root`.
///
/// Returns `None` for paths without the script extension, for paths
/// outside the root, and for paths with a `.` in a directory or file stem:
/// `ai.combat.lua` would share the name of `ai/combat.lua`. A relative path
/// that does not start with `root` is taken to be relative to it.
pub fn resolve_name(root: &Path, path: &Path) -> Option<LogicalName> {
    if !is_script_path(path) {
        return None;
    }

    let relative = match path.strip_prefix(root) {
        Ok(relative) => relative,
        Err(_) if path.is_relative() => path,
        Err(_) => return None,
    };

    let stem = relative.with_extension("");
    let mut segments = Vec::new();
    for component in stem.components() {
        match component {
            Component::Normal(segment) => {
                let segment = segment.to_str()?;
                if segment.is_empty() || segment.contains(SEPARATOR) {
                    warn!(
                        "Skipping {}: '{SEPARATOR}' in a script path is reserved for module names",
                        path.display()
                    );
                    return None;
                }
                segments.push(segment);
            }
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }

    LogicalName::from_segments(&segments)
}

/// The directory scripts are deployed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptRoot {
    root: PathBuf,
}

impl ScriptRoot {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Resolve `path` to a script file, or `None` if it is not a script
    /// under this root.
    pub fn resolve(&self, path: &Path) -> Option<ScriptFile> {
        let name = resolve_name(&self.root, path)?;
        let path = if path.starts_with(&self.root) || path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        };
        Some(ScriptFile { path, name })
    }

    /// Where the script called `name` lives on disk.
    pub fn path_for(&self, name: &LogicalName) -> PathBuf {
        let mut path = self.root.clone();
        path.extend(name.as_str().split(SEPARATOR));
        path.set_extension(SCRIPT_EXTENSION);
        path
    }
}
