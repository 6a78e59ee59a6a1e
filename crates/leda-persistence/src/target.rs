//! Save targets and picker outcomes.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// A resolved storage location that document content is written to.
///
/// The editor keeps at most one active target at a time; it changes when the
/// user opens a file or saves under a new name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SaveTarget {
    path: PathBuf,
}

impl SaveTarget {
    /// Create a target for the given path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path on disk.
    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Short name for status bars and window titles.
    pub fn display_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

impl From<PathBuf> for SaveTarget {
    fn from(path: PathBuf) -> Self {
        Self::new(path)
    }
}

impl From<&Path> for SaveTarget {
    fn from(path: &Path) -> Self {
        Self::new(path)
    }
}

impl fmt::Display for SaveTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

/// Outcome of asking the user for a location.
///
/// Cancelling the picker is a normal exit path, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The user chose a location.
    Resolved(SaveTarget),
    /// The user dismissed the picker.
    Cancelled,
}

impl Resolution {
    /// The chosen target, if any.
    pub fn into_target(self) -> Option<SaveTarget> {
        match self {
            Self::Resolved(target) => Some(target),
            Self::Cancelled => None,
        }
    }
}

impl From<Option<PathBuf>> for Resolution {
    fn from(path: Option<PathBuf>) -> Self {
        path.map_or(Self::Cancelled, |p| Self::Resolved(SaveTarget::new(p)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_uses_file_name() {
        let target = SaveTarget::new("/home/user/notes/todo.md");
        assert_eq!(target.display_name(), "todo.md");
        assert_eq!(target.to_string(), "/home/user/notes/todo.md");
    }

    #[test]
    fn test_display_name_without_file_name() {
        let target = SaveTarget::new("/");
        assert_eq!(target.display_name(), "/");
    }

    #[test]
    fn test_resolution_from_dialog_result() {
        assert_eq!(Resolution::from(None), Resolution::Cancelled);
        assert_eq!(
            Resolution::from(Some(PathBuf::from("a.txt"))).into_target(),
            Some(SaveTarget::new("a.txt"))
        );
    }
}
