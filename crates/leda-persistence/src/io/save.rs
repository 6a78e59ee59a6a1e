//! Document saving operations.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PersistenceError, Result};

/// How content replaces what is already stored at a path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteMode {
    /// Truncate the file and write in place. A failure part-way through can
    /// leave a partially written file.
    #[default]
    Direct,
    /// Write a sibling temp file, sync it, then rename over the target.
    Atomic,
}

/// Write `content` to `path`, replacing prior content.
pub fn save_text(path: &Path, content: &str, mode: WriteMode) -> Result<()> {
    // Create parent directory if needed
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| PersistenceError::Io {
            operation: "create directory",
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    match mode {
        WriteMode::Direct => write_in_place(path, content)?,
        WriteMode::Atomic => write_atomic(path, content)?,
    }

    tracing::info!(bytes = content.len(), "Saved document to {}", path.display());
    Ok(())
}

fn write_in_place(path: &Path, content: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .map_err(|e| PersistenceError::Io {
            operation: "open",
            path: path.to_path_buf(),
            source: e,
        })?;

    file.write_all(content.as_bytes())
        .and_then(|()| file.flush())
        .map_err(|e| PersistenceError::Io {
            operation: "write",
            path: path.to_path_buf(),
            source: e,
        })
}

fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let temp_path = temp_path_for(path);

    let mut file = File::create(&temp_path).map_err(|e| PersistenceError::Io {
        operation: "create",
        path: temp_path.clone(),
        source: e,
    })?;

    file.write_all(content.as_bytes())
        .map_err(|e| PersistenceError::Io {
            operation: "write",
            path: temp_path.clone(),
            source: e,
        })?;

    file.sync_all().map_err(|e| PersistenceError::Io {
        operation: "sync",
        path: temp_path.clone(),
        source: e,
    })?;

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        PersistenceError::AtomicWriteFailed {
            temp_path: temp_path.clone(),
            target_path: path.to_path_buf(),
            source: e,
        }
    })
}

/// `notes.txt` -> `notes.txt.tmp`, in the same directory so rename stays on one filesystem.
fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}
