//! Document loading operations.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::{PersistenceError, Result};

/// Read the text stored at `path`.
pub fn load_text(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => PersistenceError::TargetMissing {
            path: path.to_path_buf(),
        },
        _ => PersistenceError::Io {
            operation: "read",
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    let text = String::from_utf8(bytes).map_err(|_| PersistenceError::InvalidContent {
        path: path.to_path_buf(),
    })?;

    tracing::info!(bytes = text.len(), "Loaded document from {}", path.display());
    Ok(text)
}
