//! Persistence error types.
//!
//! All persistence operations return structured errors that provide
//! user-friendly messages and optional remediation hints.

use std::path::PathBuf;
use thiserror::Error;

/// Persistence operation error.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// File I/O error.
    #[error("Failed to {operation} file: {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Atomic write failed (temp file couldn't be renamed).
    #[error("Failed to complete save operation")]
    AtomicWriteFailed {
        temp_path: PathBuf,
        target_path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The target holds bytes that are not UTF-8 text.
    #[error("File is not valid UTF-8 text: {path}")]
    InvalidContent { path: PathBuf },

    /// Nothing is stored at the target.
    #[error("File not found: {path}")]
    TargetMissing { path: PathBuf },

    /// The blocking I/O task panicked or was cancelled.
    #[error("Background I/O task failed")]
    Task {
        #[source]
        source: tokio::task::JoinError,
    },

    /// Failure injected by an in-memory store.
    #[error("Simulated {operation} failure: {path}")]
    Simulated {
        operation: &'static str,
        path: PathBuf,
    },
}

impl PersistenceError {
    /// Get a user-friendly message for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::Io {
                operation, path, ..
            } => {
                format!("Could not {} the file at {}", operation, path.display())
            }
            Self::AtomicWriteFailed { target_path, .. } => {
                format!(
                    "Could not save the file to {}. Please check disk space and permissions.",
                    target_path.display()
                )
            }
            Self::InvalidContent { path } => {
                format!(
                    "The file at {} does not contain text that can be edited.",
                    path.display()
                )
            }
            Self::TargetMissing { path } => {
                format!(
                    "The file '{}' could not be found. It may have been moved or deleted.",
                    path.display()
                )
            }
            Self::Task { .. } => "An internal error interrupted the file operation.".to_string(),
            Self::Simulated { operation, path } => {
                format!("Could not {} the file at {}", operation, path.display())
            }
        }
    }

    /// Get a suggestion for how to resolve this error.
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::Io { operation, .. } => {
                if *operation == "read" {
                    Some("Check that the file exists and you have permission to read it.".into())
                } else {
                    Some("Check that you have permission to write to this location.".into())
                }
            }
            Self::AtomicWriteFailed { .. } => {
                Some("Free up disk space or try saving to a different location.".into())
            }
            Self::InvalidContent { .. } => Some("Open a plain text file instead.".into()),
            Self::TargetMissing { .. } => {
                Some("Use Save As to choose a new location for the document.".into())
            }
            Self::Task { .. } | Self::Simulated { .. } => None,
        }
    }
}

/// Result type alias for persistence operations.
pub type Result<T> = std::result::Result<T, PersistenceError>;
