//! Stores that read and write document content at a [`SaveTarget`].

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::{PersistenceError, Result};
use crate::io::{WriteMode, load_text, save_text};
use crate::target::SaveTarget;

/// Reads and writes whole documents.
///
/// A write replaces everything previously stored at the target. It is a best
/// effort single write: callers must not assume a failed write was rolled back.
pub trait TargetStore: Send + Sync + 'static {
    /// Write exactly `content` to `target`.
    fn write_to_target(
        &self,
        target: &SaveTarget,
        content: String,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Read the full content stored at `target`.
    fn read_from_target(&self, target: &SaveTarget) -> impl Future<Output = Result<String>> + Send;
}

/// Store backed by the local filesystem.
///
/// Blocking file I/O runs on tokio's blocking pool.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsStore {
    mode: WriteMode,
}

impl FsStore {
    /// Create a store that writes with the given mode.
    pub fn new(mode: WriteMode) -> Self {
        Self { mode }
    }

    /// The configured write mode.
    pub fn mode(&self) -> WriteMode {
        self.mode
    }
}

impl TargetStore for FsStore {
    async fn write_to_target(&self, target: &SaveTarget, content: String) -> Result<()> {
        let path = target.path().to_path_buf();
        let mode = self.mode;
        tokio::task::spawn_blocking(move || save_text(&path, &content, mode))
            .await
            .map_err(|source| PersistenceError::Task { source })?
    }

    async fn read_from_target(&self, target: &SaveTarget) -> Result<String> {
        let path = target.path().to_path_buf();
        tokio::task::spawn_blocking(move || load_text(&path))
            .await
            .map_err(|source| PersistenceError::Task { source })?
    }
}

/// In-memory store.
///
/// Keeps the latest content per target plus a log of every write, and can
/// simulate write failures for exercising error paths.
#[derive(Debug, Default)]
pub struct MemoryStore {
    files: Mutex<HashMap<SaveTarget, String>>,
    writes: Mutex<Vec<(SaveTarget, String)>>,
    simulate_write_error: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed content at a target without recording a write.
    pub fn insert(&self, target: SaveTarget, content: impl Into<String>) {
        lock(&self.files).insert(target, content.into());
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.simulate_write_error.store(simulate, Ordering::SeqCst);
    }

    /// Latest content stored at `target`.
    pub fn content(&self, target: &SaveTarget) -> Option<String> {
        lock(&self.files).get(target).cloned()
    }

    /// Every successful write, oldest first.
    pub fn writes(&self) -> Vec<(SaveTarget, String)> {
        lock(&self.writes).clone()
    }

    /// Number of successful writes.
    pub fn write_count(&self) -> usize {
        lock(&self.writes).len()
    }
}

impl TargetStore for MemoryStore {
    async fn write_to_target(&self, target: &SaveTarget, content: String) -> Result<()> {
        if self.simulate_write_error.load(Ordering::SeqCst) {
            return Err(PersistenceError::Simulated {
                operation: "write",
                path: target.path().to_path_buf(),
            });
        }
        lock(&self.files).insert(target.clone(), content.clone());
        lock(&self.writes).push((target.clone(), content));
        Ok(())
    }

    async fn read_from_target(&self, target: &SaveTarget) -> Result<String> {
        lock(&self.files)
            .get(target)
            .cloned()
            .ok_or_else(|| PersistenceError::TargetMissing {
                path: target.path().to_path_buf(),
            })
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
