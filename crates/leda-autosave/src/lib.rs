//! Auto-save scheduler and persistence coordinator for the Leda editor.
//!
//! The [`AutoSaveCoordinator`] periodically writes the open document to its
//! active [`SaveTarget`](leda_persistence::SaveTarget) while the user keeps
//! editing, and coordinates the manual open / save / save-as flows that
//! change that target.
//!
//! # Guarantees
//!
//! - **One timer**: at most one auto-save timer is pending at any time;
//!   repeated start/stop calls are idempotent
//! - **No overlap**: the next wait starts only after the previous save
//!   finished, and manual saves share the same write gate
//! - **Clean cancellation**: a stopped timer never starts another write
//! - **Fresh content**: the document is read when a tick fires, not when it
//!   was scheduled
//!
//! # Example
//!
//! ```ignore
//! use leda_autosave::{AutoSaveCoordinator, SharedDocument};
//! use leda_persistence::{FsStore, SaveTarget};
//!
//! let doc = SharedDocument::new("");
//! let autosave = AutoSaveCoordinator::new(FsStore::default(), doc.clone());
//! autosave.set_target(Some(SaveTarget::new("notes.txt")));
//! autosave.set_interval(30)?;
//! autosave.start();
//! ```
//!
//! # Architecture
//!
//! - `coordinator.rs` - State machine, timer task, manual file operations
//! - `timer.rs` - The scheduled timer handle
//! - `config.rs` - [`AutoSaveConfig`] and interval bounds
//! - `notify.rs` - [`Notification`]s broadcast to front ends
//! - `document.rs` - Read access to the edited text
//! - `error.rs` - [`ConfigError`]

mod config;
mod coordinator;
mod document;
mod error;
mod notify;
mod timer;

pub use config::{
    AutoSaveConfig, DEFAULT_INTERVAL_SECS, MAX_INTERVAL_SECS, MIN_INTERVAL_SECS,
    validate_interval,
};
pub use coordinator::{AutoSaveCoordinator, SaveOutcome};
pub use document::{DocumentSource, SharedDocument};
pub use error::ConfigError;
pub use notify::{Notification, SaveTrigger};
