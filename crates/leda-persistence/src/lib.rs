//! Persistence boundary for the Leda editor.
//!
//! This crate resolves where a document lives and moves its text to and from
//! that location. It knows nothing about scheduling; the autosave coordinator
//! drives it.
//!
//! # Features
//!
//! - **Save targets** as opaque, cloneable handles to a storage location
//! - **Stores** behind the [`TargetStore`] trait: the filesystem
//!   ([`FsStore`], in-place or atomic writes) and memory ([`MemoryStore`])
//! - **Pickers** behind the [`TargetPicker`] trait, where cancelling is a
//!   normal [`Resolution`] rather than an error
//!
//! # Example
//!
//! ```ignore
//! use leda_persistence::{FsStore, SaveTarget, TargetStore};
//!
//! let store = FsStore::default();
//! let target = SaveTarget::new("notes.txt");
//! store.write_to_target(&target, "hello".to_string()).await?;
//! let text = store.read_from_target(&target).await?;
//! ```
//!
//! # Architecture
//!
//! - `target.rs` - [`SaveTarget`] and [`Resolution`]
//! - `store.rs` - [`TargetStore`] and its implementations
//! - `picker.rs` - [`TargetPicker`] and target resolution
//! - `io/` - Blocking file operations (save, load)
//! - `error.rs` - Error types with user-friendly messages

mod error;
mod io;
mod picker;
mod store;
mod target;

pub use error::{PersistenceError, Result};
pub use io::{WriteMode, load_text, save_text};
pub use picker::{PresetPicker, TargetPicker, UNTITLED, resolve_new_target};
pub use store::{FsStore, MemoryStore, TargetStore};
pub use target::{Resolution, SaveTarget};
