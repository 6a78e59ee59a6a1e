//! File I/O operations for document persistence.
//!
//! This module handles:
//! - Saving text in place or with atomic writes
//! - Loading text with UTF-8 validation

mod load;
mod save;

pub use load::load_text;
pub use save::{WriteMode, save_text};
