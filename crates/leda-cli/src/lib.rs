//! Library components of the `leda` command-line editor.

pub mod command;
pub mod logging;
pub mod session;
pub mod settings;
