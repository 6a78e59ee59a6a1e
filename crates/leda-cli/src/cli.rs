//! CLI argument definitions for the Leda editor.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "leda",
    version,
    about = "Leda - a line-oriented text editor with auto-save",
    long_about = "Edit a text document line by line.\n\n\
                  Lines typed at the prompt are appended to the document. Lines starting\n\
                  with ':' are commands (:w, :saveas, :e, :autosave, :interval, :clear,\n\
                  :status, :p, :q). Type :help for details."
)]
pub struct Cli {
    /// Document to edit. Opened when it exists, otherwise used as the save
    /// target for a new document.
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Start with auto-save enabled.
    #[arg(long = "autosave")]
    pub autosave: bool,

    /// Auto-save interval in seconds (5-300).
    #[arg(long = "interval", value_name = "SECONDS")]
    pub interval: Option<u64>,

    /// Settings file to use instead of the per-user config.
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(long = "log-format", value_enum, default_value = "pretty")]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
