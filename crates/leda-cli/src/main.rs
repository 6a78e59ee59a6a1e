//! Leda command-line editor.

use std::io::{self, IsTerminal};

use anyhow::Context;
use clap::{ColorChoice, Parser};
use leda_cli::logging::{LogConfig, LogFormat, init_logging};
use leda_cli::session::{Session, spawn_notification_printer};
use leda_cli::settings::Settings;
use leda_persistence::FsStore;
use tokio::io::BufReader;
use tracing::level_filters::LevelFilter;

mod cli;

use crate::cli::{Cli, LogFormatArg, LogLevelArg};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match run(cli).await {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let settings = match &cli.config {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    }
    .with_overrides(cli.autosave, cli.interval);

    let store = FsStore::new(settings.persistence.write_mode);
    let session = Session::new(store, settings.autosave).context("Invalid auto-save interval")?;
    let printer = spawn_notification_printer(session.autosave().subscribe());

    if let Some(file) = cli.file {
        session.open_initial(file).await?;
    }
    println!("{}", session.status());

    let result = session
        .run(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
        .await;

    session.shutdown().await;
    // Ends once the coordinator has dropped its sender
    if let Err(e) = printer.await {
        tracing::warn!("Notification printer ended abnormally: {e}");
    }
    result
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
