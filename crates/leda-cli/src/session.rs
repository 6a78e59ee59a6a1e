//! An interactive editing session.
//!
//! Reads input lines, applies them to the shared document, and drives the
//! auto-save coordinator and manual file operations.

use std::path::PathBuf;

use anyhow::Context;
use chrono::Local;
use leda_autosave::{
    AutoSaveConfig, AutoSaveCoordinator, ConfigError, Notification, SaveOutcome, SharedDocument,
};
use leda_persistence::{PersistenceError, PresetPicker, SaveTarget, TargetStore};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;

use crate::command::{Command, HELP, parse_line};

/// What the session has to say after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Print this to the user.
    Message(String),
    /// Nothing to print; any effect is reported through notifications.
    Silent,
    /// End the session.
    Quit,
}

/// One document being edited.
pub struct Session<S: TargetStore> {
    autosave: AutoSaveCoordinator<S>,
    document: SharedDocument,
}

impl<S: TargetStore> Session<S> {
    /// Create a session with an empty document, arming auto-save when
    /// `config` enables it.
    ///
    /// Must be called inside a tokio runtime.
    pub fn new(store: S, config: AutoSaveConfig) -> Result<Self, ConfigError> {
        let document = SharedDocument::default();
        let autosave = AutoSaveCoordinator::with_config(store, document.clone(), config)?;
        Ok(Self { autosave, document })
    }

    pub fn autosave(&self) -> &AutoSaveCoordinator<S> {
        &self.autosave
    }

    pub fn document(&self) -> &SharedDocument {
        &self.document
    }

    /// Open `path` when it exists, otherwise adopt it as the save target of
    /// the new document.
    pub async fn open_initial(&self, path: PathBuf) -> anyhow::Result<()> {
        let picker = PresetPicker::new(Some(path.clone()));
        match self.load(&picker).await {
            Ok(_) => Ok(()),
            Err(PersistenceError::TargetMissing { .. }) => {
                tracing::info!("Starting new document {}", path.display());
                self.autosave.set_target(Some(SaveTarget::new(path)));
                Ok(())
            }
            Err(e) => Err(e).with_context(|| format!("Failed to open {}", path.display())),
        }
    }

    /// Apply one command.
    pub async fn execute(&self, command: Command) -> Reply {
        match command {
            Command::Append(line) => {
                self.document.push_line(&line);
                Reply::Silent
            }
            Command::Save(None) => match self.autosave.save(&PresetPicker::cancelled()).await {
                Ok(SaveOutcome::Saved(_)) => Reply::Silent,
                Ok(SaveOutcome::Cancelled) => {
                    Reply::Message("No file name. Use :w PATH to choose one.".to_string())
                }
                Err(e) => Reply::Message(describe(&e)),
            },
            Command::Save(Some(path)) | Command::SaveAs(path) => {
                let picker = PresetPicker::new(Some(path));
                match self.autosave.save_as(&picker).await {
                    Ok(_) => Reply::Silent,
                    Err(e) => Reply::Message(describe(&e)),
                }
            }
            Command::Open(path) => match self.load(&PresetPicker::new(Some(path))).await {
                Ok(Some(target)) => Reply::Message(format!(
                    "Read {} bytes from {}",
                    self.document.len(),
                    target.display_name()
                )),
                Ok(None) => Reply::Silent,
                Err(e) => Reply::Message(describe(&e)),
            },
            Command::AutoSave(None) => {
                self.autosave.toggle();
                Reply::Silent
            }
            Command::AutoSave(Some(on)) => {
                if self.autosave.is_armed() == on {
                    let state = if on { "on" } else { "off" };
                    return Reply::Message(format!("Auto-save is already {state}"));
                }
                if on {
                    self.autosave.start();
                } else {
                    self.autosave.stop();
                }
                Reply::Silent
            }
            Command::Interval(seconds) => match self.autosave.set_interval(seconds) {
                Ok(()) => Reply::Message(format!("Auto-save interval set to {seconds}s")),
                Err(e) => Reply::Message(e.user_message()),
            },
            Command::Clear => {
                // Drop the target first so no tick writes the emptied buffer
                self.autosave.clear();
                self.document.clear();
                Reply::Message("New document".to_string())
            }
            Command::Status => Reply::Message(self.status()),
            Command::Print => Reply::Message(self.document.text()),
            Command::Help => Reply::Message(HELP.to_string()),
            Command::Quit => Reply::Quit,
        }
    }

    /// Read lines from `input` until EOF or `:q`, writing replies to `output`.
    pub async fn run<R, W>(&self, input: R, mut output: W) -> anyhow::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = input.lines();
        while let Some(line) = lines.next_line().await.context("Failed to read input")? {
            let reply = match parse_line(&line) {
                Ok(command) => self.execute(command).await,
                Err(e) => Reply::Message(format!("error: {e}")),
            };
            match reply {
                Reply::Quit => break,
                Reply::Silent => {}
                Reply::Message(text) => {
                    output
                        .write_all(format!("{text}\n").as_bytes())
                        .await
                        .context("Failed to write output")?;
                    output.flush().await.context("Failed to write output")?;
                }
            }
        }
        Ok(())
    }

    /// Stop auto-save and wait for a save in progress to finish.
    pub async fn shutdown(self) {
        self.autosave.shutdown().await;
    }

    /// One-line summary of file, size and auto-save state.
    pub fn status(&self) -> String {
        let file = self
            .autosave
            .target()
            .map_or_else(|| "[No file]".to_string(), |t| t.to_string());
        let config = self.autosave.config();
        let autosave = if config.enabled {
            format!("auto-save on, every {}s", config.interval_seconds)
        } else {
            format!("auto-save off ({}s)", config.interval_seconds)
        };
        let saved = self.autosave.last_saved().map_or_else(
            || "not saved".to_string(),
            |at| format!("saved {}", at.with_timezone(&Local).format("%H:%M:%S")),
        );
        format!(
            "{file} | {} bytes | {autosave} | {saved}",
            self.document.len()
        )
    }

    async fn load(&self, picker: &PresetPicker) -> leda_persistence::Result<Option<SaveTarget>> {
        let document = &self.document;
        self.autosave
            .open(picker, |text| document.set_text(text))
            .await
    }
}

/// Print notifications until the coordinator is gone.
pub fn spawn_notification_printer(mut rx: broadcast::Receiver<Notification>) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(n) if n.is_error() => eprintln!("! {}", n.user_message()),
                Ok(n) => println!("* {}", n.user_message()),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("Skipped {skipped} notifications");
                }
                Err(RecvError::Closed) => break,
            }
        }
    })
}

fn describe(error: &PersistenceError) -> String {
    match error.suggestion() {
        Some(hint) => format!("error: {}\n  {hint}", error.user_message()),
        None => format!("error: {}", error.user_message()),
    }
}
