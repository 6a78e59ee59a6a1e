//! Notifications published by the coordinator.
//!
//! Front ends subscribe to a broadcast channel. Publishing never blocks: a
//! subscriber that falls behind loses the oldest messages, and with no
//! subscribers messages are dropped.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use leda_persistence::{PersistenceError, SaveTarget};
use tokio::sync::broadcast;

/// Buffered notifications per subscriber.
const CHANNEL_CAPACITY: usize = 64;

/// What started a save.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveTrigger {
    AutoSave,
    Manual,
}

/// Event reported to front ends.
#[derive(Debug, Clone)]
pub enum Notification {
    /// Auto-save was armed or disarmed.
    StateChanged { armed: bool },

    /// Content was written.
    Saved {
        target: SaveTarget,
        at: DateTime<Utc>,
        trigger: SaveTrigger,
    },

    /// A scheduled save failed. Auto-save stays armed and retries on the
    /// next tick.
    SaveFailed {
        target: SaveTarget,
        error: Arc<PersistenceError>,
    },

    /// A tick found no file to save to and turned auto-save off.
    AutoSaveDisabledNoTarget,

    /// The active save target changed (open, save as, clear).
    TargetChanged(Option<SaveTarget>),
}

impl Notification {
    /// Text for a status line or toast.
    pub fn user_message(&self) -> String {
        match self {
            Self::StateChanged { armed: true } => "Auto-save enabled".to_string(),
            Self::StateChanged { armed: false } => "Auto-save disabled".to_string(),
            Self::Saved {
                target, trigger, ..
            } => match trigger {
                SaveTrigger::AutoSave => format!("Auto-saved {}", target.display_name()),
                SaveTrigger::Manual => format!("Saved {}", target.display_name()),
            },
            Self::SaveFailed { error, .. } => {
                format!("Auto-save failed: {}", error.user_message())
            }
            Self::AutoSaveDisabledNoTarget => {
                "Auto-save disabled: no file selected. Save the document to choose a file."
                    .to_string()
            }
            Self::TargetChanged(Some(target)) => format!("Editing {}", target.display_name()),
            Self::TargetChanged(None) => "Editing an unsaved document".to_string(),
        }
    }

    /// Whether this should be shown as an error.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::SaveFailed { .. })
    }
}

/// Fire-and-forget publisher.
#[derive(Debug, Clone)]
pub(crate) struct Notifier {
    tx: broadcast::Sender<Notification>,
}

impl Notifier {
    pub(crate) fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    pub(crate) fn send(&self, notification: Notification) {
        // Err only means nobody is listening
        let _ = self.tx.send(notification);
    }

    pub(crate) fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.tx.subscribe()
    }
}
