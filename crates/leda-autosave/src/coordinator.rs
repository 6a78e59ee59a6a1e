//! The auto-save coordinator.
//!
//! Owns the auto-save state machine (`Disarmed` / `Armed`), the active save
//! target and the background timer task. Every read and write of that state
//! goes through one mutex, so reconfiguration from the UI cannot race a
//! firing timer.
//!
//! # Timer model
//!
//! Arming spawns one task that loops: wait one interval, save, repeat. Each
//! wait starts only after the previous save finished, so a slow write delays
//! the next tick instead of overlapping it. Stopping sends a cancel signal
//! and drops the timer handle; the task checks its generation under the lock
//! before every save, so a cancelled timer never starts a write. Cancelled
//! tasks are kept until they exit so `shutdown` can wait for a save they are
//! still finishing.
//!
//! Writes from ticks and from manual saves take a separate async write gate,
//! which keeps them strictly sequential even across re-arming.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use leda_persistence::{
    Resolution, Result, SaveTarget, TargetPicker, TargetStore, resolve_new_target,
};
use tokio::runtime::Handle;
use tokio::sync::{broadcast, oneshot};
use tokio::task::JoinHandle;

use crate::config::{AutoSaveConfig, validate_interval};
use crate::document::DocumentSource;
use crate::error::ConfigError;
use crate::notify::{Notification, Notifier, SaveTrigger};
use crate::timer::{LiveTimer, ScheduledTimer};

/// Result of a manual save request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Content was written to this target.
    Saved(SaveTarget),
    /// The user dismissed the location picker; nothing changed.
    Cancelled,
}

/// Drives periodic saving of one document.
///
/// Create one per editor window inside a tokio runtime. All methods take
/// `&self`; the coordinator can be shared behind an `Arc`.
pub struct AutoSaveCoordinator<S: TargetStore> {
    shared: Arc<Shared<S>>,
}

struct Shared<S> {
    state: Mutex<State>,
    store: S,
    document: Arc<dyn DocumentSource>,
    notifier: Notifier,
    /// Held for the duration of every write.
    write_gate: tokio::sync::Mutex<()>,
    live_timers: Arc<AtomicUsize>,
    runtime: Handle,
}

struct State {
    interval: Duration,
    target: Option<SaveTarget>,
    /// `Some` exactly while armed.
    timer: Option<ScheduledTimer>,
    /// Tasks of cancelled timers that may still be finishing a save.
    retired: Vec<JoinHandle<()>>,
    generation: u64,
    last_saved: Option<DateTime<Utc>>,
}

impl State {
    fn is_armed(&self) -> bool {
        self.timer.is_some()
    }

    fn is_current(&self, generation: u64) -> bool {
        self.timer
            .as_ref()
            .is_some_and(|timer| timer.generation() == generation)
    }

    /// Cancel the armed timer. Returns whether one was armed.
    fn disarm(&mut self) -> bool {
        let Some(timer) = self.timer.take() else {
            return false;
        };
        self.retired.retain(|task| !task.is_finished());
        self.retired.push(timer.cancel());
        true
    }
}

/// What a firing timer should do, decided under the state lock.
enum Claim {
    Stale,
    NoTarget,
    Write { target: SaveTarget, content: String },
}

enum TickOutcome {
    Reschedule,
    Finished,
}

impl<S: TargetStore> AutoSaveCoordinator<S> {
    /// Create a disarmed coordinator with the default interval.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn new(store: S, document: impl DocumentSource + 'static) -> Self {
        Self::with_handle(Handle::current(), store, document)
    }

    /// Create a disarmed coordinator that spawns its timer on `runtime`.
    pub fn with_handle(runtime: Handle, store: S, document: impl DocumentSource + 'static) -> Self {
        let shared = Shared {
            state: Mutex::new(State {
                interval: AutoSaveConfig::default().interval(),
                target: None,
                timer: None,
                retired: Vec::new(),
                generation: 0,
                last_saved: None,
            }),
            store,
            document: Arc::new(document),
            notifier: Notifier::new(),
            write_gate: tokio::sync::Mutex::new(()),
            live_timers: Arc::new(AtomicUsize::new(0)),
            runtime,
        };
        Self {
            shared: Arc::new(shared),
        }
    }

    /// Create a coordinator from saved settings, arming it when enabled.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn with_config(
        store: S,
        document: impl DocumentSource + 'static,
        config: AutoSaveConfig,
    ) -> std::result::Result<Self, ConfigError> {
        let interval = validate_interval(config.interval_seconds)?;
        let coordinator = Self::new(store, document);
        coordinator.shared.lock().interval = interval;
        if config.enabled {
            coordinator.start();
        }
        Ok(coordinator)
    }

    // =========================================================================
    // STATE MACHINE
    // =========================================================================

    /// Arm auto-save. No-op when already armed.
    pub fn start(&self) {
        let mut state = self.shared.lock();
        if state.is_armed() {
            return;
        }
        self.shared.arm(&mut state);
        tracing::info!("Auto-save enabled (every {}s)", state.interval.as_secs());
        self.shared
            .notifier
            .send(Notification::StateChanged { armed: true });
    }

    /// Disarm auto-save. No-op when already disarmed.
    ///
    /// A save already in progress finishes, but nothing is scheduled after it.
    pub fn stop(&self) {
        let mut state = self.shared.lock();
        if state.disarm() {
            tracing::info!("Auto-save disabled");
            self.shared
                .notifier
                .send(Notification::StateChanged { armed: false });
        }
    }

    /// Flip auto-save on or off and return whether it is now armed.
    pub fn toggle(&self) -> bool {
        let mut state = self.shared.lock();
        let armed = if state.disarm() {
            tracing::info!("Auto-save disabled");
            false
        } else {
            self.shared.arm(&mut state);
            tracing::info!("Auto-save enabled (every {}s)", state.interval.as_secs());
            true
        };
        self.shared
            .notifier
            .send(Notification::StateChanged { armed });
        armed
    }

    /// Change the interval.
    ///
    /// Out-of-range values are rejected without touching any state. When
    /// armed, the pending timer is replaced by one using the new interval in
    /// the same critical section, so exactly one stays pending.
    pub fn set_interval(&self, seconds: u64) -> std::result::Result<(), ConfigError> {
        let interval = validate_interval(seconds)?;
        let mut state = self.shared.lock();
        state.interval = interval;
        if state.disarm() {
            self.shared.arm(&mut state);
        }
        tracing::info!("Auto-save interval set to {seconds}s");
        Ok(())
    }

    /// Whether auto-save is armed.
    pub fn is_armed(&self) -> bool {
        self.shared.lock().is_armed()
    }

    /// Interval in seconds.
    pub fn current_interval(&self) -> u64 {
        self.shared.lock().interval.as_secs()
    }

    /// Snapshot of the current settings.
    pub fn config(&self) -> AutoSaveConfig {
        let state = self.shared.lock();
        AutoSaveConfig {
            enabled: state.is_armed(),
            interval_seconds: state.interval.as_secs(),
        }
    }

    /// Number of timer tasks still running.
    ///
    /// At most one belongs to the armed timer. A cancelled task stays counted
    /// until it has finished the save it was running, if any.
    pub fn pending_timers(&self) -> usize {
        self.shared.live_timers.load(Ordering::SeqCst)
    }

    // =========================================================================
    // SAVE TARGET
    // =========================================================================

    /// The active save target.
    pub fn target(&self) -> Option<SaveTarget> {
        self.shared.lock().target.clone()
    }

    /// Replace the active save target.
    pub fn set_target(&self, target: Option<SaveTarget>) {
        self.shared.replace_target(target);
    }

    /// Forget the active target and stop auto-save ("new document").
    pub fn clear(&self) {
        let mut state = self.shared.lock();
        let had_target = state.target.take().is_some();
        let was_armed = state.disarm();
        if had_target {
            self.shared.notifier.send(Notification::TargetChanged(None));
        }
        if was_armed {
            self.shared
                .notifier
                .send(Notification::StateChanged { armed: false });
        }
        tracing::info!("Document cleared, save target reset");
    }

    /// When content was last written successfully.
    pub fn last_saved(&self) -> Option<DateTime<Utc>> {
        self.shared.lock().last_saved
    }

    // =========================================================================
    // MANUAL FILE OPERATIONS
    // =========================================================================

    /// Save to the active target, or ask for one when there is none.
    ///
    /// The target is read once the write gate is held, so an `open` or
    /// `clear` that finished first is honoured.
    pub async fn save<P: TargetPicker>(&self, picker: &P) -> Result<SaveOutcome> {
        let gate = self.shared.write_gate.lock().await;
        let Some(target) = self.target() else {
            drop(gate);
            return self.save_as(picker).await;
        };
        self.write_gated(&target).await?;
        Ok(SaveOutcome::Saved(target))
    }

    /// Ask for a new location, write there, and make it the active target.
    ///
    /// The target only changes once the write has succeeded.
    pub async fn save_as<P: TargetPicker>(&self, picker: &P) -> Result<SaveOutcome> {
        let current = self.target();
        let target = match resolve_new_target(picker, current.as_ref()).await? {
            Resolution::Resolved(target) => target,
            Resolution::Cancelled => return Ok(SaveOutcome::Cancelled),
        };

        let _gate = self.shared.write_gate.lock().await;
        self.write_gated(&target).await?;
        self.shared.replace_target(Some(target.clone()));
        Ok(SaveOutcome::Saved(target))
    }

    /// Ask for a document, read it, hand its text to `load`, and make it the
    /// active target.
    ///
    /// `load` runs while writes are held off, so a tick cannot write the old
    /// buffer into the newly opened file. Returns `None` when cancelled.
    pub async fn open<P, F>(&self, picker: &P, load: F) -> Result<Option<SaveTarget>>
    where
        P: TargetPicker,
        F: FnOnce(String) + Send,
    {
        let Some(target) = picker.pick_open_target().await?.into_target() else {
            tracing::debug!("Open cancelled");
            return Ok(None);
        };

        let content = self.shared.store.read_from_target(&target).await?;

        let _gate = self.shared.write_gate.lock().await;
        load(content);
        self.shared.replace_target(Some(target.clone()));
        Ok(Some(target))
    }

    /// Subscribe to state, save and target notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.shared.notifier.subscribe()
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.shared.store
    }

    /// Disarm and wait for every timer task to exit.
    ///
    /// Saves in progress, including those of timers stopped earlier, finish
    /// before this returns.
    pub async fn shutdown(self) {
        let (was_armed, tasks) = {
            let mut state = self.shared.lock();
            let was_armed = state.disarm();
            (was_armed, std::mem::take(&mut state.retired))
        };
        for task in tasks {
            if let Err(e) = task.await {
                tracing::warn!("Auto-save task ended abnormally: {e}");
            }
        }
        if was_armed {
            self.shared
                .notifier
                .send(Notification::StateChanged { armed: false });
        }
        tracing::debug!("Auto-save coordinator shut down");
    }

    /// Write the current content. Caller holds the write gate.
    async fn write_gated(&self, target: &SaveTarget) -> Result<()> {
        let content = self.shared.document.content();
        self.shared.store.write_to_target(target, content).await?;
        self.shared.record_success(target, SaveTrigger::Manual);
        Ok(())
    }
}

impl<S: TargetStore> Drop for AutoSaveCoordinator<S> {
    fn drop(&mut self) {
        // Detached task exits at its next cancel check
        self.shared.lock().disarm();
    }
}

impl<S: TargetStore> Shared<S> {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Spawn a timer task with a fresh generation. Caller holds the lock and
    /// has checked that nothing is armed.
    fn arm(self: &Arc<Self>, state: &mut State) {
        state.generation += 1;
        let generation = state.generation;
        let interval = state.interval;
        let (cancel_tx, cancel_rx) = oneshot::channel();

        let live = LiveTimer::new(&self.live_timers);
        let task = self.runtime.spawn(run_timer(
            Arc::clone(self),
            generation,
            interval,
            cancel_rx,
            live,
        ));
        state.timer = Some(ScheduledTimer::new(generation, cancel_tx, task));
        tracing::debug!(generation, "Auto-save timer armed for {}s", interval.as_secs());
    }

    fn replace_target(&self, target: Option<SaveTarget>) {
        let mut state = self.lock();
        if state.target == target {
            return;
        }
        state.target.clone_from(&target);
        match &target {
            Some(t) => tracing::info!("Save target set to {t}"),
            None => tracing::info!("Save target cleared"),
        }
        self.notifier.send(Notification::TargetChanged(target));
    }

    /// Decide what a firing timer does. A stale generation means the timer
    /// was cancelled or replaced after its wait ended.
    ///
    /// Content is read under the same lock, so a concurrent `clear` either
    /// wins (stale) or sees the write of the pre-clear content.
    fn claim_tick(&self, generation: u64) -> Claim {
        let mut state = self.lock();
        if !state.is_current(generation) {
            return Claim::Stale;
        }
        match state.target.clone() {
            Some(target) => Claim::Write {
                target,
                // Snapshot at fire time, not at schedule time
                content: self.document.content(),
            },
            None => {
                // Our own handle; the task exits after this tick
                state.disarm();
                tracing::info!("Auto-save disabled: no file selected");
                self.notifier
                    .send(Notification::StateChanged { armed: false });
                self.notifier.send(Notification::AutoSaveDisabledNoTarget);
                Claim::NoTarget
            }
        }
    }

    async fn tick(&self, generation: u64) -> TickOutcome {
        let _gate = self.write_gate.lock().await;

        let (target, content) = match self.claim_tick(generation) {
            Claim::Write { target, content } => (target, content),
            Claim::Stale | Claim::NoTarget => return TickOutcome::Finished,
        };

        tracing::debug!(generation, bytes = content.len(), "Auto-saving to {target}");

        match self.store.write_to_target(&target, content).await {
            Ok(()) => self.record_success(&target, SaveTrigger::AutoSave),
            Err(e) => {
                tracing::warn!("Auto-save to {target} failed: {e}");
                self.notifier.send(Notification::SaveFailed {
                    target,
                    error: Arc::new(e),
                });
            }
        }

        let current = self.lock().is_current(generation);
        if current {
            TickOutcome::Reschedule
        } else {
            TickOutcome::Finished
        }
    }

    fn record_success(&self, target: &SaveTarget, trigger: SaveTrigger) {
        let at = Utc::now();
        self.lock().last_saved = Some(at);
        tracing::info!("Saved {target} ({trigger:?})");
        self.notifier.send(Notification::Saved {
            target: target.clone(),
            at,
            trigger,
        });
    }
}

/// Background loop for one arming.
async fn run_timer<S: TargetStore>(
    shared: Arc<Shared<S>>,
    generation: u64,
    interval: Duration,
    mut cancel: oneshot::Receiver<()>,
    _live: LiveTimer,
) {
    loop {
        tokio::select! {
            biased;
            _ = &mut cancel => {
                tracing::trace!(generation, "Auto-save timer cancelled");
                return;
            }
            () = tokio::time::sleep(interval) => {}
        }

        match shared.tick(generation).await {
            TickOutcome::Reschedule => {
                tracing::debug!(generation, "Next auto-save in {}s", interval.as_secs());
            }
            TickOutcome::Finished => return,
        }
    }
}
