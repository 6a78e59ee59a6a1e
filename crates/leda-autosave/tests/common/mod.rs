//! Shared helpers for coordinator tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use leda_autosave::Notification;
use leda_persistence::{PersistenceError, SaveTarget, TargetStore};
use tokio::sync::{Semaphore, broadcast, mpsc};

/// Wait for the first notification matching `pred`, skipping others.
pub async fn wait_for<F>(rx: &mut broadcast::Receiver<Notification>, mut pred: F) -> Notification
where
    F: FnMut(&Notification) -> bool,
{
    let wait = async {
        loop {
            match rx.recv().await {
                Ok(n) if pred(&n) => return n,
                Ok(_) => {}
                Err(e) => panic!("notification channel failed: {e}"),
            }
        }
    };
    tokio::time::timeout(Duration::from_secs(3600), wait)
        .await
        .expect("expected notification never arrived")
}

pub fn is_saved(n: &Notification) -> bool {
    matches!(n, Notification::Saved { .. })
}

/// Let spawned tasks run until they block on a timer or a lock.
pub async fn settle() {
    for _ in 0..20 {
        tokio::task::yield_now().await;
    }
}

pub async fn advance_secs(secs: u64) {
    tokio::time::advance(Duration::from_secs(secs)).await;
    settle().await;
}

/// Observation side of a [`GatedStore`].
#[derive(Debug, Default)]
pub struct WriteLog {
    pub writes: Mutex<Vec<String>>,
    pub targets: Mutex<Vec<SaveTarget>>,
    pub in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
}

impl WriteLog {
    pub fn write_count(&self) -> usize {
        self.writes.lock().unwrap().len()
    }

    /// Targets of every write that started, in order.
    pub fn targets(&self) -> Vec<SaveTarget> {
        self.targets.lock().unwrap().clone()
    }
}

/// Store whose writes block until the test releases them.
pub struct GatedStore {
    started: mpsc::UnboundedSender<String>,
    release: Arc<Semaphore>,
    log: Arc<WriteLog>,
}

pub struct GateControl {
    pub started: mpsc::UnboundedReceiver<String>,
    pub release: Arc<Semaphore>,
    pub log: Arc<WriteLog>,
}

impl GatedStore {
    pub fn new() -> (Self, GateControl) {
        let (started_tx, started_rx) = mpsc::unbounded_channel();
        let release = Arc::new(Semaphore::new(0));
        let log = Arc::new(WriteLog::default());
        let store = Self {
            started: started_tx,
            release: Arc::clone(&release),
            log: Arc::clone(&log),
        };
        let control = GateControl {
            started: started_rx,
            release,
            log,
        };
        (store, control)
    }
}

impl TargetStore for GatedStore {
    async fn write_to_target(
        &self,
        target: &SaveTarget,
        content: String,
    ) -> Result<(), PersistenceError> {
        self.log.targets.lock().unwrap().push(target.clone());
        let now = self.log.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.log.max_in_flight.fetch_max(now, Ordering::SeqCst);
        let _ = self.started.send(content.clone());

        self.release
            .acquire()
            .await
            .expect("semaphore closed")
            .forget();

        self.log.writes.lock().unwrap().push(content);
        self.log.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(())
    }

    async fn read_from_target(&self, target: &SaveTarget) -> Result<String, PersistenceError> {
        Err(PersistenceError::TargetMissing {
            path: target.path().to_path_buf(),
        })
    }
}
