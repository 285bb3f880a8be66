//! Background refresh of which actions are currently available

use serde::Serialize;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, trace};

use super::Session;
use crate::git::Store;

/// Which actions make sense right now
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Affordances {
    pub can_create: bool,
    pub can_switch: bool,
    pub can_finalize: bool,
    /// Why some action is unavailable
    pub reason: Option<String>,
}

impl Affordances {
    pub fn compute(has_pending_changes: bool, has_checkpoints: bool) -> Self {
        let mut reasons = Vec::new();
        if !has_pending_changes {
            reasons.push("no changes");
        }
        if !has_checkpoints {
            reasons.push("no checkpoints");
        }
        Self {
            can_create: has_pending_changes,
            can_switch: has_checkpoints,
            can_finalize: has_checkpoints,
            reason: (!reasons.is_empty()).then(|| reasons.join(", ")),
        }
    }
}

/// Handle to a polling thread. Cancelling or dropping it stops the thread.
pub struct StatusPoller {
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl StatusPoller {
    /// Recompute affordances every `interval` and pass each change to `on_change`.
    ///
    /// The first result is always delivered. Ticks that land while the session
    /// has an operation in flight are skipped.
    pub fn spawn<S, F>(session: Arc<Session<S>>, interval: Duration, mut on_change: F) -> Self
    where
        S: Store + Send + Sync + 'static,
        F: FnMut(&Affordances) + Send + 'static,
    {
        let (stop, stopped) = mpsc::channel::<()>();

        let handle = thread::spawn(move || {
            let mut last: Option<Affordances> = None;
            loop {
                if session.is_busy() {
                    trace!("operation in flight, skipping status refresh");
                } else {
                    let current = session.affordances();
                    if last.as_ref() != Some(&current) {
                        debug!(?current, "affordances changed");
                        on_change(&current);
                        last = Some(current);
                    }
                }

                match stopped.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => continue,
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            }
        });

        Self {
            stop: Some(stop),
            handle: Some(handle),
        }
    }

    /// Stop the thread and wait for it to exit
    pub fn cancel(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for StatusPoller {
    fn drop(&mut self) {
        self.shutdown();
    }
}
