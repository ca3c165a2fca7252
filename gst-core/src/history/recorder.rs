use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::trace;

use super::HistoryStore;
use crate::models::HistoryEntry;

/// Quiet period before a pending entry is written.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(1500);

/// Debounces writes into a [`HistoryStore`].
///
/// Each [`schedule`](Self::schedule) replaces the pending write, so only the
/// last entry of a burst reaches the store, and only once input has been
/// quiet for the configured delay. Must be used inside a tokio runtime.
/// Dropping the recorder cancels the pending write.
pub struct HistoryRecorder {
    history: Arc<HistoryStore>,
    delay: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl HistoryRecorder {
    pub fn new(
        history: Arc<HistoryStore>,
        delay: Duration,
    ) -> Self {
        Self {
            history,
            delay,
            pending: Mutex::new(None),
        }
    }

    pub fn history(&self) -> &Arc<HistoryStore> {
        &self.history
    }

    /// Schedules `entry` to be recorded after the quiet period, cancelling
    /// any write still pending.
    ///
    /// Only the wait can be cancelled. Once the quiet period ends the write
    /// runs on its own task and always completes.
    pub fn schedule(
        &self,
        entry: HistoryEntry,
    ) {
        let history = Arc::clone(&self.history);
        let delay = self.delay;
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tokio::spawn(async move {
                history.record(entry).await;
            });
        });

        if let Some(previous) = self.pending_slot().replace(task) {
            previous.abort();
            trace!("pending history write superseded");
        }
    }

    /// Cancels the pending write. Returns `true` if one was still waiting.
    /// A write whose quiet period already ended is left to finish.
    pub fn cancel(&self) -> bool {
        match self.pending_slot().take() {
            Some(task) => {
                let waiting = !task.is_finished();
                task.abort();
                waiting
            }
            None => false,
        }
    }

    /// Whether a scheduled write has not run yet.
    pub fn is_pending(&self) -> bool {
        self.pending_slot()
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }

    fn pending_slot(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for HistoryRecorder {
    fn drop(&mut self) {
        self.cancel();
    }
}
