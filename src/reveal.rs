//! Delayed selection reveal
//!
//! A selection is applied after a fixed delay. Scheduling a new reveal
//! aborts the pending one, and every reveal task checks its generation under
//! the state lock before applying, so an older selection can never overwrite
//! a newer one.

use crate::feedback::{emit, Cue, Feedback};
use crate::store::RecordId;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

/// Default delay between selecting a record and revealing it
pub const DEFAULT_REVEAL_DELAY: Duration = Duration::from_millis(800);

#[derive(Debug, Default)]
struct RevealState {
    generation: u64,
    selected: Option<RecordId>,
    scanning: bool,
}

pub struct RevealScheduler {
    delay: Duration,
    state: Arc<Mutex<RevealState>>,
    pending: Option<JoinHandle<()>>,
    feedback: Feedback,
}

fn lock(state: &Mutex<RevealState>) -> MutexGuard<'_, RevealState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

impl RevealScheduler {
    pub fn new(delay: Duration, feedback: Feedback) -> Self {
        Self {
            delay,
            state: Arc::new(Mutex::new(RevealState::default())),
            pending: None,
            feedback,
        }
    }

    /// Schedule `id` to become the selected record after the delay.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule(&mut self, id: RecordId) {
        let generation = {
            let mut state = lock(&self.state);
            state.generation += 1;
            state.scanning = true;
            state.generation
        };
        self.abort_pending();

        let state = Arc::clone(&self.state);
        let feedback = self.feedback.clone();
        let delay = self.delay;
        debug!("Reveal of record {} scheduled in {:?}", id, delay);

        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            let applied = {
                let mut state = lock(&state);
                if state.generation == generation {
                    state.selected = Some(id);
                    state.scanning = false;
                    true
                } else {
                    false
                }
            };

            if applied {
                debug!("Revealed record {}", id);
                emit(&feedback, Cue::Match);
            } else {
                debug!("Discarded stale reveal of record {}", id);
            }
        }));
    }

    /// Cancel any pending reveal and clear the current selection
    pub fn clear(&mut self) {
        {
            let mut state = lock(&self.state);
            state.generation += 1;
            state.selected = None;
            state.scanning = false;
        }
        self.abort_pending();
    }

    fn abort_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            if !handle.is_finished() {
                debug!("Cancelled pending reveal");
            }
            handle.abort();
        }
    }

    /// Currently revealed record
    pub fn selected(&self) -> Option<RecordId> {
        lock(&self.state).selected
    }

    /// Whether a reveal is waiting to be applied
    pub fn is_scanning(&self) -> bool {
        lock(&self.state).scanning
    }
}

impl Drop for RevealScheduler {
    fn drop(&mut self) {
        self.abort_pending();
    }
}
