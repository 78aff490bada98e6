// ── Update poller ──
//
// Long-polls `upd` with the current cursor, merges the returned changes
// into the board and reschedules itself forever: short delay after a
// success, long fixed delay after a failure.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use doorwatch_api::UpdateBatch;

use crate::backend::DoorBackend;
use crate::config::Schedule;
use crate::store::DoorBoard;
use crate::view::ListView;

/// Consecutive failures before the poller logs at `warn`.
const WARN_AFTER_FAILURES: u32 = 3;

/// Owns the update cursor and applies change batches to the board.
pub struct UpdatePoller<B> {
    backend: Arc<B>,
    board: Arc<DoorBoard>,
    view: Arc<dyn ListView>,
    cursor: watch::Sender<i64>,
    schedule: Schedule,
    failures: u32,
}

impl<B: DoorBackend> UpdatePoller<B> {
    pub fn new(
        backend: Arc<B>,
        board: Arc<DoorBoard>,
        view: Arc<dyn ListView>,
        cursor: watch::Sender<i64>,
        schedule: Schedule,
    ) -> Self {
        Self {
            backend,
            board,
            view,
            cursor,
            schedule,
            failures: 0,
        }
    }

    /// Current cursor value.
    pub fn cursor(&self) -> i64 {
        *self.cursor.borrow()
    }

    /// Run one poll and return the delay before the next one.
    pub async fn poll_once(&mut self) -> Duration {
        let since = self.cursor();
        match self.backend.updates(since).await {
            Ok(batch) => {
                if self.failures > 0 {
                    info!(failures = self.failures, "update polling recovered");
                    self.failures = 0;
                }
                self.apply(batch);
                self.schedule.update_success
            }
            Err(e) => {
                self.failures += 1;
                if self.failures == WARN_AFTER_FAILURES {
                    warn!(error = %e, failures = self.failures, "update polling keeps failing");
                } else {
                    debug!(error = %e, failures = self.failures, "update poll failed");
                }
                self.schedule.update_failure
            }
        }
    }

    /// Poll until cancelled.
    pub async fn run(mut self, cancel: CancellationToken) {
        loop {
            let delay = tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                delay = self.poll_once() => delay,
            };

            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                () = tokio::time::sleep(delay) => {}
            }
        }
        debug!(cursor = self.cursor(), "update poller stopped");
    }

    fn apply(&self, batch: UpdateBatch) {
        // The cursor advances even when nothing matched.
        self.cursor.send_replace(batch.timestamp);

        let mut applied = 0usize;
        for change in &batch.update {
            if let Some(entry) = self.board.apply(change) {
                self.view.update(&entry);
                applied += 1;
            }
        }
        if applied > 0 {
            self.view.refresh();
        }
        debug!(
            cursor = batch.timestamp,
            received = batch.update.len(),
            applied,
            "update batch applied"
        );
    }
}
