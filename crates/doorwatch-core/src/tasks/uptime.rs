// ── Uptime reporter ──

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::backend::DoorBackend;
use crate::store::DoorBoard;
use crate::view::ListView;

/// Polls `upt` on a fixed interval and replaces the displayed text.
pub struct UptimeReporter<B> {
    backend: Arc<B>,
    board: Arc<DoorBoard>,
    view: Arc<dyn ListView>,
    interval: Duration,
}

impl<B: DoorBackend> UptimeReporter<B> {
    pub fn new(
        backend: Arc<B>,
        board: Arc<DoorBoard>,
        view: Arc<dyn ListView>,
        interval: Duration,
    ) -> Self {
        Self {
            backend,
            board,
            view,
            interval,
        }
    }

    /// Run one poll. The next one is due after the interval whatever
    /// the outcome; only a success changes the text.
    pub async fn report_once(&self) -> Duration {
        match self.backend.uptime().await {
            Ok(text) => {
                self.view.set_uptime(&text);
                self.board.set_uptime(text);
            }
            Err(e) => debug!(error = %e, "uptime poll failed"),
        }
        self.interval
    }

    /// Poll until cancelled.
    pub async fn run(self, cancel: CancellationToken) {
        loop {
            let delay = tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                delay = self.report_once() => delay,
            };

            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                () = tokio::time::sleep(delay) => {}
            }
        }
        debug!("uptime reporter stopped");
    }
}
