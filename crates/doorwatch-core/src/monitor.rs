// ── Monitor facade ──
//
// Owns one monitoring session: the door board, the update cursor and the
// background polling tasks. Cheaply cloneable via `Arc<MonitorInner>`.

use std::sync::Arc;

use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use doorwatch_api::{Credentials, DoorClient, TlsMode, TransportConfig};

use crate::backend::DoorBackend;
use crate::config::{MonitorConfig, Schedule, TlsVerification};
use crate::error::CoreError;
use crate::model::DoorEntry;
use crate::store::{BoardSnapshot, DoorBoard};
use crate::tasks::{UpdatePoller, UptimeReporter, bootstrap};
use crate::view::ListView;

/// Lifecycle of a monitoring session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    /// Created, not started.
    Idle,
    /// Fetching the door list.
    Loading,
    /// Polling loops are running.
    Running,
    /// Shut down; cannot be restarted.
    Stopped,
}

/// A door-monitoring session against one controller.
pub struct Monitor<B: DoorBackend = DoorClient> {
    inner: Arc<MonitorInner<B>>,
}

impl<B: DoorBackend> Clone for Monitor<B> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct MonitorInner<B> {
    backend: Arc<B>,
    board: Arc<DoorBoard>,
    view: Arc<dyn ListView>,
    schedule: Schedule,
    /// Handed to the update poller on start; only it writes the cursor.
    cursor_tx: Mutex<Option<watch::Sender<i64>>>,
    cursor_rx: watch::Receiver<i64>,
    state: watch::Sender<MonitorState>,
    cancel: CancellationToken,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl Monitor<DoorClient> {
    /// Build an HTTP-backed monitor from configuration. Does NOT start
    /// polling; call [`start()`](Self::start).
    pub fn connect(config: &MonitorConfig, view: Arc<dyn ListView>) -> Result<Self, CoreError> {
        let client = build_client(config)?;
        Ok(Self::new(client, view, config.schedule))
    }
}

/// Build a [`DoorClient`] from monitor configuration.
pub fn build_client(config: &MonitorConfig) -> Result<DoorClient, CoreError> {
    let tls = match &config.tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    };
    let transport = TransportConfig {
        tls,
        timeout: config.timeout,
    };

    let mut client = DoorClient::new(config.url.clone(), &transport)?;
    if let Some(auth) = &config.auth {
        client = client.with_credentials(Credentials::new(
            auth.username.clone(),
            auth.password.clone(),
        ));
    }
    Ok(client)
}

impl<B: DoorBackend> Monitor<B> {
    pub fn new(backend: B, view: Arc<dyn ListView>, schedule: Schedule) -> Self {
        let (cursor_tx, cursor_rx) = watch::channel(0_i64);
        let (state, _) = watch::channel(MonitorState::Idle);

        Self {
            inner: Arc::new(MonitorInner {
                backend: Arc::new(backend),
                board: Arc::new(DoorBoard::new()),
                view,
                schedule,
                cursor_tx: Mutex::new(Some(cursor_tx)),
                cursor_rx,
                state,
                cancel: CancellationToken::new(),
                task_handles: Mutex::new(Vec::new()),
            }),
        }
    }

    // ── Lifecycle ────────────────────────────────────────────────

    /// Load the door list, then spawn the update and uptime loops.
    ///
    /// A failed door-list fetch is logged and leaves the list empty; the
    /// loops start regardless. Errors only if the monitor was already
    /// started.
    pub async fn start(&self) -> Result<(), CoreError> {
        let cursor = self
            .inner
            .cursor_tx
            .lock()
            .await
            .take()
            .ok_or(CoreError::AlreadyStarted)?;

        self.inner.state.send_replace(MonitorState::Loading);
        if let Err(e) =
            bootstrap(&*self.inner.backend, &self.inner.board, &*self.inner.view).await
        {
            warn!(error = %e, "failed to load door list");
        }

        let mut handles = self.inner.task_handles.lock().await;

        let poller = UpdatePoller::new(
            Arc::clone(&self.inner.backend),
            Arc::clone(&self.inner.board),
            Arc::clone(&self.inner.view),
            cursor,
            self.inner.schedule,
        );
        handles.push(tokio::spawn(poller.run(self.inner.cancel.child_token())));

        let reporter = UptimeReporter::new(
            Arc::clone(&self.inner.backend),
            Arc::clone(&self.inner.board),
            Arc::clone(&self.inner.view),
            self.inner.schedule.uptime,
        );
        handles.push(tokio::spawn(reporter.run(self.inner.cancel.child_token())));

        // A concurrent shutdown may already have won.
        if self.inner.cancel.is_cancelled() {
            return Ok(());
        }
        self.inner.state.send_replace(MonitorState::Running);
        info!(doors = self.inner.board.len(), "monitor started");
        Ok(())
    }

    /// Cancel the polling loops and wait for them to finish.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();

        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            match handle.await {
                Err(e) if e.is_panic() => warn!(error = %e, "monitor task panicked"),
                _ => {}
            }
        }
        // Never started: drop the cursor sender so it cannot be.
        self.inner.cursor_tx.lock().await.take();

        self.inner.state.send_replace(MonitorState::Stopped);
        debug!("monitor stopped");
    }

    // ── Commands ─────────────────────────────────────────────────

    /// Press the button for a door. Fire-and-forget: the request runs
    /// detached and its outcome is only logged.
    pub fn click(&self, id: &str) {
        let backend = Arc::clone(&self.inner.backend);
        let id = id.to_owned();
        tokio::spawn(async move {
            match backend.click(&id).await {
                Ok(()) => debug!(id = %id, "click sent"),
                Err(e) => debug!(id = %id, error = %e, "click failed"),
            }
        });
    }

    // ── Accessors ────────────────────────────────────────────────

    pub fn board(&self) -> &Arc<DoorBoard> {
        &self.inner.board
    }

    pub fn doors_snapshot(&self) -> BoardSnapshot {
        self.inner.board.snapshot()
    }

    pub fn door(&self, id: &str) -> Option<DoorEntry> {
        self.inner.board.get(id)
    }

    pub fn uptime(&self) -> Option<String> {
        self.inner.board.uptime()
    }

    /// Read-only view of the update cursor.
    pub fn cursor(&self) -> watch::Receiver<i64> {
        self.inner.cursor_rx.clone()
    }

    pub fn state(&self) -> watch::Receiver<MonitorState> {
        self.inner.state.subscribe()
    }

    pub fn backend(&self) -> &B {
        &self.inner.backend
    }

    pub fn schedule(&self) -> Schedule {
        self.inner.schedule
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use secrecy::SecretString;
    use url::Url;

    use super::*;
    use crate::config::BasicAuth;
    use crate::view::NullView;

    #[test]
    fn connect_builds_client_from_config() {
        let mut config = MonitorConfig::new(Url::parse("http://garage.local:8080/").unwrap());
        config.auth = Some(BasicAuth {
            username: "admin".into(),
            password: SecretString::from("pw"),
        });
        config.timeout = Duration::from_secs(5);

        let monitor = Monitor::connect(&config, Arc::new(NullView)).unwrap();
        assert_eq!(monitor.backend().base_url().as_str(), "http://garage.local:8080/");
        assert_eq!(*monitor.cursor().borrow(), 0);
        assert_eq!(*monitor.state().borrow(), MonitorState::Idle);
        assert_eq!(monitor.schedule(), Schedule::default());
    }
}
