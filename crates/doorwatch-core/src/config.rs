// ── Runtime monitor configuration ──
//
// These types describe *how* to reach a door controller and how often to
// poll it. They carry credential data but never touch disk: the CLI builds
// a `MonitorConfig` and hands it in.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

/// Basic credentials for the controller's protected endpoints (`clk`, `cla`).
#[derive(Debug, Clone)]
pub struct BasicAuth {
    pub username: String,
    pub password: SecretString,
}

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict). Default.
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (self-signed certs).
    DangerAcceptInvalid,
}

/// Delays between polling iterations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    /// Delay after a successful update poll.
    pub update_success: Duration,
    /// Delay after a failed update poll. Fixed; no backoff.
    pub update_failure: Duration,
    /// Delay between uptime polls, whatever the outcome.
    pub uptime: Duration,
}

impl Default for Schedule {
    fn default() -> Self {
        Self {
            update_success: Duration::from_secs(1),
            update_failure: Duration::from_secs(10),
            uptime: Duration::from_secs(60),
        }
    }
}

/// Configuration for monitoring a single controller.
///
/// Built by the CLI, passed to `Monitor::connect`; core never reads
/// config files.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Controller base URL (e.g., `http://garage.local:8080`).
    pub url: Url,
    /// Credentials for `clk` / `cla`, when the controller has auth enabled.
    pub auth: Option<BasicAuth>,
    /// Key for the `api` endpoint.
    pub api_key: Option<SecretString>,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Default request timeout (`upd` and `upt` carry their own).
    pub timeout: Duration,
    /// Polling cadence.
    pub schedule: Schedule,
}

impl MonitorConfig {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            auth: None,
            api_key: None,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            schedule: Schedule::default(),
        }
    }
}
