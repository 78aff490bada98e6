// Door controller HTTP client
//
// Wraps `reqwest::Client` with endpoint URL construction, per-endpoint
// deadlines, optional Basic auth and status/body decoding. The endpoint
// methods themselves live in `doors.rs` to keep this module focused on
// transport mechanics.

use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::auth::Credentials;
use crate::error::Error;
use crate::transport::TransportConfig;

/// Deadline for the long-polling `upd` endpoint.
pub const UPDATE_TIMEOUT: Duration = Duration::from_secs(30);

/// Deadline for the `upt` endpoint.
pub const UPTIME_TIMEOUT: Duration = Duration::from_secs(60);

/// Per-endpoint request deadlines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndpointTimeouts {
    pub updates: Duration,
    pub uptime: Duration,
}

impl Default for EndpointTimeouts {
    fn default() -> Self {
        Self {
            updates: UPDATE_TIMEOUT,
            uptime: UPTIME_TIMEOUT,
        }
    }
}

/// Raw HTTP client for a garage door controller.
///
/// Endpoints are resolved relative to `base_url`, so a controller mounted
/// under a path prefix (e.g. behind a reverse proxy) works unchanged.
#[derive(Debug, Clone)]
pub struct DoorClient {
    http: reqwest::Client,
    base_url: Url,
    credentials: Option<Credentials>,
    timeouts: EndpointTimeouts,
    /// Client-wide deadline from the transport, used to label timeouts.
    request_timeout: Duration,
}

impl DoorClient {
    /// Create a client from a `TransportConfig`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        let mut client = Self::with_client(http, base_url);
        client.request_timeout = transport.timeout;
        Ok(client)
    }

    /// Create a client around a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url,
            credentials: None,
            timeouts: EndpointTimeouts::default(),
            request_timeout: TransportConfig::default().timeout,
        }
    }

    /// Attach Basic credentials for the protected endpoints.
    #[must_use]
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Replace the per-endpoint deadlines.
    #[must_use]
    pub fn with_timeouts(mut self, timeouts: EndpointTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// The controller base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub(crate) fn timeouts(&self) -> EndpointTimeouts {
        self.timeouts
    }

    pub(crate) fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build the full URL of a controller endpoint: `{base}/{name}`.
    pub(crate) fn endpoint_url(&self, name: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}/{name}"))?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Prepare a GET request with query parameters and an optional deadline.
    pub(crate) fn request(
        &self,
        url: Url,
        query: &[(&str, &str)],
        timeout: Option<Duration>,
        authenticated: bool,
    ) -> reqwest::RequestBuilder {
        let mut builder = self.http.get(url);
        if !query.is_empty() {
            builder = builder.query(query);
        }
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        if authenticated {
            if let Some(ref credentials) = self.credentials {
                builder = credentials.apply(builder);
            }
        }
        builder
    }

    /// Send a request and decode a JSON body.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
        timeout: Duration,
    ) -> Result<T, Error> {
        let body = self.get_text(builder, timeout).await?;
        serde_json::from_str(&body).map_err(|e| {
            let preview = preview(&body);
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body: body.clone(),
            }
        })
    }

    /// Send a request and return the body as text.
    pub(crate) async fn get_text(
        &self,
        builder: reqwest::RequestBuilder,
        timeout: Duration,
    ) -> Result<String, Error> {
        let resp = builder
            .send()
            .await
            .map_err(|e| transport_error(e, timeout))?;
        debug!(url = %resp.url(), status = %resp.status(), "controller response");
        let resp = check_status(resp).await?;
        resp.text().await.map_err(|e| transport_error(e, timeout))
    }
}

/// Map a reqwest failure, surfacing deadlines as [`Error::Timeout`].
fn transport_error(err: reqwest::Error, timeout: Duration) -> Error {
    if err.is_timeout() {
        Error::Timeout {
            timeout_secs: timeout.as_secs(),
        }
    } else {
        Error::Transport(err)
    }
}

async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, Error> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    let message = if body.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("unexpected status")
            .to_owned()
    } else {
        preview(&body).to_owned()
    };

    if status == reqwest::StatusCode::UNAUTHORIZED {
        return Err(Error::Authentication { message });
    }
    Err(Error::Api {
        status: status.as_u16(),
        message,
    })
}

fn preview(body: &str) -> &str {
    match body.char_indices().nth(200) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
