// ── Core error types ──
//
// User-facing errors from doorwatch-core. Consumers never see HTTP status
// codes or JSON parse failures directly; the `From<doorwatch_api::Error>`
// impl translates transport-layer errors into these variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach controller at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Controller request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Unexpected response from controller: {message}")]
    InvalidResponse { message: String },

    // ── Controller errors ────────────────────────────────────────────
    #[error("Controller error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Lifecycle errors ─────────────────────────────────────────────
    #[error("Monitor already started")]
    AlreadyStarted,
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<doorwatch_api::Error> for CoreError {
    fn from(err: doorwatch_api::Error) -> Self {
        match err {
            doorwatch_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            doorwatch_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout { timeout_secs: 0 }
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            doorwatch_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            doorwatch_api::Error::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            doorwatch_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            doorwatch_api::Error::Api { status, message } => CoreError::Api {
                message,
                status: Some(status),
            },
            doorwatch_api::Error::Deserialization { message, body: _ } => {
                CoreError::InvalidResponse { message }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_api_errors() {
        let err = CoreError::from(doorwatch_api::Error::Timeout { timeout_secs: 30 });
        assert!(matches!(err, CoreError::Timeout { timeout_secs: 30 }));

        let err = CoreError::from(doorwatch_api::Error::Api {
            status: 503,
            message: "busy".into(),
        });
        assert!(matches!(err, CoreError::Api { status: Some(503), .. }));

        let err = CoreError::from(doorwatch_api::Error::Deserialization {
            message: "expected value".into(),
            body: "<html>".into(),
        });
        assert_eq!(
            err.to_string(),
            "Unexpected response from controller: expected value"
        );
    }
}
