//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use doorwatch_config::ConfigError;
use doorwatch_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to controller at {url}")]
    #[diagnostic(
        code(doorwatch::connection_failed),
        help(
            "Check that the controller is running and reachable.\n\
             URL: {url}"
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(doorwatch::auth_failed),
        help(
            "Check the username/password (toggle, close-all) or the API key \
             (open, close) configured for profile '{profile}'."
        )
    )]
    AuthFailed { profile: String, message: String },

    #[error("No API key configured for profile '{profile}'")]
    #[diagnostic(
        code(doorwatch::no_api_key),
        help(
            "Set api_key_env in the profile, pass --api-key, \
             or set DOORWATCH_API_KEY."
        )
    )]
    NoApiKey { profile: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("Door '{identifier}' not found")]
    #[diagnostic(
        code(doorwatch::not_found),
        help("Run: doorwatch doors list to see available doors")
    )]
    DoorNotFound { identifier: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("Controller error: {message}")]
    #[diagnostic(code(doorwatch::api_error))]
    ApiError { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(doorwatch::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(doorwatch::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: doorwatch config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No controller configured")]
    #[diagnostic(
        code(doorwatch::no_config),
        help(
            "Create a profile with: doorwatch config init\n\
             Or pass --server. Expected config at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(doorwatch::config))]
    Config(ConfigError),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(doorwatch::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── Timeout ──────────────────────────────────────────────────────
    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(doorwatch::timeout),
        help("Increase timeout with --timeout or check controller responsiveness.")
    )]
    Timeout { seconds: u64 },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render output: {message}")]
    #[diagnostic(code(doorwatch::serialization))]
    Serialization { message: String },
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoApiKey { .. } => exit_code::AUTH,
            Self::DoorNotFound { .. } => exit_code::NOT_FOUND,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            other => CliError::Config(other),
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<doorwatch_api::Error> for CliError {
    fn from(err: doorwatch_api::Error) -> Self {
        CoreError::from(err).into()
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed {
                url,
                source: reason.into(),
            },

            CoreError::AuthenticationFailed { message } => CliError::AuthFailed {
                profile: "current".into(),
                message,
            },

            CoreError::Timeout { timeout_secs } => CliError::Timeout {
                seconds: timeout_secs,
            },

            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },

            CoreError::InvalidResponse { message } | CoreError::Api { message, .. } => {
                CliError::ApiError { message }
            }

            CoreError::AlreadyStarted => CliError::ApiError {
                message: "monitor already started".into(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes() {
        assert_eq!(
            CliError::from(CoreError::Timeout { timeout_secs: 30 }).exit_code(),
            exit_code::TIMEOUT
        );
        assert_eq!(
            CliError::DoorNotFound {
                identifier: "left".into()
            }
            .exit_code(),
            exit_code::NOT_FOUND
        );
        assert_eq!(
            CliError::from(CoreError::AuthenticationFailed {
                message: "HTTP 401".into()
            })
            .exit_code(),
            exit_code::AUTH
        );
        assert_eq!(
            CliError::from(CoreError::ConnectionFailed {
                url: "http://x".into(),
                reason: "refused".into()
            })
            .exit_code(),
            exit_code::CONNECTION
        );
        assert_eq!(
            CliError::from(ConfigError::Validation {
                field: "server".into(),
                reason: "bad".into()
            })
            .exit_code(),
            exit_code::USAGE
        );
    }
}
