use secrecy::{ExposeSecret, SecretString};

/// HTTP Basic credentials for the controller's protected endpoints.
///
/// When the controller runs with `use_auth`, only `clk` and `cla` sit
/// behind Basic auth; every other endpoint is public.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: SecretString) -> Self {
        Self {
            username: username.into(),
            password,
        }
    }

    pub(crate) fn apply(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder.basic_auth(&self.username, Some(self.password.expose_secret()))
    }
}

/// Commands accepted by the controller's key-protected `api` endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorCommand {
    /// Open the door if it is currently closed.
    Open,
    /// Close the door if it is currently open.
    Close,
    /// Pulse the relay unconditionally.
    Toggle,
}

impl DoorCommand {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Close => "close",
            Self::Toggle => "toggle",
        }
    }
}

impl std::fmt::Display for DoorCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
