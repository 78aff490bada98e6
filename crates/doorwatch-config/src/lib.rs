//! Configuration for the doorwatch CLI.
//!
//! TOML profiles, credential resolution (env + plaintext), and
//! translation to `doorwatch_core::MonitorConfig`. The CLI layers its
//! global flags on top.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use doorwatch_core::{BasicAuth, MonitorConfig, Schedule, TlsVerification};

/// Environment variable that overrides the config file location.
pub const CONFIG_PATH_ENV: &str = "DOORWATCH_CONFIG";

/// Password fallback when a profile names a user but no password source.
pub const PASSWORD_ENV: &str = "DOORWATCH_PASSWORD";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no password configured for user '{username}' in profile '{profile}'")]
    NoPassword { profile: String, username: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named controller profiles.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

impl Config {
    /// The profile to use: an explicit name wins over `default_profile`.
    pub fn active_profile_name(&self, requested: Option<&str>) -> String {
        requested
            .map(str::to_owned)
            .or_else(|| self.default_profile.clone())
            .unwrap_or_else(|| "default".into())
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            insecure: false,
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}

/// A named controller profile.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Controller base URL (e.g., "http://garage.local:8080").
    pub server: String,

    /// Username for the Basic-auth protected endpoints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Password (plaintext; prefer `password_env`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Environment variable name containing the password.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_env: Option<String>,

    /// Key for the `api` command endpoint (plaintext; prefer `api_key_env`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Environment variable name containing the API key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,

    /// Path to custom CA certificate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insecure: Option<bool>,

    /// Override timeout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path: `$DOORWATCH_CONFIG`, else XDG / platform
/// conventions.
pub fn config_path() -> PathBuf {
    if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
        return PathBuf::from(path);
    }
    ProjectDirs::from("com", "doorwatch", "doorwatch").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("doorwatch");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load config from a specific file + environment.
///
/// A missing file yields the defaults; a file that exists but does not
/// parse is an error. Environment keys nest on double underscores, e.g.
/// `DOORWATCH_DEFAULTS__TIMEOUT=5`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("DOORWATCH_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(&path, cfg)?;
    Ok(path)
}

/// Serialize config to TOML and write it to `path`.
pub fn save_config_to(path: &Path, cfg: &Config) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution (without CLI flags) ───────────────────────

fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/// Resolve Basic-auth credentials. `None` when the profile names no user.
pub fn resolve_basic_auth(
    profile: &Profile,
    profile_name: &str,
) -> Result<Option<BasicAuth>, ConfigError> {
    resolve_basic_auth_with(profile, profile_name, process_env)
}

fn resolve_basic_auth_with(
    profile: &Profile,
    profile_name: &str,
    env: impl Fn(&str) -> Option<String>,
) -> Result<Option<BasicAuth>, ConfigError> {
    let Some(username) = profile.username.clone() else {
        return Ok(None);
    };

    // 1. Profile's password_env → env var lookup
    // 2. DOORWATCH_PASSWORD
    // 3. Plaintext in config
    let password = profile
        .password_env
        .as_deref()
        .and_then(&env)
        .or_else(|| env(PASSWORD_ENV))
        .or_else(|| profile.password.clone())
        .ok_or_else(|| ConfigError::NoPassword {
            profile: profile_name.into(),
            username: username.clone(),
        })?;

    Ok(Some(BasicAuth {
        username,
        password: SecretString::from(password),
    }))
}

/// Resolve the `api` endpoint key, if one is configured.
pub fn resolve_api_key(profile: &Profile) -> Option<SecretString> {
    resolve_api_key_with(profile, process_env)
}

fn resolve_api_key_with(
    profile: &Profile,
    env: impl Fn(&str) -> Option<String>,
) -> Option<SecretString> {
    profile
        .api_key_env
        .as_deref()
        .and_then(env)
        .or_else(|| profile.api_key.clone())
        .map(SecretString::from)
}

/// Build a `MonitorConfig` from a profile; no CLI flag overrides.
pub fn profile_to_monitor_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<MonitorConfig, ConfigError> {
    let url = parse_server(&profile.server)?;

    let tls = if profile.insecure.unwrap_or(defaults.insecure) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    Ok(MonitorConfig {
        url,
        auth: resolve_basic_auth(profile, profile_name)?,
        api_key: resolve_api_key(profile),
        tls,
        timeout: Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout)),
        schedule: Schedule::default(),
    })
}

/// Parse a controller URL, rejecting anything that is not http(s).
pub fn parse_server(server: &str) -> Result<url::Url, ConfigError> {
    let url: url::Url = server.parse().map_err(|_| ConfigError::Validation {
        field: "server".into(),
        reason: format!("invalid URL: {server}"),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Validation {
            field: "server".into(),
            reason: format!("unsupported scheme '{}'", url.scheme()),
        });
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::collections::HashMap;

    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    use super::*;

    fn home() -> Profile {
        Profile {
            server: "http://garage.local:8080".into(),
            ..Profile::default()
        }
    }

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |k: &str| map.get(k).cloned()
    }

    #[test]
    fn loads_profiles_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
default_profile = "home"

[defaults]
output = "json"

[profiles.home]
server = "http://garage.local:8080"
username = "admin"
timeout = 5
"#,
        )
        .unwrap();

        let cfg = load_config_from(&path).unwrap();
        assert_eq!(cfg.default_profile.as_deref(), Some("home"));
        assert_eq!(cfg.defaults.output, "json");
        assert_eq!(cfg.defaults.color, "auto");
        let home = &cfg.profiles["home"];
        assert_eq!(home.username.as_deref(), Some("admin"));
        assert_eq!(home.timeout, Some(5));
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("nope.toml")).unwrap();
        assert!(cfg.profiles.is_empty());
        assert_eq!(cfg.defaults.timeout, 30);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[defaults]
timeout = "thirty"

[profiles.home]
server = "http://garage.local:8080"
"#,
        )
        .unwrap();

        let err = load_config_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Figment(_)));
        assert!(err.to_string().contains("timeout"), "{err}");
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut cfg = Config::default();
        cfg.profiles.insert("home".into(), home());

        save_config_to(&path, &cfg).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("[profiles.home]"));
        assert!(!written.contains("password"));

        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded.profiles["home"].server, "http://garage.local:8080");
    }

    #[test]
    fn active_profile_prefers_request() {
        let cfg = Config {
            default_profile: Some("home".into()),
            ..Config::default()
        };
        assert_eq!(cfg.active_profile_name(Some("cabin")), "cabin");
        assert_eq!(cfg.active_profile_name(None), "home");
    }

    #[test]
    fn no_username_means_no_auth() {
        let auth = resolve_basic_auth_with(&home(), "home", env_of(&[])).unwrap();
        assert!(auth.is_none());
    }

    #[test]
    fn password_env_beats_plaintext() {
        let profile = Profile {
            username: Some("admin".into()),
            password: Some("plain".into()),
            password_env: Some("GARAGE_PW".into()),
            ..home()
        };

        let auth = resolve_basic_auth_with(&profile, "home", env_of(&[("GARAGE_PW", "secret")]))
            .unwrap()
            .unwrap();
        assert_eq!(auth.username, "admin");
        assert_eq!(auth.password.expose_secret(), "secret");

        let auth = resolve_basic_auth_with(&profile, "home", env_of(&[]))
            .unwrap()
            .unwrap();
        assert_eq!(auth.password.expose_secret(), "plain");
    }

    #[test]
    fn global_password_env_is_fallback() {
        let profile = Profile {
            username: Some("admin".into()),
            ..home()
        };
        let auth = resolve_basic_auth_with(&profile, "home", env_of(&[(PASSWORD_ENV, "pw")]))
            .unwrap()
            .unwrap();
        assert_eq!(auth.password.expose_secret(), "pw");
    }

    #[test]
    fn user_without_password_is_an_error() {
        let profile = Profile {
            username: Some("admin".into()),
            ..home()
        };
        let err = resolve_basic_auth_with(&profile, "home", env_of(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::NoPassword { .. }));
    }

    #[test]
    fn api_key_resolution() {
        let profile = Profile {
            api_key: Some("plain".into()),
            api_key_env: Some("GARAGE_KEY".into()),
            ..home()
        };
        let key = resolve_api_key_with(&profile, env_of(&[("GARAGE_KEY", "k1")])).unwrap();
        assert_eq!(key.expose_secret(), "k1");
        assert!(resolve_api_key_with(&home(), env_of(&[])).is_none());
    }

    #[test]
    fn profile_to_monitor_config_applies_defaults() {
        let profile = Profile {
            ca_cert: Some("/etc/ca.pem".into()),
            ..home()
        };
        let cfg = profile_to_monitor_config(&profile, "home", &Defaults::default()).unwrap();
        assert_eq!(cfg.url.as_str(), "http://garage.local:8080/");
        assert_eq!(cfg.timeout, Duration::from_secs(30));
        assert_eq!(cfg.tls, TlsVerification::CustomCa("/etc/ca.pem".into()));
        assert_eq!(cfg.schedule, Schedule::default());

        let insecure = Profile {
            insecure: Some(true),
            timeout: Some(3),
            ..profile
        };
        let cfg = profile_to_monitor_config(&insecure, "home", &Defaults::default()).unwrap();
        assert_eq!(cfg.tls, TlsVerification::DangerAcceptInvalid);
        assert_eq!(cfg.timeout, Duration::from_secs(3));
    }

    #[test]
    fn rejects_bad_server() {
        assert!(matches!(
            parse_server("not a url"),
            Err(ConfigError::Validation { .. })
        ));
        assert!(matches!(
            parse_server("ftp://garage"),
            Err(ConfigError::Validation { .. })
        ));
    }
}
