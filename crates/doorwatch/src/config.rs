//! CLI configuration: thin wrapper around `doorwatch_config`.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (--server, --username, --api-key, etc.).

use clap::ArgMatches;
use clap::ValueEnum;
use clap::parser::ValueSource;
use secrecy::SecretString;

use doorwatch_core::{MonitorConfig, TlsVerification};

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use doorwatch_config::{Config, Defaults, Profile, config_path, load_config, save_config};

/// A monitor configuration plus the profile it came from.
pub struct Resolved {
    pub profile_name: String,
    pub monitor: MonitorConfig,
}

/// Fill `--output` and `--color` from `[defaults]` when neither a flag nor
/// an env var set them.
pub fn apply_defaults(
    global: &mut GlobalOpts,
    matches: &ArgMatches,
    defaults: &Defaults,
) -> Result<(), CliError> {
    if is_unset(matches, "output") {
        global.output = parse_default::<OutputFormat>("output", &defaults.output)?;
    }
    if is_unset(matches, "color") {
        global.color = parse_default::<ColorMode>("color", &defaults.color)?;
    }
    Ok(())
}

fn is_unset(matches: &ArgMatches, id: &str) -> bool {
    matches!(matches.value_source(id), None | Some(ValueSource::DefaultValue))
}

fn parse_default<T: ValueEnum>(key: &str, value: &str) -> Result<T, CliError> {
    T::from_str(value, true).map_err(|reason| CliError::Validation {
        field: format!("defaults.{key}"),
        reason,
    })
}

/// Resolve the controller to talk to from the loaded config, the active
/// profile and CLI flags. Flags win over profile values.
pub fn resolve(cfg: &Config, global: &GlobalOpts) -> Result<Resolved, CliError> {
    let profile_name = cfg.active_profile_name(global.profile.as_deref());

    let base = match cfg.profiles.get(&profile_name) {
        Some(profile) => profile.clone(),
        // An explicitly requested profile must exist.
        None if global.profile.is_some() => {
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: available_profiles(cfg),
            });
        }
        None => Profile::default(),
    };

    let profile = apply_overrides(base, global);
    if profile.server.is_empty() {
        return Err(CliError::NoConfig {
            path: config_path().display().to_string(),
        });
    }

    let mut monitor =
        doorwatch_config::profile_to_monitor_config(&profile, &profile_name, &cfg.defaults)?;
    if global.insecure {
        monitor.tls = TlsVerification::DangerAcceptInvalid;
    }
    if let Some(ref key) = global.api_key {
        monitor.api_key = Some(SecretString::from(key.clone()));
    }

    Ok(Resolved {
        profile_name,
        monitor,
    })
}

fn apply_overrides(mut profile: Profile, global: &GlobalOpts) -> Profile {
    if let Some(ref server) = global.server {
        profile.server.clone_from(server);
    }
    if let Some(ref username) = global.username {
        profile.username = Some(username.clone());
    }
    if let Some(timeout) = global.timeout {
        profile.timeout = Some(timeout);
    }
    profile
}

fn available_profiles(cfg: &Config) -> String {
    if cfg.profiles.is_empty() {
        return "(none)".into();
    }
    cfg.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::time::Duration;

    use clap::{CommandFactory, FromArgMatches, Parser};

    use super::*;
    use crate::cli::Cli;

    fn argv<'a>(args: &[&'a str]) -> Vec<&'a str> {
        let mut argv = vec!["doorwatch"];
        argv.extend_from_slice(args);
        argv.push("uptime");
        argv
    }

    fn global(args: &[&str]) -> GlobalOpts {
        Cli::try_parse_from(argv(args)).unwrap().global
    }

    fn global_with_defaults(args: &[&str], defaults: &Defaults) -> Result<GlobalOpts, CliError> {
        let matches = Cli::command().try_get_matches_from(argv(args)).unwrap();
        let mut global = Cli::from_arg_matches(&matches).unwrap().global;
        apply_defaults(&mut global, &matches, defaults)?;
        Ok(global)
    }

    fn defaults(output: &str, color: &str) -> Defaults {
        Defaults {
            output: output.into(),
            color: color.into(),
            ..Defaults::default()
        }
    }

    #[test]
    fn config_defaults_fill_unset_flags() {
        let global = global_with_defaults(&[], &defaults("json", "never")).unwrap();
        assert_eq!(global.output, OutputFormat::Json);
        assert_eq!(global.color, ColorMode::Never);
    }

    #[test]
    fn flags_beat_config_defaults() {
        let global = global_with_defaults(
            &["-o", "plain", "--color", "always"],
            &defaults("json", "never"),
        )
        .unwrap();
        assert_eq!(global.output, OutputFormat::Plain);
        assert_eq!(global.color, ColorMode::Always);
    }

    #[test]
    fn bad_config_default_is_rejected() {
        let err = global_with_defaults(&[], &defaults("xml", "auto"))
            .err()
            .unwrap();
        match err {
            CliError::Validation { field, .. } => assert_eq!(field, "defaults.output"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    fn config_with_home() -> Config {
        let mut cfg = Config {
            default_profile: Some("home".into()),
            ..Config::default()
        };
        cfg.profiles.insert(
            "home".into(),
            Profile {
                server: "http://garage.local:8080".into(),
                timeout: Some(10),
                ..Profile::default()
            },
        );
        cfg
    }

    #[test]
    fn uses_default_profile() {
        let resolved = resolve(&config_with_home(), &global(&[])).unwrap();
        assert_eq!(resolved.profile_name, "home");
        assert_eq!(resolved.monitor.url.as_str(), "http://garage.local:8080/");
        assert_eq!(resolved.monitor.timeout, Duration::from_secs(10));
        assert!(resolved.monitor.auth.is_none());
    }

    #[test]
    fn flags_override_profile() {
        let resolved = resolve(
            &config_with_home(),
            &global(&["--server", "http://10.0.0.5", "--timeout", "3", "-k"]),
        )
        .unwrap();
        assert_eq!(resolved.monitor.url.as_str(), "http://10.0.0.5/");
        assert_eq!(resolved.monitor.timeout, Duration::from_secs(3));
        assert_eq!(resolved.monitor.tls, TlsVerification::DangerAcceptInvalid);
    }

    #[test]
    fn server_flag_works_without_config() {
        let resolved =
            resolve(&Config::default(), &global(&["--server", "http://garage"])).unwrap();
        assert_eq!(resolved.monitor.url.as_str(), "http://garage/");
    }

    #[test]
    fn missing_server_is_no_config() {
        let err = resolve(&Config::default(), &global(&[])).err().unwrap();
        assert!(matches!(err, CliError::NoConfig { .. }));
    }

    #[test]
    fn unknown_explicit_profile() {
        let err = resolve(&config_with_home(), &global(&["--profile", "cabin"]))
            .err()
            .unwrap();
        match err {
            CliError::ProfileNotFound { name, available } => {
                assert_eq!(name, "cabin");
                assert_eq!(available, "home");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
