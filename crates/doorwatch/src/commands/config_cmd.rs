//! Config subcommand handlers.

use dialoguer::{Confirm, Input, Password, Select};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

const MASK: &str = "****";

// ── Helpers ─────────────────────────────────────────────────────────

/// Copy of the config with plaintext secrets masked.
fn redacted(cfg: &Config) -> Config {
    let profiles = cfg
        .profiles
        .iter()
        .map(|(name, p)| {
            let mut p = p.clone();
            if p.password.is_some() {
                p.password = Some(MASK.into());
            }
            if p.api_key.is_some() {
                p.api_key = Some(MASK.into());
            }
            (name.clone(), p)
        })
        .collect();
    Config {
        default_profile: cfg.default_profile.clone(),
        defaults: config::Defaults {
            output: cfg.defaults.output.clone(),
            color: cfg.defaults.color.clone(),
            insecure: cfg.defaults.insecure,
            timeout: cfg.defaults.timeout,
        },
        profiles,
    }
}

/// Format config as TOML for display, secrets masked.
fn format_config_redacted(cfg: &Config) -> String {
    toml::to_string_pretty(&redacted(cfg)).unwrap_or_default()
}

fn available_profiles(cfg: &Config) -> String {
    let available: Vec<_> = cfg.profiles.keys().cloned().collect();
    if available.is_empty() {
        "(none)".into()
    } else {
        available.join(", ")
    }
}

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Ask for a secret and where to keep it.
///
/// Returns `(plaintext, env_var_name)`; exactly one is set.
fn prompt_secret(
    label: &str,
    default_env: &str,
) -> Result<(Option<String>, Option<String>), CliError> {
    let choices = &[
        "Read from an environment variable (recommended)",
        "Save to config file (plaintext)",
    ];
    let selection = Select::new()
        .with_prompt(format!("Where should the {label} come from?"))
        .items(choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    if selection == 0 {
        let env: String = Input::new()
            .with_prompt("Environment variable")
            .default(default_env.into())
            .interact_text()
            .map_err(prompt_err)?;
        return Ok((None, Some(env)));
    }

    let secret = Password::new()
        .with_prompt(label)
        .interact()
        .map_err(prompt_err)?;
    if secret.is_empty() {
        return Err(CliError::Validation {
            field: label.into(),
            reason: "value cannot be empty".into(),
        });
    }
    Ok((Some(secret), None))
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => init(),

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = config::load_config()?;
            let out = output::render_single(global.output, &redacted(&cfg), format_config_redacted)?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }

        // ── Use <name> ─────────────────────────────────────────────
        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config()?;

            if !cfg.profiles.contains_key(&name) {
                return Err(CliError::ProfileNotFound {
                    available: available_profiles(&cfg),
                    name,
                });
            }

            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            if !global.quiet {
                eprintln!("✓ Default profile set to '{name}'");
            }
            Ok(())
        }
    }
}

fn init() -> Result<(), CliError> {
    let config_path = config::config_path();
    eprintln!("doorwatch: configuration wizard");
    eprintln!("   Config path: {}\n", config_path.display());

    // 1. Profile name
    let profile_name: String = Input::new()
        .with_prompt("Profile name")
        .default("default".into())
        .interact_text()
        .map_err(prompt_err)?;

    // 2. Controller URL
    let server: String = Input::new()
        .with_prompt("Controller URL")
        .default("http://garage.local:8080".into())
        .validate_with(|s: &String| -> Result<(), String> {
            doorwatch_config::parse_server(s)
                .map(|_| ())
                .map_err(|e| e.to_string())
        })
        .interact_text()
        .map_err(prompt_err)?;

    let mut profile = Profile {
        server,
        ..Profile::default()
    };

    // 3. Basic auth for toggle / close-all
    let needs_auth = Confirm::new()
        .with_prompt("Does the controller require a username and password?")
        .default(false)
        .interact()
        .map_err(prompt_err)?;
    if needs_auth {
        let username: String = Input::new()
            .with_prompt("Username")
            .interact_text()
            .map_err(prompt_err)?;
        let (password, password_env) = prompt_secret("password", "DOORWATCH_PASSWORD")?;
        profile.username = Some(username);
        profile.password = password;
        profile.password_env = password_env;
    }

    // 4. API key for open / close
    let has_key = Confirm::new()
        .with_prompt("Configure an API key for open/close commands?")
        .default(false)
        .interact()
        .map_err(prompt_err)?;
    if has_key {
        let (api_key, api_key_env) = prompt_secret("API key", "DOORWATCH_API_KEY")?;
        profile.api_key = api_key;
        profile.api_key_env = api_key_env;
    }

    // 5. Merge into the existing config
    let mut cfg = config::load_config()?;
    cfg.profiles.insert(profile_name.clone(), profile);
    if cfg.default_profile.is_none() || cfg.profiles.len() == 1 {
        cfg.default_profile = Some(profile_name.clone());
    }

    let written = config::save_config(&cfg)?;
    eprintln!("\n✓ Configuration written to {}", written.display());
    eprintln!("  Profile: {profile_name}");
    eprintln!("\n  Test it: doorwatch doors list --profile {profile_name}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_masks_secrets() {
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "home".into(),
            Profile {
                server: "http://garage".into(),
                username: Some("admin".into()),
                password: Some("hunter2".into()),
                api_key: Some("k-123".into()),
                ..Profile::default()
            },
        );

        let text = format_config_redacted(&cfg);
        assert!(text.contains("[profiles.home]"));
        assert!(text.contains("admin"));
        assert!(text.contains(MASK));
        assert!(!text.contains("hunter2"));
        assert!(!text.contains("k-123"));
    }
}
