mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::{ArgMatches, CommandFactory, FromArgMatches};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());
    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli, &matches).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

/// Logs go to stderr so `-o json` output stays machine-readable.
fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli, matches: &ArgMatches) -> Result<(), CliError> {
    let Cli { mut global, command } = cli;

    match command {
        // Local commands: no controller needed.
        Command::Config(args) => commands::config_cmd::handle(args, &global),
        Command::Completions(args) => {
            clap_complete::generate(
                args.shell,
                &mut Cli::command(),
                "doorwatch",
                &mut std::io::stdout(),
            );
            Ok(())
        }

        cmd => {
            let cfg = config::load_config()?;
            config::apply_defaults(&mut global, matches, &cfg.defaults)?;
            let resolved = config::resolve(&cfg, &global)?;
            tracing::debug!(
                command = ?cmd,
                profile = %resolved.profile_name,
                server = %resolved.monitor.url,
                "dispatching command"
            );
            commands::dispatch(cmd, &resolved, &global).await
        }
    }
}
