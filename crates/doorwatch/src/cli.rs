//! Clap derive structures for the `doorwatch` CLI.
//!
//! Defines the command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// doorwatch -- watch and operate garage doors from the command line
#[derive(Debug, Parser)]
#[command(
    name = "doorwatch",
    version,
    about = "Watch and operate garage doors from the command line",
    long_about = "A CLI for garage door controllers.\n\n\
        Lists doors, follows their state live, and sends open/close/toggle\n\
        commands through the controller's HTTP endpoints.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Controller profile to use
    #[arg(long, short = 'p', env = "DOORWATCH_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Controller URL (overrides profile)
    #[arg(long, short = 's', env = "DOORWATCH_SERVER", global = true)]
    pub server: Option<String>,

    /// Username for protected endpoints (overrides profile)
    #[arg(long, short = 'u', env = "DOORWATCH_USERNAME", global = true)]
    pub username: Option<String>,

    /// Key for open/close commands
    #[arg(long, env = "DOORWATCH_API_KEY", global = true, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "DOORWATCH_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, env = "DOORWATCH_COLOR", default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "DOORWATCH_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "DOORWATCH_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List and operate doors
    #[command(alias = "d")]
    Doors(DoorsArgs),

    /// Show how long the controller has been running
    Uptime,

    /// Follow door state live until interrupted
    #[command(alias = "w")]
    Watch,

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Doors ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DoorsArgs {
    #[command(subcommand)]
    pub command: DoorsCommand,
}

#[derive(Debug, Subcommand)]
pub enum DoorsCommand {
    /// List all doors with their current state
    #[command(alias = "ls")]
    List,

    /// Print the state of one door
    Status {
        /// Door ID
        id: String,
    },

    /// Press the door button (opens a closed door, closes an open one)
    Toggle {
        /// Door ID
        id: String,
    },

    /// Open a door if it is closed
    Open {
        /// Door ID
        id: String,
    },

    /// Close a door if it is open
    Close {
        /// Door ID
        id: String,
    },

    /// Close every open door
    CloseAll,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Interactive configuration wizard
    Init,

    /// Display the resolved configuration (secrets masked)
    Show,

    /// Print the config file location
    Path,

    /// Set the default profile
    Use {
        /// Profile name
        name: String,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
