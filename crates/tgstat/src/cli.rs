//! Clap derive structures for the `tgstat` CLI.
//!
//! Defines the command tree, global flags, and output formats.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// tgstat -- DSL line statistics from Technicolor TG-series modems
#[derive(Debug, Parser)]
#[command(
    name = "tgstat",
    version,
    about = "Read DSL line statistics from Technicolor modems",
    long_about = "Logs in to a Technicolor TG-series modem with its SRP-6a handshake,\n\
        reads the broadband and gateway status pages, and prints one record\n\
        per poll with wrap-corrected transfer counters.",
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
    /// Config file (defaults to the platform config directory)
    #[arg(long, short = 'c', env = "TGSTAT_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Modem address, e.g. 192.168.1.254 (overrides config)
    #[arg(long, short = 'a', global = true)]
    pub address: Option<String>,

    /// Login username (overrides config)
    #[arg(long, short = 'u', global = true)]
    pub username: Option<String>,

    /// Output format
    #[arg(long, short = 'o', env = "TGSTAT_OUTPUT", default_value = "plain", global = true)]
    pub output: OutputFormat,

    /// Print a header row before CSV records
    #[arg(long, global = true)]
    pub header: bool,

    /// Request timeout in seconds (overrides config)
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

// ── Output Enum ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One `name value` pair per line (default)
    Plain,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON, one record per line
    JsonCompact,
    /// YAML
    Yaml,
    /// Comma-separated values, one row per record
    Csv,
    /// Field / value table
    Table,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in, read both status pages once and print the record
    Stats,

    /// Poll repeatedly, correcting counter wraparound between polls
    #[command(alias = "w")]
    Watch(WatchArgs),

    /// Extract a record from saved page markup without contacting the modem
    Parse(ParseArgs),

    /// Manage the configuration file and stored password
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  WATCH
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Time between polls, e.g. "30s" or "2m" (defaults to config `interval`)
    #[arg(long, short = 'i')]
    pub interval: Option<humantime::Duration>,

    /// Stop after this many polls (failed polls count)
    #[arg(long, short = 'n')]
    pub count: Option<u64>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  PARSE
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ParseArgs {
    /// Saved broadband-bridge-modal.lp markup
    #[arg(long, short = 'b')]
    pub broadband: PathBuf,

    /// Saved gateway-modal.lp markup
    #[arg(long, short = 'g')]
    pub gateway: Option<PathBuf>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file path
    Path,

    /// Display the resolved configuration (password masked)
    Show,

    /// Create the config file with guided setup
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Store the login password in the system keyring
    SetPassword,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
