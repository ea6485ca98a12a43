//! Clap derive structures for the `slidectl` CLI.
//!
//! Defines the command tree, global flags, and shared value types. Kept free
//! of workspace crates so `build.rs` can include it for man page generation.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// slidectl -- control Slide curtain motors from the command line
#[derive(Debug, Parser)]
#[command(
    name = "slidectl",
    version,
    about = "Control Slide curtain motors from the command line",
    long_about = "Drive Slide curtains through the vendor cloud API or directly\n\
        over the local network API, and watch their state as it changes.",
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
    #[arg(long, env = "SLIDE_CONFIG", global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Output format [default: table, or `defaults.output` from config]
    #[arg(long, short = 'o', env = "SLIDE_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output [default: auto]
    #[arg(long, global = true)]
    pub color: Option<ColorMode>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Request timeout in seconds (overrides config)
    #[arg(long, global = true)]
    pub timeout: Option<u64>,
}

impl GlobalOpts {
    pub fn output_format(&self) -> OutputFormat {
        self.output.clone().unwrap_or(OutputFormat::Table)
    }

    pub fn color_mode(&self) -> ColorMode {
        self.color.clone().unwrap_or(ColorMode::Auto)
    }
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, ValueEnum)]
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

#[derive(Debug, Clone, PartialEq, Eq, ValueEnum)]
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
    /// List, inspect and move covers
    #[command(alias = "c")]
    Covers(CoversArgs),

    /// Poll continuously and print every state change until Ctrl-C
    Watch(WatchArgs),

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COVERS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CoversArgs {
    #[command(subcommand)]
    pub command: CoversCommand,
}

#[derive(Debug, Subcommand)]
pub enum CoversCommand {
    /// List all covers
    #[command(alias = "ls")]
    List,

    /// Show one cover in detail
    Get {
        /// Cover id, cloud id, local host or name
        cover: String,
    },

    /// Open a cover fully
    Open {
        /// Cover id, cloud id, local host or name
        cover: String,
    },

    /// Close a cover fully
    Close {
        /// Cover id, cloud id, local host or name
        cover: String,
    },

    /// Stop a moving cover
    Stop {
        /// Cover id, cloud id, local host or name
        cover: String,
    },

    /// Move a cover to a position (100 = open, unless inverted)
    #[command(alias = "pos")]
    SetPosition {
        /// Cover id, cloud id, local host or name
        cover: String,

        /// Target position in percent
        #[arg(value_parser = clap::value_parser!(u8).range(0..=100))]
        percent: u8,
    },

    /// Run the calibration routine (the curtain travels end to end)
    Calibrate {
        /// Cover id, cloud id, local host or name
        cover: String,
    },

    /// Set motor strength (local API only)
    Strength {
        /// Cover id, local host or name
        cover: String,

        #[arg(value_enum)]
        strength: StrengthArg,
    },

    /// Enable or disable Touch&Go (local API only)
    TouchGo {
        /// Cover id, local host or name
        cover: String,

        #[arg(action = clap::ArgAction::Set)]
        enabled: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrengthArg {
    Light,
    Medium,
    Strong,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  WATCH
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Poll interval, e.g. "10s" (overrides `scan_interval`)
    #[arg(long, short = 'i')]
    pub interval: Option<String>,

    /// Only watch this cover
    #[arg(long)]
    pub cover: Option<String>,
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
    /// Create the config file with guided setup
    Init,

    /// Display the resolved configuration (passwords redacted)
    Show,

    /// Print the config file location
    Path,

    /// Store the cloud account password in the system keyring
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
