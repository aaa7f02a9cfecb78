//! Clap derive structures for the `fwadmin` CLI.
//!
//! Defines the command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// fwadmin -- administrator account management for firewall appliances
#[derive(Debug, Parser)]
#[command(
    name = "fwadmin",
    version,
    about = "Manage firewall administrator accounts from the command line",
    long_about = "Create, list, re-password and delete administrator accounts on\n\
        firewall appliances through their management APIs.\n\n\
        Two backends are supported: the REST/JSON API (token login, deploy\n\
        jobs) and the XML/XPath API (API keys, candidate config + commit).",
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
    /// Device profile to use
    #[arg(long, short = 'p', env = "FWADMIN_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Device host or URL (overrides profile)
    #[arg(long, short = 'H', env = "FWADMIN_HOST", global = true)]
    pub host: Option<String>,

    /// Management API backend (overrides profile)
    #[arg(long, short = 'b', env = "FWADMIN_BACKEND", global = true)]
    pub backend: Option<BackendArg>,

    /// Login name (overrides profile)
    #[arg(long, short = 'u', env = "FWADMIN_USERNAME", global = true)]
    pub username: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "FWADMIN_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

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
    #[arg(long, short = 'k', env = "FWADMIN_INSECURE", global = true)]
    pub insecure: bool,

    /// Verify the device certificate against this CA file
    #[arg(long, env = "FWADMIN_CA_CERT", global = true, conflicts_with = "insecure")]
    pub ca_cert: Option<PathBuf>,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "FWADMIN_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Shared Enums ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, ValueEnum)]
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
pub enum BackendArg {
    /// REST/JSON API (token login, deploy jobs)
    Rest,
    /// XML/XPath API (API key, candidate config + commit)
    Xml,
}

impl BackendArg {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rest => "rest",
            Self::Xml => "xml",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RoleArg {
    /// Full administrator (REST)
    Admin,
    /// Read-only access (REST)
    ReadOnly,
    /// Read-write access (REST)
    ReadWrite,
    /// Superuser (XML; the only role that backend assigns)
    Superuser,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage administrator accounts
    #[command(alias = "user", alias = "u")]
    Users(UsersArgs),

    /// Push staged changes live (deploy job or commit)
    Commit,

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Users ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct UsersArgs {
    #[command(subcommand)]
    pub command: UsersCommand,
}

#[derive(Debug, Subcommand)]
pub enum UsersCommand {
    /// List accounts on the device
    #[command(alias = "ls")]
    List,

    /// Create an account (password from FWADMIN_NEW_PASSWORD or a prompt)
    Create {
        /// Account name
        name: String,

        /// Role to assign; defaults to read-only on REST, superuser on XML
        #[arg(long, short = 'r')]
        role: Option<RoleArg>,
    },

    /// Set a new password (from FWADMIN_NEW_PASSWORD or a prompt)
    #[command(alias = "password")]
    Passwd {
        /// Account name
        name: String,
    },

    /// Delete an account
    #[command(alias = "rm")]
    Delete {
        /// Account name
        name: String,

        /// Allow deleting the default `admin` account where the backend permits it
        #[arg(long)]
        force: bool,
    },
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file location
    Path,

    /// Display the current configuration
    Show,

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Save a device profile from the global --host, --backend, --username,
    /// --insecure, --ca-cert and --timeout flags
    AddProfile {
        /// Profile name
        name: String,

        /// Make this the default profile
        #[arg(long)]
        default: bool,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
