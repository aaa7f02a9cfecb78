//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` variants into user-facing errors with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use fwadmin_config::ConfigError;
use fwadmin_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const REFUSED: i32 = 5;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to device at {url}")]
    #[diagnostic(
        code(fwadmin::connection_failed),
        help(
            "Check that the device management interface is reachable.\n\
             {reason}\n\
             Self-signed certificate? Try --insecure (-k) or --ca-cert."
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(fwadmin::timeout),
        help("Increase the timeout with --timeout or check device responsiveness.")
    )]
    Timeout { seconds: u64 },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(fwadmin::auth_failed),
        help("Check the username and FWADMIN_PASSWORD (or the prompted password).")
    )]
    AuthFailed { message: String },

    #[error("No username configured for profile '{profile}'")]
    #[diagnostic(
        code(fwadmin::no_username),
        help("Pass --username, set FWADMIN_USERNAME, or add `username` to the profile.")
    )]
    NoUsername { profile: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("User '{name}' not found")]
    #[diagnostic(
        code(fwadmin::not_found),
        help("Run: fwadmin users list to see existing accounts")
    )]
    NotFound { name: String },

    #[error("Refusing to delete protected account '{name}'")]
    #[diagnostic(
        code(fwadmin::protected_account),
        help(
            "The default administrator cannot be removed through the REST API.\n\
             On the XML backend pass --force to delete it anyway."
        )
    )]
    ProtectedAccount { name: String },

    // ── Device responses ─────────────────────────────────────────────
    #[error("Device rejected the request: {message}")]
    #[diagnostic(code(fwadmin::rejected))]
    Rejected { message: String },

    #[error("Could not decode device response: {message}")]
    #[diagnostic(
        code(fwadmin::decode),
        help("Run with -vv to log the raw exchange.")
    )]
    Decode { message: String },

    #[error("{message}")]
    #[diagnostic(code(fwadmin::operation_failed))]
    OperationFailed { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(fwadmin::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(fwadmin::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: fwadmin --host H --backend rest config add-profile {name}"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No device configured")]
    #[diagnostic(
        code(fwadmin::no_config),
        help(
            "Pass --host and --backend, or create a profile with:\n\
             fwadmin --host H --backend rest config add-profile NAME\n\
             Expected config at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(fwadmin::config))]
    Config(Box<ConfigError>),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(fwadmin::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    #[error("No password available for {purpose}")]
    #[diagnostic(
        code(fwadmin::no_password),
        help("Set {env_var} or run from an interactive terminal.")
    )]
    NoPassword { purpose: String, env_var: String },

    // ── IO / Serialization ────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Could not render output: {0}")]
    Render(String),
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoUsername { profile } => Self::NoUsername { profile },
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            other => Self::Config(Box::new(other)),
        }
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::NoUsername { .. } | Self::NoPassword { .. } => {
                exit_code::AUTH
            }
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::ProtectedAccount { .. } => exit_code::REFUSED,
            Self::Validation { .. }
            | Self::NonInteractiveRequiresYes { .. }
            | Self::ProfileNotFound { .. }
            | Self::NoConfig { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => Self::ConnectionFailed { url, reason },
            CoreError::Timeout { timeout_secs } => Self::Timeout {
                seconds: timeout_secs,
            },
            CoreError::AuthenticationFailed { message } => Self::AuthFailed { message },
            CoreError::Decode { message, .. } => Self::Decode { message },
            CoreError::NotFound { name } => Self::NotFound { name },
            CoreError::Rejected { message, .. } => Self::Rejected { message },
            CoreError::Validation { message } => Self::Validation {
                field: "input".into(),
                reason: message,
            },
            CoreError::ProtectedAccount { name } => Self::ProtectedAccount { name },
            CoreError::Config { message } => Self::Validation {
                field: "config".into(),
                reason: message,
            },
        }
    }
}
