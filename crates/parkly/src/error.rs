//! CLI error types with miette diagnostics.
//!
//! Maps `ErrorInfo` from the core envelopes into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use parkly_config::ConfigError;
use parkly_core::{CoreError, ErrorInfo, ErrorKind};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Validation ───────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(code(parkly::validation))]
    Validation { field: String, message: String },

    // ── Session ──────────────────────────────────────────────────────
    #[error("Not signed in")]
    #[diagnostic(
        code(parkly::not_authenticated),
        help("Run: parkly login --profile {profile}")
    )]
    NotAuthenticated { profile: String },

    #[error("{message}")]
    #[diagnostic(code(parkly::session_expired), help("Run: parkly login"))]
    SessionExpired { message: String },

    #[error("{message}")]
    #[diagnostic(
        code(parkly::unauthorized),
        help(
            "The service rejected the session or the credentials.\n\
             Check them with: parkly config set-password"
        )
    )]
    Unauthorized { message: String },

    // ── Service ──────────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(code(parkly::not_found), help("Run: parkly cars list"))]
    NotFound { message: String },

    #[error("{message}")]
    #[diagnostic(code(parkly::conflict))]
    Conflict { message: String },

    #[error("{message}")]
    #[diagnostic(code(parkly::api_error))]
    Api { message: String, status: Option<u16> },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(parkly::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: parkly config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No service configured")]
    #[diagnostic(
        code(parkly::no_config),
        help(
            "Create a profile with: parkly config init\n\
             Or pass --url. Expected config at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error("No {what} configured for profile '{profile}'")]
    #[diagnostic(
        code(parkly::no_credentials),
        help(
            "Pass --email, set PARKLY_EMAIL / PARKLY_PASSWORD, or store the\n\
             password with: parkly config set-password --profile {profile}"
        )
    )]
    NoCredentials { profile: String, what: &'static str },

    #[error(transparent)]
    #[diagnostic(code(parkly::config))]
    Config(ConfigError),

    #[error(transparent)]
    #[diagnostic(code(parkly::client))]
    Client(#[from] CoreError),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(parkly::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Cannot render output: {0}")]
    #[diagnostic(code(parkly::serialization))]
    Serialization(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            Self::NotAuthenticated { .. }
            | Self::SessionExpired { .. }
            | Self::Unauthorized { .. }
            | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Conflict { .. } => exit_code::CONFLICT,
            Self::Api { status: None, .. } | Self::Client(_) => exit_code::CONNECTION,
            _ => exit_code::GENERAL,
        }
    }
}

// ── ErrorInfo → CliError mapping ─────────────────────────────────────

impl From<ErrorInfo> for CliError {
    fn from(err: ErrorInfo) -> Self {
        let ErrorInfo {
            kind,
            message,
            status,
            ..
        } = err;
        match (kind, status) {
            (ErrorKind::Validation { field }, _) => Self::Validation { field, message },
            (ErrorKind::Session, _) => Self::SessionExpired { message },
            (ErrorKind::Transport, Some(401)) => Self::Unauthorized { message },
            (ErrorKind::Transport, Some(404)) => Self::NotFound { message },
            (ErrorKind::Transport, Some(409)) => Self::Conflict { message },
            (ErrorKind::Transport, status) => Self::Api { message, status },
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { profile, what } => Self::NoCredentials { profile, what },
            ConfigError::ProfileNotFound { name } => Self::ProfileNotFound {
                name,
                available: "(none)".into(),
            },
            ConfigError::Validation { field, reason } => Self::Validation {
                message: format!("Invalid value for {field}: {reason}"),
                field,
            },
            other => Self::Config(other),
        }
    }
}
