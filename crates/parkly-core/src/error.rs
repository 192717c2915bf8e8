// ── Core error types ──
//
// User-facing errors from parkly-core. Consumers never see transport
// errors directly: every public operation returns an `ErrorInfo` inside
// its envelope. `ValidationError` marks input rejected before any request
// was made; `StorageError` stays inside the session store.

use serde::Serialize;
use serde_json::Value;
use strum::{AsRefStr, Display};
use thiserror::Error;

// ── ErrorInfo ────────────────────────────────────────────────────────

/// Which layer produced a failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ErrorKind {
    /// Input rejected client-side; no request was sent.
    Validation { field: String },
    /// Network failure, non-success status or unreadable body.
    Transport,
    /// The server asserted a session that is already over.
    Session,
}

/// Normalized description of a failed operation.
///
/// `message` is always non-empty and safe to show; `status` and `payload`
/// carry upstream details when the server provided them.
#[derive(Debug, Clone, PartialEq, Serialize, Error)]
#[serde(rename_all = "camelCase")]
#[error("{message}")]
pub struct ErrorInfo {
    pub kind: ErrorKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
}

impl ErrorInfo {
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Transport,
            message: message.into(),
            status: None,
            payload: None,
        }
    }

    pub fn session(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Session,
            message: message.into(),
            status: None,
            payload: None,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self.kind, ErrorKind::Validation { .. })
    }
}

impl From<ValidationError> for ErrorInfo {
    fn from(err: ValidationError) -> Self {
        Self {
            kind: ErrorKind::Validation {
                field: err.field.to_string(),
            },
            message: err.field.message().into(),
            status: None,
            payload: None,
        }
    }
}

// ── Validation ───────────────────────────────────────────────────────

/// Identifier fields of parking and car commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
pub enum CommandField {
    #[strum(serialize = "carId")]
    CarId,
    #[strum(serialize = "parkingSpotId")]
    ParkingSpotId,
}

impl CommandField {
    /// The message shown when this field is rejected.
    pub fn message(self) -> &'static str {
        match self {
            Self::CarId => "Invalid car identifier",
            Self::ParkingSpotId => "Invalid parking spot identifier",
        }
    }
}

/// An identifier that does not coerce to a positive integer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} (got {input:?})", .field.message())]
pub struct ValidationError {
    pub field: CommandField,
    pub input: String,
}

// ── Storage ──────────────────────────────────────────────────────────

/// Failure of a session persistence backend.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("session storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("stored session record is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

// ── Construction ─────────────────────────────────────────────────────

/// Errors raised while assembling a client.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Cannot build HTTP client: {0}")]
    Client(#[from] parkly_api::Error),
}
