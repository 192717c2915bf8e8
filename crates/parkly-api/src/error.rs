use thiserror::Error;

/// Transport-level error for the `parkly-api` crate.
///
/// Every failure a [`RequestGateway`](crate::RequestGateway) call can produce
/// lands here: network failures, non-success statuses, and bodies that are
/// not structured data. `parkly-core` normalizes these into `ErrorInfo`
/// before anything reaches a UI.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS or client construction error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Server responses ────────────────────────────────────────────
    /// The server answered outside the 2xx range.
    ///
    /// `body` holds the parsed JSON payload when the server sent one;
    /// `raw` always keeps the untouched text for debugging.
    #[error("HTTP {status}: {}", summarize(.body.as_ref(), .raw))]
    Status {
        status: u16,
        body: Option<serde_json::Value>,
        raw: String,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// A request payload could not be encoded as JSON.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// HTTP status carried by this error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Structured upstream error body, if one was sent.
    pub fn payload(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Status { body, .. } => body.as_ref(),
            _ => None,
        }
    }

    /// Returns `true` if the server rejected the session (HTTP 401).
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// Returns `true` if this is a transient error a caller may retry.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Status { status, .. } => matches!(status, 502..=504),
            _ => false,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

fn summarize(body: Option<&serde_json::Value>, raw: &str) -> String {
    match body {
        Some(value) => value.to_string(),
        None if raw.is_empty() => "<empty body>".into(),
        None => raw.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn status_error_exposes_payload_and_status() {
        let err = Error::Status {
            status: 401,
            body: Some(json!({ "message": "expired" })),
            raw: r#"{"message":"expired"}"#.into(),
        };
        assert_eq!(err.status(), Some(401));
        assert!(err.is_unauthorized());
        assert_eq!(err.payload(), Some(&json!({ "message": "expired" })));
        assert!(!err.is_transient());
    }

    #[test]
    fn status_error_display_falls_back_to_raw_text() {
        let err = Error::Status {
            status: 500,
            body: None,
            raw: String::new(),
        };
        assert_eq!(err.to_string(), "HTTP 500: <empty body>");
    }

    #[test]
    fn gateway_errors_are_transient() {
        let err = Error::Status {
            status: 503,
            body: None,
            raw: "unavailable".into(),
        };
        assert!(err.is_transient());
        assert!(!err.is_not_found());
    }
}
