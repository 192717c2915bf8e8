// ── Error normalization ──
//
// Collapses every transport failure shape into `ErrorInfo`. A structured
// upstream body is kept as the payload and its message wins; otherwise
// the operation's fixed fallback text is used.

use serde_json::Value;
use tracing::debug;

use crate::error::{ErrorInfo, ErrorKind};

/// Fallback messages, one per public operation.
pub mod fallback {
    pub const REGISTER: &str = "Registration failed";
    pub const LOGIN: &str = "Login failed";
    pub const LOGOUT: &str = "Logout failed";
    pub const USER_DETAILS: &str = "Failed to get user details";
    pub const CARS: &str = "Failed to get cars data";
    pub const CREATE_CAR: &str = "Failed to create car";
    pub const DELETE_CAR: &str = "Failed to delete car";
    pub const START_PARKING: &str = "Failed to start parking";
    pub const STOP_PARKING: &str = "Failed to stop parking";
    pub const SESSION_EXPIRED: &str = "Session expired";
}

/// Convert a transport error into `ErrorInfo`.
pub fn normalize(err: &parkly_api::Error, fallback: &str) -> ErrorInfo {
    debug!(error = %err, fallback, "normalizing transport error");
    let payload = err.payload().cloned();
    let message = payload
        .as_ref()
        .and_then(upstream_message)
        .unwrap_or(fallback)
        .to_owned();

    ErrorInfo {
        kind: ErrorKind::Transport,
        message,
        status: err.status(),
        payload,
    }
}

/// Like [`normalize`], but the visible message is always `message`.
///
/// Used where a step's failure must read the same regardless of what the
/// server said; status and payload are still kept.
pub fn normalize_fixed(err: &parkly_api::Error, message: &str) -> ErrorInfo {
    ErrorInfo {
        message: message.to_owned(),
        ..normalize(err, message)
    }
}

/// The human-readable text inside an upstream error body, if any.
///
/// The service answers either with a bare string or with an object
/// carrying `message` or `error`.
fn upstream_message(payload: &Value) -> Option<&str> {
    let text = match payload {
        Value::String(s) => Some(s.as_str()),
        Value::Object(obj) => ["message", "error"]
            .iter()
            .find_map(|key| obj.get(*key).and_then(Value::as_str)),
        _ => None,
    }?;
    let text = text.trim();
    (!text.is_empty()).then_some(text)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn status(status: u16, body: Option<Value>) -> parkly_api::Error {
        parkly_api::Error::Status {
            status,
            raw: body.as_ref().map(Value::to_string).unwrap_or_default(),
            body,
        }
    }

    #[test]
    fn structured_message_wins() {
        let info = normalize(
            &status(409, Some(json!({ "message": "Plate already registered" }))),
            fallback::CREATE_CAR,
        );
        assert_eq!(info.message, "Plate already registered");
        assert_eq!(info.status, Some(409));
        assert_eq!(info.payload, Some(json!({ "message": "Plate already registered" })));
    }

    #[test]
    fn error_key_and_bare_strings_are_read() {
        let info = normalize(&status(400, Some(json!({ "error": "Bad spot" }))), "x");
        assert_eq!(info.message, "Bad spot");

        let info = normalize(&status(400, Some(json!("Car is already parked"))), "x");
        assert_eq!(info.message, "Car is already parked");
    }

    #[test]
    fn payload_without_text_keeps_fallback_but_is_preserved() {
        let info = normalize(
            &status(422, Some(json!({ "errors": ["year"] }))),
            fallback::REGISTER,
        );
        assert_eq!(info.message, "Registration failed");
        assert_eq!(info.payload, Some(json!({ "errors": ["year"] })));
    }

    #[test]
    fn bodiless_failures_fall_back() {
        let info = normalize(&status(500, None), fallback::LOGOUT);
        assert_eq!(info.message, "Logout failed");
        assert!(info.payload.is_none());

        let info = normalize(
            &parkly_api::Error::Deserialization {
                message: "expected value".into(),
                body: "<html>".into(),
            },
            fallback::CARS,
        );
        assert_eq!(info.message, "Failed to get cars data");
        assert!(info.status.is_none());
    }

    #[test]
    fn fixed_message_ignores_upstream_text_but_keeps_details() {
        let info = normalize_fixed(
            &status(404, Some(json!({ "message": "User not found" }))),
            fallback::USER_DETAILS,
        );
        assert_eq!(info.message, "Failed to get user details");
        assert_eq!(info.status, Some(404));
        assert_eq!(info.payload, Some(json!({ "message": "User not found" })));
    }

    #[test]
    fn blank_upstream_message_is_ignored() {
        let info = normalize(&status(400, Some(json!({ "message": "  " }))), fallback::LOGIN);
        assert_eq!(info.message, "Login failed");
    }
}
