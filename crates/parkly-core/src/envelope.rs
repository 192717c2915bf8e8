// ── Result envelope ──
//
// The uniform success/failure wrapper returned by every public operation.
// On the wire it renders as `{ "success": true, "data": ... }` or
// `{ "success": false, "error": ... }`.

use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::error::ErrorInfo;

/// Outcome of a public operation: exactly one of data or error.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultEnvelope<T> {
    Success(T),
    Failure(ErrorInfo),
}

impl<T> ResultEnvelope<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Success(data) => Some(data),
            Self::Failure(_) => None,
        }
    }

    pub fn error(&self) -> Option<&ErrorInfo> {
        match self {
            Self::Success(_) => None,
            Self::Failure(err) => Some(err),
        }
    }

    pub fn into_result(self) -> Result<T, ErrorInfo> {
        match self {
            Self::Success(data) => Ok(data),
            Self::Failure(err) => Err(err),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ResultEnvelope<U> {
        match self {
            Self::Success(data) => ResultEnvelope::Success(f(data)),
            Self::Failure(err) => ResultEnvelope::Failure(err),
        }
    }
}

impl<T> From<Result<T, ErrorInfo>> for ResultEnvelope<T> {
    fn from(result: Result<T, ErrorInfo>) -> Self {
        match result {
            Ok(data) => Self::Success(data),
            Err(err) => Self::Failure(err),
        }
    }
}

impl<T: Serialize> Serialize for ResultEnvelope<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ResultEnvelope", 2)?;
        match self {
            Self::Success(data) => {
                state.serialize_field("success", &true)?;
                state.serialize_field("data", data)?;
            }
            Self::Failure(err) => {
                state.serialize_field("success", &false)?;
                state.serialize_field("error", err)?;
            }
        }
        state.end()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn success_renders_data_only() {
        let env = ResultEnvelope::Success(json!({ "id": 1 }));
        assert_eq!(
            serde_json::to_value(&env).unwrap(),
            json!({ "success": true, "data": { "id": 1 } })
        );
    }

    #[test]
    fn failure_renders_error_only() {
        let env: ResultEnvelope<()> =
            ResultEnvelope::Failure(ErrorInfo::transport("Failed to get user details"));
        assert_eq!(
            serde_json::to_value(&env).unwrap(),
            json!({
                "success": false,
                "error": { "kind": { "type": "transport" }, "message": "Failed to get user details" }
            })
        );
    }

    #[test]
    fn accessors_follow_the_variant() {
        let ok: ResultEnvelope<u8> = Ok(3).into();
        assert!(ok.is_success());
        assert_eq!(ok.data(), Some(&3));
        assert!(ok.error().is_none());

        let failed: ResultEnvelope<u8> = Err(ErrorInfo::transport("nope")).into();
        assert!(!failed.is_success());
        assert_eq!(failed.map(|n| n + 1).into_result().unwrap_err().message, "nope");
    }
}
