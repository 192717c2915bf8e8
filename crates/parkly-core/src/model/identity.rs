// ── Authenticated identity ──

use chrono::{DateTime, Utc};
use parkly_api::models::parse_timestamp;
use parkly_api::{LoginResponse, UserId, UserRecord};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// The signed-in user plus the session lifetime the server asserted.
///
/// Serialized as `{ "user": {...}, "expiresAt": "..." }`, which is also the
/// persisted layout under the `"user"` storage key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub user: UserRecord,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_timestamp"
    )]
    pub expires_at: Option<DateTime<Utc>>,
}

impl Identity {
    pub fn new(user: UserRecord, expires_at: Option<DateTime<Utc>>) -> Self {
        Self { user, expires_at }
    }

    pub fn user_id(&self) -> &UserId {
        &self.user.id
    }

    /// Whether the asserted lifetime ended before `now`.
    /// An identity without `expiresAt` never expires client-side.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at < now)
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// A display string for the user: email when present, else the id.
    pub fn display_name(&self) -> String {
        self.user
            .fields
            .get("email")
            .and_then(Value::as_str)
            .map_or_else(|| self.user.id.to_string(), String::from)
    }
}

impl From<LoginResponse> for Identity {
    fn from(resp: LoginResponse) -> Self {
        Self::new(resp.user, resp.expires_at)
    }
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(parse_timestamp))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Duration;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn identity(expires_at: Option<DateTime<Utc>>) -> Identity {
        let user = serde_json::from_value(json!({ "id": 7, "email": "driver@example.com" })).unwrap();
        Identity::new(user, expires_at)
    }

    #[test]
    fn expiry_is_relative_to_now() {
        let now = Utc::now();
        assert!(identity(Some(now - Duration::minutes(1))).is_expired_at(now));
        assert!(!identity(Some(now + Duration::minutes(1))).is_expired_at(now));
        assert!(!identity(None).is_expired_at(now));
    }

    #[test]
    fn persisted_layout_round_trips() {
        let at = DateTime::parse_from_rfc3339("2030-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let value = serde_json::to_value(identity(Some(at))).unwrap();
        assert_eq!(
            value,
            json!({
                "user": { "id": 7, "email": "driver@example.com" },
                "expiresAt": "2030-01-01T00:00:00Z"
            })
        );
        let back: Identity = serde_json::from_value(value).unwrap();
        assert_eq!(back.expires_at, Some(at));
    }

    #[test]
    fn display_name_prefers_email() {
        assert_eq!(identity(None).display_name(), "driver@example.com");
        let bare = Identity::new(serde_json::from_value(json!({ "id": "u-1" })).unwrap(), None);
        assert_eq!(bare.display_name(), "u-1");
    }
}
