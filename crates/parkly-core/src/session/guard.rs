// ── Session guard ──
//
// Middleware layered onto the request gateway. Inspects every resolved
// call for signs that the server no longer honours the session and, when
// it finds one, clears the store and announces a navigation to the
// unauthenticated entry point. The inspected result itself is never
// altered.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parkly_api::models::parse_timestamp;
use parkly_api::{Outcome, ResponseInspector};
use serde::Serialize;
use strum::{AsRefStr, Display};
use tokio::sync::broadcast;
use tracing::warn;

use super::store::SessionStore;

const NAVIGATION_CHANNEL_SIZE: usize = 16;

/// Why a session was declared over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum InvalidationReason {
    /// A successful payload carried an `expiresAt` in the past.
    Expired,
    /// The server answered 401.
    Unauthorized,
}

/// Verdict for a single inspected call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    Valid,
    Invalid(InvalidationReason),
}

impl SessionOutcome {
    pub fn is_valid(self) -> bool {
        matches!(self, Self::Valid)
    }
}

/// Side effect requested of the host application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "to", rename_all = "snake_case")]
pub enum Navigation {
    /// Leave authenticated views for the login/landing screen.
    EntryPoint { reason: InvalidationReason },
}

/// Watches gateway outcomes and invalidates the session when told to.
pub struct SessionGuard {
    store: Arc<SessionStore>,
    navigation: broadcast::Sender<Navigation>,
}

impl SessionGuard {
    pub fn new(store: Arc<SessionStore>) -> Self {
        let (navigation, _) = broadcast::channel(NAVIGATION_CHANNEL_SIZE);
        Self { store, navigation }
    }

    /// Receive navigation requests issued after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<Navigation> {
        self.navigation.subscribe()
    }

    /// Classify an outcome without side effects.
    ///
    /// A 401 wins regardless of body. A 2xx object body whose `expiresAt`
    /// is readable and earlier than `now` is expired. Unreadable
    /// timestamps never invalidate.
    pub fn assess(outcome: Outcome<'_>, now: DateTime<Utc>) -> SessionOutcome {
        match outcome {
            Outcome::Failure(err) if err.is_unauthorized() => {
                SessionOutcome::Invalid(InvalidationReason::Unauthorized)
            }
            Outcome::Failure(_) => SessionOutcome::Valid,
            Outcome::Response(resp) => match resp.field("expiresAt").and_then(parse_timestamp) {
                Some(at) if at < now => SessionOutcome::Invalid(InvalidationReason::Expired),
                _ => SessionOutcome::Valid,
            },
        }
    }

    /// Classify an outcome and apply the invalidation side effects.
    pub fn check(&self, outcome: Outcome<'_>) -> SessionOutcome {
        let verdict = Self::assess(outcome, Utc::now());
        if let SessionOutcome::Invalid(reason) = verdict {
            self.invalidate(reason);
        }
        verdict
    }

    /// Clear the session. Only the caller that actually ends an
    /// authenticated session emits the navigation request; later or
    /// concurrent detections find the store already empty.
    pub fn invalidate(&self, reason: InvalidationReason) {
        if self.store.clear() {
            warn!(%reason, "session invalidated, redirecting to entry point");
            // No subscribers is fine: the host may not be listening.
            let _ = self.navigation.send(Navigation::EntryPoint { reason });
        }
    }
}

impl ResponseInspector for SessionGuard {
    fn inspect(&self, outcome: Outcome<'_>) {
        self.check(outcome);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Duration;
    use parkly_api::ApiResponse;
    use serde_json::json;

    use super::*;
    use crate::model::Identity;

    fn ok(body: serde_json::Value) -> ApiResponse {
        ApiResponse { status: 200, body }
    }

    fn unauthorized(body: Option<serde_json::Value>) -> parkly_api::Error {
        parkly_api::Error::Status {
            status: 401,
            body,
            raw: String::new(),
        }
    }

    fn signed_in_guard() -> SessionGuard {
        let store = Arc::new(SessionStore::in_memory());
        store.set(Identity::new(
            serde_json::from_value(json!({ "id": 1 })).unwrap(),
            None,
        ));
        SessionGuard::new(store)
    }

    #[test]
    fn past_expiry_is_expired() {
        let now = Utc::now();
        let past = (now - Duration::seconds(5)).to_rfc3339();
        let resp = ok(json!({ "expiresAt": past }));
        assert_eq!(
            SessionGuard::assess(Outcome::Response(&resp), now),
            SessionOutcome::Invalid(InvalidationReason::Expired)
        );
    }

    #[test]
    fn future_missing_or_garbage_expiry_is_valid() {
        let now = Utc::now();
        for body in [
            json!({ "expiresAt": (now + Duration::hours(1)).to_rfc3339() }),
            json!({ "id": 3 }),
            json!({ "expiresAt": "whenever" }),
            json!([1, 2, 3]),
            serde_json::Value::Null,
        ] {
            let resp = ok(body);
            assert!(SessionGuard::assess(Outcome::Response(&resp), now).is_valid());
        }
    }

    #[test]
    fn any_401_is_unauthorized_other_failures_are_not() {
        let now = Utc::now();
        let bare = unauthorized(None);
        let with_body = unauthorized(Some(json!({ "message": "nope" })));
        for err in [&bare, &with_body] {
            assert_eq!(
                SessionGuard::assess(Outcome::Failure(err), now),
                SessionOutcome::Invalid(InvalidationReason::Unauthorized)
            );
        }

        let server = parkly_api::Error::Status {
            status: 500,
            body: None,
            raw: String::new(),
        };
        assert!(SessionGuard::assess(Outcome::Failure(&server), now).is_valid());
    }

    #[test]
    fn invalidation_navigates_once() {
        let guard = signed_in_guard();
        let mut rx = guard.subscribe();
        let err = unauthorized(None);

        guard.inspect(Outcome::Failure(&err));
        guard.inspect(Outcome::Failure(&err));

        assert_eq!(
            rx.try_recv().unwrap(),
            Navigation::EntryPoint {
                reason: InvalidationReason::Unauthorized
            }
        );
        assert!(rx.try_recv().is_err());
        assert!(!guard.store.is_authenticated());
    }

    #[test]
    fn reasons_render_snake_case() {
        assert_eq!(InvalidationReason::Unauthorized.to_string(), "unauthorized");
        assert_eq!(
            serde_json::to_value(Navigation::EntryPoint {
                reason: InvalidationReason::Expired
            })
            .unwrap(),
            json!({ "to": "entry_point", "reason": "expired" })
        );
    }
}
