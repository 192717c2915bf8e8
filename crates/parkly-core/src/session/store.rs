// ── Session store ──
//
// Owns the authenticated identity. Readers get lock-free snapshots and
// `watch` subscriptions; writers are restricted to this crate (login,
// logout and the session guard). Every change is mirrored to the
// persistence backend before subscribers observe it.

use std::fmt;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, warn};

use super::storage::{MemoryStorage, SessionStorage};
use crate::model::Identity;
use crate::stream::{IdentitySnapshot, IdentityStream};

/// Storage key holding the serialized identity.
pub const USER_KEY: &str = "user";
/// Storage key holding the exported session cookie header.
pub const SESSION_COOKIE_KEY: &str = "session";

/// Reactive holder of the current identity.
pub struct SessionStore {
    identity: watch::Sender<IdentitySnapshot>,
    storage: Arc<dyn SessionStorage>,
}

impl SessionStore {
    /// Create a store backed by `storage`, restoring any persisted identity.
    ///
    /// A malformed or already-expired record is discarded together with the
    /// stored session cookie.
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        let restored = restore(storage.as_ref());
        let (identity, _) = watch::channel(restored.map(Arc::new));
        Self { identity, storage }
    }

    /// A store that persists nothing beyond the process.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    // ── Readers ──────────────────────────────────────────────────────

    pub fn identity(&self) -> IdentitySnapshot {
        self.identity.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.borrow().is_some()
    }

    pub fn subscribe(&self) -> watch::Receiver<IdentitySnapshot> {
        self.identity.subscribe()
    }

    pub fn identity_stream(&self) -> IdentityStream {
        IdentityStream::new(self.identity.subscribe())
    }

    /// The persisted session cookie header, if one was saved.
    pub fn session_cookie(&self) -> Option<String> {
        match self.storage.load(SESSION_COOKIE_KEY) {
            Ok(value) => value.filter(|v| !v.trim().is_empty()),
            Err(e) => {
                warn!(error = %e, "failed to read persisted session cookie");
                None
            }
        }
    }

    // ── Writers ──────────────────────────────────────────────────────

    /// Replace the identity and persist it.
    pub(crate) fn set(&self, identity: Identity) {
        let identity = Arc::new(identity);
        self.identity.send_modify(|slot| {
            match serde_json::to_string(identity.as_ref()) {
                Ok(json) => {
                    if let Err(e) = self.storage.save(USER_KEY, &json) {
                        warn!(error = %e, "failed to persist identity");
                    }
                }
                Err(e) => warn!(error = %e, "failed to serialize identity"),
            }
            *slot = Some(identity);
        });
        debug!("session identity stored");
    }

    /// Persist the session cookie header exported from the transport.
    pub(crate) fn save_session_cookie(&self, header: &str) {
        if let Err(e) = self.storage.save(SESSION_COOKIE_KEY, header) {
            warn!(error = %e, "failed to persist session cookie");
        }
    }

    /// Clear the identity and every persisted key.
    ///
    /// Returns `true` only for the call that actually removed an identity,
    /// so concurrent callers can agree on a single winner.
    pub(crate) fn clear(&self) -> bool {
        self.identity.send_if_modified(|slot| {
            for key in [USER_KEY, SESSION_COOKIE_KEY] {
                if let Err(e) = self.storage.remove(key) {
                    warn!(error = %e, key, "failed to remove persisted session state");
                }
            }
            slot.take().is_some()
        })
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("authenticated", &self.is_authenticated())
            .finish_non_exhaustive()
    }
}

/// Load the persisted identity, discarding unusable records.
fn restore(storage: &dyn SessionStorage) -> Option<Identity> {
    let raw = match storage.load(USER_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            discard(storage, SESSION_COOKIE_KEY);
            return None;
        }
        Err(e) => {
            warn!(error = %e, "failed to read persisted identity");
            return None;
        }
    };

    match serde_json::from_str::<Identity>(&raw) {
        Ok(identity) if identity.is_expired() => {
            debug!("persisted identity already expired, discarding");
        }
        Ok(identity) => {
            debug!(user = %identity.user_id(), "restored persisted identity");
            return Some(identity);
        }
        Err(e) => warn!(error = %e, "persisted identity is malformed, discarding"),
    }

    discard(storage, USER_KEY);
    discard(storage, SESSION_COOKIE_KEY);
    None
}

fn discard(storage: &dyn SessionStorage, key: &str) {
    if let Err(e) = storage.remove(key) {
        warn!(error = %e, key, "failed to remove persisted session state");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{Duration, Utc};
    use serde_json::json;

    use super::*;

    fn identity(expires_in: Option<Duration>) -> Identity {
        let user = serde_json::from_value(json!({ "id": 7 })).unwrap();
        Identity::new(user, expires_in.map(|d| Utc::now() + d))
    }

    fn storage_with(identity: &str) -> Arc<MemoryStorage> {
        let storage = Arc::new(MemoryStorage::new());
        storage.save(USER_KEY, identity).unwrap();
        storage.save(SESSION_COOKIE_KEY, "sid=abc").unwrap();
        storage
    }

    #[test]
    fn set_persists_and_clear_removes() {
        let storage = Arc::new(MemoryStorage::new());
        let store = SessionStore::new(storage.clone());
        assert!(!store.is_authenticated());

        store.set(identity(None));
        store.save_session_cookie("sid=abc");
        assert!(store.is_authenticated());
        assert!(storage.load(USER_KEY).unwrap().is_some());
        assert_eq!(store.session_cookie().as_deref(), Some("sid=abc"));

        assert!(store.clear());
        assert!(!store.is_authenticated());
        assert!(storage.is_empty());
    }

    #[test]
    fn clear_reports_a_single_transition() {
        let store = SessionStore::in_memory();
        store.set(identity(None));
        assert!(store.clear());
        assert!(!store.clear());
    }

    #[test]
    fn restores_live_identity() {
        let json = serde_json::to_string(&identity(Some(Duration::hours(1)))).unwrap();
        let store = SessionStore::new(storage_with(&json));
        assert!(store.is_authenticated());
        assert_eq!(store.session_cookie().as_deref(), Some("sid=abc"));
    }

    #[test]
    fn expired_identity_is_discarded_on_restore() {
        let json = serde_json::to_string(&identity(Some(Duration::hours(-1)))).unwrap();
        let storage = storage_with(&json);
        let store = SessionStore::new(storage.clone());
        assert!(!store.is_authenticated());
        assert!(storage.is_empty());
    }

    #[test]
    fn malformed_identity_is_discarded_on_restore() {
        let storage = storage_with("{not json");
        let store = SessionStore::new(storage.clone());
        assert!(!store.is_authenticated());
        assert!(storage.is_empty());
    }

    #[test]
    fn orphaned_cookie_is_dropped() {
        let storage = Arc::new(MemoryStorage::new());
        storage.save(SESSION_COOKIE_KEY, "sid=stale").unwrap();
        let store = SessionStore::new(storage.clone());
        assert!(store.session_cookie().is_none());
    }

    #[tokio::test]
    async fn subscribers_see_changes() {
        let store = SessionStore::in_memory();
        let mut stream = store.identity_stream();
        assert!(stream.current().is_none());

        store.set(identity(None));
        let snap = stream.changed().await.unwrap();
        assert!(snap.is_some());

        store.clear();
        assert!(stream.changed().await.unwrap().is_none());
    }
}
