// ── Parkly client ──
//
// The entry point for hosts. Owns the gateway (with the session guard
// layered on), the session store and the navigation channel, and exposes
// every service operation as an async method returning a ResultEnvelope.
// No operation fails past its own boundary.

use std::fmt::{self, Display};
use std::sync::Arc;

use parkly_api::{
    NewCar, ParkingSession, Registration, RequestGateway, ResponseInspector, TransportConfig,
    UserId,
};
use secrecy::SecretString;
use serde_json::Value;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::config::{ClientConfig, StorageConfig};
use crate::convert::{map_vehicle, merge_user_data};
use crate::envelope::ResultEnvelope;
use crate::error::{CommandField, CoreError, ErrorInfo};
use crate::model::{Identity, UserData, Vehicle};
use crate::normalize::{fallback, normalize, normalize_fixed};
use crate::session::{
    FileStorage, MemoryStorage, Navigation, SessionGuard, SessionStorage, SessionStore,
};
use crate::stream::{IdentitySnapshot, IdentityStream};
use crate::validate::{positive_id, validate_start, validate_stop};

/// Session-aware client for the parking service.
///
/// Cheaply cloneable via `Arc<ParklyInner>`; clones share the session.
#[derive(Clone)]
pub struct Parkly {
    inner: Arc<ParklyInner>,
}

struct ParklyInner {
    config: ClientConfig,
    gateway: RequestGateway,
    store: Arc<SessionStore>,
    guard: Arc<SessionGuard>,
}

impl Parkly {
    /// Build a client whose session storage follows `config.storage`.
    pub fn new(config: ClientConfig) -> Result<Self, CoreError> {
        let storage: Arc<dyn SessionStorage> = match &config.storage {
            StorageConfig::Memory => Arc::new(MemoryStorage::new()),
            StorageConfig::Directory(dir) => Arc::new(FileStorage::new(dir.clone())),
        };
        Self::with_storage(config, storage)
    }

    /// Build a client around an explicit storage backend.
    ///
    /// Any persisted identity is restored, and its session cookie is put
    /// back into the transport's jar.
    pub fn with_storage(
        config: ClientConfig,
        storage: Arc<dyn SessionStorage>,
    ) -> Result<Self, CoreError> {
        let transport = TransportConfig::default()
            .with_timeout(config.timeout)
            .with_tls(config.tls.clone());

        let store = Arc::new(SessionStore::new(storage));
        let guard = Arc::new(SessionGuard::new(Arc::clone(&store)));
        let gateway = RequestGateway::new(config.base_url.clone(), transport)?
            .layer(Arc::clone(&guard) as Arc<dyn ResponseInspector>);

        if store.is_authenticated() {
            if let Some(cookie) = store.session_cookie() {
                gateway.restore_session_cookie(&cookie);
                debug!("restored session cookie");
            }
        }

        Ok(Self {
            inner: Arc::new(ParklyInner {
                config,
                gateway,
                store,
                guard,
            }),
        })
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    pub fn gateway(&self) -> &RequestGateway {
        &self.inner.gateway
    }

    pub fn store(&self) -> &Arc<SessionStore> {
        &self.inner.store
    }

    pub fn identity(&self) -> IdentitySnapshot {
        self.inner.store.identity()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.store.is_authenticated()
    }

    pub fn identity_stream(&self) -> IdentityStream {
        self.inner.store.identity_stream()
    }

    /// Navigation requests raised when the session is invalidated.
    pub fn subscribe_navigation(&self) -> broadcast::Receiver<Navigation> {
        self.inner.guard.subscribe()
    }

    // ── Users ────────────────────────────────────────────────────────

    /// `POST /api/users/register`
    pub async fn register(&self, registration: &Registration) -> ResultEnvelope<Value> {
        self.inner
            .gateway
            .register(registration)
            .await
            .map_err(|e| normalize(&e, fallback::REGISTER))
            .into()
    }

    /// Log in and store the resulting identity.
    ///
    /// A response whose `expiresAt` is already past is not stored: the
    /// guard has declared it dead on arrival.
    pub async fn login(&self, email: &str, password: &SecretString) -> ResultEnvelope<Identity> {
        self.try_login(email, password).await.into()
    }

    async fn try_login(&self, email: &str, password: &SecretString) -> Result<Identity, ErrorInfo> {
        let resp = self
            .inner
            .gateway
            .login(email, password)
            .await
            .map_err(|e| normalize(&e, fallback::LOGIN))?;

        let identity = Identity::from(resp);
        if identity.is_expired() {
            warn!(user = %identity.user_id(), "login returned an already expired session");
            return Err(ErrorInfo::session(fallback::SESSION_EXPIRED));
        }

        self.inner.store.set(identity.clone());
        if let Some(cookie) = self.inner.gateway.session_cookie() {
            self.inner.store.save_session_cookie(&cookie);
        }
        info!(user = %identity.user_id(), "logged in");
        Ok(identity)
    }

    /// Log out. Local state is cleared whatever the server answers; a
    /// server failure is still reported.
    pub async fn logout(&self) -> ResultEnvelope<Value> {
        let result = self.inner.gateway.logout().await;
        self.inner.store.clear();
        info!("logged out");
        result.map_err(|e| normalize(&e, fallback::LOGOUT)).into()
    }

    /// Fetch the user's vehicles, merged with their profile when
    /// `user_id` is given. A failed profile fetch aborts the operation.
    pub async fn get_user_data(&self, user_id: Option<&UserId>) -> ResultEnvelope<UserData> {
        self.try_get_user_data(user_id).await.into()
    }

    async fn try_get_user_data(&self, user_id: Option<&UserId>) -> Result<UserData, ErrorInfo> {
        let gateway = &self.inner.gateway;
        let profile = match user_id {
            Some(id) => Some(
                gateway
                    .get_user(id)
                    .await
                    .map_err(|e| normalize_fixed(&e, fallback::USER_DETAILS))?,
            ),
            None => None,
        };
        let cars = gateway
            .list_cars()
            .await
            .map_err(|e| normalize_fixed(&e, fallback::CARS))?;

        debug!(cars = cars.len(), profile = profile.is_some(), "user data fetched");
        Ok(merge_user_data(profile, &cars))
    }

    // ── Cars ─────────────────────────────────────────────────────────

    /// `POST /api/cars`, returning the created car in application shape.
    pub async fn create_car(&self, car: &NewCar) -> ResultEnvelope<Vehicle> {
        self.inner
            .gateway
            .create_car(car)
            .await
            .map(|record| map_vehicle(&record))
            .map_err(|e| normalize(&e, fallback::CREATE_CAR))
            .into()
    }

    /// `DELETE /api/cars/{id}`. The id is validated first.
    pub async fn delete_car(&self, car_id: impl Display) -> ResultEnvelope<Value> {
        let id = match positive_id(CommandField::CarId, car_id) {
            Ok(id) => id,
            Err(e) => return rejected(e.into()),
        };
        self.inner
            .gateway
            .delete_car(id)
            .await
            .map_err(|e| normalize(&e, fallback::DELETE_CAR))
            .into()
    }

    // ── Parking ──────────────────────────────────────────────────────

    /// `POST /api/parking/start`. Invalid ids never reach the network.
    pub async fn start_parking(
        &self,
        car_id: impl Display,
        parking_spot_id: impl Display,
    ) -> ResultEnvelope<ParkingSession> {
        let command = match validate_start(car_id, parking_spot_id) {
            Ok(command) => command,
            Err(e) => return rejected(e.into()),
        };
        self.inner
            .gateway
            .start_parking(&command)
            .await
            .map_err(|e| normalize(&e, fallback::START_PARKING))
            .into()
    }

    /// `POST /api/parking/end`. Invalid ids never reach the network.
    pub async fn stop_parking(&self, car_id: impl Display) -> ResultEnvelope<Value> {
        let command = match validate_stop(car_id) {
            Ok(command) => command,
            Err(e) => return rejected(e.into()),
        };
        self.inner
            .gateway
            .stop_parking(&command)
            .await
            .map_err(|e| normalize(&e, fallback::STOP_PARKING))
            .into()
    }
}

impl fmt::Debug for Parkly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parkly")
            .field("base_url", &self.inner.config.base_url.as_str())
            .field("store", &self.inner.store)
            .finish_non_exhaustive()
    }
}

fn rejected<T>(info: ErrorInfo) -> ResultEnvelope<T> {
    debug!(message = %info.message, "command rejected before sending");
    ResultEnvelope::Failure(info)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use url::Url;

    use super::*;
    use crate::error::ErrorKind;

    fn offline_client() -> Parkly {
        // Port 9 (discard) is never contacted: every call below is rejected
        // during validation.
        Parkly::new(ClientConfig::new(Url::parse("http://127.0.0.1:9").unwrap())).unwrap()
    }

    #[tokio::test]
    async fn invalid_parking_ids_short_circuit() {
        let client = offline_client();

        let env = client.start_parking("abc", "12").await;
        let err = env.error().unwrap();
        assert_eq!(err.message, "Invalid car identifier");
        assert_eq!(
            err.kind,
            ErrorKind::Validation {
                field: "carId".into()
            }
        );

        let env = client.start_parking(3, 0).await;
        assert_eq!(env.error().unwrap().message, "Invalid parking spot identifier");

        assert!(client.stop_parking("-1").await.error().unwrap().is_validation());
        assert!(client.delete_car("none").await.error().unwrap().is_validation());
    }

    #[test]
    fn fresh_client_is_signed_out() {
        let client = offline_client();
        assert!(!client.is_authenticated());
        assert!(client.identity().is_none());
    }
}
