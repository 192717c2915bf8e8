// parkly-core: Session-aware layer between parkly-api and hosts (CLI, UI).

pub mod client;
pub mod config;
pub mod convert;
pub mod envelope;
pub mod error;
pub mod model;
pub mod normalize;
pub mod session;
pub mod stream;
pub mod validate;

// ── Primary re-exports ──────────────────────────────────────────────
pub use client::Parkly;
pub use config::{ClientConfig, StorageConfig};
pub use envelope::ResultEnvelope;
pub use error::{CommandField, CoreError, ErrorInfo, ErrorKind, StorageError, ValidationError};
pub use model::{Identity, UserData, Vehicle};
pub use session::{
    FileStorage, InvalidationReason, MemoryStorage, Navigation, SessionGuard, SessionOutcome,
    SessionStorage, SessionStore,
};
pub use stream::{AuthenticatedStream, IdentityStream, IdentityWatchStream};

// Wire types hosts need to build requests.
pub use parkly_api::{NewCar, ParkingSession, Registration, TlsMode, UserId, UserRecord};
