// ── Session state ──
//
// The identity store, its persistence backends and the guard that
// invalidates it from gateway responses.

pub mod guard;
pub mod storage;
pub mod store;

pub use guard::{InvalidationReason, Navigation, SessionGuard, SessionOutcome};
pub use storage::{FileStorage, MemoryStorage, SessionStorage};
pub use store::{SESSION_COOKIE_KEY, SessionStore, USER_KEY};
