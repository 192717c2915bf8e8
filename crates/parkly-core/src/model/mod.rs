// ── Application domain model ──
//
// Shapes the rest of the application depends on. Wire records from
// `parkly_api` are converted into these by `crate::convert`.

pub mod identity;
pub mod user_data;
pub mod vehicle;

pub use identity::Identity;
pub use user_data::UserData;
pub use vehicle::Vehicle;
