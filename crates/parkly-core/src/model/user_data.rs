// ── Aggregated user data ──

use parkly_api::{ParkingSession, UserRecord};
use serde::Serialize;

use super::Vehicle;

/// Profile fields merged with the user's vehicles and active parkings.
///
/// Serializes flat: `{ ...profile, "cars": [...], "activeParkings": [] }`.
/// Profile keys that collide with `cars` or `activeParkings` are removed
/// when the aggregate is built.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    #[serde(flatten)]
    pub profile: Option<UserRecord>,
    pub cars: Vec<Vehicle>,
    pub active_parkings: Vec<ParkingSession>,
}

impl UserData {
    pub fn parked_count(&self) -> usize {
        self.cars.iter().filter(|c| c.is_parking).count()
    }
}
