// ── Vehicle ──

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A vehicle in the shape the application renders.
///
/// Built from the wire record by [`crate::convert::map_vehicle`]. `is_own`
/// is always `true` and `color` is always `"N/A"`: the service only lists
/// the caller's own cars and does not track colour. `parking_spot` is
/// serialized as `null` until a spot is assigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: u64,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub license_plate: Option<String>,
    pub is_own: bool,
    pub color: String,
    pub is_parking: bool,
    pub logo: String,
    pub parking_spot: Option<Value>,
}
