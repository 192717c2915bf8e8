// Wire models for the parking service
//
// Request and response bodies exactly as they travel over HTTP. Response
// types use `#[serde(default)]` liberally and keep unknown fields in a
// flattened map: the service is loose about which fields it returns.

use std::fmt;
use std::num::NonZeroU64;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use serde_json::{Map, Value};

// ── Identifiers ──────────────────────────────────────────────────────

/// User identifier as issued by the service.
///
/// Numeric on the current backend; text ids are accepted so a change in
/// the backend's key type does not break session restore.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserId {
    Numeric(u64),
    Text(String),
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<u64> for UserId {
    fn from(n: u64) -> Self {
        Self::Numeric(n)
    }
}

// ── Users ────────────────────────────────────────────────────────────

/// A user record. Only `id` is interpreted; everything else is carried.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// Body of `POST /api/users/register`.
///
/// `email` and `password` are required by the service; any further
/// registration fields (names, phone, ...) travel in `fields`.
#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub email: String,
    #[serde(serialize_with = "expose_secret")]
    pub password: SecretString,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// Body of `POST /api/users/login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    #[serde(serialize_with = "expose_secret_ref")]
    pub password: &'a SecretString,
}

/// Response of `POST /api/users/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub user: UserRecord,
    #[serde(rename = "expiresAt", default, deserialize_with = "lenient_timestamp")]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ── Cars ─────────────────────────────────────────────────────────────

/// A vehicle as returned by `GET /api/cars` and `POST /api/cars`.
///
/// Only `id` is required. The other fields accept the loose shapes the
/// service emits (`null` flags, numbers sent as strings and the reverse).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarRecord {
    #[serde(deserialize_with = "lenient_id")]
    pub id: u64,
    #[serde(default, deserialize_with = "lenient_text")]
    pub brand: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub model: Option<String>,
    #[serde(default, deserialize_with = "lenient_i32")]
    pub year: Option<i32>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub license_plate: Option<String>,
    #[serde(default, deserialize_with = "lenient_flag")]
    pub is_parked: bool,
    /// Catch-all for fields the client does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body of `POST /api/cars`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCar {
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub license_plate: String,
}

// ── Parking ──────────────────────────────────────────────────────────

/// Body of `POST /api/parking/start`. Both ids are strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartParking {
    pub car_id: NonZeroU64,
    pub parking_spot_id: NonZeroU64,
}

/// Body of `POST /api/parking/end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StopParking {
    pub car_id: NonZeroU64,
}

/// A parking session record.
///
/// Every field is optional and loosely typed: a started session is never
/// rejected because of how the service spells a value. Times keep their
/// wire rendering, so epoch milliseconds become their decimal text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParkingSession {
    #[serde(deserialize_with = "lenient_u64")]
    pub id: Option<u64>,
    #[serde(deserialize_with = "lenient_u64")]
    pub car_id: Option<u64>,
    #[serde(deserialize_with = "lenient_u64")]
    pub parking_spot_id: Option<u64>,
    #[serde(deserialize_with = "lenient_text")]
    pub start_time: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub end_time: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ── Timestamps ───────────────────────────────────────────────────────

/// Interpret a JSON value as a point in time.
///
/// Accepts RFC 3339 strings, offset-less ISO date-times and bare dates
/// (both read as UTC, a bare date as midnight) and integer epoch
/// milliseconds. Anything else yields `None`: an unreadable
/// timestamp is never treated as "in the past".
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
                    .ok()
                    .map(|naive| naive.and_utc())
            })
            .or_else(|| {
                NaiveDate::parse_from_str(s, "%Y-%m-%d")
                    .ok()
                    .and_then(|date| date.and_hms_opt(0, 0, 0))
                    .map(|naive| naive.and_utc())
            }),
        Value::Number(n) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    }
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(parse_timestamp))
}

// ── Lenient scalars ──────────────────────────────────────────────────

/// A non-negative integer sent as a number or as numeric text.
fn as_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn lenient_id<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    as_u64(&value).ok_or_else(|| de::Error::custom(format!("invalid identifier: {value}")))
}

fn lenient_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(as_u64(&value))
}

fn lenient_i32<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match &value {
        Value::Number(n) => n.as_i64().and_then(|n| i32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

/// `null` and anything unrecognised read as `false`.
fn lenient_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match &value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n.abs() > f64::EPSILON),
        Value::String(s) => matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "1"),
        _ => false,
    })
}

fn expose_secret<S: Serializer>(secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn expose_secret_ref<S: Serializer>(
    secret: &&SecretString,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    expose_secret(secret, serializer)
}
