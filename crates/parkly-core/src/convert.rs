// ── Wire-to-domain conversions ──
//
// Bridges raw `parkly_api` records into `crate::model` types. Every
// function here is pure and total: missing fields fall back to defaults,
// unknown brands fall back to the default logo.

use parkly_api::{CarRecord, ParkingSession, UserRecord};

use crate::model::{UserData, Vehicle};

const LOGO_BASE: &str = "https://www.carlogos.org/car-logos";

/// Logo shown for cars without a brand or with an unlisted one.
pub const DEFAULT_LOGO: &str = "https://www.carlogos.org/car-logos/default-car-logo.png";

/// Profile keys owned by the aggregate; a profile may not shadow them.
const RESERVED_KEYS: [&str; 2] = ["cars", "activeParkings"];

// ── Logos ──────────────────────────────────────────────────────────

/// Map a brand name to the file stem of its logo.
fn logo_stem(brand: &str) -> Option<&'static str> {
    let stem = match brand {
        "toyota" => "toyota",
        "honda" => "honda",
        "ford" => "ford",
        "bmw" => "bmw",
        "audi" => "audi",
        "volkswagen" => "volkswagen",
        "mercedes" => "mercedes-benz",
        "hyundai" => "hyundai",
        "peugeot" => "peugeot",
        "opel" => "opel",
        "fiat" => "fiat",
        "skoda" => "skoda",
        "seat" => "seat",
        "renault" => "renault",
        "alfa-romeo" | "alfa romeo" => "alfa-romeo",
        "kia" => "kia",
        "landrover" => "landrover",
        "jeep" => "jeep",
        "mazda" => "mazda",
        "mitsubishi" => "mitsubishi",
        "nissan" => "nissan",
        "subaru" => "subaru",
        "tesla" => "tesla",
        "porsche" => "porsche",
        "volvo" => "volvo",
        "lexus" => "lexus",
        "jaguar" => "jaguar",
        "infiniti" => "infiniti",
        "cadillac" => "cadillac",
        "gmc" => "gmc",
        "dodge" => "dodge",
        "chrysler" => "chrysler",
        "ferrari" => "ferrari",
        "lamborghini" => "lamborghini",
        "mclaren" => "mclaren",
        "bugatti" => "bugatti",
        "rolls-royce" => "rolls-royce",
        "maserati" => "maserati",
        "mini" => "mini",
        "hummer" => "hummer",
        _ => return None,
    };
    Some(stem)
}

/// Logo URL for a brand, case-insensitively. Absent, blank or unknown
/// brands yield [`DEFAULT_LOGO`].
pub fn logo_for(brand: Option<&str>) -> String {
    brand
        .map(|b| b.trim().to_lowercase())
        .as_deref()
        .and_then(logo_stem)
        .map_or_else(
            || DEFAULT_LOGO.to_owned(),
            |stem| format!("{LOGO_BASE}/{stem}-logo.png"),
        )
}

// ── Vehicles ───────────────────────────────────────────────────────

/// Convert a wire car record into the application's vehicle shape.
pub fn map_vehicle(raw: &CarRecord) -> Vehicle {
    Vehicle {
        id: raw.id,
        brand: raw.brand.clone(),
        model: raw.model.clone(),
        year: raw.year,
        license_plate: raw.license_plate.clone(),
        is_own: true,
        color: "N/A".into(),
        is_parking: raw.is_parked,
        logo: logo_for(raw.brand.as_deref()),
        parking_spot: None,
    }
}

impl From<&CarRecord> for Vehicle {
    fn from(raw: &CarRecord) -> Self {
        map_vehicle(raw)
    }
}

// ── Aggregation ────────────────────────────────────────────────────

/// Merge an optional profile with mapped vehicles.
///
/// Active parkings are not listed by the service yet, so the aggregate
/// always carries an empty list.
pub fn merge_user_data(profile: Option<UserRecord>, cars: &[CarRecord]) -> UserData {
    let profile = profile.map(|mut record| {
        for key in RESERVED_KEYS {
            record.fields.remove(key);
        }
        record
    });

    UserData {
        profile,
        cars: cars.iter().map(map_vehicle).collect(),
        active_parkings: Vec::<ParkingSession>::new(),
    }
}
