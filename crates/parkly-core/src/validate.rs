// ── Parking command validation ──
//
// Identifiers arrive as free text (form fields, CLI arguments) and are
// coerced the lenient way: leading whitespace and an optional sign are
// skipped, then the leading run of digits is read ("12abc" -> 12,
// "3.7" -> 3). Anything without digits, or not strictly positive, is
// rejected before a request is built.

use std::fmt::Display;
use std::num::NonZeroU64;

use parkly_api::{StartParking, StopParking};

use crate::error::{CommandField, ValidationError};

/// Coerce `input` into a strictly positive identifier for `field`.
pub fn positive_id(field: CommandField, input: impl Display) -> Result<NonZeroU64, ValidationError> {
    let text = input.to_string();
    leading_integer(&text)
        .and_then(|n| u64::try_from(n).ok())
        .and_then(NonZeroU64::new)
        .ok_or(ValidationError { field, input: text })
}

/// Validate a start-parking command. `carId` is checked first.
pub fn validate_start(
    car_id: impl Display,
    parking_spot_id: impl Display,
) -> Result<StartParking, ValidationError> {
    Ok(StartParking {
        car_id: positive_id(CommandField::CarId, car_id)?,
        parking_spot_id: positive_id(CommandField::ParkingSpotId, parking_spot_id)?,
    })
}

pub fn validate_stop(car_id: impl Display) -> Result<StopParking, ValidationError> {
    Ok(StopParking {
        car_id: positive_id(CommandField::CarId, car_id)?,
    })
}

/// Read the signed leading integer of `text`, if it has one.
/// Values that do not fit in an `i128` are treated as unreadable.
fn leading_integer(text: &str) -> Option<i128> {
    let trimmed = text.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let magnitude: i128 = rest[..end].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn numeric_text_is_coerced() {
        let cmd = validate_start("3", "12").unwrap();
        assert_eq!(cmd.car_id.get(), 3);
        assert_eq!(cmd.parking_spot_id.get(), 12);
    }

    #[test]
    fn leading_digits_win() {
        assert_eq!(positive_id(CommandField::CarId, "12abc").unwrap().get(), 12);
        assert_eq!(positive_id(CommandField::CarId, "3.7").unwrap().get(), 3);
        assert_eq!(positive_id(CommandField::CarId, "  +8").unwrap().get(), 8);
        assert_eq!(positive_id(CommandField::CarId, 42_u64).unwrap().get(), 42);
    }

    #[test]
    fn non_positive_and_non_numeric_are_rejected() {
        for bad in ["0", "-4", "-0", "abc", "", "  ", "-", "x12", "99999999999999999999999"] {
            let err = positive_id(CommandField::CarId, bad).unwrap_err();
            assert_eq!(err.field, CommandField::CarId, "input {bad:?}");
            assert_eq!(err.input, bad);
        }
    }

    #[test]
    fn start_reports_the_offending_field() {
        assert_eq!(
            validate_start("abc", "12").unwrap_err().field,
            CommandField::CarId
        );
        assert_eq!(
            validate_start("3", "0").unwrap_err().field,
            CommandField::ParkingSpotId
        );
        assert_eq!(
            validate_start(-1, "abc").unwrap_err().field,
            CommandField::CarId
        );
    }

    #[test]
    fn stop_validates_car_id() {
        assert_eq!(validate_stop("5").unwrap().car_id.get(), 5);
        assert!(validate_stop("zero").is_err());
    }
}
