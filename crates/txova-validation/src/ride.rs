//! Ride validation: verification PIN, distance, fare and pickup/dropoff spacing
//!
//! Copyright (c) 2025 Txova Team
//! Licensed under the Apache-2.0 license

use crate::geo::{self, Location};
use crate::validation::{ErrorCode, ValidationError};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const MIN_DISTANCE_KM: f64 = 0.5;
pub const MAX_DISTANCE_KM: f64 = 200.0;

/// Fare bounds in centavos (50 MZN to 50 000 MZN)
pub const MIN_FARE_CENTAVOS: i64 = 5_000;
pub const MAX_FARE_CENTAVOS: i64 = 5_000_000;

/// Pickup and dropoff must be at least this far apart
pub const MIN_PICKUP_DROPOFF_SEPARATION_KM: f64 = 0.1;

pub const PIN_LENGTH: usize = 4;
pub const PIN_EXPECTED: &str = "4-digit PIN (no sequential or repeated)";

/// Why a PIN was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PinError {
    #[error("PIN must be exactly 4 digits")]
    InvalidFormat,
    #[error("PIN must not be a sequential run")]
    Sequential,
    #[error("PIN must not repeat a single digit")]
    Repeated,
}

/// A ride verification PIN that passed the strength checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pin([u8; PIN_LENGTH]);

impl Pin {
    pub fn digits(&self) -> [u8; PIN_LENGTH] {
        self.0
    }
}

impl fmt::Display for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for d in self.0 {
            write!(f, "{}", d)?;
        }
        Ok(())
    }
}

impl FromStr for Pin {
    type Err = PinError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_pin(s)
    }
}

/// Parse a PIN, rejecting repeated digits and ascending or descending runs
pub fn parse_pin(input: &str) -> Result<Pin, PinError> {
    let bytes = input.as_bytes();
    if bytes.len() != PIN_LENGTH || !bytes.iter().all(u8::is_ascii_digit) {
        return Err(PinError::InvalidFormat);
    }

    let mut digits = [0u8; PIN_LENGTH];
    for (slot, b) in digits.iter_mut().zip(bytes) {
        *slot = b - b'0';
    }

    if digits.iter().all(|d| *d == digits[0]) {
        return Err(PinError::Repeated);
    }

    let ascending = digits.windows(2).all(|w| w[1] == w[0] + 1);
    let descending = digits.windows(2).all(|w| w[0] == w[1] + 1);
    if ascending || descending {
        return Err(PinError::Sequential);
    }

    Ok(Pin(digits))
}

pub fn validate_pin(input: &str) -> Result<(), ValidationError> {
    parse_pin(input)
        .map(|_| ())
        .map_err(|_| ValidationError::invalid_format("pin", PIN_EXPECTED).with_value(input))
}

pub fn is_valid_pin(input: &str) -> bool {
    parse_pin(input).is_ok()
}

/// Validate a trip distance in kilometres
pub fn validate_distance(km: f64) -> Result<(), ValidationError> {
    if !(MIN_DISTANCE_KM..=MAX_DISTANCE_KM).contains(&km) {
        return Err(ValidationError::out_of_range("distance", MIN_DISTANCE_KM, MAX_DISTANCE_KM)
            .with_optional_value(serde_json::Number::from_f64(km).map(Into::into)));
    }
    Ok(())
}

pub fn is_valid_distance(km: f64) -> bool {
    validate_distance(km).is_ok()
}

/// Validate a fare in centavos
pub fn validate_fare(centavos: i64) -> Result<(), ValidationError> {
    if !(MIN_FARE_CENTAVOS..=MAX_FARE_CENTAVOS).contains(&centavos) {
        return Err(
            ValidationError::out_of_range("fare", MIN_FARE_CENTAVOS, MAX_FARE_CENTAVOS)
                .with_value(centavos),
        );
    }
    Ok(())
}

pub fn is_valid_fare(centavos: i64) -> bool {
    validate_fare(centavos).is_ok()
}

fn too_close() -> ValidationError {
    ValidationError::new(
        "pickup_dropoff",
        ErrorCode::OutOfRange,
        "pickup and dropoff must be at least 100 meters apart",
    )
}

/// Validate raw pickup and dropoff coordinates and their separation
pub fn validate_pickup_dropoff(
    pickup_lat: f64,
    pickup_lon: f64,
    dropoff_lat: f64,
    dropoff_lon: f64,
) -> Result<(), ValidationError> {
    let pickup = Location::try_new(pickup_lat, pickup_lon).map_err(|e| {
        ValidationError::invalid_format("pickup", "valid coordinates").with_value(e.message)
    })?;
    let dropoff = Location::try_new(dropoff_lat, dropoff_lon).map_err(|e| {
        ValidationError::invalid_format("dropoff", "valid coordinates").with_value(e.message)
    })?;

    if geo::haversine_km(pickup, dropoff) < MIN_PICKUP_DROPOFF_SEPARATION_KM {
        return Err(too_close());
    }
    Ok(())
}

/// Validate pickup and dropoff locations; the zero location counts as missing
pub fn validate_pickup_dropoff_locations(
    pickup: Location,
    dropoff: Location,
) -> Result<(), ValidationError> {
    if pickup.is_zero() {
        return Err(ValidationError::required("pickup"));
    }
    if dropoff.is_zero() {
        return Err(ValidationError::required("dropoff"));
    }
    if geo::haversine_km(pickup, dropoff) < MIN_PICKUP_DROPOFF_SEPARATION_KM {
        return Err(too_close());
    }
    Ok(())
}

/// Rough fare estimate in centavos; the per-km part is truncated
///
/// Saturates at the `i64` bounds instead of overflowing.
pub fn estimate_fare(distance_km: f64, base_centavos: i64, per_km_centavos: i64) -> i64 {
    base_centavos.saturating_add((distance_km * per_km_centavos as f64) as i64)
}
