//! Mozambique license plate and vehicle year validation
//!
//! Two plate layouts are in circulation:
//! - standard `AAA-NNN-PP`: three letters, three digits, province suffix
//! - old `PP-NN-NN`: province prefix followed by four digits
//!
//! Input is case-insensitive and dashes or spaces between groups are optional.
//!
//! Copyright (c) 2025 Txova Team
//! Licensed under the Apache-2.0 license

use crate::validation::ValidationError;
use chrono::Datelike;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Oldest model year accepted onto the platform
pub const MIN_VEHICLE_YEAR: i32 = 2010;

const PLATE_EXPECTED: &str = "AAA-NNN-LL or LL-NN-NN";
const PROVINCE_EXPECTED: &str = "valid Mozambique province code";

static STANDARD_PLATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Z]{3})([0-9]{3})([A-Z]{2})$").expect("static regex"));
static OLD_PLATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Z]{2})([0-9]{2})([0-9]{2})$").expect("static regex"));

/// Why a plate failed to parse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PlateError {
    #[error("invalid license plate format")]
    InvalidFormat,
    #[error("invalid province code")]
    InvalidProvince,
}

/// Province (or city) code carried by every plate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Province {
    MaputoCity,
    MaputoProvince,
    Gaza,
    Inhambane,
    Sofala,
    Manica,
    Tete,
    Zambezia,
    Nampula,
    CaboDelgado,
    Niassa,
}

impl Province {
    pub const ALL: [Province; 11] = [
        Province::MaputoCity,
        Province::MaputoProvince,
        Province::Gaza,
        Province::Inhambane,
        Province::Sofala,
        Province::Manica,
        Province::Tete,
        Province::Zambezia,
        Province::Nampula,
        Province::CaboDelgado,
        Province::Niassa,
    ];

    /// Two-letter plate code
    pub fn code(&self) -> &'static str {
        match self {
            Province::MaputoCity => "MC",
            Province::MaputoProvince => "MP",
            Province::Gaza => "GZ",
            Province::Inhambane => "IB",
            Province::Sofala => "SF",
            Province::Manica => "MN",
            Province::Tete => "TT",
            Province::Zambezia => "ZB",
            Province::Nampula => "NP",
            Province::CaboDelgado => "CA",
            Province::Niassa => "NS",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Province::MaputoCity => "Maputo City",
            Province::MaputoProvince => "Maputo Province",
            Province::Gaza => "Gaza",
            Province::Inhambane => "Inhambane",
            Province::Sofala => "Sofala",
            Province::Manica => "Manica",
            Province::Tete => "Tete",
            Province::Zambezia => "Zambezia",
            Province::Nampula => "Nampula",
            Province::CaboDelgado => "Cabo Delgado",
            Province::Niassa => "Niassa",
        }
    }
}

impl FromStr for Province {
    type Err = PlateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Province::ALL
            .iter()
            .copied()
            .find(|p| p.code() == s)
            .ok_or(PlateError::InvalidProvince)
    }
}

impl fmt::Display for Province {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Plate layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlateFormat {
    Standard,
    Old,
}

/// A parsed plate in canonical upper-case form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LicensePlate {
    groups: [String; 3],
    province: Province,
    format: PlateFormat,
}

impl LicensePlate {
    pub fn province(&self) -> Province {
        self.province
    }

    pub fn format(&self) -> PlateFormat {
        self.format
    }

    pub fn is_standard_format(&self) -> bool {
        self.format == PlateFormat::Standard
    }

    pub fn is_old_format(&self) -> bool {
        self.format == PlateFormat::Old
    }
}

impl fmt::Display for LicensePlate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.groups[0], self.groups[1], self.groups[2])
    }
}

impl FromStr for LicensePlate {
    type Err = PlateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_plate(s)
    }
}

/// Parse a plate in either layout
pub fn parse_plate(input: &str) -> Result<LicensePlate, PlateError> {
    let compact: String = input
        .chars()
        .filter(|c| *c != '-' && !c.is_whitespace())
        .collect::<String>()
        .to_ascii_uppercase();

    if let Some(caps) = STANDARD_PLATE.captures(&compact) {
        let province = caps[3].parse::<Province>()?;
        return Ok(LicensePlate {
            groups: [caps[1].to_string(), caps[2].to_string(), caps[3].to_string()],
            province,
            format: PlateFormat::Standard,
        });
    }

    if let Some(caps) = OLD_PLATE.captures(&compact) {
        let province = caps[1].parse::<Province>()?;
        return Ok(LicensePlate {
            groups: [caps[1].to_string(), caps[2].to_string(), caps[3].to_string()],
            province,
            format: PlateFormat::Old,
        });
    }

    Err(PlateError::InvalidFormat)
}

fn plate_error(input: &str, err: PlateError) -> ValidationError {
    match err {
        PlateError::InvalidProvince => ValidationError::invalid_format("plate", PROVINCE_EXPECTED),
        PlateError::InvalidFormat => {
            ValidationError::invalid_format("plate", PLATE_EXPECTED).with_value(input)
        }
    }
}

/// Validate a license plate in either layout
pub fn validate_plate(input: &str) -> Result<(), ValidationError> {
    parse_plate(input).map(|_| ()).map_err(|e| plate_error(input, e))
}

/// Canonical dashed upper-case form of a plate
pub fn normalize_plate(input: &str) -> Result<String, ValidationError> {
    parse_plate(input)
        .map(|plate| plate.to_string())
        .map_err(|e| plate_error(input, e))
}

/// Province code of a valid plate
pub fn province_code(input: &str) -> Option<&'static str> {
    parse_plate(input).ok().map(|p| p.province().code())
}

/// Province name of a valid plate
pub fn province_name(input: &str) -> Option<&'static str> {
    parse_plate(input).ok().map(|p| p.province().name())
}

pub fn is_standard_format(input: &str) -> bool {
    parse_plate(input).map(|p| p.is_standard_format()).unwrap_or(false)
}

pub fn is_old_format(input: &str) -> bool {
    parse_plate(input).map(|p| p.is_old_format()).unwrap_or(false)
}

pub fn is_valid_plate(input: &str) -> bool {
    parse_plate(input).is_ok()
}

/// Current calendar year in local time
pub fn current_year() -> i32 {
    chrono::Local::now().year()
}

/// Validate a model year against `MIN_VEHICLE_YEAR..=current + 1`
pub fn validate_year(year: i32) -> Result<(), ValidationError> {
    validate_year_at(year, current_year())
}

/// Like [`validate_year`] with an explicit current year
pub fn validate_year_at(year: i32, current_year: i32) -> Result<(), ValidationError> {
    validate_year_between(year, MIN_VEHICLE_YEAR, current_year)
}

/// Validate a model year against `min_year..=current_year + 1`
pub fn validate_year_between(
    year: i32,
    min_year: i32,
    current_year: i32,
) -> Result<(), ValidationError> {
    let max_year = current_year.saturating_add(1);
    if year < min_year || year > max_year {
        return Err(ValidationError::out_of_range("year", min_year, max_year).with_value(year));
    }
    Ok(())
}

pub fn is_valid_year(year: i32) -> bool {
    validate_year(year).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ErrorCode;
    use serde_json::json;

    #[test]
    fn test_standard_plates() {
        for input in ["AAA-123-MC", "aaa-123-mc", "AAA123MC", "AAA 123 MC", "Aaa-123-Mc"] {
            assert_eq!(normalize_plate(input).unwrap(), "AAA-123-MC", "input {:?}", input);
            assert!(is_standard_format(input));
        }
    }

    #[test]
    fn test_old_plates() {
        for input in ["MC-12-34", "mc-12-34", "MC1234", "MC 12 34"] {
            assert_eq!(normalize_plate(input).unwrap(), "MC-12-34", "input {:?}", input);
            assert!(is_old_format(input));
        }
    }

    #[test]
    fn test_every_province_accepted() {
        for province in Province::ALL {
            let plate = format!("ABC-123-{}", province.code());
            assert!(is_valid_plate(&plate), "{}", plate);
            assert_eq!(province_code(&plate), Some(province.code()));
        }
    }

    #[test]
    fn test_invalid_province() {
        assert_eq!(parse_plate("AAA-123-XX"), Err(PlateError::InvalidProvince));
        let err = validate_plate("AAA-123-XX").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidFormat);
        assert_eq!(
            err.message,
            "plate has invalid format, expected valid Mozambique province code"
        );
        assert!(err.value.is_none());
    }

    #[test]
    fn test_invalid_format_carries_value() {
        for input in ["", "AA-12", "invalid", "12345678"] {
            let err = validate_plate(input).unwrap_err();
            assert_eq!(err.field, "plate");
            assert_eq!(err.value, Some(json!(input)));
        }
    }

    #[test]
    fn test_province_names() {
        assert_eq!(province_name("AAA-123-MP"), Some("Maputo Province"));
        assert_eq!(province_name("GZ-99-01"), Some("Gaza"));
        assert_eq!(province_name("invalid"), None);
    }

    #[test]
    fn test_year_range() {
        assert!(validate_year_at(2010, 2026).is_ok());
        assert!(validate_year_at(2027, 2026).is_ok());
        assert!(validate_year_at(2028, 2026).is_err());

        let err = validate_year_at(2009, 2026).unwrap_err();
        assert_eq!(err.code, ErrorCode::OutOfRange);
        assert_eq!(err.message, "year must be between 2010 and 2027");
        assert_eq!(err.value, Some(json!(2009)));

        assert!(is_valid_year(current_year()));
        assert!(!is_valid_year(0));
    }
}
