//! Geographic validation for Mozambique coordinates and Txova service areas
//!
//! Copyright (c) 2025 Txova Team
//! Licensed under the Apache-2.0 license

use crate::validation::ValidationError;
use serde::{Deserialize, Serialize};

pub const MIN_LATITUDE: f64 = -90.0;
pub const MAX_LATITUDE: f64 = 90.0;
pub const MIN_LONGITUDE: f64 = -180.0;
pub const MAX_LONGITUDE: f64 = 180.0;

/// Mean earth radius used by [`haversine_km`]
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Axis-aligned latitude/longitude rectangle, bounds inclusive
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    pub const fn new(min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64) -> Self {
        Self {
            min_lat,
            max_lat,
            min_lon,
            max_lon,
        }
    }

    /// True if the point lies inside the box (edges included)
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        lat >= self.min_lat && lat <= self.max_lat && lon >= self.min_lon && lon <= self.max_lon
    }
}

/// Country bounding box
pub const MOZAMBIQUE_BOUNDS: BoundingBox = BoundingBox::new(-26.9, -10.3, 30.2, 41.0);

/// A named operating area
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ServiceArea {
    pub key: &'static str,
    pub name: &'static str,
    pub bounds: BoundingBox,
}

static SERVICE_AREAS: [ServiceArea; 3] = [
    ServiceArea {
        key: "beira",
        name: "Beira",
        bounds: BoundingBox::new(-19.9, -19.7, 34.8, 34.9),
    },
    ServiceArea {
        key: "maputo",
        name: "Maputo",
        bounds: BoundingBox::new(-26.1, -25.8, 32.3, 32.7),
    },
    ServiceArea {
        key: "matola",
        name: "Matola",
        bounds: BoundingBox::new(-26.0, -25.9, 32.3, 32.5),
    },
];

/// A latitude/longitude pair
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
}

impl Location {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Validated constructor; rejects coordinates outside global ranges
    pub fn try_new(lat: f64, lon: f64) -> Result<Self, ValidationError> {
        validate_coordinates(lat, lon)?;
        Ok(Self { lat, lon })
    }

    /// The zero location (0, 0) is treated as "not set"
    pub fn is_zero(&self) -> bool {
        self.lat == 0.0 && self.lon == 0.0
    }
}

/// Check latitude and longitude against global ranges
pub fn validate_coordinates(lat: f64, lon: f64) -> Result<(), ValidationError> {
    // Range checks are written so NaN fails them.
    if !(MIN_LATITUDE..=MAX_LATITUDE).contains(&lat) {
        return Err(ValidationError::out_of_range("latitude", MIN_LATITUDE, MAX_LATITUDE)
            .with_optional_value(serde_json::Number::from_f64(lat).map(Into::into)));
    }
    if !(MIN_LONGITUDE..=MAX_LONGITUDE).contains(&lon) {
        return Err(ValidationError::out_of_range("longitude", MIN_LONGITUDE, MAX_LONGITUDE)
            .with_optional_value(serde_json::Number::from_f64(lon).map(Into::into)));
    }
    Ok(())
}

/// Check that the coordinates are inside the country
pub fn validate_in_mozambique(lat: f64, lon: f64) -> Result<(), ValidationError> {
    validate_in_bounds(lat, lon, &MOZAMBIQUE_BOUNDS)
}

/// Check that the coordinates are valid and inside `bounds`
pub fn validate_in_bounds(lat: f64, lon: f64, bounds: &BoundingBox) -> Result<(), ValidationError> {
    validate_coordinates(lat, lon)?;
    if !bounds.contains(lat, lon) {
        return Err(ValidationError::outside_service_area_at("location", lat, lon));
    }
    Ok(())
}

pub fn is_in_mozambique(lat: f64, lon: f64) -> bool {
    validate_in_mozambique(lat, lon).is_ok()
}

/// Check that the coordinates fall inside the named service area
pub fn validate_service_area(lat: f64, lon: f64, area: &str) -> Result<(), ValidationError> {
    validate_coordinates(lat, lon)?;

    let Some(service_area) = service_area(area) else {
        return Err(ValidationError::invalid_option("area", &service_area_names()).with_value(area));
    };

    if !service_area.bounds.contains(lat, lon) {
        return Err(ValidationError::outside_service_area_at("location", lat, lon));
    }
    Ok(())
}

/// Check that the coordinates fall inside any active service area
pub fn validate_any_service_area(lat: f64, lon: f64) -> Result<(), ValidationError> {
    validate_coordinates(lat, lon)?;
    if find_service_area(lat, lon).is_none() {
        return Err(ValidationError::outside_service_area_at("location", lat, lon));
    }
    Ok(())
}

pub fn is_in_service_area(lat: f64, lon: f64) -> bool {
    validate_any_service_area(lat, lon).is_ok()
}

/// Key of the first service area containing the point, if any
pub fn find_service_area(lat: f64, lon: f64) -> Option<&'static str> {
    SERVICE_AREAS
        .iter()
        .find(|area| area.bounds.contains(lat, lon))
        .map(|area| area.key)
}

/// Look up a service area by key
pub fn service_area(key: &str) -> Option<&'static ServiceArea> {
    SERVICE_AREAS.iter().find(|area| area.key == key)
}

/// Keys of all service areas, sorted
pub fn service_area_names() -> Vec<&'static str> {
    SERVICE_AREAS.iter().map(|area| area.key).collect()
}

/// Great-circle distance between two points in kilometres
pub fn haversine_km(a: Location, b: Location) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

/// Distance in kilometres after validating both points
pub fn calculate_distance(
    lat1: f64,
    lon1: f64,
    lat2: f64,
    lon2: f64,
) -> Result<f64, ValidationError> {
    let from = Location::try_new(lat1, lon1)?;
    let to = Location::try_new(lat2, lon2)?;
    Ok(haversine_km(from, to))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ErrorCode;

    #[test]
    fn test_maputo_inside_country() {
        assert!(is_in_mozambique(-25.9692, 32.5732));
        assert!(is_in_mozambique(-19.8436, 34.8389));
    }

    #[test]
    fn test_outside_country() {
        let err = validate_in_mozambique(0.0, 0.0).unwrap_err();
        assert_eq!(err.code, ErrorCode::OutsideServiceArea);
        assert_eq!(err.field, "location");

        // Johannesburg
        assert!(!is_in_mozambique(-26.2041, 28.0473));
    }

    #[test]
    fn test_global_range() {
        let err = validate_coordinates(91.0, 0.0).unwrap_err();
        assert_eq!(err.field, "latitude");
        assert_eq!(err.code, ErrorCode::OutOfRange);

        let err = validate_coordinates(0.0, -181.0).unwrap_err();
        assert_eq!(err.field, "longitude");

        assert!(validate_coordinates(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_bounds_edges_inclusive() {
        assert!(MOZAMBIQUE_BOUNDS.contains(-26.9, 30.2));
        assert!(MOZAMBIQUE_BOUNDS.contains(-10.3, 41.0));
        assert!(!MOZAMBIQUE_BOUNDS.contains(-10.29, 35.0));
    }

    #[test]
    fn test_service_areas() {
        assert!(validate_service_area(-25.95, 32.58, "maputo").is_ok());
        assert!(validate_service_area(-19.8, 34.85, "beira").is_ok());

        let err = validate_service_area(-19.8, 34.85, "maputo").unwrap_err();
        assert_eq!(err.code, ErrorCode::OutsideServiceArea);

        let err = validate_service_area(-25.95, 32.58, "nampula").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidOption);
        assert_eq!(err.message, "area must be one of: beira, maputo, matola");
    }

    #[test]
    fn test_find_service_area() {
        assert_eq!(find_service_area(-19.8, 34.85), Some("beira"));
        assert_eq!(find_service_area(-15.0, 40.0), None);
        assert!(is_in_service_area(-25.95, 32.58));
        assert_eq!(service_area("matola").map(|a| a.name), Some("Matola"));
    }

    #[test]
    fn test_haversine_maputo_to_beira() {
        let maputo = Location::new(-25.9692, 32.5732);
        let beira = Location::new(-19.8436, 34.8389);
        let distance = haversine_km(maputo, beira);
        assert!((distance - 720.0).abs() < 15.0, "distance was {}", distance);
        assert_eq!(haversine_km(maputo, maputo), 0.0);
    }

    #[test]
    fn test_calculate_distance_rejects_invalid_points() {
        assert!(calculate_distance(100.0, 0.0, 0.0, 0.0).is_err());
        assert!(calculate_distance(-25.0, 32.0, -25.1, 32.1).is_ok());
    }
}
