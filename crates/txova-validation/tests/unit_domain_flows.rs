//! End-to-end checks across the leaf validators
//!
//! Each module groups the calls a single API handler would make.

use pretty_assertions::assert_eq;
use txova_validation::sanitize::Sanitizer;
use txova_validation::{
    document, geo, phone, rating, ride, vehicle, ErrorCode, Location, ValidationErrors,
};

#[cfg(test)]
mod driver_onboarding {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_clean_and_validate_profile() {
        let name = Sanitizer::name().apply("  <b>joão</b>   DA silva ");
        assert_eq!(name, "João Da Silva");

        let email = Sanitizer::email().apply("  Joao@Example.COM ");
        assert_eq!(email, "joao@example.com");

        let digits = Sanitizer::phone().apply("+258 (84) 123-4567");
        assert_eq!(phone::normalize(&digits).unwrap(), "+258841234567");
        assert_eq!(phone::operator(&digits), Some(phone::Operator::Vodacom));
    }

    #[test]
    fn test_vehicle_checks() {
        assert_eq!(vehicle::normalize_plate("aaa 123 mp").unwrap(), "AAA-123-MP");
        assert_eq!(vehicle::province_name("AAA-123-MP"), Some("Maputo Province"));
        assert!(vehicle::validate_year_at(2020, 2025).is_ok());

        let err = vehicle::validate_year_at(2027, 2025).unwrap_err();
        assert_eq!(err.code, ErrorCode::OutOfRange);
        assert_eq!(err.message, "year must be between 2010 and 2026");
    }

    #[test]
    fn test_document_upload() {
        assert!(document::validate_format("JPG", "profile_photo").is_ok());
        assert!(document::validate_mime_type("image/jpeg", ".jpg").is_ok());
        assert!(document::validate_image(800, 600, 1_000_000, "profile_photo").is_ok());

        let err = document::validate_format("pdf", "vehicle_photo").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidOption);

        let err = document::validate_file_size(3 * 1024 * 1024, "profile_photo").unwrap_err();
        assert_eq!(err.field, "file_size");

        let err = document::validate_doc_type("passport").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidOption);
        assert!(err.message.contains("driver_license"));
    }

    #[test]
    fn test_collecting_errors_from_several_checks() {
        let errors: ValidationErrors = [
            vehicle::validate_plate("INVALID"),
            vehicle::validate_year_at(2005, 2025),
            document::validate_doc_type("driver_license"),
        ]
        .into_iter()
        .filter_map(Result::err)
        .collect();

        assert_eq!(errors.fields(), vec!["plate", "year"]);
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json[0]["code"], "INVALID_FORMAT");
        assert_eq!(json[1]["value"], 2005);
    }
}

#[cfg(test)]
mod ride_booking {
    use super::*;
    use pretty_assertions::assert_eq;

    const MAPUTO: Location = Location { lat: -25.95, lon: 32.58 };
    const BAIXA: Location = Location { lat: -25.9692, lon: 32.5732 };

    #[test]
    fn test_pickup_in_service_area() {
        assert!(geo::validate_in_mozambique(MAPUTO.lat, MAPUTO.lon).is_ok());
        assert_eq!(geo::find_service_area(MAPUTO.lat, MAPUTO.lon), Some("maputo"));

        let err = geo::validate_service_area(MAPUTO.lat, MAPUTO.lon, "beira").unwrap_err();
        assert_eq!(err.code, ErrorCode::OutsideServiceArea);
        assert_eq!(err.field, "location");
    }

    #[test]
    fn test_trip_distance_and_fare() {
        assert!(ride::validate_pickup_dropoff_locations(MAPUTO, BAIXA).is_ok());

        let km = geo::calculate_distance(MAPUTO.lat, MAPUTO.lon, BAIXA.lat, BAIXA.lon).unwrap();
        assert!(km > 1.0 && km < 5.0, "distance {km}");
        assert!(ride::validate_distance(km).is_ok());

        let fare = ride::estimate_fare(10.0, 5_000, 1_500);
        assert_eq!(fare, 20_000);
        assert!(ride::validate_fare(fare).is_ok());
    }

    #[test]
    fn test_trip_rejections() {
        let err = ride::validate_pickup_dropoff_locations(MAPUTO, MAPUTO).unwrap_err();
        assert_eq!(err.field, "pickup_dropoff");

        let err = ride::validate_pickup_dropoff_locations(Location::default(), BAIXA).unwrap_err();
        assert_eq!(err.code, ErrorCode::Required);

        let err = ride::validate_pickup_dropoff(95.0, 32.0, BAIXA.lat, BAIXA.lon).unwrap_err();
        assert_eq!(err.field, "pickup");
        assert_eq!(err.code, ErrorCode::InvalidFormat);

        assert_eq!(ride::validate_fare(100).unwrap_err().code, ErrorCode::OutOfRange);
    }

    #[test]
    fn test_pin_confirmation() {
        assert!(ride::validate_pin("7392").is_ok());
        for pin in ["1234", "9876", "5555", "12a4", "123"] {
            let err = ride::validate_pin(pin).unwrap_err();
            assert_eq!(err.field, "pin", "{pin}");
        }
    }
}

#[cfg(test)]
mod trip_review {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_review_pipeline() {
        assert!(rating::validate_rating(4).is_ok());

        let result = rating::process_review("  Great   <i>driver</i>, very polite ").unwrap();
        assert_eq!(result.text, "Great driver, very polite");
        assert!(!result.requires_review);
        assert!(result.sanitized_length < result.original_length);
    }

    #[test]
    fn test_review_flagged_for_moderation() {
        let result = rating::process_review("que merda de viagem").unwrap();
        assert!(result.has_profanity);
        assert!(result.requires_review);
    }

    #[test]
    fn test_review_too_long_after_sanitizing() {
        let long = "a".repeat(rating::MAX_REVIEW_LENGTH + 1);
        let err = rating::process_review(&long).unwrap_err();
        assert_eq!(err.code, ErrorCode::TooLong);

        let padded = format!("<p>{}</p>", "a".repeat(rating::MAX_REVIEW_LENGTH));
        assert!(rating::process_review(&padded).is_ok());
    }
}
