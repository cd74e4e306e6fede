//! Struct validation through the global validator
//!
//! Covers required and optional fields, every Txova rule, nested records
//! and wire-name reporting.

use once_cell::sync::Lazy;
use pretty_assertions::assert_eq;
use txova_validation::structval::{self, FieldSpec, Schema, ToFieldValue, Validate, Validator};
use txova_validation::{ErrorCode, Location, ValidationErrors};

#[derive(Default)]
struct UserRegistration {
    name: String,
    email: String,
    phone: String,
    password: String,
}

impl Validate for UserRegistration {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: Lazy<Schema<UserRegistration>> = Lazy::new(|| {
            Validator::schema::<UserRegistration>()
                .field(
                    FieldSpec::new("Name", "required,min=2,max=100", |u: &UserRegistration| {
                        u.name.to_field_value()
                    })
                    .wire("name"),
                )
                .field(
                    FieldSpec::new("Email", "required,email", |u: &UserRegistration| {
                        u.email.to_field_value()
                    })
                    .wire("email"),
                )
                .field(
                    FieldSpec::new("Phone", "required,mz_phone", |u: &UserRegistration| {
                        u.phone.to_field_value()
                    })
                    .wire("phone"),
                )
                .field(
                    FieldSpec::new("Password", "required,min=8", |u: &UserRegistration| {
                        u.password.to_field_value()
                    })
                    .wire("password"),
                )
                .build(structval::validator())
                .expect("user registration rules")
        });
        &SCHEMA
    }
}

#[derive(Default)]
struct VehicleInfo {
    plate: String,
    year: i32,
    color: String,
}

impl Validate for VehicleInfo {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: Lazy<Schema<VehicleInfo>> = Lazy::new(|| {
            Validator::schema::<VehicleInfo>()
                .field(
                    FieldSpec::new("Plate", "required,mz_plate", |v: &VehicleInfo| {
                        v.plate.to_field_value()
                    })
                    .wire("plate"),
                )
                .field(
                    FieldSpec::new("Year", "required,txova_vehicle_year", |v: &VehicleInfo| {
                        v.year.to_field_value()
                    })
                    .wire("year"),
                )
                .field(
                    FieldSpec::new(
                        "Color",
                        "required,oneof=white black silver red blue",
                        |v: &VehicleInfo| v.color.to_field_value(),
                    )
                    .wire("color"),
                )
                .build(structval::validator())
                .expect("vehicle rules")
        });
        &SCHEMA
    }
}

struct RideRequest {
    pin: String,
    fare: i64,
    rating: i32,
    pickup: Location,
}

impl Validate for RideRequest {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: Lazy<Schema<RideRequest>> = Lazy::new(|| {
            Validator::schema::<RideRequest>()
                .field(
                    FieldSpec::new("PIN", "required,txova_pin", |r: &RideRequest| {
                        r.pin.to_field_value()
                    })
                    .wire("pin"),
                )
                .field(
                    FieldSpec::new("Fare", "required,txova_money", |r: &RideRequest| {
                        r.fare.to_field_value()
                    })
                    .wire("fare"),
                )
                .field(
                    FieldSpec::new("Rating", "omitempty,txova_rating", |r: &RideRequest| {
                        r.rating.to_field_value()
                    })
                    .wire("rating"),
                )
                .field(
                    FieldSpec::new("Pickup", "required,mz_location", |r: &RideRequest| {
                        r.pickup.to_field_value()
                    })
                    .wire("pickup"),
                )
                .build(structval::validator())
                .expect("ride request rules")
        });
        &SCHEMA
    }
}

struct NestedStruct {
    user: UserRegistration,
    vehicle: VehicleInfo,
}

impl Validate for NestedStruct {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: Lazy<Schema<NestedStruct>> = Lazy::new(|| {
            Validator::schema::<NestedStruct>()
                .nested("user", |n: &NestedStruct| &n.user)
                .nested("vehicle", |n: &NestedStruct| &n.vehicle)
                .build(structval::validator())
                .expect("nested rules")
        });
        &SCHEMA
    }
}

#[derive(Default)]
struct OptionalFields {
    name: String,
    phone: String,
    rating: i32,
}

impl Validate for OptionalFields {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: Lazy<Schema<OptionalFields>> = Lazy::new(|| {
            Validator::schema::<OptionalFields>()
                .field(
                    FieldSpec::new("Name", "omitempty,min=2", |o: &OptionalFields| {
                        o.name.to_field_value()
                    })
                    .wire("name"),
                )
                .field(
                    FieldSpec::new("Phone", "omitempty,mz_phone", |o: &OptionalFields| {
                        o.phone.to_field_value()
                    })
                    .wire("phone"),
                )
                .field(
                    FieldSpec::new("Rating", "omitempty,txova_rating", |o: &OptionalFields| {
                        o.rating.to_field_value()
                    })
                    .wire("rating"),
                )
                .build(structval::validator())
                .expect("optional rules")
        });
        &SCHEMA
    }
}

struct Unnamed {
    location: Location,
}

impl Validate for Unnamed {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: Lazy<Schema<Unnamed>> = Lazy::new(|| {
            Validator::schema::<Unnamed>()
                .field(FieldSpec::new("Location", "mz_location", |u: &Unnamed| {
                    u.location.to_field_value()
                }))
                .build(structval::validator())
                .expect("location rules")
        });
        &SCHEMA
    }
}

fn valid_user() -> UserRegistration {
    UserRegistration {
        name: "João Silva".to_string(),
        email: "joao@example.com".to_string(),
        phone: "+258841234567".to_string(),
        password: "securepass123".to_string(),
    }
}

fn valid_vehicle() -> VehicleInfo {
    VehicleInfo {
        plate: "AAA-123-MP".to_string(),
        year: 2022,
        color: "white".to_string(),
    }
}

fn valid_ride() -> RideRequest {
    RideRequest {
        pin: "7392".to_string(),
        fare: 10_000,
        rating: 0,
        pickup: Location::new(-25.95, 32.58),
    }
}

fn code_of(errors: &ValidationErrors, field: &str) -> Option<ErrorCode> {
    errors.by_field(field).first().map(|e| e.code)
}

#[cfg(test)]
mod valid_records {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_valid_user() {
        assert_eq!(structval::validate(&valid_user()), None);
    }

    #[test]
    fn test_valid_vehicle() {
        assert_eq!(structval::validate(&valid_vehicle()), None);
    }

    #[test]
    fn test_valid_ride_with_and_without_rating() {
        assert_eq!(structval::validate(&valid_ride()), None);

        let ride = RideRequest {
            pin: "4826".to_string(),
            rating: 5,
            ..valid_ride()
        };
        assert_eq!(structval::validate(&ride), None);
    }
}

#[cfg(test)]
mod invalid_records {
    use super::*;
    use pretty_assertions::assert_eq;

    fn user_with(edit: impl FnOnce(&mut UserRegistration)) -> UserRegistration {
        let mut user = valid_user();
        edit(&mut user);
        user
    }

    fn vehicle_with(edit: impl FnOnce(&mut VehicleInfo)) -> VehicleInfo {
        let mut vehicle = valid_vehicle();
        edit(&mut vehicle);
        vehicle
    }

    fn ride_with(edit: impl FnOnce(&mut RideRequest)) -> RideRequest {
        let mut ride = valid_ride();
        edit(&mut ride);
        ride
    }

    #[test]
    fn test_missing_required_fields() {
        let errors = structval::validate(&UserRegistration::default()).unwrap();
        assert_eq!(errors.fields(), vec!["name", "email", "phone", "password"]);
        assert!(errors.iter().all(|e| e.code == ErrorCode::Required));
    }

    #[test]
    fn test_user_field_failures() {
        let cases = [
            (user_with(|u| u.phone = "invalid-phone".into()), "phone", ErrorCode::InvalidFormat),
            (user_with(|u| u.email = "not-an-email".into()), "email", ErrorCode::InvalidFormat),
            (user_with(|u| u.name = "J".into()), "name", ErrorCode::TooShort),
            (user_with(|u| u.password = "short".into()), "password", ErrorCode::TooShort),
        ];

        for (user, field, code) in cases {
            let errors = structval::validate(&user).unwrap();
            assert_eq!(errors.fields(), vec![field]);
            assert_eq!(code_of(&errors, field), Some(code));
        }
    }

    #[test]
    fn test_vehicle_field_failures() {
        let cases = [
            (vehicle_with(|v| v.plate = "INVALID".into()), "plate", ErrorCode::InvalidFormat),
            (vehicle_with(|v| v.year = 2005), "year", ErrorCode::OutOfRange),
            (vehicle_with(|v| v.color = "purple".into()), "color", ErrorCode::InvalidOption),
        ];

        for (vehicle, field, code) in cases {
            let errors = structval::validate(&vehicle).unwrap();
            assert_eq!(code_of(&errors, field), Some(code), "field {field}");
        }
    }

    #[test]
    fn test_ride_field_failures() {
        let cases = [
            (ride_with(|r| r.pin = "1234".into()), "pin", ErrorCode::InvalidFormat),
            (ride_with(|r| r.rating = 10), "rating", ErrorCode::OutOfRange),
            (
                ride_with(|r| r.pickup = Location::new(-34.0, 18.0)),
                "pickup",
                ErrorCode::OutsideServiceArea,
            ),
            (ride_with(|r| r.fare = -100), "fare", ErrorCode::OutOfRange),
        ];

        for (ride, field, code) in cases {
            let errors = structval::validate(&ride).unwrap();
            assert_eq!(errors.fields(), vec![field]);
            assert_eq!(code_of(&errors, field), Some(code));
        }
    }

    #[test]
    fn test_error_details() {
        let errors = structval::validate(&user_with(|u| u.name = "J".into())).unwrap();
        let error = errors.first().unwrap();
        assert_eq!(error.message, "name must be at least 2 characters");
        assert_eq!(error.value, Some(serde_json::json!(1)));

        let errors = structval::validate(&ride_with(|r| r.fare = -100)).unwrap();
        assert_eq!(errors.first().unwrap().value, Some(serde_json::json!(-100)));
    }

    #[test]
    fn test_zero_location_is_missing() {
        let errors = structval::validate(&ride_with(|r| r.pickup = Location::default())).unwrap();
        assert_eq!(code_of(&errors, "pickup"), Some(ErrorCode::Required));
    }
}

#[cfg(test)]
mod nested_and_optional {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_valid_nested() {
        let data = NestedStruct {
            user: valid_user(),
            vehicle: valid_vehicle(),
        };
        assert_eq!(structval::validate(&data), None);
    }

    #[test]
    fn test_nested_failures_use_inner_names() {
        let data = NestedStruct {
            user: UserRegistration {
                name: "J".into(),
                email: "invalid".into(),
                phone: "bad".into(),
                password: "short".into(),
            },
            vehicle: valid_vehicle(),
        };
        let errors = structval::validate(&data).unwrap();
        assert_eq!(errors.fields(), vec!["name", "email", "phone", "password"]);
        assert_eq!(NestedStruct::schema().field_names(), vec!["user", "vehicle"]);
    }

    #[test]
    fn test_optional_fields() {
        assert_eq!(structval::validate(&OptionalFields::default()), None);

        let filled = OptionalFields {
            name: "João".into(),
            phone: "+258841234567".into(),
            rating: 5,
        };
        assert_eq!(structval::validate(&filled), None);

        let bad = OptionalFields {
            name: "J".into(),
            phone: "bad".into(),
            rating: 10,
        };
        let errors = structval::validate(&bad).unwrap();
        assert!(errors.has_field("name"));
        assert!(errors.has_field("phone"));
        assert!(errors.has_field("rating"));
    }

    #[test]
    fn test_structural_name_without_wire_name() {
        let errors = structval::validate(&Unnamed { location: Location::new(0.0, 0.0) }).unwrap();
        assert_eq!(errors.fields(), vec!["Location"]);
    }
}

#[cfg(test)]
mod single_values {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_validate_var_table() {
        let cases: Vec<(Box<dyn Fn() -> Option<ValidationErrors>>, bool)> = vec![
            (Box::new(|| structval::validate_var("test@example.com", "email")), false),
            (Box::new(|| structval::validate_var("not-an-email", "email")), true),
            (Box::new(|| structval::validate_var("+258841234567", "mz_phone")), false),
            (Box::new(|| structval::validate_var("invalid", "mz_phone")), true),
            (Box::new(|| structval::validate_var("AAA-123-MP", "mz_plate")), false),
            (Box::new(|| structval::validate_var("INVALID", "mz_plate")), true),
            (Box::new(|| structval::validate_var("7392", "txova_pin")), false),
            (Box::new(|| structval::validate_var("1234", "txova_pin")), true),
            (Box::new(|| structval::validate_var(&5i32, "txova_rating")), false),
            (Box::new(|| structval::validate_var(&10i32, "txova_rating")), true),
            (Box::new(|| structval::validate_var(&100i64, "txova_money")), false),
            (Box::new(|| structval::validate_var(&0i64, "txova_money")), true),
        ];

        for (i, (run, want_err)) in cases.iter().enumerate() {
            assert_eq!(run().is_some(), *want_err, "case {i}");
        }
    }

    #[test]
    fn test_phone_variants() {
        for phone in ["+258841234567", "841234567", "84 123 4567", "258841234567"] {
            assert!(structval::validate_var(phone, "required,mz_phone").is_none(), "{phone}");
        }
        for phone in ["881234567", "8412345", "8412345678901", "84abcdefg"] {
            assert!(structval::validate_var(phone, "required,mz_phone").is_some(), "{phone}");
        }
    }

    #[test]
    fn test_plate_variants() {
        for plate in ["AAA-123-MP", "AAA123MP", "MP-12-34", "aaa-123-mp"] {
            assert!(structval::validate_var(plate, "required,mz_plate").is_none(), "{plate}");
        }
        for plate in ["INVALID", "AAA-123-XX"] {
            assert!(structval::validate_var(plate, "required,mz_plate").is_some(), "{plate}");
        }
    }

    #[test]
    fn test_location_variants() {
        let inside = [(-25.95, 32.58), (-19.84, 34.84), (-12.0, 40.0)];
        let outside = [(-34.0, 18.0), (0.0, 0.0), (-20.0, 29.0)];

        for (lat, lon) in inside {
            assert!(structval::validate_var(&Location::new(lat, lon), "mz_location").is_none());
        }
        for (lat, lon) in outside {
            let errors = structval::validate_var(&Location::new(lat, lon), "mz_location").unwrap();
            assert_eq!(errors.first().map(|e| e.code), Some(ErrorCode::OutsideServiceArea));
        }
    }
}
