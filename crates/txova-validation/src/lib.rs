//! Txova Validation - Input validation and sanitization for the Txova platform
//!
//! This crate checks the Mozambique-specific inputs a ride-hailing service
//! receives and reports problems in one structured, serializable shape.
//!
//! # Main Components
//!
//! - **Error Vocabulary**: [`ValidationError`] and [`ValidationErrors`] with stable codes
//! - **Domain Validators**: phone numbers, plates, coordinates, rides, ratings, documents
//! - **Sanitization**: composable text cleanup via [`sanitize::Sanitizer`]
//! - **Struct Validation**: declarative rule expressions evaluated by [`Validator`]
//!
//! # Example
//!
//! ```
//! use txova_validation::{phone, ride, ErrorCode};
//!
//! assert_eq!(phone::normalize("84 123 4567").unwrap(), "+258841234567");
//!
//! let err = ride::validate_pin("1234").unwrap_err();
//! assert_eq!(err.code, ErrorCode::InvalidFormat);
//!
//! let errors = txova_validation::validate_var(&0i64, "txova_money").unwrap();
//! assert_eq!(errors.fields(), vec!["value"]);
//! ```
//!
//! Copyright (c) 2025 Txova Team
//! Licensed under the Apache-2.0 license

pub mod config;
pub mod document;
pub mod error;
pub mod geo;
pub mod phone;
pub mod rating;
pub mod ride;
pub mod sanitize;
pub mod structval;
pub mod validation;
pub mod vehicle;

// Re-export main types for convenience
pub use config::ValidatorConfig;
pub use error::{Error, Result};
pub use geo::{BoundingBox, Location};
pub use validation::{ErrorCode, ValidationError, ValidationErrors};

// Struct validation
pub use structval::{
    register_rule, validate, validate_var, validator, FieldLevel, FieldSpec, Schema, ToFieldValue,
    Validate, Validator, ValidatorBuilder,
};
