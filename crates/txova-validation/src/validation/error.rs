//! Structured validation error types
//!
//! Every rule violation surfaced by this crate is a [`ValidationError`] carrying
//! exactly one [`ErrorCode`]. Collections of violations are gathered in
//! [`ValidationErrors`], which keeps evaluation order and serializes as a plain
//! JSON array so API responses keep a stable shape.
//!
//! Copyright (c) 2025 Txova Team
//! Licensed under the Apache-2.0 license

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;

/// Machine-readable category of a validation failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// A required field is missing or empty
    Required,
    /// The value does not match the expected format
    InvalidFormat,
    /// The value lies outside the allowed range
    OutOfRange,
    /// The value is shorter than the minimum length
    TooShort,
    /// The value exceeds the maximum length
    TooLong,
    /// The value is not one of the allowed options
    InvalidOption,
    /// The location is not inside a serviceable area
    OutsideServiceArea,
}

impl ErrorCode {
    /// Wire representation of the code
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::Required => "REQUIRED",
            ErrorCode::InvalidFormat => "INVALID_FORMAT",
            ErrorCode::OutOfRange => "OUT_OF_RANGE",
            ErrorCode::TooShort => "TOO_SHORT",
            ErrorCode::TooLong => "TOO_LONG",
            ErrorCode::InvalidOption => "INVALID_OPTION",
            ErrorCode::OutsideServiceArea => "OUTSIDE_SERVICE_AREA",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single validation failure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    /// External (wire) name of the field that failed
    pub field: String,
    /// Failure category
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Offending value, omitted from the wire form when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(
                f,
                "{}: {} (value: {})",
                self.field,
                self.message,
                display_value(value)
            ),
            None => write!(f, "{}: {}", self.field, self.message),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Strings render without JSON quotes in human-readable output
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl ValidationError {
    /// Create a validation error with an explicit code and message
    pub fn new<F, M>(field: F, code: ErrorCode, message: M) -> Self
    where
        F: Into<String>,
        M: Into<String>,
    {
        Self {
            field: field.into(),
            code,
            message: message.into(),
            value: None,
        }
    }

    /// Attach the offending value
    pub fn with_value<V: Into<Value>>(mut self, value: V) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Attach an optional offending value; `None` leaves the error unchanged
    pub fn with_optional_value(mut self, value: Option<Value>) -> Self {
        if value.is_some() {
            self.value = value;
        }
        self
    }

    /// `<field> is required`
    pub fn required<F: Into<String>>(field: F) -> Self {
        let field = field.into();
        let message = format!("{} is required", field);
        Self::new(field, ErrorCode::Required, message)
    }

    /// `<field> has invalid format, expected <expected>`
    pub fn invalid_format<F: Into<String>>(field: F, expected: &str) -> Self {
        let field = field.into();
        let message = format!("{} has invalid format, expected {}", field, expected);
        Self::new(field, ErrorCode::InvalidFormat, message)
    }

    /// `<field> must be between <min> and <max>`
    pub fn out_of_range<F, A, B>(field: F, min: A, max: B) -> Self
    where
        F: Into<String>,
        A: fmt::Display,
        B: fmt::Display,
    {
        let field = field.into();
        let message = format!("{} must be between {} and {}", field, min, max);
        Self::new(field, ErrorCode::OutOfRange, message)
    }

    /// `<field> must be at least <min_length> characters`
    pub fn too_short<F: Into<String>>(field: F, min_length: usize) -> Self {
        let field = field.into();
        let message = format!("{} must be at least {} characters", field, min_length);
        Self::new(field, ErrorCode::TooShort, message)
    }

    /// Like [`ValidationError::too_short`], recording the actual length as the value
    pub fn too_short_with_length<F: Into<String>>(
        field: F,
        min_length: usize,
        actual: usize,
    ) -> Self {
        Self::too_short(field, min_length).with_value(actual)
    }

    /// `<field> must be at most <max_length> characters`
    pub fn too_long<F: Into<String>>(field: F, max_length: usize) -> Self {
        let field = field.into();
        let message = format!("{} must be at most {} characters", field, max_length);
        Self::new(field, ErrorCode::TooLong, message)
    }

    /// Like [`ValidationError::too_long`], recording the actual length as the value
    pub fn too_long_with_length<F: Into<String>>(
        field: F,
        max_length: usize,
        actual: usize,
    ) -> Self {
        Self::too_long(field, max_length).with_value(actual)
    }

    /// `<field> must be one of: a, b, c`
    pub fn invalid_option<F, S>(field: F, allowed: &[S]) -> Self
    where
        F: Into<String>,
        S: AsRef<str>,
    {
        let field = field.into();
        let allowed: Vec<&str> = allowed.iter().map(AsRef::as_ref).collect();
        let message = format!("{} must be one of: {}", field, allowed.join(", "));
        Self::new(field, ErrorCode::InvalidOption, message)
    }

    /// `<field> is outside the service area`
    pub fn outside_service_area<F: Into<String>>(field: F) -> Self {
        let field = field.into();
        let message = format!("{} is outside the service area", field);
        Self::new(field, ErrorCode::OutsideServiceArea, message)
    }

    /// Like [`ValidationError::outside_service_area`], recording `"<lat>, <lon>"`
    pub fn outside_service_area_at<F: Into<String>>(field: F, lat: f64, lon: f64) -> Self {
        Self::outside_service_area(field).with_value(format!("{:.6}, {:.6}", lat, lon))
    }
}

/// Ordered collection of validation failures from one validation pass
///
/// Insertion order is evaluation order. Entries are never deduplicated: the
/// same field may legitimately appear with different codes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.errors.as_slice() {
            [] => write!(f, "no validation errors"),
            [single] => write!(f, "{}", single),
            errors => {
                let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
                write!(f, "{} validation errors: {}", errors.len(), messages.join("; "))
            }
        }
    }
}

impl std::error::Error for ValidationErrors {}

impl ValidationErrors {
    /// Create an empty collection
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Append one error
    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Append every error of another collection, preserving its order
    pub fn add_all(&mut self, other: ValidationErrors) {
        self.errors.extend(other.errors);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// True if at least one failure was recorded
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// True if any failure concerns `field`
    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    /// All failures for `field`, in order
    pub fn by_field(&self, field: &str) -> ValidationErrors {
        self.errors.iter().filter(|e| e.field == field).cloned().collect()
    }

    /// All failures carrying `code`, in order
    pub fn by_code(&self, code: ErrorCode) -> ValidationErrors {
        self.errors.iter().filter(|e| e.code == code).cloned().collect()
    }

    pub fn first(&self) -> Option<&ValidationError> {
        self.errors.first()
    }

    /// Distinct field names in first-seen order
    pub fn fields(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.errors
            .iter()
            .filter(|e| seen.insert(e.field.as_str()))
            .map(|e| e.field.as_str())
            .collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.errors.iter()
    }

    pub fn as_slice(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Ok if no errors, Err with the collection otherwise
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    /// `None` when empty, so callers can treat "no errors" as absence
    pub fn into_option(self) -> Option<Self> {
        if self.is_empty() {
            None
        } else {
            Some(self)
        }
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        Self { errors: vec![error] }
    }
}

impl From<Vec<ValidationError>> for ValidationErrors {
    fn from(errors: Vec<ValidationError>) -> Self {
        Self { errors }
    }
}

impl FromIterator<ValidationError> for ValidationErrors {
    fn from_iter<I: IntoIterator<Item = ValidationError>>(iter: I) -> Self {
        Self {
            errors: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a ValidationError;
    type IntoIter = std::slice::Iter<'a, ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

impl Extend<ValidationError> for ValidationErrors {
    fn extend<I: IntoIterator<Item = ValidationError>>(&mut self, iter: I) {
        self.errors.extend(iter);
    }
}
