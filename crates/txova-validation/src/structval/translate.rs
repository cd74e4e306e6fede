//! Translation of engine failures into [`ValidationError`]s
//!
//! Dispatch order, first match wins:
//! 1. structural rules that read the parameter (`required`, `min`, `max`, `len`, `oneof`)
//! 2. format rules with a fixed expectation (`email`, `url`, `mz_phone`, ...)
//! 3. Txova rules with their own codes (`mz_location`, `txova_money`, ...)
//! 4. bound comparisons (`gt`, `gte`, `lt`, `lte`)
//! 5. anything else becomes `InvalidFormat` naming the rule itself
//!
//! Copyright (c) 2025 Txova Team
//! Licensed under the Apache-2.0 license

use crate::config::ValidatorConfig;
use crate::structval::engine::FieldError;
use crate::structval::registry::{
    MZ_LOCATION, MZ_PHONE, MZ_PLATE, TXOVA_MONEY, TXOVA_PIN, TXOVA_RATING, TXOVA_VEHICLE_YEAR,
};
use crate::structval::value::{FieldKind, FieldValue};
use crate::validation::{ValidationError, ValidationErrors};
use crate::vehicle;

const POS_INFINITY: &str = "∞";
const NEG_INFINITY: &str = "-∞";

/// Expected-format descriptions for rules that only ever mean "bad format"
pub fn format_expectation(tag: &str) -> Option<&'static str> {
    match tag {
        "email" => Some("valid email address"),
        "url" => Some("valid URL"),
        MZ_PHONE => Some("valid Mozambique phone number"),
        MZ_PLATE => Some("valid Mozambique license plate"),
        TXOVA_PIN => Some(crate::ride::PIN_EXPECTED),
        _ => None,
    }
}

/// Decimal digits of `param` read as one number; 0 when there are none
pub fn parse_int_param(param: &str) -> usize {
    param
        .chars()
        .filter_map(|c| c.to_digit(10))
        .fold(0usize, |n, d| n.saturating_mul(10).saturating_add(d as usize))
}

fn text_len(value: &FieldValue) -> Option<usize> {
    value.as_str().map(|s| s.chars().count())
}

/// Translate one engine failure
pub fn translate(error: &FieldError, config: &ValidatorConfig) -> ValidationError {
    let field = error.field.as_str();
    let param = error.param.as_str();
    let value = error.value.to_json();

    match error.tag.as_str() {
        "required" => return ValidationError::required(field),
        "min" => {
            return match text_len(&error.value) {
                Some(len) if error.kind == FieldKind::Text => {
                    ValidationError::too_short_with_length(field, parse_int_param(param), len)
                }
                _ => ValidationError::out_of_range(field, param, POS_INFINITY)
                    .with_optional_value(value),
            }
        }
        "max" => {
            return match text_len(&error.value) {
                Some(len) if error.kind == FieldKind::Text => {
                    ValidationError::too_long_with_length(field, parse_int_param(param), len)
                }
                _ => ValidationError::out_of_range(field, NEG_INFINITY, param)
                    .with_optional_value(value),
            }
        }
        "len" => {
            return ValidationError::invalid_format(field, &format!("length {}", param))
                .with_optional_value(value)
        }
        "oneof" => {
            let options: Vec<&str> = param.split_whitespace().collect();
            return ValidationError::invalid_option(field, &options).with_optional_value(value);
        }
        _ => {}
    }

    if let Some(expected) = format_expectation(&error.tag) {
        return ValidationError::invalid_format(field, expected).with_optional_value(value);
    }

    match error.tag.as_str() {
        MZ_LOCATION => ValidationError::outside_service_area(field),
        TXOVA_MONEY => {
            ValidationError::out_of_range(field, 1, POS_INFINITY).with_optional_value(value)
        }
        TXOVA_RATING => ValidationError::out_of_range(field, 1, 5).with_optional_value(value),
        TXOVA_VEHICLE_YEAR => {
            let max_year = vehicle::current_year().saturating_add(1);
            ValidationError::out_of_range(field, config.min_vehicle_year, max_year)
                .with_optional_value(value)
        }
        "gt" | "gte" => {
            ValidationError::out_of_range(field, param, POS_INFINITY).with_optional_value(value)
        }
        "lt" | "lte" => {
            ValidationError::out_of_range(field, NEG_INFINITY, param).with_optional_value(value)
        }
        tag => {
            tracing::debug!(
                tag,
                field,
                "no dedicated translation for rule, reporting as invalid format"
            );
            ValidationError::invalid_format(field, tag).with_optional_value(value)
        }
    }
}

/// Translate a batch, preserving order
pub fn translate_all<'a, I>(errors: I, config: &ValidatorConfig) -> ValidationErrors
where
    I: IntoIterator<Item = &'a FieldError>,
{
    errors.into_iter().map(|e| translate(e, config)).collect()
}
