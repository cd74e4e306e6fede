//! Rating and review validation
//!
//! Copyright (c) 2025 Txova Team
//! Licensed under the Apache-2.0 license

use crate::sanitize;
use crate::validation::ValidationError;
use serde::{Deserialize, Serialize};

pub const MIN_RATING: i64 = 1;
pub const MAX_RATING: i64 = 5;

/// Maximum review length in characters (not bytes)
pub const MAX_REVIEW_LENGTH: usize = 500;

// Flagging list only; matches are substrings of the lowercased text.
const PROFANITY: &[&str] = &[
    "fuck", "shit", "damn", "ass", "bitch", "bastard", "crap", "piss", "dick", "cock", "merda",
    "porra", "caralho", "foda", "puta", "corno", "filho da puta", "fdp", "cabrão",
];

/// Validate a star rating
pub fn validate_rating(value: i64) -> Result<(), ValidationError> {
    if !(MIN_RATING..=MAX_RATING).contains(&value) {
        return Err(
            ValidationError::out_of_range("rating", MIN_RATING, MAX_RATING).with_value(value),
        );
    }
    Ok(())
}

pub fn is_valid_rating(value: i64) -> bool {
    validate_rating(value).is_ok()
}

/// Review text is optional but bounded
pub fn validate_review_text(text: &str) -> Result<(), ValidationError> {
    let length = text.chars().count();
    if length > MAX_REVIEW_LENGTH {
        return Err(ValidationError::too_long_with_length("review", MAX_REVIEW_LENGTH, length));
    }
    Ok(())
}

pub fn is_valid_review_text(text: &str) -> bool {
    validate_review_text(text).is_ok()
}

/// Strip tags, collapse whitespace and trim
pub fn sanitize_review_text(text: &str) -> String {
    sanitize::normalize_spaces(&sanitize::strip_html(text))
}

/// True if the text should be flagged for moderation
pub fn contains_profanity(text: &str) -> bool {
    let lower = text.to_lowercase();
    PROFANITY.iter().any(|word| lower.contains(word))
}

/// Sanitize, then validate the sanitized length
pub fn validate_and_sanitize_review(text: &str) -> Result<String, ValidationError> {
    let sanitized = sanitize_review_text(text);
    validate_review_text(&sanitized)?;
    Ok(sanitized)
}

/// Outcome of [`process_review`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewResult {
    pub text: String,
    pub has_profanity: bool,
    pub requires_review: bool,
    pub original_length: usize,
    pub sanitized_length: usize,
}

/// Sanitize, validate and profanity-check a review in one pass
pub fn process_review(text: &str) -> Result<ReviewResult, ValidationError> {
    let sanitized = validate_and_sanitize_review(text)?;
    let has_profanity = contains_profanity(&sanitized);

    Ok(ReviewResult {
        original_length: text.chars().count(),
        sanitized_length: sanitized.chars().count(),
        text: sanitized,
        has_profanity,
        requires_review: has_profanity,
    })
}
