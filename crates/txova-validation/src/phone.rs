//! Mozambique phone number validation and normalization
//!
//! Accepted inputs, all normalizing to `+258XXXXXXXXX`:
//! - Local: `841234567`
//! - International: `+258841234567`, `258841234567`
//! - With `00` prefix: `00258841234567`
//! - With separators: `84 123 4567`, `84-123-4567`
//!
//! Copyright (c) 2025 Txova Team
//! Licensed under the Apache-2.0 license

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use thiserror::Error;

/// Country calling code for Mozambique
pub const COUNTRY_CODE: &str = "258";

/// Valid mobile prefixes
pub const VALID_PREFIXES: [&str; 6] = ["82", "83", "84", "85", "86", "87"];

static NON_DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^0-9]").expect("static regex"));

/// Why a phone number was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PhoneError {
    #[error("invalid phone number")]
    InvalidNumber,
    #[error("invalid mobile prefix")]
    InvalidPrefix,
}

/// Mobile network operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Vodacom,
    Movitel,
    Tmcel,
}

impl Operator {
    fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "82" | "84" | "85" => Some(Operator::Vodacom),
            "83" | "86" => Some(Operator::Movitel),
            "87" => Some(Operator::Tmcel),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Vodacom => "Vodacom",
            Operator::Movitel => "Movitel",
            Operator::Tmcel => "Tmcel",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalize a phone number to `+258XXXXXXXXX`
pub fn normalize(input: &str) -> Result<String, PhoneError> {
    let digits = NON_DIGITS.replace_all(input, "");
    if digits.is_empty() {
        return Err(PhoneError::InvalidNumber);
    }

    let local = match digits.len() {
        9 => &digits[..],
        12 if digits.starts_with(COUNTRY_CODE) => &digits[3..],
        14 if digits.starts_with("00258") => &digits[5..],
        _ => return Err(PhoneError::InvalidNumber),
    };

    if !VALID_PREFIXES.contains(&&local[..2]) {
        return Err(PhoneError::InvalidPrefix);
    }

    Ok(format!("+{}{}", COUNTRY_CODE, local))
}

/// True if the input normalizes to a valid Mozambique mobile number
pub fn is_valid(input: &str) -> bool {
    normalize(input).is_ok()
}

/// Two-digit mobile prefix of a valid number
pub fn prefix(input: &str) -> Option<String> {
    normalize(input).ok().map(|normalized| normalized[4..6].to_string())
}

/// Operator owning the number's prefix
pub fn operator(input: &str) -> Option<Operator> {
    prefix(input).and_then(|p| Operator::from_prefix(&p))
}

pub fn is_vodacom(input: &str) -> bool {
    operator(input) == Some(Operator::Vodacom)
}

pub fn is_movitel(input: &str) -> bool {
    operator(input) == Some(Operator::Movitel)
}

pub fn is_tmcel(input: &str) -> bool {
    operator(input) == Some(Operator::Tmcel)
}
