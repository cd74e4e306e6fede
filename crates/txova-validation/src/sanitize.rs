//! Input sanitization helpers
//!
//! Every function takes `&str` and returns a fresh `String`; nothing is
//! modified in place. [`Sanitizer`] chains them into reusable pipelines.
//!
//! Copyright (c) 2025 Txova Team
//! Licensed under the Apache-2.0 license

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

static HTML_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("static regex"));
static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("static regex"));

/// Signature shared by every sanitization step
pub type SanitizeFn = dyn Fn(&str) -> String + Send + Sync;

pub fn trim_whitespace(s: &str) -> String {
    s.trim().to_string()
}

/// Collapse whitespace runs to a single space and trim both ends
pub fn normalize_spaces(s: &str) -> String {
    WHITESPACE_RUN.replace_all(s, " ").trim().to_string()
}

/// Remove anything that looks like a tag; entities are left alone
pub fn strip_html(s: &str) -> String {
    HTML_TAG.replace_all(s, "").into_owned()
}

/// Escape `& < > " '`
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Normalize spacing and title-case every word
pub fn normalize_name(s: &str) -> String {
    normalize_spaces(s)
        .split(' ')
        .filter(|word| !word.is_empty())
        .map(title_case)
        .collect::<Vec<_>>()
        .join(" ")
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

pub fn normalize_email(s: &str) -> String {
    s.trim().to_lowercase()
}

fn is_layout(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\t')
}

// Zero-width and bidi formatting characters.
fn is_format(c: char) -> bool {
    matches!(
        c,
        '\u{00AD}'
            | '\u{200B}'..='\u{200F}'
            | '\u{202A}'..='\u{202E}'
            | '\u{2060}'..='\u{2064}'
            | '\u{FEFF}'
    )
}

/// Drop characters that do not render, keeping newlines and tabs
pub fn remove_non_printable(s: &str) -> String {
    s.chars()
        .filter(|&c| {
            is_layout(c) || (!c.is_control() && !is_format(c) && (c == ' ' || !c.is_whitespace()))
        })
        .collect()
}

/// Drop control characters, keeping newlines and tabs
pub fn remove_control_chars(s: &str) -> String {
    s.chars().filter(|&c| is_layout(c) || !c.is_control()).collect()
}

pub fn to_uppercase(s: &str) -> String {
    s.to_uppercase()
}

pub fn to_lowercase(s: &str) -> String {
    s.to_lowercase()
}

pub fn remove_digits(s: &str) -> String {
    s.chars().filter(|c| !c.is_numeric()).collect()
}

pub fn keep_digits(s: &str) -> String {
    s.chars().filter(|c| c.is_numeric()).collect()
}

pub fn keep_alphanumeric(s: &str) -> String {
    s.chars().filter(|c| c.is_alphanumeric()).collect()
}

/// Apply `steps` left to right
pub fn chain(input: &str, steps: &[&SanitizeFn]) -> String {
    steps.iter().fold(input.to_string(), |acc, step| step(&acc))
}

/// Reusable sanitization pipeline
///
/// ```
/// use txova_validation::sanitize::Sanitizer;
///
/// let clean = Sanitizer::new().strip_html().normalize_spaces().apply("  <b>hi</b>   there ");
/// assert_eq!(clean, "hi there");
/// ```
#[derive(Default)]
pub struct Sanitizer {
    steps: Vec<Box<SanitizeFn>>,
}

impl fmt::Debug for Sanitizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sanitizer").field("steps", &self.steps.len()).finish()
    }
}

impl Sanitizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an arbitrary step
    pub fn custom<F>(mut self, step: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.steps.push(Box::new(step));
        self
    }

    pub fn trim_whitespace(self) -> Self {
        self.custom(trim_whitespace)
    }

    pub fn normalize_spaces(self) -> Self {
        self.custom(normalize_spaces)
    }

    pub fn strip_html(self) -> Self {
        self.custom(strip_html)
    }

    pub fn escape_html(self) -> Self {
        self.custom(escape_html)
    }

    pub fn normalize_name(self) -> Self {
        self.custom(normalize_name)
    }

    pub fn normalize_email(self) -> Self {
        self.custom(normalize_email)
    }

    pub fn to_uppercase(self) -> Self {
        self.custom(to_uppercase)
    }

    pub fn to_lowercase(self) -> Self {
        self.custom(to_lowercase)
    }

    pub fn remove_non_printable(self) -> Self {
        self.custom(remove_non_printable)
    }

    pub fn remove_control_chars(self) -> Self {
        self.custom(remove_control_chars)
    }

    pub fn keep_digits(self) -> Self {
        self.custom(keep_digits)
    }

    pub fn keep_alphanumeric(self) -> Self {
        self.custom(keep_alphanumeric)
    }

    /// Run the pipeline
    pub fn apply(&self, input: &str) -> String {
        self.steps.iter().fold(input.to_string(), |acc, step| step(&acc))
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Free text: strip tags, drop unprintables, normalize spaces
    pub fn text() -> Self {
        Self::new().strip_html().remove_non_printable().normalize_spaces()
    }

    /// Person names: like [`Sanitizer::text`] but title-cased
    pub fn name() -> Self {
        Self::new().strip_html().remove_non_printable().normalize_name()
    }

    pub fn email() -> Self {
        Self::new().trim_whitespace().normalize_email()
    }

    /// Digits only
    pub fn phone() -> Self {
        Self::new().keep_digits()
    }
}
