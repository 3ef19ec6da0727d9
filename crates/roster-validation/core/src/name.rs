//! Human name validation (first and last names)

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ValidationError;
use crate::string::{validate_length, validate_required};

pub const MIN_NAME_LENGTH: usize = 2;
pub const MAX_NAME_LENGTH: usize = 50;

static NAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z\s.'-]+$").expect("name pattern is valid"));

static EDGE_WHITESPACE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s|\s$").expect("edge whitespace pattern is valid"));

static CONSECUTIVE_WHITESPACE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s\s+").expect("consecutive whitespace pattern is valid"));

/// Validates a given or family name. Every message starts with `label`.
///
/// Order: required, length (2..=50), charset, leading/trailing whitespace,
/// consecutive whitespace. The value is checked as given, so callers that
/// trim first will never see the leading/trailing error.
pub fn validate_human_name(value: &str, label: &str) -> Result<(), ValidationError> {
    validate_required(value, label)?;
    validate_length(value, label, MIN_NAME_LENGTH, MAX_NAME_LENGTH)?;

    if !NAME_REGEX.is_match(value) {
        return Err(ValidationError::NameCharset {
            label: label.to_string(),
        });
    }

    if EDGE_WHITESPACE_REGEX.is_match(value) {
        return Err(ValidationError::EdgeWhitespace {
            label: label.to_string(),
        });
    }

    if CONSECUTIVE_WHITESPACE_REGEX.is_match(value) {
        return Err(ValidationError::ConsecutiveWhitespace {
            label: label.to_string(),
        });
    }

    Ok(())
}
