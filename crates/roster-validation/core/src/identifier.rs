//! Student identifier validation

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{ValidationError, IDENTIFIER_LABEL};
use crate::string::{validate_length, validate_required};

pub const MIN_IDENTIFIER_LENGTH: usize = 3;
pub const MAX_IDENTIFIER_LENGTH: usize = 20;

static IDENTIFIER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9]+$").expect("identifier pattern is valid"));

static WHITESPACE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s").expect("whitespace pattern is valid"));

/// Validates a student identifier.
///
/// Checks run in order and the first failure wins:
/// required, length (3..=20), charset (ASCII letters and digits), whitespace.
///
/// The whitespace check can't fire once the charset check passes. It stays as
/// its own step so callers keep seeing its distinct message if the charset
/// rule is ever relaxed.
pub fn validate_identifier(value: &str) -> Result<(), ValidationError> {
    validate_required(value, IDENTIFIER_LABEL)?;
    validate_length(
        value,
        IDENTIFIER_LABEL,
        MIN_IDENTIFIER_LENGTH,
        MAX_IDENTIFIER_LENGTH,
    )?;

    if !IDENTIFIER_REGEX.is_match(value) {
        return Err(ValidationError::IdentifierCharset);
    }

    if WHITESPACE_REGEX.is_match(value) {
        return Err(ValidationError::IdentifierWhitespace);
    }

    Ok(())
}
