//! Validation error type
//!
//! Every variant renders as the exact message shown to the user, so callers
//! that only need text can use `to_string()`.

use thiserror::Error;

/// Label used in every student identifier message.
pub const IDENTIFIER_LABEL: &str = "Student ID";

/// A failed validation check.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{label} is required.")]
    Required { label: String },

    #[error("{label} must be between {min} and {max} characters.")]
    Length {
        label: String,
        min: usize,
        max: usize,
    },

    #[error("Student ID can only contain letters and numbers (no special characters or spaces).")]
    IdentifierCharset,

    #[error("Student ID cannot contain spaces.")]
    IdentifierWhitespace,

    #[error("{label} can only contain letters, spaces, apostrophes, periods, and hyphens.")]
    NameCharset { label: String },

    #[error("{label} cannot have leading or trailing spaces.")]
    EdgeWhitespace { label: String },

    #[error("{label} cannot have consecutive spaces.")]
    ConsecutiveWhitespace { label: String },
}
