//! Shared string checks

use crate::error::ValidationError;

/// Length in characters, not bytes
pub(crate) fn char_len(s: &str) -> usize {
    s.chars().count()
}

pub(crate) fn validate_required(s: &str, label: &str) -> Result<(), ValidationError> {
    if s.trim().is_empty() {
        Err(ValidationError::Required {
            label: label.to_string(),
        })
    } else {
        Ok(())
    }
}

pub(crate) fn validate_length(
    s: &str,
    label: &str,
    min: usize,
    max: usize,
) -> Result<(), ValidationError> {
    let len = char_len(s);
    if len >= min && len <= max {
        Ok(())
    } else {
        Err(ValidationError::Length {
            label: label.to_string(),
            min,
            max,
        })
    }
}
