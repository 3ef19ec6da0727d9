//! Whole-form validation for the student registration form
//!
//! The browser presenter validates field by field; the server re-runs the
//! same checks on the submitted values through [`StudentForm`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::ValidationError;
use crate::identifier::validate_identifier;
use crate::name::validate_human_name;
use crate::sanitize::sanitize_input;

/// A single failing field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Every failing field of a form, in field order
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("{} field(s) failed validation", .errors.len())]
pub struct FormErrors {
    errors: Vec<FieldError>,
}

impl FormErrors {
    pub fn push(&mut self, field: impl Into<String>, error: &ValidationError) {
        self.errors.push(FieldError {
            field: field.into(),
            message: error.to_string(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// Message for a specific field
    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(|e| e.message.clone()).collect()
    }

    pub fn into_vec(self) -> Vec<FieldError> {
        self.errors
    }

    /// `Ok(())` when nothing was recorded
    pub fn into_result(self) -> Result<(), FormErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

/// Submitted student registration values
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentForm {
    #[serde(default, alias = "studentId")]
    pub student_id: String,

    #[serde(default, alias = "firstName")]
    pub first_name: String,

    #[serde(default, alias = "lastName")]
    pub last_name: String,
}

impl StudentForm {
    pub fn new(
        student_id: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            student_id: student_id.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    /// Validates the trimmed values of all three fields.
    ///
    /// Errors are keyed by the input id used on the page
    /// (`studentId`, `firstName`, `lastName`).
    pub fn validate(&self) -> Result<(), FormErrors> {
        let mut errors = FormErrors::default();

        let checks = [
            ("studentId", validate_identifier(self.student_id.trim())),
            (
                "firstName",
                validate_human_name(self.first_name.trim(), "First name"),
            ),
            (
                "lastName",
                validate_human_name(self.last_name.trim(), "Last name"),
            ),
        ];

        for (field, result) in checks {
            if let Err(e) = result {
                errors.push(field, &e);
            }
        }

        errors.into_result()
    }

    /// Copy with every value trimmed and its inner whitespace collapsed
    pub fn sanitized(&self) -> Self {
        Self {
            student_id: sanitize_input(&self.student_id),
            first_name: sanitize_input(&self.first_name),
            last_name: sanitize_input(&self.last_name),
        }
    }
}
