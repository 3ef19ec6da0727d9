//! Roster Validation Core
//!
//! Pure Rust validation functions for the student registration form.
//! Used by both server-side validation and WASM client-side validation.

pub mod config;
pub mod error;
pub mod form;
pub mod identifier;
pub mod name;
pub mod sanitize;
mod string;

pub use config::{BannerConfig, ClassNames, FieldConfig, FieldKind, FormConfig};
pub use error::{ValidationError, IDENTIFIER_LABEL};
pub use form::{FieldError, FormErrors, StudentForm};
pub use identifier::validate_identifier;
pub use name::validate_human_name;
pub use sanitize::sanitize_input;
