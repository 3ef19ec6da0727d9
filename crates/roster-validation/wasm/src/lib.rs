//! Roster Validation WASM
//!
//! WebAssembly bindings for the student registration form.
//! Runs the same validators as the server and renders their results on the page.

use roster_validation_core as validation;
use roster_validation_core::{FieldError, StudentForm};
use wasm_bindgen::prelude::*;

pub mod dom;
pub mod presenter;

#[cfg(target_arch = "wasm32")]
mod listeners;

pub use presenter::{BoundField, FieldState, Presenter};

/// Set panic hook for better error messages in the browser
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Validate a student identifier. Returns the message, or nothing when valid.
#[wasm_bindgen(js_name = validateIdentifier)]
pub fn validate_identifier_js(value: &str) -> Option<String> {
    validation::validate_identifier(value).err().map(|e| e.to_string())
}

/// Validate a first or last name
///
/// # Example (JavaScript)
/// ```javascript
/// const error = validateHumanName(input.value.trim(), 'First name');
/// if (error) { ... }
/// ```
#[wasm_bindgen(js_name = validateHumanName)]
pub fn validate_human_name_js(value: &str, label: &str) -> Option<String> {
    validation::validate_human_name(value, label)
        .err()
        .map(|e| e.to_string())
}

#[wasm_bindgen(js_name = sanitizeInput)]
pub fn sanitize_input_js(value: &str) -> String {
    validation::sanitize_input(value)
}

/// Validate a whole form
///
/// # Arguments
/// * `values` - `{ studentId, firstName, lastName }` (snake_case keys work too)
///
/// # Returns
/// Array of `{ field, message }` (empty if valid)
#[wasm_bindgen(js_name = validateStudentForm)]
pub fn validate_student_form(values: JsValue) -> Result<JsValue, JsValue> {
    let form: StudentForm = serde_wasm_bindgen::from_value(values)
        .map_err(|e| JsValue::from_str(&format!("Failed to parse form values: {}", e)))?;

    let errors: Vec<FieldError> = match form.validate() {
        Ok(()) => Vec::new(),
        Err(errors) => errors.into_vec(),
    };

    Ok(serde_wasm_bindgen::to_value(&errors)?)
}

/// Wire live validation to the student form on this page
///
/// # Arguments
/// * `config` - optional form config object, e.g. `{ formId, fields, banner: { dismissMs } }`.
///   camelCase or snake_case keys; missing keys use the defaults
///   (`addStudentForm`, `studentId`, `firstName`, `lastName`), unknown keys are an error
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(js_name = attachStudentForm)]
pub fn attach_student_form(config: JsValue) -> Result<(), JsValue> {
    let config = if config.is_undefined() || config.is_null() {
        validation::FormConfig::default()
    } else {
        serde_wasm_bindgen::from_value(config)
            .map_err(|e| JsValue::from_str(&format!("Failed to parse form config: {}", e)))?
    };

    listeners::attach_when_ready(config).map_err(|e| JsValue::from_str(&e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_identifier_export() {
        assert_eq!(validate_identifier_js("S1001"), None);
        assert_eq!(
            validate_identifier_js("").as_deref(),
            Some("Student ID is required.")
        );
    }

    #[test]
    fn test_name_export() {
        assert_eq!(validate_human_name_js("O'Brien", "Last name"), None);
        assert_eq!(
            validate_human_name_js(" Bob", "First name").as_deref(),
            Some("First name cannot have leading or trailing spaces.")
        );
    }

    #[test]
    fn test_sanitize_export() {
        assert_eq!(sanitize_input_js("  Mary   Jane "), "Mary Jane");
    }
}
