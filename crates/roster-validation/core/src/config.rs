// File: src/config.rs
// Purpose: Form binding configuration, parsed from roster-form.toml or a JS object

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::error::{ValidationError, IDENTIFIER_LABEL};
use crate::identifier::validate_identifier;
use crate::name::validate_human_name;

/// Describes which form, inputs and CSS classes the presenter works with.
///
/// Keys are snake_case; the camelCase spelling used from JavaScript is
/// accepted as well. Unknown keys are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FormConfig {
    /// Element id of the form (default: "addStudentForm")
    #[serde(default = "default_form_id", alias = "formId")]
    pub form_id: String,

    /// Validated inputs, in the order their messages appear in the banner
    #[serde(default = "default_fields")]
    pub fields: Vec<FieldConfig>,

    #[serde(default)]
    pub classes: ClassNames,

    #[serde(default)]
    pub banner: BannerConfig,
}

/// Which validator a field runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Identifier,
    HumanName { label: String },
}

impl FieldKind {
    /// Run the validator for this kind of field
    pub fn validate(&self, value: &str) -> Result<(), ValidationError> {
        match self {
            FieldKind::Identifier => validate_identifier(value),
            FieldKind::HumanName { label } => validate_human_name(value, label),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            FieldKind::Identifier => IDENTIFIER_LABEL,
            FieldKind::HumanName { label } => label,
        }
    }
}

/// A validated input and the element that shows its message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawFieldConfig", into = "RawFieldConfig")]
pub struct FieldConfig {
    pub input_id: String,

    /// Id of the feedback element (default: "{input_id}-feedback")
    pub feedback_id: Option<String>,

    pub kind: FieldKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
enum FieldKindName {
    Identifier,
    #[serde(alias = "humanName")]
    HumanName,
}

/// On-the-wire shape of a field: `kind` and `label` sit next to the ids
#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawFieldConfig {
    #[serde(alias = "inputId")]
    input_id: String,

    #[serde(default, alias = "feedbackId", skip_serializing_if = "Option::is_none")]
    feedback_id: Option<String>,

    kind: FieldKindName,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    label: Option<String>,
}

impl TryFrom<RawFieldConfig> for FieldConfig {
    type Error = String;

    fn try_from(raw: RawFieldConfig) -> std::result::Result<Self, Self::Error> {
        let kind = match (raw.kind, raw.label) {
            (FieldKindName::Identifier, None) => FieldKind::Identifier,
            (FieldKindName::Identifier, Some(_)) => {
                return Err(format!(
                    "identifier field `{}` does not take a label",
                    raw.input_id
                ))
            }
            (FieldKindName::HumanName, Some(label)) => FieldKind::HumanName { label },
            (FieldKindName::HumanName, None) => {
                return Err(format!(
                    "human_name field `{}` needs a label",
                    raw.input_id
                ))
            }
        };

        Ok(Self {
            input_id: raw.input_id,
            feedback_id: raw.feedback_id,
            kind,
        })
    }
}

impl From<FieldConfig> for RawFieldConfig {
    fn from(field: FieldConfig) -> Self {
        let (kind, label) = match field.kind {
            FieldKind::Identifier => (FieldKindName::Identifier, None),
            FieldKind::HumanName { label } => (FieldKindName::HumanName, Some(label)),
        };
        Self {
            input_id: field.input_id,
            feedback_id: field.feedback_id,
            kind,
            label,
        }
    }
}

impl FieldConfig {
    pub fn identifier(input_id: impl Into<String>) -> Self {
        Self {
            input_id: input_id.into(),
            feedback_id: None,
            kind: FieldKind::Identifier,
        }
    }

    pub fn human_name(input_id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            input_id: input_id.into(),
            feedback_id: None,
            kind: FieldKind::HumanName {
                label: label.into(),
            },
        }
    }

    pub fn with_feedback_id(mut self, feedback_id: impl Into<String>) -> Self {
        self.feedback_id = Some(feedback_id.into());
        self
    }

    /// Resolved feedback element id
    pub fn feedback_id(&self) -> String {
        self.feedback_id
            .clone()
            .unwrap_or_else(|| format!("{}-feedback", self.input_id))
    }

    pub fn validate(&self, value: &str) -> Result<(), ValidationError> {
        self.kind.validate(value)
    }
}

/// CSS classes toggled on inputs and feedback elements
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClassNames {
    #[serde(default = "default_invalid_class")]
    pub invalid: String,

    #[serde(default = "default_valid_class")]
    pub valid: String,

    #[serde(default = "default_feedback_class")]
    pub feedback: String,
}

/// Aggregated error banner shown above the form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BannerConfig {
    /// Space separated classes put on the banner element
    #[serde(default = "default_banner_classes")]
    pub classes: String,

    /// Class used to find banners left over from an earlier submit
    #[serde(default = "default_banner_marker", alias = "markerClass")]
    pub marker_class: String,

    #[serde(default = "default_banner_title")]
    pub title: String,

    /// Auto-dismiss delay in milliseconds
    #[serde(default = "default_dismiss_ms", alias = "dismissMs")]
    pub dismiss_ms: u64,
}

impl BannerConfig {
    pub fn dismiss_after(&self) -> Duration {
        Duration::from_millis(self.dismiss_ms)
    }
}

// Default values
fn default_form_id() -> String {
    "addStudentForm".to_string()
}

fn default_fields() -> Vec<FieldConfig> {
    vec![
        FieldConfig::identifier("studentId"),
        FieldConfig::human_name("firstName", "First name"),
        FieldConfig::human_name("lastName", "Last name"),
    ]
}

fn default_invalid_class() -> String {
    "is-invalid".to_string()
}

fn default_valid_class() -> String {
    "is-valid".to_string()
}

fn default_feedback_class() -> String {
    "invalid-feedback".to_string()
}

fn default_banner_classes() -> String {
    "alert alert-danger validation-alert".to_string()
}

fn default_banner_marker() -> String {
    "validation-alert".to_string()
}

fn default_banner_title() -> String {
    "Validation Errors:".to_string()
}

fn default_dismiss_ms() -> u64 {
    10_000
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            form_id: default_form_id(),
            fields: default_fields(),
            classes: ClassNames::default(),
            banner: BannerConfig::default(),
        }
    }
}

impl Default for ClassNames {
    fn default() -> Self {
        Self {
            invalid: default_invalid_class(),
            valid: default_valid_class(),
            feedback: default_feedback_class(),
        }
    }
}

impl Default for BannerConfig {
    fn default() -> Self {
        Self {
            classes: default_banner_classes(),
            marker_class: default_banner_marker(),
            title: default_banner_title(),
            dismiss_ms: default_dismiss_ms(),
        }
    }
}

impl FormConfig {
    /// Parse configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        toml::from_str(content).context("Failed to parse form config")
    }

    /// Load configuration from a TOML file, falling back to defaults when absent
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read form config: {:?}", path))?;

        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to load form config: {:?}", path))
    }

    /// Look up a field by its input id
    pub fn field(&self, input_id: &str) -> Option<&FieldConfig> {
        self.fields.iter().find(|f| f.input_id == input_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = FormConfig::default();
        assert_eq!(config.form_id, "addStudentForm");
        assert_eq!(config.fields.len(), 3);
        assert_eq!(config.fields[0].kind, FieldKind::Identifier);
        assert_eq!(config.fields[1].kind.label(), "First name");
        assert_eq!(config.fields[2].feedback_id(), "lastName-feedback");
        assert_eq!(config.classes.invalid, "is-invalid");
        assert_eq!(config.banner.dismiss_after(), Duration::from_secs(10));
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(FormConfig::from_toml_str("").unwrap(), FormConfig::default());
    }

    #[test]
    fn test_partial_toml_override() {
        let config = FormConfig::from_toml_str(
            r#"
            form_id = "enrol"

            [banner]
            dismiss_ms = 2500

            [[fields]]
            input_id = "code"
            kind = "identifier"

            [[fields]]
            input_id = "given"
            feedback_id = "given-help"
            kind = "human_name"
            label = "Given name"
            "#,
        )
        .unwrap();

        assert_eq!(config.form_id, "enrol");
        assert_eq!(config.banner.dismiss_ms, 2500);
        assert_eq!(config.banner.title, "Validation Errors:");
        assert_eq!(config.classes, ClassNames::default());
        assert_eq!(
            config.fields,
            vec![
                FieldConfig::identifier("code"),
                FieldConfig::human_name("given", "Given name").with_feedback_id("given-help"),
            ]
        );
        assert_eq!(config.fields[1].feedback_id(), "given-help");
    }

    #[test]
    fn test_bad_toml_is_error() {
        let err = FormConfig::from_toml_str("fields = 3").unwrap_err();
        assert!(err.to_string().contains("Failed to parse form config"));
    }

    #[test]
    fn test_camel_case_object_from_js() {
        let config: FormConfig = serde_json::from_value(serde_json::json!({
            "formId": "enrol",
            "banner": { "dismissMs": 500, "markerClass": "enrol-alert" },
            "fields": [
                { "inputId": "code", "kind": "identifier" },
                {
                    "inputId": "given",
                    "feedbackId": "given-help",
                    "kind": "humanName",
                    "label": "Given name"
                }
            ]
        }))
        .unwrap();

        assert_eq!(config.form_id, "enrol");
        assert_eq!(config.banner.dismiss_ms, 500);
        assert_eq!(config.banner.marker_class, "enrol-alert");
        assert_eq!(
            config.fields,
            vec![
                FieldConfig::identifier("code"),
                FieldConfig::human_name("given", "Given name").with_feedback_id("given-help"),
            ]
        );
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let top = serde_json::from_str::<FormConfig>(r#"{"formID":"enrol"}"#);
        assert!(top.unwrap_err().to_string().contains("unknown field"));

        let banner = serde_json::from_str::<FormConfig>(r#"{"banner":{"dismiss":500}}"#);
        assert!(banner.is_err());

        let field = serde_json::from_str::<FormConfig>(
            r#"{"fields":[{"inputId":"code","kind":"identifier","feedback":"x"}]}"#,
        );
        assert!(field.is_err());

        let toml_typo = FormConfig::from_toml_str("[classes]\ninvalid_class = \"bad\"");
        assert!(toml_typo.is_err());
    }

    #[test]
    fn test_field_label_must_match_kind() {
        let missing = serde_json::from_str::<FieldConfig>(r#"{"input_id":"given","kind":"human_name"}"#);
        assert!(missing.unwrap_err().to_string().contains("needs a label"));

        let extra = serde_json::from_str::<FieldConfig>(
            r#"{"input_id":"code","kind":"identifier","label":"Code"}"#,
        );
        assert!(extra.unwrap_err().to_string().contains("does not take a label"));
    }

    #[test]
    fn test_field_serializes_flat() {
        let value = serde_json::to_value(FieldConfig::human_name("given", "Given name")).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "input_id": "given", "kind": "human_name", "label": "Given name" })
        );
    }

    #[test]
    fn test_missing_file_is_default() {
        let config = FormConfig::load("does/not/exist/roster-form.toml").unwrap();
        assert_eq!(config, FormConfig::default());
    }

    #[test]
    fn test_field_kind_dispatch() {
        let config = FormConfig::default();
        let first = config.field("firstName").unwrap();
        assert_eq!(
            first.validate("J").unwrap_err().to_string(),
            "First name must be between 2 and 50 characters."
        );
        let id = config.field("studentId").unwrap();
        assert!(id.validate("S1234").is_ok());
        assert!(config.field("nope").is_none());
    }
}
