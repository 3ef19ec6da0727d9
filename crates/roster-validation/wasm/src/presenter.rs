//! Presenter: runs validators against the bound inputs and renders the
//! outcome as CSS classes, inline feedback and an auto-dismissing banner.

use roster_validation_core::{FieldConfig, FormConfig, FormErrors};
use tracing::{debug, error};

use crate::dom::{Document, DomError, Scheduler};

/// An input element together with the rule it is validated against
#[derive(Debug, Clone)]
pub struct BoundField<E> {
    pub config: FieldConfig,
    pub input: E,
}

/// Visual state of a single input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldState {
    /// Never validated
    Untouched,
    Valid,
    Invalid,
}

/// Bridges the validators to a document.
///
/// All handles are injected; the presenter never looks anything up on a
/// global document after construction, except feedback elements and stale
/// banners, which it finds through the ids and classes in [`FormConfig`].
pub struct Presenter<D: Document, S: Scheduler> {
    document: D,
    scheduler: S,
    config: FormConfig,
    form: D::Element,
    fields: Vec<BoundField<D::Element>>,
}

impl<D: Document, S: Scheduler> Presenter<D, S> {
    pub fn new(
        document: D,
        scheduler: S,
        config: FormConfig,
        form: D::Element,
        fields: Vec<BoundField<D::Element>>,
    ) -> Self {
        Self {
            document,
            scheduler,
            config,
            form,
            fields,
        }
    }

    /// Resolve the form and every configured input by id
    pub fn attach(document: D, scheduler: S, config: FormConfig) -> Result<Self, DomError> {
        let form = document
            .element_by_id(&config.form_id)
            .ok_or_else(|| DomError::MissingElement(config.form_id.clone()))?;

        let fields = config
            .fields
            .iter()
            .map(|field| {
                let input = document
                    .element_by_id(&field.input_id)
                    .ok_or_else(|| DomError::MissingElement(field.input_id.clone()))?;
                Ok::<_, DomError>(BoundField {
                    config: field.clone(),
                    input,
                })
            })
            .collect::<Result<Vec<_>, DomError>>()?;

        Ok(Self::new(document, scheduler, config, form, fields))
    }

    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    pub fn form(&self) -> &D::Element {
        &self.form
    }

    pub fn fields(&self) -> &[BoundField<D::Element>] {
        &self.fields
    }

    pub fn field(&self, input_id: &str) -> Option<&BoundField<D::Element>> {
        self.fields.iter().find(|f| f.config.input_id == input_id)
    }

    /// Validate the current (trimmed) values without touching the page
    pub fn validate_form(&self) -> Result<(), FormErrors> {
        let mut errors = FormErrors::default();
        for field in &self.fields {
            let value = self.document.input_value(&field.input);
            if let Err(e) = field.config.validate(value.trim()) {
                errors.push(field.config.input_id.clone(), &e);
            }
        }
        errors.into_result()
    }

    /// Handle a submit event.
    ///
    /// Marks every field, refreshes the banner and returns whether the
    /// submission may go ahead.
    pub fn on_submit(&self) -> Result<bool, DomError> {
        let mut messages = Vec::new();

        for field in &self.fields {
            let value = self.document.input_value(&field.input);
            match field.config.validate(value.trim()) {
                Ok(()) => self.mark_valid(field)?,
                Err(e) => {
                    let message = e.to_string();
                    self.mark_invalid(field, &message)?;
                    messages.push(message);
                }
            }
        }

        self.show_error_banner(&messages)?;

        if messages.is_empty() {
            debug!(form = %self.config.form_id, "form valid, allowing submit");
            Ok(true)
        } else {
            debug!(
                form = %self.config.form_id,
                errors = messages.len(),
                "blocking submit"
            );
            Ok(false)
        }
    }

    /// Whether a submit event should go ahead.
    ///
    /// Same as [`Self::on_submit`], except that a page that cannot be
    /// updated still blocks an invalid form.
    pub fn submit_decision(&self) -> bool {
        self.on_submit().unwrap_or_else(|e| {
            error!(form = %self.config.form_id, error = %e, "failed to render validation state");
            self.validate_form().is_ok()
        })
    }

    /// Live feedback for one input. Never touches the banner.
    pub fn on_field_change(&self, field: &BoundField<D::Element>) -> Result<FieldState, DomError> {
        let value = self.document.input_value(&field.input);
        match field.config.validate(value.trim()) {
            Ok(()) => {
                self.mark_valid(field)?;
                Ok(FieldState::Valid)
            }
            Err(e) => {
                self.mark_invalid(field, &e.to_string())?;
                Ok(FieldState::Invalid)
            }
        }
    }

    /// Leaves the input untouched if its feedback element cannot be placed
    pub fn mark_invalid(&self, field: &BoundField<D::Element>, message: &str) -> Result<(), DomError> {
        let feedback = self.ensure_feedback(field)?;

        let classes = &self.config.classes;
        self.document.add_class(&field.input, &classes.invalid)?;
        self.document.remove_class(&field.input, &classes.valid)?;

        self.document.set_text(&feedback, message);
        self.document.set_visible(&feedback, true)
    }

    /// Hides the feedback element but keeps it for the next failure
    pub fn mark_valid(&self, field: &BoundField<D::Element>) -> Result<(), DomError> {
        let classes = &self.config.classes;
        self.document.remove_class(&field.input, &classes.invalid)?;
        self.document.add_class(&field.input, &classes.valid)?;

        if let Some(feedback) = self.document.element_by_id(&field.config.feedback_id()) {
            self.document.set_visible(&feedback, false)?;
        }
        Ok(())
    }

    pub fn field_state(&self, field: &BoundField<D::Element>) -> FieldState {
        let classes = &self.config.classes;
        if self.document.has_class(&field.input, &classes.invalid) {
            FieldState::Invalid
        } else if self.document.has_class(&field.input, &classes.valid) {
            FieldState::Valid
        } else {
            FieldState::Untouched
        }
    }

    /// Feedback element for `field`, created right after the input if missing
    fn ensure_feedback(&self, field: &BoundField<D::Element>) -> Result<D::Element, DomError> {
        let feedback_id = field.config.feedback_id();
        if let Some(existing) = self.document.element_by_id(&feedback_id) {
            return Ok(existing);
        }

        let feedback = self.document.create_element("div")?;
        self.document.set_id(&feedback, &feedback_id);
        self.document
            .add_class(&feedback, &self.config.classes.feedback)?;
        self.document.insert_after(&field.input, &feedback)?;
        Ok(feedback)
    }

    /// Replace any shown banner with one listing `messages`.
    ///
    /// Returns the new banner, or `None` when `messages` is empty. Each
    /// banner schedules its own removal; a removal whose banner is already
    /// gone does nothing.
    pub fn show_error_banner(&self, messages: &[String]) -> Result<Option<D::Element>, DomError> {
        let banner_config = &self.config.banner;

        for stale in self.document.elements_by_class(&banner_config.marker_class) {
            self.document.remove(&stale);
        }

        if messages.is_empty() {
            return Ok(None);
        }

        let banner = self.document.create_element("div")?;
        for class in banner_config.classes.split_whitespace() {
            self.document.add_class(&banner, class)?;
        }
        // Make sure the banner can be found again by the next submit
        self.document
            .add_class(&banner, &banner_config.marker_class)?;

        let title = self.document.create_element("strong")?;
        self.document.set_text(&title, &banner_config.title);
        self.document.append_child(&banner, &title)?;

        let list = self.document.create_element("ul")?;
        for message in messages {
            let item = self.document.create_element("li")?;
            self.document.set_text(&item, message);
            self.document.append_child(&list, &item)?;
        }
        self.document.append_child(&banner, &list)?;

        self.document.insert_before(&self.form, &banner)?;

        let document = self.document.clone();
        let shown = banner.clone();
        self.scheduler.schedule(
            banner_config.dismiss_after(),
            Box::new(move || {
                if document.is_attached(&shown) {
                    document.remove(&shown);
                    debug!("validation banner dismissed");
                }
            }),
        )?;

        debug!(messages = messages.len(), "validation banner shown");
        Ok(Some(banner))
    }
}
