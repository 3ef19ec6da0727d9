//! Presenter behavior against the in-memory document
//!
//! The page mirrors the registration form: a container holding the form and
//! three inputs. Time only moves when the scheduler is advanced.

use std::time::Duration;

use pretty_assertions::assert_eq;
use roster_validation_core::{FieldConfig, FormConfig};
use roster_validation_wasm::dom::{Document, DomError, ManualScheduler, MemoryDocument, NodeId};
use roster_validation_wasm::{FieldState, Presenter};
use rstest::{fixture, rstest};

struct Page {
    doc: MemoryDocument,
    scheduler: ManualScheduler,
    form: NodeId,
    student_id: NodeId,
    first_name: NodeId,
    last_name: NodeId,
    presenter: Presenter<MemoryDocument, ManualScheduler>,
}

impl Page {
    fn fill(&self, student_id: &str, first_name: &str, last_name: &str) {
        self.doc.set_input_value(self.student_id, student_id);
        self.doc.set_input_value(self.first_name, first_name);
        self.doc.set_input_value(self.last_name, last_name);
    }

    fn banners(&self) -> Vec<NodeId> {
        self.doc.elements_by_class("validation-alert")
    }

    fn feedback(&self, input_id: &str) -> Option<NodeId> {
        self.doc.element_by_id(&format!("{}-feedback", input_id))
    }

    fn state(&self, input_id: &str) -> FieldState {
        let field = self.presenter.field(input_id).unwrap();
        self.presenter.field_state(field)
    }

    fn change(&self, input: NodeId, input_id: &str, value: &str) -> FieldState {
        self.doc.set_input_value(input, value);
        let field = self.presenter.field(input_id).unwrap();
        self.presenter.on_field_change(field).unwrap()
    }
}

fn build_page(config: FormConfig) -> Page {
    let doc = MemoryDocument::new();
    let container = doc.add_element(doc.body(), "div", Some("container"));
    let form = doc.add_element(container, "form", Some("addStudentForm"));
    let student_id = doc.add_element(form, "input", Some("studentId"));
    let first_name = doc.add_element(form, "input", Some("firstName"));
    let last_name = doc.add_element(form, "input", Some("lastName"));
    doc.add_element(form, "button", Some("submit"));

    let scheduler = ManualScheduler::new();
    let presenter = Presenter::attach(doc.clone(), scheduler.clone(), config).unwrap();

    Page {
        doc,
        scheduler,
        form,
        student_id,
        first_name,
        last_name,
        presenter,
    }
}

#[fixture]
fn page() -> Page {
    build_page(FormConfig::default())
}

#[rstest]
fn test_invalid_submit_is_blocked(page: Page) {
    page.fill("ab", "J", "Valid Name");

    assert!(!page.presenter.on_submit().unwrap());

    assert_eq!(page.state("studentId"), FieldState::Invalid);
    assert_eq!(page.state("firstName"), FieldState::Invalid);
    assert_eq!(page.state("lastName"), FieldState::Valid);

    let id_feedback = page.feedback("studentId").unwrap();
    assert_eq!(page.doc.next_sibling(page.student_id), Some(id_feedback));
    assert!(page.doc.has_class(&id_feedback, "invalid-feedback"));
    assert!(page.doc.is_visible(id_feedback));
    assert_eq!(
        page.doc.text(id_feedback),
        "Student ID must be between 3 and 20 characters."
    );

    let name_feedback = page.feedback("firstName").unwrap();
    assert_eq!(page.doc.next_sibling(page.first_name), Some(name_feedback));
    assert_eq!(
        page.doc.text(name_feedback),
        "First name must be between 2 and 50 characters."
    );

    // Valid field never needed a feedback element
    assert_eq!(page.feedback("lastName"), None);

    let banners = page.banners();
    assert_eq!(banners.len(), 1);
    let banner = banners[0];
    assert_eq!(page.doc.previous_sibling(page.form), Some(banner));
    assert!(page.doc.has_class(&banner, "alert"));
    assert!(page.doc.has_class(&banner, "alert-danger"));

    let children = page.doc.children(banner);
    assert_eq!(page.doc.text(children[0]), "Validation Errors:");
    let items: Vec<String> = page
        .doc
        .children(children[1])
        .into_iter()
        .map(|li| page.doc.text(li))
        .collect();
    assert_eq!(
        items,
        vec![
            "Student ID must be between 3 and 20 characters.".to_string(),
            "First name must be between 2 and 50 characters.".to_string(),
        ]
    );
}

#[rstest]
fn test_valid_submit_proceeds(page: Page) {
    page.fill("S1001", "Ada", "O'Brien");

    assert!(page.presenter.on_submit().unwrap());

    assert_eq!(page.state("studentId"), FieldState::Valid);
    assert_eq!(page.state("firstName"), FieldState::Valid);
    assert_eq!(page.state("lastName"), FieldState::Valid);
    assert!(page.banners().is_empty());
    assert_eq!(page.scheduler.pending(), 0);
}

#[rstest]
fn test_values_are_trimmed_before_validation(page: Page) {
    page.fill("  S1001  ", " Bob", "Smith ");
    assert!(page.presenter.on_submit().unwrap());
}

#[rstest]
fn test_banner_dismissed_after_ten_seconds(page: Page) {
    page.fill("", "", "");
    assert!(!page.presenter.on_submit().unwrap());

    let banner = page.banners()[0];
    assert_eq!(page.scheduler.pending(), 1);

    page.scheduler.advance(Duration::from_millis(9_999));
    assert!(page.doc.is_attached(&banner));

    assert_eq!(page.scheduler.advance(Duration::from_millis(1)), 1);
    assert!(!page.doc.is_attached(&banner));
    assert!(page.banners().is_empty());

    // Inline feedback outlives the banner
    assert!(page.doc.is_visible(page.feedback("studentId").unwrap()));
}

#[rstest]
fn test_resubmit_replaces_banner_without_cancelling_timers(page: Page) {
    page.fill("ab", "J", "Valid Name");
    page.presenter.on_submit().unwrap();
    let first = page.banners()[0];

    page.scheduler.advance(Duration::from_secs(5));
    page.presenter.on_submit().unwrap();
    let second = page.banners()[0];

    assert_ne!(first, second);
    assert!(!page.doc.is_attached(&first));
    assert_eq!(page.banners().len(), 1);

    // Timers are not coalesced: both are still queued
    assert_eq!(page.scheduler.pending(), 2);

    // First timer fires at 10s and finds its banner already gone
    assert_eq!(page.scheduler.advance(Duration::from_secs(5)), 1);
    assert!(page.doc.is_attached(&second));

    // Second banner lives its full 10s
    assert_eq!(page.scheduler.advance(Duration::from_secs(5)), 1);
    assert!(!page.doc.is_attached(&second));
    assert_eq!(page.scheduler.pending(), 0);
}

#[rstest]
fn test_valid_submit_clears_previous_banner(page: Page) {
    page.fill("ab", "J", "Valid Name");
    page.presenter.on_submit().unwrap();
    assert_eq!(page.banners().len(), 1);

    page.fill("abc", "Jo", "Valid Name");
    assert!(page.presenter.on_submit().unwrap());
    assert!(page.banners().is_empty());
    assert!(!page.doc.is_visible(page.feedback("studentId").unwrap()));

    // The leftover timer still fires harmlessly
    assert_eq!(page.scheduler.advance(Duration::from_secs(10)), 1);
}

#[rstest]
fn test_banner_removed_elsewhere_before_timer(page: Page) {
    let banner = page
        .presenter
        .show_error_banner(&["Student ID is required.".to_string()])
        .unwrap()
        .unwrap();
    page.doc.remove(&banner);

    assert_eq!(page.scheduler.advance(Duration::from_secs(10)), 1);
    assert!(!page.doc.is_attached(&banner));
}

#[rstest]
fn test_empty_banner_only_clears(page: Page) {
    page.presenter
        .show_error_banner(&["one".to_string(), "two".to_string()])
        .unwrap();
    assert_eq!(page.banners().len(), 1);

    assert_eq!(page.presenter.show_error_banner(&[]).unwrap(), None);
    assert!(page.banners().is_empty());
    assert_eq!(page.scheduler.pending(), 1);
}

#[rstest]
fn test_field_change_flips_state_and_reuses_feedback(page: Page) {
    assert_eq!(page.state("firstName"), FieldState::Untouched);

    assert_eq!(
        page.change(page.first_name, "firstName", "J"),
        FieldState::Invalid
    );
    let feedback = page.feedback("firstName").unwrap();
    assert!(page.doc.is_visible(feedback));

    assert_eq!(
        page.change(page.first_name, "firstName", "Jo"),
        FieldState::Valid
    );
    assert_eq!(page.feedback("firstName"), Some(feedback));
    assert!(!page.doc.is_visible(feedback));
    assert!(!page.doc.has_class(&page.first_name, "is-invalid"));
    assert!(page.doc.has_class(&page.first_name, "is-valid"));

    assert_eq!(
        page.change(page.first_name, "firstName", "Mary  Jane"),
        FieldState::Invalid
    );
    assert_eq!(page.feedback("firstName"), Some(feedback));
    assert!(page.doc.is_visible(feedback));
    assert_eq!(
        page.doc.text(feedback),
        "First name cannot have consecutive spaces."
    );
    assert!(!page.doc.has_class(&page.first_name, "is-valid"));

    // Only one feedback element ever exists for the field
    let feedback_count = page
        .doc
        .elements_by_class("invalid-feedback")
        .into_iter()
        .filter(|n| page.doc.id(*n).as_deref() == Some("firstName-feedback"))
        .count();
    assert_eq!(feedback_count, 1);
}

#[rstest]
fn test_field_change_never_touches_banner(page: Page) {
    page.change(page.student_id, "studentId", "a!");
    page.change(page.last_name, "lastName", "");

    assert!(page.banners().is_empty());
    assert_eq!(page.scheduler.pending(), 0);
    assert_eq!(page.state("studentId"), FieldState::Invalid);
    assert_eq!(page.state("firstName"), FieldState::Untouched);
    assert_eq!(
        page.doc.text(page.feedback("lastName").unwrap()),
        "Last name is required."
    );
}

#[rstest]
fn test_validate_form_is_side_effect_free(page: Page) {
    page.fill("ab!", "Bob3", "Smith");
    let errors = page.presenter.validate_form().unwrap_err();

    assert_eq!(errors.len(), 2);
    assert_eq!(
        errors.get("studentId"),
        Some("Student ID can only contain letters and numbers (no special characters or spaces).")
    );
    assert_eq!(page.state("studentId"), FieldState::Untouched);
    assert!(page.banners().is_empty());
}

#[rstest]
fn test_failed_mark_invalid_leaves_field_untouched(page: Page) {
    // Feedback is placed next to the input, which needs a parent
    page.doc.remove(&page.student_id);
    page.doc.set_input_value(page.student_id, "");

    let field = page.presenter.field("studentId").unwrap();
    assert!(matches!(
        page.presenter.on_field_change(field),
        Err(DomError::Detached(_))
    ));
    assert_eq!(page.state("studentId"), FieldState::Untouched);
    assert_eq!(page.feedback("studentId"), None);
}

#[rstest]
fn test_submit_decision_blocks_invalid_form_when_banner_fails(page: Page) {
    page.fill("", "Ada", "Lovelace");
    page.doc.remove(&page.form);

    assert!(matches!(page.presenter.on_submit(), Err(DomError::Detached(_))));
    assert!(!page.presenter.submit_decision());
}

#[rstest]
fn test_submit_decision_blocks_invalid_form_when_feedback_fails(page: Page) {
    page.fill("S1001", "J", "Lovelace");
    page.doc.remove(&page.first_name);

    assert!(!page.presenter.submit_decision());
    assert_eq!(page.state("firstName"), FieldState::Untouched);
}

#[rstest]
fn test_submit_decision_allows_valid_form(page: Page) {
    page.fill("S1001", "Ada", "Lovelace");
    assert!(page.presenter.submit_decision());

    // Nothing to render into the detached form, so the decision stands
    page.doc.remove(&page.form);
    assert!(page.presenter.submit_decision());
    assert_eq!(page.state("lastName"), FieldState::Valid);
}

#[test]
fn test_explicit_feedback_element_is_used() {
    let mut config = FormConfig::default();
    config.fields[0] = FieldConfig::identifier("studentId").with_feedback_id("sid-help");
    let page = build_page(config);

    // Feedback placeholder lives outside the form
    let help = page.doc.add_element(page.doc.body(), "small", Some("sid-help"));

    page.change(page.student_id, "studentId", "");
    assert_eq!(page.doc.text(help), "Student ID is required.");
    assert_ne!(page.doc.next_sibling(page.student_id), Some(help));
    assert_eq!(page.doc.next_sibling(page.student_id), Some(page.first_name));
}

#[test]
fn test_custom_dismiss_delay() {
    let mut config = FormConfig::default();
    config.banner.dismiss_ms = 500;
    let page = build_page(config);

    page.fill("", "Ada", "Lovelace");
    page.presenter.on_submit().unwrap();
    assert_eq!(page.scheduler.advance(Duration::from_millis(500)), 1);
    assert!(page.banners().is_empty());
}

#[test]
fn test_attach_requires_form() {
    let doc = MemoryDocument::new();
    doc.add_element(doc.body(), "input", Some("studentId"));

    let err = Presenter::attach(doc, ManualScheduler::new(), FormConfig::default())
        .err()
        .unwrap();
    assert_eq!(err, DomError::MissingElement("addStudentForm".to_string()));
}

#[test]
fn test_attach_requires_inputs() {
    let doc = MemoryDocument::new();
    let form = doc.add_element(doc.body(), "form", Some("addStudentForm"));
    doc.add_element(form, "input", Some("studentId"));
    doc.add_element(form, "input", Some("firstName"));

    let err = Presenter::attach(doc, ManualScheduler::new(), FormConfig::default())
        .err()
        .unwrap();
    assert_eq!(err, DomError::MissingElement("lastName".to_string()));
}
