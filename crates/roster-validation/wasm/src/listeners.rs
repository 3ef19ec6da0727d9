//! Event wiring for the browser: binds a presenter to the page once the
//! document is ready.

use std::rc::Rc;

use roster_validation_core::FormConfig;
use tracing::{debug, error, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Event;

use crate::dom::browser::host_error;
use crate::dom::{BrowserDocument, DomError, TimeoutScheduler};
use crate::presenter::Presenter;

type BrowserPresenter = Presenter<BrowserDocument, TimeoutScheduler>;

/// Bind now if the document has loaded, otherwise on `DOMContentLoaded`
pub fn attach_when_ready(config: FormConfig) -> Result<(), DomError> {
    let document = BrowserDocument::current()?;

    if document.inner().ready_state() != "loading" {
        bind_or_warn(config);
        return Ok(());
    }

    let on_ready = Closure::once_into_js(move || bind_or_warn(config));
    document
        .inner()
        .add_event_listener_with_callback("DOMContentLoaded", on_ready.unchecked_ref())
        .map_err(host_error)
}

fn bind_or_warn(config: FormConfig) {
    let form_id = config.form_id.clone();
    if let Err(e) = bind(config) {
        warn!(form = %form_id, error = %e, "student form validation not attached");
    }
}

fn bind(config: FormConfig) -> Result<(), DomError> {
    let presenter: Rc<BrowserPresenter> = Rc::new(Presenter::attach(
        BrowserDocument::current()?,
        TimeoutScheduler::current()?,
        config,
    )?);

    let submit_presenter = Rc::clone(&presenter);
    let on_submit = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
        if !submit_presenter.submit_decision() {
            event.prevent_default();
        }
    });
    presenter
        .form()
        .add_event_listener_with_callback("submit", on_submit.as_ref().unchecked_ref())
        .map_err(host_error)?;
    // Listeners live as long as the page
    on_submit.forget();

    for (index, field) in presenter.fields().iter().enumerate() {
        let input_presenter = Rc::clone(&presenter);
        let on_input = Closure::<dyn FnMut(Event)>::new(move |_event: Event| {
            let field = &input_presenter.fields()[index];
            if let Err(e) = input_presenter.on_field_change(field) {
                error!(field = %field.config.input_id, error = %e, "failed to render field state");
            }
        });
        field
            .input
            .add_event_listener_with_callback("input", on_input.as_ref().unchecked_ref())
            .map_err(host_error)?;
        on_input.forget();
    }

    debug!(
        form = %presenter.config().form_id,
        fields = presenter.fields().len(),
        "student form validation attached"
    );
    Ok(())
}
