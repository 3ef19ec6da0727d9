//! `web-sys` backed document and `setTimeout` scheduler

use std::time::Duration;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement, HtmlInputElement, Window};

use super::{Document, DomError, Scheduler, Task};

pub(crate) fn host_error(value: JsValue) -> DomError {
    DomError::Host(
        value
            .as_string()
            .unwrap_or_else(|| format!("{:?}", value)),
    )
}

/// The page's `document`
#[derive(Debug, Clone)]
pub struct BrowserDocument {
    document: web_sys::Document,
}

impl BrowserDocument {
    pub fn new(document: web_sys::Document) -> Self {
        Self { document }
    }

    /// Document of the current window
    pub fn current() -> Result<Self, DomError> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| DomError::Host("no document available".to_string()))?;
        Ok(Self::new(document))
    }

    pub fn inner(&self) -> &web_sys::Document {
        &self.document
    }
}

impl Document for BrowserDocument {
    type Element = Element;

    fn element_by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn elements_by_class(&self, class: &str) -> Vec<Element> {
        // The collection is live, so copy it before anything gets removed
        let collection = self.document.get_elements_by_class_name(class);
        (0..collection.length())
            .filter_map(|i| collection.item(i))
            .collect()
    }

    fn input_value(&self, input: &Element) -> String {
        input
            .dyn_ref::<HtmlInputElement>()
            .map(|i| i.value())
            .unwrap_or_default()
    }

    fn create_element(&self, tag: &str) -> Result<Element, DomError> {
        self.document.create_element(tag).map_err(host_error)
    }

    fn set_id(&self, element: &Element, id: &str) {
        element.set_id(id);
    }

    fn add_class(&self, element: &Element, class: &str) -> Result<(), DomError> {
        element.class_list().add_1(class).map_err(host_error)
    }

    fn remove_class(&self, element: &Element, class: &str) -> Result<(), DomError> {
        element.class_list().remove_1(class).map_err(host_error)
    }

    fn has_class(&self, element: &Element, class: &str) -> bool {
        element.class_list().contains(class)
    }

    fn set_text(&self, element: &Element, text: &str) {
        element.set_text_content(Some(text));
    }

    fn set_visible(&self, element: &Element, visible: bool) -> Result<(), DomError> {
        let html = element
            .dyn_ref::<HtmlElement>()
            .ok_or_else(|| DomError::Host(format!("<{}> has no style", element.tag_name())))?;
        let display = if visible { "block" } else { "none" };
        html.style()
            .set_property("display", display)
            .map_err(host_error)
    }

    fn append_child(&self, parent: &Element, child: &Element) -> Result<(), DomError> {
        parent.append_child(child).map(|_| ()).map_err(host_error)
    }

    fn insert_before(&self, reference: &Element, node: &Element) -> Result<(), DomError> {
        if reference.parent_node().is_none() {
            return Err(DomError::Detached(reference.tag_name()));
        }
        reference.before_with_node_1(node).map_err(host_error)
    }

    fn insert_after(&self, reference: &Element, node: &Element) -> Result<(), DomError> {
        if reference.parent_node().is_none() {
            return Err(DomError::Detached(reference.tag_name()));
        }
        reference.after_with_node_1(node).map_err(host_error)
    }

    fn is_attached(&self, element: &Element) -> bool {
        element.is_connected()
    }

    fn remove(&self, element: &Element) {
        element.remove();
    }
}

/// Runs tasks through `window.setTimeout`
#[derive(Debug, Clone)]
pub struct TimeoutScheduler {
    window: Window,
}

impl TimeoutScheduler {
    pub fn new(window: Window) -> Self {
        Self { window }
    }

    pub fn current() -> Result<Self, DomError> {
        let window =
            web_sys::window().ok_or_else(|| DomError::Host("no window available".to_string()))?;
        Ok(Self::new(window))
    }
}

impl Scheduler for TimeoutScheduler {
    fn schedule(&self, delay: Duration, task: Task) -> Result<(), DomError> {
        let callback = Closure::once_into_js(task);
        let millis = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
        self.window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.unchecked_ref::<js_sys::Function>(),
                millis,
            )
            .map(|_| ())
            .map_err(host_error)
    }
}
