//! Host document abstraction
//!
//! The presenter only talks to the page through these traits, so it can run
//! against the real browser DOM or an in-memory tree in tests.

use std::fmt;
use std::time::Duration;
use thiserror::Error;

pub mod memory;

#[cfg(target_arch = "wasm32")]
pub mod browser;

pub use memory::{ManualScheduler, MemoryDocument, NodeId};

#[cfg(target_arch = "wasm32")]
pub use browser::{BrowserDocument, TimeoutScheduler};

/// Failure of a document primitive
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
    #[error("element not found: #{0}")]
    MissingElement(String),

    #[error("element is not attached to the document: {0}")]
    Detached(String),

    #[error("DOM call failed: {0}")]
    Host(String),
}

/// Element lookup and mutation primitives of a host document.
///
/// Handles are cheap to clone and stay valid after removal, so a handle can
/// be checked with [`Document::is_attached`] long after it was created.
pub trait Document: Clone + 'static {
    type Element: Clone + fmt::Debug + 'static;

    /// Find an attached element by id
    fn element_by_id(&self, id: &str) -> Option<Self::Element>;

    /// All attached elements carrying `class`
    fn elements_by_class(&self, class: &str) -> Vec<Self::Element>;

    /// Current value of an input element, empty for anything else
    fn input_value(&self, input: &Self::Element) -> String;

    /// Create a detached element
    fn create_element(&self, tag: &str) -> Result<Self::Element, DomError>;

    fn set_id(&self, element: &Self::Element, id: &str);

    fn add_class(&self, element: &Self::Element, class: &str) -> Result<(), DomError>;

    fn remove_class(&self, element: &Self::Element, class: &str) -> Result<(), DomError>;

    fn has_class(&self, element: &Self::Element, class: &str) -> bool;

    fn set_text(&self, element: &Self::Element, text: &str);

    /// Show or hide through the element's display style
    fn set_visible(&self, element: &Self::Element, visible: bool) -> Result<(), DomError>;

    fn append_child(&self, parent: &Self::Element, child: &Self::Element) -> Result<(), DomError>;

    /// Insert `node` as the sibling right before `reference`
    fn insert_before(&self, reference: &Self::Element, node: &Self::Element)
        -> Result<(), DomError>;

    /// Insert `node` as the sibling right after `reference`
    fn insert_after(&self, reference: &Self::Element, node: &Self::Element)
        -> Result<(), DomError>;

    /// Whether the element is still part of the document tree
    fn is_attached(&self, element: &Self::Element) -> bool;

    /// Detach the element. No-op when it is already detached.
    fn remove(&self, element: &Self::Element);
}

/// Deferred task that runs once after a delay
pub type Task = Box<dyn FnOnce() + 'static>;

/// Fire-and-forget timer source
pub trait Scheduler: Clone + 'static {
    fn schedule(&self, delay: Duration, task: Task) -> Result<(), DomError>;
}
