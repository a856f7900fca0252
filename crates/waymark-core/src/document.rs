#![forbid(unsafe_code)]

//! The document capability injected into the positioning engine.
//!
//! Nothing in Waymark reaches for ambient global state. Selector queries, the
//! body element, element geometry and every style mutation go through a
//! [`Document`] handed in by the host. The browser host wraps the live DOM;
//! tests and headless hosts use [`Page`](crate::page::Page).

use std::fmt;

use crate::geometry::Rect;
use crate::selector::SelectorError;

/// Opaque handle to an element owned by a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(u32);

impl ElementId {
    #[inline]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Options for [`Document::focus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FocusOptions {
    /// Do not scroll the element into view.
    pub prevent_scroll: bool,
}

/// Read and write access to the page the tooltip lives in.
pub trait Document {
    /// The body element. Centered tooltips use it as their reference.
    fn body(&self) -> ElementId;

    /// First element in document order matching `selector`.
    fn query_selector(&self, selector: &str) -> Result<Option<ElementId>, SelectorError>;

    /// First descendant of `root` matching `selector`.
    fn query_selector_within(
        &self,
        root: ElementId,
        selector: &str,
    ) -> Result<Option<ElementId>, SelectorError>;

    /// Whether the element is still attached to the document tree.
    fn is_connected(&self, el: ElementId) -> bool;

    /// Border box in page coordinates, or `None` for unknown/detached nodes.
    fn bounding_rect(&self, el: ElementId) -> Option<Rect>;

    /// The visible region in page coordinates (scroll offset applied).
    fn viewport(&self) -> Rect;

    /// Set an inline style property. `None` clears it.
    fn set_style(&mut self, el: ElementId, property: &str, value: Option<&str>);

    /// Set an attribute value.
    fn set_attribute(&mut self, el: ElementId, name: &str, value: &str);

    /// Add a class to the element's class list.
    fn add_class(&mut self, el: ElementId, class: &str);

    /// Move keyboard focus to the element.
    fn focus(&mut self, el: ElementId, options: FocusOptions);
}
