#![forbid(unsafe_code)]

//! In-memory [`Document`] for headless hosts and tests.
//!
//! [`Page`] keeps an arena of nodes rooted at a body element. Geometry is
//! explicit: the host assigns each element a border box with
//! [`Page::set_rect`]. Writing `left`/`top` pixel styles moves the element,
//! so positions written by the engine are observable through
//! [`Document::bounding_rect`] just like in a browser.

use ahash::AHashMap;

use crate::document::{Document, ElementId, FocusOptions};
use crate::geometry::{Point, Rect};
use crate::selector::{Selector, SelectorError, SelectorTree};

#[derive(Debug, Clone)]
struct Node {
    tag: String,
    classes: Vec<String>,
    attributes: AHashMap<String, String>,
    style: AHashMap<String, String>,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    rect: Rect,
}

impl Node {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            classes: Vec::new(),
            attributes: AHashMap::new(),
            style: AHashMap::new(),
            parent: None,
            children: Vec::new(),
            rect: Rect::default(),
        }
    }
}

/// A headless page: node tree, geometry, scroll position and focus.
#[derive(Debug, Clone)]
pub struct Page {
    nodes: Vec<Node>,
    body: ElementId,
    scroll: Point,
    viewport_size: (f64, f64),
    focused: Option<ElementId>,
    focus_log: Vec<(ElementId, FocusOptions)>,
}

impl Page {
    /// Create a page whose viewport and document are `width` x `height`.
    pub fn new(width: f64, height: f64) -> Self {
        let mut body = Node::new("body");
        body.rect = Rect::from_size(width, height);
        Self {
            nodes: vec![body],
            body: ElementId::new(0),
            scroll: Point::default(),
            viewport_size: (width, height),
            focused: None,
            focus_log: Vec::new(),
        }
    }

    fn node(&self, el: ElementId) -> Option<&Node> {
        self.nodes.get(el.raw() as usize)
    }

    fn node_mut(&mut self, el: ElementId) -> Option<&mut Node> {
        self.nodes.get_mut(el.raw() as usize)
    }

    /// Create a `tag` element as the last child of `parent`.
    pub fn append(&mut self, parent: ElementId, tag: &str) -> ElementId {
        let id = ElementId::new(self.nodes.len() as u32);
        let mut node = Node::new(tag);
        node.parent = Some(parent);
        self.nodes.push(node);
        if let Some(p) = self.node_mut(parent) {
            p.children.push(id);
        }
        id
    }

    /// Set the element's `id` attribute.
    pub fn set_id(&mut self, el: ElementId, id: &str) {
        self.set_attribute(el, "id", id);
    }

    /// Assign the element's border box in page coordinates.
    pub fn set_rect(&mut self, el: ElementId, rect: Rect) {
        if let Some(node) = self.node_mut(el) {
            node.rect = rect;
        }
    }

    /// Grow or shrink the scrollable document (the body box).
    pub fn set_document_size(&mut self, width: f64, height: f64) {
        let body = self.body;
        self.set_rect(body, Rect::from_size(width, height));
    }

    /// Detach `el` (and its subtree) from the tree. The node keeps its
    /// handle but is no longer connected.
    pub fn remove(&mut self, el: ElementId) {
        let Some(parent) = self.node(el).and_then(|n| n.parent) else {
            return;
        };
        if let Some(p) = self.node_mut(parent) {
            p.children.retain(|&c| c != el);
        }
        if let Some(node) = self.node_mut(el) {
            node.parent = None;
        }
        if self.focused.is_some_and(|f| !self.is_connected(f)) {
            self.focused = None;
        }
    }

    /// Scroll the viewport to `(x, y)`.
    pub fn scroll_to(&mut self, x: f64, y: f64) {
        self.scroll = Point::new(x, y);
    }

    /// Resize the viewport.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.viewport_size = (width, height);
    }

    /// Inline style value, if set.
    pub fn style(&self, el: ElementId, property: &str) -> Option<&str> {
        self.node(el)?.style.get(property).map(String::as_str)
    }

    /// Whether the class list contains `class`.
    pub fn has_class(&self, el: ElementId, class: &str) -> bool {
        self.node(el)
            .is_some_and(|n| n.classes.iter().any(|c| c == class))
    }

    /// Attribute value, if set.
    pub fn attribute(&self, el: ElementId, name: &str) -> Option<&str> {
        self.node(el)?.attributes.get(name).map(String::as_str)
    }

    /// Currently focused element.
    pub fn focused(&self) -> Option<ElementId> {
        self.focused
    }

    /// Every focus call received, in order.
    pub fn focus_log(&self) -> &[(ElementId, FocusOptions)] {
        &self.focus_log
    }

    /// Pre-order walk of the subtree under `root`, `root` first.
    fn descendants(&self, root: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(el) = stack.pop() {
            out.push(el);
            if let Some(node) = self.node(el) {
                stack.extend(node.children.iter().rev().copied());
            }
        }
        out
    }

    fn first_match(
        &self,
        root: ElementId,
        include_root: bool,
        selector: &str,
    ) -> Result<Option<ElementId>, SelectorError> {
        let selector = Selector::parse(selector)?;
        let skip = usize::from(!include_root);
        Ok(self
            .descendants(root)
            .into_iter()
            .skip(skip)
            .find(|&el| selector.matches(self, el)))
    }
}

fn parse_px(value: &str) -> Option<f64> {
    value.trim().strip_suffix("px")?.trim().parse().ok()
}

impl SelectorTree for Page {
    fn tag(&self, node: ElementId) -> &str {
        self.node(node).map_or("", |n| n.tag.as_str())
    }

    fn has_class(&self, node: ElementId, class: &str) -> bool {
        Page::has_class(self, node, class)
    }

    fn attribute(&self, node: ElementId, name: &str) -> Option<&str> {
        Page::attribute(self, node, name)
    }

    fn parent(&self, node: ElementId) -> Option<ElementId> {
        self.node(node)?.parent
    }
}

impl Document for Page {
    fn body(&self) -> ElementId {
        self.body
    }

    fn query_selector(&self, selector: &str) -> Result<Option<ElementId>, SelectorError> {
        self.first_match(self.body, true, selector)
    }

    fn query_selector_within(
        &self,
        root: ElementId,
        selector: &str,
    ) -> Result<Option<ElementId>, SelectorError> {
        self.first_match(root, false, selector)
    }

    fn is_connected(&self, el: ElementId) -> bool {
        let mut cursor = Some(el);
        while let Some(current) = cursor {
            if current == self.body {
                return true;
            }
            cursor = self.node(current).and_then(|n| n.parent);
        }
        false
    }

    fn bounding_rect(&self, el: ElementId) -> Option<Rect> {
        if !self.is_connected(el) {
            return None;
        }
        self.node(el).map(|n| n.rect)
    }

    fn viewport(&self) -> Rect {
        let (width, height) = self.viewport_size;
        Rect::new(self.scroll.x, self.scroll.y, width, height)
    }

    fn set_style(&mut self, el: ElementId, property: &str, value: Option<&str>) {
        let Some(node) = self.node_mut(el) else {
            return;
        };
        match value {
            Some(value) => {
                match property {
                    "left" => node.rect.x = parse_px(value).unwrap_or(node.rect.x),
                    "top" => node.rect.y = parse_px(value).unwrap_or(node.rect.y),
                    _ => {}
                }
                node.style.insert(property.to_owned(), value.to_owned());
            }
            None => {
                node.style.remove(property);
            }
        }
    }

    fn set_attribute(&mut self, el: ElementId, name: &str, value: &str) {
        if let Some(node) = self.node_mut(el) {
            node.attributes.insert(name.to_owned(), value.to_owned());
        }
    }

    fn add_class(&mut self, el: ElementId, class: &str) {
        if let Some(node) = self.node_mut(el)
            && !node.classes.iter().any(|c| c == class)
        {
            node.classes.push(class.to_owned());
        }
    }

    fn focus(&mut self, el: ElementId, options: FocusOptions) {
        if !self.is_connected(el) {
            return;
        }
        self.focused = Some(el);
        self.focus_log.push((el, options));
    }
}
